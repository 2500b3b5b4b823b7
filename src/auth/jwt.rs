use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Durée de vie des refresh tokens persistés.
pub const REFRESH_TOKEN_TTL_DAYS: i64 = 15;

#[derive(Debug, thiserror::Error)]
pub enum JwtError {
    #[error("Token generation failed: {0}")]
    GenerationFailed(jsonwebtoken::errors::Error),
    #[error("Token invalid: {0}")]
    TokenInvalid(jsonwebtoken::errors::Error),
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Access,
    Refresh,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: Uuid,
    pub kind: TokenKind,
    /// Id de la ligne refresh_tokens visée par ce token d'accès.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refresh_token_id: Option<Uuid>,
    pub iat: i64,
    pub exp: i64,
}

impl Claims {
    /// Garde contre la confusion de type (secret refresh présenté comme access).
    pub fn is_kind(&self, kind: TokenKind) -> bool {
        self.kind == kind
    }
}

#[derive(Clone)]
pub struct JwtManager {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    access_ttl_minutes: i64,
}

impl JwtManager {
    pub fn new(secret: &str, access_ttl_minutes: i64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_ref()),
            decoding_key: DecodingKey::from_secret(secret.as_ref()),
            access_ttl_minutes,
        }
    }

    /// Access token court, pointant (ou non) vers la ligne refresh courante.
    pub fn mint_access_token(
        &self,
        user_id: Uuid,
        refresh_token_id: Option<Uuid>,
    ) -> Result<String, JwtError> {
        self.mint(
            user_id,
            TokenKind::Access,
            refresh_token_id,
            Duration::minutes(self.access_ttl_minutes),
        )
    }

    /// Secret signé stocké dans la ligne refresh_tokens.
    pub fn mint_refresh_secret(&self, user_id: Uuid) -> Result<String, JwtError> {
        self.mint(
            user_id,
            TokenKind::Refresh,
            None,
            Duration::days(REFRESH_TOKEN_TTL_DAYS),
        )
    }

    pub fn mint(
        &self,
        user_id: Uuid,
        kind: TokenKind,
        refresh_token_id: Option<Uuid>,
        ttl: Duration,
    ) -> Result<String, JwtError> {
        let now = Utc::now();

        let claims = Claims {
            sub: user_id,
            kind,
            refresh_token_id,
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
        };

        encode(&Header::default(), &claims, &self.encoding_key).map_err(JwtError::GenerationFailed)
    }

    /// Vérifie la signature, et l'expiration seulement si `check_expired`.
    ///
    /// `check_expired = false` sert au login pour récupérer le
    /// `refresh_token_id` d'un access token déjà expiré resté en session:
    /// la signature reste exigée, seul l'exp est ignoré.
    pub fn decode(&self, token: &str, check_expired: bool) -> Result<Claims, JwtError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = check_expired;

        decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(JwtError::TokenInvalid)
    }
}

#[cfg(test)]
mod tests {
    use super::{Duration, JwtError, JwtManager, TokenKind, Uuid};

    fn make_jwt_manager() -> JwtManager {
        JwtManager::new("my_secret_key_for_tests", 30)
    }

    #[test]
    fn mint_and_decode_access_token_roundtrip() {
        let jwt = make_jwt_manager();
        let user_id = Uuid::new_v4();
        let refresh_id = Uuid::new_v4();

        let token = jwt
            .mint_access_token(user_id, Some(refresh_id))
            .expect("Token generation failed");
        let claims = jwt.decode(&token, true).expect("Token decoding failed");

        assert_eq!(claims.sub, user_id);
        assert_eq!(claims.refresh_token_id, Some(refresh_id));
        assert!(claims.is_kind(TokenKind::Access));
        assert!(claims.exp > claims.iat, "Expiry should be after issued time");
    }

    #[test]
    fn refresh_secret_carries_refresh_kind_and_no_linkage() {
        let jwt = make_jwt_manager();
        let token = jwt
            .mint_refresh_secret(Uuid::new_v4())
            .expect("Token generation failed");
        let claims = jwt.decode(&token, true).expect("Token decoding failed");

        assert!(claims.is_kind(TokenKind::Refresh));
        assert!(!claims.is_kind(TokenKind::Access));
        assert!(claims.refresh_token_id.is_none());
    }

    #[test]
    fn expired_token_decodes_without_expiry_check_only() {
        let jwt = make_jwt_manager();
        let user_id = Uuid::new_v4();

        // Bien au-delà du leeway par défaut de jsonwebtoken (60s)
        let token = jwt
            .mint(user_id, TokenKind::Access, None, Duration::minutes(-5))
            .expect("Token generation failed");

        let claims = jwt
            .decode(&token, false)
            .expect("Expired token should still decode when expiry is not checked");
        assert_eq!(claims.sub, user_id);

        let result = jwt.decode(&token, true);
        assert!(matches!(result.unwrap_err(), JwtError::TokenInvalid(_)));
    }

    #[test]
    fn garbage_token_fails_even_without_expiry_check() {
        let jwt = make_jwt_manager();

        let result = jwt.decode("invalid.token.here", false);

        assert!(matches!(result.unwrap_err(), JwtError::TokenInvalid(_)));
    }

    #[test]
    fn token_signed_with_other_secret_is_rejected() {
        let jwt = make_jwt_manager();
        let other = JwtManager::new("a_completely_different_secret", 30);

        let token = other
            .mint_access_token(Uuid::new_v4(), None)
            .expect("Token generation failed");

        assert!(jwt.decode(&token, false).is_err());
        assert!(jwt.decode(&token, true).is_err());
    }
}
