use crate::auth::jwt::{JwtManager, REFRESH_TOKEN_TTL_DAYS};
use crate::db::connection::get_connection;
use crate::db::error::RepositoryError;
use crate::db::models::refresh_token::{NewRefreshToken, REFRESH_TOKEN_TYPE, RefreshToken};
use crate::db::models::user::User;
use crate::db::schema::refresh_tokens;
use chrono::{Duration, Utc};
use diesel::prelude::*;
use uuid::Uuid;

pub struct RefreshTokenRepository;

impl RefreshTokenRepository {
    /// Crée une nouvelle ligne refresh pour l'utilisateur, secret fraîchement signé.
    pub fn create(jwt: &JwtManager, user: &User) -> Result<RefreshToken, RepositoryError> {
        let mut conn = get_connection()?;

        let now = Utc::now();
        let secret = jwt
            .mint_refresh_secret(user.id)
            .map_err(|e| RepositoryError::TokenGeneration(e.to_string()))?;

        let new_token = NewRefreshToken {
            user_id: user.id,
            secret,
            token_type: REFRESH_TOKEN_TYPE.to_string(),
            expiration: now + Duration::days(REFRESH_TOKEN_TTL_DAYS),
            created: now,
        };

        diesel::insert_into(refresh_tokens::table)
            .values(&new_token)
            .get_result::<RefreshToken>(&mut conn)
            .map_err(Into::into)
    }

    /// Lookup scopé: (id, user, kind=refresh). Le chemin normal.
    pub fn find_for_user(
        user_id: Uuid,
        token_id: Uuid,
    ) -> Result<Option<RefreshToken>, RepositoryError> {
        let mut conn = get_connection()?;

        refresh_tokens::table
            .filter(refresh_tokens::id.eq(token_id))
            .filter(refresh_tokens::user_id.eq(user_id))
            .filter(refresh_tokens::token_type.eq(REFRESH_TOKEN_TYPE))
            .first::<RefreshToken>(&mut conn)
            .optional()
            .map_err(Into::into)
    }

    /// Lookup sans propriétaire: réservé au nettoyage des ids orphelins.
    /// Ne jamais s'en servir comme lookup générique.
    pub fn find_unscoped(token_id: Uuid) -> Result<Option<RefreshToken>, RepositoryError> {
        let mut conn = get_connection()?;

        refresh_tokens::table
            .filter(refresh_tokens::id.eq(token_id))
            .filter(refresh_tokens::token_type.eq(REFRESH_TOKEN_TYPE))
            .first::<RefreshToken>(&mut conn)
            .optional()
            .map_err(Into::into)
    }

    /// Rotation: remplace secret/expiration/created en place, l'id est préservé.
    ///
    /// Un seul UPDATE filtré par (id, user, kind): deux rotations concurrentes
    /// sur la même ligne se résolvent en last-writer-wins. Renvoie NotFound
    /// si la ligne n'existe pas ou n'appartient pas à l'utilisateur.
    pub fn rotate(
        jwt: &JwtManager,
        user_id: Uuid,
        token_id: Uuid,
    ) -> Result<RefreshToken, RepositoryError> {
        let mut conn = get_connection()?;

        let now = Utc::now();
        let secret = jwt
            .mint_refresh_secret(user_id)
            .map_err(|e| RepositoryError::TokenGeneration(e.to_string()))?;

        diesel::update(
            refresh_tokens::table
                .filter(refresh_tokens::id.eq(token_id))
                .filter(refresh_tokens::user_id.eq(user_id))
                .filter(refresh_tokens::token_type.eq(REFRESH_TOKEN_TYPE)),
        )
        .set((
            refresh_tokens::secret.eq(secret),
            refresh_tokens::expiration.eq(now + Duration::days(REFRESH_TOKEN_TTL_DAYS)),
            refresh_tokens::created.eq(now),
        ))
        .get_result::<RefreshToken>(&mut conn)
        .map_err(Into::into)
    }

    pub fn delete_for_user(user_id: Uuid, token_id: Uuid) -> Result<(), RepositoryError> {
        let mut conn = get_connection()?;

        let deleted = diesel::delete(
            refresh_tokens::table
                .filter(refresh_tokens::id.eq(token_id))
                .filter(refresh_tokens::user_id.eq(user_id))
                .filter(refresh_tokens::token_type.eq(REFRESH_TOKEN_TYPE)),
        )
        .execute(&mut conn)?;

        if deleted == 0 {
            return Err(RepositoryError::NotFound(format!(
                "Refresh token {token_id} not found for user {user_id}"
            )));
        }
        Ok(())
    }

    /// Suppression sans contrôle de propriétaire, pour les lignes orphelines.
    pub fn delete_unscoped(token_id: Uuid) -> Result<(), RepositoryError> {
        let mut conn = get_connection()?;

        let deleted = diesel::delete(
            refresh_tokens::table
                .filter(refresh_tokens::id.eq(token_id))
                .filter(refresh_tokens::token_type.eq(REFRESH_TOKEN_TYPE)),
        )
        .execute(&mut conn)?;

        if deleted == 0 {
            return Err(RepositoryError::NotFound(format!(
                "Refresh token {token_id} not found"
            )));
        }
        Ok(())
    }

    /// Algorithme de récupération du login.
    ///
    /// - pas d'id: première session, créer une ligne neuve;
    /// - id connu: tenter la rotation;
    /// - rotation en échec (id étranger ou disparu): supprimer la ligne
    ///   orpheline au mieux, puis repartir d'une ligne neuve.
    pub fn rotate_or_create(
        jwt: &JwtManager,
        user: &User,
        token_id: Option<Uuid>,
    ) -> Result<RefreshToken, RepositoryError> {
        let Some(token_id) = token_id else {
            return Self::create(jwt, user);
        };

        match Self::rotate(jwt, user.id, token_id) {
            Ok(token) => Ok(token),
            Err(err) if err.is_not_found() => {
                if let Err(cleanup_err) = Self::delete_unscoped(token_id) {
                    tracing::debug!(%token_id, "Orphan refresh token cleanup: {cleanup_err}");
                }
                Self::create(jwt, user)
            }
            Err(err) => Err(err),
        }
    }
}
