use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::auth::jwt::{JwtManager, TokenKind};
use crate::auth::session;
use crate::db::models::user::User;
use crate::db::repositories::user_repository::UserRepository;
use crate::error::AppError;
use uuid::Uuid;

/// Extracteur d'authentification pour les routes protégées.
///
/// Lit le cookie de session `access_token`, vérifie signature ET expiration,
/// contrôle le type `access`, charge l'utilisateur et refuse les bannis.
/// Expose aussi le `refresh_token_id` embarqué, dont refresh et logout
/// ont besoin pour viser la bonne ligne refresh.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub user: User,
    pub refresh_token_id: Option<Uuid>,
}

impl FromRequestParts<JwtManager> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        jwt_manager: &JwtManager,
    ) -> Result<Self, Self::Rejection> {
        let token = session::read_access_token(&parts.headers)
            .ok_or_else(|| AppError::unauthorized("Not authenticated"))?;

        // Ici l'expiration compte: une session périmée doit repasser par login
        let claims = jwt_manager
            .decode(&token, true)
            .map_err(|_| AppError::unauthorized("Could not validate credentials"))?;

        if !claims.is_kind(TokenKind::Access) {
            return Err(AppError::unauthorized("Could not validate credentials"));
        }

        let user = UserRepository::find_by_id(claims.sub)
            .map_err(AppError::from)?
            .ok_or_else(|| AppError::unauthorized("Could not validate credentials"))?;

        if user.banned {
            return Err(AppError::unauthorized("Account is banned"));
        }

        Ok(CurrentUser {
            user,
            refresh_token_id: claims.refresh_token_id,
        })
    }
}

/// Variante réservée aux administrateurs.
#[derive(Debug, Clone)]
pub struct CurrentAdmin(pub User);

impl FromRequestParts<JwtManager> for CurrentAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        jwt_manager: &JwtManager,
    ) -> Result<Self, Self::Rejection> {
        let current = CurrentUser::from_request_parts(parts, jwt_manager).await?;

        if !current.user.is_admin() {
            return Err(AppError::unauthorized("Admin access required"));
        }

        Ok(CurrentAdmin(current.user))
    }
}
