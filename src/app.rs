// src/app.rs

use axum::{
    Router,
    extract::Extension,
    routing::{get, patch, post},
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::auth::jwt::JwtManager;
use crate::auth::services::AuthService;
use crate::handlers::auth::{login, logout, refresh_token, signup};
use crate::handlers::health::health;
use crate::handlers::user::{
    admin_details, change_profile, create_receipt, create_receipt_product,
    make_password_reset_token, me, reset_password,
};

/// Configure les routes d'authentification
pub fn auth_routes(jwt_manager: JwtManager) -> Router {
    let auth_service = Arc::new(AuthService::new(jwt_manager.clone()));

    // Public endpoints (state: AuthService)
    let public = Router::new()
        .route("/registration", post(signup))
        .route("/login", post(login))
        .with_state(auth_service.clone());

    // Protected endpoints (state: JwtManager) using CurrentUser
    let protected = Router::new()
        .route("/refresh", post(refresh_token))
        .route("/logout", post(logout))
        .with_state(jwt_manager)
        .layer(Extension(auth_service));

    public.merge(protected)
}

/// Configure les routes utilisateur
pub fn user_routes(jwt_manager: JwtManager) -> Router {
    Router::new()
        .route("/me", get(me))
        .route("/change/profile", patch(change_profile))
        .route("/make/password_reset_token", post(make_password_reset_token))
        .route("/reset_password", post(reset_password))
        .route("/admin", get(admin_details))
        .route("/receipt", post(create_receipt))
        .route("/product", post(create_receipt_product))
        // Fournit JwtManager en state pour les extracteurs CurrentUser/CurrentAdmin
        .with_state(jwt_manager)
}

/// Construit l'application complète
pub fn build_router(jwt_manager: JwtManager) -> Router {
    Router::new()
        .route("/health", get(health))
        .nest("/auth", auth_routes(jwt_manager.clone()))
        .nest("/users", user_routes(jwt_manager))
        // Middleware global de tracing
        .layer(TraceLayer::new_for_http())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use tower::ServiceExt; // for oneshot

    fn test_jwt() -> JwtManager {
        JwtManager::new("test_secret_for_routes", 30)
    }

    #[tokio::test]
    async fn health_answers_ok() {
        let app = build_router(test_jwt());

        let req = Request::builder()
            .uri("/health")
            .body(Body::empty())
            .unwrap();

        let resp = app.oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn logout_without_session_cookie_is_unauthorized() {
        let app = auth_routes(test_jwt());

        let req = Request::builder()
            .uri("/logout")
            .method("POST")
            .body(Body::empty())
            .unwrap();

        let resp = app.oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn refresh_with_garbage_cookie_is_unauthorized() {
        let app = auth_routes(test_jwt());

        let req = Request::builder()
            .uri("/refresh")
            .method("POST")
            .header(header::COOKIE, "access_token=not-a-real.jwt.value")
            .body(Body::empty())
            .unwrap();

        let resp = app.oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn me_rejects_refresh_secret_used_as_session_token() {
        let jwt = test_jwt();
        let app = user_routes(jwt.clone());

        // Un secret refresh signé est valide côté signature, mais n'est
        // pas un access token: la garde de type doit le refuser.
        let refresh_secret = jwt
            .mint_refresh_secret(uuid::Uuid::new_v4())
            .expect("mint");

        let req = Request::builder()
            .uri("/me")
            .header(
                header::COOKIE,
                format!("access_token={refresh_secret}"),
            )
            .body(Body::empty())
            .unwrap();

        let resp = app.oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }
}
