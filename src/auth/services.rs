// src/auth/services.rs

use crate::error::AppError;

use crate::dto::requests::{LoginRequest, ResetPasswordRequest, SignupRequest, UpdateProfileRequest};

use crate::db::models::user::{NewUser, ROLE_USER, UpdateProfileChanges, User};
use crate::db::repositories::audit_log_repository::AuditLogRepository;
use crate::db::repositories::refresh_token_repository::RefreshTokenRepository;
use crate::db::repositories::user_repository::UserRepository;

use super::jwt::JwtManager;
use super::password::PasswordManager;
use super::validation::{
    is_protected_username, is_valid_email, is_valid_password, is_valid_username,
};

use chrono::{Duration, Utc};
use rand::Rng;
use rand::distributions::Alphanumeric;
use uuid::Uuid;

const PASSWORD_RESET_WINDOW_HOURS: i64 = 1;
const PASSWORD_RESET_TOKEN_LEN: usize = 48;

pub struct AuthService {
    jwt_manager: JwtManager,
}

impl AuthService {
    pub fn new(jwt_manager: JwtManager) -> Self {
        Self { jwt_manager }
    }

    /// Inscription: pas de session antérieure à récupérer, la ligne refresh
    /// est toujours neuve. Renvoie l'utilisateur créé et la nouvelle valeur
    /// du porteur de session.
    pub fn signup(&self, signup: SignupRequest) -> Result<(User, String), AppError> {
        Self::validate_new_username(&signup.username)?;

        if !is_valid_email(&signup.email) {
            return Err(AppError::validation("Invalid email"));
        }
        if UserRepository::find_by_email(&signup.email)?.is_some() {
            return Err(AppError::validation("Email already exists"));
        }

        if !is_valid_password(&signup.password) {
            return Err(AppError::validation(
                "Password must be between 8 and 128 characters",
            ));
        }

        let password_hash = PasswordManager::hash(&signup.password)?;

        let user = UserRepository::create(&NewUser {
            username: signup.username,
            email: signup.email,
            password_hash: Some(password_hash),
            role: ROLE_USER.to_string(),
            created: Utc::now(),
        })?;

        let refresh_token = RefreshTokenRepository::create(&self.jwt_manager, &user)?;
        let access_token = self
            .jwt_manager
            .mint_access_token(user.id, Some(refresh_token.id))?;

        Self::audit("signup", Some(user.id), None);

        Ok((user, access_token))
    }

    /// Connexion. `prior_session_token` est la valeur courante du porteur de
    /// session, même expirée; la nouvelle valeur à stocker est renvoyée.
    pub fn login(
        &self,
        login: &LoginRequest,
        prior_session_token: Option<&str>,
    ) -> Result<String, AppError> {
        let user = UserRepository::find_by_email(&login.email)?
            .ok_or_else(|| AppError::unauthorized("user-not-found"))?;

        let digest_matches = match user.password_hash.as_deref() {
            Some(digest) => PasswordManager::verify(&login.password, digest)?,
            // Compte jamais activé par mot de passe
            None => false,
        };
        if !digest_matches {
            return Err(AppError::unauthorized("invalid-password"));
        }

        // Décodage spéculatif du cookie restant en session, expiration ignorée,
        // pour retrouver la ligne refresh de la session précédente. Un cookie
        // corrompu ne bloque pas le login: c'est l'unique endroit du service
        // où une erreur de décodage est avalée, volontairement.
        let prior_refresh_id: Option<Uuid> = prior_session_token
            .and_then(|token| self.jwt_manager.decode(token, false).ok())
            .and_then(|claims| claims.refresh_token_id);

        let refresh_token =
            RefreshTokenRepository::rotate_or_create(&self.jwt_manager, &user, prior_refresh_id)?;

        let access_token = self
            .jwt_manager
            .mint_access_token(user.id, Some(refresh_token.id))?;

        Self::audit("login", Some(user.id), None);

        Ok(access_token)
    }

    /// Rafraîchissement: rotation stricte, aucun repli.
    ///
    /// Contrairement au login, un id invalide présenté par un appelant déjà
    /// authentifié signifie falsification ou expiration réelle: on refuse,
    /// on ne crée rien.
    pub fn refresh(&self, user: &User, refresh_token_id: Uuid) -> Result<String, AppError> {
        let rotated = RefreshTokenRepository::rotate(&self.jwt_manager, user.id, refresh_token_id)
            .map_err(|err| {
                if err.is_not_found() {
                    AppError::unauthorized("Invalid refresh token")
                } else {
                    AppError::from(err)
                }
            })?;

        let access_token = self.jwt_manager.mint_access_token(user.id, Some(rotated.id))?;

        Self::audit("refresh", Some(user.id), None);

        Ok(access_token)
    }

    /// Déconnexion: supprime la ligne refresh visée par la session.
    /// NotFound si elle n'existe plus (déjà déconnecté ailleurs).
    pub fn logout(user: &User, refresh_token_id: Uuid) -> Result<(), AppError> {
        RefreshTokenRepository::delete_for_user(user.id, refresh_token_id)
            .map_err(AppError::from)?;

        Self::audit("logout", Some(user.id), None);

        Ok(())
    }

    // === Profil ===

    pub fn update_profile(user: &User, update: UpdateProfileRequest) -> Result<User, AppError> {
        let mut changes = UpdateProfileChanges::default();

        if let Some(username) = update.username {
            Self::validate_new_username(&username)?;
            changes.username = Some(username);
        }

        if let Some(email) = update.email {
            if !is_valid_email(&email) {
                return Err(AppError::validation("Invalid email"));
            }
            if UserRepository::find_by_email(&email)?.is_some() {
                return Err(AppError::validation("Email already exists"));
            }
            changes.email = Some(email);
        }

        let updated = UserRepository::update_profile(user.id, &changes)?;

        Self::audit("change_profile", Some(user.id), None);

        Ok(updated)
    }

    /// Ouvre une fenêtre de réinitialisation d'une heure.
    pub fn make_password_reset_token(user: &User) -> Result<(), AppError> {
        let token = new_reset_token();
        let expire = Utc::now() + Duration::hours(PASSWORD_RESET_WINDOW_HOURS);

        UserRepository::set_password_reset(user.id, &token, expire)?;

        Self::audit("make_password_reset_token", Some(user.id), None);

        Ok(())
    }

    pub fn reset_password(user: &User, reset: &ResetPasswordRequest) -> Result<(), AppError> {
        if let Some(expire) = user.password_reset_expire
            && Utc::now() > expire
        {
            return Err(AppError::unauthorized("reset-expired"));
        }

        let digest = user
            .password_hash
            .as_deref()
            .ok_or_else(|| AppError::validation("Incorrect old password"))?;
        if !PasswordManager::verify(&reset.old_password, digest)? {
            return Err(AppError::validation("Incorrect old password"));
        }

        if !is_valid_password(&reset.password) {
            return Err(AppError::validation(
                "Password must be between 8 and 128 characters",
            ));
        }

        let new_hash = PasswordManager::hash(&reset.password)?;
        UserRepository::update_password(user.id, &new_hash)?;

        Self::audit("reset_password", Some(user.id), None);

        Ok(())
    }

    // === Helpers ===

    fn validate_new_username(username: &str) -> Result<(), AppError> {
        if !is_valid_username(username) || is_protected_username(username) {
            return Err(AppError::validation("Invalid username"));
        }
        if UserRepository::find_by_username(username)?.is_some() {
            return Err(AppError::validation("Username already exists"));
        }
        Ok(())
    }

    /// Journal d'audit en best-effort: un échec d'écriture ne doit pas
    /// annuler la mutation qui vient d'aboutir.
    pub(crate) fn audit(log_type: &str, user_id: Option<Uuid>, target_id: Option<Uuid>) {
        let _ = AuditLogRepository::append(log_type, user_id, target_id, None).inspect_err(|e| {
            tracing::warn!(log_type, "Failed to append audit log entry: {e}");
        });
    }
}

fn new_reset_token() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(PASSWORD_RESET_TOKEN_LEN)
        .map(char::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::connection::init_test_pool;
    use crate::db::repositories::refresh_token_repository::RefreshTokenRepository;

    fn make_service() -> AuthService {
        AuthService::new(JwtManager::new("auth_service_test_secret", 30))
    }

    fn unique_signup() -> SignupRequest {
        init_test_pool();

        let unique = Uuid::new_v4().simple().to_string();
        SignupRequest {
            username: format!("svc_{unique}"),
            email: format!("svc_{unique}@example.com"),
            password: "testpassword".to_string(),
        }
    }

    fn cleanup(user: &User) {
        let _ = UserRepository::delete(user.id);
    }

    #[test]
    fn audit_failure_never_bubbles_up() {
        // Sans pool de connexions, l'append échoue forcément: l'appel
        // doit rester silencieux, jamais paniquer ni remonter d'erreur.
        AuthService::audit("unit_test_event", None, None);
        AuthService::audit("unit_test_event", Some(Uuid::new_v4()), Some(Uuid::new_v4()));
    }

    #[test]
    fn reset_token_has_expected_length() {
        let token = new_reset_token();
        assert_eq!(token.len(), PASSWORD_RESET_TOKEN_LEN);
        assert!(token.chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    #[ignore = "requires a running Postgres (DATABASE_URL)"]
    fn signup_creates_user_and_one_refresh_row() {
        let service = make_service();
        let signup = unique_signup();

        let (user, access_token) = service.signup(signup).expect("signup");

        let claims = service
            .jwt_manager
            .decode(&access_token, true)
            .expect("decode");
        assert_eq!(claims.sub, user.id);

        let refresh_id = claims.refresh_token_id.expect("linked refresh row");
        let row = RefreshTokenRepository::find_for_user(user.id, refresh_id)
            .expect("query")
            .expect("refresh row exists");
        assert_eq!(row.user_id, user.id);

        cleanup(&user);
    }

    #[test]
    #[ignore = "requires a running Postgres (DATABASE_URL)"]
    fn signup_rejects_protected_username_before_any_row() {
        let service = make_service();
        let mut signup = unique_signup();
        let email = signup.email.clone();
        signup.username = "admin".to_string();

        let result = service.signup(signup);
        assert!(matches!(
            result.unwrap_err(),
            AppError::ValidationError(_)
        ));

        let leftover = UserRepository::find_by_email(&email).expect("query");
        assert!(leftover.is_none(), "no user row may exist");
    }

    #[test]
    #[ignore = "requires a running Postgres (DATABASE_URL)"]
    fn signup_rejects_duplicates_case_insensitively() {
        let service = make_service();
        let first = unique_signup();
        let (user, _) = service.signup(first.clone()).expect("first signup");

        let mut same_username = unique_signup();
        same_username.username = first.username.to_uppercase();
        assert!(service.signup(same_username).is_err());

        let mut same_email = unique_signup();
        same_email.email = first.email.to_uppercase();
        assert!(service.signup(same_email).is_err());

        cleanup(&user);
    }

    #[test]
    #[ignore = "requires a running Postgres (DATABASE_URL)"]
    fn login_rejects_wrong_password_without_touching_tokens() {
        let service = make_service();
        let signup = unique_signup();
        let email = signup.email.clone();
        let (user, access_token) = service.signup(signup).expect("signup");

        let before = service
            .jwt_manager
            .decode(&access_token, true)
            .expect("decode")
            .refresh_token_id
            .expect("refresh id");

        let result = service.login(
            &LoginRequest {
                email,
                password: "wrongpassword".to_string(),
            },
            None,
        );
        assert!(matches!(result.unwrap_err(), AppError::Unauthorized(_)));

        // La ligne refresh du signup est toujours là, intacte
        let row = RefreshTokenRepository::find_for_user(user.id, before)
            .expect("query")
            .expect("row survived the failed login");
        assert_eq!(row.id, before);

        cleanup(&user);
    }

    #[test]
    #[ignore = "requires a running Postgres (DATABASE_URL)"]
    fn login_with_stale_cookie_falls_back_to_fresh_refresh_row() {
        let service = make_service();
        let signup = unique_signup();
        let email = signup.email.clone();
        let password = signup.password.clone();
        let (user, _) = service.signup(signup).expect("signup");

        // Cookie pointant vers une ligne refresh qui n'existe pas
        let phantom = Uuid::new_v4();
        let stale_cookie = service
            .jwt_manager
            .mint_access_token(user.id, Some(phantom))
            .expect("mint");

        let new_session = service
            .login(&LoginRequest { email, password }, Some(&stale_cookie))
            .expect("login must succeed despite the orphan id");

        let claims = service
            .jwt_manager
            .decode(&new_session, true)
            .expect("decode");
        let new_id = claims.refresh_token_id.expect("fresh refresh id");
        assert_ne!(new_id, phantom);

        cleanup(&user);
    }

    #[test]
    #[ignore = "requires a running Postgres (DATABASE_URL)"]
    fn login_ignores_garbage_cookie() {
        let service = make_service();
        let signup = unique_signup();
        let email = signup.email.clone();
        let password = signup.password.clone();
        let (user, _) = service.signup(signup).expect("signup");

        let session = service
            .login(
                &LoginRequest { email, password },
                Some("not-even-a.jwt.token"),
            )
            .expect("login succeeds, the bad cookie is ignored");

        assert!(service.jwt_manager.decode(&session, true).is_ok());

        cleanup(&user);
    }

    #[test]
    #[ignore = "requires a running Postgres (DATABASE_URL)"]
    fn refresh_is_strict_about_unknown_ids() {
        let service = make_service();
        let (user, _) = service.signup(unique_signup()).expect("signup");

        let result = service.refresh(&user, Uuid::new_v4());
        assert!(matches!(result.unwrap_err(), AppError::Unauthorized(_)));

        cleanup(&user);
    }

    #[test]
    #[ignore = "requires a running Postgres (DATABASE_URL)"]
    fn refresh_rotates_in_place_and_old_session_keeps_working_id() {
        let service = make_service();
        let (user, session) = service.signup(unique_signup()).expect("signup");

        let first_id = service
            .jwt_manager
            .decode(&session, true)
            .expect("decode")
            .refresh_token_id
            .expect("refresh id");

        let new_session = service.refresh(&user, first_id).expect("refresh");
        let second_id = service
            .jwt_manager
            .decode(&new_session, true)
            .expect("decode")
            .refresh_token_id
            .expect("refresh id");

        // La rotation préserve l'identité de la ligne
        assert_eq!(first_id, second_id);

        // Donc un second refresh avec le même id passe aussi
        assert!(service.refresh(&user, second_id).is_ok());

        cleanup(&user);
    }

    #[test]
    #[ignore = "requires a running Postgres (DATABASE_URL)"]
    fn logout_then_refresh_is_rejected() {
        let service = make_service();
        let (user, session) = service.signup(unique_signup()).expect("signup");

        let refresh_id = service
            .jwt_manager
            .decode(&session, true)
            .expect("decode")
            .refresh_token_id
            .expect("refresh id");

        AuthService::logout(&user, refresh_id).expect("logout");

        let result = service.refresh(&user, refresh_id);
        assert!(matches!(result.unwrap_err(), AppError::Unauthorized(_)));

        // Et un second logout signale l'absence de la ligne
        let again = AuthService::logout(&user, refresh_id);
        assert!(matches!(again.unwrap_err(), AppError::NotFound(_)));

        cleanup(&user);
    }

    #[test]
    #[ignore = "requires a running Postgres (DATABASE_URL)"]
    fn reset_password_flow_verifies_old_password_and_window() {
        let service = make_service();
        let signup = unique_signup();
        let password = signup.password.clone();
        let (user, _) = service.signup(signup).expect("signup");

        AuthService::make_password_reset_token(&user).expect("make token");
        let user = UserRepository::find_by_id(user.id)
            .expect("query")
            .expect("exists");
        assert!(user.password_reset_token.is_some());

        let wrong = AuthService::reset_password(
            &user,
            &ResetPasswordRequest {
                old_password: "not-the-password".to_string(),
                password: "newpassword1".to_string(),
            },
        );
        assert!(matches!(wrong.unwrap_err(), AppError::ValidationError(_)));

        AuthService::reset_password(
            &user,
            &ResetPasswordRequest {
                old_password: password,
                password: "newpassword1".to_string(),
            },
        )
        .expect("reset");

        let after = UserRepository::find_by_id(user.id)
            .expect("query")
            .expect("exists");
        assert!(after.password_reset_token.is_none(), "token consumed");
        assert!(
            PasswordManager::verify("newpassword1", after.password_hash.as_deref().unwrap())
                .expect("verify")
        );

        cleanup(&user);
    }
}
