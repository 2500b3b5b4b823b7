use crate::db::connection::get_connection;
use crate::db::error::RepositoryError;
use crate::db::models::user::{NewUser, UpdateProfileChanges, User};
use crate::db::schema::users;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel::sql_types::Text;
use uuid::Uuid;

diesel::define_sql_function! {
    fn lower(x: Text) -> Text;
}

pub struct UserRepository;

impl UserRepository {
    pub fn find_by_id(id: Uuid) -> Result<Option<User>, RepositoryError> {
        let mut conn = get_connection()?;

        users::table
            .filter(users::id.eq(id))
            .first::<User>(&mut conn)
            .optional()
            .map_err(Into::into)
    }

    /// Recherche insensible à la casse, unicité des usernames oblige.
    pub fn find_by_username(username: &str) -> Result<Option<User>, RepositoryError> {
        let mut conn = get_connection()?;

        users::table
            .filter(lower(users::username).eq(username.to_lowercase()))
            .first::<User>(&mut conn)
            .optional()
            .map_err(Into::into)
    }

    /// Recherche insensible à la casse sur l'email.
    pub fn find_by_email(email: &str) -> Result<Option<User>, RepositoryError> {
        let mut conn = get_connection()?;

        users::table
            .filter(lower(users::email).eq(email.to_lowercase()))
            .first::<User>(&mut conn)
            .optional()
            .map_err(Into::into)
    }

    pub fn create(new_user: &NewUser) -> Result<User, RepositoryError> {
        let mut conn = get_connection()?;

        diesel::insert_into(users::table)
            .values(new_user)
            .get_result::<User>(&mut conn)
            .map_err(Into::into)
    }

    pub fn update_profile(
        id: Uuid,
        changes: &UpdateProfileChanges,
    ) -> Result<User, RepositoryError> {
        let mut conn = get_connection()?;

        diesel::update(users::table.filter(users::id.eq(id)))
            .set(changes)
            .get_result::<User>(&mut conn)
            .map_err(Into::into)
    }

    /// Pose le token de réinitialisation et sa fenêtre de validité.
    pub fn set_password_reset(
        id: Uuid,
        token: &str,
        expire: DateTime<Utc>,
    ) -> Result<(), RepositoryError> {
        let mut conn = get_connection()?;

        diesel::update(users::table.filter(users::id.eq(id)))
            .set((
                users::password_reset_token.eq(token),
                users::password_reset_expire.eq(expire),
            ))
            .execute(&mut conn)?;

        Ok(())
    }

    /// Nouveau digest, et le token de reset est consommé dans la foulée.
    pub fn update_password(id: Uuid, new_password_hash: &str) -> Result<(), RepositoryError> {
        let mut conn = get_connection()?;

        diesel::update(users::table.filter(users::id.eq(id)))
            .set((
                users::password_hash.eq(new_password_hash),
                users::password_reset_token.eq(None::<String>),
                users::password_reset_expire.eq(None::<DateTime<Utc>>),
            ))
            .execute(&mut conn)?;

        Ok(())
    }

    pub fn delete(id: Uuid) -> Result<(), RepositoryError> {
        let mut conn = get_connection()?;

        diesel::delete(users::table.filter(users::id.eq(id))).execute(&mut conn)?;

        Ok(())
    }
}
