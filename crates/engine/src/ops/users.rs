use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::{
    EngineError, Identity, ResultEngine, User,
    password::{hash_password, verify_password},
    util::normalize_required_text,
};

use super::Engine;

impl Engine {
    /// Registers a user. The email becomes the user's [`Identity`].
    pub async fn sign_up(
        &self,
        username: &str,
        email: &str,
        password: &str,
        now: DateTime<Utc>,
    ) -> ResultEngine<User> {
        let username = normalize_required_text(username, "username")?;
        let email = normalize_required_text(email, "email")?;
        if !email.contains('@') {
            return Err(EngineError::InvalidAmount("invalid email".to_string()));
        }
        if password.is_empty() {
            return Err(EngineError::InvalidAmount(
                "password must not be empty".to_string(),
            ));
        }

        let email = Identity::new(email);
        if self.users.find_user(&email).await?.is_some() {
            return Err(EngineError::ExistingKey(email.to_string()));
        }

        let user = User {
            id: Uuid::new_v4(),
            username,
            email,
            password_hash: hash_password(password)?,
            created_at: now,
        };
        self.users.insert_user(&user).await?;

        tracing::info!(user = %user.id, "user registered");
        Ok(user)
    }

    /// Checks email/password and returns the matching user.
    ///
    /// Unknown email and wrong password are indistinguishable to the caller.
    pub async fn authenticate(&self, email: &str, password: &str) -> ResultEngine<User> {
        let invalid = || EngineError::Unauthorized("invalid credentials".to_string());

        let user = self
            .users
            .find_user(&Identity::new(email))
            .await?
            .ok_or_else(invalid)?;
        if !verify_password(password, &user.password_hash)? {
            return Err(invalid());
        }

        Ok(user)
    }

    /// Profile of an authenticated identity.
    pub async fn user(&self, identity: &Identity) -> ResultEngine<User> {
        self.users
            .find_user(identity)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("user not found".to_string()))
    }
}
