//! Registration and login against a [`UserStore`].

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};

use crate::{
    AuthError,
    model::{Preferences, User},
    store::UserStore,
};

pub fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AuthError::Hash(e.to_string()))
}

/// False for a wrong password and for a stored hash that cannot be parsed.
pub fn verify_password(password: &str, stored_hash: &str) -> bool {
    match PasswordHash::new(stored_hash) {
        Ok(parsed) => Argon2::default().verify_password(password.as_bytes(), &parsed).is_ok(),
        Err(e) => {
            tracing::warn!(error = %e, "stored password hash is malformed");
            false
        }
    }
}

fn required<'a>(value: &'a str, field: &'static str) -> Result<&'a str, AuthError> {
    let value = value.trim();
    if value.is_empty() { Err(AuthError::EmptyField(field)) } else { Ok(value) }
}

/// Create a user with empty preferences.
pub async fn register(
    store: &dyn UserStore,
    user_id: &str,
    name: &str,
    password: &str,
) -> Result<User, AuthError> {
    let user_id = required(user_id, "user id")?;
    let name = required(name, "name")?;
    let password = required(password, "password")?;

    if store.get(user_id).await?.is_some() {
        return Err(AuthError::UserExists(user_id.to_string()));
    }
    // Login is by name, so names must be unique too.
    if store.load_all().await?.iter().any(|u| u.name == name) {
        return Err(AuthError::NameTaken(name.to_string()));
    }

    let user = User {
        user_id: user_id.to_string(),
        name: name.to_string(),
        password_hash: hash_password(password)?,
        preferences: Preferences::default(),
    };
    store.save(&user).await?;

    tracing::info!(user_id = %user.user_id, "user registered");
    Ok(user)
}

/// Look a user up by name and check the password.
pub async fn login(store: &dyn UserStore, name: &str, password: &str) -> Result<User, AuthError> {
    let name = name.trim();
    let password = password.trim();

    let user = store
        .load_all()
        .await?
        .into_iter()
        .find(|u| u.name == name)
        .ok_or(AuthError::InvalidCredentials)?;

    if !verify_password(password, &user.password_hash) {
        tracing::info!(user_id = %user.user_id, "login rejected");
        return Err(AuthError::InvalidCredentials);
    }

    tracing::info!(user_id = %user.user_id, "login succeeded");
    Ok(user)
}
