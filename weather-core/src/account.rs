use crate::{
    StoreError,
    model::{Preferences, User},
    store::UserStore,
};

/// True until the user has entered a location.
pub fn needs_preferences(user: &User) -> bool {
    user.preferences.is_empty()
}

/// Replace a user's preferences wholesale and persist the document.
pub async fn set_preferences(
    store: &dyn UserStore,
    user_id: &str,
    preferences: Preferences,
) -> Result<User, StoreError> {
    let mut user = store
        .get(user_id)
        .await?
        .ok_or_else(|| StoreError::NotFound(user_id.to_string()))?;

    user.preferences = preferences;
    store.update(&user).await?;

    tracing::info!(%user_id, "preferences updated");
    Ok(user)
}

/// `(user_id, name)` for every registered user, ordered by id.
pub async fn list_users(store: &dyn UserStore) -> Result<Vec<(String, String)>, StoreError> {
    let mut users: Vec<(String, String)> =
        store.load_all().await?.into_iter().map(|u| (u.user_id, u.name)).collect();
    users.sort();
    Ok(users)
}
