use anyhow::Result;

use super::schema::Database;
use super::types::Identity;

pub(super) const PREF_IDENTITY_NAME: &str = "identity.name";
pub(super) const PREF_IDENTITY_EMAIL: &str = "identity.email";

/// Premium status is keyed per username, so signing out and back in under
/// the same name restores it.
pub(super) const PREMIUM_PREFIX: &str = "premium.";

/// UPSERT one preference row on an explicit connection. Shared by
/// [`Database::set_preference`] and the snapshot importer's transaction.
pub(super) async fn upsert_preference(
    conn: &mut sqlx::SqliteConnection,
    key: &str,
    value: &str,
) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO user_preferences (key, value, updated_at)
        VALUES (?, ?, datetime('now'))
        ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at
    "#,
    )
    .bind(key)
    .bind(value)
    .execute(conn)
    .await?;

    Ok(())
}

impl Database {
    // ========================================================================
    // User Preferences Operations
    // ========================================================================

    /// Get a single preference value by key.
    ///
    /// Keys use dotted convention: `identity.name`, `premium.<username>`, etc.
    pub async fn get_preference(&self, key: &str) -> Result<Option<String>> {
        let row: Option<(String,)> =
            sqlx::query_as("SELECT value FROM user_preferences WHERE key = ?")
                .bind(key)
                .fetch_optional(&self.pool)
                .await?;

        Ok(row.map(|(value,)| value))
    }

    /// Set a preference value (UPSERT).
    pub async fn set_preference(&self, key: &str, value: &str) -> Result<()> {
        let mut conn = self.pool.acquire().await?;
        upsert_preference(&mut *conn, key, value).await
    }

    /// Remove a preference key. Missing keys are a no-op.
    pub async fn delete_preference(&self, key: &str) -> Result<()> {
        sqlx::query("DELETE FROM user_preferences WHERE key = ?")
            .bind(key)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Get all preferences matching a key prefix, ordered by key.
    ///
    /// Useful for loading grouped settings (e.g., all `premium.*` entries).
    pub async fn get_preferences_by_prefix(&self, prefix: &str) -> Result<Vec<(String, String)>> {
        let pattern = format!("{}%", prefix);
        let rows: Vec<(String, String)> =
            sqlx::query_as("SELECT key, value FROM user_preferences WHERE key LIKE ? ORDER BY key")
                .bind(&pattern)
                .fetch_all(&self.pool)
                .await?;

        Ok(rows)
    }

    // ========================================================================
    // Identity
    // ========================================================================

    /// The signed-in identity, if any. A stored name is what makes the
    /// session signed in; the email is optional detail.
    pub async fn load_identity(&self) -> Result<Option<Identity>> {
        let name = match self.get_preference(PREF_IDENTITY_NAME).await? {
            Some(name) if !name.is_empty() => name,
            _ => return Ok(None),
        };
        let email = self
            .get_preference(PREF_IDENTITY_EMAIL)
            .await?
            .unwrap_or_default();

        Ok(Some(Identity { name, email }))
    }

    pub async fn save_identity(&self, identity: &Identity) -> Result<()> {
        self.set_preference(PREF_IDENTITY_NAME, &identity.name)
            .await?;
        self.set_preference(PREF_IDENTITY_EMAIL, &identity.email)
            .await?;
        Ok(())
    }

    /// Sign out: removes the identity keys. Premium flags stay, keyed by
    /// username, so a returning user keeps their plan.
    pub async fn clear_identity(&self) -> Result<()> {
        self.delete_preference(PREF_IDENTITY_NAME).await?;
        self.delete_preference(PREF_IDENTITY_EMAIL).await?;
        Ok(())
    }

    // ========================================================================
    // Premium
    // ========================================================================

    pub async fn is_premium(&self, username: &str) -> Result<bool> {
        let key = format!("{}{}", PREMIUM_PREFIX, username);
        Ok(self.get_preference(&key).await?.as_deref() == Some("true"))
    }

    pub async fn set_premium(&self, username: &str) -> Result<()> {
        let key = format!("{}{}", PREMIUM_PREFIX, username);
        self.set_preference(&key, "true").await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn test_db() -> Database {
        Database::open(":memory:").await.unwrap()
    }

    fn ada() -> Identity {
        Identity {
            name: "Ada Lovelace".to_string(),
            email: "ada@example.com".to_string(),
        }
    }

    #[tokio::test]
    async fn test_get_preference_missing() {
        let db = test_db().await;
        let value = db.get_preference("nonexistent.key").await.unwrap();
        assert_eq!(value, None);
    }

    #[tokio::test]
    async fn test_set_preference_upsert() {
        let db = test_db().await;
        db.set_preference("identity.name", "Ada").await.unwrap();
        db.set_preference("identity.name", "Grace").await.unwrap();

        let value = db.get_preference("identity.name").await.unwrap();
        assert_eq!(value, Some("Grace".to_string()));
    }

    #[tokio::test]
    async fn test_get_preferences_by_prefix_no_false_matches() {
        let db = test_db().await;
        db.set_preference("premium.Ada", "true").await.unwrap();
        db.set_preference("premiumish.key", "test").await.unwrap();

        let prefs = db.get_preferences_by_prefix("premium.").await.unwrap();
        assert_eq!(prefs.len(), 1);
        assert_eq!(prefs[0].0, "premium.Ada");
    }

    #[tokio::test]
    async fn test_identity_round_trip() {
        let db = test_db().await;
        assert!(db.load_identity().await.unwrap().is_none());

        db.save_identity(&ada()).await.unwrap();
        let loaded = db.load_identity().await.unwrap().unwrap();
        assert_eq!(loaded.name, "Ada Lovelace");
        assert_eq!(loaded.email, "ada@example.com");
    }

    #[tokio::test]
    async fn test_clear_identity_signs_out() {
        let db = test_db().await;
        db.save_identity(&ada()).await.unwrap();
        db.clear_identity().await.unwrap();

        assert!(db.load_identity().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_premium_survives_sign_out() {
        let db = test_db().await;
        db.save_identity(&ada()).await.unwrap();
        db.set_premium("Ada Lovelace").await.unwrap();

        db.clear_identity().await.unwrap();
        db.save_identity(&ada()).await.unwrap();

        assert!(db.is_premium("Ada Lovelace").await.unwrap());
        assert!(!db.is_premium("Grace Hopper").await.unwrap());
    }

    #[tokio::test]
    async fn test_empty_name_is_signed_out() {
        let db = test_db().await;
        db.set_preference("identity.name", "").await.unwrap();
        assert!(db.load_identity().await.unwrap().is_none());
    }
}
