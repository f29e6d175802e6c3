use chrono::Utc;
use sea_orm::sea_query::OnConflict;
use sea_orm::{ConnectionTrait, EntityTrait, Set};

use crate::errors::InternalError;
use crate::types::db::system_settings::{self, Entity as SystemSetting, FEEDBACK_ACTIVE, FEEDBACK_SESSION};

/// Current feedback gate values
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedbackGateSettings {
    pub active: bool,
    pub session: String,
}

/// Key/value system settings
///
/// Missing keys read as their defaults (`feedback_active` = false,
/// `feedback_session` = empty), so a fresh database behaves like the seeded one.
pub struct SystemSettingsStore {}

impl SystemSettingsStore {
    pub fn new() -> Self {
        Self {}
    }

    pub async fn get_value(
        &self,
        conn: &impl ConnectionTrait,
        key: &str,
    ) -> Result<Option<String>, InternalError> {
        let setting = SystemSetting::find_by_id(key)
            .one(conn)
            .await
            .map_err(|e| InternalError::database("get_system_setting", e))?;

        Ok(setting.map(|s| s.value))
    }

    /// Insert or overwrite a setting value
    pub async fn set_value(
        &self,
        conn: &impl ConnectionTrait,
        key: &str,
        value: &str,
    ) -> Result<(), InternalError> {
        let now = Utc::now().timestamp();
        let active_model = system_settings::ActiveModel {
            key: Set(key.to_string()),
            value: Set(value.to_string()),
            description: Set(None),
            category: Set(Some("feedback".to_string())),
            created_at: Set(now),
            updated_at: Set(now),
        };

        SystemSetting::insert(active_model)
            .on_conflict(
                OnConflict::column(system_settings::Column::Key)
                    .update_columns([system_settings::Column::Value, system_settings::Column::UpdatedAt])
                    .to_owned(),
            )
            .exec(conn)
            .await
            .map_err(|e| InternalError::database("set_system_setting", e))?;

        Ok(())
    }

    pub async fn get_feedback_settings(
        &self,
        conn: &impl ConnectionTrait,
    ) -> Result<FeedbackGateSettings, InternalError> {
        let active = self
            .get_value(conn, FEEDBACK_ACTIVE)
            .await?
            .map(|v| v.trim().eq_ignore_ascii_case("true"))
            .unwrap_or(false);
        let session = self.get_value(conn, FEEDBACK_SESSION).await?.unwrap_or_default();

        Ok(FeedbackGateSettings { active, session })
    }

    /// Write both feedback keys; pass a transaction so they change together
    pub async fn set_feedback_settings(
        &self,
        conn: &impl ConnectionTrait,
        settings: &FeedbackGateSettings,
    ) -> Result<(), InternalError> {
        let active = if settings.active { "true" } else { "false" };
        self.set_value(conn, FEEDBACK_ACTIVE, active).await?;
        self.set_value(conn, FEEDBACK_SESSION, &settings.session).await?;

        tracing::info!(
            active = settings.active,
            session = %settings.session,
            "Feedback settings updated"
        );

        Ok(())
    }
}

impl Default for SystemSettingsStore {
    fn default() -> Self {
        Self::new()
    }
}
