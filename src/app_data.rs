use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::config::{BootstrapSettings, SecretManager};
use crate::errors::InternalError;
use crate::providers::{LogOtpSender, OtpSender, TokenProvider};
use crate::stores::{
    CourseStore, EnrollmentStore, FeedbackStore, OtpStore, SystemSettingsStore, UserStore,
};

/// Centralized application data following the main-owned stores pattern
///
/// All dependencies are created once in main.rs and shared across coordinators.
///
/// ```text
/// main.rs
///   ↓
/// AppData::init()
///   ├─ db (DatabaseConnection)
///   ├─ secret_manager / token_provider / otp_sender
///   └─ one Arc per store
///   ↓ wrapped in Arc<AppData>
///   ↓ passed to coordinators
///   └─ XCoordinator::new(app_data) → extracts stores, creates providers
/// ```
pub struct AppData {
    pub db: DatabaseConnection,
    pub secret_manager: Arc<SecretManager>,
    pub token_provider: Arc<TokenProvider>,
    pub otp_sender: Arc<dyn OtpSender>,
    pub otp_expiration_minutes: i64,
    pub user_store: Arc<UserStore>,
    pub course_store: Arc<CourseStore>,
    pub enrollment_store: Arc<EnrollmentStore>,
    pub feedback_store: Arc<FeedbackStore>,
    pub settings_store: Arc<SystemSettingsStore>,
    pub otp_store: Arc<OtpStore>,
}

impl AppData {
    /// Initialize application data from the process environment
    ///
    /// The database should be connected and migrated before calling this.
    ///
    /// # Errors
    ///
    /// Returns `InternalError` when secret manager initialization fails
    pub fn init(db: DatabaseConnection, settings: &BootstrapSettings) -> Result<Self, InternalError> {
        tracing::info!("Initializing AppData...");

        let secret_manager = SecretManager::init()
            .map_err(|e| InternalError::parse("secret_manager", format!("Secret manager init failed: {}", e)))?;
        tracing::debug!("Secret manager initialized");

        let app_data = Self::with_parts(db, secret_manager, settings, Arc::new(LogOtpSender));

        tracing::info!("AppData initialization complete");
        Ok(app_data)
    }

    /// Assemble application data from already-loaded parts
    pub fn with_parts(
        db: DatabaseConnection,
        secret_manager: SecretManager,
        settings: &BootstrapSettings,
        otp_sender: Arc<dyn OtpSender>,
    ) -> Self {
        let secret_manager = Arc::new(secret_manager);
        let token_provider = Arc::new(TokenProvider::new(
            secret_manager.clone(),
            settings.jwt_expiration_minutes(),
        ));

        Self {
            db,
            secret_manager,
            token_provider,
            otp_sender,
            otp_expiration_minutes: settings.otp_expiration_minutes(),
            user_store: Arc::new(UserStore::new()),
            course_store: Arc::new(CourseStore::new()),
            enrollment_store: Arc::new(EnrollmentStore::new()),
            feedback_store: Arc::new(FeedbackStore::new()),
            settings_store: Arc::new(SystemSettingsStore::new()),
            otp_store: Arc::new(OtpStore::new()),
        }
    }
}
