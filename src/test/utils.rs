// Test utilities shared across unit tests
// Only compiled when running tests

use std::sync::{Arc, Mutex};

use chrono::Utc;
use migration::{MigratorTrait, PortalMigrator};
use poem_openapi::auth::Bearer;
use sea_orm::{Database, DatabaseConnection};
use uuid::Uuid;

use crate::api::BearerAuth;
use crate::app_data::AppData;
use crate::config::{BootstrapSettings, JWT_SECRET_VAR, MapEnvironment, OTP_PEPPER_VAR, SecretManager};
use crate::errors::InternalError;
use crate::providers::OtpSender;
use crate::types::db::{UserRole, user};
use crate::types::internal::context::RequestContext;

pub const TEST_JWT_SECRET: &str = "test-secret-key-minimum-32-characters-long";
pub const TEST_OTP_PEPPER: &str = "test-pepper-for-unit-tests";

/// OTP sender that keeps every code it is asked to deliver
#[derive(Default)]
pub struct RecordingOtpSender {
    sent: Mutex<Vec<(String, String)>>,
}

impl RecordingOtpSender {
    pub fn last_code_for(&self, email: &str) -> Option<String> {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .rev()
            .find(|(to, _)| to == email)
            .map(|(_, code)| code.clone())
    }
}

impl OtpSender for RecordingOtpSender {
    fn send(&self, email: &str, code: &str) -> Result<(), InternalError> {
        self.sent.lock().unwrap().push((email.to_string(), code.to_string()));
        Ok(())
    }
}

/// Creates an in-memory database with migrations applied
pub async fn setup_test_db() -> DatabaseConnection {
    let db = Database::connect("sqlite::memory:")
        .await
        .expect("Failed to create test database");

    PortalMigrator::up(&db, None)
        .await
        .expect("Failed to run migrations");

    db
}

/// Creates AppData over a fresh database, with test secrets and a recording OTP sender
pub async fn setup_test_app_data() -> (Arc<AppData>, Arc<RecordingOtpSender>) {
    let db = setup_test_db().await;
    let env = MapEnvironment::empty().with_vars(&[(JWT_SECRET_VAR, TEST_JWT_SECRET), (OTP_PEPPER_VAR, TEST_OTP_PEPPER)]);
    let secret_manager = SecretManager::from_env_provider(&env).expect("Failed to load test secrets");
    let settings = BootstrapSettings::from_env_provider(&env).expect("Failed to load test settings");
    let sender = Arc::new(RecordingOtpSender::default());

    let app_data = AppData::with_parts(db, secret_manager, &settings, sender.clone());
    (Arc::new(app_data), sender)
}

/// Inserts a user directly through the store, skipping profile validation
pub async fn create_test_user(
    app_data: &AppData,
    role: UserRole,
    email: &str,
    department: Option<&str>,
    year: Option<i32>,
) -> user::Model {
    let now = Utc::now().timestamp();
    let is_student = role == UserRole::Student;

    app_data
        .user_store
        .create_user(
            &app_data.db,
            user::Model {
                id: Uuid::new_v4().to_string(),
                email: email.to_string(),
                name: email.split('@').next().unwrap_or(email).to_string(),
                role,
                entry_number: is_student.then(|| format!("E{}", &Uuid::new_v4().simple().to_string()[..8])),
                department: department.map(str::to_string),
                year,
                semester: is_student.then_some(1),
                created_at: now,
                updated_at: now,
            },
        )
        .await
        .expect("Failed to create test user")
}

pub async fn create_test_student(app_data: &AppData, email: &str, department: &str, year: i32) -> user::Model {
    create_test_user(app_data, UserRole::Student, email, Some(department), Some(year)).await
}

/// Authenticated context for `user`, as the API layer would build it
pub fn context_for(app_data: &AppData, user: &user::Model) -> RequestContext {
    let (_, claims) = app_data
        .token_provider
        .generate_jwt(user)
        .expect("Failed to generate test token");
    RequestContext::for_system("test").with_auth(claims)
}

pub fn bearer_for(app_data: &AppData, user: &user::Model) -> BearerAuth {
    let (token, _) = app_data
        .token_provider
        .generate_jwt(user)
        .expect("Failed to generate test token");
    BearerAuth(Bearer { token })
}
