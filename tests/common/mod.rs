// Common test utilities for integration tests

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use academic_portal::AppData;
use academic_portal::config::{BootstrapSettings, JWT_SECRET_VAR, MapEnvironment, OTP_PEPPER_VAR, SecretManager};
use academic_portal::coordinators::{
    AdminCoordinator, AuthCoordinator, CourseCoordinator, EnrollmentCoordinator, FeedbackCoordinator,
};
use academic_portal::errors::InternalError;
use academic_portal::providers::course_lifecycle::CourseOffer;
use academic_portal::providers::{OtpSender, UserProfile};
use academic_portal::types::db::{UserRole, course, user};
use academic_portal::types::internal::Decision;
use academic_portal::types::internal::context::RequestContext;
use migration::{MigratorTrait, PortalMigrator};
use chrono::Utc;
use sea_orm::{Database, DatabaseConnection};
use uuid::Uuid;

pub const SESSION: &str = "2024-25-I";

/// OTP sender that keeps codes in memory instead of delivering them
#[derive(Default)]
pub struct CapturingOtpSender {
    codes: Mutex<Vec<(String, String)>>,
}

impl CapturingOtpSender {
    pub fn code_for(&self, email: &str) -> Option<String> {
        self.codes
            .lock()
            .unwrap()
            .iter()
            .rev()
            .find(|(to, _)| to == email)
            .map(|(_, code)| code.clone())
    }
}

impl OtpSender for CapturingOtpSender {
    fn send(&self, email: &str, code: &str) -> Result<(), InternalError> {
        self.codes.lock().unwrap().push((email.to_string(), code.to_string()));
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

/// Every coordinator wired over one fresh database
pub struct Portal {
    pub app_data: Arc<AppData>,
    pub otp_sender: Arc<CapturingOtpSender>,
    pub auth: AuthCoordinator,
    pub courses: CourseCoordinator,
    pub enrollments: EnrollmentCoordinator,
    pub feedback: FeedbackCoordinator,
    pub admin: AdminCoordinator,
}

impl Portal {
    pub async fn new() -> Self {
        let db = setup_test_db().await;
        let env = MapEnvironment::empty().with_vars(&[
            (JWT_SECRET_VAR, "integration-test-secret-at-least-32-chars"),
            (OTP_PEPPER_VAR, "integration-pepper"),
        ]);
        let secret_manager = SecretManager::from_env_provider(&env).expect("Failed to load secrets");
        let settings = BootstrapSettings::from_env_provider(&env).expect("Failed to load settings");
        let otp_sender = Arc::new(CapturingOtpSender::default());

        let app_data = Arc::new(AppData::with_parts(db, secret_manager, &settings, otp_sender.clone()));

        Self {
            auth: AuthCoordinator::new(app_data.clone()),
            courses: CourseCoordinator::new(app_data.clone()),
            enrollments: EnrollmentCoordinator::new(app_data.clone()),
            feedback: FeedbackCoordinator::new(app_data.clone()),
            admin: AdminCoordinator::new(app_data.clone()),
            otp_sender,
            app_data,
        }
    }

    /// Authenticated context for `user`, built from a freshly issued token
    pub fn login_as(&self, user: &user::Model) -> RequestContext {
        let (token, _) = self
            .app_data
            .token_provider
            .generate_jwt(user)
            .expect("Failed to generate token");
        let claims = self
            .app_data
            .token_provider
            .validate_jwt(&token)
            .expect("Failed to validate token");
        RequestContext::for_system("integration-test").with_auth(claims)
    }

    async fn signup(&self, role: UserRole, profile: UserProfile) -> user::Model {
        self.auth
            .signup(&RequestContext::for_system("integration-test"), role, profile)
            .await
            .expect("Failed to sign up test user")
    }

    pub async fn student(&self, email: &str, entry_number: &str, department: &str, year: i32) -> user::Model {
        self.signup(
            UserRole::Student,
            UserProfile {
                email: email.to_string(),
                name: format!("Student {}", entry_number),
                entry_number: Some(entry_number.to_string()),
                department: Some(department.to_string()),
                year: Some(year),
                semester: Some(1),
            },
        )
        .await
    }

    pub async fn instructor(&self, email: &str, department: &str) -> user::Model {
        self.signup(
            UserRole::Instructor,
            UserProfile {
                email: email.to_string(),
                name: "Instructor".to_string(),
                department: Some(department.to_string()),
                ..UserProfile::default()
            },
        )
        .await
    }

    pub async fn advisor(&self, email: &str, department: &str, year: i32) -> user::Model {
        self.signup(
            UserRole::FacultyAdvisor,
            UserProfile {
                email: email.to_string(),
                name: "Advisor".to_string(),
                department: Some(department.to_string()),
                year: Some(year),
                ..UserProfile::default()
            },
        )
        .await
    }

    /// Admins cannot sign up; insert one straight through the store
    pub async fn admin_user(&self, email: &str) -> user::Model {
        let now = Utc::now().timestamp();
        self.app_data
            .user_store
            .create_user(
                &self.app_data.db,
                user::Model {
                    id: Uuid::new_v4().to_string(),
                    email: email.to_string(),
                    name: "Admin".to_string(),
                    role: UserRole::Admin,
                    entry_number: None,
                    department: None,
                    year: None,
                    semester: None,
                    created_at: now,
                    updated_at: now,
                },
            )
            .await
            .expect("Failed to create admin")
    }

    /// Offer a course as `instructor` and have `reviewer` approve it
    pub async fn open_course(
        &self,
        instructor: &user::Model,
        reviewer: &user::Model,
        course_code: &str,
    ) -> course::Model {
        let offered = self
            .courses
            .offer_course(&self.login_as(instructor), offer(course_code, SESSION))
            .await
            .expect("Failed to offer course");

        self.courses
            .review_course(&self.login_as(reviewer), &offered.id, Decision::Approve)
            .await
            .expect("Failed to approve course")
    }
}

pub fn offer(course_code: &str, session: &str) -> CourseOffer {
    CourseOffer {
        course_code: course_code.to_string(),
        title: format!("Course {}", course_code),
        department: "CSE".to_string(),
        year: 2,
        ltp: "3-1-0".to_string(),
        session: session.to_string(),
    }
}
