use std::sync::Arc;

use chrono::Utc;
use sea_orm::ConnectionTrait;
use uuid::Uuid;

use crate::errors::InternalError;
use crate::errors::internal::UserError;
use crate::stores::UserStore;
use crate::types::db::{UserRole, user};

const MAX_NAME_LENGTH: usize = 128;
const MAX_FIELD_LENGTH: usize = 64;

/// Account details as submitted, before validation
#[derive(Debug, Clone, Default)]
pub struct UserProfile {
    pub email: String,
    pub name: String,
    pub entry_number: Option<String>,
    pub department: Option<String>,
    pub year: Option<i32>,
    pub semester: Option<i32>,
}

/// Validates account data and writes it through the user store
pub struct UserProvider {
    user_store: Arc<UserStore>,
}

impl UserProvider {
    pub fn new(user_store: Arc<UserStore>) -> Self {
        Self { user_store }
    }

    /// Trim and lower-case an email address, rejecting obviously malformed ones
    pub fn normalize_email(email: &str) -> Result<String, InternalError> {
        let email = email.trim().to_lowercase();
        let valid = match email.split_once('@') {
            Some((local, domain)) => {
                !local.is_empty()
                    && !domain.is_empty()
                    && !domain.contains('@')
                    && !email.chars().any(char::is_whitespace)
            }
            None => false,
        };

        if !valid {
            return Err(UserError::invalid_field("email", "must be a valid email address").into());
        }
        Ok(email)
    }

    /// Validate `profile` for `role` and drop fields the role does not carry
    ///
    /// Students need entry number, department, year and semester. Faculty
    /// advisors need the department and batch year they advise. Instructors may
    /// carry a department. Admins carry nothing extra.
    pub fn validate_profile(role: UserRole, profile: UserProfile) -> Result<UserProfile, InternalError> {
        let email = Self::normalize_email(&profile.email)?;
        let name = profile.name.trim().to_string();
        if name.is_empty() || name.chars().count() > MAX_NAME_LENGTH {
            return Err(UserError::invalid_field(
                "name",
                format!("must be 1 to {} characters", MAX_NAME_LENGTH),
            )
            .into());
        }

        let entry_number = clean_text(profile.entry_number);
        let department = clean_text(profile.department);

        let validated = match role {
            UserRole::Student => UserProfile {
                email,
                name,
                entry_number: Some(require_text("entryNumber", entry_number)?),
                department: Some(require_text("department", department)?),
                year: Some(require_positive("year", profile.year)?),
                semester: Some(require_positive("semester", profile.semester)?),
            },
            UserRole::FacultyAdvisor => UserProfile {
                email,
                name,
                entry_number: None,
                department: Some(require_text("department", department)?),
                year: Some(require_positive("year", profile.year)?),
                semester: None,
            },
            UserRole::Instructor => UserProfile {
                email,
                name,
                entry_number: None,
                department: match department {
                    Some(d) => Some(require_text("department", Some(d))?),
                    None => None,
                },
                year: None,
                semester: None,
            },
            UserRole::Admin => UserProfile {
                email,
                name,
                ..UserProfile::default()
            },
        };

        Ok(validated)
    }

    pub async fn create_user(
        &self,
        conn: &impl ConnectionTrait,
        role: UserRole,
        profile: UserProfile,
    ) -> Result<user::Model, InternalError> {
        let profile = Self::validate_profile(role, profile)?;
        let now = Utc::now().timestamp();

        let new_user = user::Model {
            id: Uuid::new_v4().to_string(),
            email: profile.email,
            name: profile.name,
            role,
            entry_number: profile.entry_number,
            department: profile.department,
            year: profile.year,
            semester: profile.semester,
            created_at: now,
            updated_at: now,
        };

        let created = self.user_store.create_user(conn, new_user).await?;
        tracing::info!(user_id = %created.id, role = %created.role, "User created");
        Ok(created)
    }

    pub async fn update_user(
        &self,
        conn: &impl ConnectionTrait,
        existing: user::Model,
        role: UserRole,
        profile: UserProfile,
    ) -> Result<user::Model, InternalError> {
        let profile = Self::validate_profile(role, profile)?;

        let updated = user::Model {
            email: profile.email,
            name: profile.name,
            role,
            entry_number: profile.entry_number,
            department: profile.department,
            year: profile.year,
            semester: profile.semester,
            updated_at: Utc::now().timestamp(),
            ..existing
        };

        self.user_store.update_user(conn, updated).await
    }
}

fn clean_text(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn require_text(field: &str, value: Option<String>) -> Result<String, InternalError> {
    match value {
        Some(v) if v.chars().count() <= MAX_FIELD_LENGTH => Ok(v),
        Some(_) => Err(UserError::invalid_field(field, format!("must be at most {} characters", MAX_FIELD_LENGTH)).into()),
        None => Err(UserError::invalid_field(field, "is required for this role").into()),
    }
}

fn require_positive(field: &str, value: Option<i32>) -> Result<i32, InternalError> {
    match value {
        Some(v) if v > 0 => Ok(v),
        Some(_) => Err(UserError::invalid_field(field, "must be a positive number").into()),
        None => Err(UserError::invalid_field(field, "is required for this role").into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn student_profile() -> UserProfile {
        UserProfile {
            email: "  Ada@Example.EDU ".to_string(),
            name: "Ada Lovelace".to_string(),
            entry_number: Some("2023CSB1001".to_string()),
            department: Some("CSE".to_string()),
            year: Some(2),
            semester: Some(3),
        }
    }

    #[test]
    fn test_normalize_email() {
        assert_eq!(UserProvider::normalize_email(" A@B.C ").unwrap(), "a@b.c");
        assert!(UserProvider::normalize_email("no-at-sign").is_err());
        assert!(UserProvider::normalize_email("@example.edu").is_err());
        assert!(UserProvider::normalize_email("a@").is_err());
        assert!(UserProvider::normalize_email("a b@example.edu").is_err());
    }

    #[test]
    fn test_student_profile_requires_all_fields() {
        let validated = UserProvider::validate_profile(UserRole::Student, student_profile()).unwrap();
        assert_eq!(validated.email, "ada@example.edu");
        assert_eq!(validated.semester, Some(3));

        let missing_semester = UserProfile {
            semester: None,
            ..student_profile()
        };
        match UserProvider::validate_profile(UserRole::Student, missing_semester) {
            Err(InternalError::User(UserError::InvalidField { field, .. })) => assert_eq!(field, "semester"),
            other => panic!("expected invalid semester, got {:?}", other),
        }
    }

    #[test]
    fn test_advisor_profile_clears_student_fields() {
        let validated = UserProvider::validate_profile(UserRole::FacultyAdvisor, student_profile()).unwrap();

        assert_eq!(validated.department.as_deref(), Some("CSE"));
        assert_eq!(validated.year, Some(2));
        assert!(validated.entry_number.is_none());
        assert!(validated.semester.is_none());
    }

    #[test]
    fn test_advisor_profile_requires_year() {
        let profile = UserProfile {
            year: None,
            ..student_profile()
        };

        assert!(UserProvider::validate_profile(UserRole::FacultyAdvisor, profile).is_err());
    }

    #[test]
    fn test_instructor_department_optional() {
        let profile = UserProfile {
            department: Some("   ".to_string()),
            ..student_profile()
        };
        let validated = UserProvider::validate_profile(UserRole::Instructor, profile).unwrap();

        assert!(validated.department.is_none());
        assert!(validated.year.is_none());
    }

    #[test]
    fn test_admin_profile_keeps_only_identity() {
        let validated = UserProvider::validate_profile(UserRole::Admin, student_profile()).unwrap();

        assert_eq!(validated.name, "Ada Lovelace");
        assert!(validated.department.is_none());
        assert!(validated.entry_number.is_none());
    }

    #[test]
    fn test_blank_name_rejected() {
        let profile = UserProfile {
            name: "   ".to_string(),
            ..student_profile()
        };

        assert!(UserProvider::validate_profile(UserRole::Student, profile).is_err());
    }
}
