// Database entities - SeaORM models
pub mod course;
pub mod enrollment;
pub mod feedback;
pub mod otp_code;
pub mod system_settings;
pub mod user;

pub use course::CourseStatus;
pub use enrollment::EnrollmentStatus;
pub use user::UserRole;
