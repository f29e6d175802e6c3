// Stores layer - Data access and repository pattern
pub mod course_store;
pub mod enrollment_store;
pub mod feedback_store;
pub mod otp_store;
pub mod system_settings_store;
pub mod user_store;

pub use course_store::{CourseFilter, CourseStore};
pub use enrollment_store::EnrollmentStore;
pub use feedback_store::FeedbackStore;
pub use otp_store::OtpStore;
pub use system_settings_store::{FeedbackGateSettings, SystemSettingsStore};
pub use user_store::UserStore;
