// Providers layer - Work performers and business logic
//
// Providers hold the rules (state machines, validation, gating) and compose
// stores; coordinators orchestrate them per request.

pub mod course_lifecycle;
pub mod crypto_provider;
pub mod enrollment_workflow;
pub mod feedback_gate;
pub mod otp_provider;
pub mod token_provider;
pub mod user_provider;

pub use crypto_provider::CryptoProvider;
pub use feedback_gate::{FeedbackGate, FeedbackSubmission};
pub use otp_provider::{LogOtpSender, OtpProvider, OtpSender};
pub use token_provider::TokenProvider;
pub use user_provider::{UserProfile, UserProvider};
