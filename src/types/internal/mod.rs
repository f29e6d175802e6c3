pub mod auth;
pub mod context;
pub mod decision;

pub use decision::Decision;
