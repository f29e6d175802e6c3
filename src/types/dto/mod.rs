// DTOs - request/response bodies exposed through the OpenAPI schema
pub mod auth;
pub mod common;
pub mod course;
pub mod enrollment;
pub mod feedback;
pub mod user;
