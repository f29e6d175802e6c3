use poem_openapi::Object;

use super::user::RoleDto;

/// Self-registration request; admins cannot sign up
#[derive(Object, Debug, Clone)]
#[oai(rename_all = "camelCase")]
pub struct SignupRequest {
    pub email: String,
    pub name: String,
    pub role: RoleDto,
    pub entry_number: Option<String>,
    pub department: Option<String>,
    pub year: Option<i32>,
    pub semester: Option<i32>,
}

/// Request a one-time login code
#[derive(Object, Debug)]
pub struct OtpRequest {
    pub email: String,
}

/// Exchange a one-time code for an access token
#[derive(Object, Debug)]
pub struct OtpVerifyRequest {
    pub email: String,
    pub code: String,
}

/// Response model containing the access token
#[derive(Object, Debug)]
#[oai(rename_all = "camelCase")]
pub struct TokenResponse {
    /// JWT access token for API authentication
    pub access_token: String,

    /// Token type (always "Bearer")
    pub token_type: String,

    /// Number of seconds until the access token expires
    pub expires_in: i64,

    pub user_id: String,

    pub role: RoleDto,
}

/// Response model for whoami endpoint
#[derive(Object, Debug)]
#[oai(rename_all = "camelCase")]
pub struct WhoAmIResponse {
    pub user_id: String,
    pub email: String,
    pub role: RoleDto,

    /// Token expiration time (Unix timestamp)
    pub expires_at: i64,
}
