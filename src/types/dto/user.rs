use poem_openapi::{Enum, Object};

use crate::types::db::{UserRole, user};

#[derive(Enum, Debug, Clone, Copy, PartialEq, Eq)]
#[oai(rename_all = "snake_case")]
pub enum RoleDto {
    Student,
    Instructor,
    FacultyAdvisor,
    Admin,
}

impl From<UserRole> for RoleDto {
    fn from(role: UserRole) -> Self {
        match role {
            UserRole::Student => RoleDto::Student,
            UserRole::Instructor => RoleDto::Instructor,
            UserRole::FacultyAdvisor => RoleDto::FacultyAdvisor,
            UserRole::Admin => RoleDto::Admin,
        }
    }
}

impl From<RoleDto> for UserRole {
    fn from(role: RoleDto) -> Self {
        match role {
            RoleDto::Student => UserRole::Student,
            RoleDto::Instructor => UserRole::Instructor,
            RoleDto::FacultyAdvisor => UserRole::FacultyAdvisor,
            RoleDto::Admin => UserRole::Admin,
        }
    }
}

#[derive(Object, Debug)]
#[oai(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: String,
    pub email: String,
    pub name: String,
    pub role: RoleDto,
    pub entry_number: Option<String>,
    pub department: Option<String>,
    pub year: Option<i32>,
    pub semester: Option<i32>,
    pub created_at: i64,
    pub updated_at: i64,
}

impl From<user::Model> for UserResponse {
    fn from(u: user::Model) -> Self {
        Self {
            id: u.id,
            email: u.email,
            name: u.name,
            role: u.role.into(),
            entry_number: u.entry_number,
            department: u.department,
            year: u.year,
            semester: u.semester,
            created_at: u.created_at,
            updated_at: u.updated_at,
        }
    }
}

/// Admin request to create an account of any role
#[derive(Object, Debug, Clone)]
#[oai(rename_all = "camelCase")]
pub struct CreateUserRequest {
    pub email: String,
    pub name: String,
    pub role: RoleDto,
    pub entry_number: Option<String>,
    pub department: Option<String>,
    pub year: Option<i32>,
    pub semester: Option<i32>,
}

/// Admin edit; replaces name, role and the role fields
#[derive(Object, Debug, Clone)]
#[oai(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    pub email: String,
    pub name: String,
    pub role: RoleDto,
    pub entry_number: Option<String>,
    pub department: Option<String>,
    pub year: Option<i32>,
    pub semester: Option<i32>,
}
