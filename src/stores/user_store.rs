use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, IntoActiveModel, QueryFilter,
    QueryOrder, Set,
};

use crate::errors::InternalError;
use crate::errors::internal::UserError;
use crate::types::db::UserRole;
use crate::types::db::user::{self, Entity as User};

/// Data access for user accounts
pub struct UserStore {}

impl UserStore {
    pub fn new() -> Self {
        Self {}
    }

    /// Insert a new user
    ///
    /// # Returns
    /// * `Err(UserError::DuplicateEmail)` - the email is already registered
    pub async fn create_user(
        &self,
        conn: &impl ConnectionTrait,
        new_user: user::Model,
    ) -> Result<user::Model, InternalError> {
        let email = new_user.email.clone();
        let active_model = user::ActiveModel {
            id: Set(new_user.id),
            email: Set(new_user.email),
            name: Set(new_user.name),
            role: Set(new_user.role),
            entry_number: Set(new_user.entry_number),
            department: Set(new_user.department),
            year: Set(new_user.year),
            semester: Set(new_user.semester),
            created_at: Set(new_user.created_at),
            updated_at: Set(new_user.updated_at),
        };

        active_model.insert(conn).await.map_err(|e| {
            let err = InternalError::database("create_user", e);
            if err.is_unique_violation() {
                UserError::DuplicateEmail { email }.into()
            } else {
                err
            }
        })
    }

    pub async fn get_user_by_id(
        &self,
        conn: &impl ConnectionTrait,
        user_id: &str,
    ) -> Result<Option<user::Model>, InternalError> {
        User::find_by_id(user_id)
            .one(conn)
            .await
            .map_err(|e| InternalError::database("get_user_by_id", e))
    }

    /// Like `get_user_by_id`, but a missing user is an error
    pub async fn require_user(
        &self,
        conn: &impl ConnectionTrait,
        user_id: &str,
    ) -> Result<user::Model, InternalError> {
        self.get_user_by_id(conn, user_id)
            .await?
            .ok_or_else(|| {
                UserError::UserIdNotFound {
                    user_id: user_id.to_string(),
                }
                .into()
            })
    }

    pub async fn get_user_by_email(
        &self,
        conn: &impl ConnectionTrait,
        email: &str,
    ) -> Result<Option<user::Model>, InternalError> {
        User::find()
            .filter(user::Column::Email.eq(email))
            .one(conn)
            .await
            .map_err(|e| InternalError::database("get_user_by_email", e))
    }

    pub async fn list_users(
        &self,
        conn: &impl ConnectionTrait,
        role: Option<UserRole>,
    ) -> Result<Vec<user::Model>, InternalError> {
        let mut query = User::find();
        if let Some(role) = role {
            query = query.filter(user::Column::Role.eq(role));
        }

        query
            .order_by_asc(user::Column::CreatedAt)
            .order_by_asc(user::Column::Email)
            .all(conn)
            .await
            .map_err(|e| InternalError::database("list_users", e))
    }

    /// Overwrite the mutable fields of an existing user
    pub async fn update_user(
        &self,
        conn: &impl ConnectionTrait,
        updated: user::Model,
    ) -> Result<user::Model, InternalError> {
        let email = updated.email.clone();
        let mut active_model = updated.clone().into_active_model();
        active_model.email = Set(updated.email);
        active_model.name = Set(updated.name);
        active_model.role = Set(updated.role);
        active_model.entry_number = Set(updated.entry_number);
        active_model.department = Set(updated.department);
        active_model.year = Set(updated.year);
        active_model.semester = Set(updated.semester);
        active_model.updated_at = Set(updated.updated_at);

        active_model.update(conn).await.map_err(|e| {
            let err = InternalError::database("update_user", e);
            if err.is_unique_violation() {
                UserError::DuplicateEmail { email }.into()
            } else {
                err
            }
        })
    }

    /// Returns false when no user had this id
    pub async fn delete_user(
        &self,
        conn: &impl ConnectionTrait,
        user_id: &str,
    ) -> Result<bool, InternalError> {
        let result = User::delete_by_id(user_id)
            .exec(conn)
            .await
            .map_err(|e| InternalError::database("delete_user", e))?;

        Ok(result.rows_affected > 0)
    }

    /// Faculty advisor responsible for a department and batch year
    ///
    /// When several advisors match, the earliest registered one wins.
    pub async fn find_advisor(
        &self,
        conn: &impl ConnectionTrait,
        department: &str,
        year: i32,
    ) -> Result<Option<user::Model>, InternalError> {
        User::find()
            .filter(user::Column::Role.eq(UserRole::FacultyAdvisor))
            .filter(user::Column::Department.eq(department))
            .filter(user::Column::Year.eq(year))
            .order_by_asc(user::Column::CreatedAt)
            .order_by_asc(user::Column::Id)
            .one(conn)
            .await
            .map_err(|e| InternalError::database("find_advisor", e))
    }
}

impl Default for UserStore {
    fn default() -> Self {
        Self::new()
    }
}
