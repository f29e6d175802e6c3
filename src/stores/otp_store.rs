use chrono::Utc;
use sea_orm::sea_query::{Expr, OnConflict};
use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, Set};

use crate::errors::InternalError;
use crate::types::db::otp_code::{self, Entity as OtpCode};

/// Pending one-time login codes, one row per email
pub struct OtpStore {}

impl OtpStore {
    pub fn new() -> Self {
        Self {}
    }

    /// Store a fresh code hash, replacing any previous code and resetting attempts
    pub async fn replace_code(
        &self,
        conn: &impl ConnectionTrait,
        email: &str,
        code_hash: String,
        expires_at: i64,
    ) -> Result<(), InternalError> {
        let active_model = otp_code::ActiveModel {
            email: Set(email.to_string()),
            code_hash: Set(code_hash),
            expires_at: Set(expires_at),
            attempts: Set(0),
            created_at: Set(Utc::now().timestamp()),
        };

        OtpCode::insert(active_model)
            .on_conflict(
                OnConflict::column(otp_code::Column::Email)
                    .update_columns([
                        otp_code::Column::CodeHash,
                        otp_code::Column::ExpiresAt,
                        otp_code::Column::Attempts,
                        otp_code::Column::CreatedAt,
                    ])
                    .to_owned(),
            )
            .exec(conn)
            .await
            .map_err(|e| InternalError::database("replace_otp_code", e))?;

        Ok(())
    }

    pub async fn get_code(
        &self,
        conn: &impl ConnectionTrait,
        email: &str,
    ) -> Result<Option<otp_code::Model>, InternalError> {
        OtpCode::find_by_id(email)
            .one(conn)
            .await
            .map_err(|e| InternalError::database("get_otp_code", e))
    }

    pub async fn record_failed_attempt(
        &self,
        conn: &impl ConnectionTrait,
        email: &str,
    ) -> Result<(), InternalError> {
        OtpCode::update_many()
            .col_expr(otp_code::Column::Attempts, Expr::col(otp_code::Column::Attempts).add(1))
            .filter(otp_code::Column::Email.eq(email))
            .exec(conn)
            .await
            .map_err(|e| InternalError::database("record_failed_otp_attempt", e))?;

        Ok(())
    }

    pub async fn delete_code(
        &self,
        conn: &impl ConnectionTrait,
        email: &str,
    ) -> Result<(), InternalError> {
        OtpCode::delete_by_id(email)
            .exec(conn)
            .await
            .map_err(|e| InternalError::database("delete_otp_code", e))?;

        Ok(())
    }
}

impl Default for OtpStore {
    fn default() -> Self {
        Self::new()
    }
}
