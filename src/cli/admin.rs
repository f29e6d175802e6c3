// create-admin command: admins cannot sign up through the API

use std::sync::Arc;

use sea_orm::ConnectionTrait;

use crate::config::{init_database, migrate_database, BootstrapSettings};
use crate::errors::InternalError;
use crate::providers::{UserProfile, UserProvider};
use crate::stores::UserStore;
use crate::types::db::{user, UserRole};
use crate::types::internal::context::RequestContext;

/// Create an admin account from the command line
pub async fn create_admin(
    settings: &BootstrapSettings,
    email: &str,
    name: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let db = init_database(settings).await?;
    migrate_database(&db).await?;

    let ctx = RequestContext::for_cli("create-admin");
    let admin = create_admin_account(&db, &ctx, email, name).await?;

    println!("Admin account created");
    println!("  id:    {}", admin.id);
    println!("  email: {}", admin.email);

    Ok(())
}

pub(crate) async fn create_admin_account(
    conn: &impl ConnectionTrait,
    ctx: &RequestContext,
    email: &str,
    name: &str,
) -> Result<user::Model, InternalError> {
    let provider = UserProvider::new(Arc::new(UserStore::new()));
    let profile = UserProfile {
        email: email.to_string(),
        name: name.to_string(),
        ..UserProfile::default()
    };

    let admin = provider.create_user(conn, UserRole::Admin, profile).await?;
    tracing::info!(
        request_id = %ctx.request_id,
        source = ?ctx.source,
        user_id = %admin.id,
        "Admin account created from CLI"
    );

    Ok(admin)
}
