mod common;

use academic_portal::errors::InternalError;
use academic_portal::errors::internal::{AccessError, UserError};
use academic_portal::providers::UserProfile;
use academic_portal::types::db::UserRole;

use common::Portal;

#[tokio::test]
async fn test_admin_manages_users() {
    let portal = Portal::new().await;
    let admin = portal.admin_user("admin@uni.edu").await;
    let ctx = portal.login_as(&admin);

    let advisor = portal
        .admin
        .create_user(
            &ctx,
            UserRole::FacultyAdvisor,
            UserProfile {
                email: "fa@uni.edu".to_string(),
                name: "Advisor".to_string(),
                entry_number: Some("ignored".to_string()),
                department: Some("CSE".to_string()),
                year: Some(2),
                semester: Some(4),
            },
        )
        .await
        .unwrap();
    // Fields the role does not carry are dropped
    assert!(advisor.entry_number.is_none());
    assert!(advisor.semester.is_none());

    let advisors = portal
        .admin
        .list_users(&ctx, Some(UserRole::FacultyAdvisor))
        .await
        .unwrap();
    assert_eq!(advisors.len(), 1);

    let promoted = portal
        .admin
        .update_user(
            &ctx,
            &advisor.id,
            UserRole::Instructor,
            UserProfile {
                email: "fa@uni.edu".to_string(),
                name: "Now Instructor".to_string(),
                department: Some("CSE".to_string()),
                year: Some(2),
                ..UserProfile::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(promoted.role, UserRole::Instructor);
    assert!(promoted.year.is_none());

    portal.admin.delete_user(&ctx, &advisor.id).await.unwrap();
    let err = portal.admin.delete_user(&ctx, &advisor.id).await.unwrap_err();
    assert!(matches!(err, InternalError::User(UserError::UserIdNotFound { .. })));
}

#[tokio::test]
async fn test_feedback_settings_round_trip() {
    let portal = Portal::new().await;
    let admin = portal.admin_user("admin@uni.edu").await;
    let ctx = portal.login_as(&admin);

    let initial = portal.admin.feedback_settings(&ctx).await.unwrap();
    assert!(!initial.active);
    assert_eq!(initial.session, "");

    portal
        .admin
        .set_feedback_settings(&ctx, true, "  2024-25-I ")
        .await
        .unwrap();

    let stored = portal.admin.feedback_settings(&ctx).await.unwrap();
    assert!(stored.active);
    assert_eq!(stored.session, "2024-25-I");
}

#[tokio::test]
async fn test_non_admin_is_refused() {
    let portal = Portal::new().await;
    let instructor = portal.instructor("prof@uni.edu", "CSE").await;
    let ctx = portal.login_as(&instructor);

    let err = portal.admin.list_users(&ctx, None).await.unwrap_err();
    assert!(matches!(err, InternalError::Access(AccessError::RoleRequired { .. })));

    let err = portal
        .admin
        .set_feedback_settings(&ctx, true, "2024-25-I")
        .await
        .unwrap_err();
    assert!(matches!(err, InternalError::Access(AccessError::RoleRequired { .. })));
}
