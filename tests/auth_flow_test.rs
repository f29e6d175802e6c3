mod common;

use academic_portal::errors::InternalError;
use academic_portal::errors::internal::{AuthenticationError, UserError};
use academic_portal::providers::UserProfile;
use academic_portal::types::db::UserRole;
use academic_portal::types::internal::context::RequestContext;

use common::Portal;

fn ctx() -> RequestContext {
    RequestContext::for_system("integration-test")
}

#[tokio::test]
async fn test_signup_then_login_with_emailed_code() {
    let portal = Portal::new().await;
    let student = portal.student("S1@Uni.edu", "2022CS001", "CSE", 2).await;
    assert_eq!(student.email, "s1@uni.edu");

    portal.auth.request_otp(&ctx(), "s1@uni.edu").await.unwrap();
    let code = portal.otp_sender.code_for("s1@uni.edu").expect("code should be sent");

    let issued = portal.auth.verify_otp(&ctx(), "S1@uni.edu", &code).await.unwrap();
    assert_eq!(issued.claims.sub, student.id);
    assert_eq!(issued.claims.role, UserRole::Student);

    let claims = portal.app_data.token_provider.validate_jwt(&issued.token).unwrap();
    assert_eq!(claims.sub, student.id);

    // Codes are single use
    let err = portal.auth.verify_otp(&ctx(), "s1@uni.edu", &code).await.unwrap_err();
    assert!(matches!(
        err,
        InternalError::Authentication(AuthenticationError::InvalidOtp)
    ));
}

#[tokio::test]
async fn test_unknown_email_gets_no_code() {
    let portal = Portal::new().await;

    portal.auth.request_otp(&ctx(), "ghost@uni.edu").await.unwrap();

    assert!(portal.otp_sender.code_for("ghost@uni.edu").is_none());
}

#[tokio::test]
async fn test_code_locked_after_repeated_failures() {
    let portal = Portal::new().await;
    portal.student("s1@uni.edu", "2022CS001", "CSE", 2).await;
    portal.auth.request_otp(&ctx(), "s1@uni.edu").await.unwrap();
    let code = portal.otp_sender.code_for("s1@uni.edu").unwrap();
    let wrong = if code == "000000" { "111111" } else { "000000" };

    for _ in 0..5 {
        let err = portal.auth.verify_otp(&ctx(), "s1@uni.edu", wrong).await.unwrap_err();
        assert!(matches!(
            err,
            InternalError::Authentication(AuthenticationError::InvalidOtp)
        ));
    }

    let err = portal.auth.verify_otp(&ctx(), "s1@uni.edu", &code).await.unwrap_err();
    assert!(matches!(
        err,
        InternalError::Authentication(AuthenticationError::TooManyAttempts)
    ));

    // A fresh code resets the counter
    portal.auth.request_otp(&ctx(), "s1@uni.edu").await.unwrap();
    let fresh = portal.otp_sender.code_for("s1@uni.edu").unwrap();
    assert!(portal.auth.verify_otp(&ctx(), "s1@uni.edu", &fresh).await.is_ok());
}

#[tokio::test]
async fn test_admin_cannot_sign_up() {
    let portal = Portal::new().await;

    let err = portal
        .auth
        .signup(
            &ctx(),
            UserRole::Admin,
            UserProfile {
                email: "root@uni.edu".to_string(),
                name: "Root".to_string(),
                ..UserProfile::default()
            },
        )
        .await
        .unwrap_err();

    assert!(matches!(err, InternalError::User(UserError::AdminSignupForbidden)));
}

#[tokio::test]
async fn test_student_signup_requires_full_profile() {
    let portal = Portal::new().await;

    let err = portal
        .auth
        .signup(
            &ctx(),
            UserRole::Student,
            UserProfile {
                email: "s1@uni.edu".to_string(),
                name: "Student".to_string(),
                department: Some("CSE".to_string()),
                year: Some(2),
                semester: Some(3),
                ..UserProfile::default()
            },
        )
        .await
        .unwrap_err();

    assert!(matches!(err, InternalError::User(UserError::InvalidField { .. })));
}

#[tokio::test]
async fn test_duplicate_email_rejected() {
    let portal = Portal::new().await;
    portal.instructor("prof@uni.edu", "CSE").await;

    let err = portal
        .auth
        .signup(
            &ctx(),
            UserRole::Instructor,
            UserProfile {
                email: "PROF@uni.edu".to_string(),
                name: "Someone Else".to_string(),
                ..UserProfile::default()
            },
        )
        .await
        .unwrap_err();

    assert!(matches!(err, InternalError::User(UserError::DuplicateEmail { .. })));
}
