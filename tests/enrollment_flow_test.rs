mod common;

use academic_portal::errors::internal::{AccessError, EnrollmentError};
use academic_portal::errors::{InternalError, PortalError};
use academic_portal::providers::UserProfile;
use academic_portal::providers::enrollment_workflow::ApprovalStage;
use academic_portal::types::db::{EnrollmentStatus, UserRole};
use academic_portal::types::internal::Decision;

use common::{Portal, SESSION};

#[tokio::test]
async fn test_full_approval_pipeline_and_transcript() {
    let portal = Portal::new().await;
    let instructor = portal.instructor("prof@uni.edu", "CSE").await;
    let advisor = portal.advisor("fa@uni.edu", "CSE", 2).await;
    let student = portal.student("s1@uni.edu", "2022CS001", "CSE", 2).await;
    let course = portal.open_course(&instructor, &advisor, "cs201").await;

    let student_ctx = portal.login_as(&student);
    let requested = portal
        .enrollments
        .request_enrollment(&student_ctx, &course.id)
        .await
        .unwrap();
    assert_eq!(requested.status, EnrollmentStatus::PendingInstructor);
    assert_eq!(requested.faculty_advisor_id.as_deref(), Some(advisor.id.as_str()));
    assert_eq!(requested.session, SESSION);
    assert_eq!(requested.grade, "-");
    assert_eq!(requested.attendance, "-");

    let instructor_ctx = portal.login_as(&instructor);
    let pending = portal.enrollments.instructor_pending(&instructor_ctx).await.unwrap();
    assert_eq!(pending.len(), 1);

    let after_instructor = portal
        .enrollments
        .decide(&instructor_ctx, &requested.id, ApprovalStage::Instructor, Decision::Approve)
        .await
        .unwrap();
    assert_eq!(after_instructor.status, EnrollmentStatus::PendingAdvisor);

    let advisor_ctx = portal.login_as(&advisor);
    let pending = portal.enrollments.advisor_pending(&advisor_ctx).await.unwrap();
    assert_eq!(pending.len(), 1);

    let enrolled = portal
        .enrollments
        .decide(&advisor_ctx, &requested.id, ApprovalStage::Advisor, Decision::Approve)
        .await
        .unwrap();
    assert_eq!(enrolled.status, EnrollmentStatus::Enrolled);

    portal
        .enrollments
        .update_record(&instructor_ctx, &requested.id, "A-".to_string(), "92%".to_string())
        .await
        .unwrap();

    let transcript = portal.enrollments.transcript(&student_ctx).await.unwrap();
    assert_eq!(transcript.sessions.len(), 1);
    assert_eq!(transcript.sessions[0].session, SESSION);
    let line = &transcript.sessions[0].courses[0];
    assert_eq!(line.course_code, "CS201");
    assert_eq!(line.grade, "A-");
    assert_eq!(line.attendance, "92%");
}

#[tokio::test]
async fn test_duplicate_request_is_rejected_with_400() {
    let portal = Portal::new().await;
    let instructor = portal.instructor("prof@uni.edu", "CSE").await;
    let advisor = portal.advisor("fa@uni.edu", "CSE", 2).await;
    let student = portal.student("s1@uni.edu", "2022CS001", "CSE", 2).await;
    let course = portal.open_course(&instructor, &advisor, "CS201").await;
    let ctx = portal.login_as(&student);

    portal.enrollments.request_enrollment(&ctx, &course.id).await.unwrap();
    let err = portal
        .enrollments
        .request_enrollment(&ctx, &course.id)
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        InternalError::Enrollment(EnrollmentError::DuplicateRequest { .. })
    ));
    assert!(matches!(PortalError::from(err), PortalError::BadRequest(_)));
}

#[tokio::test]
async fn test_advisor_rejection_after_instructor_approval_leaves_record_unset() {
    let portal = Portal::new().await;
    let instructor = portal.instructor("prof@uni.edu", "CSE").await;
    let advisor = portal.advisor("fa@uni.edu", "CSE", 2).await;
    let student = portal.student("s1@uni.edu", "2022CS001", "CSE", 2).await;
    let course = portal.open_course(&instructor, &advisor, "CS201").await;

    let requested = portal
        .enrollments
        .request_enrollment(&portal.login_as(&student), &course.id)
        .await
        .unwrap();
    portal
        .enrollments
        .decide(&portal.login_as(&instructor), &requested.id, ApprovalStage::Instructor, Decision::Approve)
        .await
        .unwrap();
    let rejected = portal
        .enrollments
        .decide(&portal.login_as(&advisor), &requested.id, ApprovalStage::Advisor, Decision::Reject)
        .await
        .unwrap();

    assert_eq!(rejected.status, EnrollmentStatus::Rejected);
    assert_eq!(rejected.grade, "-");
    assert_eq!(rejected.attendance, "-");

    // Rejected records cannot be graded
    let err = portal
        .enrollments
        .update_record(&portal.login_as(&instructor), &requested.id, "A".to_string(), "90%".to_string())
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        InternalError::Enrollment(EnrollmentError::NotEnrolled { .. })
    ));
}

#[tokio::test]
async fn test_status_never_moves_backward() {
    let portal = Portal::new().await;
    let instructor = portal.instructor("prof@uni.edu", "CSE").await;
    let advisor = portal.advisor("fa@uni.edu", "CSE", 2).await;
    let student = portal.student("s1@uni.edu", "2022CS001", "CSE", 2).await;
    let course = portal.open_course(&instructor, &advisor, "CS201").await;
    let instructor_ctx = portal.login_as(&instructor);

    let requested = portal
        .enrollments
        .request_enrollment(&portal.login_as(&student), &course.id)
        .await
        .unwrap();
    portal
        .enrollments
        .decide(&instructor_ctx, &requested.id, ApprovalStage::Instructor, Decision::Approve)
        .await
        .unwrap();

    // A second instructor decision after the record moved on is refused
    let err = portal
        .enrollments
        .decide(&instructor_ctx, &requested.id, ApprovalStage::Instructor, Decision::Reject)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        InternalError::Enrollment(EnrollmentError::InvalidTransition { .. })
    ));
    assert!(matches!(PortalError::from(err), PortalError::Conflict(_)));

    let current = portal
        .app_data
        .enrollment_store
        .require_enrollment(&portal.app_data.db, &requested.id)
        .await
        .unwrap();
    assert_eq!(current.status, EnrollmentStatus::PendingAdvisor);
}

#[tokio::test]
async fn test_advisor_cannot_skip_instructor_stage() {
    let portal = Portal::new().await;
    let instructor = portal.instructor("prof@uni.edu", "CSE").await;
    let advisor = portal.advisor("fa@uni.edu", "CSE", 2).await;
    let student = portal.student("s1@uni.edu", "2022CS001", "CSE", 2).await;
    let course = portal.open_course(&instructor, &advisor, "CS201").await;

    let requested = portal
        .enrollments
        .request_enrollment(&portal.login_as(&student), &course.id)
        .await
        .unwrap();
    let err = portal
        .enrollments
        .decide(&portal.login_as(&advisor), &requested.id, ApprovalStage::Advisor, Decision::Approve)
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        InternalError::Enrollment(EnrollmentError::InvalidTransition { .. })
    ));
}

#[tokio::test]
async fn test_only_owning_instructor_and_assigned_advisor_may_decide() {
    let portal = Portal::new().await;
    let owner = portal.instructor("prof@uni.edu", "CSE").await;
    let other_instructor = portal.instructor("other@uni.edu", "CSE").await;
    let advisor = portal.advisor("fa@uni.edu", "CSE", 2).await;
    let other_advisor = portal.advisor("fa2@uni.edu", "EE", 2).await;
    let student = portal.student("s1@uni.edu", "2022CS001", "CSE", 2).await;
    let course = portal.open_course(&owner, &advisor, "CS201").await;

    let requested = portal
        .enrollments
        .request_enrollment(&portal.login_as(&student), &course.id)
        .await
        .unwrap();

    let err = portal
        .enrollments
        .decide(&portal.login_as(&other_instructor), &requested.id, ApprovalStage::Instructor, Decision::Approve)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        InternalError::Access(AccessError::NotCourseInstructor { .. })
    ));
    assert!(matches!(PortalError::from(err), PortalError::Forbidden(_)));

    portal
        .enrollments
        .decide(&portal.login_as(&owner), &requested.id, ApprovalStage::Instructor, Decision::Approve)
        .await
        .unwrap();

    let err = portal
        .enrollments
        .decide(&portal.login_as(&other_advisor), &requested.id, ApprovalStage::Advisor, Decision::Approve)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        InternalError::Access(AccessError::NotAssignedAdvisor { .. })
    ));

    // Students cannot act at either stage
    let err = portal
        .enrollments
        .decide(&portal.login_as(&student), &requested.id, ApprovalStage::Advisor, Decision::Approve)
        .await
        .unwrap_err();
    assert!(matches!(err, InternalError::Access(AccessError::RoleRequired { .. })));
}

#[tokio::test]
async fn test_missing_advisor_is_recovered_by_admin_assignment() {
    let portal = Portal::new().await;
    let instructor = portal.instructor("prof@uni.edu", "CSE").await;
    let reviewer = portal.advisor("fa@uni.edu", "CSE", 2).await;
    // No advisor covers ME year 3
    let student = portal.student("me1@uni.edu", "2021ME001", "ME", 3).await;
    let course = portal.open_course(&instructor, &reviewer, "CS201").await;

    let requested = portal
        .enrollments
        .request_enrollment(&portal.login_as(&student), &course.id)
        .await
        .unwrap();
    assert!(requested.faculty_advisor_id.is_none());

    portal
        .enrollments
        .decide(&portal.login_as(&instructor), &requested.id, ApprovalStage::Instructor, Decision::Approve)
        .await
        .unwrap();

    let admin = portal.admin_user("admin@uni.edu").await;
    let admin_ctx = portal.login_as(&admin);

    let unassigned = portal.admin.unassigned_enrollments(&admin_ctx).await.unwrap();
    assert_eq!(unassigned.len(), 1);

    let me_advisor = portal.advisor("fa-me@uni.edu", "ME", 3).await;

    // Assigning a non-advisor is refused
    let err = portal
        .admin
        .assign_advisor(&admin_ctx, &requested.id, &instructor.id)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        InternalError::Enrollment(EnrollmentError::AdvisorNotFound { .. })
    ));

    let assigned = portal
        .admin
        .assign_advisor(&admin_ctx, &requested.id, &me_advisor.id)
        .await
        .unwrap();
    assert_eq!(assigned.faculty_advisor_id.as_deref(), Some(me_advisor.id.as_str()));
    assert!(portal.admin.unassigned_enrollments(&admin_ctx).await.unwrap().is_empty());

    let enrolled = portal
        .enrollments
        .decide(&portal.login_as(&me_advisor), &requested.id, ApprovalStage::Advisor, Decision::Approve)
        .await
        .unwrap();
    assert_eq!(enrolled.status, EnrollmentStatus::Enrolled);
}

#[tokio::test]
async fn test_course_roster_is_limited_to_owner() {
    let portal = Portal::new().await;
    let owner = portal.instructor("prof@uni.edu", "CSE").await;
    let other = portal.instructor("other@uni.edu", "CSE").await;
    let advisor = portal.advisor("fa@uni.edu", "CSE", 2).await;
    let student = portal.student("s1@uni.edu", "2022CS001", "CSE", 2).await;
    let course = portal.open_course(&owner, &advisor, "CS201").await;

    portal
        .enrollments
        .request_enrollment(&portal.login_as(&student), &course.id)
        .await
        .unwrap();

    let roster = portal
        .enrollments
        .course_roster(&portal.login_as(&owner), &course.id)
        .await
        .unwrap();
    assert_eq!(roster.len(), 1);

    let err = portal
        .enrollments
        .course_roster(&portal.login_as(&other), &course.id)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        InternalError::Access(AccessError::NotCourseInstructor { .. })
    ));
}

#[tokio::test]
async fn test_racing_instructor_decisions_let_exactly_one_win() {
    let portal = Portal::new().await;
    let instructor = portal.instructor("prof@uni.edu", "CSE").await;
    let advisor = portal.advisor("fa@uni.edu", "CSE", 2).await;
    let student = portal.student("s1@uni.edu", "2022CS001", "CSE", 2).await;
    let course = portal.open_course(&instructor, &advisor, "CS201").await;
    let instructor_ctx = portal.login_as(&instructor);

    let requested = portal
        .enrollments
        .request_enrollment(&portal.login_as(&student), &course.id)
        .await
        .unwrap();

    let (reject, approve) = tokio::join!(
        portal
            .enrollments
            .decide(&instructor_ctx, &requested.id, ApprovalStage::Instructor, Decision::Reject),
        portal
            .enrollments
            .decide(&instructor_ctx, &requested.id, ApprovalStage::Instructor, Decision::Approve),
    );

    let (winner, loser) = match (reject, approve) {
        (Ok(won), Err(lost)) | (Err(lost), Ok(won)) => (won, lost),
        (reject, approve) => panic!("expected one winner, got reject={:?} approve={:?}", reject, approve),
    };
    assert!(matches!(
        loser,
        InternalError::Enrollment(EnrollmentError::InvalidTransition { .. })
    ));

    let stored = portal
        .app_data
        .enrollment_store
        .require_enrollment(&portal.app_data.db, &requested.id)
        .await
        .unwrap();
    assert_eq!(stored.status, winner.status);
}

#[tokio::test]
async fn test_demoted_advisor_releases_pending_enrollments() {
    let portal = Portal::new().await;
    let instructor = portal.instructor("prof@uni.edu", "CSE").await;
    let advisor = portal.advisor("fa@uni.edu", "CSE", 2).await;
    let student = portal.student("s1@uni.edu", "2022CS001", "CSE", 2).await;
    let course = portal.open_course(&instructor, &advisor, "CS201").await;
    let admin = portal.admin_user("admin@uni.edu").await;
    let admin_ctx = portal.login_as(&admin);

    let requested = portal
        .enrollments
        .request_enrollment(&portal.login_as(&student), &course.id)
        .await
        .unwrap();
    portal
        .enrollments
        .decide(&portal.login_as(&instructor), &requested.id, ApprovalStage::Instructor, Decision::Approve)
        .await
        .unwrap();

    let demoted = portal
        .admin
        .update_user(
            &admin_ctx,
            &advisor.id,
            UserRole::Instructor,
            UserProfile {
                email: "fa@uni.edu".to_string(),
                name: "Advisor".to_string(),
                department: Some("CSE".to_string()),
                ..UserProfile::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(demoted.role, UserRole::Instructor);

    let unassigned = portal.admin.unassigned_enrollments(&admin_ctx).await.unwrap();
    assert_eq!(unassigned.len(), 1);
    assert_eq!(unassigned[0].id, requested.id);
    assert_eq!(unassigned[0].status, EnrollmentStatus::PendingAdvisor);

    let replacement = portal.advisor("fa2@uni.edu", "CSE", 2).await;
    portal
        .admin
        .assign_advisor(&admin_ctx, &requested.id, &replacement.id)
        .await
        .unwrap();
    let enrolled = portal
        .enrollments
        .decide(&portal.login_as(&replacement), &requested.id, ApprovalStage::Advisor, Decision::Approve)
        .await
        .unwrap();
    assert_eq!(enrolled.status, EnrollmentStatus::Enrolled);
}

#[tokio::test]
async fn test_renaming_advisor_keeps_assignments() {
    let portal = Portal::new().await;
    let instructor = portal.instructor("prof@uni.edu", "CSE").await;
    let advisor = portal.advisor("fa@uni.edu", "CSE", 2).await;
    let student = portal.student("s1@uni.edu", "2022CS001", "CSE", 2).await;
    let course = portal.open_course(&instructor, &advisor, "CS201").await;
    let admin = portal.admin_user("admin@uni.edu").await;
    let admin_ctx = portal.login_as(&admin);

    let requested = portal
        .enrollments
        .request_enrollment(&portal.login_as(&student), &course.id)
        .await
        .unwrap();

    portal
        .admin
        .update_user(
            &admin_ctx,
            &advisor.id,
            UserRole::FacultyAdvisor,
            UserProfile {
                email: "fa@uni.edu".to_string(),
                name: "Renamed Advisor".to_string(),
                department: Some("CSE".to_string()),
                year: Some(2),
                ..UserProfile::default()
            },
        )
        .await
        .unwrap();

    assert!(portal.admin.unassigned_enrollments(&admin_ctx).await.unwrap().is_empty());
    let stored = portal
        .app_data
        .enrollment_store
        .require_enrollment(&portal.app_data.db, &requested.id)
        .await
        .unwrap();
    assert_eq!(stored.faculty_advisor_id.as_deref(), Some(advisor.id.as_str()));
}

#[tokio::test]
async fn test_decided_records_leave_the_recovery_queue() {
    let portal = Portal::new().await;
    let instructor = portal.instructor("prof@uni.edu", "CSE").await;
    let reviewer = portal.advisor("fa@uni.edu", "CSE", 2).await;
    // No advisor covers ME year 3
    let student = portal.student("me1@uni.edu", "2021ME001", "ME", 3).await;
    let course = portal.open_course(&instructor, &reviewer, "CS201").await;
    let admin = portal.admin_user("admin@uni.edu").await;
    let admin_ctx = portal.login_as(&admin);

    let requested = portal
        .enrollments
        .request_enrollment(&portal.login_as(&student), &course.id)
        .await
        .unwrap();
    assert_eq!(portal.admin.unassigned_enrollments(&admin_ctx).await.unwrap().len(), 1);

    portal
        .enrollments
        .decide(&portal.login_as(&instructor), &requested.id, ApprovalStage::Instructor, Decision::Reject)
        .await
        .unwrap();
    assert!(portal.admin.unassigned_enrollments(&admin_ctx).await.unwrap().is_empty());

    let me_advisor = portal.advisor("fa-me@uni.edu", "ME", 3).await;
    let err = portal
        .admin
        .assign_advisor(&admin_ctx, &requested.id, &me_advisor.id)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        InternalError::Enrollment(EnrollmentError::InvalidTransition {
            from: EnrollmentStatus::Rejected,
            ..
        })
    ));
    assert!(matches!(PortalError::from(err), PortalError::Conflict(_)));

    let stored = portal
        .app_data
        .enrollment_store
        .require_enrollment(&portal.app_data.db, &requested.id)
        .await
        .unwrap();
    assert!(stored.faculty_advisor_id.is_none());
}
