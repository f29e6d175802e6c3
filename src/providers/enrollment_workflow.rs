//! Enrollment approval state machine.
//!
//! `PENDING_INSTRUCTOR -> PENDING_ADVISOR -> ENROLLED`, with `REJECTED`
//! reachable from either pending state. Status never moves backward.

use crate::errors::internal::EnrollmentError;
use crate::types::db::EnrollmentStatus;
use crate::types::internal::Decision;

const MAX_RECORD_LENGTH: usize = 32;

/// Who is deciding on the enrollment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApprovalStage {
    Instructor,
    Advisor,
}

impl ApprovalStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApprovalStage::Instructor => "instructor",
            ApprovalStage::Advisor => "faculty_advisor",
        }
    }

    /// The only status this stage may decide on
    pub fn pending_status(&self) -> EnrollmentStatus {
        match self {
            ApprovalStage::Instructor => EnrollmentStatus::PendingInstructor,
            ApprovalStage::Advisor => EnrollmentStatus::PendingAdvisor,
        }
    }
}

pub fn transition(
    current: EnrollmentStatus,
    stage: ApprovalStage,
    decision: Decision,
) -> Result<EnrollmentStatus, EnrollmentError> {
    use crate::types::db::EnrollmentStatus::*;

    match (current, stage, decision) {
        (PendingInstructor, ApprovalStage::Instructor, Decision::Approve) => Ok(PendingAdvisor),
        (PendingAdvisor, ApprovalStage::Advisor, Decision::Approve) => Ok(Enrolled),
        (PendingInstructor, ApprovalStage::Instructor, Decision::Reject)
        | (PendingAdvisor, ApprovalStage::Advisor, Decision::Reject) => Ok(Rejected),
        (from, stage, _) => Err(EnrollmentError::InvalidTransition {
            from,
            stage: stage.as_str(),
        }),
    }
}

/// Grade and attendance may only be written once the student is enrolled
pub fn ensure_recordable(status: EnrollmentStatus) -> Result<(), EnrollmentError> {
    if status == EnrollmentStatus::Enrolled {
        Ok(())
    } else {
        Err(EnrollmentError::NotEnrolled { status })
    }
}

/// Check a grade or attendance value; the value itself is stored untouched
pub fn validate_record_value(field: &str, value: &str) -> Result<(), EnrollmentError> {
    if value.trim().is_empty() {
        return Err(EnrollmentError::InvalidRecord {
            field: field.to_string(),
            reason: "must not be empty".to_string(),
        });
    }
    if value.chars().count() > MAX_RECORD_LENGTH {
        return Err(EnrollmentError::InvalidRecord {
            field: field.to_string(),
            reason: format!("must be at most {} characters", MAX_RECORD_LENGTH),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::db::EnrollmentStatus::*;

    const ALL: [EnrollmentStatus; 4] = [PendingInstructor, PendingAdvisor, Enrolled, Rejected];

    #[test]
    fn test_happy_path() {
        let after_instructor = transition(PendingInstructor, ApprovalStage::Instructor, Decision::Approve).unwrap();
        assert_eq!(after_instructor, PendingAdvisor);

        let after_advisor = transition(after_instructor, ApprovalStage::Advisor, Decision::Approve).unwrap();
        assert_eq!(after_advisor, Enrolled);
    }

    #[test]
    fn test_either_stage_can_reject() {
        assert_eq!(
            transition(PendingInstructor, ApprovalStage::Instructor, Decision::Reject).unwrap(),
            Rejected
        );
        assert_eq!(
            transition(PendingAdvisor, ApprovalStage::Advisor, Decision::Reject).unwrap(),
            Rejected
        );
    }

    #[test]
    fn test_advisor_cannot_act_before_instructor() {
        assert!(matches!(
            transition(PendingInstructor, ApprovalStage::Advisor, Decision::Approve),
            Err(EnrollmentError::InvalidTransition {
                from: PendingInstructor,
                stage: "faculty_advisor"
            })
        ));
    }

    #[test]
    fn test_instructor_cannot_act_twice() {
        assert!(transition(PendingAdvisor, ApprovalStage::Instructor, Decision::Approve).is_err());
        assert!(transition(PendingAdvisor, ApprovalStage::Instructor, Decision::Reject).is_err());
    }

    #[test]
    fn test_terminal_states_accept_nothing() {
        for current in [Enrolled, Rejected] {
            for stage in [ApprovalStage::Instructor, ApprovalStage::Advisor] {
                for decision in [Decision::Approve, Decision::Reject] {
                    assert!(transition(current, stage, decision).is_err());
                }
            }
        }
    }

    #[test]
    fn test_status_never_moves_backward() {
        fn rank(s: EnrollmentStatus) -> u8 {
            match s {
                PendingInstructor => 0,
                PendingAdvisor => 1,
                Enrolled | Rejected => 2,
            }
        }

        for current in ALL {
            for stage in [ApprovalStage::Instructor, ApprovalStage::Advisor] {
                for decision in [Decision::Approve, Decision::Reject] {
                    if let Ok(next) = transition(current, stage, decision) {
                        assert!(rank(next) > rank(current));
                    }
                }
            }
        }
    }

    #[test]
    fn test_records_require_enrolled() {
        assert!(ensure_recordable(Enrolled).is_ok());
        for status in [PendingInstructor, PendingAdvisor, Rejected] {
            assert!(matches!(
                ensure_recordable(status),
                Err(EnrollmentError::NotEnrolled { .. })
            ));
        }
    }

    #[test]
    fn test_record_value_validation() {
        assert!(validate_record_value("grade", "A-").is_ok());
        assert!(validate_record_value("attendance", "87%").is_ok());
        assert!(validate_record_value("grade", "  ").is_err());
        assert!(validate_record_value("grade", &"x".repeat(33)).is_err());
    }
}
