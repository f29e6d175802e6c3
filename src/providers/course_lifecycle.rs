//! Course offering lifecycle: `PENDING_APPROVAL` moves once to `OPEN` or `REJECTED`.

use crate::errors::internal::CourseError;
use crate::types::db::CourseStatus;
use crate::types::internal::Decision;

/// Result of applying a review decision
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewOutcome {
    /// Status moved; the new value must be persisted
    Changed(CourseStatus),
    /// The course already carries the requested status; nothing to write
    Unchanged(CourseStatus),
}

impl ReviewOutcome {
    pub fn status(&self) -> CourseStatus {
        match self {
            ReviewOutcome::Changed(status) | ReviewOutcome::Unchanged(status) => *status,
        }
    }
}

fn target_status(decision: Decision) -> CourseStatus {
    match decision {
        Decision::Approve => CourseStatus::Open,
        Decision::Reject => CourseStatus::Rejected,
    }
}

/// Apply an approve/reject decision to a course in status `current`
///
/// Repeating the decision that produced the current status succeeds without
/// change. The opposite decision on a decided course is refused.
pub fn review(current: CourseStatus, decision: Decision) -> Result<ReviewOutcome, CourseError> {
    let target = target_status(decision);
    match current {
        CourseStatus::PendingApproval => Ok(ReviewOutcome::Changed(target)),
        decided if decided == target => Ok(ReviewOutcome::Unchanged(decided)),
        decided => Err(CourseError::InvalidTransition {
            from: decided,
            to: target,
        }),
    }
}

/// Check a Lecture-Tutorial-Practical string such as `3-1-2`
pub fn validate_ltp(ltp: &str) -> Result<String, CourseError> {
    let ltp = ltp.trim();
    let parts: Vec<&str> = ltp.split('-').collect();
    let well_formed = parts.len() == 3
        && parts
            .iter()
            .all(|p| !p.is_empty() && p.len() <= 2 && p.chars().all(|c| c.is_ascii_digit()));

    if !well_formed {
        return Err(CourseError::invalid_field(
            "ltp",
            "must be three non-negative integers joined by '-', e.g. 3-1-2",
        ));
    }
    Ok(ltp.to_string())
}

/// Course fields after validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CourseOffer {
    pub course_code: String,
    pub title: String,
    pub department: String,
    pub year: i32,
    pub ltp: String,
    pub session: String,
}

pub fn validate_offer(offer: CourseOffer) -> Result<CourseOffer, CourseError> {
    let course_code = required("courseCode", &offer.course_code, 32)?.to_uppercase();
    let title = required("title", &offer.title, 200)?;
    let department = required("department", &offer.department, 64)?;
    let session = required("session", &offer.session, 32)?;
    if offer.year <= 0 {
        return Err(CourseError::invalid_field("year", "must be a positive number"));
    }
    let ltp = validate_ltp(&offer.ltp)?;

    Ok(CourseOffer {
        course_code,
        title,
        department,
        year: offer.year,
        ltp,
        session,
    })
}

fn required(field: &str, value: &str, max: usize) -> Result<String, CourseError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(CourseError::invalid_field(field, "is required"));
    }
    if value.chars().count() > max {
        return Err(CourseError::invalid_field(field, format!("must be at most {} characters", max)));
    }
    Ok(value.to_string())
}
