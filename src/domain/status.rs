use super::StateError;
use crate::database::models::ReportStatus;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Approve,
    Reject,
}

/// Status a project line takes when its report is submitted. Lines with no
/// hours skip the review queue entirely and are approved on the spot.
pub fn submit_status(current: ReportStatus, total_hours: i32) -> ReportStatus {
    match current {
        ReportStatus::Draft | ReportStatus::Rejected => {
            if total_hours == 0 {
                ReportStatus::Approved
            } else {
                ReportStatus::Submitted
            }
        }
        other => other,
    }
}

/// A manager's verdict on a single line. Only submitted lines can be decided.
pub fn decide(current: ReportStatus, decision: Decision) -> Result<ReportStatus, StateError> {
    if current != ReportStatus::Submitted {
        return Err(StateError::NotAwaitingDecision { status: current });
    }
    Ok(match decision {
        Decision::Approve => ReportStatus::Approved,
        Decision::Reject => ReportStatus::Rejected,
    })
}

/// The parent report adopts the most demanding status present among its
/// lines: one rejection taints the whole report, one unfinished draft keeps
/// it open, and so on. `None` when there are no lines to judge by.
pub fn derive_report_status(children: &[ReportStatus]) -> Option<ReportStatus> {
    const PRIORITY: [ReportStatus; 4] = [
        ReportStatus::Rejected,
        ReportStatus::Draft,
        ReportStatus::Submitted,
        ReportStatus::Approved,
    ];
    PRIORITY.into_iter().find(|status| children.contains(status))
}

pub fn ensure_editable(status: ReportStatus) -> Result<(), StateError> {
    match status {
        ReportStatus::Draft | ReportStatus::Rejected => Ok(()),
        other => Err(StateError::ReportNotEditable { status: other }),
    }
}

pub fn ensure_line_unlocked(status: ReportStatus) -> Result<(), StateError> {
    match status {
        ReportStatus::Draft | ReportStatus::Rejected => Ok(()),
        other => Err(StateError::LineLocked { status: other }),
    }
}
