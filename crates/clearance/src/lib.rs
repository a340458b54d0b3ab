//! University clearance tracking: student registration, the per-department
//! requirement state machine, staff review, and aggregate reporting.
//!
//! The service facade owns every mutation; repositories are traits so the
//! store can be swapped or faked in tests, and HTTP is a thin router over
//! the same operations.

pub mod config;
pub mod domain;
pub mod error;
pub mod repository;
pub mod router;
pub mod service;
pub mod telemetry;
pub mod views;

#[cfg(test)]
mod tests;

pub use domain::{
    Admin, AdminId, ClearanceStatus, Department, NewStaff, NewStudent, Requirement,
    RequirementStatus, ReviewDecision, Role, Session, StaffId, StaffMember, StaffUpdate, Student,
    StudentId, StudentUpdate, Submission, SubmissionFile,
};
pub use repository::{AdminRepository, RepositoryError, StaffRepository, StudentRepository};
pub use router::{clearance_router, LoginRequest, ReviewRequest};
pub use service::{ClearanceError, ClearanceService};
pub use views::{
    AdminView, AuthenticatedUser, ClearanceStatistics, DepartmentBreakdown,
    DepartmentRosterEntry, RequirementView, StaffView, StudentSummary, StudentView,
    SubmissionView,
};
