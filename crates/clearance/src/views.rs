//! Serializable projections of the domain records. Credentials and raw
//! submission payloads never appear in a view.

use chrono::NaiveDate;
use serde::Serialize;

use crate::domain::{
    Admin, Department, Requirement, StaffMember, Student, Submission,
};

#[derive(Debug, Clone, Serialize)]
pub struct SubmissionView {
    pub file_name: String,
    pub content_type: String,
    pub submitted_on: NaiveDate,
}

impl From<&Submission> for SubmissionView {
    fn from(submission: &Submission) -> Self {
        Self {
            file_name: submission.file_name.clone(),
            content_type: submission.content_type.clone(),
            submitted_on: submission.submitted_on,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RequirementView {
    pub id: u32,
    pub department: Department,
    pub description: String,
    pub status: &'static str,
    pub remarks: String,
    pub due_date: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub submission: Option<SubmissionView>,
    pub version: u64,
}

impl From<&Requirement> for RequirementView {
    fn from(requirement: &Requirement) -> Self {
        Self {
            id: requirement.id,
            department: requirement.department,
            description: requirement.description.clone(),
            status: requirement.status.label(),
            remarks: requirement.remarks.clone(),
            due_date: requirement.due_date,
            submission: requirement.submission.as_ref().map(SubmissionView::from),
            version: requirement.version,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct StudentView {
    pub id: String,
    pub name: String,
    pub email: String,
    pub course: String,
    pub year_level: String,
    pub clearance_status: &'static str,
    pub requirements: Vec<RequirementView>,
}

impl From<&Student> for StudentView {
    fn from(student: &Student) -> Self {
        Self {
            id: student.id.0.clone(),
            name: student.name.clone(),
            email: student.email.clone(),
            course: student.course.clone(),
            year_level: student.year_level.clone(),
            clearance_status: student.clearance_status.label(),
            requirements: student.requirements.iter().map(RequirementView::from).collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct StaffView {
    pub id: String,
    pub name: String,
    pub email: String,
    pub department: Department,
    pub role: String,
}

impl From<&StaffMember> for StaffView {
    fn from(member: &StaffMember) -> Self {
        Self {
            id: member.id.0.clone(),
            name: member.name.clone(),
            email: member.email.clone(),
            department: member.department,
            role: member.role.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AdminView {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: String,
}

impl From<&Admin> for AdminView {
    fn from(admin: &Admin) -> Self {
        Self {
            id: admin.id.0.clone(),
            name: admin.name.clone(),
            email: admin.email.clone(),
            role: admin.role.clone(),
        }
    }
}

/// Role-tagged view returned by login and session lookups.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "role", rename_all = "lowercase")]
pub enum AuthenticatedUser {
    Student(StudentView),
    Staff(StaffView),
    Admin(AdminView),
}

/// Shortened student record used in per-department rosters.
#[derive(Debug, Clone, Serialize)]
pub struct StudentSummary {
    pub id: String,
    pub name: String,
    pub course: String,
    pub year_level: String,
    pub clearance_status: &'static str,
}

impl From<&Student> for StudentSummary {
    fn from(student: &Student) -> Self {
        Self {
            id: student.id.0.clone(),
            name: student.name.clone(),
            course: student.course.clone(),
            year_level: student.year_level.clone(),
            clearance_status: student.clearance_status.label(),
        }
    }
}

/// One roster row: a student annotated with the single requirement belonging
/// to the queried department.
#[derive(Debug, Clone, Serialize)]
pub struct DepartmentRosterEntry {
    pub student: StudentSummary,
    pub requirement: RequirementView,
}

#[derive(Debug, Clone, Serialize)]
pub struct DepartmentBreakdown {
    pub department: Department,
    pub approved: usize,
    /// Counts both untouched and submitted-but-unreviewed requirements.
    pub pending: usize,
    pub rejected: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct ClearanceStatistics {
    pub total_students: usize,
    pub completed: usize,
    pub in_progress: usize,
    pub departments: Vec<DepartmentBreakdown>,
}
