use std::fmt;

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

/// Offices that each sign off on one requirement per student.
///
/// The set is fixed and the order matters: requirement lists are generated
/// in this order with 1-based ids at registration time and never change
/// afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Department {
    Library,
    Laboratory,
    Finance,
    Registrar,
    #[serde(rename = "Student Affairs")]
    StudentAffairs,
    Department,
}

impl Department {
    pub const ALL: [Department; 6] = [
        Department::Library,
        Department::Laboratory,
        Department::Finance,
        Department::Registrar,
        Department::StudentAffairs,
        Department::Department,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            Department::Library => "Library",
            Department::Laboratory => "Laboratory",
            Department::Finance => "Finance",
            Department::Registrar => "Registrar",
            Department::StudentAffairs => "Student Affairs",
            Department::Department => "Department",
        }
    }

    /// URL-safe identifier used in route paths.
    pub const fn slug(self) -> &'static str {
        match self {
            Department::Library => "library",
            Department::Laboratory => "laboratory",
            Department::Finance => "finance",
            Department::Registrar => "registrar",
            Department::StudentAffairs => "student-affairs",
            Department::Department => "department",
        }
    }

    pub fn from_slug(slug: &str) -> Option<Self> {
        Department::ALL
            .into_iter()
            .find(|department| department.slug() == slug.trim().to_ascii_lowercase())
    }

    /// Checklist text seeded onto a freshly generated requirement.
    pub const fn default_description(self) -> &'static str {
        match self {
            Department::Library => "Return all borrowed books and clear any fines",
            Department::Laboratory => "Clear laboratory equipment and settle any damages",
            Department::Finance => "Settle all outstanding balance and fees",
            Department::Registrar => "Submit all required graduation documents",
            Department::StudentAffairs => "Return student ID and settle any obligations",
            Department::Department => "Complete all academic requirements and thesis/capstone",
        }
    }
}

impl fmt::Display for Department {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Per-requirement lifecycle. Transitions are enforced by the service:
/// pending/rejected accept a submission, only submitted requirements can be
/// reviewed, and approved is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequirementStatus {
    Pending,
    Submitted,
    Approved,
    Rejected,
}

impl RequirementStatus {
    pub const fn label(self) -> &'static str {
        match self {
            RequirementStatus::Pending => "pending",
            RequirementStatus::Submitted => "submitted",
            RequirementStatus::Approved => "approved",
            RequirementStatus::Rejected => "rejected",
        }
    }

    /// Untouched or bounced-back requirements accept a new file.
    pub const fn accepts_submission(self) -> bool {
        matches!(
            self,
            RequirementStatus::Pending | RequirementStatus::Rejected
        )
    }

    pub const fn awaits_review(self) -> bool {
        matches!(self, RequirementStatus::Submitted)
    }
}

impl fmt::Display for RequirementStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Aggregate completion state across all of a student's requirements,
/// recomputed after every requirement mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClearanceStatus {
    #[serde(rename = "in-progress")]
    InProgress,
    #[serde(rename = "completed")]
    Completed,
}

impl ClearanceStatus {
    pub const fn label(self) -> &'static str {
        match self {
            ClearanceStatus::InProgress => "in-progress",
            ClearanceStatus::Completed => "completed",
        }
    }
}

/// Identifier formatted `STU-<year>-<seq>`, e.g. `STU-2026-004`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StudentId(pub String);

impl StudentId {
    pub fn new(year: i32, sequence: u32) -> Self {
        Self(format!("STU-{year}-{sequence:03}"))
    }

    /// Numeric suffix of the id, or zero when it does not follow the scheme.
    pub fn sequence(&self) -> u32 {
        self.0
            .rsplit('-')
            .next()
            .and_then(|suffix| suffix.parse().ok())
            .unwrap_or(0)
    }
}

impl fmt::Display for StudentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier formatted `STAFF-<seq>`, e.g. `STAFF-003`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StaffId(pub String);

impl StaffId {
    pub fn new(sequence: u32) -> Self {
        Self(format!("STAFF-{sequence:03}"))
    }

    pub fn sequence(&self) -> u32 {
        self.0
            .rsplit('-')
            .next()
            .and_then(|suffix| suffix.parse().ok())
            .unwrap_or(0)
    }
}

impl fmt::Display for StaffId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AdminId(pub String);

impl fmt::Display for AdminId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Student,
    Staff,
    Admin,
}

/// The authenticated principal. Holds only the record identifier; consumers
/// re-fetch the canonical record so views never observe stale data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Session {
    Student(StudentId),
    Staff(StaffId),
    Admin(AdminId),
}

impl Session {
    pub const fn role(&self) -> Role {
        match self {
            Session::Student(_) => Role::Student,
            Session::Staff(_) => Role::Staff,
            Session::Admin(_) => Role::Admin,
        }
    }
}

/// Inbound file attached when a student submits a requirement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionFile {
    pub file_name: String,
    pub content_type: String,
    /// Data-URI payload; kept in memory, never written to disk.
    pub data: String,
}

/// Stored artifact and metadata of an accepted submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    pub file_name: String,
    pub content_type: String,
    pub data: String,
    pub submitted_on: NaiveDate,
}

/// One department's clearance checklist item for one student.
#[derive(Debug, Clone, PartialEq)]
pub struct Requirement {
    pub id: u32,
    pub department: Department,
    pub description: String,
    pub status: RequirementStatus,
    pub remarks: String,
    pub due_date: NaiveDate,
    pub submission: Option<Submission>,
    /// Bumped on every mutation; reviewers can pass the version they read
    /// to detect a concurrent update before their decision lands.
    pub version: u64,
}

impl Requirement {
    /// A fresh pending requirement with the department's default checklist
    /// text, due 30 days after registration.
    pub fn seeded(id: u32, department: Department, registered_on: NaiveDate) -> Self {
        Self {
            id,
            department,
            description: department.default_description().to_string(),
            status: RequirementStatus::Pending,
            remarks: String::new(),
            due_date: registered_on + Duration::days(30),
            submission: None,
            version: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Student {
    pub id: StudentId,
    pub name: String,
    pub email: String,
    pub course: String,
    pub year_level: String,
    pub credential: String,
    pub clearance_status: ClearanceStatus,
    pub requirements: Vec<Requirement>,
}

impl Student {
    pub fn requirement(&self, requirement_id: u32) -> Option<&Requirement> {
        self.requirements
            .iter()
            .find(|requirement| requirement.id == requirement_id)
    }

    pub fn requirement_mut(&mut self, requirement_id: u32) -> Option<&mut Requirement> {
        self.requirements
            .iter_mut()
            .find(|requirement| requirement.id == requirement_id)
    }

    pub fn requirement_for(&self, department: Department) -> Option<&Requirement> {
        self.requirements
            .iter()
            .find(|requirement| requirement.department == department)
    }

    /// Completed iff every requirement is approved. Called after each
    /// requirement mutation so the flag is never stale.
    pub fn recompute_clearance(&mut self) {
        let all_approved = !self.requirements.is_empty()
            && self
                .requirements
                .iter()
                .all(|requirement| requirement.status == RequirementStatus::Approved);

        self.clearance_status = if all_approved {
            ClearanceStatus::Completed
        } else {
            ClearanceStatus::InProgress
        };
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct StaffMember {
    pub id: StaffId,
    pub name: String,
    pub email: String,
    pub credential: String,
    /// Determines which students' requirements this member may review.
    pub department: Department,
    pub role: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Admin {
    pub id: AdminId,
    pub name: String,
    pub email: String,
    pub credential: String,
    pub role: String,
}

/// Registration payload for a new student.
#[derive(Debug, Clone, Deserialize)]
pub struct NewStudent {
    pub name: String,
    pub email: String,
    pub course: String,
    pub year_level: String,
    pub credential: String,
}

/// Payload for adding a staff member (admin operation).
#[derive(Debug, Clone, Deserialize)]
pub struct NewStaff {
    pub name: String,
    pub email: String,
    pub credential: String,
    pub department: Department,
    pub role: String,
}

/// Partial profile update; requirements and clearance state are untouched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StudentUpdate {
    pub name: Option<String>,
    pub email: Option<String>,
    pub course: Option<String>,
    pub year_level: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct StaffUpdate {
    pub name: Option<String>,
    pub email: Option<String>,
    pub department: Option<Department>,
    pub role: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReviewDecision {
    Approved,
    Rejected,
}
