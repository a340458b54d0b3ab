use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

use chrono::{Datelike, Local, NaiveDate};
use tracing::info;

use crate::domain::{
    ClearanceStatus, Department, NewStaff, NewStudent, Requirement, RequirementStatus,
    ReviewDecision, Role, Session, StaffId, StaffMember, StaffUpdate, Student, StudentId,
    StudentUpdate, Submission, SubmissionFile,
};
use crate::repository::{AdminRepository, RepositoryError, StaffRepository, StudentRepository};
use crate::views::{
    AuthenticatedUser, ClearanceStatistics, DepartmentBreakdown, DepartmentRosterEntry,
    RequirementView, StudentSummary,
};

/// Recoverable business failures surfaced by the clearance operations.
#[derive(Debug, thiserror::Error)]
pub enum ClearanceError {
    #[error("email already registered")]
    DuplicateEmail,
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("requirement is {from} and cannot accept {action}")]
    InvalidTransition {
        from: RequirementStatus,
        action: &'static str,
    },
    #[error("remarks are required when rejecting a requirement")]
    RemarksRequired,
    #[error("record not found")]
    NotFound,
    #[error("staff assigned to {assigned} cannot review a {required} requirement")]
    DepartmentMismatch {
        assigned: Department,
        required: Department,
    },
    #[error("requirement changed since it was read (expected version {expected}, found {found})")]
    StaleRequirement { expected: u64, found: u64 },
    #[error("{0} must not be empty")]
    MissingField(&'static str),
    #[error("unsupported submission content type: {0}")]
    UnsupportedFileType(String),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

fn require_field(name: &'static str, value: &str) -> Result<(), ClearanceError> {
    if value.trim().is_empty() {
        return Err(ClearanceError::MissingField(name));
    }
    Ok(())
}

/// Service funnelling every mutation of the clearance store through the
/// registration, submission, and review operations.
///
/// Holds the single authenticated session as an identifier only; reads go
/// back to the canonical repositories every time.
pub struct ClearanceService<S, T, A> {
    students: Arc<S>,
    staff: Arc<T>,
    admins: Arc<A>,
    session: Mutex<Option<Session>>,
    // High-water marks so id suffixes are never reused after a deletion.
    student_sequence: AtomicU32,
    staff_sequence: AtomicU32,
}

impl<S, T, A> ClearanceService<S, T, A>
where
    S: StudentRepository + 'static,
    T: StaffRepository + 'static,
    A: AdminRepository + 'static,
{
    pub fn new(students: Arc<S>, staff: Arc<T>, admins: Arc<A>) -> Self {
        Self {
            students,
            staff,
            admins,
            session: Mutex::new(None),
            student_sequence: AtomicU32::new(0),
            staff_sequence: AtomicU32::new(0),
        }
    }

    /// Register a new student, seeding one pending requirement per
    /// department due 30 days from today.
    pub fn register_student(&self, profile: NewStudent) -> Result<Student, ClearanceError> {
        self.register_student_on(profile, Local::now().date_naive())
    }

    pub fn register_student_on(
        &self,
        profile: NewStudent,
        registered_on: NaiveDate,
    ) -> Result<Student, ClearanceError> {
        require_field("name", &profile.name)?;
        require_field("email", &profile.email)?;
        require_field("course", &profile.course)?;
        require_field("year_level", &profile.year_level)?;
        require_field("credential", &profile.credential)?;

        let roster = self.students.list()?;
        if roster.iter().any(|student| student.email == profile.email) {
            return Err(ClearanceError::DuplicateEmail);
        }

        let sequence = self.next_sequence(
            &self.student_sequence,
            roster.iter().map(|student| student.id.sequence()),
        );
        let id = StudentId::new(registered_on.year(), sequence);

        let requirements = Department::ALL
            .iter()
            .enumerate()
            .map(|(index, department)| {
                Requirement::seeded(index as u32 + 1, *department, registered_on)
            })
            .collect();

        let student = Student {
            id,
            name: profile.name,
            email: profile.email,
            course: profile.course,
            year_level: profile.year_level,
            credential: profile.credential,
            clearance_status: ClearanceStatus::InProgress,
            requirements,
        };

        let stored = self.students.insert(student)?;
        info!(student = %stored.id, "student registered");
        Ok(stored)
    }

    /// Add a staff member to the directory (admin operation).
    pub fn add_staff(&self, profile: NewStaff) -> Result<StaffMember, ClearanceError> {
        require_field("name", &profile.name)?;
        require_field("email", &profile.email)?;
        require_field("credential", &profile.credential)?;
        require_field("role", &profile.role)?;

        let directory = self.staff.list()?;
        if directory.iter().any(|member| member.email == profile.email) {
            return Err(ClearanceError::DuplicateEmail);
        }

        let sequence = self.next_sequence(
            &self.staff_sequence,
            directory.iter().map(|member| member.id.sequence()),
        );

        let member = StaffMember {
            id: StaffId::new(sequence),
            name: profile.name,
            email: profile.email,
            credential: profile.credential,
            department: profile.department,
            role: profile.role,
        };

        let stored = self.staff.insert(member)?;
        info!(staff = %stored.id, department = %stored.department, "staff member added");
        Ok(stored)
    }

    /// Authenticate a user and point the session at the matched record.
    ///
    /// Students are looked up by id, staff and admins by email. The failure
    /// is the same whichever part of the credentials was wrong.
    pub fn login(
        &self,
        role: Role,
        username: &str,
        credential: &str,
    ) -> Result<AuthenticatedUser, ClearanceError> {
        let (session, user) = match role {
            Role::Student => {
                let id = StudentId(username.trim().to_string());
                match self.students.fetch(&id)? {
                    Some(student) if student.credential == credential => (
                        Session::Student(student.id.clone()),
                        AuthenticatedUser::Student((&student).into()),
                    ),
                    _ => return Err(ClearanceError::InvalidCredentials),
                }
            }
            Role::Staff => {
                let matched = self
                    .staff
                    .list()?
                    .into_iter()
                    .find(|member| member.email == username.trim());
                match matched {
                    Some(member) if member.credential == credential => (
                        Session::Staff(member.id.clone()),
                        AuthenticatedUser::Staff((&member).into()),
                    ),
                    _ => return Err(ClearanceError::InvalidCredentials),
                }
            }
            Role::Admin => {
                let matched = self
                    .admins
                    .list()?
                    .into_iter()
                    .find(|admin| admin.email == username.trim());
                match matched {
                    Some(admin) if admin.credential == credential => (
                        Session::Admin(admin.id.clone()),
                        AuthenticatedUser::Admin((&admin).into()),
                    ),
                    _ => return Err(ClearanceError::InvalidCredentials),
                }
            }
        };

        *self.session.lock().expect("session mutex poisoned") = Some(session);
        Ok(user)
    }

    pub fn logout(&self) {
        *self.session.lock().expect("session mutex poisoned") = None;
    }

    pub fn session(&self) -> Option<Session> {
        self.session.lock().expect("session mutex poisoned").clone()
    }

    /// Re-fetch the canonical record behind the session, if any. Returns
    /// `Ok(None)` both when nobody is logged in and when the record has
    /// since been deleted.
    pub fn current_user(&self) -> Result<Option<AuthenticatedUser>, ClearanceError> {
        let user = match self.session() {
            None => None,
            Some(Session::Student(id)) => self
                .students
                .fetch(&id)?
                .map(|student| AuthenticatedUser::Student((&student).into())),
            Some(Session::Staff(id)) => self
                .staff
                .fetch(&id)?
                .map(|member| AuthenticatedUser::Staff((&member).into())),
            Some(Session::Admin(id)) => self
                .admins
                .fetch(&id)?
                .map(|admin| AuthenticatedUser::Admin((&admin).into())),
        };
        Ok(user)
    }

    /// Attach a file to a pending or rejected requirement, moving it to
    /// submitted and clearing any reviewer remarks from a prior rejection.
    pub fn submit_requirement(
        &self,
        student_id: &StudentId,
        requirement_id: u32,
        file: SubmissionFile,
    ) -> Result<Requirement, ClearanceError> {
        self.submit_requirement_on(student_id, requirement_id, file, Local::now().date_naive())
    }

    pub fn submit_requirement_on(
        &self,
        student_id: &StudentId,
        requirement_id: u32,
        file: SubmissionFile,
        submitted_on: NaiveDate,
    ) -> Result<Requirement, ClearanceError> {
        require_field("file_name", &file.file_name)?;
        file.content_type
            .parse::<mime::Mime>()
            .map_err(|_| ClearanceError::UnsupportedFileType(file.content_type.clone()))?;

        let mut student = self
            .students
            .fetch(student_id)?
            .ok_or(ClearanceError::NotFound)?;
        let requirement = student
            .requirement_mut(requirement_id)
            .ok_or(ClearanceError::NotFound)?;

        if !requirement.status.accepts_submission() {
            return Err(ClearanceError::InvalidTransition {
                from: requirement.status,
                action: "a new submission",
            });
        }

        requirement.status = RequirementStatus::Submitted;
        requirement.remarks.clear();
        requirement.submission = Some(Submission {
            file_name: file.file_name,
            content_type: file.content_type,
            data: file.data,
            submitted_on,
        });
        requirement.version += 1;

        let snapshot = requirement.clone();
        student.recompute_clearance();
        self.students.update(student)?;

        info!(
            student = %student_id,
            requirement = requirement_id,
            department = %snapshot.department,
            "requirement submitted"
        );
        Ok(snapshot)
    }

    /// Approve or reject a submitted requirement on behalf of a staff
    /// member of the matching department, then recompute the student's
    /// clearance status.
    ///
    /// `expected_version` is the optimistic-concurrency token: when given,
    /// the review fails if the requirement changed since it was read.
    pub fn review_requirement(
        &self,
        reviewer_id: &StaffId,
        student_id: &StudentId,
        requirement_id: u32,
        decision: ReviewDecision,
        remarks: &str,
        expected_version: Option<u64>,
    ) -> Result<Requirement, ClearanceError> {
        let reviewer = self
            .staff
            .fetch(reviewer_id)?
            .ok_or(ClearanceError::NotFound)?;
        let mut student = self
            .students
            .fetch(student_id)?
            .ok_or(ClearanceError::NotFound)?;
        let requirement = student
            .requirement_mut(requirement_id)
            .ok_or(ClearanceError::NotFound)?;

        if reviewer.department != requirement.department {
            return Err(ClearanceError::DepartmentMismatch {
                assigned: reviewer.department,
                required: requirement.department,
            });
        }
        if !requirement.status.awaits_review() {
            return Err(ClearanceError::InvalidTransition {
                from: requirement.status,
                action: "a review",
            });
        }
        if let Some(expected) = expected_version {
            if expected != requirement.version {
                return Err(ClearanceError::StaleRequirement {
                    expected,
                    found: requirement.version,
                });
            }
        }

        let remarks = remarks.trim();
        match decision {
            ReviewDecision::Approved => {
                requirement.status = RequirementStatus::Approved;
            }
            ReviewDecision::Rejected => {
                if remarks.is_empty() {
                    return Err(ClearanceError::RemarksRequired);
                }
                requirement.status = RequirementStatus::Rejected;
            }
        }
        requirement.remarks = remarks.to_string();
        requirement.version += 1;

        let snapshot = requirement.clone();
        student.recompute_clearance();
        let clearance = student.clearance_status;
        self.students.update(student)?;

        info!(
            student = %student_id,
            requirement = requirement_id,
            reviewer = %reviewer_id,
            decision = snapshot.status.label(),
            clearance = clearance.label(),
            "requirement reviewed"
        );
        Ok(snapshot)
    }

    pub fn get_student(&self, id: &StudentId) -> Result<Student, ClearanceError> {
        self.students.fetch(id)?.ok_or(ClearanceError::NotFound)
    }

    pub fn get_staff(&self, id: &StaffId) -> Result<StaffMember, ClearanceError> {
        self.staff.fetch(id)?.ok_or(ClearanceError::NotFound)
    }

    pub fn list_students(&self) -> Result<Vec<Student>, ClearanceError> {
        let mut roster = self.students.list()?;
        roster.sort_by(|a, b| a.id.0.cmp(&b.id.0));
        Ok(roster)
    }

    pub fn list_staff(&self) -> Result<Vec<StaffMember>, ClearanceError> {
        let mut directory = self.staff.list()?;
        directory.sort_by(|a, b| a.id.0.cmp(&b.id.0));
        Ok(directory)
    }

    /// Update a student's profile fields; requirements are untouched.
    pub fn update_student(
        &self,
        id: &StudentId,
        update: StudentUpdate,
    ) -> Result<Student, ClearanceError> {
        let mut student = self.students.fetch(id)?.ok_or(ClearanceError::NotFound)?;

        if let Some(email) = &update.email {
            require_field("email", email)?;
            if *email != student.email {
                let taken = self
                    .students
                    .list()?
                    .iter()
                    .any(|other| other.id != *id && other.email == *email);
                if taken {
                    return Err(ClearanceError::DuplicateEmail);
                }
            }
            student.email = email.clone();
        }
        if let Some(name) = update.name {
            require_field("name", &name)?;
            student.name = name;
        }
        if let Some(course) = update.course {
            student.course = course;
        }
        if let Some(year_level) = update.year_level {
            student.year_level = year_level;
        }

        self.students.update(student.clone())?;
        Ok(student)
    }

    pub fn update_staff(
        &self,
        id: &StaffId,
        update: StaffUpdate,
    ) -> Result<StaffMember, ClearanceError> {
        let mut member = self.staff.fetch(id)?.ok_or(ClearanceError::NotFound)?;

        if let Some(email) = &update.email {
            require_field("email", email)?;
            if *email != member.email {
                let taken = self
                    .staff
                    .list()?
                    .iter()
                    .any(|other| other.id != *id && other.email == *email);
                if taken {
                    return Err(ClearanceError::DuplicateEmail);
                }
            }
            member.email = email.clone();
        }
        if let Some(name) = update.name {
            require_field("name", &name)?;
            member.name = name;
        }
        if let Some(department) = update.department {
            member.department = department;
        }
        if let Some(role) = update.role {
            member.role = role;
        }

        self.staff.update(member.clone())?;
        Ok(member)
    }

    /// Remove a student; the session is logged out if it points at the
    /// deleted record. The id suffix is never handed out again.
    pub fn delete_student(&self, id: &StudentId) -> Result<(), ClearanceError> {
        self.students.remove(id).map_err(|err| match err {
            RepositoryError::NotFound => ClearanceError::NotFound,
            other => ClearanceError::Repository(other),
        })?;

        let mut session = self.session.lock().expect("session mutex poisoned");
        if matches!(&*session, Some(Session::Student(current)) if current == id) {
            *session = None;
        }
        Ok(())
    }

    pub fn delete_staff(&self, id: &StaffId) -> Result<(), ClearanceError> {
        self.staff.remove(id).map_err(|err| match err {
            RepositoryError::NotFound => ClearanceError::NotFound,
            other => ClearanceError::Repository(other),
        })?;

        let mut session = self.session.lock().expect("session mutex poisoned");
        if matches!(&*session, Some(Session::Staff(current)) if current == id) {
            *session = None;
        }
        Ok(())
    }

    /// Every student annotated with the single requirement belonging to the
    /// given department. Registration seeds one per department, so every
    /// student appears exactly once.
    pub fn students_by_department(
        &self,
        department: Department,
    ) -> Result<Vec<DepartmentRosterEntry>, ClearanceError> {
        let roster = self.list_students()?;
        Ok(roster
            .iter()
            .filter_map(|student| {
                student.requirement_for(department).map(|requirement| {
                    DepartmentRosterEntry {
                        student: StudentSummary::from(student),
                        requirement: RequirementView::from(requirement),
                    }
                })
            })
            .collect())
    }

    /// Aggregate counts across the whole roster; a pure function of the
    /// current state.
    pub fn statistics(&self) -> Result<ClearanceStatistics, ClearanceError> {
        let roster = self.students.list()?;
        let total_students = roster.len();
        let completed = roster
            .iter()
            .filter(|student| student.clearance_status == ClearanceStatus::Completed)
            .count();

        let departments = Department::ALL
            .iter()
            .map(|department| {
                let mut breakdown = DepartmentBreakdown {
                    department: *department,
                    approved: 0,
                    pending: 0,
                    rejected: 0,
                };
                for student in &roster {
                    match student
                        .requirement_for(*department)
                        .map(|requirement| requirement.status)
                    {
                        Some(RequirementStatus::Approved) => breakdown.approved += 1,
                        Some(RequirementStatus::Pending | RequirementStatus::Submitted) => {
                            breakdown.pending += 1
                        }
                        Some(RequirementStatus::Rejected) => breakdown.rejected += 1,
                        None => {}
                    }
                }
                breakdown
            })
            .collect();

        Ok(ClearanceStatistics {
            total_students,
            completed,
            in_progress: total_students - completed,
            departments,
        })
    }

    /// Next id suffix: one past the highest suffix ever observed, so
    /// deleting the newest record does not free its number.
    fn next_sequence(
        &self,
        watermark: &AtomicU32,
        live: impl Iterator<Item = u32>,
    ) -> u32 {
        let live_max = live.max().unwrap_or(0);
        let floor = watermark.fetch_max(live_max, Ordering::Relaxed).max(live_max);
        let next = floor + 1;
        watermark.fetch_max(next, Ordering::Relaxed);
        next
    }
}
