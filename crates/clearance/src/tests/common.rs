use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::NaiveDate;

use crate::domain::{
    Admin, AdminId, Department, NewStaff, NewStudent, StaffId, StaffMember, Student, StudentId,
    SubmissionFile,
};
use crate::repository::{
    AdminRepository, RepositoryError, StaffRepository, StudentRepository,
};
use crate::service::ClearanceService;

#[derive(Default, Clone)]
pub(super) struct MemoryStudents {
    records: Arc<Mutex<HashMap<StudentId, Student>>>,
}

impl StudentRepository for MemoryStudents {
    fn insert(&self, student: Student) -> Result<Student, RepositoryError> {
        let mut guard = self.records.lock().expect("lock");
        if guard.contains_key(&student.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(student.id.clone(), student.clone());
        Ok(student)
    }

    fn update(&self, student: Student) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("lock");
        if !guard.contains_key(&student.id) {
            return Err(RepositoryError::NotFound);
        }
        guard.insert(student.id.clone(), student);
        Ok(())
    }

    fn fetch(&self, id: &StudentId) -> Result<Option<Student>, RepositoryError> {
        let guard = self.records.lock().expect("lock");
        Ok(guard.get(id).cloned())
    }

    fn remove(&self, id: &StudentId) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("lock");
        guard.remove(id).map(|_| ()).ok_or(RepositoryError::NotFound)
    }

    fn list(&self) -> Result<Vec<Student>, RepositoryError> {
        let guard = self.records.lock().expect("lock");
        Ok(guard.values().cloned().collect())
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryStaff {
    records: Arc<Mutex<HashMap<StaffId, StaffMember>>>,
}

impl StaffRepository for MemoryStaff {
    fn insert(&self, member: StaffMember) -> Result<StaffMember, RepositoryError> {
        let mut guard = self.records.lock().expect("lock");
        if guard.contains_key(&member.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(member.id.clone(), member.clone());
        Ok(member)
    }

    fn update(&self, member: StaffMember) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("lock");
        if !guard.contains_key(&member.id) {
            return Err(RepositoryError::NotFound);
        }
        guard.insert(member.id.clone(), member);
        Ok(())
    }

    fn fetch(&self, id: &StaffId) -> Result<Option<StaffMember>, RepositoryError> {
        let guard = self.records.lock().expect("lock");
        Ok(guard.get(id).cloned())
    }

    fn remove(&self, id: &StaffId) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("lock");
        guard.remove(id).map(|_| ()).ok_or(RepositoryError::NotFound)
    }

    fn list(&self) -> Result<Vec<StaffMember>, RepositoryError> {
        let guard = self.records.lock().expect("lock");
        Ok(guard.values().cloned().collect())
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryAdmins {
    records: Arc<Mutex<Vec<Admin>>>,
}

impl MemoryAdmins {
    pub(super) fn push(&self, admin: Admin) {
        self.records.lock().expect("lock").push(admin);
    }
}

impl AdminRepository for MemoryAdmins {
    fn fetch(&self, id: &AdminId) -> Result<Option<Admin>, RepositoryError> {
        let guard = self.records.lock().expect("lock");
        Ok(guard.iter().find(|admin| admin.id == *id).cloned())
    }

    fn list(&self) -> Result<Vec<Admin>, RepositoryError> {
        let guard = self.records.lock().expect("lock");
        Ok(guard.clone())
    }
}

pub(super) type Service = ClearanceService<MemoryStudents, MemoryStaff, MemoryAdmins>;

pub(super) fn build_service() -> (Service, Arc<MemoryStudents>, Arc<MemoryStaff>, Arc<MemoryAdmins>)
{
    let students = Arc::new(MemoryStudents::default());
    let staff = Arc::new(MemoryStaff::default());
    let admins = Arc::new(MemoryAdmins::default());
    let service = ClearanceService::new(students.clone(), staff.clone(), admins.clone());
    (service, students, staff, admins)
}

pub(super) fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 1, 15).expect("valid date")
}

pub(super) fn new_student(name: &str, email: &str) -> NewStudent {
    NewStudent {
        name: name.to_string(),
        email: email.to_string(),
        course: "BS Computer Science".to_string(),
        year_level: "4th Year".to_string(),
        credential: "password123".to_string(),
    }
}

pub(super) fn register(service: &Service, name: &str, email: &str) -> Student {
    service
        .register_student_on(new_student(name, email), today())
        .expect("registration succeeds")
}

/// One staff member per department, added through the service so their ids
/// follow the normal sequence.
pub(super) fn seed_staff(service: &Service) -> HashMap<Department, StaffMember> {
    Department::ALL
        .iter()
        .map(|department| {
            let member = service
                .add_staff(NewStaff {
                    name: format!("{department} Officer"),
                    email: format!("{}@university.edu", department.slug()),
                    credential: "staff123".to_string(),
                    department: *department,
                    role: "Officer".to_string(),
                })
                .expect("staff added");
            (*department, member)
        })
        .collect()
}

pub(super) fn seed_admin(admins: &MemoryAdmins) -> Admin {
    let admin = Admin {
        id: AdminId("ADMIN-001".to_string()),
        name: "System Administrator".to_string(),
        email: "admin@university.edu".to_string(),
        credential: "admin123".to_string(),
        role: "Super Admin".to_string(),
    };
    admins.push(admin.clone());
    admin
}

pub(super) fn scan_file(file_name: &str) -> SubmissionFile {
    SubmissionFile {
        file_name: file_name.to_string(),
        content_type: "image/jpeg".to_string(),
        data: "data:image/jpeg;base64,/9j/4AAQ".to_string(),
    }
}
