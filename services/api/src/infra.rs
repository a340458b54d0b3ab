use chrono::NaiveDate;
use clearance::{
    Admin, AdminId, AdminRepository, RepositoryError, StaffId, StaffMember, StaffRepository,
    Student, StudentId, StudentRepository,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryStudentDirectory {
    records: Arc<Mutex<HashMap<StudentId, Student>>>,
}

impl StudentRepository for InMemoryStudentDirectory {
    fn insert(&self, student: Student) -> Result<Student, RepositoryError> {
        let mut guard = self.records.lock().expect("student mutex poisoned");
        if guard.contains_key(&student.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(student.id.clone(), student.clone());
        Ok(student)
    }

    fn update(&self, student: Student) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("student mutex poisoned");
        if !guard.contains_key(&student.id) {
            return Err(RepositoryError::NotFound);
        }
        guard.insert(student.id.clone(), student);
        Ok(())
    }

    fn fetch(&self, id: &StudentId) -> Result<Option<Student>, RepositoryError> {
        let guard = self.records.lock().expect("student mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn remove(&self, id: &StudentId) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("student mutex poisoned");
        guard.remove(id).map(|_| ()).ok_or(RepositoryError::NotFound)
    }

    fn list(&self) -> Result<Vec<Student>, RepositoryError> {
        let guard = self.records.lock().expect("student mutex poisoned");
        Ok(guard.values().cloned().collect())
    }
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryStaffDirectory {
    records: Arc<Mutex<HashMap<StaffId, StaffMember>>>,
}

impl StaffRepository for InMemoryStaffDirectory {
    fn insert(&self, member: StaffMember) -> Result<StaffMember, RepositoryError> {
        let mut guard = self.records.lock().expect("staff mutex poisoned");
        if guard.contains_key(&member.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(member.id.clone(), member.clone());
        Ok(member)
    }

    fn update(&self, member: StaffMember) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("staff mutex poisoned");
        if !guard.contains_key(&member.id) {
            return Err(RepositoryError::NotFound);
        }
        guard.insert(member.id.clone(), member);
        Ok(())
    }

    fn fetch(&self, id: &StaffId) -> Result<Option<StaffMember>, RepositoryError> {
        let guard = self.records.lock().expect("staff mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn remove(&self, id: &StaffId) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("staff mutex poisoned");
        guard.remove(id).map(|_| ()).ok_or(RepositoryError::NotFound)
    }

    fn list(&self) -> Result<Vec<StaffMember>, RepositoryError> {
        let guard = self.records.lock().expect("staff mutex poisoned");
        Ok(guard.values().cloned().collect())
    }
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryAdminDirectory {
    records: Arc<Mutex<Vec<Admin>>>,
}

impl InMemoryAdminDirectory {
    pub(crate) fn push(&self, admin: Admin) {
        self.records.lock().expect("admin mutex poisoned").push(admin);
    }
}

impl AdminRepository for InMemoryAdminDirectory {
    fn fetch(&self, id: &AdminId) -> Result<Option<Admin>, RepositoryError> {
        let guard = self.records.lock().expect("admin mutex poisoned");
        Ok(guard.iter().find(|admin| admin.id == *id).cloned())
    }

    fn list(&self) -> Result<Vec<Admin>, RepositoryError> {
        let guard = self.records.lock().expect("admin mutex poisoned");
        Ok(guard.clone())
    }
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}
