use crate::domain::{Admin, AdminId, StaffId, StaffMember, Student, StudentId};

/// Storage abstraction over the student roster so the service facade can be
/// exercised in isolation.
pub trait StudentRepository: Send + Sync {
    fn insert(&self, student: Student) -> Result<Student, RepositoryError>;
    fn update(&self, student: Student) -> Result<(), RepositoryError>;
    fn fetch(&self, id: &StudentId) -> Result<Option<Student>, RepositoryError>;
    fn remove(&self, id: &StudentId) -> Result<(), RepositoryError>;
    fn list(&self) -> Result<Vec<Student>, RepositoryError>;
}

/// Storage abstraction over the staff directory.
pub trait StaffRepository: Send + Sync {
    fn insert(&self, member: StaffMember) -> Result<StaffMember, RepositoryError>;
    fn update(&self, member: StaffMember) -> Result<(), RepositoryError>;
    fn fetch(&self, id: &StaffId) -> Result<Option<StaffMember>, RepositoryError>;
    fn remove(&self, id: &StaffId) -> Result<(), RepositoryError>;
    fn list(&self) -> Result<Vec<StaffMember>, RepositoryError>;
}

/// Read-only admin directory; admins are provisioned out of band.
pub trait AdminRepository: Send + Sync {
    fn fetch(&self, id: &AdminId) -> Result<Option<Admin>, RepositoryError>;
    fn list(&self) -> Result<Vec<Admin>, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}
