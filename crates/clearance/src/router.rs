use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;

use crate::domain::{
    Department, NewStaff, NewStudent, ReviewDecision, Role, StaffId, StaffUpdate, StudentId,
    StudentUpdate, SubmissionFile,
};
use crate::repository::{AdminRepository, RepositoryError, StaffRepository, StudentRepository};
use crate::service::{ClearanceError, ClearanceService};
use crate::views::{
    AuthenticatedUser, ClearanceStatistics, DepartmentRosterEntry, RequirementView, StaffView,
    StudentView,
};

impl IntoResponse for ClearanceError {
    fn into_response(self) -> Response {
        let status = match &self {
            ClearanceError::DuplicateEmail => StatusCode::CONFLICT,
            ClearanceError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            ClearanceError::InvalidTransition { .. } | ClearanceError::StaleRequirement { .. } => {
                StatusCode::CONFLICT
            }
            ClearanceError::RemarksRequired => StatusCode::BAD_REQUEST,
            ClearanceError::NotFound => StatusCode::NOT_FOUND,
            ClearanceError::DepartmentMismatch { .. } => StatusCode::FORBIDDEN,
            ClearanceError::MissingField(_) | ClearanceError::UnsupportedFileType(_) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            ClearanceError::Repository(RepositoryError::Conflict) => StatusCode::CONFLICT,
            ClearanceError::Repository(RepositoryError::NotFound) => StatusCode::NOT_FOUND,
            ClearanceError::Repository(RepositoryError::Unavailable(_)) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let body = Json(json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub role: Role,
    pub username: String,
    pub credential: String,
}

#[derive(Debug, Deserialize)]
pub struct ReviewRequest {
    pub reviewer_id: StaffId,
    pub decision: ReviewDecision,
    #[serde(default)]
    pub remarks: String,
    /// Version the reviewer read; the review fails if it is stale.
    #[serde(default)]
    pub expected_version: Option<u64>,
}

/// Router builder exposing the clearance workflow over HTTP.
pub fn clearance_router<S, T, A>(service: Arc<ClearanceService<S, T, A>>) -> Router
where
    S: StudentRepository + 'static,
    T: StaffRepository + 'static,
    A: AdminRepository + 'static,
{
    Router::new()
        .route("/api/v1/auth/login", post(login_handler::<S, T, A>))
        .route("/api/v1/auth/logout", post(logout_handler::<S, T, A>))
        .route("/api/v1/auth/session", get(session_handler::<S, T, A>))
        .route(
            "/api/v1/students",
            post(register_handler::<S, T, A>).get(list_students_handler::<S, T, A>),
        )
        .route(
            "/api/v1/students/:student_id",
            get(get_student_handler::<S, T, A>)
                .patch(update_student_handler::<S, T, A>)
                .delete(delete_student_handler::<S, T, A>),
        )
        .route(
            "/api/v1/students/:student_id/requirements/:requirement_id/submissions",
            post(submit_handler::<S, T, A>),
        )
        .route(
            "/api/v1/students/:student_id/requirements/:requirement_id/review",
            post(review_handler::<S, T, A>),
        )
        .route(
            "/api/v1/staff",
            post(add_staff_handler::<S, T, A>).get(list_staff_handler::<S, T, A>),
        )
        .route(
            "/api/v1/staff/:staff_id",
            get(get_staff_handler::<S, T, A>)
                .patch(update_staff_handler::<S, T, A>)
                .delete(delete_staff_handler::<S, T, A>),
        )
        .route(
            "/api/v1/departments/:department/students",
            get(roster_handler::<S, T, A>),
        )
        .route("/api/v1/statistics", get(statistics_handler::<S, T, A>))
        .with_state(service)
}

async fn login_handler<S, T, A>(
    State(service): State<Arc<ClearanceService<S, T, A>>>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<AuthenticatedUser>, ClearanceError>
where
    S: StudentRepository + 'static,
    T: StaffRepository + 'static,
    A: AdminRepository + 'static,
{
    service
        .login(request.role, &request.username, &request.credential)
        .map(Json)
}

async fn logout_handler<S, T, A>(
    State(service): State<Arc<ClearanceService<S, T, A>>>,
) -> StatusCode
where
    S: StudentRepository + 'static,
    T: StaffRepository + 'static,
    A: AdminRepository + 'static,
{
    service.logout();
    StatusCode::NO_CONTENT
}

async fn session_handler<S, T, A>(
    State(service): State<Arc<ClearanceService<S, T, A>>>,
) -> Response
where
    S: StudentRepository + 'static,
    T: StaffRepository + 'static,
    A: AdminRepository + 'static,
{
    match service.current_user() {
        Ok(Some(user)) => (StatusCode::OK, Json(user)).into_response(),
        Ok(None) => {
            let body = Json(json!({ "error": "no active session" }));
            (StatusCode::UNAUTHORIZED, body).into_response()
        }
        Err(err) => err.into_response(),
    }
}

async fn register_handler<S, T, A>(
    State(service): State<Arc<ClearanceService<S, T, A>>>,
    Json(profile): Json<NewStudent>,
) -> Result<(StatusCode, Json<StudentView>), ClearanceError>
where
    S: StudentRepository + 'static,
    T: StaffRepository + 'static,
    A: AdminRepository + 'static,
{
    let student = service.register_student(profile)?;
    Ok((StatusCode::CREATED, Json(StudentView::from(&student))))
}

async fn list_students_handler<S, T, A>(
    State(service): State<Arc<ClearanceService<S, T, A>>>,
) -> Result<Json<Vec<StudentView>>, ClearanceError>
where
    S: StudentRepository + 'static,
    T: StaffRepository + 'static,
    A: AdminRepository + 'static,
{
    let roster = service.list_students()?;
    Ok(Json(roster.iter().map(StudentView::from).collect()))
}

async fn get_student_handler<S, T, A>(
    State(service): State<Arc<ClearanceService<S, T, A>>>,
    Path(student_id): Path<String>,
) -> Result<Json<StudentView>, ClearanceError>
where
    S: StudentRepository + 'static,
    T: StaffRepository + 'static,
    A: AdminRepository + 'static,
{
    let student = service.get_student(&StudentId(student_id))?;
    Ok(Json(StudentView::from(&student)))
}

async fn update_student_handler<S, T, A>(
    State(service): State<Arc<ClearanceService<S, T, A>>>,
    Path(student_id): Path<String>,
    Json(update): Json<StudentUpdate>,
) -> Result<Json<StudentView>, ClearanceError>
where
    S: StudentRepository + 'static,
    T: StaffRepository + 'static,
    A: AdminRepository + 'static,
{
    let student = service.update_student(&StudentId(student_id), update)?;
    Ok(Json(StudentView::from(&student)))
}

async fn delete_student_handler<S, T, A>(
    State(service): State<Arc<ClearanceService<S, T, A>>>,
    Path(student_id): Path<String>,
) -> Result<StatusCode, ClearanceError>
where
    S: StudentRepository + 'static,
    T: StaffRepository + 'static,
    A: AdminRepository + 'static,
{
    service.delete_student(&StudentId(student_id))?;
    Ok(StatusCode::NO_CONTENT)
}

async fn submit_handler<S, T, A>(
    State(service): State<Arc<ClearanceService<S, T, A>>>,
    Path((student_id, requirement_id)): Path<(String, u32)>,
    Json(file): Json<SubmissionFile>,
) -> Result<Json<RequirementView>, ClearanceError>
where
    S: StudentRepository + 'static,
    T: StaffRepository + 'static,
    A: AdminRepository + 'static,
{
    let requirement =
        service.submit_requirement(&StudentId(student_id), requirement_id, file)?;
    Ok(Json(RequirementView::from(&requirement)))
}

async fn review_handler<S, T, A>(
    State(service): State<Arc<ClearanceService<S, T, A>>>,
    Path((student_id, requirement_id)): Path<(String, u32)>,
    Json(request): Json<ReviewRequest>,
) -> Result<Json<RequirementView>, ClearanceError>
where
    S: StudentRepository + 'static,
    T: StaffRepository + 'static,
    A: AdminRepository + 'static,
{
    let requirement = service.review_requirement(
        &request.reviewer_id,
        &StudentId(student_id),
        requirement_id,
        request.decision,
        &request.remarks,
        request.expected_version,
    )?;
    Ok(Json(RequirementView::from(&requirement)))
}

async fn add_staff_handler<S, T, A>(
    State(service): State<Arc<ClearanceService<S, T, A>>>,
    Json(profile): Json<NewStaff>,
) -> Result<(StatusCode, Json<StaffView>), ClearanceError>
where
    S: StudentRepository + 'static,
    T: StaffRepository + 'static,
    A: AdminRepository + 'static,
{
    let member = service.add_staff(profile)?;
    Ok((StatusCode::CREATED, Json(StaffView::from(&member))))
}

async fn list_staff_handler<S, T, A>(
    State(service): State<Arc<ClearanceService<S, T, A>>>,
) -> Result<Json<Vec<StaffView>>, ClearanceError>
where
    S: StudentRepository + 'static,
    T: StaffRepository + 'static,
    A: AdminRepository + 'static,
{
    let directory = service.list_staff()?;
    Ok(Json(directory.iter().map(StaffView::from).collect()))
}

async fn get_staff_handler<S, T, A>(
    State(service): State<Arc<ClearanceService<S, T, A>>>,
    Path(staff_id): Path<String>,
) -> Result<Json<StaffView>, ClearanceError>
where
    S: StudentRepository + 'static,
    T: StaffRepository + 'static,
    A: AdminRepository + 'static,
{
    let member = service.get_staff(&StaffId(staff_id))?;
    Ok(Json(StaffView::from(&member)))
}

async fn update_staff_handler<S, T, A>(
    State(service): State<Arc<ClearanceService<S, T, A>>>,
    Path(staff_id): Path<String>,
    Json(update): Json<StaffUpdate>,
) -> Result<Json<StaffView>, ClearanceError>
where
    S: StudentRepository + 'static,
    T: StaffRepository + 'static,
    A: AdminRepository + 'static,
{
    let member = service.update_staff(&StaffId(staff_id), update)?;
    Ok(Json(StaffView::from(&member)))
}

async fn delete_staff_handler<S, T, A>(
    State(service): State<Arc<ClearanceService<S, T, A>>>,
    Path(staff_id): Path<String>,
) -> Result<StatusCode, ClearanceError>
where
    S: StudentRepository + 'static,
    T: StaffRepository + 'static,
    A: AdminRepository + 'static,
{
    service.delete_staff(&StaffId(staff_id))?;
    Ok(StatusCode::NO_CONTENT)
}

async fn roster_handler<S, T, A>(
    State(service): State<Arc<ClearanceService<S, T, A>>>,
    Path(department): Path<String>,
) -> Result<Json<Vec<DepartmentRosterEntry>>, ClearanceError>
where
    S: StudentRepository + 'static,
    T: StaffRepository + 'static,
    A: AdminRepository + 'static,
{
    let department = Department::from_slug(&department).ok_or(ClearanceError::NotFound)?;
    Ok(Json(service.students_by_department(department)?))
}

async fn statistics_handler<S, T, A>(
    State(service): State<Arc<ClearanceService<S, T, A>>>,
) -> Result<Json<ClearanceStatistics>, ClearanceError>
where
    S: StudentRepository + 'static,
    T: StaffRepository + 'static,
    A: AdminRepository + 'static,
{
    Ok(Json(service.statistics()?))
}
