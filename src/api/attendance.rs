use crate::attendance::engine::{self, NewRegister};
use crate::attendance::AttendanceError;
use crate::auth::auth::AuthUser;
use crate::config::Config;
use crate::model::attendance_log::AttendanceLog;
use crate::model::register::AttendanceRegister;
use crate::model::role::Role;
use crate::verifier::PhotoVerifier;
use actix_web::{HttpResponse, Responder, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use sqlx::MySqlPool;
use tracing::error;
use utoipa::{IntoParams, ToSchema};

#[derive(Deserialize, ToSchema)]
pub struct CreateRegister {
    #[schema(example = "CS301")]
    pub course_code: String,
    #[schema(example = 1)]
    pub class_id: u64,
}

#[derive(Serialize, ToSchema)]
pub struct RegisterCreatedResponse {
    #[schema(example = "AB12CD")]
    pub unique_code: String,
    pub course_code: String,
    pub class_id: u64,
    pub teacher_id: u64,
    #[schema(value_type = String, format = "date-time")]
    pub created_at: chrono::DateTime<chrono::Utc>,
    #[schema(example = "Attendance register created")]
    pub message: String,
}

#[derive(Deserialize, IntoParams, ToSchema)]
pub struct RegisterQuery {
    /// Filter by subject
    pub course_code: Option<String>,
    /// Rows to skip (default 0)
    pub skip: Option<u64>,
    /// Page size (default 20, max 100)
    pub limit: Option<u64>,
}

#[derive(Serialize, ToSchema)]
pub struct RegisterDetailResponse {
    #[serde(flatten)]
    pub register: AttendanceRegister,
    pub attendance_logs: Vec<AttendanceLog>,
    #[schema(example = 32)]
    pub total_attendance: usize,
}

#[derive(Deserialize, ToSchema)]
pub struct MarkAttendance {
    #[schema(example = "AB12CD")]
    pub unique_code: String,
    #[schema(example = "S001")]
    pub roll_no: String,
    /// Base64-encoded photo; omitting it records a manual mark
    pub photo_base64: Option<String>,
}

#[derive(Serialize, ToSchema)]
pub struct MarkResponse {
    #[serde(flatten)]
    pub log: AttendanceLog,
    #[schema(example = "Attendance marked successfully")]
    pub message: String,
}

#[derive(Deserialize, IntoParams, ToSchema)]
pub struct LogFilter {
    /// Filter by register code
    pub unique_code: Option<String>,
    /// Filter by student roll number
    pub roll_no: Option<String>,
    /// Pagination page number (start with 1)
    pub page: Option<u64>,
    /// Pagination per page number
    pub per_page: Option<u64>,
}

#[derive(Serialize, ToSchema)]
pub struct LogListResponse {
    pub data: Vec<AttendanceLog>,
    #[schema(example = 1)]
    pub page: u32,
    #[schema(example = 20)]
    pub per_page: u32,
    #[schema(example = 57)]
    pub total: i64,
}

#[derive(Deserialize, ToSchema)]
pub struct UpdateLog {
    pub is_rejected: bool,
}

/// Create an attendance register for a (subject, class) pair
#[utoipa::path(
    post,
    path = "/attendance/register",
    request_body = CreateRegister,
    responses(
        (status = 201, description = "Register created", body = RegisterCreatedResponse),
        (status = 400, description = "Unknown subject/class pairing"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 409, description = "Code allocation exhausted"),
        (status = 500, description = "Internal server error")
    ),
    security(("bearer_auth" = [])),
    tag = "Attendance"
)]
pub async fn create_register(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    payload: web::Json<CreateRegister>,
) -> actix_web::Result<impl Responder> {
    let teacher_id = auth.require_teacher_profile()?;

    let course_code = engine::normalize(&payload.course_code);

    // The register only references the pairing; make sure it exists first
    let pairing_exists = sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS(SELECT 1 FROM subject WHERE course_code = ? AND class_id = ? LIMIT 1)",
    )
    .bind(&course_code)
    .bind(payload.class_id)
    .fetch_one(pool.get_ref())
    .await
    .map_err(|e| {
        error!(error = %e, "Failed to check subject/class pairing");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    if !pairing_exists {
        return Ok(HttpResponse::BadRequest().json(json!({
            "message": "No subject with that course code for the given class"
        })));
    }

    let new = NewRegister {
        user_id: auth.user_id.clone(),
        teacher_id,
        course_code,
        class_id: payload.class_id,
    };

    match engine::create_register(pool.get_ref(), &new).await {
        Ok(register) => Ok(HttpResponse::Created().json(RegisterCreatedResponse {
            unique_code: register.unique_code,
            course_code: register.course_code,
            class_id: register.class_id,
            teacher_id: register.teacher_id,
            created_at: register.created_at,
            message: "Attendance register created".to_string(),
        })),
        Err(AttendanceError::CodeSpaceExhausted) => {
            error!("Register code allocation exhausted after bounded retries");
            Ok(HttpResponse::Conflict().json(json!({
                "message": "Could not allocate a unique register code, try again"
            })))
        }
        Err(e) => {
            error!(error = %e, "Failed to create attendance register");
            Ok(HttpResponse::InternalServerError().json(json!({
                "message": "Internal Server Error"
            })))
        }
    }
}

/// List registers owned by the calling teacher, newest first
#[utoipa::path(
    get,
    path = "/attendance/registers",
    params(RegisterQuery),
    responses(
        (status = 200, description = "Registers owned by the caller", body = [AttendanceRegister]),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(("bearer_auth" = [])),
    tag = "Attendance"
)]
pub async fn list_registers(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    query: web::Query<RegisterQuery>,
) -> actix_web::Result<impl Responder> {
    auth.require_teacher()?;

    let skip = query.skip.unwrap_or(0);
    let limit = query.limit.unwrap_or(20).clamp(1, 100);

    let registers = engine::list_registers(
        pool.get_ref(),
        &auth.user_id,
        query.course_code.as_deref(),
        skip,
        limit,
    )
    .await
    .map_err(|e| {
        error!(error = %e, "Failed to list registers");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    Ok(HttpResponse::Ok().json(registers))
}

/// Register detail with its log list; owner only
#[utoipa::path(
    get,
    path = "/attendance/register/{unique_code}",
    params(("unique_code" = String, Path, description = "Register code")),
    responses(
        (status = 200, description = "Register detail", body = RegisterDetailResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Not the register owner"),
        (status = 404, description = "Unknown register code")
    ),
    security(("bearer_auth" = [])),
    tag = "Attendance"
)]
pub async fn get_register(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<String>,
) -> actix_web::Result<impl Responder> {
    auth.require_teacher()?;

    let unique_code = engine::normalize(&path.into_inner());

    let register = match engine::get_register(pool.get_ref(), &unique_code).await {
        Ok(r) => r,
        Err(AttendanceError::RegisterNotFound) => {
            return Ok(HttpResponse::NotFound().json(json!({
                "message": "Invalid attendance code"
            })));
        }
        Err(e) => {
            error!(error = %e, unique_code, "Failed to fetch register");
            return Ok(HttpResponse::InternalServerError().json(json!({
                "message": "Internal Server Error"
            })));
        }
    };

    if register.user_id != auth.user_id {
        return Err(actix_web::error::ErrorForbidden(
            "Register belongs to another teacher",
        ));
    }

    let logs = engine::logs_for_register(pool.get_ref(), &unique_code)
        .await
        .map_err(|e| {
            error!(error = %e, unique_code, "Failed to fetch register logs");
            actix_web::error::ErrorInternalServerError("Internal Server Error")
        })?;

    let total_attendance = logs.len();

    Ok(HttpResponse::Ok().json(RegisterDetailResponse {
        register,
        attendance_logs: logs,
        total_attendance,
    }))
}

/// Mark attendance with a register code.
///
/// Deliberately unauthenticated: students have no accounts, possession of a
/// valid code is the ticket. Proxy suspicion is flagged in the response, not
/// rejected here.
#[utoipa::path(
    post,
    path = "/attendance/mark",
    request_body = MarkAttendance,
    responses(
        (status = 200, description = "Attendance marked", body = MarkResponse),
        (status = 400, description = "Already marked", body = Object, example = json!({
            "message": "Attendance already marked for this student"
        })),
        (status = 404, description = "Unknown code or student"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Attendance"
)]
pub async fn mark_attendance(
    pool: web::Data<MySqlPool>,
    verifier: web::Data<dyn PhotoVerifier>,
    config: web::Data<Config>,
    payload: web::Json<MarkAttendance>,
) -> actix_web::Result<impl Responder> {
    let result = engine::mark(
        pool.get_ref(),
        verifier.get_ref(),
        config.proxy_confidence_threshold,
        &payload.unique_code,
        &payload.roll_no,
        payload.photo_base64.as_deref(),
    )
    .await;

    match result {
        Ok(log) => {
            let message = if log.is_proxy {
                "Attendance marked, but photo verification flagged a possible proxy".to_string()
            } else {
                "Attendance marked successfully".to_string()
            };
            Ok(HttpResponse::Ok().json(MarkResponse { log, message }))
        }
        Err(AttendanceError::RegisterNotFound) => Ok(HttpResponse::NotFound().json(json!({
            "message": "Invalid attendance code"
        }))),
        Err(AttendanceError::StudentNotFound) => Ok(HttpResponse::NotFound().json(json!({
            "message": "Student not found"
        }))),
        Err(AttendanceError::AlreadyMarked) => Ok(HttpResponse::BadRequest().json(json!({
            "message": "Attendance already marked for this student"
        }))),
        Err(e) => {
            error!(error = %e, "Failed to mark attendance");
            Ok(HttpResponse::InternalServerError().json(json!({
                "message": "Internal Server Error"
            })))
        }
    }
}

/// List attendance logs with optional filters
#[utoipa::path(
    get,
    path = "/attendance/logs",
    params(LogFilter),
    responses(
        (status = 200, description = "Paginated log list", body = LogListResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(("bearer_auth" = [])),
    tag = "Attendance"
)]
pub async fn list_logs(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    query: web::Query<LogFilter>,
) -> actix_web::Result<impl Responder> {
    auth.require_any(&[Role::Admin, Role::School, Role::Teacher])?;

    let per_page = query.per_page.unwrap_or(20).clamp(1, 100);
    let page = query.page.unwrap_or(1).max(1);
    let offset = (page - 1) * per_page;

    let unique_code = query.unique_code.as_deref().map(engine::normalize);
    let roll_no = query.roll_no.as_deref().map(engine::normalize);

    let (logs, total) = engine::list_logs(
        pool.get_ref(),
        unique_code.as_deref(),
        roll_no.as_deref(),
        per_page,
        offset,
    )
    .await
    .map_err(|e| {
        error!(error = %e, "Failed to list attendance logs");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    Ok(HttpResponse::Ok().json(LogListResponse {
        data: logs,
        page: page as u32,
        per_page: per_page as u32,
        total,
    }))
}

/// Toggle the rejection flag on a log (teacher override)
#[utoipa::path(
    put,
    path = "/attendance/logs/{attendance_id}",
    params(("attendance_id" = u64, Path, description = "Log ID")),
    request_body = UpdateLog,
    responses(
        (status = 200, description = "Updated log", body = AttendanceLog),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Log not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Attendance"
)]
pub async fn update_log(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
    payload: web::Json<UpdateLog>,
) -> actix_web::Result<impl Responder> {
    auth.require_teacher()?;

    let attendance_id = path.into_inner();

    match engine::set_rejected(pool.get_ref(), attendance_id, payload.is_rejected).await {
        Ok(log) => Ok(HttpResponse::Ok().json(log)),
        Err(AttendanceError::LogNotFound) => Ok(HttpResponse::NotFound().json(json!({
            "message": "Attendance log not found"
        }))),
        Err(e) => {
            error!(error = %e, attendance_id, "Failed to update attendance log");
            Ok(HttpResponse::InternalServerError().json(json!({
                "message": "Internal Server Error"
            })))
        }
    }
}
