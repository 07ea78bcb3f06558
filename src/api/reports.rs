use crate::attendance::engine;
use crate::attendance::report::{self, attendance_percentage, AttendanceSummary};
use crate::auth::auth::AuthUser;
use actix_web::{HttpResponse, Responder, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use sqlx::MySqlPool;
use tracing::error;
use utoipa::{IntoParams, ToSchema};

#[derive(Deserialize, IntoParams, ToSchema)]
pub struct SummaryQuery {
    /// Narrow the summary to one subject
    pub course_code: Option<String>,
    /// Narrow the summary to one student
    pub roll_no: Option<String>,
}

#[derive(Serialize, ToSchema)]
pub struct StudentAttendanceResponse {
    #[schema(example = "S001")]
    pub roll_no: String,
    #[serde(flatten)]
    pub summary: AttendanceSummary,
    /// Share of marks that stand (not rejected), in percent
    #[schema(example = 90.0)]
    pub attendance_percentage: f64,
}

/// Aggregate attendance counts
#[utoipa::path(
    get,
    path = "/reports/attendance-summary",
    params(SummaryQuery),
    responses(
        (status = 200, description = "Aggregated counts", body = AttendanceSummary),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "Reports"
)]
pub async fn attendance_summary(
    _auth: AuthUser,
    pool: web::Data<MySqlPool>,
    query: web::Query<SummaryQuery>,
) -> actix_web::Result<impl Responder> {
    let course_code = query.course_code.as_deref().map(engine::normalize);
    let roll_no = query.roll_no.as_deref().map(engine::normalize);

    let summary = report::summarize(
        pool.get_ref(),
        course_code.as_deref(),
        roll_no.as_deref(),
    )
    .await
    .map_err(|e| {
        error!(error = %e, "Failed to compute attendance summary");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    Ok(HttpResponse::Ok().json(summary))
}

/// Per-student attendance report
#[utoipa::path(
    get,
    path = "/reports/student-attendance/{roll_no}",
    params(("roll_no" = String, Path, description = "Student roll number")),
    responses(
        (status = 200, description = "Per-student counts", body = StudentAttendanceResponse),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Student not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Reports"
)]
pub async fn student_attendance(
    _auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<String>,
) -> actix_web::Result<impl Responder> {
    let roll_no = engine::normalize(&path.into_inner());

    let student_exists = sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS(SELECT 1 FROM student_profile WHERE roll_no = ? LIMIT 1)",
    )
    .bind(&roll_no)
    .fetch_one(pool.get_ref())
    .await
    .map_err(|e| {
        error!(error = %e, roll_no, "Failed to check student");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    if !student_exists {
        return Ok(HttpResponse::NotFound().json(json!({
            "message": "Student not found"
        })));
    }

    let summary = report::summarize(pool.get_ref(), None, Some(&roll_no))
        .await
        .map_err(|e| {
            error!(error = %e, roll_no, "Failed to compute student attendance");
            actix_web::error::ErrorInternalServerError("Internal Server Error")
        })?;

    let attendance_percentage =
        attendance_percentage(summary.total, summary.total - summary.rejected);

    Ok(HttpResponse::Ok().json(StudentAttendanceResponse {
        roll_no,
        summary,
        attendance_percentage,
    }))
}
