use crate::api::teacher::log_activity;
use crate::attendance::engine;
use crate::auth::auth::AuthUser;
use crate::model::activity::ActivityType;
use crate::model::student::Student;
use crate::utils::db_utils::{SqlValue, build_update_sql, execute_update};
use crate::verifier::PhotoVerifier;
use actix_web::{HttpResponse, Responder, web};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use sqlx::MySqlPool;
use tracing::{error, info, warn};
use utoipa::{IntoParams, ToSchema};

#[derive(Deserialize, ToSchema)]
pub struct CreateStudent {
    #[schema(example = "S001")]
    pub roll_no: String,
    #[schema(example = "John Doe")]
    pub name: String,
    pub phone_number: Option<String>,
    #[schema(example = "s001@school.edu")]
    pub email: Option<String>,
    #[schema(example = 5)]
    pub semester: Option<i32>,
    #[schema(example = 3)]
    pub year: Option<i32>,
    pub school_id: u64,
    pub department_id: u64,
    /// Reference photo for attendance verification, base64-encoded
    #[serde(default)]
    pub photo_base64: Option<String>,
}

#[derive(Deserialize, IntoParams, ToSchema)]
pub struct StudentQuery {
    pub school_id: Option<u64>,
    pub department_id: Option<u64>,
    pub semester: Option<i32>,
    /// 1-based page number
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

#[derive(Serialize, ToSchema)]
pub struct StudentListResponse {
    pub students: Vec<Student>,
    pub total: i64,
    pub page: u32,
    pub per_page: u32,
}

const UPDATABLE: &[&str] = &["name", "phone_number", "email", "semester", "year"];

const SELECT: &str = "SELECT roll_no, name, phone_number, email, semester, year, school_id, \
                      department_id, created_at FROM student_profile";

/// Create a student profile (admin/school)
///
/// If a reference photo is supplied it is enrolled with the photo
/// verifier; enrollment failure does not fail the request.
#[utoipa::path(
    post,
    path = "/students",
    request_body = CreateStudent,
    responses(
        (status = 201, description = "Student created", body = Student),
        (status = 400, description = "Unknown school or department"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 409, description = "Roll number already exists")
    ),
    security(("bearer_auth" = [])),
    tag = "Student"
)]
pub async fn create_student(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    verifier: web::Data<dyn PhotoVerifier>,
    payload: web::Json<CreateStudent>,
) -> actix_web::Result<impl Responder> {
    auth.require_admin_or_school()?;

    let roll_no = engine::normalize(&payload.roll_no);
    if roll_no.is_empty() {
        return Ok(HttpResponse::BadRequest().json(json!({
            "message": "Roll number must not be empty"
        })));
    }

    let result = sqlx::query(
        r#"
        INSERT INTO student_profile
            (roll_no, name, phone_number, email, semester, year, school_id, department_id)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&roll_no)
    .bind(&payload.name)
    .bind(&payload.phone_number)
    .bind(&payload.email)
    .bind(payload.semester)
    .bind(payload.year)
    .bind(payload.school_id)
    .bind(payload.department_id)
    .execute(pool.get_ref())
    .await;

    if let Err(e) = result {
        if let sqlx::Error::Database(db_err) = &e {
            if db_err.is_unique_violation() {
                return Ok(HttpResponse::Conflict().json(json!({
                    "message": "Roll number already exists"
                })));
            }
            if db_err.is_foreign_key_violation() {
                return Ok(HttpResponse::BadRequest().json(json!({
                    "message": "Unknown school or department"
                })));
            }
        }

        error!(error = %e, roll_no, "Failed to create student");
        return Ok(HttpResponse::InternalServerError().json(json!({
            "message": "Internal Server Error"
        })));
    }

    if let Some(photo) = payload.photo_base64.as_deref() {
        if let Err(e) = verifier.enroll(&roll_no, photo).await {
            warn!(error = %e, roll_no, "Photo enrollment failed");
        }
    }

    log_activity(
        pool.get_ref(),
        ActivityType::AddStudent,
        &auth.user_id,
        Some(&roll_no),
    )
    .await;
    info!(roll_no, school_id = payload.school_id, "Student created");

    let student = sqlx::query_as::<_, Student>(&format!("{} WHERE roll_no = ?", SELECT))
        .bind(&roll_no)
        .fetch_one(pool.get_ref())
        .await
        .map_err(|e| {
            error!(error = %e, "Failed to fetch created student");
            actix_web::error::ErrorInternalServerError("Internal Server Error")
        })?;

    Ok(HttpResponse::Created().json(student))
}

/// List students with filters and pagination
#[utoipa::path(
    get,
    path = "/students",
    params(StudentQuery),
    responses(
        (status = 200, description = "Students", body = StudentListResponse),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "Student"
)]
pub async fn list_students(
    _auth: AuthUser,
    pool: web::Data<MySqlPool>,
    query: web::Query<StudentQuery>,
) -> actix_web::Result<impl Responder> {
    let page = query.page.unwrap_or(1).max(1);
    let per_page = query.per_page.unwrap_or(20).clamp(1, 100);
    let offset = (page - 1) * per_page;

    let mut conditions = Vec::new();
    if query.school_id.is_some() {
        conditions.push("school_id = ?");
    }
    if query.department_id.is_some() {
        conditions.push("department_id = ?");
    }
    if query.semester.is_some() {
        conditions.push("semester = ?");
    }

    let where_clause = if conditions.is_empty() {
        String::new()
    } else {
        format!(" WHERE {}", conditions.join(" AND "))
    };

    let count_sql = format!("SELECT COUNT(*) FROM student_profile{}", where_clause);
    let mut count_q = sqlx::query_scalar::<_, i64>(&count_sql);
    if let Some(school_id) = query.school_id {
        count_q = count_q.bind(school_id);
    }
    if let Some(department_id) = query.department_id {
        count_q = count_q.bind(department_id);
    }
    if let Some(semester) = query.semester {
        count_q = count_q.bind(semester);
    }

    let total = count_q.fetch_one(pool.get_ref()).await.map_err(|e| {
        error!(error = %e, "Failed to count students");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    let list_sql = format!(
        "{}{} ORDER BY roll_no LIMIT ? OFFSET ?",
        SELECT, where_clause
    );
    let mut list_q = sqlx::query_as::<_, Student>(&list_sql);
    if let Some(school_id) = query.school_id {
        list_q = list_q.bind(school_id);
    }
    if let Some(department_id) = query.department_id {
        list_q = list_q.bind(department_id);
    }
    if let Some(semester) = query.semester {
        list_q = list_q.bind(semester);
    }
    list_q = list_q.bind(per_page).bind(offset);

    let students = list_q.fetch_all(pool.get_ref()).await.map_err(|e| {
        error!(error = %e, "Failed to list students");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    Ok(HttpResponse::Ok().json(StudentListResponse {
        students,
        total,
        page,
        per_page,
    }))
}

/// Get a student by roll number
#[utoipa::path(
    get,
    path = "/students/{roll_no}",
    params(("roll_no" = String, Path, description = "Student roll number")),
    responses(
        (status = 200, description = "Student found", body = Student),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Student not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Student"
)]
pub async fn get_student(
    _auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<String>,
) -> actix_web::Result<impl Responder> {
    let roll_no = engine::normalize(&path.into_inner());

    let student = sqlx::query_as::<_, Student>(&format!("{} WHERE roll_no = ?", SELECT))
        .bind(&roll_no)
        .fetch_optional(pool.get_ref())
        .await
        .map_err(|e| {
            error!(error = %e, roll_no, "Failed to fetch student");
            actix_web::error::ErrorInternalServerError("Internal Server Error")
        })?;

    match student {
        Some(s) => Ok(HttpResponse::Ok().json(s)),
        None => Ok(HttpResponse::NotFound().json(json!({
            "message": "Student not found"
        }))),
    }
}

/// Update a student (admin/school)
pub async fn update_student(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<String>,
    body: web::Json<Value>,
) -> actix_web::Result<impl Responder> {
    auth.require_admin_or_school()?;

    let roll_no = engine::normalize(&path.into_inner());

    let update = build_update_sql(
        "student_profile",
        &body,
        UPDATABLE,
        "roll_no",
        SqlValue::String(roll_no.clone()),
    )?;

    let affected = execute_update(pool.get_ref(), update)
        .await
        .map_err(actix_web::error::ErrorInternalServerError)?;

    if affected == 0 {
        return Ok(HttpResponse::NotFound().json(json!({
            "message": "Student not found"
        })));
    }

    log_activity(
        pool.get_ref(),
        ActivityType::UpdateStudent,
        &auth.user_id,
        Some(&roll_no),
    )
    .await;

    Ok(HttpResponse::Ok().json(json!({
        "message": "Student updated successfully"
    })))
}

/// Delete a student and their attendance logs (admin/school)
pub async fn delete_student(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    verifier: web::Data<dyn PhotoVerifier>,
    path: web::Path<String>,
) -> actix_web::Result<impl Responder> {
    auth.require_admin_or_school()?;

    let roll_no = engine::normalize(&path.into_inner());

    let result = sqlx::query("DELETE FROM student_profile WHERE roll_no = ?")
        .bind(&roll_no)
        .execute(pool.get_ref())
        .await
        .map_err(|e| {
            error!(error = %e, roll_no, "Failed to delete student");
            actix_web::error::ErrorInternalServerError("Internal Server Error")
        })?;

    if result.rows_affected() == 0 {
        return Ok(HttpResponse::NotFound().json(json!({
            "message": "Student not found"
        })));
    }

    if let Err(e) = verifier.remove(&roll_no).await {
        warn!(error = %e, roll_no, "Failed to remove photo enrollment");
    }

    log_activity(
        pool.get_ref(),
        ActivityType::RemoveStudent,
        &auth.user_id,
        Some(&roll_no),
    )
    .await;
    info!(roll_no, "Student deleted");

    Ok(HttpResponse::Ok().json(json!({
        "message": "Successfully deleted"
    })))
}
