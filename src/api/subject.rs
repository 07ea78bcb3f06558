use crate::attendance::engine;
use crate::auth::auth::AuthUser;
use crate::model::subject::Subject;
use crate::utils::db_utils::{SqlValue, build_update_sql, execute_update};
use actix_web::{HttpResponse, Responder, web};
use serde::Deserialize;
use serde_json::{Value, json};
use sqlx::MySqlPool;
use tracing::error;
use utoipa::{IntoParams, ToSchema};

#[derive(Deserialize, ToSchema)]
pub struct CreateSubject {
    #[schema(example = "CS301")]
    pub course_code: String,
    #[schema(example = "Operating Systems")]
    pub subject_name: String,
    pub school_id: u64,
    #[schema(example = 5, minimum = 1, maximum = 8)]
    pub semester: i32,
    pub class_id: u64,
}

#[derive(Deserialize, IntoParams, ToSchema)]
pub struct SubjectQuery {
    /// Filter by school
    pub school_id: Option<u64>,
    /// Filter by class
    pub class_id: Option<u64>,
}

const UPDATABLE: &[&str] = &["subject_name", "semester"];

const SELECT: &str =
    "SELECT course_code, subject_name, school_id, semester, class_id FROM subject";

/// Create a subject (admin/school)
#[utoipa::path(
    post,
    path = "/subjects",
    request_body = CreateSubject,
    responses(
        (status = 201, description = "Subject created", body = Subject),
        (status = 400, description = "Invalid semester or unknown school/class"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 409, description = "Course code already exists")
    ),
    security(("bearer_auth" = [])),
    tag = "Subject"
)]
pub async fn create_subject(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    payload: web::Json<CreateSubject>,
) -> actix_web::Result<impl Responder> {
    auth.require_admin_or_school()?;

    if !(1..=8).contains(&payload.semester) {
        return Ok(HttpResponse::BadRequest().json(json!({
            "message": "Semester must be between 1 and 8"
        })));
    }

    // Course codes participate in register lookups, keep them upper-case
    let course_code = engine::normalize(&payload.course_code);

    let result = sqlx::query(
        r#"
        INSERT INTO subject (course_code, subject_name, school_id, semester, class_id)
        VALUES (?, ?, ?, ?, ?)
        "#,
    )
    .bind(&course_code)
    .bind(&payload.subject_name)
    .bind(payload.school_id)
    .bind(payload.semester)
    .bind(payload.class_id)
    .execute(pool.get_ref())
    .await;

    match result {
        Ok(_) => {
            let subject =
                sqlx::query_as::<_, Subject>(&format!("{} WHERE course_code = ?", SELECT))
                    .bind(&course_code)
                    .fetch_one(pool.get_ref())
                    .await
                    .map_err(|e| {
                        error!(error = %e, "Failed to fetch created subject");
                        actix_web::error::ErrorInternalServerError("Internal Server Error")
                    })?;

            Ok(HttpResponse::Created().json(subject))
        }
        Err(e) => {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.is_unique_violation() {
                    return Ok(HttpResponse::Conflict().json(json!({
                        "message": "Course code already exists"
                    })));
                }
                if db_err.is_foreign_key_violation() {
                    return Ok(HttpResponse::BadRequest().json(json!({
                        "message": "Unknown school or class"
                    })));
                }
            }

            error!(error = %e, "Failed to create subject");
            Ok(HttpResponse::InternalServerError().json(json!({
                "message": "Internal Server Error"
            })))
        }
    }
}

/// List subjects with optional filters
#[utoipa::path(
    get,
    path = "/subjects",
    params(SubjectQuery),
    responses(
        (status = 200, description = "Subjects", body = [Subject]),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "Subject"
)]
pub async fn list_subjects(
    _auth: AuthUser,
    pool: web::Data<MySqlPool>,
    query: web::Query<SubjectQuery>,
) -> actix_web::Result<impl Responder> {
    let mut sql = String::from(SELECT);
    let mut conditions = Vec::new();

    if query.school_id.is_some() {
        conditions.push("school_id = ?");
    }
    if query.class_id.is_some() {
        conditions.push("class_id = ?");
    }
    if !conditions.is_empty() {
        sql.push_str(" WHERE ");
        sql.push_str(&conditions.join(" AND "));
    }
    sql.push_str(" ORDER BY course_code");

    let mut q = sqlx::query_as::<_, Subject>(&sql);
    if let Some(school_id) = query.school_id {
        q = q.bind(school_id);
    }
    if let Some(class_id) = query.class_id {
        q = q.bind(class_id);
    }

    let subjects = q.fetch_all(pool.get_ref()).await.map_err(|e| {
        error!(error = %e, "Failed to list subjects");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    Ok(HttpResponse::Ok().json(subjects))
}

/// Get a subject by course code
pub async fn get_subject(
    _auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<String>,
) -> actix_web::Result<impl Responder> {
    let course_code = engine::normalize(&path.into_inner());

    let subject = sqlx::query_as::<_, Subject>(&format!("{} WHERE course_code = ?", SELECT))
        .bind(&course_code)
        .fetch_optional(pool.get_ref())
        .await
        .map_err(|e| {
            error!(error = %e, course_code, "Failed to fetch subject");
            actix_web::error::ErrorInternalServerError("Internal Server Error")
        })?;

    match subject {
        Some(s) => Ok(HttpResponse::Ok().json(s)),
        None => Ok(HttpResponse::NotFound().json(json!({
            "message": "Subject not found"
        }))),
    }
}

/// Update a subject (admin/school)
pub async fn update_subject(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<String>,
    body: web::Json<Value>,
) -> actix_web::Result<impl Responder> {
    auth.require_admin_or_school()?;

    let course_code = engine::normalize(&path.into_inner());

    let update = build_update_sql(
        "subject",
        &body,
        UPDATABLE,
        "course_code",
        SqlValue::String(course_code),
    )?;

    let affected = execute_update(pool.get_ref(), update)
        .await
        .map_err(actix_web::error::ErrorInternalServerError)?;

    if affected == 0 {
        return Ok(HttpResponse::NotFound().json(json!({
            "message": "Subject not found"
        })));
    }

    Ok(HttpResponse::Ok().json(json!({
        "message": "Subject updated successfully"
    })))
}

/// Delete a subject and its registers (admin/school)
pub async fn delete_subject(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<String>,
) -> actix_web::Result<impl Responder> {
    auth.require_admin_or_school()?;

    let course_code = engine::normalize(&path.into_inner());

    let result = sqlx::query("DELETE FROM subject WHERE course_code = ?")
        .bind(&course_code)
        .execute(pool.get_ref())
        .await
        .map_err(|e| {
            error!(error = %e, course_code, "Failed to delete subject");
            actix_web::error::ErrorInternalServerError("Internal Server Error")
        })?;

    if result.rows_affected() == 0 {
        return Ok(HttpResponse::NotFound().json(json!({
            "message": "Subject not found"
        })));
    }

    Ok(HttpResponse::Ok().json(json!({
        "message": "Successfully deleted"
    })))
}
