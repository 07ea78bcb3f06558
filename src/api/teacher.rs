use crate::auth::auth::AuthUser;
use crate::auth::handlers::insert_user;
use crate::auth::password::generate_teacher_password;
use crate::model::activity::ActivityType;
use crate::model::role::Role;
use crate::model::teacher::Teacher;
use crate::utils::db_utils::{SqlValue, build_update_sql, execute_update};
use crate::utils::email_filter;
use actix_web::{HttpResponse, Responder, web};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use sqlx::MySqlPool;
use tracing::{error, info, warn};
use utoipa::{IntoParams, ToSchema};

#[derive(Deserialize, ToSchema)]
pub struct CreateTeacher {
    #[schema(example = "Jane Doe")]
    pub teacher_name: String,
    #[schema(example = "jane@school.edu")]
    pub teacher_email: String,
    pub phone_number: Option<String>,
    pub school_id: u64,
}

#[derive(Serialize, ToSchema)]
pub struct TeacherCreatedResponse {
    #[serde(flatten)]
    pub teacher: Teacher,
    /// Generated login password, shown once
    #[schema(example = "JaneSCH1042")]
    pub password: String,
}

#[derive(Deserialize, IntoParams, ToSchema)]
pub struct TeacherQuery {
    /// Filter by school
    pub school_id: Option<u64>,
}

const UPDATABLE: &[&str] = &["teacher_name", "phone_number"];

const SELECT: &str = "SELECT teacher_id, user_id, school_id, teacher_name, teacher_email, \
                      phone_number FROM teacher_profile";

/// Records an audit-trail row. Failures are logged, never surfaced.
pub async fn log_activity(
    pool: &MySqlPool,
    activity: ActivityType,
    user_id: &str,
    roll_no: Option<&str>,
) {
    let result = sqlx::query(
        "INSERT INTO school_activity (activity_name, user_id, roll_no) VALUES (?, ?, ?)",
    )
    .bind(activity.as_ref())
    .bind(user_id)
    .bind(roll_no)
    .execute(pool)
    .await;

    if let Err(e) = result {
        warn!(error = %e, activity = %activity, "Failed to record activity");
    }
}

/// Create a teacher account and profile (admin/school)
///
/// The login password is derived from the teacher's first name and
/// school, and returned once in the response.
#[utoipa::path(
    post,
    path = "/teachers",
    request_body = CreateTeacher,
    responses(
        (status = 201, description = "Teacher created", body = TeacherCreatedResponse),
        (status = 400, description = "Unknown school"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 409, description = "Email already registered")
    ),
    security(("bearer_auth" = [])),
    tag = "Teacher"
)]
pub async fn create_teacher(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    payload: web::Json<CreateTeacher>,
) -> actix_web::Result<impl Responder> {
    auth.require_admin_or_school()?;

    let email = payload.teacher_email.trim().to_lowercase();
    let password = generate_teacher_password(&payload.teacher_name, payload.school_id);

    let user_id = match insert_user(
        &email,
        &password,
        Role::Teacher.id(),
        &payload.teacher_name,
        pool.get_ref(),
    )
    .await
    {
        Ok(id) => id,
        Err(resp) => return Ok(resp),
    };

    let mut tx = pool.begin().await.map_err(|e| {
        error!(error = %e, "Failed to open transaction");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    let result = sqlx::query(
        r#"
        INSERT INTO teacher_profile (user_id, school_id, teacher_name, teacher_email, phone_number)
        VALUES (?, ?, ?, ?, ?)
        "#,
    )
    .bind(&user_id)
    .bind(payload.school_id)
    .bind(&payload.teacher_name)
    .bind(&email)
    .bind(&payload.phone_number)
    .execute(&mut *tx)
    .await;

    let teacher_id = match result {
        Ok(res) => res.last_insert_id(),
        Err(e) => {
            // Roll the profile back and drop the orphaned user row
            let _ = tx.rollback().await;
            let _ = sqlx::query("DELETE FROM users WHERE user_id = ?")
                .bind(&user_id)
                .execute(pool.get_ref())
                .await;

            if let sqlx::Error::Database(db_err) = &e {
                if db_err.is_foreign_key_violation() {
                    return Ok(HttpResponse::BadRequest().json(json!({
                        "message": "Unknown school"
                    })));
                }
            }

            error!(error = %e, "Failed to create teacher profile");
            return Ok(HttpResponse::InternalServerError().json(json!({
                "message": "Internal Server Error"
            })));
        }
    };

    tx.commit().await.map_err(|e| {
        error!(error = %e, "Failed to commit teacher profile");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    log_activity(pool.get_ref(), ActivityType::AddTeacher, &auth.user_id, None).await;
    info!(teacher_id, school_id = payload.school_id, "Teacher created");

    let teacher = sqlx::query_as::<_, Teacher>(&format!("{} WHERE teacher_id = ?", SELECT))
        .bind(teacher_id)
        .fetch_one(pool.get_ref())
        .await
        .map_err(|e| {
            error!(error = %e, "Failed to fetch created teacher");
            actix_web::error::ErrorInternalServerError("Internal Server Error")
        })?;

    Ok(HttpResponse::Created().json(TeacherCreatedResponse { teacher, password }))
}

/// List teachers, optionally per school
#[utoipa::path(
    get,
    path = "/teachers",
    params(TeacherQuery),
    responses(
        (status = 200, description = "Teachers", body = [Teacher]),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(("bearer_auth" = [])),
    tag = "Teacher"
)]
pub async fn list_teachers(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    query: web::Query<TeacherQuery>,
) -> actix_web::Result<impl Responder> {
    auth.require_admin_or_school()?;

    let mut sql = String::from(SELECT);
    if query.school_id.is_some() {
        sql.push_str(" WHERE school_id = ?");
    }
    sql.push_str(" ORDER BY teacher_id");

    let mut q = sqlx::query_as::<_, Teacher>(&sql);
    if let Some(school_id) = query.school_id {
        q = q.bind(school_id);
    }

    let teachers = q.fetch_all(pool.get_ref()).await.map_err(|e| {
        error!(error = %e, "Failed to list teachers");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    Ok(HttpResponse::Ok().json(teachers))
}

/// Get a teacher by ID
pub async fn get_teacher(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    auth.require_admin_or_school()?;

    let teacher_id = path.into_inner();

    let teacher = sqlx::query_as::<_, Teacher>(&format!("{} WHERE teacher_id = ?", SELECT))
        .bind(teacher_id)
        .fetch_optional(pool.get_ref())
        .await
        .map_err(|e| {
            error!(error = %e, teacher_id, "Failed to fetch teacher");
            actix_web::error::ErrorInternalServerError("Internal Server Error")
        })?;

    match teacher {
        Some(t) => Ok(HttpResponse::Ok().json(t)),
        None => Ok(HttpResponse::NotFound().json(json!({
            "message": "Teacher not found"
        }))),
    }
}

/// Update a teacher (admin/school)
pub async fn update_teacher(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
    body: web::Json<Value>,
) -> actix_web::Result<impl Responder> {
    auth.require_admin_or_school()?;

    let teacher_id = path.into_inner();

    let update = build_update_sql(
        "teacher_profile",
        &body,
        UPDATABLE,
        "teacher_id",
        SqlValue::I64(teacher_id as i64),
    )?;

    let affected = execute_update(pool.get_ref(), update)
        .await
        .map_err(actix_web::error::ErrorInternalServerError)?;

    if affected == 0 {
        return Ok(HttpResponse::NotFound().json(json!({
            "message": "Teacher not found"
        })));
    }

    log_activity(pool.get_ref(), ActivityType::UpdateTeacher, &auth.user_id, None).await;

    Ok(HttpResponse::Ok().json(json!({
        "message": "Teacher updated successfully"
    })))
}

/// Delete a teacher profile and its user account (admin/school)
pub async fn delete_teacher(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    auth.require_admin_or_school()?;

    let teacher_id = path.into_inner();

    let row = sqlx::query_as::<_, (String, Option<String>)>(
        "SELECT user_id, teacher_email FROM teacher_profile WHERE teacher_id = ?",
    )
    .bind(teacher_id)
    .fetch_optional(pool.get_ref())
    .await
    .map_err(|e| {
        error!(error = %e, teacher_id, "Failed to look up teacher");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    let Some((user_id, teacher_email)) = row else {
        return Ok(HttpResponse::NotFound().json(json!({
            "message": "Teacher not found"
        })));
    };

    // The profile row goes with the user via ON DELETE CASCADE
    sqlx::query("DELETE FROM users WHERE user_id = ?")
        .bind(&user_id)
        .execute(pool.get_ref())
        .await
        .map_err(|e| {
            error!(error = %e, teacher_id, "Failed to delete teacher");
            actix_web::error::ErrorInternalServerError("Internal Server Error")
        })?;

    // Free the address for re-registration
    if let Some(email) = teacher_email {
        email_filter::remove(&email);
    }

    log_activity(pool.get_ref(), ActivityType::RemoveTeacher, &auth.user_id, None).await;
    info!(teacher_id, "Teacher deleted");

    Ok(HttpResponse::Ok().json(json!({
        "message": "Successfully deleted"
    })))
}
