use crate::auth::auth::AuthUser;
use crate::model::school::School;
use crate::utils::db_utils::{SqlValue, build_update_sql, execute_update};
use actix_web::{HttpResponse, Responder, web};
use serde::Deserialize;
use serde_json::{Value, json};
use sqlx::MySqlPool;
use tracing::error;
use utoipa::ToSchema;

#[derive(Deserialize, ToSchema)]
pub struct CreateSchool {
    #[schema(example = "School of Engineering")]
    pub school_name: String,
    #[schema(example = "Dr. A. Dean")]
    pub school_dean: Option<String>,
}

const UPDATABLE: &[&str] = &["school_name", "school_dean"];

/// Create a school (admin only)
#[utoipa::path(
    post,
    path = "/schools",
    request_body = CreateSchool,
    responses(
        (status = 201, description = "School created", body = School),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 409, description = "School name already exists")
    ),
    security(("bearer_auth" = [])),
    tag = "School"
)]
pub async fn create_school(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    payload: web::Json<CreateSchool>,
) -> actix_web::Result<impl Responder> {
    auth.require_admin()?;

    let result = sqlx::query("INSERT INTO school (school_name, school_dean) VALUES (?, ?)")
        .bind(&payload.school_name)
        .bind(&payload.school_dean)
        .execute(pool.get_ref())
        .await;

    match result {
        Ok(res) => {
            let school = sqlx::query_as::<_, School>(
                "SELECT school_id, school_name, school_dean FROM school WHERE school_id = ?",
            )
            .bind(res.last_insert_id())
            .fetch_one(pool.get_ref())
            .await
            .map_err(|e| {
                error!(error = %e, "Failed to fetch created school");
                actix_web::error::ErrorInternalServerError("Internal Server Error")
            })?;

            Ok(HttpResponse::Created().json(school))
        }
        Err(e) => {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.is_unique_violation() {
                    return Ok(HttpResponse::Conflict().json(json!({
                        "message": "School name already exists"
                    })));
                }
            }

            error!(error = %e, "Failed to create school");
            Ok(HttpResponse::InternalServerError().json(json!({
                "message": "Internal Server Error"
            })))
        }
    }
}

/// List schools
#[utoipa::path(
    get,
    path = "/schools",
    responses(
        (status = 200, description = "All schools", body = [School]),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "School"
)]
pub async fn list_schools(
    _auth: AuthUser,
    pool: web::Data<MySqlPool>,
) -> actix_web::Result<impl Responder> {
    let schools = sqlx::query_as::<_, School>(
        "SELECT school_id, school_name, school_dean FROM school ORDER BY school_id",
    )
    .fetch_all(pool.get_ref())
    .await
    .map_err(|e| {
        error!(error = %e, "Failed to list schools");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    Ok(HttpResponse::Ok().json(schools))
}

/// Get a school by ID
#[utoipa::path(
    get,
    path = "/schools/{school_id}",
    params(("school_id" = u64, Path, description = "School ID")),
    responses(
        (status = 200, description = "School found", body = School),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "School not found")
    ),
    security(("bearer_auth" = [])),
    tag = "School"
)]
pub async fn get_school(
    _auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    let school_id = path.into_inner();

    let school = sqlx::query_as::<_, School>(
        "SELECT school_id, school_name, school_dean FROM school WHERE school_id = ?",
    )
    .bind(school_id)
    .fetch_optional(pool.get_ref())
    .await
    .map_err(|e| {
        error!(error = %e, school_id, "Failed to fetch school");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    match school {
        Some(s) => Ok(HttpResponse::Ok().json(s)),
        None => Ok(HttpResponse::NotFound().json(json!({
            "message": "School not found"
        }))),
    }
}

/// Update a school (admin only)
#[utoipa::path(
    put,
    path = "/schools/{school_id}",
    params(("school_id" = u64, Path, description = "School ID")),
    responses(
        (status = 200, description = "School updated"),
        (status = 400, description = "Unknown field"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "School not found")
    ),
    security(("bearer_auth" = [])),
    tag = "School"
)]
pub async fn update_school(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
    body: web::Json<Value>,
) -> actix_web::Result<impl Responder> {
    auth.require_admin()?;

    let school_id = path.into_inner();

    let update = build_update_sql(
        "school",
        &body,
        UPDATABLE,
        "school_id",
        SqlValue::I64(school_id as i64),
    )?;

    let affected = execute_update(pool.get_ref(), update)
        .await
        .map_err(actix_web::error::ErrorInternalServerError)?;

    if affected == 0 {
        return Ok(HttpResponse::NotFound().json(json!({
            "message": "School not found"
        })));
    }

    Ok(HttpResponse::Ok().json(json!({
        "message": "School updated successfully"
    })))
}

/// Delete a school and everything under it (admin only)
#[utoipa::path(
    delete,
    path = "/schools/{school_id}",
    params(("school_id" = u64, Path, description = "School ID")),
    responses(
        (status = 200, description = "School deleted"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "School not found")
    ),
    security(("bearer_auth" = [])),
    tag = "School"
)]
pub async fn delete_school(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    auth.require_admin()?;

    let school_id = path.into_inner();

    // Departments, classes, subjects, profiles and registers go with it
    // via ON DELETE CASCADE
    let result = sqlx::query("DELETE FROM school WHERE school_id = ?")
        .bind(school_id)
        .execute(pool.get_ref())
        .await
        .map_err(|e| {
            error!(error = %e, school_id, "Failed to delete school");
            actix_web::error::ErrorInternalServerError("Internal Server Error")
        })?;

    if result.rows_affected() == 0 {
        return Ok(HttpResponse::NotFound().json(json!({
            "message": "School not found"
        })));
    }

    Ok(HttpResponse::Ok().json(json!({
        "message": "Successfully deleted"
    })))
}
