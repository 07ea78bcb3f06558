use crate::auth::auth::AuthUser;
use crate::model::class_group::ClassGroup;
use crate::utils::db_utils::{SqlValue, build_update_sql, execute_update};
use actix_web::{HttpResponse, Responder, web};
use serde::Deserialize;
use serde_json::{Value, json};
use sqlx::MySqlPool;
use tracing::error;
use utoipa::{IntoParams, ToSchema};

#[derive(Deserialize, ToSchema)]
pub struct CreateClass {
    #[schema(example = "CS-3A")]
    pub class_name: String,
    pub department_id: u64,
}

#[derive(Deserialize, IntoParams, ToSchema)]
pub struct ClassQuery {
    /// Filter by department
    pub department_id: Option<u64>,
}

const UPDATABLE: &[&str] = &["class_name"];

/// Create a class (admin/school)
#[utoipa::path(
    post,
    path = "/classes",
    request_body = CreateClass,
    responses(
        (status = 201, description = "Class created", body = ClassGroup),
        (status = 400, description = "Unknown department"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(("bearer_auth" = [])),
    tag = "Class"
)]
pub async fn create_class(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    payload: web::Json<CreateClass>,
) -> actix_web::Result<impl Responder> {
    auth.require_admin_or_school()?;

    let result = sqlx::query("INSERT INTO class (class_name, department_id) VALUES (?, ?)")
        .bind(&payload.class_name)
        .bind(payload.department_id)
        .execute(pool.get_ref())
        .await;

    match result {
        Ok(res) => {
            let class = sqlx::query_as::<_, ClassGroup>(
                "SELECT class_id, class_name, department_id FROM class WHERE class_id = ?",
            )
            .bind(res.last_insert_id())
            .fetch_one(pool.get_ref())
            .await
            .map_err(|e| {
                error!(error = %e, "Failed to fetch created class");
                actix_web::error::ErrorInternalServerError("Internal Server Error")
            })?;

            Ok(HttpResponse::Created().json(class))
        }
        Err(e) => {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.is_foreign_key_violation() {
                    return Ok(HttpResponse::BadRequest().json(json!({
                        "message": "Unknown department"
                    })));
                }
            }

            error!(error = %e, "Failed to create class");
            Ok(HttpResponse::InternalServerError().json(json!({
                "message": "Internal Server Error"
            })))
        }
    }
}

/// List classes, optionally per department
#[utoipa::path(
    get,
    path = "/classes",
    params(ClassQuery),
    responses(
        (status = 200, description = "Classes", body = [ClassGroup]),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "Class"
)]
pub async fn list_classes(
    _auth: AuthUser,
    pool: web::Data<MySqlPool>,
    query: web::Query<ClassQuery>,
) -> actix_web::Result<impl Responder> {
    let mut sql = String::from("SELECT class_id, class_name, department_id FROM class");
    if query.department_id.is_some() {
        sql.push_str(" WHERE department_id = ?");
    }
    sql.push_str(" ORDER BY class_id");

    let mut q = sqlx::query_as::<_, ClassGroup>(&sql);
    if let Some(department_id) = query.department_id {
        q = q.bind(department_id);
    }

    let classes = q.fetch_all(pool.get_ref()).await.map_err(|e| {
        error!(error = %e, "Failed to list classes");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    Ok(HttpResponse::Ok().json(classes))
}

/// Update a class (admin/school)
pub async fn update_class(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
    body: web::Json<Value>,
) -> actix_web::Result<impl Responder> {
    auth.require_admin_or_school()?;

    let class_id = path.into_inner();

    let update = build_update_sql(
        "class",
        &body,
        UPDATABLE,
        "class_id",
        SqlValue::I64(class_id as i64),
    )?;

    let affected = execute_update(pool.get_ref(), update)
        .await
        .map_err(actix_web::error::ErrorInternalServerError)?;

    if affected == 0 {
        return Ok(HttpResponse::NotFound().json(json!({
            "message": "Class not found"
        })));
    }

    Ok(HttpResponse::Ok().json(json!({
        "message": "Class updated successfully"
    })))
}

/// Delete a class (admin/school)
pub async fn delete_class(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    auth.require_admin_or_school()?;

    let class_id = path.into_inner();

    let result = sqlx::query("DELETE FROM class WHERE class_id = ?")
        .bind(class_id)
        .execute(pool.get_ref())
        .await
        .map_err(|e| {
            error!(error = %e, class_id, "Failed to delete class");
            actix_web::error::ErrorInternalServerError("Internal Server Error")
        })?;

    if result.rows_affected() == 0 {
        return Ok(HttpResponse::NotFound().json(json!({
            "message": "Class not found"
        })));
    }

    Ok(HttpResponse::Ok().json(json!({
        "message": "Successfully deleted"
    })))
}
