use crate::auth::auth::AuthUser;
use crate::model::department::Department;
use crate::utils::db_utils::{SqlValue, build_update_sql, execute_update};
use actix_web::{HttpResponse, Responder, web};
use serde::Deserialize;
use serde_json::{Value, json};
use sqlx::MySqlPool;
use tracing::error;
use utoipa::{IntoParams, ToSchema};

#[derive(Deserialize, ToSchema)]
pub struct CreateDepartment {
    #[schema(example = "Computer Science")]
    pub department_name: String,
    #[schema(example = "Prof. H. Head")]
    pub hod: Option<String>,
    pub school_id: u64,
}

#[derive(Deserialize, IntoParams, ToSchema)]
pub struct DepartmentQuery {
    /// Filter by school
    pub school_id: Option<u64>,
}

const UPDATABLE: &[&str] = &["department_name", "hod"];

/// Create a department (admin/school)
#[utoipa::path(
    post,
    path = "/departments",
    request_body = CreateDepartment,
    responses(
        (status = 201, description = "Department created", body = Department),
        (status = 400, description = "Unknown school"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(("bearer_auth" = [])),
    tag = "Department"
)]
pub async fn create_department(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    payload: web::Json<CreateDepartment>,
) -> actix_web::Result<impl Responder> {
    auth.require_admin_or_school()?;

    let result = sqlx::query(
        "INSERT INTO department (department_name, hod, school_id) VALUES (?, ?, ?)",
    )
    .bind(&payload.department_name)
    .bind(&payload.hod)
    .bind(payload.school_id)
    .execute(pool.get_ref())
    .await;

    match result {
        Ok(res) => {
            let department = sqlx::query_as::<_, Department>(
                "SELECT department_id, department_name, hod, school_id FROM department WHERE department_id = ?",
            )
            .bind(res.last_insert_id())
            .fetch_one(pool.get_ref())
            .await
            .map_err(|e| {
                error!(error = %e, "Failed to fetch created department");
                actix_web::error::ErrorInternalServerError("Internal Server Error")
            })?;

            Ok(HttpResponse::Created().json(department))
        }
        Err(e) => {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.is_foreign_key_violation() {
                    return Ok(HttpResponse::BadRequest().json(json!({
                        "message": "Unknown school"
                    })));
                }
            }

            error!(error = %e, "Failed to create department");
            Ok(HttpResponse::InternalServerError().json(json!({
                "message": "Internal Server Error"
            })))
        }
    }
}

/// List departments, optionally per school
#[utoipa::path(
    get,
    path = "/departments",
    params(DepartmentQuery),
    responses(
        (status = 200, description = "Departments", body = [Department]),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "Department"
)]
pub async fn list_departments(
    _auth: AuthUser,
    pool: web::Data<MySqlPool>,
    query: web::Query<DepartmentQuery>,
) -> actix_web::Result<impl Responder> {
    let mut sql = String::from(
        "SELECT department_id, department_name, hod, school_id FROM department",
    );
    if query.school_id.is_some() {
        sql.push_str(" WHERE school_id = ?");
    }
    sql.push_str(" ORDER BY department_id");

    let mut q = sqlx::query_as::<_, Department>(&sql);
    if let Some(school_id) = query.school_id {
        q = q.bind(school_id);
    }

    let departments = q.fetch_all(pool.get_ref()).await.map_err(|e| {
        error!(error = %e, "Failed to list departments");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    Ok(HttpResponse::Ok().json(departments))
}

/// Update a department (admin/school)
pub async fn update_department(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
    body: web::Json<Value>,
) -> actix_web::Result<impl Responder> {
    auth.require_admin_or_school()?;

    let department_id = path.into_inner();

    let update = build_update_sql(
        "department",
        &body,
        UPDATABLE,
        "department_id",
        SqlValue::I64(department_id as i64),
    )?;

    let affected = execute_update(pool.get_ref(), update)
        .await
        .map_err(actix_web::error::ErrorInternalServerError)?;

    if affected == 0 {
        return Ok(HttpResponse::NotFound().json(json!({
            "message": "Department not found"
        })));
    }

    Ok(HttpResponse::Ok().json(json!({
        "message": "Department updated successfully"
    })))
}

/// Delete a department (admin/school)
pub async fn delete_department(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    auth.require_admin_or_school()?;

    let department_id = path.into_inner();

    let result = sqlx::query("DELETE FROM department WHERE department_id = ?")
        .bind(department_id)
        .execute(pool.get_ref())
        .await
        .map_err(|e| {
            error!(error = %e, department_id, "Failed to delete department");
            actix_web::error::ErrorInternalServerError("Internal Server Error")
        })?;

    if result.rows_affected() == 0 {
        return Ok(HttpResponse::NotFound().json(json!({
            "message": "Department not found"
        })));
    }

    Ok(HttpResponse::Ok().json(json!({
        "message": "Successfully deleted"
    })))
}
