use crate::attendance::engine;
use crate::auth::auth::AuthUser;
use crate::model::activity::SchoolActivity;
use actix_web::{HttpResponse, Responder, web};
use serde::Deserialize;
use sqlx::MySqlPool;
use tracing::error;
use utoipa::{IntoParams, ToSchema};

#[derive(Deserialize, IntoParams, ToSchema)]
pub struct ActivityQuery {
    /// Only activities touching this student
    pub roll_no: Option<String>,
    pub limit: Option<u32>,
}

/// Recent audit-trail entries, newest first (admin/school)
#[utoipa::path(
    get,
    path = "/activities",
    params(ActivityQuery),
    responses(
        (status = 200, description = "Activities", body = [SchoolActivity]),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(("bearer_auth" = [])),
    tag = "Activity"
)]
pub async fn list_activities(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    query: web::Query<ActivityQuery>,
) -> actix_web::Result<impl Responder> {
    auth.require_admin_or_school()?;

    let limit = query.limit.unwrap_or(50).clamp(1, 500);
    let roll_no = query.roll_no.as_deref().map(engine::normalize);

    let mut sql = String::from(
        "SELECT activity_id, activity_name, user_id, roll_no, created_at, updated_at \
         FROM school_activity",
    );
    if roll_no.is_some() {
        sql.push_str(" WHERE roll_no = ?");
    }
    sql.push_str(" ORDER BY created_at DESC LIMIT ?");

    let mut q = sqlx::query_as::<_, SchoolActivity>(&sql);
    if let Some(roll_no) = &roll_no {
        q = q.bind(roll_no);
    }
    q = q.bind(limit);

    let activities = q.fetch_all(pool.get_ref()).await.map_err(|e| {
        error!(error = %e, "Failed to list activities");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    Ok(HttpResponse::Ok().json(activities))
}
