use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// One attendance session, identified by the short code handed out to the
/// class. Immutable once created.
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
#[schema(
    example = json!({
        "unique_code": "AB12CD",
        "user_id": "6e5f0f3e-58b5-4f4c-a2a7-2dc4ac9a72b4",
        "course_code": "CS301",
        "class_id": 1,
        "teacher_id": 7,
        "created_at": "2026-01-01T09:00:00Z"
    })
)]
pub struct AttendanceRegister {
    #[schema(example = "AB12CD")]
    pub unique_code: String,
    pub user_id: String,
    #[schema(example = "CS301")]
    pub course_code: String,
    pub class_id: u64,
    pub teacher_id: u64,
    #[schema(value_type = String, format = "date-time")]
    pub created_at: DateTime<Utc>,
}
