use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// One attendance mark. At most one row exists per (unique_code, roll_no);
/// `is_rejected` is the only field that may change after creation.
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
#[schema(
    example = json!({
        "attendance_id": 42,
        "unique_code": "AB12CD",
        "roll_no": "S001",
        "is_manual": true,
        "is_proxy": false,
        "is_rejected": false,
        "created_at": "2026-01-01T09:05:00Z"
    })
)]
pub struct AttendanceLog {
    pub attendance_id: u64,
    #[schema(example = "AB12CD")]
    pub unique_code: String,
    #[schema(example = "S001")]
    pub roll_no: String,
    /// True when no photo was submitted
    pub is_manual: bool,
    /// True when photo verification failed or fell below the threshold
    pub is_proxy: bool,
    /// Teacher override, toggled after creation
    pub is_rejected: bool,
    #[schema(value_type = String, format = "date-time")]
    pub created_at: DateTime<Utc>,
}
