use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
#[schema(
    example = json!({
        "roll_no": "S001",
        "name": "John Doe",
        "phone_number": "+8801712345678",
        "email": "s001@school.edu",
        "semester": 5,
        "year": 3,
        "school_id": 1,
        "department_id": 2,
        "created_at": "2026-01-01T00:00:00Z"
    })
)]
pub struct Student {
    /// Roll numbers are stored upper-case
    pub roll_no: String,
    pub name: String,
    pub phone_number: Option<String>,
    pub email: Option<String>,
    pub semester: Option<i32>,
    pub year: Option<i32>,
    pub school_id: u64,
    pub department_id: u64,
    #[schema(value_type = String, format = "date-time")]
    pub created_at: DateTime<Utc>,
}
