use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct Teacher {
    pub teacher_id: u64,
    pub user_id: String,
    pub school_id: u64,
    #[schema(example = "Jane Doe")]
    pub teacher_name: String,
    #[schema(example = "jane@school.edu", nullable = true)]
    pub teacher_email: Option<String>,
    pub phone_number: Option<String>,
}
