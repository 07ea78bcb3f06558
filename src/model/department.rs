use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct Department {
    pub department_id: u64,
    #[schema(example = "Computer Science")]
    pub department_name: String,
    /// Head of department
    #[schema(example = "Prof. H. Head", nullable = true)]
    pub hod: Option<String>,
    pub school_id: u64,
}
