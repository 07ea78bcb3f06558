use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

// "class" is a keyword, so the Rust side calls these class groups;
// the table keeps its original name.
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct ClassGroup {
    pub class_id: u64,
    #[schema(example = "CS-3A")]
    pub class_name: String,
    pub department_id: u64,
}
