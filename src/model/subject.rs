use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct Subject {
    #[schema(example = "CS301")]
    pub course_code: String,
    #[schema(example = "Operating Systems")]
    pub subject_name: String,
    pub school_id: u64,
    #[schema(example = 5, minimum = 1, maximum = 8)]
    pub semester: i32,
    pub class_id: u64,
}
