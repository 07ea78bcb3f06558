use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct School {
    pub school_id: u64,
    #[schema(example = "School of Engineering")]
    pub school_name: String,
    #[schema(example = "Dr. A. Dean", nullable = true)]
    pub school_dean: Option<String>,
}
