use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};
use utoipa::ToSchema;

/// Audit-trail entry names, stored as the `activity_type` DB enum.
#[derive(Debug, Copy, Clone, Eq, PartialEq, AsRefStr, Display, EnumString)]
#[strum(serialize_all = "snake_case")]
pub enum ActivityType {
    AddStudent,
    AddTeacher,
    RemoveTeacher,
    RemoveStudent,
    UpdateTeacher,
    UpdateStudent,
}

#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct SchoolActivity {
    pub activity_id: u64,
    #[schema(example = "add_student")]
    pub activity_name: String,
    pub user_id: String,
    #[schema(example = "S001", nullable = true)]
    pub roll_no: Option<String>,
    #[schema(value_type = String, format = "date-time")]
    pub created_at: DateTime<Utc>,
    #[schema(value_type = String, format = "date-time")]
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn activity_names_match_db_enum() {
        assert_eq!(ActivityType::AddStudent.as_ref(), "add_student");
        assert_eq!(ActivityType::RemoveTeacher.as_ref(), "remove_teacher");
        assert_eq!(
            ActivityType::from_str("update_student").unwrap(),
            ActivityType::UpdateStudent
        );
    }
}
