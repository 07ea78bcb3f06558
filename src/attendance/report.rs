use crate::attendance::AttendanceError;
use serde::Serialize;
use sqlx::MySqlPool;
use utoipa::ToSchema;

/// Counts derived on demand from the log collection; nothing is stored.
/// Manual and photo-based marks partition the logs, so
/// `total == manual + photo` always holds.
#[derive(Debug, PartialEq, Eq, Serialize, ToSchema)]
#[schema(example = json!({
    "total": 10,
    "manual": 6,
    "photo": 4,
    "proxy": 2,
    "rejected": 1
}))]
pub struct AttendanceSummary {
    pub total: i64,
    pub manual: i64,
    pub photo: i64,
    pub proxy: i64,
    pub rejected: i64,
}

impl AttendanceSummary {
    pub fn from_counts(total: i64, manual: i64, proxy: i64, rejected: i64) -> Self {
        Self {
            total,
            manual,
            photo: total - manual,
            proxy,
            rejected,
        }
    }
}

/// Percentage of marks that stand (not rejected), 2 decimals.
pub fn attendance_percentage(total: i64, attended: i64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    (attended as f64 / total as f64 * 10_000.0).round() / 100.0
}

/// Aggregate counts over the logs, optionally narrowed to one subject
/// (joined through the register) and/or one student.
pub async fn summarize(
    pool: &MySqlPool,
    course_code: Option<&str>,
    roll_no: Option<&str>,
) -> Result<AttendanceSummary, AttendanceError> {
    let mut where_sql = String::from(" WHERE 1=1");
    if course_code.is_some() {
        where_sql.push_str(" AND r.course_code = ?");
    }
    if roll_no.is_some() {
        where_sql.push_str(" AND l.roll_no = ?");
    }

    let sql = format!(
        r#"
        SELECT COUNT(*),
               COUNT(IF(l.is_manual, 1, NULL)),
               COUNT(IF(l.is_proxy, 1, NULL)),
               COUNT(IF(l.is_rejected, 1, NULL))
        FROM attendance_logs l
        JOIN attendance_register r ON r.unique_code = l.unique_code
        {}
        "#,
        where_sql
    );

    let mut query = sqlx::query_as::<_, (i64, i64, i64, i64)>(&sql);
    if let Some(course) = course_code {
        query = query.bind(course);
    }
    if let Some(roll) = roll_no {
        query = query.bind(roll);
    }

    let (total, manual, proxy, rejected) = query.fetch_one(pool).await?;
    Ok(AttendanceSummary::from_counts(total, manual, proxy, rejected))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn total_is_manual_plus_photo() {
        for (total, manual) in [(0, 0), (10, 6), (7, 7), (5, 0)] {
            let summary = AttendanceSummary::from_counts(total, manual, 0, 0);
            assert_eq!(summary.total, summary.manual + summary.photo);
        }
    }

    #[test]
    fn ten_log_scenario() {
        // 6 manual, 4 photo, 2 proxy, 1 rejected
        let summary = AttendanceSummary::from_counts(10, 6, 2, 1);
        assert_eq!(
            summary,
            AttendanceSummary {
                total: 10,
                manual: 6,
                photo: 4,
                proxy: 2,
                rejected: 1
            }
        );
    }

    #[test]
    fn percentage_rounds_to_two_decimals() {
        assert_eq!(attendance_percentage(3, 2), 66.67);
        assert_eq!(attendance_percentage(10, 9), 90.0);
        assert_eq!(attendance_percentage(0, 0), 0.0);
    }
}
