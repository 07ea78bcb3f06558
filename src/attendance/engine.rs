use crate::attendance::{code, AttendanceError};
use crate::model::attendance_log::AttendanceLog;
use crate::model::register::AttendanceRegister;
use crate::verifier::PhotoVerifier;
use sqlx::MySqlPool;
use tracing::warn;

/// Collisions in a 36^6 space are rare; ten fresh draws failing in a row
/// means the code space is effectively full and we fail loudly instead of
/// looping forever.
const MAX_CODE_ATTEMPTS: u32 = 10;

pub struct NewRegister {
    pub user_id: String,
    pub teacher_id: u64,
    pub course_code: String,
    pub class_id: u64,
}

/// Codes and roll numbers are matched case-insensitively against their
/// stored upper-case forms.
pub fn normalize(input: &str) -> String {
    input.trim().to_uppercase()
}

/// Create a register under a freshly generated code. The uniqueness check
/// and the insert are one atomic statement: a duplicate-key error on the
/// primary key means a collision, and we retry with a new code.
pub async fn create_register(
    pool: &MySqlPool,
    new: &NewRegister,
) -> Result<AttendanceRegister, AttendanceError> {
    for attempt in 1..=MAX_CODE_ATTEMPTS {
        let unique_code = code::generate_code();

        let result = sqlx::query(
            r#"
            INSERT INTO attendance_register (unique_code, user_id, course_code, class_id, teacher_id)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(&unique_code)
        .bind(&new.user_id)
        .bind(&new.course_code)
        .bind(new.class_id)
        .bind(new.teacher_id)
        .execute(pool)
        .await;

        match result {
            Ok(_) => return get_register(pool, &unique_code).await,
            Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
                warn!(attempt, unique_code, "Register code collision, retrying");
                continue;
            }
            Err(e) => return Err(e.into()),
        }
    }

    Err(AttendanceError::CodeSpaceExhausted)
}

pub async fn get_register(
    pool: &MySqlPool,
    unique_code: &str,
) -> Result<AttendanceRegister, AttendanceError> {
    sqlx::query_as::<_, AttendanceRegister>(
        r#"
        SELECT unique_code, user_id, course_code, class_id, teacher_id, created_at
        FROM attendance_register
        WHERE unique_code = ?
        "#,
    )
    .bind(unique_code)
    .fetch_optional(pool)
    .await?
    .ok_or(AttendanceError::RegisterNotFound)
}

/// Registers created by one user, newest first.
pub async fn list_registers(
    pool: &MySqlPool,
    user_id: &str,
    course_code: Option<&str>,
    skip: u64,
    limit: u64,
) -> Result<Vec<AttendanceRegister>, AttendanceError> {
    let mut where_sql = String::from(" WHERE user_id = ?");
    if course_code.is_some() {
        where_sql.push_str(" AND course_code = ?");
    }

    let sql = format!(
        r#"
        SELECT unique_code, user_id, course_code, class_id, teacher_id, created_at
        FROM attendance_register
        {}
        ORDER BY created_at DESC
        LIMIT ? OFFSET ?
        "#,
        where_sql
    );

    let mut query = sqlx::query_as::<_, AttendanceRegister>(&sql).bind(user_id);
    if let Some(course) = course_code {
        query = query.bind(course);
    }

    let registers = query.bind(limit).bind(skip).fetch_all(pool).await?;
    Ok(registers)
}

/// Mark attendance for a student against a register code.
///
/// Precondition failures surface as NotFound/Conflict; a verifier failure
/// never aborts the mark, it only flags the log as proxy. The duplicate
/// check rides on the (unique_code, roll_no) unique key, so concurrent
/// duplicate submissions cannot both succeed.
pub async fn mark(
    pool: &MySqlPool,
    verifier: &dyn PhotoVerifier,
    threshold: f32,
    unique_code: &str,
    roll_no: &str,
    photo_base64: Option<&str>,
) -> Result<AttendanceLog, AttendanceError> {
    let unique_code = normalize(unique_code);
    let roll_no = normalize(roll_no);

    let register = get_register(pool, &unique_code).await?;

    let student_exists = sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS(SELECT 1 FROM student_profile WHERE roll_no = ? LIMIT 1)",
    )
    .bind(&roll_no)
    .fetch_one(pool)
    .await?;

    if !student_exists {
        return Err(AttendanceError::StudentNotFound);
    }

    let (is_manual, is_proxy) = match photo_base64 {
        None => (true, false),
        Some(photo) => {
            let proxy = match verifier.verify(&roll_no, photo).await {
                Ok(v) => !v.accepts(&roll_no, threshold),
                Err(e) => {
                    // Fail safe: record the mark, let the teacher decide
                    warn!(error = %e, roll_no, "Photo verification failed; flagging as proxy");
                    true
                }
            };
            (false, proxy)
        }
    };

    let result = sqlx::query(
        r#"
        INSERT INTO attendance_logs (unique_code, roll_no, is_manual, is_proxy)
        VALUES (?, ?, ?, ?)
        "#,
    )
    .bind(&register.unique_code)
    .bind(&roll_no)
    .bind(is_manual)
    .bind(is_proxy)
    .execute(pool)
    .await;

    match result {
        Ok(res) => get_log(pool, res.last_insert_id()).await,
        Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
            Err(AttendanceError::AlreadyMarked)
        }
        Err(e) => Err(e.into()),
    }
}

pub async fn get_log(pool: &MySqlPool, attendance_id: u64) -> Result<AttendanceLog, AttendanceError> {
    sqlx::query_as::<_, AttendanceLog>(
        r#"
        SELECT attendance_id, unique_code, roll_no, is_manual, is_proxy, is_rejected, created_at
        FROM attendance_logs
        WHERE attendance_id = ?
        "#,
    )
    .bind(attendance_id)
    .fetch_optional(pool)
    .await?
    .ok_or(AttendanceError::LogNotFound)
}

/// Teacher override. Idempotent; leaves every other field untouched.
pub async fn set_rejected(
    pool: &MySqlPool,
    attendance_id: u64,
    rejected: bool,
) -> Result<AttendanceLog, AttendanceError> {
    // Existence first: an idempotent toggle may touch zero rows
    get_log(pool, attendance_id).await?;

    sqlx::query("UPDATE attendance_logs SET is_rejected = ? WHERE attendance_id = ?")
        .bind(rejected)
        .bind(attendance_id)
        .execute(pool)
        .await?;

    get_log(pool, attendance_id).await
}

/// Logs filtered by register and/or student, newest first, with the total
/// row count for pagination.
pub async fn list_logs(
    pool: &MySqlPool,
    unique_code: Option<&str>,
    roll_no: Option<&str>,
    per_page: u64,
    offset: u64,
) -> Result<(Vec<AttendanceLog>, i64), AttendanceError> {
    let mut where_sql = String::from(" WHERE 1=1");
    let mut args: Vec<&str> = Vec::new();

    if let Some(code) = unique_code {
        where_sql.push_str(" AND unique_code = ?");
        args.push(code);
    }

    if let Some(roll) = roll_no {
        where_sql.push_str(" AND roll_no = ?");
        args.push(roll);
    }

    let count_sql = format!("SELECT COUNT(*) FROM attendance_logs{}", where_sql);

    let mut count_q = sqlx::query_scalar::<_, i64>(&count_sql);
    for arg in &args {
        count_q = count_q.bind(*arg);
    }

    let total = count_q.fetch_one(pool).await?;

    let data_sql = format!(
        r#"
        SELECT attendance_id, unique_code, roll_no, is_manual, is_proxy, is_rejected, created_at
        FROM attendance_logs
        {}
        ORDER BY created_at DESC
        LIMIT ? OFFSET ?
        "#,
        where_sql
    );

    let mut data_q = sqlx::query_as::<_, AttendanceLog>(&data_sql);
    for arg in args {
        data_q = data_q.bind(arg);
    }

    let logs = data_q
        .bind(per_page)
        .bind(offset)
        .fetch_all(pool)
        .await?;

    Ok((logs, total))
}

/// Logs belonging to one register, newest first (register detail view).
pub async fn logs_for_register(
    pool: &MySqlPool,
    unique_code: &str,
) -> Result<Vec<AttendanceLog>, AttendanceError> {
    let logs = sqlx::query_as::<_, AttendanceLog>(
        r#"
        SELECT attendance_id, unique_code, roll_no, is_manual, is_proxy, is_rejected, created_at
        FROM attendance_logs
        WHERE unique_code = ?
        ORDER BY created_at DESC
        "#,
    )
    .bind(unique_code)
    .fetch_all(pool)
    .await?;

    Ok(logs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_trims_and_uppercases() {
        assert_eq!(normalize("  ab12cd "), "AB12CD");
        assert_eq!(normalize("s001"), "S001");
        assert_eq!(normalize("XY99ZZ"), "XY99ZZ");
    }

    #[test]
    fn normalize_keeps_empty_empty() {
        assert_eq!(normalize("   "), "");
    }
}
