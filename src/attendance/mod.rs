use derive_more::Display;

pub mod code;
pub mod engine;
pub mod report;

/// Errors raised by the attendance core. Only NotFound/Conflict conditions
/// and storage failures; role checks live at the HTTP boundary.
#[derive(Debug, Display)]
pub enum AttendanceError {
    #[display(fmt = "Invalid attendance code")]
    RegisterNotFound,
    #[display(fmt = "Student not found")]
    StudentNotFound,
    #[display(fmt = "Attendance log not found")]
    LogNotFound,
    #[display(fmt = "Attendance already marked")]
    AlreadyMarked,
    #[display(fmt = "Could not allocate a unique register code")]
    CodeSpaceExhausted,
    #[display(fmt = "database error: {}", _0)]
    Db(sqlx::Error),
}

impl std::error::Error for AttendanceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AttendanceError::Db(e) => Some(e),
            _ => None,
        }
    }
}

impl From<sqlx::Error> for AttendanceError {
    fn from(e: sqlx::Error) -> Self {
        AttendanceError::Db(e)
    }
}
