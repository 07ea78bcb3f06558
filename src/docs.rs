use crate::api::attendance::{
    CreateRegister, LogFilter, LogListResponse, MarkAttendance, MarkResponse,
    RegisterCreatedResponse, RegisterDetailResponse, UpdateLog,
};
use crate::api::class_group::CreateClass;
use crate::api::department::CreateDepartment;
use crate::api::reports::StudentAttendanceResponse;
use crate::api::school::CreateSchool;
use crate::api::student::{CreateStudent, StudentListResponse};
use crate::api::subject::CreateSubject;
use crate::api::teacher::{CreateTeacher, TeacherCreatedResponse};
use crate::attendance::report::AttendanceSummary;
use crate::model::activity::SchoolActivity;
use crate::model::attendance_log::AttendanceLog;
use crate::model::class_group::ClassGroup;
use crate::model::department::Department;
use crate::model::register::AttendanceRegister;
use crate::model::school::School;
use crate::model::student::Student;
use crate::model::subject::Subject;
use crate::model::teacher::Teacher;
use crate::models::RegisterUserReq;
use utoipa::Modify;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{OpenApi, openapi};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "ClassTrack API",
        version = "1.0.0",
        description = r#"
## School Management & Attendance System

This API powers a role-based school management system whose core is
code-based attendance collection.

### Key Features
- **School Structure**
  - Schools, departments, classes and subjects
- **People**
  - Teacher accounts with generated credentials, student profiles
- **Attendance**
  - Teachers open a register and share its 6-character code;
    students mark themselves present with the code, optionally
    backed by photo verification
- **Reports**
  - Aggregate and per-student attendance summaries

### Security
Most endpoints are protected using **JWT Bearer authentication**.
`POST /attendance/mark` is intentionally public so students can mark
attendance without an account.

---
Built with **Rust**, **Actix Web**, **SQLx**, and **Utoipa**.
"#,
    ),
    paths(
        crate::auth::handlers::register,

        crate::api::school::create_school,
        crate::api::school::list_schools,
        crate::api::school::get_school,
        crate::api::school::update_school,
        crate::api::school::delete_school,

        crate::api::department::create_department,
        crate::api::department::list_departments,

        crate::api::class_group::create_class,
        crate::api::class_group::list_classes,

        crate::api::subject::create_subject,
        crate::api::subject::list_subjects,

        crate::api::teacher::create_teacher,
        crate::api::teacher::list_teachers,

        crate::api::student::create_student,
        crate::api::student::list_students,
        crate::api::student::get_student,

        crate::api::attendance::create_register,
        crate::api::attendance::list_registers,
        crate::api::attendance::get_register,
        crate::api::attendance::mark_attendance,
        crate::api::attendance::list_logs,
        crate::api::attendance::update_log,

        crate::api::reports::attendance_summary,
        crate::api::reports::student_attendance,

        crate::api::activity::list_activities
    ),
    components(
        schemas(
            RegisterUserReq,
            CreateSchool,
            School,
            CreateDepartment,
            Department,
            CreateClass,
            ClassGroup,
            CreateSubject,
            Subject,
            CreateTeacher,
            TeacherCreatedResponse,
            Teacher,
            CreateStudent,
            Student,
            StudentListResponse,
            CreateRegister,
            RegisterCreatedResponse,
            RegisterDetailResponse,
            AttendanceRegister,
            MarkAttendance,
            MarkResponse,
            LogFilter,
            LogListResponse,
            UpdateLog,
            AttendanceLog,
            AttendanceSummary,
            StudentAttendanceResponse,
            SchoolActivity
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Auth", description = "Authentication APIs"),
        (name = "School", description = "School management APIs"),
        (name = "Department", description = "Department management APIs"),
        (name = "Class", description = "Class management APIs"),
        (name = "Subject", description = "Subject management APIs"),
        (name = "Teacher", description = "Teacher management APIs"),
        (name = "Student", description = "Student management APIs"),
        (name = "Attendance", description = "Attendance registers and logs"),
        (name = "Reports", description = "Attendance reporting APIs"),
        (name = "Activity", description = "Audit-trail APIs"),
    )
)]
pub struct ApiDoc;

pub struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}
