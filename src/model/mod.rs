pub mod activity;
pub mod attendance_log;
pub mod class_group;
pub mod department;
pub mod register;
pub mod role;
pub mod school;
pub mod student;
pub mod subject;
pub mod teacher;
