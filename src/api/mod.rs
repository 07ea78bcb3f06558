pub mod activity;
pub mod attendance;
pub mod class_group;
pub mod department;
pub mod reports;
pub mod school;
pub mod student;
pub mod subject;
pub mod teacher;
