pub mod core;
pub mod teachers;

pub use teachers::TeacherStore;
