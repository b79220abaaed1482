//! Shared constants used across the application.

// Database file, relative to the working directory
pub const DB_FILE: &str = "teachers.db";

// Table
pub const TEACHERS_TABLE: &str = "teachers";

// User-facing messages
pub const MSG_SELECT_TO_EDIT: &str = "Please select a teacher to edit.";
pub const MSG_SELECT_TO_DELETE: &str = "Please select a teacher to delete.";
pub const MSG_TEACHER_GONE: &str = "The selected teacher no longer exists.";
pub const MSG_ADD_FAILED: &str = "Failed to add teacher.";
pub const MSG_UPDATE_FAILED: &str = "Failed to update teacher.";
pub const MSG_DELETE_FAILED: &str = "Failed to delete teacher.";
pub const MSG_SAVE_FAILED: &str = "Failed to save changes.";
pub const MSG_REFRESH_FAILED: &str = "Failed to reload the teacher list.";
pub const MSG_SAVED: &str = "Changes saved successfully.";
pub const MSG_DB_UNAVAILABLE: &str = "Could not connect to the database.";
