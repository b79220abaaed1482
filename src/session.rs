//! Data side of the add/edit dialog.
//!
//! A session is opened blank (create) or pre-filled from the store (edit),
//! mutated field by field while the dialog is shown, and consumed by either
//! [`EditSession::confirm`] or [`EditSession::cancel`]. Validation and
//! persistence belong to the caller.

use serde::Serialize;

use crate::db::TeacherStore;
use crate::models::{Draft, Field};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "mode", content = "id", rename_all = "snake_case")]
pub enum SessionMode {
    Create,
    Edit(i64),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EditSession {
    mode: SessionMode,
    name: String,
    subject: String,
    group: String,
}

impl EditSession {
    pub fn create() -> Self {
        Self {
            mode: SessionMode::Create,
            name: String::new(),
            subject: String::new(),
            group: String::new(),
        }
    }

    /// Opens a session for `id`. Fields stay blank if the teacher can't be loaded.
    pub fn edit(store: &TeacherStore, id: i64) -> Self {
        let mut session = Self {
            mode: SessionMode::Edit(id),
            ..Self::create()
        };

        match store.get(id) {
            Ok(Some(teacher)) => {
                session.name = teacher.name;
                session.subject = teacher.subject;
                session.group = teacher.group;
            }
            Ok(None) => log::warn!("[session] Teacher {} not found, opening blank", id),
            Err(e) => log::warn!("[session] Failed to load teacher {}: {}", id, e),
        }
        session
    }

    pub fn mode(&self) -> SessionMode {
        self.mode
    }

    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::Name => &self.name,
            Field::Subject => &self.subject,
            Field::Group => &self.group,
        }
    }

    /// Stores raw input; trimming happens on confirm.
    pub fn set(&mut self, field: Field, value: impl Into<String>) {
        let value = value.into();
        match field {
            Field::Name => self.name = value,
            Field::Subject => self.subject = value,
            Field::Group => self.group = value,
        }
    }

    pub fn with(mut self, field: Field, value: impl Into<String>) -> Self {
        self.set(field, value);
        self
    }

    pub fn confirm(self) -> Option<Draft> {
        Some(Draft::new(&self.name, &self.subject, &self.group))
    }

    pub fn cancel(self) -> Option<Draft> {
        None
    }
}
