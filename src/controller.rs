use serde::Serialize;
use std::collections::BTreeMap;

use crate::constants::*;
use crate::db::TeacherStore;
use crate::error::{ErrorKind, Result, RosterError};
use crate::models::{Draft, Field, Teacher};
use crate::session::EditSession;

/// What the user should be told after an action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "level", content = "message", rename_all = "snake_case")]
pub enum Feedback {
    None,
    Info(String),
    Warning(String),
    Error(String),
}

impl Feedback {
    fn warning(message: &str) -> Self {
        Feedback::Warning(message.to_string())
    }

    fn error(message: &str) -> Self {
        Feedback::Error(message.to_string())
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Feedback::None)
    }
}

/// Mediates between the grid, the edit dialog and the store.
///
/// The grid never talks to the store directly: after every successful write
/// the controller pulls the full list again. In-grid edits are kept in a
/// separate buffer keyed by id until they are flushed; reverting is just
/// dropping that buffer.
pub struct RosterController {
    store: TeacherStore,
    rows: Vec<Teacher>,
    pending: BTreeMap<i64, Draft>,
    selected: Option<i64>,
}

impl RosterController {
    pub fn new(mut store: TeacherStore) -> Result<Self> {
        store.ensure_schema()?;
        let rows = store.list_all()?;
        log::info!("[controller] Loaded {} teachers", rows.len());
        Ok(Self {
            store,
            rows,
            pending: BTreeMap::new(),
            selected: None,
        })
    }

    pub fn store(&self) -> &TeacherStore {
        &self.store
    }

    /// Re-fetches the persisted rows. Pending edits for rows that no longer
    /// exist are dropped.
    pub fn refresh(&mut self) -> Result<()> {
        self.rows = self.store.list_all()?;
        let rows = &self.rows;
        self.pending.retain(|id, _| rows.iter().any(|t| t.id == *id));
        if let Some(id) = self.selected {
            if !self.rows.iter().any(|t| t.id == id) {
                self.selected = None;
            }
        }
        Ok(())
    }

    /// Grid contents: the last persisted rows with pending edits applied.
    pub fn rows(&self) -> Vec<Teacher> {
        self.rows
            .iter()
            .map(|t| match self.pending.get(&t.id) {
                Some(draft) => t.with_draft(draft),
                None => t.clone(),
            })
            .collect()
    }

    pub fn select(&mut self, id: Option<i64>) {
        self.selected = id;
    }

    pub fn selected(&self) -> Option<i64> {
        self.selected
    }

    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Session the dialog shows when editing the current selection.
    pub fn open_edit_session(&self) -> Option<EditSession> {
        self.selected.map(|id| EditSession::edit(&self.store, id))
    }

    pub fn add<F>(&mut self, dialog: F) -> Feedback
    where
        F: FnOnce(EditSession) -> Option<Draft>,
    {
        let Some(draft) = dialog(EditSession::create()) else {
            return Feedback::None;
        };

        match self.store.insert_draft(&draft) {
            Ok(id) => {
                log::info!("[controller] Added teacher {}", id);
                self.after_write()
            }
            Err(e) if e.kind() == ErrorKind::Validation => {
                log::debug!("[controller] Add skipped: {}", e);
                Feedback::None
            }
            Err(e) => {
                log::error!("[controller] Add failed: {}", e);
                Feedback::error(MSG_ADD_FAILED)
            }
        }
    }

    pub fn edit<F>(&mut self, dialog: F) -> Feedback
    where
        F: FnOnce(EditSession) -> Option<Draft>,
    {
        let Some(id) = self.selected else {
            return Feedback::warning(MSG_SELECT_TO_EDIT);
        };
        let Some(draft) = dialog(EditSession::edit(&self.store, id)) else {
            return Feedback::None;
        };

        match self.store.update_draft(id, &draft) {
            Ok(()) => {
                log::info!("[controller] Updated teacher {}", id);
                self.pending.remove(&id);
                self.after_write()
            }
            Err(e) => match e.kind() {
                ErrorKind::Validation => {
                    log::debug!("[controller] Edit skipped: {}", e);
                    Feedback::None
                }
                ErrorKind::NotFound => self.vanished(id),
                _ => {
                    log::error!("[controller] Update of {} failed: {}", id, e);
                    Feedback::error(MSG_UPDATE_FAILED)
                }
            },
        }
    }

    pub fn delete<F>(&mut self, confirm: F) -> Feedback
    where
        F: FnOnce() -> bool,
    {
        let Some(id) = self.selected else {
            return Feedback::warning(MSG_SELECT_TO_DELETE);
        };
        if !confirm() {
            return Feedback::None;
        }

        match self.store.delete(id) {
            Ok(()) => {
                log::info!("[controller] Deleted teacher {}", id);
                self.selected = None;
                self.pending.remove(&id);
                self.after_write()
            }
            Err(e) if e.kind() == ErrorKind::NotFound => self.vanished(id),
            Err(e) => {
                log::error!("[controller] Delete of {} failed: {}", id, e);
                Feedback::error(MSG_DELETE_FAILED)
            }
        }
    }

    /// In-grid edit of a single cell, flushed to the store immediately.
    pub fn edit_cell(&mut self, id: i64, field: Field, value: &str) -> Feedback {
        let base = match self.pending.get(&id) {
            Some(draft) => draft.clone(),
            None => match self.rows.iter().find(|t| t.id == id) {
                Some(teacher) => Draft::from(teacher),
                None => return Feedback::warning(MSG_TEACHER_GONE),
            },
        };

        let mut draft = base;
        draft.set(field, value);
        self.pending.insert(id, draft);

        match self.submit_all() {
            Ok(()) => Feedback::None,
            Err(e) => {
                log::error!("[controller] Auto-save of {} failed: {}", id, e);
                self.flush_failed(e)
            }
        }
    }

    /// Re-submits whatever is still buffered.
    pub fn save_changes(&mut self) -> Feedback {
        match self.submit_all() {
            Ok(()) => Feedback::Info(MSG_SAVED.to_string()),
            Err(e) => {
                log::error!("[controller] Saving changes failed: {}", e);
                self.flush_failed(e)
            }
        }
    }

    /// Drops all buffered edits; the grid falls back to the persisted rows.
    pub fn revert_all(&mut self) {
        if !self.pending.is_empty() {
            log::info!("[controller] Reverting {} pending edits", self.pending.len());
        }
        self.pending.clear();
        if let Err(e) = self.refresh() {
            log::warn!("[controller] Refresh after revert failed: {}", e);
        }
    }

    // Writes buffered rows in id order and stops at the first failure,
    // leaving that row and the rest in the buffer.
    fn submit_all(&mut self) -> Result<()> {
        let ids: Vec<i64> = self.pending.keys().copied().collect();
        for id in ids {
            if let Some(draft) = self.pending.get(&id) {
                self.store.update_draft(id, draft)?;
                self.pending.remove(&id);
            }
        }
        self.refresh()
    }

    fn after_write(&mut self) -> Feedback {
        match self.refresh() {
            Ok(()) => Feedback::None,
            Err(e) => {
                log::error!("[controller] Refresh failed: {}", e);
                Feedback::error(MSG_REFRESH_FAILED)
            }
        }
    }

    // A row deleted behind the grid is a warning; anything else the engine
    // rejected is an error. Either way the buffer is rolled back.
    fn flush_failed(&mut self, e: RosterError) -> Feedback {
        self.revert_all();
        if e.kind() == ErrorKind::NotFound {
            Feedback::warning(MSG_TEACHER_GONE)
        } else {
            Feedback::error(MSG_SAVE_FAILED)
        }
    }

    fn vanished(&mut self, id: i64) -> Feedback {
        log::warn!("[controller] Teacher {} vanished before the action", id);
        if let Err(e) = self.refresh() {
            log::warn!("[controller] Refresh failed: {}", e);
        }
        Feedback::warning(MSG_TEACHER_GONE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn controller() -> RosterController {
        let store = TeacherStore::open_in_memory().unwrap();
        RosterController::new(store).unwrap()
    }

    fn fill(name: &str, subject: &str, group: &str) -> impl FnOnce(EditSession) -> Option<Draft> {
        let (name, subject, group) = (name.to_string(), subject.to_string(), group.to_string());
        move |session| {
            session
                .with(Field::Name, name)
                .with(Field::Subject, subject)
                .with(Field::Group, group)
                .confirm()
        }
    }

    #[test]
    fn add_refreshes_rows() {
        let mut c = controller();
        assert_eq!(c.add(fill("Иванов Иван", "Математика", "Группа 1")), Feedback::None);
        assert_eq!(c.rows().len(), 1);
        assert_eq!(c.rows()[0].name, "Иванов Иван");
    }

    #[test]
    fn cancelled_or_blank_add_is_silent() {
        let mut c = controller();
        assert!(c.add(|s| s.cancel()).is_none());
        assert!(c.add(fill("  ", "Физика", "Группа 2")).is_none());
        assert!(c.rows().is_empty());
    }

    #[test]
    fn edit_and_delete_need_a_selection() {
        let mut c = controller();
        assert_eq!(c.edit(|s| s.confirm()), Feedback::Warning(MSG_SELECT_TO_EDIT.into()));
        assert_eq!(c.delete(|| true), Feedback::Warning(MSG_SELECT_TO_DELETE.into()));
    }

    #[test]
    fn edit_dialog_sees_prefilled_session() {
        let mut c = controller();
        c.add(fill("Петров Петр", "Физика", "Группа 2"));
        let id = c.rows()[0].id;
        c.select(Some(id));

        let feedback = c.edit(|session| {
            assert_eq!(session.get(Field::Name), "Петров Петр");
            session.with(Field::Subject, "Астрономия").confirm()
        });
        assert!(feedback.is_none());
        assert_eq!(c.rows()[0].subject, "Астрономия");
    }

    #[test]
    fn declined_confirmation_keeps_row() {
        let mut c = controller();
        c.add(fill("a", "b", "c"));
        c.select(Some(c.rows()[0].id));
        assert!(c.delete(|| false).is_none());
        assert_eq!(c.rows().len(), 1);
        assert!(c.delete(|| true).is_none());
        assert!(c.rows().is_empty());
        assert_eq!(c.selected(), None);
    }

    #[test]
    fn blank_cell_edit_reverts_to_persisted_row() {
        let mut c = controller();
        c.add(fill("a", "b", "c"));
        let id = c.rows()[0].id;

        let feedback = c.edit_cell(id, Field::Group, "   ");
        assert_eq!(feedback, Feedback::Error(MSG_SAVE_FAILED.into()));
        assert!(!c.has_pending());
        assert_eq!(c.rows()[0].group, "c");
    }

    #[test]
    fn cell_edit_of_row_deleted_elsewhere_warns() {
        let mut c = controller();
        c.add(fill("a", "b", "c"));
        let id = c.rows()[0].id;
        c.store().delete(id).unwrap();

        let feedback = c.edit_cell(id, Field::Name, "x");
        assert_eq!(feedback, Feedback::Warning(MSG_TEACHER_GONE.into()));
        assert!(!c.has_pending());
        assert!(c.rows().is_empty());
    }

    #[test]
    fn feedback_serializes_with_level_and_message() {
        let value = serde_json::to_value(Feedback::Warning(MSG_SELECT_TO_EDIT.into())).unwrap();
        assert_eq!(value["level"], "warning");
        assert_eq!(value["message"], MSG_SELECT_TO_EDIT);
        let value = serde_json::to_value(Feedback::None).unwrap();
        assert_eq!(value, serde_json::json!({ "level": "none" }));
    }

    #[test]
    fn cell_edit_is_saved_immediately() {
        let mut c = controller();
        c.add(fill("a", "b", "c"));
        let id = c.rows()[0].id;

        assert!(c.edit_cell(id, Field::Name, " Дмитриев Дмитрий ").is_none());
        assert!(!c.has_pending());
        assert_eq!(c.store().get(id).unwrap().unwrap().name, "Дмитриев Дмитрий");
        assert_eq!(c.save_changes(), Feedback::Info(MSG_SAVED.into()));
    }
}
