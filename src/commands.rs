use serde::Serialize;
use std::sync::{Mutex, MutexGuard};
use tauri::State;

use crate::controller::{Feedback, RosterController};
use crate::models::{Draft, Field, Teacher};
use crate::session::EditSession;

pub struct AppState(pub Mutex<RosterController>);

/// Everything the page needs to re-render after an action.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandReply {
  rows: Vec<Teacher>,
  selected: Option<i64>,
  has_pending: bool,
  feedback: Feedback,
}

#[derive(Serialize)]
pub struct SessionReply {
  session: Option<EditSession>,
  feedback: Feedback,
}

fn lock<'a>(state: &'a State<'_, AppState>) -> Result<MutexGuard<'a, RosterController>, String> {
  state
    .0
    .lock()
    .map_err(|_| "Failed to acquire roster lock".to_string())
}

fn reply(controller: &RosterController, feedback: Feedback) -> CommandReply {
  CommandReply {
    rows: controller.rows(),
    selected: controller.selected(),
    has_pending: controller.has_pending(),
    feedback,
  }
}

// Replays what the page's dialog collected through a session so the values
// get trimmed the same way as everywhere else.
fn replay(draft: Option<Draft>) -> impl FnOnce(EditSession) -> Option<Draft> {
  move |session| match draft {
    Some(d) => session
      .with(Field::Name, d.name)
      .with(Field::Subject, d.subject)
      .with(Field::Group, d.group)
      .confirm(),
    None => session.cancel(),
  }
}

#[tauri::command]
pub fn list_teachers(state: State<AppState>) -> Result<CommandReply, String> {
  let mut controller = lock(&state)?;
  controller.refresh().map_err(|e| e.to_string())?;
  Ok(reply(&controller, Feedback::None))
}

#[tauri::command]
pub fn select_teacher(state: State<AppState>, id: Option<i64>) -> Result<CommandReply, String> {
  let mut controller = lock(&state)?;
  controller.select(id);
  Ok(reply(&controller, Feedback::None))
}

/// Pre-filled fields for the edit dialog, or a warning if nothing is selected.
#[tauri::command]
pub fn open_edit_session(state: State<AppState>) -> Result<SessionReply, String> {
  let controller = lock(&state)?;
  Ok(match controller.open_edit_session() {
    Some(session) => SessionReply {
      session: Some(session),
      feedback: Feedback::None,
    },
    None => SessionReply {
      session: None,
      feedback: Feedback::Warning(crate::constants::MSG_SELECT_TO_EDIT.to_string()),
    },
  })
}

#[tauri::command]
pub fn add_teacher(state: State<AppState>, draft: Option<Draft>) -> Result<CommandReply, String> {
  let mut controller = lock(&state)?;
  let feedback = controller.add(replay(draft));
  Ok(reply(&controller, feedback))
}

#[tauri::command]
pub fn edit_teacher(state: State<AppState>, draft: Option<Draft>) -> Result<CommandReply, String> {
  let mut controller = lock(&state)?;
  let feedback = controller.edit(replay(draft));
  Ok(reply(&controller, feedback))
}

/// `confirmed` is the answer the page got from its confirmation prompt.
#[tauri::command]
pub fn delete_teacher(state: State<AppState>, confirmed: bool) -> Result<CommandReply, String> {
  let mut controller = lock(&state)?;
  let feedback = controller.delete(|| confirmed);
  Ok(reply(&controller, feedback))
}

#[tauri::command]
pub fn edit_cell(
  state: State<AppState>,
  id: i64,
  field: Field,
  value: String,
) -> Result<CommandReply, String> {
  let mut controller = lock(&state)?;
  let feedback = controller.edit_cell(id, field, &value);
  Ok(reply(&controller, feedback))
}

#[tauri::command]
pub fn save_changes(state: State<AppState>) -> Result<CommandReply, String> {
  let mut controller = lock(&state)?;
  let feedback = controller.save_changes();
  Ok(reply(&controller, feedback))
}

#[tauri::command]
pub fn revert_changes(state: State<AppState>) -> Result<CommandReply, String> {
  let mut controller = lock(&state)?;
  controller.revert_all();
  Ok(reply(&controller, Feedback::None))
}
