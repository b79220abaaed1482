pub mod constants;
pub mod controller;
pub mod db;
pub mod error;
pub mod models;
pub mod seed;
pub mod session;

#[cfg(feature = "desktop")]
pub mod commands;

pub use controller::{Feedback, RosterController};
pub use db::TeacherStore;
pub use error::{ErrorKind, Result, RosterError};
pub use models::{Draft, Field, Teacher};
pub use session::EditSession;

#[cfg(feature = "desktop")]
#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() {
  use commands::AppState;
  use std::sync::Mutex;

  // The store is opened before any window exists; without it there is
  // nothing to show.
  let controller = match TeacherStore::open(&db::core::get_db_path()).and_then(RosterController::new) {
    Ok(controller) => controller,
    Err(e) => {
      eprintln!("[setup] Failed to initialize database: {}", e);
      eprintln!("{}", constants::MSG_DB_UNAVAILABLE);
      std::process::exit(1);
    }
  };

  tauri::Builder::default()
    .plugin(
      tauri_plugin_log::Builder::new()
        .level(log::LevelFilter::Info)
        .build(),
    )
    .manage(AppState(Mutex::new(controller)))
    .invoke_handler(tauri::generate_handler![
      commands::list_teachers,
      commands::select_teacher,
      commands::open_edit_session,
      commands::add_teacher,
      commands::edit_teacher,
      commands::delete_teacher,
      commands::edit_cell,
      commands::save_changes,
      commands::revert_changes,
    ])
    .run(tauri::generate_context!())
    .expect("error while running tauri application");
}
