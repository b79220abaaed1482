//! Fills `teachers.db` with the sample roster.

use teacher_roster_lib::db::{core::get_db_path, TeacherStore};
use teacher_roster_lib::constants::MSG_DB_UNAVAILABLE;
use teacher_roster_lib::seed::seed_database;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let mut store = match TeacherStore::open(&get_db_path()) {
        Ok(store) => store,
        Err(e) => {
            log::error!("[seed] {}", e);
            println!("{}", MSG_DB_UNAVAILABLE);
            std::process::exit(1);
        }
    };

    match seed_database(&mut store) {
        Ok(outcomes) => {
            for outcome in &outcomes {
                println!("{}", outcome.status_line());
            }
            println!("Sample data added to the database.");
        }
        Err(e) => {
            println!("Failed to prepare the database: {}", e);
            std::process::exit(1);
        }
    }
}
