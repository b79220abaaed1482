use rusqlite::{params, Connection, OptionalExtension, Result as SqliteResult, Row};
use std::path::Path;

use crate::db::core::{apply_migrations, open_connection};
use crate::error::{Result, RosterError};
use crate::models::{Draft, Teacher};

/// Durable storage for the roster. Owns the single connection for the
/// lifetime of the process.
pub struct TeacherStore {
  conn: Connection,
}

fn teacher_from_row(row: &Row<'_>) -> SqliteResult<Teacher> {
  Ok(Teacher {
    id: row.get(0)?,
    name: row.get(1)?,
    subject: row.get(2)?,
    group: row.get(3)?,
  })
}

impl TeacherStore {
  pub fn open(path: &Path) -> Result<Self> {
    Ok(Self {
      conn: open_connection(path)?,
    })
  }

  pub fn open_in_memory() -> Result<Self> {
    let conn = Connection::open_in_memory().map_err(|source| RosterError::Connection {
      path: ":memory:".into(),
      source,
    })?;
    Ok(Self { conn })
  }

  /// Creates the teachers table if it does not exist yet.
  pub fn ensure_schema(&mut self) -> Result<()> {
    apply_migrations(&mut self.conn)
  }

  pub fn connection(&self) -> &Connection {
    &self.conn
  }

  /// All teachers in insertion order.
  pub fn list_all(&self) -> Result<Vec<Teacher>> {
    let mut stmt = self
      .conn
      .prepare("SELECT id, name, subject, group_name FROM teachers ORDER BY id")?;
    let rows = stmt
      .query_map([], teacher_from_row)?
      .collect::<SqliteResult<Vec<_>>>()?;
    Ok(rows)
  }

  pub fn get(&self, id: i64) -> Result<Option<Teacher>> {
    let teacher = self
      .conn
      .query_row(
        "SELECT id, name, subject, group_name FROM teachers WHERE id = ?1",
        params![id],
        teacher_from_row,
      )
      .optional()?;
    Ok(teacher)
  }

  pub fn count(&self) -> Result<usize> {
    let count: i64 = self
      .conn
      .query_row("SELECT COUNT(*) FROM teachers", [], |row| row.get(0))?;
    Ok(count as usize)
  }

  /// Inserts a new teacher and returns its id.
  pub fn insert(&self, name: &str, subject: &str, group: &str) -> Result<i64> {
    let draft = Draft::new(name, subject, group);
    draft.validate()?;

    self
      .conn
      .execute(
        "INSERT INTO teachers (name, subject, group_name) VALUES (?1, ?2, ?3)",
        params![draft.name, draft.subject, draft.group],
      )
      .map_err(|e| {
        log::error!("[db] Failed to insert teacher {}: {}", draft.name, e);
        RosterError::Store(e)
      })?;

    let id = self.conn.last_insert_rowid();
    log::debug!("[db] Inserted teacher {} ({})", id, draft.name);
    Ok(id)
  }

  pub fn insert_draft(&self, draft: &Draft) -> Result<i64> {
    self.insert(&draft.name, &draft.subject, &draft.group)
  }

  /// Overwrites all three fields of an existing teacher.
  pub fn update(&self, id: i64, name: &str, subject: &str, group: &str) -> Result<()> {
    let draft = Draft::new(name, subject, group);
    draft.validate()?;

    let affected = self
      .conn
      .execute(
        "UPDATE teachers SET name = ?1, subject = ?2, group_name = ?3 WHERE id = ?4",
        params![draft.name, draft.subject, draft.group, id],
      )
      .map_err(|e| {
        log::error!("[db] Failed to update teacher {}: {}", id, e);
        RosterError::Store(e)
      })?;

    if affected == 0 {
      return Err(RosterError::NotFound(id));
    }
    log::debug!("[db] Updated teacher {}", id);
    Ok(())
  }

  pub fn update_draft(&self, id: i64, draft: &Draft) -> Result<()> {
    self.update(id, &draft.name, &draft.subject, &draft.group)
  }

  /// Removes a teacher permanently.
  pub fn delete(&self, id: i64) -> Result<()> {
    let affected = self
      .conn
      .execute("DELETE FROM teachers WHERE id = ?1", params![id])
      .map_err(|e| {
        log::error!("[db] Failed to delete teacher {}: {}", id, e);
        RosterError::Store(e)
      })?;

    if affected == 0 {
      Err(RosterError::NotFound(id))
    } else {
      log::debug!("[db] Deleted teacher {}", id);
      Ok(())
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::error::ErrorKind;

  fn store() -> TeacherStore {
    let mut store = TeacherStore::open_in_memory().unwrap();
    store.ensure_schema().unwrap();
    store
  }

  #[test]
  fn insert_trims_and_lists_in_id_order() {
    let store = store();
    let first = store.insert(" Иванов Иван ", "Математика", "Группа 1").unwrap();
    let second = store.insert("Петров Петр", " Физика", "Группа 2 ").unwrap();
    assert!(second > first);

    let all = store.list_all().unwrap();
    assert_eq!(all.len(), 2);
    assert_eq!(all[0].name, "Иванов Иван");
    assert_eq!(all[1].subject, "Физика");
    assert_eq!(all[1].group, "Группа 2");
  }

  #[test]
  fn blank_fields_are_rejected_without_writing() {
    let store = store();
    for (name, subject, group) in [("", "x", "y"), ("x", "   ", "y"), ("x", "y", "\t")] {
      let err = store.insert(name, subject, group).unwrap_err();
      assert_eq!(err.kind(), ErrorKind::Validation);
    }
    assert_eq!(store.count().unwrap(), 0);
  }

  #[test]
  fn update_validates_before_checking_existence() {
    let store = store();
    let err = store.update(42, "", "x", "y").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);
    let err = store.update(42, "a", "x", "y").unwrap_err();
    assert!(matches!(err, RosterError::NotFound(42)));
  }

  #[test]
  fn update_changes_row_in_place() {
    let store = store();
    let id = store.insert("Сидоров Сидор", "Химия", "Группа 1").unwrap();
    store.update(id, "Сидоров Сидор", "Биохимия", "Группа 3").unwrap();
    let teacher = store.get(id).unwrap().unwrap();
    assert_eq!(teacher.subject, "Биохимия");
    assert_eq!(teacher.group, "Группа 3");
    assert_eq!(store.count().unwrap(), 1);
  }

  #[test]
  fn delete_missing_id_is_not_found() {
    let store = store();
    store.insert("a", "b", "c").unwrap();
    assert!(matches!(store.delete(99), Err(RosterError::NotFound(99))));
    assert_eq!(store.count().unwrap(), 1);
  }

  #[test]
  fn ids_are_not_reused_after_delete() {
    let store = store();
    let a = store.insert("a", "b", "c").unwrap();
    let b = store.insert("d", "e", "f").unwrap();
    store.delete(b).unwrap();
    let c = store.insert("g", "h", "i").unwrap();
    assert!(c > b);
    assert!(store.get(b).unwrap().is_none());
    assert_eq!(
      store.list_all().unwrap().iter().map(|t| t.id).collect::<Vec<_>>(),
      vec![a, c]
    );
  }

  #[test]
  fn write_without_schema_is_a_store_error() {
    let store = TeacherStore::open_in_memory().unwrap();
    let err = store.insert("a", "b", "c").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Store);
  }
}
