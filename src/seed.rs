use crate::db::TeacherStore;
use crate::error::Result;

/// Sample roster inserted by the `seed` binary, as (name, subject, group).
pub const SAMPLE_TEACHERS: [(&str, &str, &str); 10] = [
    ("Иванов Иван", "Математика", "Группа 1"),
    ("Петров Петр", "Физика", "Группа 2"),
    ("Сидоров Сидор", "Химия", "Группа 1"),
    ("Кузнецов Алексей", "Биология", "Группа 3"),
    ("Андреев Андрей", "География", "Группа 2"),
    ("Васильев Василий", "История", "Группа 1"),
    ("Смирнова Анна", "Литература", "Группа 4"),
    ("Тимофеев Тимофей", "Информатика", "Группа 3"),
    ("Федорова Екатерина", "Иностранные языки", "Группа 4"),
    ("Дмитриев Дмитрий", "Философия", "Группа 2"),
];

pub struct SeedOutcome {
    pub name: &'static str,
    pub result: Result<i64>,
}

impl SeedOutcome {
    /// The status line printed for this row.
    pub fn status_line(&self) -> String {
        match &self.result {
            Ok(_) => format!("Teacher {} added successfully.", self.name),
            Err(e) => format!("Failed to add teacher {}: {}", self.name, e),
        }
    }
}

/// Ensures the schema and inserts every sample row. A failed row doesn't
/// stop the rest.
pub fn seed_database(store: &mut TeacherStore) -> Result<Vec<SeedOutcome>> {
    store.ensure_schema()?;

    let outcomes = SAMPLE_TEACHERS
        .iter()
        .map(|&(name, subject, group)| SeedOutcome {
            name,
            result: store.insert(name, subject, group),
        })
        .collect::<Vec<_>>();

    let failed = outcomes.iter().filter(|o| o.result.is_err()).count();
    log::info!(
        "[seed] Inserted {} of {} sample teachers",
        outcomes.len() - failed,
        outcomes.len()
    );
    Ok(outcomes)
}
