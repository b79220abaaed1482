use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Result, RosterError};

/// One persisted row of the roster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Teacher {
    pub id: i64,
    pub name: String,
    pub subject: String,
    pub group: String,
}

/// Unpersisted field values, always stored trimmed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Draft {
    pub name: String,
    pub subject: String,
    pub group: String,
}

/// Addresses one editable column of the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Name,
    Subject,
    Group,
}

impl Field {
    pub const ALL: [Field; 3] = [Field::Name, Field::Subject, Field::Group];

    pub fn as_str(&self) -> &'static str {
        match self {
            Field::Name => "name",
            Field::Subject => "subject",
            Field::Group => "group",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Draft {
    pub fn new(name: &str, subject: &str, group: &str) -> Self {
        Self {
            name: name.trim().to_string(),
            subject: subject.trim().to_string(),
            group: group.trim().to_string(),
        }
    }

    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::Name => &self.name,
            Field::Subject => &self.subject,
            Field::Group => &self.group,
        }
    }

    /// Replaces one field, trimming the new value.
    pub fn set(&mut self, field: Field, value: &str) {
        let value = value.trim().to_string();
        match field {
            Field::Name => self.name = value,
            Field::Subject => self.subject = value,
            Field::Group => self.group = value,
        }
    }

    /// Fails on the first field that is blank.
    pub fn validate(&self) -> Result<()> {
        match Field::ALL.into_iter().find(|f| self.get(*f).trim().is_empty()) {
            Some(field) => Err(RosterError::Validation { field }),
            None => Ok(()),
        }
    }
}

impl From<&Teacher> for Draft {
    fn from(teacher: &Teacher) -> Self {
        Draft::new(&teacher.name, &teacher.subject, &teacher.group)
    }
}

impl Teacher {
    pub fn with_draft(&self, draft: &Draft) -> Teacher {
        Teacher {
            id: self.id,
            name: draft.name.clone(),
            subject: draft.subject.clone(),
            group: draft.group.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn new_trims_every_field() {
        let draft = Draft::new("  Иванов Иван ", "\tМатематика", "Группа 1\n");
        assert_eq!(draft.name, "Иванов Иван");
        assert_eq!(draft.subject, "Математика");
        assert_eq!(draft.group, "Группа 1");
    }

    #[test]
    fn validate_reports_first_blank_field() {
        let err = Draft::new("Петров Петр", "   ", "").validate().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert!(matches!(err, RosterError::Validation { field: Field::Subject }));
    }

    #[test]
    fn set_overwrites_single_field() {
        let mut draft = Draft::new("a", "b", "c");
        draft.set(Field::Group, "  Группа 4 ");
        assert_eq!(draft, Draft::new("a", "b", "Группа 4"));
        assert!(draft.validate().is_ok());
    }
}
