//! Group and teacher identity records.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Which kind of timetable subject a record or page refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubjectKind {
    Group,
    Teacher,
}

impl SubjectKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubjectKind::Group => "group",
            SubjectKind::Teacher => "teacher",
        }
    }

    /// Query parameter the upstream site uses to select a schedule page.
    pub fn schedule_param(&self) -> &'static str {
        match self {
            SubjectKind::Group => "v_gru",
            SubjectKind::Teacher => "v_prep",
        }
    }

    /// Display name reported for ids that are not in the snapshot.
    pub fn placeholder_name(&self) -> &'static str {
        match self {
            SubjectKind::Group => "Неизвестная группа",
            SubjectKind::Teacher => "Неизвестный преподаватель",
        }
    }
}

impl fmt::Display for SubjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A group or teacher as listed by the upstream site.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityRecord {
    /// Opaque upstream identifier
    pub id: String,

    /// Display name, trimmed
    pub name: String,
}

impl IdentityRecord {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// Identity echoed back in a schedule response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubjectIdentity {
    pub id: String,
    pub name: String,
    /// False when the id was not present in the snapshot
    pub exists: bool,
}

impl SubjectIdentity {
    pub fn known(record: &IdentityRecord) -> Self {
        Self {
            id: record.id.clone(),
            name: record.name.clone(),
            exists: true,
        }
    }

    pub fn unknown(kind: SubjectKind, id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: kind.placeholder_name().to_string(),
            exists: false,
        }
    }
}
