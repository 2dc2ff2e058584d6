mod assignment;
mod developer;
mod project;

use serde::{de::DeserializeOwned, Serialize};

use crate::store::Collection;

pub use assignment::{Assignment, FULL_ALLOCATION};
pub use developer::Developer;
pub use project::{Project, ProjectStatus, ProjectType, ValidationError};

/// A typed record living in one store collection.
///
/// The id is assigned by the store and travels outside the encoded fields.
pub trait Record: Serialize + DeserializeOwned {
    const COLLECTION: Collection;

    /// Optional fields that must be removed from the stored document when unset.
    const CLEARABLE: &'static [&'static str] = &[];

    fn id(&self) -> &str;

    fn set_id(&mut self, id: String);
}

/// Label used whenever a reference points at a missing record.
pub const UNKNOWN_LABEL: &str = "Unknown";

pub fn developer_name(developers: &[Developer], developer_id: &str) -> String {
    developers
        .iter()
        .find(|d| d.id == developer_id)
        .map(Developer::full_name)
        .unwrap_or_else(|| UNKNOWN_LABEL.to_string())
}

pub fn project_name(projects: &[Project], project_id: &str) -> String {
    projects
        .iter()
        .find(|p| p.id == project_id)
        .map(|p| p.name.clone())
        .unwrap_or_else(|| UNKNOWN_LABEL.to_string())
}
