use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::Record;
use crate::store::Collection;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("project name is required")]
    EmptyProjectName,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectStatus {
    #[default]
    Analysis,
    Estimation,
    Proposal,
    Negotiation,
    Won,
    Lost,
    InProgress,
    Completed,
    Abandoned,
}

impl ProjectStatus {
    pub const ALL: [ProjectStatus; 9] = [
        ProjectStatus::Analysis,
        ProjectStatus::Estimation,
        ProjectStatus::Proposal,
        ProjectStatus::Negotiation,
        ProjectStatus::Won,
        ProjectStatus::Lost,
        ProjectStatus::InProgress,
        ProjectStatus::Completed,
        ProjectStatus::Abandoned,
    ];

    pub fn label(self) -> &'static str {
        match self {
            ProjectStatus::Analysis => "Analysis",
            ProjectStatus::Estimation => "Estimation",
            ProjectStatus::Proposal => "Proposal",
            ProjectStatus::Negotiation => "Negotiation",
            ProjectStatus::Won => "Won",
            ProjectStatus::Lost => "Lost",
            ProjectStatus::InProgress => "In progress",
            ProjectStatus::Completed => "Completed",
            ProjectStatus::Abandoned => "Abandoned",
        }
    }

    fn position(self) -> usize {
        Self::ALL.iter().position(|s| *s == self).unwrap_or(0)
    }

    pub fn next(self) -> Self {
        Self::ALL[(self.position() + 1) % Self::ALL.len()]
    }

    pub fn previous(self) -> Self {
        Self::ALL[(self.position() + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectType {
    #[default]
    Commercial,
    Internal,
}

impl ProjectType {
    pub fn label(self) -> &'static str {
        match self {
            ProjectType::Commercial => "Commercial",
            ProjectType::Internal => "Internal",
        }
    }

    pub fn toggle(self) -> Self {
        match self {
            ProjectType::Commercial => ProjectType::Internal,
            ProjectType::Internal => ProjectType::Commercial,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    #[serde(skip)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub status: ProjectStatus,
    pub start_date: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub billable: bool,
    #[serde(default, rename = "type")]
    pub kind: ProjectType,
}

impl Project {
    /// Blank project as presented by the creation form.
    pub fn new(start_date: DateTime<Utc>) -> Self {
        Self {
            id: String::new(),
            name: String::new(),
            status: ProjectStatus::default(),
            start_date,
            end_date: None,
            description: String::new(),
            billable: false,
            kind: ProjectType::default(),
        }
    }

    pub fn is_new(&self) -> bool {
        self.id.is_empty()
    }

    pub fn is_active(&self) -> bool {
        self.status == ProjectStatus::InProgress
    }

    /// Trims the free-text fields and rejects a blank name.
    pub fn validate(mut self) -> Result<Self, ValidationError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(ValidationError::EmptyProjectName);
        }
        self.name = name.to_string();
        self.description = self.description.trim().to_string();
        Ok(self)
    }
}

impl Record for Project {
    const COLLECTION: Collection = Collection::Projects;
    const CLEARABLE: &'static [&'static str] = &["endDate"];

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap()
    }

    #[test]
    fn whitespace_name_is_rejected() {
        let mut project = Project::new(start());
        project.name = "   ".into();
        assert_eq!(project.validate(), Err(ValidationError::EmptyProjectName));
    }

    #[test]
    fn validation_trims_name_and_description() {
        let mut project = Project::new(start());
        project.name = "  Apollo ".into();
        project.description = " moon shot\n".into();

        let project = project.validate().unwrap();
        assert_eq!(project.name, "Apollo");
        assert_eq!(project.description, "moon shot");
    }

    #[test]
    fn encodes_dates_as_iso_strings_and_omits_missing_end_date() {
        let mut project = Project::new(start());
        project.name = "Apollo".into();
        project.status = ProjectStatus::InProgress;

        let value = serde_json::to_value(&project).unwrap();
        assert_eq!(value["startDate"], json!("2024-03-01T00:00:00Z"));
        assert_eq!(value["status"], json!("in_progress"));
        assert_eq!(value["type"], json!("commercial"));
        assert!(value.get("endDate").is_none());
        assert!(value.get("id").is_none());
    }

    #[test]
    fn decodes_sparse_documents_with_defaults() {
        let project: Project = serde_json::from_value(json!({
            "startDate": "2024-03-01T00:00:00.000Z",
            "endDate": null,
        }))
        .unwrap();

        assert_eq!(project.name, "");
        assert_eq!(project.status, ProjectStatus::Analysis);
        assert_eq!(project.kind, ProjectType::Commercial);
        assert!(!project.billable);
        assert_eq!(project.start_date, start());
        assert_eq!(project.end_date, None);
    }

    #[test]
    fn status_cycle_wraps_around() {
        assert_eq!(ProjectStatus::Abandoned.next(), ProjectStatus::Analysis);
        assert_eq!(ProjectStatus::Analysis.previous(), ProjectStatus::Abandoned);
        assert_eq!(ProjectStatus::Lost.next(), ProjectStatus::InProgress);
    }
}
