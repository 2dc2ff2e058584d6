//! Assignment board: one column per project, cards moved between columns.

use thiserror::Error;

use crate::models::{Assignment, Project};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum BoardError {
    #[error("assignment {0} does not exist")]
    UnknownAssignment(String),
    #[error("project {0} has no column on the board")]
    UnknownProject(String),
}

#[derive(Debug)]
pub struct BoardColumn<'a> {
    pub project: &'a Project,
    pub assignments: Vec<&'a Assignment>,
}

/// Groups assignments under their project, keeping the fetched order inside each column.
///
/// Assignments pointing at a project that is not listed appear in no column.
pub fn columns<'a>(projects: &'a [Project], assignments: &'a [Assignment]) -> Vec<BoardColumn<'a>> {
    projects
        .iter()
        .map(|project| BoardColumn {
            project,
            assignments: assignments
                .iter()
                .filter(|a| a.project_id == project.id)
                .collect(),
        })
        .collect()
}

/// A card released somewhere on the board, as reported by the board widget.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DropResult {
    pub draggable_id: String,
    pub source: String,
    /// Column the card was released over, `None` when the drag was cancelled.
    pub destination: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoardEvent {
    Reorder {
        assignment_id: String,
        source_project_id: String,
        target_project_id: String,
    },
}

impl BoardEvent {
    /// Cancelled drops and drops back onto the source column produce no event.
    pub fn from_drop(drop: DropResult) -> Option<Self> {
        let destination = drop.destination?;
        if destination == drop.source {
            return None;
        }
        Some(BoardEvent::Reorder {
            assignment_id: drop.draggable_id,
            source_project_id: drop.source,
            target_project_id: destination,
        })
    }
}

/// Write needed to carry out a board event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reassignment {
    pub assignment_id: String,
    pub target_project_id: String,
}

/// Checks an event against the board contents.
///
/// Returns `Ok(None)` when the assignment already belongs to the target project.
pub fn plan_reassignment(
    projects: &[Project],
    assignments: &[Assignment],
    event: &BoardEvent,
) -> Result<Option<Reassignment>, BoardError> {
    let BoardEvent::Reorder {
        assignment_id,
        target_project_id,
        ..
    } = event;

    let assignment = assignments
        .iter()
        .find(|a| &a.id == assignment_id)
        .ok_or_else(|| BoardError::UnknownAssignment(assignment_id.clone()))?;

    if &assignment.project_id == target_project_id {
        return Ok(None);
    }
    if !projects.iter().any(|p| &p.id == target_project_id) {
        return Err(BoardError::UnknownProject(target_project_id.clone()));
    }

    Ok(Some(Reassignment {
        assignment_id: assignment_id.clone(),
        target_project_id: target_project_id.clone(),
    }))
}

/// Patches the local copy after the store confirmed the write.
pub fn apply_reassignment(assignments: &mut [Assignment], reassignment: &Reassignment) {
    if let Some(assignment) = assignments
        .iter_mut()
        .find(|a| a.id == reassignment.assignment_id)
    {
        assignment.project_id = reassignment.target_project_id.clone();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn project(id: &str) -> Project {
        let mut p = Project::new(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap());
        p.id = id.into();
        p.name = id.to_uppercase();
        p
    }

    fn assignment(id: &str, project_id: &str) -> Assignment {
        let mut a = Assignment::new(Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap());
        a.id = id.into();
        a.project_id = project_id.into();
        a.developer_id = "d1".into();
        a.time_allocation = 50;
        a
    }

    fn reorder(assignment_id: &str, source: &str, target: &str) -> BoardEvent {
        BoardEvent::Reorder {
            assignment_id: assignment_id.into(),
            source_project_id: source.into(),
            target_project_id: target.into(),
        }
    }

    #[test]
    fn columns_group_assignments_in_fetch_order() {
        let projects = vec![project("p1"), project("p2"), project("p3")];
        let assignments = vec![
            assignment("a1", "p2"),
            assignment("a2", "p1"),
            assignment("a3", "p2"),
            assignment("a4", "deleted-project"),
        ];

        let board = columns(&projects, &assignments);
        let layout: Vec<(&str, Vec<&str>)> = board
            .iter()
            .map(|c| (c.project.id.as_str(), c.assignments.iter().map(|a| a.id.as_str()).collect()))
            .collect();
        assert_eq!(
            layout,
            vec![("p1", vec!["a2"]), ("p2", vec!["a1", "a3"]), ("p3", vec![])]
        );
    }

    #[test]
    fn cancelled_drop_yields_no_event() {
        let drop = DropResult {
            draggable_id: "a1".into(),
            source: "p1".into(),
            destination: None,
        };
        assert_eq!(BoardEvent::from_drop(drop), None);
    }

    #[test]
    fn same_column_drop_yields_no_event() {
        let drop = DropResult {
            draggable_id: "a1".into(),
            source: "p1".into(),
            destination: Some("p1".into()),
        };
        assert_eq!(BoardEvent::from_drop(drop), None);
    }

    #[test]
    fn drop_on_other_column_is_a_reorder() {
        let drop = DropResult {
            draggable_id: "a1".into(),
            source: "p1".into(),
            destination: Some("p2".into()),
        };
        assert_eq!(BoardEvent::from_drop(drop), Some(reorder("a1", "p1", "p2")));
    }

    #[test]
    fn reassign_to_current_project_is_a_no_op() {
        let projects = vec![project("p1"), project("p2")];
        let assignments = vec![assignment("a1", "p1")];
        // stale source column, the stored project wins
        let plan = plan_reassignment(&projects, &assignments, &reorder("a1", "p2", "p1")).unwrap();
        assert_eq!(plan, None);
    }

    #[test]
    fn unknown_assignment_or_project_is_rejected() {
        let projects = vec![project("p1")];
        let assignments = vec![assignment("a1", "p1")];

        assert_eq!(
            plan_reassignment(&projects, &assignments, &reorder("zz", "p1", "p1")),
            Err(BoardError::UnknownAssignment("zz".into()))
        );
        assert_eq!(
            plan_reassignment(&projects, &assignments, &reorder("a1", "p1", "p9")),
            Err(BoardError::UnknownProject("p9".into()))
        );
    }

    #[test]
    fn applying_a_reassignment_changes_only_the_project() {
        let projects = vec![project("p1"), project("p2")];
        let mut assignments = vec![assignment("a1", "p1"), assignment("a2", "p1")];
        let original = assignments[0].clone();

        let plan = plan_reassignment(&projects, &assignments, &reorder("a1", "p1", "p2"))
            .unwrap()
            .unwrap();
        apply_reassignment(&mut assignments, &plan);

        let moved = &assignments[0];
        assert_eq!(moved.project_id, "p2");
        assert_eq!(moved.time_allocation, original.time_allocation);
        assert_eq!(moved.start_date, original.start_date);
        assert_eq!(moved.end_date, original.end_date);
        assert_eq!(moved.is_indefinite, original.is_indefinite);
        assert_eq!(assignments[1].project_id, "p1");
    }
}
