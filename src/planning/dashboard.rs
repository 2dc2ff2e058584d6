use chrono::{DateTime, Utc};

use super::availability::{availability, Availability};
use crate::models::{Assignment, Developer, Project};

pub const RECENT_ASSIGNMENT_COUNT: usize = 5;

/// Read-only digest shown on the dashboard.
#[derive(Debug)]
pub struct DashboardSummary<'a> {
    pub active_projects: Vec<&'a Project>,
    pub available_developers: Vec<Availability<'a>>,
    pub recent_assignments: Vec<&'a Assignment>,
}

impl<'a> DashboardSummary<'a> {
    pub fn compute(
        projects: &'a [Project],
        developers: &'a [Developer],
        assignments: &'a [Assignment],
        as_of: DateTime<Utc>,
    ) -> Self {
        Self {
            active_projects: active_projects(projects),
            available_developers: availability(developers, assignments, as_of),
            recent_assignments: recent_assignments(assignments, RECENT_ASSIGNMENT_COUNT),
        }
    }
}

pub fn active_projects(projects: &[Project]) -> Vec<&Project> {
    projects.iter().filter(|p| p.is_active()).collect()
}

/// Latest-starting assignments first; equal start dates keep their input order.
pub fn recent_assignments(assignments: &[Assignment], count: usize) -> Vec<&Assignment> {
    let mut recent: Vec<&Assignment> = assignments.iter().collect();
    recent.sort_by(|a, b| b.start_date.cmp(&a.start_date));
    recent.truncate(count);
    recent
}
