use chrono::Utc;
use crossterm::event::KeyCode;
use tracing::error;
use tui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Span, Spans},
    widgets::{Block, Borders, List, ListItem},
    Frame,
};

use crate::db::Database;
use crate::models::{developer_name, project_name, Assignment, Developer, Project, ProjectType};
use crate::planning::DashboardSummary;
use crate::ui::components::date_input::format_date;
use crate::ui::components::render_footer;

pub struct DashboardState {
    pub projects: Vec<Project>,
    pub developers: Vec<Developer>,
    pub assignments: Vec<Assignment>,
}

#[derive(Debug, PartialEq, Eq)]
pub enum DashboardAction {
    Refresh,
}

/// Reads the three collections concurrently. Each one falls back to empty on its own.
pub async fn load_all(db: &Database) -> (Vec<Project>, Vec<Developer>, Vec<Assignment>) {
    let (projects, developers, assignments) = tokio::join!(
        db.get_all_projects(),
        db.get_developers(),
        db.get_assignments()
    );

    let projects = projects.unwrap_or_else(|err| {
        error!(error = %err, "failed to fetch projects");
        Vec::new()
    });
    let developers = developers.unwrap_or_else(|err| {
        error!(error = %err, "failed to fetch developers");
        Vec::new()
    });
    let assignments = assignments.unwrap_or_else(|err| {
        error!(error = %err, "failed to fetch assignments");
        Vec::new()
    });
    (projects, developers, assignments)
}

pub async fn load_dashboard(db: &Database) -> DashboardState {
    let (projects, developers, assignments) = load_all(db).await;
    DashboardState {
        projects,
        developers,
        assignments,
    }
}

fn project_card(project: &Project) -> ListItem<'static> {
    let end = project
        .end_date
        .map(format_date)
        .unwrap_or_else(|| "Not set".to_string());
    let kind_color = match project.kind {
        ProjectType::Commercial => Color::Cyan,
        ProjectType::Internal => Color::Magenta,
    };
    let (billable, billable_color) = if project.billable {
        ("Billable", Color::Green)
    } else {
        ("Not billable", Color::Gray)
    };

    ListItem::new(vec![
        Spans::from(Span::styled(
            project.name.clone(),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Spans::from(format!("  {} - {}", format_date(project.start_date), end)),
        Spans::from(format!("  {}", project.description)),
        Spans::from(vec![
            Span::raw("  "),
            Span::styled(project.kind.label(), Style::default().fg(kind_color)),
            Span::raw(" | "),
            Span::styled(billable, Style::default().fg(billable_color)),
        ]),
    ])
}

pub fn render_dashboard<B: Backend>(frame: &mut Frame<B>, area: Rect, state: &DashboardState) {
    let summary = DashboardSummary::compute(
        &state.projects,
        &state.developers,
        &state.assignments,
        Utc::now(),
    );

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(60), Constraint::Min(5), Constraint::Length(2)].as_ref())
        .split(area);
    let top = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)].as_ref())
        .split(rows[0]);

    let projects: Vec<ListItem> = summary.active_projects.iter().map(|p| project_card(p)).collect();
    let projects = List::new(projects).block(
        Block::default()
            .title(format!("Active projects ({})", summary.active_projects.len()))
            .borders(Borders::ALL),
    );
    frame.render_widget(projects, top[0]);

    let developers: Vec<ListItem> = summary
        .available_developers
        .iter()
        .map(|a| {
            ListItem::new(vec![
                Spans::from(Span::styled(
                    a.developer.full_name(),
                    Style::default().add_modifier(Modifier::BOLD),
                )),
                Spans::from(format!("  {}", a.developer.position)),
                Spans::from(Span::styled(
                    format!("  Available: {}%", a.remaining),
                    Style::default().fg(Color::Cyan),
                )),
                Spans::from(format!("  {}", a.developer.technical_skills.join(" · "))),
            ])
        })
        .collect();
    let developers = List::new(developers).block(
        Block::default()
            .title(format!("Available developers ({})", summary.available_developers.len()))
            .borders(Borders::ALL),
    );
    frame.render_widget(developers, top[1]);

    let recent: Vec<ListItem> = summary
        .recent_assignments
        .iter()
        .map(|a| {
            let period = match a.end_date {
                Some(end) => format!("from {} to {}", format_date(a.start_date), format_date(end)),
                None => format!("from {} (open-ended)", format_date(a.start_date)),
            };
            ListItem::new(vec![
                Spans::from(format!(
                    "{} → {}",
                    developer_name(&state.developers, &a.developer_id),
                    project_name(&state.projects, &a.project_id)
                )),
                Spans::from(Span::styled(
                    format!("  {}% - {}", a.time_allocation, period),
                    Style::default().fg(Color::Gray),
                )),
            ])
        })
        .collect();
    let recent = List::new(recent).block(
        Block::default()
            .title("Recent assignments")
            .borders(Borders::ALL),
    );
    frame.render_widget(recent, rows[1]);

    render_footer(frame, rows[2], "<R> Refresh | <Tab> Next section | <Q> Quit", None);
}

pub fn handle_input(key: KeyCode) -> Option<DashboardAction> {
    match key {
        KeyCode::Char('r') => Some(DashboardAction::Refresh),
        _ => None,
    }
}
