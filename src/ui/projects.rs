use crossterm::event::KeyCode;
use tracing::error;
use tui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Cell, Row, Table, TableState},
    Frame,
};

use crate::db::Database;
use crate::models::Project;
use crate::ui::components::date_input::format_date;
use crate::ui::components::{render_footer, step_selection};

// Represents the state of the project list screen
pub struct ProjectsState {
    projects: Vec<Project>,
    table_state: TableState,
    pub error: Option<String>,
}

impl ProjectsState {
    pub fn new(projects: Vec<Project>) -> Self {
        let mut table_state = TableState::default();
        if !projects.is_empty() {
            table_state.select(Some(0));
        }

        Self {
            projects,
            table_state,
            error: None,
        }
    }

    pub fn next(&mut self) {
        let i = step_selection(self.table_state.selected(), self.projects.len(), true);
        self.table_state.select(i);
    }

    pub fn previous(&mut self) {
        let i = step_selection(self.table_state.selected(), self.projects.len(), false);
        self.table_state.select(i);
    }

    pub fn projects(&self) -> &[Project] {
        &self.projects
    }

    pub fn selected_project(&self) -> Option<&Project> {
        self.table_state.selected().and_then(|i| self.projects.get(i))
    }

    pub fn selected_project_id(&self) -> Option<String> {
        self.selected_project().map(|p| p.id.clone())
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum ProjectAction {
    NewProject,
    EditProject(String),  // Contains project_id
    DeleteProject(String), // Contains project_id
}

/// Fetches the project list; a failed read is logged and shows as an empty list.
pub async fn load_projects(db: &Database) -> Vec<Project> {
    db.get_projects().await.unwrap_or_else(|err| {
        error!(error = %err, "failed to fetch projects");
        Vec::new()
    })
}

pub fn render_projects<B: Backend>(frame: &mut Frame<B>, area: Rect, state: &mut ProjectsState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(3)].as_ref())
        .split(area);

    let header = Row::new(vec!["Name", "Status", "Type", "Start date", "End date"])
        .style(Style::default().fg(Color::Yellow));

    let rows: Vec<Row> = state
        .projects
        .iter()
        .map(|project| {
            let end = project
                .end_date
                .map(format_date)
                .unwrap_or_else(|| "-".to_string());
            Row::new(vec![
                Cell::from(project.name.clone()),
                Cell::from(project.status.label()),
                Cell::from(project.kind.label()),
                Cell::from(format_date(project.start_date)),
                Cell::from(end),
            ])
        })
        .collect();

    let widths = [
        Constraint::Percentage(35),
        Constraint::Percentage(17),
        Constraint::Percentage(16),
        Constraint::Percentage(16),
        Constraint::Percentage(16),
    ];
    let table = Table::new(rows)
        .header(header)
        .block(Block::default().title("Projects").borders(Borders::ALL))
        .widths(&widths)
        .highlight_style(
            Style::default()
                .bg(Color::Blue)
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        );

    frame.render_stateful_widget(table, chunks[0], &mut state.table_state);

    let help = if state.selected_project().is_some() {
        "<N> New Project | <E> Edit Project | <D> Delete Project | <Tab> Next section | <Q> Quit"
    } else {
        "<N> New Project | <Tab> Next section | <Q> Quit"
    };
    render_footer(frame, chunks[1], help, state.error.as_deref());
}

pub fn handle_input(state: &mut ProjectsState, key: KeyCode) -> Option<ProjectAction> {
    match key {
        KeyCode::Char('n') => return Some(ProjectAction::NewProject),
        KeyCode::Char('e') => {
            if let Some(id) = state.selected_project_id() {
                return Some(ProjectAction::EditProject(id));
            }
        }
        KeyCode::Char('d') => {
            if let Some(id) = state.selected_project_id() {
                return Some(ProjectAction::DeleteProject(id));
            }
        }
        KeyCode::Down => state.next(),
        KeyCode::Up => state.previous(),
        _ => {}
    }
    None
}
