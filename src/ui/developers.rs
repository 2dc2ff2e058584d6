use crossterm::event::KeyCode;
use tracing::error;
use tui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Row, Table, TableState},
    Frame,
};

use crate::db::Database;
use crate::models::Developer;
use crate::ui::components::{render_footer, step_selection};

pub struct DevelopersState {
    developers: Vec<Developer>,
    table_state: TableState,
    pub error: Option<String>,
}

impl DevelopersState {
    pub fn new(developers: Vec<Developer>) -> Self {
        let mut table_state = TableState::default();
        if !developers.is_empty() {
            table_state.select(Some(0));
        }

        Self {
            developers,
            table_state,
            error: None,
        }
    }

    pub fn next(&mut self) {
        let i = step_selection(self.table_state.selected(), self.developers.len(), true);
        self.table_state.select(i);
    }

    pub fn previous(&mut self) {
        let i = step_selection(self.table_state.selected(), self.developers.len(), false);
        self.table_state.select(i);
    }

    pub fn developers(&self) -> &[Developer] {
        &self.developers
    }

    pub fn selected_developer(&self) -> Option<&Developer> {
        self.table_state.selected().and_then(|i| self.developers.get(i))
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum DeveloperAction {
    NewDeveloper,
    EditDeveloper(String),
    DeleteDeveloper(String),
}

pub async fn load_developers(db: &Database) -> Vec<Developer> {
    db.get_developers().await.unwrap_or_else(|err| {
        error!(error = %err, "failed to fetch developers");
        Vec::new()
    })
}

pub fn render_developers<B: Backend>(frame: &mut Frame<B>, area: Rect, state: &mut DevelopersState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(3)].as_ref())
        .split(area);

    let header = Row::new(vec!["Employee ID", "Last name", "First name", "Position", "Skills"])
        .style(Style::default().fg(Color::Yellow));

    let rows: Vec<Row> = state
        .developers
        .iter()
        .map(|d| {
            Row::new(vec![
                d.employee_id.clone(),
                d.last_name.clone(),
                d.first_name.clone(),
                d.position.clone(),
                d.technical_skills.join(", "),
            ])
        })
        .collect();

    let widths = [
        Constraint::Percentage(12),
        Constraint::Percentage(18),
        Constraint::Percentage(18),
        Constraint::Percentage(20),
        Constraint::Percentage(32),
    ];
    let table = Table::new(rows)
        .header(header)
        .block(Block::default().title("Developers").borders(Borders::ALL))
        .widths(&widths)
        .highlight_style(
            Style::default()
                .bg(Color::Blue)
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        );

    frame.render_stateful_widget(table, chunks[0], &mut state.table_state);

    let help = if state.selected_developer().is_some() {
        "<N> New Developer | <E> Edit Developer | <D> Delete Developer | <Tab> Next section | <Q> Quit"
    } else {
        "<N> New Developer | <Tab> Next section | <Q> Quit"
    };
    render_footer(frame, chunks[1], help, state.error.as_deref());
}

pub fn handle_input(state: &mut DevelopersState, key: KeyCode) -> Option<DeveloperAction> {
    let selected_id = state.selected_developer().map(|d| d.id.clone());
    match key {
        KeyCode::Char('n') => Some(DeveloperAction::NewDeveloper),
        KeyCode::Char('e') => selected_id.map(DeveloperAction::EditDeveloper),
        KeyCode::Char('d') => selected_id.map(DeveloperAction::DeleteDeveloper),
        KeyCode::Down => {
            state.next();
            None
        }
        KeyCode::Up => {
            state.previous();
            None
        }
        _ => None,
    }
}
