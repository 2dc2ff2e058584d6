//! Assignment board screen: one column per project, cards moved with the keyboard.

use crossterm::event::KeyCode;
use tracing::error;
use tui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Span, Spans},
    widgets::{Block, Borders, List, ListItem, ListState},
    Frame,
};

use crate::db::Database;
use crate::models::{developer_name, Assignment, Developer, Project};
use crate::planning::board::{columns, DropResult};
use crate::ui::components::date_input::format_date;
use crate::ui::components::render_footer;
use crate::ui::dashboard::load_all;

const VISIBLE_COLUMNS: usize = 4;

/// A card currently picked up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Drag {
    pub assignment_id: String,
    pub source: String,
    pub target_column: usize,
}

pub struct BoardState {
    pub projects: Vec<Project>,
    pub developers: Vec<Developer>,
    pub assignments: Vec<Assignment>,
    column: usize,
    card: usize,
    drag: Option<Drag>,
    pub error: Option<String>,
}

#[derive(Debug, PartialEq, Eq)]
pub enum BoardAction {
    NewAssignment,
    EditAssignment(String),
    DeleteAssignment(String),
    Drop(DropResult),
}

impl BoardState {
    pub fn new(projects: Vec<Project>, developers: Vec<Developer>, assignments: Vec<Assignment>) -> Self {
        Self {
            projects,
            developers,
            assignments,
            column: 0,
            card: 0,
            drag: None,
            error: None,
        }
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    pub fn drag(&self) -> Option<&Drag> {
        self.drag.as_ref()
    }

    pub fn selected_column(&self) -> usize {
        self.column
    }

    /// Assignments of the focused column, in board order.
    fn column_assignments(&self, column: usize) -> Vec<&Assignment> {
        match self.projects.get(column) {
            Some(project) => self
                .assignments
                .iter()
                .filter(|a| a.project_id == project.id)
                .collect(),
            None => Vec::new(),
        }
    }

    pub fn selected_assignment(&self) -> Option<&Assignment> {
        self.column_assignments(self.column).get(self.card).copied()
    }

    pub fn replace_assignments(&mut self, assignments: Vec<Assignment>) {
        self.assignments = assignments;
        self.clamp_card();
    }

    fn clamp_card(&mut self) {
        let len = self.column_assignments(self.column).len();
        if self.card >= len {
            self.card = len.saturating_sub(1);
        }
    }

    fn move_column(&mut self, forward: bool) {
        let len = self.projects.len();
        if len == 0 {
            return;
        }
        let current = self.drag.as_ref().map_or(self.column, |d| d.target_column);
        let next = if forward {
            (current + 1).min(len - 1)
        } else {
            current.saturating_sub(1)
        };

        match &mut self.drag {
            Some(drag) => drag.target_column = next,
            None => {
                self.column = next;
                self.card = 0;
            }
        }
    }

    fn move_card(&mut self, forward: bool) {
        let len = self.column_assignments(self.column).len();
        if len == 0 {
            return;
        }
        self.card = if forward {
            (self.card + 1).min(len - 1)
        } else {
            self.card.saturating_sub(1)
        };
    }

    fn pick_up(&mut self) {
        let Some(assignment) = self.selected_assignment() else {
            return;
        };
        self.drag = Some(Drag {
            assignment_id: assignment.id.clone(),
            source: assignment.project_id.clone(),
            target_column: self.column,
        });
    }

    /// Releases the picked-up card; `cancel` drops it outside any column.
    fn release(&mut self, cancel: bool) -> Option<DropResult> {
        let drag = self.drag.take()?;
        let destination = if cancel {
            None
        } else {
            self.projects.get(drag.target_column).map(|p| p.id.clone())
        };
        if destination.is_some() {
            self.column = drag.target_column;
            self.card = 0;
        }
        Some(DropResult {
            draggable_id: drag.assignment_id,
            source: drag.source,
            destination,
        })
    }
}

/// Fetches projects, developers and assignments concurrently.
pub async fn load_board(db: &Database) -> BoardState {
    let (projects, developers, assignments) = load_all(db).await;
    BoardState::new(projects, developers, assignments)
}

pub async fn load_assignments(db: &Database) -> Option<Vec<Assignment>> {
    match db.get_assignments().await {
        Ok(assignments) => Some(assignments),
        Err(err) => {
            error!(error = %err, "failed to fetch assignments");
            None
        }
    }
}

fn card_lines<'a>(assignment: &Assignment, developers: &[Developer], marker: &str) -> Vec<Spans<'a>> {
    let dates = match assignment.end_date {
        Some(end) => format!("{} to {}", format_date(assignment.start_date), format_date(end)),
        None => format_date(assignment.start_date),
    };
    vec![
        Spans::from(Span::styled(
            format!("{marker}{}", developer_name(developers, &assignment.developer_id)),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Spans::from(format!("  {}% - {}", assignment.time_allocation, dates)),
    ]
}

pub fn render_board<B: Backend>(frame: &mut Frame<B>, area: Rect, state: &mut BoardState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(3)].as_ref())
        .split(area);

    let board = columns(&state.projects, &state.assignments);
    let focus = state.drag.as_ref().map_or(state.column, |d| d.target_column);
    let first = focus.saturating_sub(VISIBLE_COLUMNS - 1);
    let visible: Vec<_> = board.iter().enumerate().skip(first).take(VISIBLE_COLUMNS).collect();

    if visible.is_empty() {
        let empty = List::new(vec![ListItem::new("No projects yet")])
            .block(Block::default().title("Assignments").borders(Borders::ALL));
        frame.render_widget(empty, chunks[0]);
    } else {
        let constraints: Vec<Constraint> = visible
            .iter()
            .map(|_| Constraint::Ratio(1, visible.len() as u32))
            .collect();
        let areas = Layout::default()
            .direction(Direction::Horizontal)
            .constraints(constraints)
            .split(chunks[0]);

        for ((index, column), column_area) in visible.iter().zip(areas.iter()) {
            let dragged = state.drag.as_ref().map(|d| d.assignment_id.as_str());
            let items: Vec<ListItem> = column
                .assignments
                .iter()
                .map(|a| {
                    let marker = if Some(a.id.as_str()) == dragged { "* " } else { "" };
                    ListItem::new(card_lines(a, &state.developers, marker))
                })
                .collect();

            let border = match &state.drag {
                Some(drag) if drag.target_column == *index => Style::default().fg(Color::Green),
                None if state.column == *index => Style::default().fg(Color::Yellow),
                _ => Style::default(),
            };

            let mut list_state = ListState::default();
            if state.drag.is_none() && state.column == *index && !column.assignments.is_empty() {
                list_state.select(Some(state.card));
            }

            let list = List::new(items)
                .block(
                    Block::default()
                        .title(column.project.name.clone())
                        .borders(Borders::ALL)
                        .border_style(border),
                )
                .highlight_style(Style::default().bg(Color::Blue).fg(Color::White));
            frame.render_stateful_widget(list, *column_area, &mut list_state);
        }
    }

    let help = if state.is_dragging() {
        "<Left/Right> Choose column | <Enter> Drop | <Esc> Cancel move"
    } else {
        "<Space> Move card | <N> New | <E> Edit | <D> Delete | <Tab> Next section | <Q> Quit"
    };
    render_footer(frame, chunks[1], help, state.error.as_deref());
}

pub fn handle_input(state: &mut BoardState, key: KeyCode) -> Option<BoardAction> {
    if state.is_dragging() {
        return match key {
            KeyCode::Left => {
                state.move_column(false);
                None
            }
            KeyCode::Right => {
                state.move_column(true);
                None
            }
            KeyCode::Enter | KeyCode::Char(' ') => state.release(false).map(BoardAction::Drop),
            KeyCode::Esc => state.release(true).map(BoardAction::Drop),
            _ => None,
        };
    }

    let selected_id = state.selected_assignment().map(|a| a.id.clone());
    match key {
        KeyCode::Left => state.move_column(false),
        KeyCode::Right => state.move_column(true),
        KeyCode::Up => state.move_card(false),
        KeyCode::Down => state.move_card(true),
        KeyCode::Char(' ') => state.pick_up(),
        KeyCode::Char('n') => return Some(BoardAction::NewAssignment),
        KeyCode::Char('e') => return selected_id.map(BoardAction::EditAssignment),
        KeyCode::Char('d') => return selected_id.map(BoardAction::DeleteAssignment),
        _ => {}
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn project(id: &str) -> Project {
        let mut p = Project::new(Utc::now());
        p.id = id.into();
        p.name = id.to_uppercase();
        p
    }

    fn assignment(id: &str, project_id: &str) -> Assignment {
        let mut a = Assignment::new(Utc::now());
        a.id = id.into();
        a.project_id = project_id.into();
        a
    }

    fn board() -> BoardState {
        BoardState::new(
            vec![project("p1"), project("p2"), project("p3")],
            Vec::new(),
            vec![assignment("a1", "p1"), assignment("a2", "p1"), assignment("a3", "p2")],
        )
    }

    #[test]
    fn moving_a_card_right_produces_a_drop_on_that_column() {
        let mut state = board();
        handle_input(&mut state, KeyCode::Down);
        handle_input(&mut state, KeyCode::Char(' '));
        assert!(state.is_dragging());
        handle_input(&mut state, KeyCode::Right);
        handle_input(&mut state, KeyCode::Right);

        let action = handle_input(&mut state, KeyCode::Enter);
        assert_eq!(
            action,
            Some(BoardAction::Drop(DropResult {
                draggable_id: "a2".into(),
                source: "p1".into(),
                destination: Some("p3".into()),
            }))
        );
        assert!(!state.is_dragging());
        assert_eq!(state.selected_column(), 2);
    }

    #[test]
    fn escape_cancels_the_drag_without_destination() {
        let mut state = board();
        handle_input(&mut state, KeyCode::Char(' '));
        handle_input(&mut state, KeyCode::Right);

        let action = handle_input(&mut state, KeyCode::Esc);
        assert_eq!(
            action,
            Some(BoardAction::Drop(DropResult {
                draggable_id: "a1".into(),
                source: "p1".into(),
                destination: None,
            }))
        );
        assert_eq!(state.selected_column(), 0);
    }

    #[test]
    fn empty_column_has_nothing_to_pick_up() {
        let mut state = board();
        handle_input(&mut state, KeyCode::Right);
        handle_input(&mut state, KeyCode::Right);
        handle_input(&mut state, KeyCode::Char(' '));
        assert!(!state.is_dragging());
        assert_eq!(handle_input(&mut state, KeyCode::Char('e')), None);
    }

    #[test]
    fn edit_and_delete_target_the_selected_card() {
        let mut state = board();
        handle_input(&mut state, KeyCode::Right);
        assert_eq!(
            handle_input(&mut state, KeyCode::Char('e')),
            Some(BoardAction::EditAssignment("a3".into()))
        );
        assert_eq!(
            handle_input(&mut state, KeyCode::Char('d')),
            Some(BoardAction::DeleteAssignment("a3".into()))
        );
    }

    #[test]
    fn replacing_assignments_keeps_the_selection_in_range() {
        let mut state = board();
        handle_input(&mut state, KeyCode::Down);
        state.replace_assignments(vec![assignment("a1", "p1")]);
        assert_eq!(state.selected_assignment().map(|a| a.id.as_str()), Some("a1"));
    }
}
