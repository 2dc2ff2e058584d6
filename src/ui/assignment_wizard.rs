use chrono::Utc;
use crossterm::event::KeyCode;
use tui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Span, Spans},
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame,
};

use crate::models::{Assignment, Developer, Project, FULL_ALLOCATION, UNKNOWN_LABEL};
use crate::ui::components::date_input::{format_date, DateInputState};
use crate::ui::components::render_footer;

const ALLOCATION_STEP: u32 = 10;

#[derive(Debug, PartialEq)]
pub enum AssignmentWizardAction {
    Cancel,
    Save(Assignment),
}

#[derive(Clone, PartialEq, Copy, Debug)]
pub enum AssignmentField {
    Developer,
    Project,
    Allocation,
    StartDate,
    EndDate,
    Indefinite,
}

const FIELDS: [AssignmentField; 6] = [
    AssignmentField::Developer,
    AssignmentField::Project,
    AssignmentField::Allocation,
    AssignmentField::StartDate,
    AssignmentField::EndDate,
    AssignmentField::Indefinite,
];

impl AssignmentField {
    fn label(self) -> &'static str {
        match self {
            AssignmentField::Developer => "Developer",
            AssignmentField::Project => "Project",
            AssignmentField::Allocation => "Time allocation",
            AssignmentField::StartDate => "Start Date",
            AssignmentField::EndDate => "End Date",
            AssignmentField::Indefinite => "Indefinite",
        }
    }
}

/// An (id, label) pair offered by a picker field.
pub type Choice = (String, String);

pub struct AssignmentWizardState {
    pub assignment: Assignment,
    pub developers: Vec<Choice>,
    pub projects: Vec<Choice>,
    pub current_field: AssignmentField,
    pub editing: bool,
    pub start_date_state: DateInputState,
    pub end_date_state: DateInputState,
    pub error: Option<String>,
}

impl AssignmentWizardState {
    pub fn new(developers: &[Developer], projects: &[Project]) -> Self {
        Self::from_existing(Assignment::new(Utc::now()), developers, projects)
    }

    pub fn from_existing(assignment: Assignment, developers: &[Developer], projects: &[Project]) -> Self {
        let end_date = assignment.end_date.unwrap_or(assignment.start_date);
        Self {
            start_date_state: DateInputState::from_instant(assignment.start_date),
            end_date_state: DateInputState::from_instant(end_date),
            assignment,
            developers: developers.iter().map(|d| (d.id.clone(), d.full_name())).collect(),
            projects: projects.iter().map(|p| (p.id.clone(), p.name.clone())).collect(),
            current_field: AssignmentField::Developer,
            editing: false,
            error: None,
        }
    }

    /// Fields shown for the current state; the end date hides while indefinite.
    fn visible_fields(&self) -> Vec<AssignmentField> {
        FIELDS
            .iter()
            .copied()
            .filter(|f| !(self.assignment.is_indefinite && *f == AssignmentField::EndDate))
            .collect()
    }

    fn step_field(&mut self, forward: bool) {
        let fields = self.visible_fields();
        let position = fields.iter().position(|f| *f == self.current_field).unwrap_or(0);
        let next = if forward {
            (position + 1) % fields.len()
        } else {
            (position + fields.len() - 1) % fields.len()
        };
        self.current_field = fields[next];
    }

    pub fn next_field(&mut self) {
        self.step_field(true);
    }

    pub fn previous_field(&mut self) {
        self.step_field(false);
    }

    fn cycle_choice(choices: &[Choice], current: &mut String, forward: bool) {
        if choices.is_empty() {
            return;
        }
        let next = match choices.iter().position(|(id, _)| id == current) {
            Some(i) if forward => (i + 1) % choices.len(),
            Some(i) => (i + choices.len() - 1) % choices.len(),
            None => 0,
        };
        *current = choices[next].0.clone();
    }

    /// Adjusts pickers, the allocation slider and the indefinite toggle.
    /// Returns false for fields edited through editing mode.
    fn adjust(&mut self, forward: bool) -> bool {
        match self.current_field {
            AssignmentField::Developer => {
                Self::cycle_choice(&self.developers, &mut self.assignment.developer_id, forward)
            }
            AssignmentField::Project => {
                Self::cycle_choice(&self.projects, &mut self.assignment.project_id, forward)
            }
            AssignmentField::Allocation => {
                let allocation = self.assignment.time_allocation;
                self.assignment.time_allocation = if forward {
                    (allocation + ALLOCATION_STEP).min(FULL_ALLOCATION)
                } else {
                    allocation.saturating_sub(ALLOCATION_STEP)
                };
            }
            AssignmentField::Indefinite => {
                self.assignment.is_indefinite = !self.assignment.is_indefinite;
                if self.assignment.is_indefinite {
                    self.assignment.end_date = None;
                }
            }
            AssignmentField::StartDate | AssignmentField::EndDate => return false,
        }
        true
    }

    pub fn toggle_editing(&mut self) {
        self.editing = !self.editing;
        if self.editing {
            match self.current_field {
                AssignmentField::StartDate => self.start_date_state.toggle_editing(),
                AssignmentField::EndDate => {
                    if self.assignment.end_date.is_none() {
                        self.assignment.end_date = Some(self.end_date_state.instant());
                    }
                    self.end_date_state.toggle_editing();
                }
                _ => {}
            }
        } else {
            self.start_date_state.editing = false;
            self.end_date_state.editing = false;
        }
    }

    pub fn edit_current_field(&mut self, key: KeyCode) {
        match self.current_field {
            AssignmentField::StartDate => {
                self.start_date_state.handle_input(key);
                self.assignment.start_date = self.start_date_state.instant();
            }
            AssignmentField::EndDate => {
                self.end_date_state.handle_input(key);
                self.assignment.end_date = Some(self.end_date_state.instant());
            }
            _ => {}
        }
    }

    fn label_of(choices: &[Choice], id: &str) -> String {
        if id.is_empty() {
            return "Not selected".to_string();
        }
        choices
            .iter()
            .find(|(choice_id, _)| choice_id == id)
            .map(|(_, label)| label.clone())
            .unwrap_or_else(|| UNKNOWN_LABEL.to_string())
    }
}

pub fn render_assignment_wizard<B: Backend>(f: &mut Frame<B>, area: Rect, state: &mut AssignmentWizardState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints(
            [
                Constraint::Length(3),
                Constraint::Min(8),
                Constraint::Length(3),
            ]
            .as_ref(),
        )
        .split(area);

    let title_text = if state.assignment.is_new() {
        "New Assignment"
    } else {
        "Edit Assignment"
    };
    let title = Paragraph::new(title_text)
        .style(Style::default().fg(Color::Cyan))
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(title, chunks[0]);

    let assignment = &state.assignment;
    let items: Vec<ListItem> = state
        .visible_fields()
        .into_iter()
        .map(|field| {
            let selected = field == state.current_field;
            let value = match field {
                AssignmentField::Developer => format!(
                    "< {} >",
                    AssignmentWizardState::label_of(&state.developers, &assignment.developer_id)
                ),
                AssignmentField::Project => format!(
                    "< {} >",
                    AssignmentWizardState::label_of(&state.projects, &assignment.project_id)
                ),
                AssignmentField::Allocation => {
                    let filled = (assignment.time_allocation / ALLOCATION_STEP) as usize;
                    format!(
                        "[{}{}] {}%",
                        "#".repeat(filled),
                        "-".repeat(10 - filled.min(10)),
                        assignment.time_allocation
                    )
                }
                AssignmentField::StartDate if selected && state.editing => {
                    state.start_date_state.get_display_string()
                }
                AssignmentField::StartDate => format_date(assignment.start_date),
                AssignmentField::EndDate if selected && state.editing => {
                    state.end_date_state.get_display_string()
                }
                AssignmentField::EndDate => assignment
                    .end_date
                    .map(format_date)
                    .unwrap_or_else(|| "Not set".to_string()),
                AssignmentField::Indefinite => (if assignment.is_indefinite { "Yes" } else { "No" }).to_string(),
            };

            let (label_style, value_style) = if selected {
                (
                    Style::default().fg(Color::Yellow),
                    Style::default().add_modifier(Modifier::BOLD),
                )
            } else {
                (Style::default(), Style::default())
            };
            ListItem::new(Spans::from(vec![
                Span::styled(format!("{}: ", field.label()), label_style),
                Span::styled(value, value_style),
            ]))
        })
        .collect();

    let form = List::new(items).block(Block::default().borders(Borders::ALL).title("Assignment Details"));
    f.render_widget(form, chunks[1]);

    let help_text = if state.editing {
        "Enter - Save field | Left/Right - Switch date part | Esc - Done"
    } else {
        "Left/Right - Change value | Enter - Edit date | X - Clear end date | S - Save | Esc - Cancel"
    };
    render_footer(f, chunks[2], help_text, state.error.as_deref());
}

pub fn handle_input(state: &mut AssignmentWizardState, key: KeyCode) -> Option<AssignmentWizardAction> {
    if state.editing {
        match key {
            KeyCode::Esc | KeyCode::Enter => state.toggle_editing(),
            _ => state.edit_current_field(key),
        }
        return None;
    }

    match key {
        KeyCode::Esc => return Some(AssignmentWizardAction::Cancel),
        KeyCode::Up => state.previous_field(),
        KeyCode::Down => state.next_field(),
        KeyCode::Left => {
            state.adjust(false);
        }
        KeyCode::Right => {
            state.adjust(true);
        }
        KeyCode::Enter => {
            if !state.adjust(true) {
                state.toggle_editing();
            }
        }
        KeyCode::Char('x') if state.current_field == AssignmentField::EndDate => {
            state.assignment.end_date = None;
        }
        KeyCode::Char('s') => return Some(AssignmentWizardAction::Save(state.assignment.clone())),
        _ => {}
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn developers() -> Vec<Developer> {
        vec![
            Developer {
                id: "d1".into(),
                first_name: "Ada".into(),
                last_name: "Lovelace".into(),
                ..Developer::default()
            },
            Developer {
                id: "d2".into(),
                first_name: "Alan".into(),
                last_name: "Turing".into(),
                ..Developer::default()
            },
        ]
    }

    fn projects() -> Vec<Project> {
        let mut p = Project::new(Utc::now());
        p.id = "p1".into();
        p.name = "Apollo".into();
        vec![p]
    }

    fn go_to(state: &mut AssignmentWizardState, field: AssignmentField) {
        while state.current_field != field {
            handle_input(state, KeyCode::Down);
        }
    }

    #[test]
    fn new_assignment_defaults() {
        let state = AssignmentWizardState::new(&developers(), &projects());
        assert_eq!(state.assignment.time_allocation, 100);
        assert!(!state.assignment.is_indefinite);
        assert_eq!(state.assignment.end_date, None);
        assert!(state.assignment.developer_id.is_empty());
    }

    #[test]
    fn pickers_and_slider() {
        let mut state = AssignmentWizardState::new(&developers(), &projects());
        handle_input(&mut state, KeyCode::Right);
        handle_input(&mut state, KeyCode::Right);
        assert_eq!(state.assignment.developer_id, "d2");

        go_to(&mut state, AssignmentField::Project);
        handle_input(&mut state, KeyCode::Right);
        assert_eq!(state.assignment.project_id, "p1");

        go_to(&mut state, AssignmentField::Allocation);
        handle_input(&mut state, KeyCode::Right);
        assert_eq!(state.assignment.time_allocation, 100);
        for _ in 0..3 {
            handle_input(&mut state, KeyCode::Left);
        }
        assert_eq!(state.assignment.time_allocation, 70);
    }

    #[test]
    fn indefinite_hides_and_clears_the_end_date() {
        let mut state = AssignmentWizardState::new(&developers(), &projects());
        go_to(&mut state, AssignmentField::EndDate);
        handle_input(&mut state, KeyCode::Enter);
        handle_input(&mut state, KeyCode::Esc);
        assert!(state.assignment.end_date.is_some());

        go_to(&mut state, AssignmentField::Indefinite);
        handle_input(&mut state, KeyCode::Enter);
        assert!(state.assignment.is_indefinite);
        assert_eq!(state.assignment.end_date, None);
        assert!(!state.visible_fields().contains(&AssignmentField::EndDate));

        handle_input(&mut state, KeyCode::Up);
        assert_eq!(state.current_field, AssignmentField::StartDate);
    }

    #[test]
    fn editing_keeps_other_fields() {
        let mut assignment = Assignment::new(Utc::now());
        assignment.id = "a1".into();
        assignment.developer_id = "ghost".into();
        assignment.project_id = "p1".into();
        assignment.time_allocation = 30;
        let mut state = AssignmentWizardState::from_existing(assignment.clone(), &developers(), &projects());

        assert_eq!(
            AssignmentWizardState::label_of(&state.developers, &state.assignment.developer_id),
            "Unknown"
        );
        assert_eq!(
            handle_input(&mut state, KeyCode::Char('s')),
            Some(AssignmentWizardAction::Save(assignment))
        );
    }
}
