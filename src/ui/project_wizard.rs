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

use crate::models::Project;
use crate::ui::components::date_input::{format_date, DateInputState};
use crate::ui::components::render_footer;

#[derive(Debug, PartialEq)]
pub enum ProjectWizardAction {
    Cancel,
    Save(Project),
}

#[derive(Clone, PartialEq, Copy, Debug)]
pub enum ProjectField {
    Name,
    Status,
    Type,
    Billable,
    StartDate,
    EndDate,
    Description,
}

const FIELDS: [ProjectField; 7] = [
    ProjectField::Name,
    ProjectField::Status,
    ProjectField::Type,
    ProjectField::Billable,
    ProjectField::StartDate,
    ProjectField::EndDate,
    ProjectField::Description,
];

impl ProjectField {
    fn label(self) -> &'static str {
        match self {
            ProjectField::Name => "Name",
            ProjectField::Status => "Status",
            ProjectField::Type => "Type",
            ProjectField::Billable => "Billable",
            ProjectField::StartDate => "Start Date",
            ProjectField::EndDate => "End Date",
            ProjectField::Description => "Description",
        }
    }

    fn is_text(self) -> bool {
        matches!(self, ProjectField::Name | ProjectField::Description)
    }

    fn is_date(self) -> bool {
        matches!(self, ProjectField::StartDate | ProjectField::EndDate)
    }
}

pub struct ProjectWizardState {
    pub project: Project,
    pub current_field: ProjectField,
    pub editing: bool,
    pub start_date_state: DateInputState,
    pub end_date_state: DateInputState,
    /// Validation or save failure shown under the form.
    pub error: Option<String>,
}

impl ProjectWizardState {
    pub fn new() -> Self {
        Self::from_existing(Project::new(Utc::now()))
    }

    pub fn from_existing(project: Project) -> Self {
        let end_date = project.end_date.unwrap_or(project.start_date);
        Self {
            start_date_state: DateInputState::from_instant(project.start_date),
            end_date_state: DateInputState::from_instant(end_date),
            project,
            current_field: ProjectField::Name,
            editing: false,
            error: None,
        }
    }

    pub fn toggle_editing(&mut self) {
        self.editing = !self.editing;
        if self.editing {
            match self.current_field {
                ProjectField::StartDate => self.start_date_state.toggle_editing(),
                ProjectField::EndDate => {
                    if self.project.end_date.is_none() {
                        self.project.end_date = Some(self.end_date_state.instant());
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

    fn position(&self) -> usize {
        FIELDS.iter().position(|f| *f == self.current_field).unwrap_or(0)
    }

    pub fn next_field(&mut self) {
        self.current_field = FIELDS[(self.position() + 1) % FIELDS.len()];
    }

    pub fn previous_field(&mut self) {
        self.current_field = FIELDS[(self.position() + FIELDS.len() - 1) % FIELDS.len()];
    }

    /// Changes a choice field in place. Returns false for fields that need editing mode.
    fn cycle_choice(&mut self, forward: bool) -> bool {
        match self.current_field {
            ProjectField::Status => {
                self.project.status = if forward {
                    self.project.status.next()
                } else {
                    self.project.status.previous()
                };
            }
            ProjectField::Type => self.project.kind = self.project.kind.toggle(),
            ProjectField::Billable => self.project.billable = !self.project.billable,
            _ => return false,
        }
        true
    }

    pub fn edit_current_field(&mut self, key: KeyCode) {
        if !self.editing {
            return;
        }

        match self.current_field {
            field if field.is_text() => {
                let text = if field == ProjectField::Name {
                    &mut self.project.name
                } else {
                    &mut self.project.description
                };
                match key {
                    KeyCode::Char(c) => text.push(c),
                    KeyCode::Backspace => {
                        text.pop();
                    }
                    _ => {}
                }
            }
            ProjectField::StartDate => {
                self.start_date_state.handle_input(key);
                self.project.start_date = self.start_date_state.instant();
            }
            ProjectField::EndDate => {
                self.end_date_state.handle_input(key);
                self.project.end_date = Some(self.end_date_state.instant());
            }
            _ => {}
        }
    }
}

impl Default for ProjectWizardState {
    fn default() -> Self {
        Self::new()
    }
}

pub fn render_project_wizard<B: Backend>(f: &mut Frame<B>, area: Rect, state: &mut ProjectWizardState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints(
            [
                Constraint::Length(3),
                Constraint::Min(10),
                Constraint::Length(3),
            ]
            .as_ref(),
        )
        .split(area);

    let title_text = if state.project.is_new() {
        "New Project"
    } else {
        "Edit Project"
    };
    let title = Paragraph::new(title_text)
        .style(Style::default().fg(Color::Cyan))
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(title, chunks[0]);

    render_form(f, state, chunks[1]);

    let help_text = if state.editing {
        if state.current_field.is_date() {
            "Enter - Save field | Left/Right - Switch date part | Esc - Done"
        } else {
            "Enter - Save field | Esc - Done"
        }
    } else {
        "Enter - Edit field | Left/Right - Change choice | X - Clear end date | S - Save project | Esc - Cancel"
    };
    render_footer(f, chunks[2], help_text, state.error.as_deref());
}

fn render_form<B: Backend>(f: &mut Frame<B>, state: &mut ProjectWizardState, area: Rect) {
    let project = &state.project;

    let items: Vec<ListItem> = FIELDS
        .iter()
        .map(|field| {
            let selected = *field == state.current_field;
            let value = match field {
                ProjectField::Name => project.name.clone(),
                ProjectField::Status => format!("< {} >", project.status.label()),
                ProjectField::Type => format!("< {} >", project.kind.label()),
                ProjectField::Billable => (if project.billable { "[x]" } else { "[ ]" }).to_string(),
                ProjectField::StartDate if selected && state.editing => {
                    state.start_date_state.get_display_string()
                }
                ProjectField::StartDate => format_date(project.start_date),
                ProjectField::EndDate if selected && state.editing => {
                    state.end_date_state.get_display_string()
                }
                ProjectField::EndDate => project
                    .end_date
                    .map(format_date)
                    .unwrap_or_else(|| "Not set".to_string()),
                ProjectField::Description => project.description.clone(),
            };

            let content = if selected && state.editing {
                let cursor = if field.is_text() { "|" } else { "" };
                Spans::from(vec![
                    Span::styled(format!("{}: ", field.label()), Style::default().fg(Color::Yellow)),
                    Span::styled(format!("{value}{cursor}"), Style::default().add_modifier(Modifier::BOLD)),
                ])
            } else {
                let style = if selected {
                    Style::default().fg(Color::Yellow)
                } else {
                    Style::default()
                };
                Spans::from(vec![
                    Span::styled(format!("{}: ", field.label()), style),
                    Span::raw(value),
                ])
            };

            ListItem::new(content)
        })
        .collect();

    let form_list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title("Project Details"));

    f.render_widget(form_list, area);
}

pub fn handle_input(state: &mut ProjectWizardState, key: KeyCode) -> Option<ProjectWizardAction> {
    match key {
        KeyCode::Esc => {
            if state.editing {
                state.toggle_editing();
            } else {
                return Some(ProjectWizardAction::Cancel);
            }
        }
        KeyCode::Enter => {
            if state.editing || !state.cycle_choice(true) {
                state.toggle_editing();
            }
        }
        KeyCode::Up if !state.editing => state.previous_field(),
        KeyCode::Down if !state.editing => state.next_field(),
        KeyCode::Left if !state.editing => {
            state.cycle_choice(false);
        }
        KeyCode::Right if !state.editing => {
            state.cycle_choice(true);
        }
        KeyCode::Char('x') if !state.editing && state.current_field == ProjectField::EndDate => {
            state.project.end_date = None;
        }
        KeyCode::Char('s') if !state.editing => {
            return Some(ProjectWizardAction::Save(state.project.clone()));
        }
        _ if state.editing => state.edit_current_field(key),
        _ => {}
    }

    None
}
