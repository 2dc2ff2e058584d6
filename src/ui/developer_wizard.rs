use crossterm::event::KeyCode;
use tui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Span, Spans},
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame,
};

use crate::models::Developer;
use crate::ui::components::render_footer;

#[derive(Debug, PartialEq)]
pub enum DeveloperWizardAction {
    Cancel,
    Save(Developer),
}

#[derive(Clone, PartialEq, Copy, Debug)]
pub enum DeveloperField {
    FirstName,
    LastName,
    EmployeeId,
    Position,
    Skills,
}

const FIELDS: [DeveloperField; 5] = [
    DeveloperField::FirstName,
    DeveloperField::LastName,
    DeveloperField::EmployeeId,
    DeveloperField::Position,
    DeveloperField::Skills,
];

impl DeveloperField {
    fn label(self) -> &'static str {
        match self {
            DeveloperField::FirstName => "First name",
            DeveloperField::LastName => "Last name",
            DeveloperField::EmployeeId => "Employee ID",
            DeveloperField::Position => "Position",
            DeveloperField::Skills => "New skill",
        }
    }
}

pub struct DeveloperWizardState {
    pub developer: Developer,
    pub current_field: DeveloperField,
    pub editing: bool,
    /// Skill being typed, added to the list on Enter.
    pub new_skill: String,
    pub selected_skill: usize,
    pub error: Option<String>,
}

impl DeveloperWizardState {
    pub fn new() -> Self {
        Self::from_existing(Developer::default())
    }

    pub fn from_existing(developer: Developer) -> Self {
        Self {
            developer,
            current_field: DeveloperField::FirstName,
            editing: false,
            new_skill: String::new(),
            selected_skill: 0,
            error: None,
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

    fn current_text(&mut self) -> &mut String {
        match self.current_field {
            DeveloperField::FirstName => &mut self.developer.first_name,
            DeveloperField::LastName => &mut self.developer.last_name,
            DeveloperField::EmployeeId => &mut self.developer.employee_id,
            DeveloperField::Position => &mut self.developer.position,
            DeveloperField::Skills => &mut self.new_skill,
        }
    }

    pub fn add_pending_skill(&mut self) {
        let skill = std::mem::take(&mut self.new_skill);
        self.developer.add_skill(&skill);
    }

    pub fn remove_selected_skill(&mut self) {
        let Some(skill) = self.developer.technical_skills.get(self.selected_skill).cloned() else {
            return;
        };
        self.developer.remove_skill(&skill);
        let len = self.developer.technical_skills.len();
        if self.selected_skill >= len {
            self.selected_skill = len.saturating_sub(1);
        }
    }

    fn select_skill(&mut self, forward: bool) {
        let len = self.developer.technical_skills.len();
        if len == 0 {
            return;
        }
        self.selected_skill = if forward {
            (self.selected_skill + 1) % len
        } else {
            (self.selected_skill + len - 1) % len
        };
    }
}

impl Default for DeveloperWizardState {
    fn default() -> Self {
        Self::new()
    }
}

pub fn render_developer_wizard<B: Backend>(f: &mut Frame<B>, area: Rect, state: &mut DeveloperWizardState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints(
            [
                Constraint::Length(3),
                Constraint::Length(7),
                Constraint::Min(3),
                Constraint::Length(3),
            ]
            .as_ref(),
        )
        .split(area);

    let title_text = if state.developer.is_new() {
        "New Developer"
    } else {
        "Edit Developer"
    };
    let title = Paragraph::new(title_text)
        .style(Style::default().fg(Color::Cyan))
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(title, chunks[0]);

    let items: Vec<ListItem> = FIELDS
        .iter()
        .map(|field| {
            let value = match field {
                DeveloperField::FirstName => &state.developer.first_name,
                DeveloperField::LastName => &state.developer.last_name,
                DeveloperField::EmployeeId => &state.developer.employee_id,
                DeveloperField::Position => &state.developer.position,
                DeveloperField::Skills => &state.new_skill,
            };
            let selected = *field == state.current_field;
            let label_style = if selected {
                Style::default().fg(Color::Yellow)
            } else {
                Style::default()
            };
            let value = if selected && state.editing {
                Span::styled(format!("{value}|"), Style::default().add_modifier(Modifier::BOLD))
            } else {
                Span::raw(value.clone())
            };
            ListItem::new(Spans::from(vec![
                Span::styled(format!("{}: ", field.label()), label_style),
                value,
            ]))
        })
        .collect();

    let form = List::new(items).block(Block::default().borders(Borders::ALL).title("Developer Details"));
    f.render_widget(form, chunks[1]);

    let on_skills = state.current_field == DeveloperField::Skills && !state.editing;
    let chips: Vec<Span> = state
        .developer
        .technical_skills
        .iter()
        .enumerate()
        .map(|(i, skill)| {
            let style = if on_skills && i == state.selected_skill {
                Style::default().bg(Color::Blue).fg(Color::White)
            } else {
                Style::default().fg(Color::Cyan)
            };
            Span::styled(format!(" {skill} "), style)
        })
        .collect();
    let skills = Paragraph::new(Spans::from(chips))
        .block(Block::default().borders(Borders::ALL).title("Technical skills"));
    f.render_widget(skills, chunks[2]);

    let help_text = if state.editing && state.current_field == DeveloperField::Skills {
        "Enter - Add skill | Esc - Done"
    } else if state.editing {
        "Enter/Esc - Done"
    } else if state.current_field == DeveloperField::Skills {
        "Enter - Type a skill | Left/Right - Pick skill | X - Remove skill | S - Save | Esc - Cancel"
    } else {
        "Enter - Edit field | Up/Down - Navigate fields | S - Save developer | Esc - Cancel"
    };
    render_footer(f, chunks[3], help_text, state.error.as_deref());
}

pub fn handle_input(state: &mut DeveloperWizardState, key: KeyCode) -> Option<DeveloperWizardAction> {
    if state.editing {
        match key {
            KeyCode::Esc => {
                state.editing = false;
                state.new_skill.clear();
            }
            KeyCode::Enter if state.current_field == DeveloperField::Skills => state.add_pending_skill(),
            KeyCode::Enter => state.editing = false,
            KeyCode::Char(c) => state.current_text().push(c),
            KeyCode::Backspace => {
                state.current_text().pop();
            }
            _ => {}
        }
        return None;
    }

    match key {
        KeyCode::Esc => return Some(DeveloperWizardAction::Cancel),
        KeyCode::Enter => state.editing = true,
        KeyCode::Up => state.previous_field(),
        KeyCode::Down => state.next_field(),
        KeyCode::Char('s') => return Some(DeveloperWizardAction::Save(state.developer.clone())),
        KeyCode::Left if state.current_field == DeveloperField::Skills => state.select_skill(false),
        KeyCode::Right if state.current_field == DeveloperField::Skills => state.select_skill(true),
        KeyCode::Char('x') | KeyCode::Delete if state.current_field == DeveloperField::Skills => {
            state.remove_selected_skill()
        }
        _ => {}
    }
    None
}
