pub mod assignment_wizard;
pub mod board;
pub mod components;
pub mod dashboard;
pub mod developer_wizard;
pub mod developers;
pub mod project_wizard;
pub mod projects;

use clap::ValueEnum;
use tui::{
    backend::Backend,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::Spans,
    widgets::{Block, Borders, Tabs},
    Frame,
};

/// Top-level sections reachable from the tab bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Section {
    Dashboard,
    Projects,
    Developers,
    Assignments,
}

impl Section {
    pub const ALL: [Section; 4] = [
        Section::Dashboard,
        Section::Projects,
        Section::Developers,
        Section::Assignments,
    ];

    pub fn title(self) -> &'static str {
        match self {
            Section::Dashboard => "Dashboard",
            Section::Projects => "Projects",
            Section::Developers => "Developers",
            Section::Assignments => "Assignments",
        }
    }

    fn index(self) -> usize {
        Self::ALL.iter().position(|s| *s == self).unwrap_or(0)
    }

    pub fn next(self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    /// Number keys 1 to 4 jump to a section.
    pub fn from_digit(c: char) -> Option<Self> {
        let n = c.to_digit(10)? as usize;
        n.checked_sub(1).and_then(|i| Self::ALL.get(i).copied())
    }
}

pub fn render_tabs<B: Backend>(frame: &mut Frame<B>, area: Rect, current: Section) {
    let titles: Vec<Spans> = Section::ALL
        .iter()
        .enumerate()
        .map(|(i, s)| Spans::from(format!("{} {}", i + 1, s.title())))
        .collect();

    let tabs = Tabs::new(titles)
        .block(
            Block::default()
                .title(format!("PMO+ - {}", current.title()))
                .borders(Borders::ALL),
        )
        .select(current.index())
        .highlight_style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        );

    frame.render_widget(tabs, area);
}
