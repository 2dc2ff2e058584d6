//! Screen controller: routes key presses to the current screen and runs
//! the store calls its actions ask for.

use anyhow::Result;
use crossterm::event::KeyCode;
use tracing::{error, info, warn};
use tui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout},
    widgets::Clear,
    Frame,
};

use crate::db::Database;
use crate::planning::board::{apply_reassignment, plan_reassignment, BoardEvent, DropResult};
use crate::ui::{
    assignment_wizard::{
        handle_input as handle_assignment_wizard_input, render_assignment_wizard, AssignmentWizardAction,
        AssignmentWizardState,
    },
    board::{handle_input as handle_board_input, load_assignments, load_board, render_board, BoardAction, BoardState},
    dashboard::{handle_input as handle_dashboard_input, load_dashboard, render_dashboard, DashboardAction, DashboardState},
    developer_wizard::{
        handle_input as handle_developer_wizard_input, render_developer_wizard, DeveloperWizardAction,
        DeveloperWizardState,
    },
    developers::{handle_input as handle_developers_input, load_developers, render_developers, DeveloperAction, DevelopersState},
    project_wizard::{handle_input as handle_project_wizard_input, render_project_wizard, ProjectWizardAction, ProjectWizardState},
    projects::{handle_input as handle_projects_input, load_projects, render_projects, ProjectAction, ProjectsState},
    components::centered_rect,
    render_tabs, Section,
};

// Represents the current screen in the app
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppScreen {
    Dashboard,
    Projects,
    ProjectWizard,
    Developers,
    DeveloperWizard,
    Board,
    AssignmentWizard,
}

impl AppScreen {
    /// The tab a screen belongs to; dialogs stay under the list that opened them.
    pub fn section(self) -> Section {
        match self {
            AppScreen::Dashboard => Section::Dashboard,
            AppScreen::Projects | AppScreen::ProjectWizard => Section::Projects,
            AppScreen::Developers | AppScreen::DeveloperWizard => Section::Developers,
            AppScreen::Board | AppScreen::AssignmentWizard => Section::Assignments,
        }
    }

    fn is_dialog(self) -> bool {
        matches!(
            self,
            AppScreen::ProjectWizard | AppScreen::DeveloperWizard | AppScreen::AssignmentWizard
        )
    }
}

// Main application state
pub struct App {
    db: Database,
    screen: AppScreen,
    dashboard_state: Option<DashboardState>,
    projects_state: Option<ProjectsState>,
    project_wizard_state: Option<ProjectWizardState>,
    developers_state: Option<DevelopersState>,
    developer_wizard_state: Option<DeveloperWizardState>,
    board_state: Option<BoardState>,
    assignment_wizard_state: Option<AssignmentWizardState>,
}

impl App {
    pub fn new(db: Database) -> Self {
        Self {
            db,
            screen: AppScreen::Dashboard,
            dashboard_state: None,
            projects_state: None,
            project_wizard_state: None,
            developers_state: None,
            developer_wizard_state: None,
            board_state: None,
            assignment_wizard_state: None,
        }
    }

    pub fn screen(&self) -> AppScreen {
        self.screen
    }

    pub fn dashboard_state(&self) -> Option<&DashboardState> {
        self.dashboard_state.as_ref()
    }

    pub fn projects_state(&self) -> Option<&ProjectsState> {
        self.projects_state.as_ref()
    }

    pub fn project_wizard_state(&self) -> Option<&ProjectWizardState> {
        self.project_wizard_state.as_ref()
    }

    pub fn developers_state(&self) -> Option<&DevelopersState> {
        self.developers_state.as_ref()
    }

    pub fn developer_wizard_state(&self) -> Option<&DeveloperWizardState> {
        self.developer_wizard_state.as_ref()
    }

    pub fn board_state(&self) -> Option<&BoardState> {
        self.board_state.as_ref()
    }

    pub fn assignment_wizard_state(&self) -> Option<&AssignmentWizardState> {
        self.assignment_wizard_state.as_ref()
    }

    /// Switches to a section and fetches its data.
    pub async fn open(&mut self, section: Section) {
        info!(section = section.title(), "opening section");
        match section {
            Section::Dashboard => {
                self.dashboard_state = Some(load_dashboard(&self.db).await);
                self.screen = AppScreen::Dashboard;
            }
            Section::Projects => self.reload_projects().await,
            Section::Developers => self.reload_developers().await,
            Section::Assignments => {
                self.board_state = Some(load_board(&self.db).await);
                self.screen = AppScreen::Board;
            }
        }
    }

    async fn reload_projects(&mut self) {
        self.projects_state = Some(ProjectsState::new(load_projects(&self.db).await));
        self.screen = AppScreen::Projects;
    }

    async fn reload_developers(&mut self) {
        self.developers_state = Some(DevelopersState::new(load_developers(&self.db).await));
        self.screen = AppScreen::Developers;
    }

    /// Handles one key press. Returns `true` when the user asked to quit.
    pub async fn handle_key(&mut self, key: KeyCode) -> Result<bool> {
        let dragging = self.board_state.as_ref().is_some_and(|b| b.is_dragging());
        let navigable = !self.screen.is_dialog() && !(self.screen == AppScreen::Board && dragging);

        if navigable {
            match key {
                KeyCode::Char('q') => return Ok(true),
                KeyCode::Tab => {
                    let next = self.screen.section().next();
                    self.open(next).await;
                    return Ok(false);
                }
                KeyCode::Char(c) => {
                    if let Some(section) = Section::from_digit(c) {
                        self.open(section).await;
                        return Ok(false);
                    }
                }
                _ => {}
            }
        }

        match self.screen {
            AppScreen::Dashboard => self.handle_dashboard(key).await,
            AppScreen::Projects => self.handle_projects(key).await,
            AppScreen::ProjectWizard => self.handle_project_wizard(key).await,
            AppScreen::Developers => self.handle_developers(key).await,
            AppScreen::DeveloperWizard => self.handle_developer_wizard(key).await,
            AppScreen::Board => self.handle_board(key).await,
            AppScreen::AssignmentWizard => self.handle_assignment_wizard(key).await,
        }
        Ok(false)
    }

    async fn handle_dashboard(&mut self, key: KeyCode) {
        if let Some(DashboardAction::Refresh) = handle_dashboard_input(key) {
            self.open(Section::Dashboard).await;
        }
    }

    async fn handle_projects(&mut self, key: KeyCode) {
        let Some(state) = &mut self.projects_state else {
            return;
        };

        match handle_projects_input(state, key) {
            Some(ProjectAction::NewProject) => {
                self.project_wizard_state = Some(ProjectWizardState::new());
                self.screen = AppScreen::ProjectWizard;
            }
            Some(ProjectAction::EditProject(project_id)) => {
                if let Some(project) = state.projects().iter().find(|p| p.id == project_id) {
                    self.project_wizard_state = Some(ProjectWizardState::from_existing(project.clone()));
                    self.screen = AppScreen::ProjectWizard;
                }
            }
            Some(ProjectAction::DeleteProject(project_id)) => match self.db.delete_project(&project_id).await {
                Ok(()) => self.reload_projects().await,
                Err(err) => {
                    error!(project_id = %project_id, error = %err, "failed to delete project");
                    state.error = Some(format!("Could not delete project: {err}"));
                }
            },
            None => {}
        }
    }

    async fn handle_project_wizard(&mut self, key: KeyCode) {
        let Some(state) = &mut self.project_wizard_state else {
            return;
        };

        match handle_project_wizard_input(state, key) {
            Some(ProjectWizardAction::Cancel) => {
                self.project_wizard_state = None;
                self.screen = AppScreen::Projects;
            }
            Some(ProjectWizardAction::Save(project)) => {
                let project = match project.validate() {
                    Ok(project) => project,
                    Err(err) => {
                        error!(error = %err, "project rejected");
                        state.error = Some(err.to_string());
                        return;
                    }
                };

                match self.db.save(&project).await {
                    Ok(id) => {
                        info!(project_id = %id, "project saved");
                        self.project_wizard_state = None;
                        self.reload_projects().await;
                    }
                    Err(err) => {
                        error!(error = %err, "failed to save project");
                        state.error = Some(format!("Could not save project: {err}"));
                    }
                }
            }
            None => {}
        }
    }

    async fn handle_developers(&mut self, key: KeyCode) {
        let Some(state) = &mut self.developers_state else {
            return;
        };

        match handle_developers_input(state, key) {
            Some(DeveloperAction::NewDeveloper) => {
                self.developer_wizard_state = Some(DeveloperWizardState::new());
                self.screen = AppScreen::DeveloperWizard;
            }
            Some(DeveloperAction::EditDeveloper(developer_id)) => {
                if let Some(developer) = state.developers().iter().find(|d| d.id == developer_id) {
                    self.developer_wizard_state = Some(DeveloperWizardState::from_existing(developer.clone()));
                    self.screen = AppScreen::DeveloperWizard;
                }
            }
            Some(DeveloperAction::DeleteDeveloper(developer_id)) => {
                match self.db.delete_developer(&developer_id).await {
                    Ok(()) => self.reload_developers().await,
                    Err(err) => {
                        error!(developer_id = %developer_id, error = %err, "failed to delete developer");
                        state.error = Some(format!("Could not delete developer: {err}"));
                    }
                }
            }
            None => {}
        }
    }

    async fn handle_developer_wizard(&mut self, key: KeyCode) {
        let Some(state) = &mut self.developer_wizard_state else {
            return;
        };

        match handle_developer_wizard_input(state, key) {
            Some(DeveloperWizardAction::Cancel) => {
                self.developer_wizard_state = None;
                self.screen = AppScreen::Developers;
            }
            Some(DeveloperWizardAction::Save(developer)) => match self.db.save(&developer).await {
                Ok(id) => {
                    info!(developer_id = %id, "developer saved");
                    self.developer_wizard_state = None;
                    self.reload_developers().await;
                }
                Err(err) => {
                    error!(error = %err, "failed to save developer");
                    state.error = Some(format!("Could not save developer: {err}"));
                }
            },
            None => {}
        }
    }

    async fn handle_board(&mut self, key: KeyCode) {
        let Some(state) = &mut self.board_state else {
            return;
        };

        match handle_board_input(state, key) {
            Some(BoardAction::NewAssignment) => {
                self.assignment_wizard_state =
                    Some(AssignmentWizardState::new(&state.developers, &state.projects));
                self.screen = AppScreen::AssignmentWizard;
            }
            Some(BoardAction::EditAssignment(assignment_id)) => {
                if let Some(assignment) = state.assignments.iter().find(|a| a.id == assignment_id) {
                    self.assignment_wizard_state = Some(AssignmentWizardState::from_existing(
                        assignment.clone(),
                        &state.developers,
                        &state.projects,
                    ));
                    self.screen = AppScreen::AssignmentWizard;
                }
            }
            Some(BoardAction::DeleteAssignment(assignment_id)) => {
                match self.db.delete_assignment(&assignment_id).await {
                    Ok(()) => {
                        state.error = None;
                        let remaining = state
                            .assignments
                            .iter()
                            .filter(|a| a.id != assignment_id)
                            .cloned()
                            .collect();
                        state.replace_assignments(remaining);
                        if let Some(assignments) = load_assignments(&self.db).await {
                            state.replace_assignments(assignments);
                        }
                    }
                    Err(err) => {
                        error!(assignment_id = %assignment_id, error = %err, "failed to delete assignment");
                        state.error = Some(format!("Could not delete assignment: {err}"));
                    }
                }
            }
            Some(BoardAction::Drop(drop)) => self.move_assignment(drop).await,
            None => {}
        }
    }

    /// Persists a card drop. The board only changes once the store confirmed the write.
    async fn move_assignment(&mut self, drop: DropResult) {
        let Some(state) = &mut self.board_state else {
            return;
        };
        let Some(event) = BoardEvent::from_drop(drop) else {
            return;
        };

        let plan = match plan_reassignment(&state.projects, &state.assignments, &event) {
            Ok(Some(plan)) => plan,
            Ok(None) => return,
            Err(err) => {
                warn!(error = %err, "ignoring board move");
                state.error = Some(err.to_string());
                return;
            }
        };

        if let Err(err) = self
            .db
            .reassign(&plan.assignment_id, &plan.target_project_id)
            .await
        {
            error!(
                assignment_id = %plan.assignment_id,
                project_id = %plan.target_project_id,
                error = %err,
                "failed to reassign assignment"
            );
            state.error = Some(format!("Could not move assignment: {err}"));
            return;
        }

        state.error = None;
        apply_reassignment(&mut state.assignments, &plan);
        if let Some(assignments) = load_assignments(&self.db).await {
            state.replace_assignments(assignments);
        }
    }

    async fn handle_assignment_wizard(&mut self, key: KeyCode) {
        let Some(state) = &mut self.assignment_wizard_state else {
            return;
        };

        match handle_assignment_wizard_input(state, key) {
            Some(AssignmentWizardAction::Cancel) => {
                self.assignment_wizard_state = None;
                self.screen = AppScreen::Board;
            }
            Some(AssignmentWizardAction::Save(assignment)) => match self.db.save(&assignment).await {
                Ok(id) => {
                    info!(assignment_id = %id, "assignment saved");
                    self.assignment_wizard_state = None;
                    self.open(Section::Assignments).await;
                }
                Err(err) => {
                    error!(error = %err, "failed to save assignment");
                    state.error = Some(format!("Could not save assignment: {err}"));
                }
            },
            None => {}
        }
    }

    pub fn render<B: Backend>(&mut self, f: &mut Frame<B>) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Min(1)].as_ref())
            .split(f.size());

        render_tabs(f, chunks[0], self.screen.section());
        let body = chunks[1];

        match self.screen {
            AppScreen::Dashboard => {
                if let Some(state) = &self.dashboard_state {
                    render_dashboard(f, body, state);
                }
            }
            AppScreen::Projects => {
                if let Some(state) = &mut self.projects_state {
                    render_projects(f, body, state);
                }
            }
            AppScreen::ProjectWizard => {
                if let Some(state) = &mut self.projects_state {
                    render_projects(f, body, state);
                }
                if let Some(state) = &mut self.project_wizard_state {
                    let dialog = centered_rect(80, 90, body);
                    f.render_widget(Clear, dialog);
                    render_project_wizard(f, dialog, state);
                }
            }
            AppScreen::Developers => {
                if let Some(state) = &mut self.developers_state {
                    render_developers(f, body, state);
                }
            }
            AppScreen::DeveloperWizard => {
                if let Some(state) = &mut self.developers_state {
                    render_developers(f, body, state);
                }
                if let Some(state) = &mut self.developer_wizard_state {
                    let dialog = centered_rect(80, 90, body);
                    f.render_widget(Clear, dialog);
                    render_developer_wizard(f, dialog, state);
                }
            }
            AppScreen::Board => {
                if let Some(state) = &mut self.board_state {
                    render_board(f, body, state);
                }
            }
            AppScreen::AssignmentWizard => {
                if let Some(state) = &mut self.board_state {
                    render_board(f, body, state);
                }
                if let Some(state) = &mut self.assignment_wizard_state {
                    let dialog = centered_rect(80, 90, body);
                    f.render_widget(Clear, dialog);
                    render_assignment_wizard(f, dialog, state);
                }
            }
        }
    }
}
