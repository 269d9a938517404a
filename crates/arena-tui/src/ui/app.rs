use super::{
    battle::render_battle,
    battle_log_modal::{render_battle_log_modal, BattleLogParams},
    footer::render_footer,
    header::render_header,
    settings_modal::render_settings_modal,
};
use anyhow::Result;
use arena_core::{
    battle::{Arena, Battle},
    cloud::OpenAiClient,
    credential::Credential,
    settings::{Config, Settings, CONFIG_FILE},
    theme::{Element, Theme},
    ArenaError,
};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use rand::{rngs::StdRng, SeedableRng};
use ratatui::{
    prelude::{Backend, Constraint, CrosstermBackend, Direction, Layout, Rect, Terminal},
    widgets::{Block, Borders, Clear},
};
use std::io::Stdout;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::mpsc;

pub const LOG_ENTRIES_PER_PAGE: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppMode {
    Normal,
    Settings,
    EditingModel,
    BattleLog,
}

/// What the header and the battle screen report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArenaStatus {
    Ready,
    MissingCredential,
    Summoning,
    Fighting,
    AuthFailed(String),
    Failed(String),
    Saved,
}

impl ArenaStatus {
    pub fn is_working(&self) -> bool {
        matches!(self, Self::Summoning | Self::Fighting)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SettingsSelection {
    #[default]
    Model,
    ApiKey,
    Theme,
    Save,
}

impl SettingsSelection {
    pub fn next(&self) -> Self {
        match self {
            Self::Model => Self::ApiKey,
            Self::ApiKey => Self::Theme,
            Self::Theme => Self::Save,
            Self::Save => Self::Model, // Loop back to the top
        }
    }

    pub fn previous(&self) -> Self {
        match self {
            Self::Model => Self::Save, // Loop back to the bottom
            Self::ApiKey => Self::Model,
            Self::Theme => Self::ApiKey,
            Self::Save => Self::Theme,
        }
    }
}

type TaskResult = Result<Battle, ArenaError>;

pub struct App {
    should_quit: bool,
    theme: Theme,
    mode: AppMode,
    settings: Settings,
    settings_path: PathBuf,
    credential: Option<Credential>,
    arena: Arena,
    battle: Option<Battle>,
    status: ArenaStatus,
    settings_selection: SettingsSelection,
    edit_buffer: String,
    log_selected: usize,
    tick: usize,
    task_tx: mpsc::UnboundedSender<TaskResult>,
    task_rx: mpsc::UnboundedReceiver<TaskResult>,
}

impl App {
    pub fn new(config: Config, client: OpenAiClient) -> Self {
        let theme = Theme::new(config.settings.theme);
        let arena = Arena::new(Arc::new(client), config.settings.rules.clone());
        let status = if config.credential.is_some() {
            ArenaStatus::Ready
        } else {
            ArenaStatus::MissingCredential
        };
        let (task_tx, task_rx) = mpsc::unbounded_channel();

        Self {
            should_quit: false,
            theme,
            mode: AppMode::Normal,
            settings: config.settings,
            settings_path: PathBuf::from(CONFIG_FILE),
            credential: config.credential,
            arena,
            battle: None,
            status,
            settings_selection: SettingsSelection::default(),
            edit_buffer: String::new(),
            log_selected: 0,
            tick: 0,
            task_tx,
            task_rx,
        }
    }

    pub async fn run(&mut self, terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
        while !self.should_quit {
            self.draw(terminal)?;
            self.handle_events()?;
            self.collect_task_results();
            self.tick = self.tick.wrapping_add(1);
            tokio::task::yield_now().await;
        }
        Ok(())
    }

    fn draw<B: Backend>(&self, terminal: &mut Terminal<B>) -> Result<()> {
        terminal.draw(|frame| {
            let main_layout = Block::new()
                .borders(Borders::NONE)
                .style(self.theme.ratatui_style(Element::Background));

            let area = frame.size();
            frame.render_widget(main_layout, area);

            let app_chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints([
                    Constraint::Length(3),
                    Constraint::Min(0),
                    Constraint::Length(3),
                ])
                .split(area);

            render_header(
                frame,
                app_chunks[0],
                &self.theme,
                &self.status,
                &self.settings,
                self.credential.as_ref(),
            );
            render_battle(
                frame,
                app_chunks[1],
                &self.theme,
                self.battle.as_ref(),
                &self.status,
                self.tick,
            );
            render_footer(
                frame,
                app_chunks[2],
                &self.theme,
                self.mode,
                self.battle.as_ref(),
            );

            match self.mode {
                AppMode::Settings | AppMode::EditingModel => {
                    let modal_area = centered_modal(frame.size(), 0.8, 0.5);
                    frame.render_widget(Clear, modal_area); // clears the background
                    render_settings_modal(
                        frame,
                        modal_area,
                        &self.settings,
                        self.credential.as_ref(),
                        &self.theme,
                        self.settings_selection,
                        self.mode,
                        &self.edit_buffer,
                    );
                }
                AppMode::BattleLog => {
                    if let Some(battle) = &self.battle {
                        let modal_area = centered_modal(frame.size(), 0.9, 0.8);
                        frame.render_widget(Clear, modal_area);
                        render_battle_log_modal(
                            frame,
                            modal_area,
                            BattleLogParams {
                                theme: &self.theme,
                                title: " Battle Log ",
                                entries: &battle.log,
                                selected_index: self.log_selected,
                                current_page: self.log_selected / LOG_ENTRIES_PER_PAGE,
                                entries_per_page: LOG_ENTRIES_PER_PAGE,
                            },
                        );
                    }
                }
                AppMode::Normal => {}
            }
        })?;
        Ok(())
    }

    fn handle_events(&mut self) -> Result<()> {
        if event::poll(std::time::Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    self.handle_key(key);
                }
            }
        }
        Ok(())
    }

    fn handle_key(&mut self, key: KeyEvent) {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return;
        }

        match self.mode {
            AppMode::Normal => match key.code {
                KeyCode::Char('q') => self.should_quit = true,
                KeyCode::Char('s') => {
                    self.mode = AppMode::Settings;
                    self.settings_selection = SettingsSelection::default();
                }
                // Saved only from the settings modal.
                KeyCode::Char('t') => {
                    self.theme.toggle();
                    self.settings.theme = self.theme.variant();
                }
                KeyCode::Char('l') => {
                    if let Some(battle) = &self.battle {
                        self.log_selected = battle.log.len().saturating_sub(1);
                        self.mode = AppMode::BattleLog;
                    }
                }
                KeyCode::Enter => self.advance(),
                _ => {}
            },
            AppMode::Settings => match key.code {
                KeyCode::Esc => self.leave_settings(),
                KeyCode::Char('s') => {
                    self.save_settings();
                    self.leave_settings();
                }
                KeyCode::Up => self.settings_selection = self.settings_selection.previous(),
                KeyCode::Down => self.settings_selection = self.settings_selection.next(),
                KeyCode::Left | KeyCode::Right => {
                    if self.settings_selection == SettingsSelection::Theme {
                        self.theme.toggle();
                        self.settings.theme = self.theme.variant();
                    }
                }
                KeyCode::Enter => match self.settings_selection {
                    SettingsSelection::Model => {
                        self.edit_buffer = self.settings.model.clone();
                        self.mode = AppMode::EditingModel;
                    }
                    SettingsSelection::Theme => {
                        self.theme.toggle();
                        self.settings.theme = self.theme.variant();
                    }
                    SettingsSelection::Save => {
                        self.save_settings();
                        self.leave_settings();
                    }
                    // read-only: the key lives in the env file
                    SettingsSelection::ApiKey => {}
                },
                _ => {}
            },
            AppMode::EditingModel => match key.code {
                KeyCode::Esc => {
                    self.edit_buffer.clear();
                    self.mode = AppMode::Settings;
                }
                KeyCode::Enter => {
                    let model = self.edit_buffer.trim();
                    if !model.is_empty() {
                        self.settings.model = model.to_string();
                    }
                    self.edit_buffer.clear();
                    self.mode = AppMode::Settings;
                }
                KeyCode::Backspace => {
                    self.edit_buffer.pop();
                }
                KeyCode::Char(c) => self.edit_buffer.push(c),
                _ => {}
            },
            AppMode::BattleLog => {
                let len = self.battle.as_ref().map_or(0, |b| b.log.len());
                match key.code {
                    KeyCode::Esc | KeyCode::Char('l') | KeyCode::Char('q') => {
                        self.mode = AppMode::Normal
                    }
                    KeyCode::Up => self.log_selected = self.log_selected.saturating_sub(1),
                    KeyCode::Down => {
                        if self.log_selected + 1 < len {
                            self.log_selected += 1;
                        }
                    }
                    KeyCode::Left => {
                        self.log_selected = self.log_selected.saturating_sub(LOG_ENTRIES_PER_PAGE)
                    }
                    KeyCode::Right => {
                        self.log_selected =
                            (self.log_selected + LOG_ENTRIES_PER_PAGE).min(len.saturating_sub(1))
                    }
                    _ => {}
                }
            }
        }
    }

    /// Enter on the main screen: start a battle or play the next turn.
    fn advance(&mut self) {
        if self.status.is_working() {
            return;
        }

        let arena = self.arena.clone();
        let tx = self.task_tx.clone();
        match self.battle.clone() {
            Some(mut battle) if !battle.is_over() => {
                self.status = ArenaStatus::Fighting;
                tokio::spawn(async move {
                    let mut rng = StdRng::from_entropy();
                    let outcome = arena.play_turn(&mut battle, &mut rng).await;
                    let _ = tx.send(outcome.map(|()| battle));
                });
            }
            current => {
                self.status = ArenaStatus::Summoning;
                tokio::spawn(async move {
                    let mut rng = StdRng::from_entropy();
                    let result = arena.start_battle(current.as_ref(), &mut rng).await;
                    let _ = tx.send(result);
                });
            }
        }
    }

    fn collect_task_results(&mut self) {
        while let Ok(result) = self.task_rx.try_recv() {
            match result {
                Ok(battle) => {
                    // The log may have been opened on the previous battle.
                    self.log_selected = self.log_selected.min(battle.log.len().saturating_sub(1));
                    self.battle = Some(battle);
                    self.status = ArenaStatus::Ready;
                }
                Err(e) if e.is_authentication() => {
                    tracing::warn!(error = %e, "authentication failed");
                    self.status = ArenaStatus::AuthFailed(e.to_string());
                }
                Err(e) => {
                    tracing::error!(error = %e, "battle action failed");
                    self.status = ArenaStatus::Failed(e.to_string());
                }
            }
        }
    }

    fn save_settings(&mut self) {
        match self.settings.save_to(&self.settings_path) {
            Ok(()) => self.status = ArenaStatus::Saved,
            Err(e) => {
                tracing::error!(error = %e, "could not save settings");
                self.status = ArenaStatus::Failed(e.to_string());
            }
        }
    }

    /// Picks up a changed model for the next API call.
    fn leave_settings(&mut self) {
        self.mode = AppMode::Normal;
        match OpenAiClient::new(&self.settings, self.credential.clone()) {
            Ok(client) => {
                self.arena = Arena::new(Arc::new(client), self.settings.rules.clone());
            }
            Err(e) => {
                tracing::error!(error = %e, "could not rebuild API client");
                self.status = ArenaStatus::Failed(e.to_string());
            }
        }
    }
}

/// Centered modal covering the given share of the terminal, clamped to a
/// sensible size.
fn centered_modal(size: Rect, width_share: f32, height_share: f32) -> Rect {
    let modal_width = (((size.width as f32) * width_share).round() as u16)
        .clamp(30, 100)
        .min(size.width);
    let modal_height = (((size.height as f32) * height_share).round() as u16)
        .clamp(8, 30)
        .min(size.height);
    Rect::new(
        (size.width.saturating_sub(modal_width)) / 2,
        (size.height.saturating_sub(modal_height)) / 2,
        modal_width,
        modal_height,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use arena_core::hero::Hero;
    use arena_core::monster::Monster;
    use ratatui::backend::TestBackend;

    fn app() -> App {
        let settings = Settings::default();
        let client = OpenAiClient::new(&settings, None).unwrap();
        let config = Config {
            settings,
            credential: None,
            env_file: PathBuf::from(".env"),
        };
        App::new(config, client)
    }

    fn press(app: &mut App, code: KeyCode) {
        app.handle_key(KeyEvent::new(code, KeyModifiers::NONE));
    }

    #[test]
    fn test_settings_selection_wraps() {
        let selection = SettingsSelection::default();
        assert_eq!(selection.previous(), SettingsSelection::Save);
        assert_eq!(
            selection.next().next().next().next(),
            SettingsSelection::Model
        );
    }

    #[test]
    fn test_missing_credential_is_reported() {
        let app = app();
        assert_eq!(app.status, ArenaStatus::MissingCredential);
    }

    #[test]
    fn test_editing_model() {
        let mut app = app();
        press(&mut app, KeyCode::Char('s'));
        assert_eq!(app.mode, AppMode::Settings);

        press(&mut app, KeyCode::Enter);
        assert_eq!(app.mode, AppMode::EditingModel);
        for _ in 0.."gpt-4o".len() {
            press(&mut app, KeyCode::Backspace);
        }
        for c in "gpt-4o-mini".chars() {
            press(&mut app, KeyCode::Char(c));
        }
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.mode, AppMode::Settings);
        assert_eq!(app.settings.model, "gpt-4o-mini");

        press(&mut app, KeyCode::Esc);
        assert_eq!(app.mode, AppMode::Normal);
    }

    #[test]
    fn test_blank_model_is_ignored() {
        let mut app = app();
        press(&mut app, KeyCode::Char('s'));
        press(&mut app, KeyCode::Enter);
        app.edit_buffer.clear();
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.settings.model, "gpt-4o");
    }

    #[test]
    fn test_battle_log_navigation() {
        let mut app = app();
        press(&mut app, KeyCode::Char('l'));
        assert_eq!(app.mode, AppMode::Normal, "no log without a battle");

        let mut battle = Battle::new(Hero::default(), Monster::fallback(20), "intro".into());
        battle.log.extend((1..=10).map(|i| format!("turn {i}")));
        app.battle = Some(battle);

        press(&mut app, KeyCode::Char('l'));
        assert_eq!(app.mode, AppMode::BattleLog);
        assert_eq!(app.log_selected, 10);

        press(&mut app, KeyCode::Down);
        assert_eq!(app.log_selected, 10);
        press(&mut app, KeyCode::Left);
        assert_eq!(app.log_selected, 2);
        press(&mut app, KeyCode::Up);
        press(&mut app, KeyCode::Up);
        press(&mut app, KeyCode::Up);
        assert_eq!(app.log_selected, 0);
        press(&mut app, KeyCode::Esc);
        assert_eq!(app.mode, AppMode::Normal);
    }

    #[test]
    fn test_task_results_update_state() {
        let mut app = app();
        let battle = Battle::new(Hero::default(), Monster::fallback(20), "intro".into());

        app.task_tx.send(Ok(battle.clone())).unwrap();
        app.collect_task_results();
        assert_eq!(app.battle.as_ref(), Some(&battle));
        assert_eq!(app.status, ArenaStatus::Ready);

        app.task_tx
            .send(Err(ArenaError::Authentication("no key".into())))
            .unwrap();
        app.collect_task_results();
        assert!(matches!(app.status, ArenaStatus::AuthFailed(_)));
        assert_eq!(app.battle.as_ref(), Some(&battle));
    }

    #[test]
    fn test_new_battle_while_log_open_does_not_panic() {
        let mut app = app();
        let mut finished = Battle::new(Hero::default(), Monster::fallback(20), "intro".into());
        finished.log.extend((1..=10).map(|i| format!("turn {i}")));
        finished.phase = arena_core::battle::Phase::Victory;
        app.battle = Some(finished);
        app.status = ArenaStatus::Summoning;

        press(&mut app, KeyCode::Char('l'));
        assert_eq!(app.mode, AppMode::BattleLog);
        assert_eq!(app.log_selected, 10);

        let fresh = Battle::new(Hero::default(), Monster::fallback(30), "new intro".into());
        app.task_tx.send(Ok(fresh)).unwrap();
        app.collect_task_results();
        assert_eq!(app.log_selected, 0);

        let mut terminal = Terminal::new(TestBackend::new(80, 30)).unwrap();
        app.draw(&mut terminal).unwrap();
    }

    #[test]
    fn test_theme_key_does_not_write_settings() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app();
        app.settings_path = dir.path().join("config.toml");
        let variant = app.settings.theme;

        press(&mut app, KeyCode::Char('t'));
        assert_ne!(app.settings.theme, variant);
        assert!(!app.settings_path.exists());
        assert_eq!(app.status, ArenaStatus::MissingCredential);

        press(&mut app, KeyCode::Char('s'));
        press(&mut app, KeyCode::Char('s'));
        assert!(app.settings_path.exists());
        assert_eq!(app.status, ArenaStatus::Saved);
    }

    #[tokio::test]
    async fn test_enter_ignored_while_task_running() {
        let mut app = app();
        app.status = ArenaStatus::Fighting;

        press(&mut app, KeyCode::Enter);
        assert_eq!(app.status, ArenaStatus::Fighting);
        assert!(app.battle.is_none());

        tokio::task::yield_now().await;
        assert!(app.task_rx.try_recv().is_err());
    }

    #[test]
    fn test_centered_modal_fits_terminal() {
        let area = centered_modal(Rect::new(0, 0, 20, 6), 0.8, 0.5);
        assert_eq!(area.width, 20);
        assert_eq!(area.height, 6);

        let area = centered_modal(Rect::new(0, 0, 100, 40), 0.8, 0.5);
        assert_eq!(area, Rect::new(10, 10, 80, 20));
    }
}
