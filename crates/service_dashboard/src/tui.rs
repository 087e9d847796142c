//! Terminal runtime: owns the terminal, the background tasks and the
//! [`AppState`], and executes the [`Command`]s the state produces.

use std::io::{self, Stdout};
use std::sync::Arc;
use std::time::Duration;

use adapter_api::client::{ApiClient, CsrfSource};
use adapter_api::feed::{spawn_feed, FeedUpdate};
use adapter_api::resources::search::SearchBackend;
use adapter_api::search_driver::{spawn_search, SearchHandle, SearchOptions};
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use infra_config::{DashboardConfig, UiState, UiStateStore};
use ratatui::prelude::*;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::app::{AppState, Command};
use crate::error::DashboardError;
use crate::event::AppEvent;
use crate::screens;

/// Build the API client described by the configuration
pub fn build_client(config: &DashboardConfig) -> Result<ApiClient, DashboardError> {
    let csrf = match &config.csrf_token {
        Some(token) => CsrfSource::Static(token.clone()),
        None => CsrfSource::default(),
    };
    Ok(ApiClient::builder(config.api_base_url.clone())
        .csrf(csrf)
        .timeout(config.request_timeout())
        .build()?)
}

/// Start one polling feed per resource
pub fn spawn_feeds(
    client: &Arc<ApiClient>,
    config: &DashboardConfig,
    tx: &UnboundedSender<AppEvent>,
) -> Vec<JoinHandle<()>> {
    let poll = config.poll_interval();

    macro_rules! feed {
        ($name:literal, $period:expr, $variant:path, |$c:ident| $call:expr) => {{
            let client = Arc::clone(client);
            spawn_feed(
                $name,
                $period,
                move || {
                    let $c = Arc::clone(&client);
                    async move { $call.await }
                },
                $variant,
                tx.clone(),
            )
        }};
    }

    vec![
        feed!("gates", config.gate_poll_interval(), AppEvent::Gates, |c| c.roe().decision_gates()),
        feed!("targets", poll, AppEvent::Targets, |c| c.targeting().list()),
        feed!("orbat", poll, AppEvent::Units, |c| c.orbat().list_units()),
        feed!("bda", poll, AppEvent::Reports, |c| c.bda().list_reports()),
        feed!("assumptions", poll, AppEvent::Assumptions, |c| c.assumptions().list()),
        feed!("roe", poll, AppEvent::RoeRules, |c| c.roe().list_rules()),
    ]
}

/// Executes [`Command`]s against the API and the preference store.
///
/// Network calls run on their own tasks and report back as [`AppEvent`]s.
pub struct CommandRunner {
    client: Arc<ApiClient>,
    store: UiStateStore,
    search: SearchHandle,
    tx: UnboundedSender<AppEvent>,
}

impl CommandRunner {
    /// Create a runner reporting on `tx`
    pub fn new(
        client: Arc<ApiClient>,
        store: UiStateStore,
        search: SearchHandle,
        tx: UnboundedSender<AppEvent>,
    ) -> Self {
        Self {
            client,
            store,
            search,
            tx,
        }
    }

    fn report(&self, event: AppEvent) {
        if self.tx.send(event).is_err() {
            warn!("UI loop gone, dropping event");
        }
    }

    /// Run one command
    pub fn run(&self, command: Command) {
        match command {
            Command::SaveRole(role) => {
                if let Err(e) = self.store.save(&UiState { role }) {
                    warn!(error = %e, "Could not save role");
                    self.report(AppEvent::ActionFailed(format!("Could not save role: {}", e)));
                }
            }
            Command::Search(query) => {
                if !self.search.input(query) {
                    warn!("Search driver stopped");
                }
            }
            Command::LoadHistory(report_id) => {
                let client = Arc::clone(&self.client);
                let tx = self.tx.clone();
                tokio::spawn(async move {
                    let update = FeedUpdate::from_result(client.bda().history(&report_id).await);
                    let _ = tx.send(AppEvent::History { report_id, update });
                });
            }
            Command::UpdateTargetStatus { id, status } => {
                let client = Arc::clone(&self.client);
                let tx = self.tx.clone();
                tokio::spawn(async move {
                    let event = match client.targeting().update_status(&id, status).await {
                        Ok(target) => AppEvent::TargetChanged(target),
                        Err(e) => AppEvent::ActionFailed(format!("{}: {}", id, e)),
                    };
                    let _ = tx.send(event);
                });
            }
            Command::RecordJtbDecision {
                id,
                decision,
                rationale,
            } => {
                let client = Arc::clone(&self.client);
                let tx = self.tx.clone();
                tokio::spawn(async move {
                    let event = match client.targeting().record_jtb_decision(&id, decision, &rationale).await {
                        Ok(target) => AppEvent::TargetChanged(target),
                        Err(e) => AppEvent::ActionFailed(format!("{}: {}", id, e)),
                    };
                    let _ = tx.send(event);
                });
            }
            Command::UpdateAssumptionStatus { id, status } => {
                let client = Arc::clone(&self.client);
                let tx = self.tx.clone();
                tokio::spawn(async move {
                    let event = match client.assumptions().update_status(&id, status).await {
                        Ok(assumption) => AppEvent::AssumptionChanged(assumption),
                        Err(e) => AppEvent::ActionFailed(format!("{}: {}", id, e)),
                    };
                    let _ = tx.send(event);
                });
            }
        }
    }
}

/// Run `setup`; if it fails, run `restore` before handing back the error
fn undo_on_error<T>(
    setup: impl FnOnce() -> Result<T, DashboardError>,
    restore: impl FnOnce(),
) -> Result<T, DashboardError> {
    setup().inspect_err(|_| restore())
}

/// Raw mode on the alternate screen. Raw mode is switched back off if the
/// rest of the setup fails.
fn enter_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>, DashboardError> {
    enable_raw_mode()?;
    undo_on_error(
        || {
            let mut stdout = io::stdout();
            execute!(stdout, EnterAlternateScreen)?;
            Ok(Terminal::new(CrosstermBackend::new(stdout))?)
        },
        || {
            let _ = execute!(io::stdout(), LeaveAlternateScreen);
            let _ = disable_raw_mode();
        },
    )
}

/// Terminal application
pub struct TuiApp {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    state: AppState,
    runner: CommandRunner,
    events: UnboundedReceiver<AppEvent>,
    tasks: Vec<JoinHandle<()>>,
}

impl TuiApp {
    /// Start the background tasks and take over the terminal
    pub fn new(config: &DashboardConfig, state: AppState, store: UiStateStore) -> Result<Self, DashboardError> {
        let client = Arc::new(build_client(config)?);
        let (tx, events) = mpsc::unbounded_channel();

        let mut tasks = spawn_feeds(&client, config, &tx);
        let backend: Arc<dyn SearchBackend> = client.clone();
        let options = SearchOptions {
            debounce: config.search_debounce(),
            min_chars: config.search_min_chars,
        };
        let (search, search_task) = spawn_search(backend, options, AppEvent::Search, tx.clone());
        tasks.push(search_task);

        let checker = Arc::clone(&client);
        tasks.push(tokio::spawn(async move {
            if !checker.health().await {
                warn!(api = %checker.base_url(), "API health check failed, showing sample data until feeds load");
            }
        }));
        info!(api = %config.api_base_url, role = %state.role, "Dashboard started");

        let terminal = match enter_terminal() {
            Ok(terminal) => terminal,
            Err(e) => {
                for task in &tasks {
                    task.abort();
                }
                return Err(e);
            }
        };

        Ok(Self {
            terminal,
            state,
            runner: CommandRunner::new(client, store, search, tx),
            events,
            tasks,
        })
    }

    /// Main loop: draw, apply background events, handle one key press
    pub async fn run(&mut self) -> Result<(), DashboardError> {
        loop {
            let state = &self.state;
            self.terminal.draw(|frame| screens::draw_app(frame, state))?;

            while let Ok(event) = self.events.try_recv() {
                self.state.apply(event);
            }

            // Handle events with timeout so background updates keep flowing
            if event::poll(Duration::from_millis(100))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        for command in self.state.handle_key(key.code) {
                            self.runner.run(command);
                        }
                    }
                }
            }

            if self.state.should_quit {
                break;
            }
        }

        info!("Dashboard stopped");
        Ok(())
    }
}

impl Drop for TuiApp {
    fn drop(&mut self) {
        for task in &self.tasks {
            task.abort();
        }
        // Restore terminal
        let _ = disable_raw_mode();
        let _ = execute!(self.terminal.backend_mut(), LeaveAlternateScreen);
        let _ = self.terminal.show_cursor();
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;

    #[test]
    fn test_failed_setup_runs_restore() {
        let restored = Cell::new(false);
        let result: Result<(), DashboardError> = undo_on_error(
            || Err(io::Error::new(io::ErrorKind::Unsupported, "no tty").into()),
            || restored.set(true),
        );
        assert!(result.is_err());
        assert!(restored.get());
    }

    #[test]
    fn test_successful_setup_skips_restore() {
        let restored = Cell::new(false);
        let result = undo_on_error(|| Ok(7), || restored.set(true));
        assert_eq!(result.unwrap(), 7);
        assert!(!restored.get());
    }
}
