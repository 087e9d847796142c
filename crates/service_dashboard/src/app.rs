//! Dashboard state and input handling.
//!
//! [`AppState`] owns every view model and is only touched by the UI loop:
//! key presses go through [`AppState::handle_key`], background results
//! through [`AppState::apply`]. Neither performs I/O. Side effects are
//! returned as [`Command`]s for the runtime to execute.

use adapter_api::feed::FeedUpdate;
use adapter_api::resources::orbat::report_integrity;
use adapter_api::search_driver::{SearchSource, SearchUpdate};
use crossterm::event::KeyCode;
use targeting_core::bda_diff::{compare_versions, DiffSchema, VersionComparison};
use targeting_core::orbat::{ExpandedSet, OrbatTree, TreeRow};
use targeting_core::search::SearchHit;
use targeting_core::types::*;
use tracing::{debug, info, warn};

use crate::event::{AppEvent, Loadable};
use crate::sample;

/// Available screens in the TUI
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    /// ROE / CDE / Weather / Deconfliction panels
    Gates,
    /// Target list with JTB actions
    Targets,
    /// Order-of-battle tree
    Orbat,
    /// BDA report list
    Bda,
    /// Side-by-side comparison of two report versions
    Compare,
    /// Planning assumptions
    Assumptions,
    /// Rules of engagement
    Roe,
    /// Quick search overlay
    Search,
}

impl Screen {
    /// Screens reachable from the tab bar, in digit order
    pub const TABS: [Screen; 7] = [
        Screen::Gates,
        Screen::Targets,
        Screen::Orbat,
        Screen::Bda,
        Screen::Compare,
        Screen::Assumptions,
        Screen::Roe,
    ];

    /// Get screen title
    pub fn title(&self) -> &'static str {
        match self {
            Self::Gates => "Decision Gates",
            Self::Targets => "Targets",
            Self::Orbat => "ORBAT",
            Self::Bda => "BDA",
            Self::Compare => "BDA Compare",
            Self::Assumptions => "Assumptions",
            Self::Roe => "ROE",
            Self::Search => "Search",
        }
    }

    /// Tab index, `None` for overlays
    pub fn tab_index(&self) -> Option<usize> {
        Self::TABS.iter().position(|s| s == self)
    }

    /// Screen bound to a digit key
    pub fn from_digit(c: char) -> Option<Screen> {
        let n = c.to_digit(10)? as usize;
        Self::TABS.get(n.checked_sub(1)?).copied()
    }

    /// Resolve a navigation path into a screen and an optional record id.
    pub fn for_path(path: &str) -> Option<(Screen, Option<&str>)> {
        let mut parts = path.trim_matches('/').splitn(2, '/');
        let head = parts.next()?;
        let rest = parts.next().filter(|r| !r.is_empty());
        let screen = match (head, rest) {
            ("gates", _) => Screen::Gates,
            ("targets", _) => Screen::Targets,
            ("orbat", _) => Screen::Orbat,
            ("bda", Some("compare")) => return Some((Screen::Compare, None)),
            ("bda", _) => Screen::Bda,
            ("assumptions", _) => Screen::Assumptions,
            ("roe", _) => Screen::Roe,
            _ => return None,
        };
        Some((screen, rest))
    }
}

/// Side effect requested by a key press
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Persist the selected role
    SaveRole(Role),
    /// Forward the current query to the search driver
    Search(String),
    /// Fetch a report's version history
    LoadHistory(String),
    /// Ask the backend to change a target's status
    UpdateTargetStatus {
        /// Target id
        id: String,
        /// Requested status
        status: TargetStatus,
    },
    /// Record a JTB decision
    RecordJtbDecision {
        /// Target id
        id: String,
        /// Decision
        decision: JtbDecision,
        /// Rationale sent with the decision
        rationale: String,
    },
    /// Ask the backend to change an assumption's status
    UpdateAssumptionStatus {
        /// Assumption id
        id: String,
        /// Requested status
        status: AssumptionStatus,
    },
}

/// Severity of a status bar message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    /// Informational
    Info,
    /// Something failed or was refused
    Error,
}

/// Status bar message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    /// Severity
    pub level: NoticeLevel,
    /// Text
    pub text: String,
}

/// ORBAT view state
#[derive(Debug, Clone)]
pub struct OrbatView {
    /// Indexed units
    pub tree: OrbatTree,
    /// Expanded unit ids
    pub expanded: ExpandedSet,
    /// Affiliation currently shown
    pub affiliation: Affiliation,
    /// Selected row
    pub selected: usize,
}

/// Version comparison view state
#[derive(Debug, Clone, Default)]
pub struct CompareView {
    /// Report whose history is shown
    pub report_id: Option<String>,
    /// History, oldest first
    pub versions: Vec<BdaVersion>,
    /// Whether a fetch is outstanding
    pub loading: bool,
    /// Error from the last fetch
    pub error: Option<String>,
    /// Index of the older version
    pub older: usize,
    /// Index of the newer version
    pub newer: usize,
    /// Hide unchanged fields
    pub changed_only: bool,
}

impl CompareView {
    fn reset_pair(&mut self) {
        self.newer = self.versions.len().saturating_sub(1);
        self.older = self.newer.saturating_sub(1);
    }
}

/// Quick search view state
#[derive(Debug, Clone, Default)]
pub struct SearchView {
    /// Query as typed
    pub query: String,
    /// Hits for the query
    pub results: Vec<SearchHit>,
    /// Where the hits came from
    pub source: Option<SearchSource>,
    /// Backend error on fallback
    pub error: Option<String>,
    /// Selected hit
    pub selected: usize,
}

/// Everything the dashboard displays
#[derive(Debug)]
pub struct AppState {
    /// Current screen
    pub screen: Screen,
    /// Screen to return to when search closes
    pub previous_screen: Screen,
    /// Operator role
    pub role: Role,
    /// Decision gates
    pub gates: Loadable<Vec<DecisionGate>>,
    /// Targets
    pub targets: Loadable<Vec<Target>>,
    /// Selected target
    pub target_selected: usize,
    /// Units as fetched
    pub units: Loadable<Vec<Unit>>,
    /// ORBAT tree state
    pub orbat: OrbatView,
    /// BDA reports
    pub reports: Loadable<Vec<BdaReport>>,
    /// Selected report
    pub report_selected: usize,
    /// Version comparison
    pub compare: CompareView,
    /// Planning assumptions
    pub assumptions: Loadable<Vec<Assumption>>,
    /// Selected assumption
    pub assumption_selected: usize,
    /// Rules of engagement
    pub roe: Loadable<Vec<RoeRule>>,
    /// Selected rule
    pub roe_selected: usize,
    /// Quick search
    pub search: SearchView,
    /// Status bar message
    pub notice: Option<Notice>,
    /// Exit flag
    pub should_quit: bool,
    schema: DiffSchema,
}

fn step(selected: usize, len: usize, down: bool) -> usize {
    if down {
        (selected + 1).min(len.saturating_sub(1))
    } else {
        selected.saturating_sub(1)
    }
}

impl AppState {
    /// Create the state with sample data for every view
    pub fn new(role: Role) -> Self {
        let units = sample::units();
        Self {
            screen: Screen::Gates,
            previous_screen: Screen::Gates,
            role,
            gates: Loadable::sample(sample::gates()),
            targets: Loadable::sample(sample::targets()),
            target_selected: 0,
            orbat: OrbatView {
                tree: OrbatTree::build(units.clone()),
                expanded: ExpandedSet::new(),
                affiliation: Affiliation::Blue,
                selected: 0,
            },
            units: Loadable::sample(units),
            reports: Loadable::sample(sample::reports()),
            report_selected: 0,
            compare: CompareView::default(),
            assumptions: Loadable::sample(sample::assumptions()),
            assumption_selected: 0,
            roe: Loadable::sample(sample::roe_rules()),
            roe_selected: 0,
            search: SearchView::default(),
            notice: None,
            should_quit: false,
            schema: DiffSchema::bda_default(),
        }
    }

    fn info(&mut self, text: impl Into<String>) {
        self.notice = Some(Notice {
            level: NoticeLevel::Info,
            text: text.into(),
        });
    }

    fn error(&mut self, text: impl Into<String>) {
        self.notice = Some(Notice {
            level: NoticeLevel::Error,
            text: text.into(),
        });
    }

    /// Rows of the ORBAT tree as currently expanded
    pub fn orbat_rows(&self) -> Vec<TreeRow<'_>> {
        self.orbat.tree.visible_rows(self.orbat.affiliation, &self.orbat.expanded)
    }

    /// Unit under the ORBAT cursor
    pub fn selected_unit(&self) -> Option<&Unit> {
        self.orbat_rows().get(self.orbat.selected).map(|row| row.unit)
    }

    /// Target under the cursor
    pub fn selected_target(&self) -> Option<&Target> {
        self.targets.data.get(self.target_selected)
    }

    /// Report under the cursor
    pub fn selected_report(&self) -> Option<&BdaReport> {
        self.reports.data.get(self.report_selected)
    }

    /// Comparison of the selected version pair
    pub fn comparison(&self) -> Option<VersionComparison> {
        let view = &self.compare;
        if view.older >= view.newer {
            return None;
        }
        let old = view.versions.get(view.older)?;
        let new = view.versions.get(view.newer)?;
        let mut comparison = compare_versions(&self.schema, &old.data, &new.data);
        comparison.old_version = Some(old.version);
        comparison.new_version = Some(new.version);
        Some(comparison)
    }

    /// Handle keyboard input
    pub fn handle_key(&mut self, key: KeyCode) -> Vec<Command> {
        if self.screen == Screen::Search {
            return self.handle_search_key(key);
        }

        match key {
            KeyCode::Char('q') => {
                self.should_quit = true;
                Vec::new()
            }
            KeyCode::Esc => {
                self.notice = None;
                Vec::new()
            }
            KeyCode::Char('/') => {
                self.previous_screen = self.screen;
                self.screen = Screen::Search;
                self.search = SearchView::default();
                // Clearing the driver cancels any debounced request for the old query.
                vec![Command::Search(String::new())]
            }
            KeyCode::Char('r') => {
                self.role = self.role.next();
                info!(role = %self.role, "Role changed");
                self.info(format!("Role: {}", self.role));
                vec![Command::SaveRole(self.role)]
            }
            KeyCode::Tab => {
                let next = self.screen.tab_index().map_or(0, |i| (i + 1) % Screen::TABS.len());
                self.switch_to(Screen::TABS[next])
            }
            KeyCode::Char(c) if c.is_ascii_digit() => match Screen::from_digit(c) {
                Some(screen) => self.switch_to(screen),
                None => Vec::new(),
            },
            _ => match self.screen {
                Screen::Targets => self.handle_targets_key(key),
                Screen::Orbat => self.handle_orbat_key(key),
                Screen::Bda => self.handle_bda_key(key),
                Screen::Compare => self.handle_compare_key(key),
                Screen::Assumptions => self.handle_assumptions_key(key),
                Screen::Roe => {
                    if let KeyCode::Up | KeyCode::Down = key {
                        self.roe_selected = step(self.roe_selected, self.roe.data.len(), key == KeyCode::Down);
                    }
                    Vec::new()
                }
                Screen::Gates | Screen::Search => Vec::new(),
            },
        }
    }

    fn switch_to(&mut self, screen: Screen) -> Vec<Command> {
        self.screen = screen;
        if screen == Screen::Compare {
            return self.open_compare();
        }
        Vec::new()
    }

    /// Show the history of the selected report, fetching it if needed.
    fn open_compare(&mut self) -> Vec<Command> {
        self.screen = Screen::Compare;
        let Some(report_id) = self.selected_report().map(|r| r.id.clone()) else {
            return Vec::new();
        };
        if self.compare.report_id.as_deref() == Some(report_id.as_str()) && !self.compare.versions.is_empty() {
            return Vec::new();
        }
        self.compare = CompareView {
            report_id: Some(report_id.clone()),
            loading: true,
            changed_only: self.compare.changed_only,
            ..CompareView::default()
        };
        vec![Command::LoadHistory(report_id)]
    }

    fn handle_targets_key(&mut self, key: KeyCode) -> Vec<Command> {
        match key {
            KeyCode::Up | KeyCode::Char('k') => {
                self.target_selected = step(self.target_selected, self.targets.data.len(), false);
                Vec::new()
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.target_selected = step(self.target_selected, self.targets.data.len(), true);
                Vec::new()
            }
            KeyCode::Char('n') => self.request_status(TargetStatus::Identified, TargetStatus::Nominated),
            KeyCode::Char('e') => self.request_status(TargetStatus::Approved, TargetStatus::Engaged),
            KeyCode::Char('a') => self.request_decision(JtbDecision::Approve),
            KeyCode::Char('x') => self.request_decision(JtbDecision::Reject),
            KeyCode::Char('d') => self.request_decision(JtbDecision::Defer),
            _ => Vec::new(),
        }
    }

    fn request_status(&mut self, from: TargetStatus, to: TargetStatus) -> Vec<Command> {
        let Some(target) = self.selected_target() else {
            return Vec::new();
        };
        let (id, current) = (target.id.clone(), target.status);
        if !self.role.can_edit() {
            self.error(format!("{} cannot change target status", self.role));
            return Vec::new();
        }
        if current != from {
            self.error(format!("{} is {}, expected {}", id, current.label(), from.label()));
            return Vec::new();
        }
        self.info(format!("Requesting {} -> {}", id, to.label()));
        vec![Command::UpdateTargetStatus { id, status: to }]
    }

    fn request_decision(&mut self, decision: JtbDecision) -> Vec<Command> {
        let Some(target) = self.selected_target() else {
            return Vec::new();
        };
        let (id, awaiting) = (target.id.clone(), target.status.awaits_decision());
        if !self.role.can_decide() {
            self.error(format!("{} cannot record JTB decisions", self.role));
            return Vec::new();
        }
        if !awaiting {
            self.error(format!("{} is not awaiting a JTB decision", id));
            return Vec::new();
        }
        self.info(format!("Recording {} for {}", decision.code(), id));
        vec![Command::RecordJtbDecision {
            rationale: format!("{} recorded by {} from dashboard", decision.code(), self.role),
            id,
            decision,
        }]
    }

    fn handle_orbat_key(&mut self, key: KeyCode) -> Vec<Command> {
        let rows = self.orbat_rows().len();
        match key {
            KeyCode::Up | KeyCode::Char('k') => self.orbat.selected = step(self.orbat.selected, rows, false),
            KeyCode::Down | KeyCode::Char('j') => self.orbat.selected = step(self.orbat.selected, rows, true),
            KeyCode::Enter | KeyCode::Char(' ') => {
                if let Some(id) = self.selected_unit().map(|u| u.id.clone()) {
                    self.orbat.expanded.toggle(&id);
                }
            }
            KeyCode::Right => {
                if let Some(id) = self.selected_unit().map(|u| u.id.clone()) {
                    self.orbat.expanded.expand(&id);
                }
            }
            KeyCode::Left => self.collapse_or_climb(),
            KeyCode::Char('b') => {
                self.orbat.affiliation = self.orbat.affiliation.opposite();
                self.orbat.selected = 0;
            }
            KeyCode::Char('e') => {
                let mut expanded = std::mem::take(&mut self.orbat.expanded);
                self.orbat.tree.expand_all(&mut expanded);
                self.orbat.expanded = expanded;
            }
            KeyCode::Char('c') => {
                self.orbat.expanded.clear();
                self.orbat.selected = 0;
            }
            _ => {}
        }
        Vec::new()
    }

    /// Collapse the selected unit, or move to its parent if already collapsed.
    fn collapse_or_climb(&mut self) {
        let Some(unit) = self.selected_unit() else {
            return;
        };
        let (id, parent) = (unit.id.clone(), unit.parent_id.clone());
        if self.orbat.expanded.contains(&id) {
            self.orbat.expanded.collapse(&id);
        } else if let Some(parent) = parent {
            self.select_unit_row(&parent);
        }
    }

    fn select_unit_row(&mut self, id: &str) -> bool {
        match self.orbat_rows().iter().position(|row| row.id == id) {
            Some(pos) => {
                self.orbat.selected = pos;
                true
            }
            None => false,
        }
    }

    fn handle_bda_key(&mut self, key: KeyCode) -> Vec<Command> {
        match key {
            KeyCode::Up | KeyCode::Char('k') => {
                self.report_selected = step(self.report_selected, self.reports.data.len(), false);
                Vec::new()
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.report_selected = step(self.report_selected, self.reports.data.len(), true);
                Vec::new()
            }
            KeyCode::Enter => self.open_compare(),
            _ => Vec::new(),
        }
    }

    fn handle_compare_key(&mut self, key: KeyCode) -> Vec<Command> {
        let view = &mut self.compare;
        match key {
            KeyCode::Left if view.older > 0 => view.older -= 1,
            KeyCode::Right if view.older + 1 < view.newer => view.older += 1,
            KeyCode::Char('[') if view.newer > view.older + 1 => view.newer -= 1,
            KeyCode::Char(']') if view.newer + 1 < view.versions.len() => view.newer += 1,
            KeyCode::Char('c') => view.changed_only = !view.changed_only,
            KeyCode::Char('l') => {
                if let Some(id) = view.report_id.clone() {
                    view.loading = true;
                    return vec![Command::LoadHistory(id)];
                }
            }
            _ => {}
        }
        Vec::new()
    }

    fn handle_assumptions_key(&mut self, key: KeyCode) -> Vec<Command> {
        let len = self.assumptions.data.len();
        match key {
            KeyCode::Up | KeyCode::Char('k') => self.assumption_selected = step(self.assumption_selected, len, false),
            KeyCode::Down | KeyCode::Char('j') => self.assumption_selected = step(self.assumption_selected, len, true),
            KeyCode::Char('s') => {
                let Some(assumption) = self.assumptions.data.get(self.assumption_selected) else {
                    return Vec::new();
                };
                let (id, status) = (assumption.id.clone(), assumption.status.next());
                if !self.role.can_edit() {
                    self.error(format!("{} cannot change assumptions", self.role));
                    return Vec::new();
                }
                self.info(format!("Marking {} as {}", id, status.label()));
                return vec![Command::UpdateAssumptionStatus { id, status }];
            }
            _ => {}
        }
        Vec::new()
    }

    fn handle_search_key(&mut self, key: KeyCode) -> Vec<Command> {
        match key {
            KeyCode::Esc => {
                self.screen = self.previous_screen;
                Vec::new()
            }
            KeyCode::Up => {
                self.search.selected = step(self.search.selected, self.search.results.len(), false);
                Vec::new()
            }
            KeyCode::Down => {
                self.search.selected = step(self.search.selected, self.search.results.len(), true);
                Vec::new()
            }
            KeyCode::Enter => match self.search.results.get(self.search.selected) {
                Some(hit) => {
                    let path = hit.path.clone();
                    self.navigate(&path)
                }
                None => Vec::new(),
            },
            KeyCode::Backspace => {
                self.search.query.pop();
                vec![Command::Search(self.search.query.clone())]
            }
            KeyCode::Char(c) => {
                self.search.query.push(c);
                vec![Command::Search(self.search.query.clone())]
            }
            _ => Vec::new(),
        }
    }

    /// Jump to the view a search hit points at.
    pub fn navigate(&mut self, path: &str) -> Vec<Command> {
        let Some((screen, id)) = Screen::for_path(path) else {
            self.error(format!("No view for {}", path));
            return Vec::new();
        };
        debug!(path, ?screen, "Navigating");
        self.screen = screen;

        match (screen, id) {
            (Screen::Targets, Some(id)) => match self.targets.data.iter().position(|t| t.id == id) {
                Some(pos) => self.target_selected = pos,
                None => self.error(format!("Target {} is not in the current list", id)),
            },
            (Screen::Bda, Some(id)) => match self.reports.data.iter().position(|r| r.id == id) {
                Some(pos) => self.report_selected = pos,
                None => self.error(format!("Report {} is not in the current list", id)),
            },
            (Screen::Orbat, Some(id)) => self.reveal_unit(id),
            (Screen::Compare, _) => return self.open_compare(),
            _ => {}
        }
        Vec::new()
    }

    /// Expand the path to a unit and put the cursor on it.
    fn reveal_unit(&mut self, id: &str) {
        let Some(affiliation) = self.orbat.tree.get(id).map(|u| u.affiliation) else {
            self.error(format!("Unit {} is not in the ORBAT", id));
            return;
        };
        self.orbat.affiliation = affiliation;
        let walk = self.orbat.tree.expand_path_to(&mut self.orbat.expanded, id);
        let complete = walk.is_complete();
        if !self.select_unit_row(id) || !complete {
            warn!(unit = id, "Unit is not reachable from a root");
            self.error(format!("Unit {} has a broken parent chain", id));
        }
    }

    /// Apply a background event
    pub fn apply(&mut self, event: AppEvent) {
        match event {
            AppEvent::Gates(update) => {
                self.gates.apply(update);
            }
            AppEvent::Targets(update) => {
                self.targets.apply(update);
                self.target_selected = self.target_selected.min(self.targets.data.len().saturating_sub(1));
            }
            AppEvent::Units(update) => {
                if self.units.apply(update) {
                    self.orbat.tree = OrbatTree::build(self.units.data.clone());
                    report_integrity(&self.orbat.tree);
                    let rows = self.orbat_rows().len();
                    self.orbat.selected = self.orbat.selected.min(rows.saturating_sub(1));
                }
            }
            AppEvent::Reports(update) => {
                self.reports.apply(update);
                self.report_selected = self.report_selected.min(self.reports.data.len().saturating_sub(1));
            }
            AppEvent::Assumptions(update) => {
                self.assumptions.apply(update);
                self.assumption_selected =
                    self.assumption_selected.min(self.assumptions.data.len().saturating_sub(1));
            }
            AppEvent::RoeRules(update) => {
                self.roe.apply(update);
                self.roe_selected = self.roe_selected.min(self.roe.data.len().saturating_sub(1));
            }
            AppEvent::History { report_id, update } => self.apply_history(report_id, update),
            AppEvent::Search(update) => self.apply_search(update),
            AppEvent::TargetChanged(target) => {
                self.info(format!("{} is now {}", target.id, target.status.label()));
                match self.targets.data.iter_mut().find(|t| t.id == target.id) {
                    Some(existing) => *existing = target,
                    None => self.targets.data.push(target),
                }
            }
            AppEvent::AssumptionChanged(assumption) => {
                self.info(format!("{} marked {}", assumption.id, assumption.status.label()));
                match self.assumptions.data.iter_mut().find(|a| a.id == assumption.id) {
                    Some(existing) => *existing = assumption,
                    None => self.assumptions.data.push(assumption),
                }
            }
            AppEvent::ActionFailed(message) => self.error(message),
        }
    }

    fn apply_history(&mut self, report_id: String, update: FeedUpdate<Vec<BdaVersion>>) {
        if self.compare.report_id.as_deref() != Some(report_id.as_str()) {
            debug!(report = %report_id, "Ignoring history for a report no longer shown");
            return;
        }
        self.compare.loading = false;
        match update {
            FeedUpdate::Loaded(versions) => {
                self.compare.versions = versions;
                self.compare.error = None;
            }
            FeedUpdate::Failed(message) => {
                // Sample reports have sample histories.
                if !self.reports.live && self.compare.versions.is_empty() {
                    self.compare.versions = sample::history(&report_id);
                }
                self.compare.error = Some(message);
            }
        }
        self.compare.reset_pair();
    }

    fn apply_search(&mut self, update: SearchUpdate) {
        if update.query.trim() != self.search.query.trim() {
            debug!(query = %update.query, "Ignoring results for an outdated query");
            return;
        }
        self.search.results = update.results;
        self.search.source = Some(update.source);
        self.search.error = update.error;
        self.search.selected = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_screen_titles() {
        assert_eq!(Screen::Gates.title(), "Decision Gates");
        assert_eq!(Screen::Compare.title(), "BDA Compare");
    }

    #[test]
    fn test_digits_map_to_tabs() {
        assert_eq!(Screen::from_digit('1'), Some(Screen::Gates));
        assert_eq!(Screen::from_digit('7'), Some(Screen::Roe));
        assert_eq!(Screen::from_digit('0'), None);
        assert_eq!(Screen::from_digit('9'), None);
    }

    #[test]
    fn test_paths_resolve_to_screens() {
        assert_eq!(Screen::for_path("/targets/T-1"), Some((Screen::Targets, Some("T-1"))));
        assert_eq!(Screen::for_path("/bda/compare"), Some((Screen::Compare, None)));
        assert_eq!(Screen::for_path("/bda/BDA-9"), Some((Screen::Bda, Some("BDA-9"))));
        assert_eq!(Screen::for_path("/gates"), Some((Screen::Gates, None)));
        assert_eq!(Screen::for_path("/admin"), None);
    }

    #[test]
    fn test_observer_cannot_nominate() {
        let mut app = AppState::new(Role::Observer);
        app.screen = Screen::Targets;
        app.target_selected = 2; // T-1003, Identified
        assert!(app.handle_key(KeyCode::Char('n')).is_empty());
        assert_eq!(app.notice.as_ref().map(|n| n.level), Some(NoticeLevel::Error));
    }

    #[test]
    fn test_commander_records_decision_on_nominated_target() {
        let mut app = AppState::new(Role::Commander);
        app.screen = Screen::Targets;
        let commands = app.handle_key(KeyCode::Char('a'));
        assert!(matches!(
            commands.as_slice(),
            [Command::RecordJtbDecision { id, decision: JtbDecision::Approve, .. }] if id == "T-1001"
        ));
    }

    #[test]
    fn test_targeteer_cannot_decide() {
        let mut app = AppState::new(Role::Targeteer);
        app.screen = Screen::Targets;
        assert!(app.handle_key(KeyCode::Char('a')).is_empty());
    }

    #[test]
    fn test_role_cycle_is_persisted() {
        let mut app = AppState::new(Role::Analyst);
        assert_eq!(app.handle_key(KeyCode::Char('r')), vec![Command::SaveRole(Role::Observer)]);
        assert_eq!(app.role, Role::Observer);
    }

    #[test]
    fn test_opening_search_resets_query() {
        let mut app = AppState::new(Role::Analyst);
        app.search.query = "bridge".to_string();
        app.screen = Screen::Targets;

        assert_eq!(app.handle_key(KeyCode::Char('/')), vec![Command::Search(String::new())]);
        assert_eq!(app.screen, Screen::Search);
        assert!(app.search.query.is_empty());
    }

    #[test]
    fn test_compare_pair_bounds() {
        let mut view = CompareView {
            report_id: Some("BDA-001".to_string()),
            versions: sample::history("BDA-001"),
            ..CompareView::default()
        };
        view.reset_pair();
        assert_eq!((view.older, view.newer), (0, 1));

        let mut app = AppState::new(Role::Analyst);
        app.compare = view;
        app.handle_key(KeyCode::Char('5'));
        app.handle_key(KeyCode::Right);
        app.handle_key(KeyCode::Char('['));
        assert_eq!((app.compare.older, app.compare.newer), (0, 1));
    }
}
