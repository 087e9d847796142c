//! Screen rendering functions for the TUI.

pub mod bda;
pub mod orbat;

use crate::app::{AppState, NoticeLevel, Screen, SearchView};
use crate::event::Loadable;
use adapter_api::search_driver::SearchSource;
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Cell, List, ListItem, Paragraph, Row, Table, TableState, Tabs, Wrap},
};
use targeting_core::types::*;

/// Traffic-light colour for a gate status
pub fn gate_color(status: GateStatus) -> Color {
    match status {
        GateStatus::Green => Color::Green,
        GateStatus::Yellow => Color::Yellow,
        GateStatus::Red => Color::Red,
    }
}

fn status_color(status: TargetStatus) -> Color {
    match status {
        TargetStatus::Identified => Color::Gray,
        TargetStatus::Nominated => Color::Yellow,
        TargetStatus::Approved => Color::Green,
        TargetStatus::Rejected => Color::Red,
        TargetStatus::Engaged => Color::Magenta,
        TargetStatus::Assessed => Color::Cyan,
    }
}

fn priority_color(priority: PriorityTier) -> Color {
    match priority.value() {
        1 => Color::Red,
        2 => Color::Yellow,
        3 => Color::Cyan,
        _ => Color::Gray,
    }
}

fn assumption_color(status: AssumptionStatus) -> Color {
    match status {
        AssumptionStatus::Valid => Color::Green,
        AssumptionStatus::AtRisk => Color::Yellow,
        AssumptionStatus::Invalidated => Color::Red,
    }
}

/// Panel title carrying the data source tag
pub(crate) fn titled<T>(name: &str, view: &Loadable<T>) -> String {
    format!(" {} [{}] ", name, view.source_label())
}

/// Draw a one-line error above `area` if there is one, returning the rest.
pub(crate) fn with_error_line(frame: &mut Frame, area: Rect, error: Option<&str>) -> Rect {
    let Some(error) = error else {
        return area;
    };
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(0)])
        .split(area);
    let line = Paragraph::new(format!(" ! {}", error)).style(Style::default().fg(Color::Red));
    frame.render_widget(line, chunks[0]);
    chunks[1]
}

/// Draw the whole dashboard
pub fn draw_app(frame: &mut Frame, state: &AppState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(0),    // Content
            Constraint::Length(1), // Status
            Constraint::Length(3), // Footer
        ])
        .split(frame.size());

    draw_header(frame, chunks[0], state);

    let content = chunks[1];
    match state.screen {
        Screen::Gates => draw_gates(frame, content, &state.gates),
        Screen::Targets => draw_targets(frame, content, &state.targets, state.target_selected),
        Screen::Orbat => orbat::draw_orbat(frame, content, state),
        Screen::Bda => bda::draw_reports(frame, content, &state.reports, state.report_selected),
        Screen::Compare => bda::draw_compare(frame, content, state),
        Screen::Assumptions => draw_assumptions(frame, content, &state.assumptions, state.assumption_selected),
        Screen::Roe => draw_roe(frame, content, &state.roe, state.roe_selected),
        Screen::Search => draw_search(frame, content, &state.search),
    }

    if let Some(notice) = &state.notice {
        let color = match notice.level {
            NoticeLevel::Info => Color::Cyan,
            NoticeLevel::Error => Color::Red,
        };
        frame.render_widget(
            Paragraph::new(format!(" {}", notice.text)).style(Style::default().fg(color)),
            chunks[2],
        );
    }

    draw_footer(frame, chunks[3], state.screen);
}

fn draw_header(frame: &mut Frame, area: Rect, state: &AppState) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(0), Constraint::Length(36)])
        .split(area);

    let titles: Vec<Line> = Screen::TABS
        .iter()
        .enumerate()
        .map(|(i, s)| Line::from(format!("{} {}", i + 1, s.title())))
        .collect();
    let tabs = Tabs::new(titles)
        .select(state.screen.tab_index().unwrap_or(usize::MAX))
        .style(Style::default().fg(Color::DarkGray))
        .highlight_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
        .block(Block::default().title(" Targeting Cell ").borders(Borders::ALL));
    frame.render_widget(tabs, chunks[0]);

    let mut spans = vec![
        Span::raw(" Role: "),
        Span::styled(state.role.to_string(), Style::default().add_modifier(Modifier::BOLD)),
    ];
    if let Some(status) = overall_status(&state.gates.data) {
        spans.push(Span::raw("  Gates: "));
        spans.push(Span::styled(status.code(), Style::default().fg(gate_color(status))));
    }
    let role = Paragraph::new(Line::from(spans)).block(Block::default().borders(Borders::ALL));
    frame.render_widget(role, chunks[1]);
}

fn draw_footer(frame: &mut Frame, area: Rect, screen: Screen) {
    let keys = match screen {
        Screen::Targets => "[j/k]Select [n]Nominate [a]Approve [x]Reject [d]Defer [e]Engaged",
        Screen::Orbat => "[j/k]Select [Enter]Toggle [Left/Right]Collapse/Expand [b]Blue/Red [e]Expand all [c]Collapse",
        Screen::Bda => "[j/k]Select [Enter]Compare versions",
        Screen::Compare => "[Left/Right]Older version [ [ ] ]Newer version [c]Changed only [l]Reload",
        Screen::Assumptions => "[j/k]Select [s]Cycle status",
        Screen::Search => "Type to search [Up/Down]Select [Enter]Open [Esc]Close",
        Screen::Gates | Screen::Roe => "[Up/Down]Select",
    };
    let text = if screen == Screen::Search {
        format!(" {} ", keys)
    } else {
        format!(" [1-7/Tab]Screens [/]Search [r]Role | {} | [q]Quit ", keys)
    };
    let footer = Paragraph::new(text)
        .style(Style::default().fg(Color::DarkGray))
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(footer, area);
}

/// Draw the four decision gate panels
pub fn draw_gates(frame: &mut Frame, area: Rect, gates: &Loadable<Vec<DecisionGate>>) {
    let area = with_error_line(frame, area, gates.error.as_deref());
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);
    let cells: Vec<Rect> = rows
        .iter()
        .flat_map(|row| {
            Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
                .split(*row)
                .to_vec()
        })
        .collect();

    for (kind, cell) in GateKind::ALL.iter().zip(cells) {
        let title = format!(" {} [{}] ", kind.title(), gates.source_label());
        let block = Block::default().title(title).borders(Borders::ALL);
        let text = match gates.data.iter().find(|g| g.kind == *kind) {
            Some(gate) => {
                let color = gate_color(gate.status);
                vec![
                    Line::from(""),
                    Line::from(Span::styled(
                        format!("  {}", gate.status.code()),
                        Style::default().fg(color).add_modifier(Modifier::BOLD),
                    )),
                    Line::from(format!("  {}", gate.value)),
                    Line::from(""),
                    Line::from(Span::styled(
                        format!("  {}", gate.classification),
                        Style::default().fg(Color::DarkGray),
                    )),
                ]
            }
            None => vec![Line::from(""), Line::from("  No status reported")],
        };
        frame.render_widget(Paragraph::new(text).block(block), cell);
    }
}

/// Draw the target list and the selected target's details
pub fn draw_targets(frame: &mut Frame, area: Rect, targets: &Loadable<Vec<Target>>, selected: usize) {
    let area = with_error_line(frame, area, targets.error.as_deref());
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(6), Constraint::Length(7)])
        .split(area);

    let header_cells = ["ID", "Name", "Category", "Pri", "Status", "Phase"]
        .iter()
        .map(|h| Cell::from(*h).style(Style::default().fg(Color::Yellow)));
    let header = Row::new(header_cells).height(1);

    let rows = targets.data.iter().map(|target| {
        Row::new(vec![
            Cell::from(target.id.clone()),
            Cell::from(target.name.clone()),
            Cell::from(target.category.clone()),
            Cell::from(target.priority.label()).style(Style::default().fg(priority_color(target.priority))),
            Cell::from(target.status.label()).style(Style::default().fg(status_color(target.status))),
            Cell::from(target.phase.label()),
        ])
    });

    let widths = [
        Constraint::Length(8),
        Constraint::Min(20),
        Constraint::Length(16),
        Constraint::Length(4),
        Constraint::Length(11),
        Constraint::Length(12),
    ];

    let table = Table::new(rows, widths)
        .header(header)
        .block(Block::default().title(titled("Targets", targets)).borders(Borders::ALL))
        .highlight_style(Style::default().bg(Color::DarkGray));
    let mut table_state = TableState::default().with_selected(Some(selected));
    frame.render_stateful_widget(table, chunks[0], &mut table_state);

    let detail = match targets.data.get(selected) {
        Some(target) => {
            let phases: Vec<Span> = KillChainPhase::ALL
                .iter()
                .flat_map(|phase| {
                    let style = if *phase == target.phase {
                        Style::default().fg(Color::Black).bg(Color::Cyan)
                    } else {
                        Style::default().fg(Color::DarkGray)
                    };
                    [Span::styled(format!(" {} ", phase.label()), style), Span::raw(" ")]
                })
                .collect();
            vec![
                Line::from(vec![
                    Span::styled(target.name.clone(), Style::default().add_modifier(Modifier::BOLD)),
                    Span::raw(format!("  ({})", target.id)),
                ]),
                Line::from(format!("Location: {}", target.location)),
                Line::from(vec![
                    Span::raw("Status: "),
                    Span::styled(target.status.label(), Style::default().fg(status_color(target.status))),
                    Span::raw(if target.status.awaits_decision() { "  (awaiting JTB)" } else { "" }),
                ]),
                Line::from(""),
                Line::from(phases),
            ]
        }
        None => vec![Line::from("No targets")],
    };
    frame.render_widget(
        Paragraph::new(detail).block(Block::default().title(" Detail ").borders(Borders::ALL)),
        chunks[1],
    );
}

/// Draw planning assumptions
pub fn draw_assumptions(frame: &mut Frame, area: Rect, assumptions: &Loadable<Vec<Assumption>>, selected: usize) {
    let area = with_error_line(frame, area, assumptions.error.as_deref());
    let header = Row::new(
        ["ID", "Assumption", "Category", "Status", "Conf", "Owner", "Reviewed"]
            .iter()
            .map(|h| Cell::from(*h).style(Style::default().fg(Color::Yellow))),
    );

    let rows = assumptions.data.iter().map(|a| {
        Row::new(vec![
            Cell::from(a.id.clone()),
            Cell::from(a.title.clone()),
            Cell::from(a.category.clone()),
            Cell::from(a.status.label()).style(Style::default().fg(assumption_color(a.status))),
            Cell::from(format!("{}%", a.confidence)),
            Cell::from(a.owner.clone()),
            Cell::from(
                a.last_reviewed
                    .map(|t| t.format("%d %b %H:%MZ").to_string())
                    .unwrap_or_else(|| "never".to_string()),
            ),
        ])
    });

    let widths = [
        Constraint::Length(6),
        Constraint::Min(30),
        Constraint::Length(10),
        Constraint::Length(12),
        Constraint::Length(5),
        Constraint::Length(6),
        Constraint::Length(14),
    ];
    let table = Table::new(rows, widths)
        .header(header)
        .block(Block::default().title(titled("Planning Assumptions", assumptions)).borders(Borders::ALL))
        .highlight_style(Style::default().bg(Color::DarkGray));
    let mut table_state = TableState::default().with_selected(Some(selected));
    frame.render_stateful_widget(table, area, &mut table_state);
}

/// Draw rules of engagement
pub fn draw_roe(frame: &mut Frame, area: Rect, rules: &Loadable<Vec<RoeRule>>, selected: usize) {
    let area = with_error_line(frame, area, rules.error.as_deref());
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
        .split(area);

    let items: Vec<ListItem> = rules
        .data
        .iter()
        .enumerate()
        .map(|(idx, rule)| {
            let color = match rule.status {
                RoeRuleStatus::Active => Color::Green,
                RoeRuleStatus::Suspended => Color::DarkGray,
            };
            let style = if idx == selected {
                Style::default().bg(Color::DarkGray)
            } else {
                Style::default()
            };
            ListItem::new(Line::from(vec![
                Span::styled(format!("{:<9}", rule.code), Style::default().fg(color)),
                Span::raw(rule.title.clone()),
            ]))
            .style(style)
        })
        .collect();
    frame.render_widget(
        List::new(items).block(Block::default().title(titled("Rules of Engagement", rules)).borders(Borders::ALL)),
        chunks[0],
    );

    let text = match rules.data.get(selected) {
        Some(rule) => vec![
            Line::from(Span::styled(rule.title.clone(), Style::default().add_modifier(Modifier::BOLD))),
            Line::from(format!("{} - {}", rule.code, rule.status.label())),
            Line::from(""),
            Line::from(rule.description.clone()),
        ],
        None => vec![Line::from("No rules loaded")],
    };
    frame.render_widget(
        Paragraph::new(text)
            .wrap(Wrap { trim: true })
            .block(Block::default().title(" Rule Text ").borders(Borders::ALL)),
        chunks[1],
    );
}

/// Draw the quick search input and results
pub fn draw_search(frame: &mut Frame, area: Rect, search: &SearchView) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(0)])
        .split(area);

    let input = Paragraph::new(format!("{}_", search.query))
        .style(Style::default().fg(Color::Cyan))
        .block(Block::default().title(" Search ").borders(Borders::ALL));
    frame.render_widget(input, chunks[0]);

    let title = match (search.source, &search.error) {
        (Some(SearchSource::Fallback), Some(error)) => format!(" Pages only: {} ", error),
        (Some(SearchSource::Fallback), None) => " Pages only ".to_string(),
        (Some(SearchSource::Cleared), _) | (None, _) => " Type at least 2 characters ".to_string(),
        (Some(SearchSource::Merged), _) => format!(" {} results ", search.results.len()),
    };

    let items: Vec<ListItem> = search
        .results
        .iter()
        .enumerate()
        .map(|(idx, hit)| {
            let mut spans = vec![
                Span::styled(format!("{:<5}", hit.kind.tag()), Style::default().fg(Color::Yellow)),
                Span::raw(hit.title.clone()),
            ];
            if let Some(subtitle) = &hit.subtitle {
                spans.push(Span::styled(format!("  {}", subtitle), Style::default().fg(Color::DarkGray)));
            }
            let style = if idx == search.selected {
                Style::default().bg(Color::DarkGray)
            } else {
                Style::default()
            };
            ListItem::new(Line::from(spans)).style(style)
        })
        .collect();
    frame.render_widget(
        List::new(items).block(Block::default().title(title).borders(Borders::ALL)),
        chunks[1],
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::backend::TestBackend;

    fn render(state: &AppState) -> String {
        let mut terminal = Terminal::new(TestBackend::new(140, 40)).unwrap();
        terminal.draw(|frame| draw_app(frame, state)).unwrap();
        let buffer = terminal.backend().buffer().clone();
        buffer
            .content
            .chunks(buffer.area.width as usize)
            .map(|line| line.iter().map(|cell| cell.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn test_gates_render_with_sample_tag() {
        let state = AppState::new(Role::Observer);
        let screen = render(&state);
        assert!(screen.contains("Rules of Engagement [SAMPLE]"));
        assert!(screen.contains("CAT II"));
        assert!(screen.contains("Gates: RED"));
    }

    #[test]
    fn test_feed_error_is_shown_inline() {
        let mut state = AppState::new(Role::Observer);
        state.screen = Screen::Targets;
        state.targets.error = Some("Request failed with status 503".to_string());
        let screen = render(&state);
        assert!(screen.contains("Request failed with status 503"));
        assert!(screen.contains("Bridge 4 (MSR TAMPA)"));
    }

    #[test]
    fn test_every_screen_renders() {
        let mut state = AppState::new(Role::Commander);
        for screen in Screen::TABS.into_iter().chain([Screen::Search]) {
            state.screen = screen;
            let rendered = render(&state);
            assert!(rendered.contains("Role: Commander"), "{:?}", screen);
        }
    }
}
