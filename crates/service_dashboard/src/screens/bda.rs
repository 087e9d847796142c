//! BDA report list and version comparison screens.

use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState, Wrap},
};
use targeting_core::types::{BdaReport, PhysicalDamage, Recommendation};

use super::{titled, with_error_line};
use crate::app::AppState;
use crate::event::Loadable;

fn damage_color(damage: PhysicalDamage) -> Color {
    match damage {
        PhysicalDamage::None => Color::Gray,
        PhysicalDamage::Light => Color::Cyan,
        PhysicalDamage::Moderate => Color::Yellow,
        PhysicalDamage::Severe => Color::LightRed,
        PhysicalDamage::Destroyed => Color::Red,
    }
}

fn recommendation_color(recommendation: Recommendation) -> Color {
    match recommendation {
        Recommendation::NoFurtherAction => Color::Green,
        Recommendation::Reattack => Color::Red,
        Recommendation::FurtherCollection => Color::Yellow,
    }
}

/// Draw the report list with the selected report's summary
pub fn draw_reports(frame: &mut Frame, area: Rect, reports: &Loadable<Vec<BdaReport>>, selected: usize) {
    let area = with_error_line(frame, area, reports.error.as_deref());
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(5), Constraint::Length(8)])
        .split(area);

    let header = Row::new(
        ["Report", "Target", "Physical", "Functional", "Conf", "Recommendation", "Ver", "Updated"]
            .iter()
            .map(|h| Cell::from(*h).style(Style::default().fg(Color::Yellow))),
    );
    let rows = reports.data.iter().map(|report| {
        Row::new(vec![
            Cell::from(report.id.clone()),
            Cell::from(report.target_id.clone()),
            Cell::from(report.physical_damage.label()).style(Style::default().fg(damage_color(report.physical_damage))),
            Cell::from(report.functional_damage.label()),
            Cell::from(format!("{}%", report.confidence)),
            Cell::from(report.recommendation.label())
                .style(Style::default().fg(recommendation_color(report.recommendation))),
            Cell::from(format!("v{}", report.version)),
            Cell::from(report.updated_at.format("%d %b %H:%MZ").to_string()),
        ])
    });
    let widths = [
        Constraint::Length(9),
        Constraint::Length(8),
        Constraint::Length(16),
        Constraint::Length(26),
        Constraint::Length(5),
        Constraint::Length(19),
        Constraint::Length(4),
        Constraint::Min(13),
    ];
    let table = Table::new(rows, widths)
        .header(header)
        .block(Block::default().title(titled("BDA Reports", reports)).borders(Borders::ALL))
        .highlight_style(Style::default().bg(Color::DarkGray));
    let mut table_state = TableState::default().with_selected(Some(selected));
    frame.render_stateful_widget(table, chunks[0], &mut table_state);

    let text = match reports.data.get(selected) {
        Some(report) => vec![
            Line::from(format!("Analyst: {}", report.analyst)),
            Line::from(""),
            Line::from(report.summary.clone()),
        ],
        None => vec![Line::from("No reports")],
    };
    frame.render_widget(
        Paragraph::new(text)
            .wrap(Wrap { trim: true })
            .block(Block::default().title(" Summary ").borders(Borders::ALL)),
        chunks[1],
    );
}

/// Draw the field-by-field comparison of two versions
pub fn draw_compare(frame: &mut Frame, area: Rect, state: &AppState) {
    let view = &state.compare;
    let area = with_error_line(frame, area, view.error.as_deref());
    let report = view.report_id.as_deref().unwrap_or("-");

    let Some(comparison) = state.comparison() else {
        let message = if view.report_id.is_none() {
            "Select a report on the BDA screen and press Enter".to_string()
        } else if view.loading {
            format!("Loading history for {}...", report)
        } else {
            format!("{} has fewer than two versions", report)
        };
        frame.render_widget(
            Paragraph::new(message).block(Block::default().title(" Version Comparison ").borders(Borders::ALL)),
            area,
        );
        return;
    };

    let old_label = comparison.old_version.map_or_else(|| "old".to_string(), |v| format!("v{}", v));
    let new_label = comparison.new_version.map_or_else(|| "new".to_string(), |v| format!("v{}", v));
    let header = Row::new(vec![
        Cell::from("Field"),
        Cell::from(old_label.clone()),
        Cell::from(new_label.clone()),
    ])
    .style(Style::default().fg(Color::Yellow));

    let rows = comparison
        .changes
        .iter()
        .filter(|change| change.changed || !view.changed_only)
        .map(|change| {
            let (old_style, new_style) = if change.changed {
                (
                    Style::default().fg(Color::Red).add_modifier(Modifier::CROSSED_OUT),
                    Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
                )
            } else {
                (Style::default().fg(Color::DarkGray), Style::default().fg(Color::DarkGray))
            };
            let marker = if change.changed { "* " } else { "  " };
            Row::new(vec![
                Cell::from(format!("{}{}", marker, change.label)),
                Cell::from(change.old_display.clone()).style(old_style),
                Cell::from(change.new_display.clone()).style(new_style),
            ])
        });

    let title = format!(
        " {} {} -> {}: {} of {} fields changed{} ",
        report,
        old_label,
        new_label,
        comparison.changed_fields,
        comparison.changes.len(),
        if view.changed_only { " (changed only)" } else { "" }
    );
    let widths = [Constraint::Length(24), Constraint::Percentage(40), Constraint::Percentage(40)];
    let table = Table::new(rows, widths).header(header).block(Block::default().title(title).borders(Borders::ALL));
    frame.render_widget(table, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::Screen;
    use crate::sample;
    use ratatui::backend::TestBackend;
    use targeting_core::types::Role;

    #[test]
    fn test_compare_renders_changed_count() {
        let mut state = AppState::new(Role::Analyst);
        state.screen = Screen::Compare;
        state.compare.report_id = Some("BDA-001".to_string());
        state.compare.versions = sample::history("BDA-001");
        state.compare.older = 0;
        state.compare.newer = 1;

        let comparison = state.comparison().unwrap();
        assert_eq!(comparison.changed_fields, 7);

        let mut terminal = Terminal::new(TestBackend::new(140, 30)).unwrap();
        terminal
            .draw(|frame| {
                let area = frame.size();
                draw_compare(frame, area, &state);
            })
            .unwrap();
    }
}
