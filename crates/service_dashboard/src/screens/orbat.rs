//! ORBAT tree screen.

use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Gauge, List, ListItem, ListState, Paragraph, Wrap},
};
use targeting_core::orbat::{AncestorWalk, OrbatTree, TreeRow};
use targeting_core::types::{Affiliation, ReadinessBand, Unit};

use super::{titled, with_error_line};
use crate::app::AppState;

fn affiliation_color(affiliation: Affiliation) -> Color {
    match affiliation {
        Affiliation::Blue => Color::LightBlue,
        Affiliation::Red => Color::LightRed,
    }
}

fn readiness_color(band: ReadinessBand) -> Color {
    match band {
        ReadinessBand::FullyMissionCapable => Color::Green,
        ReadinessBand::MissionCapable => Color::Cyan,
        ReadinessBand::Degraded => Color::Yellow,
        ReadinessBand::NotMissionCapable => Color::Red,
    }
}

/// Text of one tree row: indentation, expander, name and echelon.
pub fn row_label(row: &TreeRow<'_>) -> String {
    let marker = match (row.has_children, row.expanded) {
        (false, _) => " ",
        (true, false) => "+",
        (true, true) => "-",
    };
    let echelon = if row.unit.echelon.is_empty() {
        String::new()
    } else {
        format!(" [{}]", row.unit.echelon)
    };
    format!("{}{} {}{}", "  ".repeat(row.depth), marker, row.unit.name, echelon)
}

/// One-line summary of structural problems, if any
fn integrity_summary(tree: &OrbatTree) -> Option<String> {
    if tree.is_well_formed() {
        return None;
    }
    Some(format!(
        "Data integrity: {} orphaned, {} in cycles, {} duplicate ids (not shown)",
        tree.orphans().count(),
        tree.cycle_members().count(),
        tree.duplicates().len()
    ))
}

/// Draw the ORBAT screen
pub fn draw_orbat(frame: &mut Frame, area: Rect, state: &AppState) {
    let view = &state.orbat;
    let area = with_error_line(frame, area, state.units.error.as_deref());
    let area = with_error_line(frame, area, integrity_summary(&view.tree).as_deref());

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(area);

    let rows = state.orbat_rows();
    let color = affiliation_color(view.affiliation);
    let items: Vec<ListItem> = rows
        .iter()
        .map(|row| {
            let band = row.unit.readiness_band();
            ListItem::new(Line::from(vec![
                Span::styled(row_label(row), Style::default().fg(color)),
                Span::raw("  "),
                Span::styled(band.label(), Style::default().fg(readiness_color(band))),
            ]))
        })
        .collect();

    let title = titled(&format!("{} Forces", view.affiliation), &state.units);
    let list = List::new(items)
        .block(Block::default().title(title).borders(Borders::ALL))
        .highlight_style(Style::default().bg(Color::DarkGray));
    let mut list_state = ListState::default().with_selected(Some(view.selected));
    frame.render_stateful_widget(list, chunks[0], &mut list_state);

    match state.selected_unit() {
        Some(unit) => draw_unit_detail(frame, chunks[1], unit, &view.tree),
        None => frame.render_widget(
            Paragraph::new("No units").block(Block::default().title(" Unit ").borders(Borders::ALL)),
            chunks[1],
        ),
    }
}

fn draw_unit_detail(frame: &mut Frame, area: Rect, unit: &Unit, tree: &OrbatTree) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(0)])
        .split(area);

    let band = unit.readiness_band();
    let gauge = Gauge::default()
        .block(Block::default().title(" Readiness ").borders(Borders::ALL))
        .gauge_style(Style::default().fg(readiness_color(band)))
        .percent(u16::from(unit.readiness.min(100)))
        .label(format!("{}% {}", unit.readiness, band.label()));
    frame.render_widget(gauge, chunks[0]);

    // Breadcrumb root first.
    let walk = tree.ancestors(&unit.id);
    let mut chain: Vec<String> = walk
        .ancestors()
        .iter()
        .rev()
        .map(|id| tree.get(id).map_or_else(|| id.to_string(), |u| u.name.clone()))
        .collect();
    chain.push(unit.name.clone());
    let breadcrumb = match walk {
        AncestorWalk::Orphaned { missing, .. } => format!("? {} > {}", missing, chain.join(" > ")),
        _ => chain.join(" > "),
    };

    let list_line = |label: &str, items: &[String]| {
        Line::from(vec![
            Span::styled(format!("{:<14}", label), Style::default().fg(Color::Yellow)),
            Span::raw(if items.is_empty() { "-".to_string() } else { items.join(", ") }),
        ])
    };

    let text = vec![
        Line::from(Span::styled(unit.name.clone(), Style::default().add_modifier(Modifier::BOLD))),
        Line::from(Span::styled(breadcrumb, Style::default().fg(Color::DarkGray))),
        Line::from(""),
        Line::from(format!("Echelon:      {}", unit.echelon)),
        Line::from(format!("Subordinates: {}", tree.children(&unit.id).count())),
        list_line("Capabilities:", &unit.capabilities),
        list_line("Caveats:", &unit.caveats),
        list_line("Restrictions:", &unit.restrictions),
    ];
    frame.render_widget(
        Paragraph::new(text)
            .wrap(Wrap { trim: true })
            .block(Block::default().title(format!(" {} ", unit.id)).borders(Borders::ALL)),
        chunks[1],
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use targeting_core::orbat::ExpandedSet;

    #[test]
    fn test_row_label_indents_and_marks() {
        let tree = OrbatTree::build(vec![
            Unit::new("a", "Alpha", None, Affiliation::Blue),
            Unit::new("b", "Bravo", Some("a"), Affiliation::Blue),
        ]);
        let mut expanded = ExpandedSet::new();
        let rows = tree.visible_rows(Affiliation::Blue, &expanded);
        assert_eq!(row_label(&rows[0]), "+ Alpha");

        expanded.toggle("a");
        let rows = tree.visible_rows(Affiliation::Blue, &expanded);
        assert_eq!(row_label(&rows[0]), "- Alpha");
        assert_eq!(row_label(&rows[1]), "    Bravo");
    }

    #[test]
    fn test_integrity_summary_counts_problems() {
        let tree = OrbatTree::build(vec![
            Unit::new("a", "Alpha", Some("ghost"), Affiliation::Red),
            Unit::new("x", "X", Some("y"), Affiliation::Red),
            Unit::new("y", "Y", Some("x"), Affiliation::Red),
        ]);
        let summary = integrity_summary(&tree).unwrap();
        assert!(summary.contains("1 orphaned"));
        assert!(summary.contains("2 in cycles"));
    }
}
