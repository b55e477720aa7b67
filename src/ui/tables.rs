//! Submitted entries, one table per form type

use crate::app::App;
use crate::state::{schema_for, Entry, FormField, FormType};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame,
};

const ACTIONS_HEADER: &str = "Actions";
/// Borders plus header line
const TABLE_CHROME: u16 = 3;

/// Draw every non-empty form type as its own table
pub fn draw(frame: &mut Frame, area: Rect, app: &App) {
    let store = app.controller.store();
    if store.is_empty() {
        let content = Paragraph::new("No entries submitted yet.\nPress Esc to fill in a form.")
            .style(Style::default().fg(Color::DarkGray))
            .block(
                Block::default()
                    .title(" Submitted Entries ")
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::DarkGray)),
            );
        frame.render_widget(content, area);
        return;
    }

    let types = store.non_empty_types();

    let lens: Vec<usize> = types.iter().map(|&t| store.list_entries(t).len()).collect();
    let mut constraints: Vec<Constraint> = table_heights(&lens, area.height)
        .into_iter()
        .map(Constraint::Length)
        .collect();
    constraints.push(Constraint::Min(0));

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(area);

    let mut offset = 0;
    for (idx, &form_type) in types.iter().enumerate() {
        let entries = store.list_entries(form_type);
        let selected = app
            .selected_row
            .checked_sub(offset)
            .filter(|&row| row < entries.len());
        draw_table(frame, chunks[idx], form_type, entries, selected);
        offset += entries.len();
    }
}

/// Full height per table when everything fits; otherwise the space is
/// shared out smallest first and the taller tables scroll
fn table_heights(lens: &[usize], available: u16) -> Vec<u16> {
    let wanted: Vec<u16> = lens
        .iter()
        .map(|&len| {
            u16::try_from(len)
                .unwrap_or(u16::MAX)
                .saturating_add(TABLE_CHROME)
        })
        .collect();
    let total: u32 = wanted.iter().map(|&h| u32::from(h)).sum();
    if total <= u32::from(available) {
        return wanted;
    }

    let mut heights = wanted.clone();
    let mut order: Vec<usize> = (0..wanted.len()).collect();
    order.sort_by_key(|&idx| wanted[idx]);
    let mut remaining = available;
    for (done, &idx) in order.iter().enumerate() {
        let left = u16::try_from(order.len() - done).unwrap_or(u16::MAX);
        heights[idx] = wanted[idx].min(remaining / left);
        remaining -= heights[idx];
    }
    heights
}

fn draw_table(
    frame: &mut Frame,
    area: Rect,
    form_type: FormType,
    entries: &[Entry],
    selected: Option<usize>,
) {
    let schema = schema_for(form_type);

    let header_style = Style::default()
        .fg(Color::Cyan)
        .add_modifier(Modifier::BOLD);
    let header = Row::new(
        schema
            .iter()
            .map(|d| Cell::from(d.label))
            .chain(std::iter::once(Cell::from(ACTIONS_HEADER))),
    )
    .style(header_style);

    let rows = entries.iter().enumerate().map(|(idx, entry)| {
        let is_selected = selected == Some(idx);
        let cells = schema.iter().map(|descriptor| {
            let value = entry.record.get(descriptor.name).unwrap_or_default();
            Cell::from(FormField::new(descriptor, value).display_value())
        });
        let actions = if is_selected {
            Cell::from(Line::from(vec![
                Span::styled("[e]", Style::default().fg(Color::Cyan)),
                Span::raw("dit "),
                Span::styled("[d]", Style::default().fg(Color::Red)),
                Span::raw("elete"),
            ]))
        } else {
            Cell::from("")
        };
        let row = Row::new(cells.chain(std::iter::once(actions)));
        if is_selected {
            row.style(
                Style::default()
                    .bg(Color::DarkGray)
                    .add_modifier(Modifier::BOLD),
            )
        } else {
            row
        }
    });

    let mut widths = vec![Constraint::Fill(1); schema.len()];
    widths.push(Constraint::Length(14));

    let border_color = if selected.is_some() {
        Color::Cyan
    } else {
        Color::DarkGray
    };
    let table = Table::new(rows, widths).header(header).block(
        Block::default()
            .title(format!(" {} ({}) ", form_type.table_title(), entries.len()))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border_color)),
    );
    // The table scrolls its offset to keep the selected row in view
    let mut state = TableState::default().with_selected(selected);
    frame.render_stateful_widget(table, area, &mut state);
}
