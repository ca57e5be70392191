use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Cell, List, ListItem, ListState, Paragraph, Row, Table, TableState, Wrap},
};
use recyfind_core::{
    location::{Location, format_distance},
    state::DistanceFilter,
};

use crate::app::{App, Screen};

pub(crate) fn draw(frame: &mut Frame<'_>, app: &App) {
    let area = frame.area();

    // Outer layout: title, main content, status line
    let layout_chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(3),
        ])
        .split(area);

    let chunks = layout_chunks.as_ref();
    let [header_area, content_area, status_area] = chunks else {
        return;
    };

    // Title / header
    let now = app.state.now().format("%A %H:%M");
    let header = Paragraph::new(format!("recyfind – recycling centers near you · {now}"))
        .block(Block::default().borders(Borders::ALL).title("Recyfind"));
    frame.render_widget(header, *header_area);

    // Main screen
    match app.screen {
        Screen::RegionSelect => draw_region_select(frame, app, *content_area),
        Screen::CenterList => draw_center_list(frame, app, *content_area),
        Screen::CenterDetail => draw_center_detail(frame, app, *content_area),
    }

    // Status bar
    let nav_hint = match app.screen {
        Screen::RegionSelect => "↑/↓ move · Enter select region · q/Ctrl-C quit",
        Screen::CenterList => {
            "↑/↓ move · Enter details · o open filter · d distance filter · r refresh · Esc back · q quit"
        }
        Screen::CenterDetail => "Esc/←/b back to list · r refresh · q/Ctrl-C quit",
    };

    let status_text = match &app.error_message {
        Some(msg) => format!("{msg} · {nav_hint}"),
        None => nav_hint.to_owned(),
    };

    let status_style = if app.error_message.is_some() {
        Style::default().fg(Color::Red)
    } else {
        Style::default()
    };

    let status = Paragraph::new(status_text)
        .block(Block::default().borders(Borders::ALL).title("Status"))
        .style(status_style)
        .wrap(Wrap { trim: true });

    frame.render_widget(status, *status_area);
}

fn draw_region_select(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let items = app
        .regions
        .iter()
        .enumerate()
        .map(|(idx, (_id, name))| {
            let prefix = if idx == app.region_list_index {
                "> "
            } else {
                "  "
            };
            ListItem::new(format!("{prefix}{name}"))
        })
        .collect::<Vec<ListItem<'_>>>();

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Select region (↑/↓, Enter)"),
        )
        .highlight_style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        );

    let mut state = ListState::default();
    if !app.regions.is_empty() {
        state.select(Some(app.region_list_index));
    }
    frame.render_stateful_widget(list, area, &mut state);
}

fn filter_label(app: &App) -> String {
    let filters = app.state.filters();
    let distance = match (filters.distance, app.state.origin()) {
        (DistanceFilter::All, _) => "any distance".to_owned(),
        (DistanceFilter::Within(miles), Some(_)) => format!("within {}", format_distance(miles)),
        (DistanceFilter::Within(miles), None) => {
            format!("within {} (no coordinates)", format_distance(miles))
        }
    };
    format!("{} · {distance}", filters.open.label())
}

fn distance_label(app: &App, center: &Location) -> String {
    app.state
        .distance_to(center)
        .map_or_else(|| "–".to_owned(), format_distance)
}

fn draw_center_list(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let title = format!(
        "{} · {} of {} centers · {}",
        app.region_name(),
        app.state.recycling_centers().len(),
        app.state.all_centers().len(),
        filter_label(app)
    );

    if app.state.recycling_centers().is_empty() {
        let paragraph = Paragraph::new("No centers match the current filters.")
            .block(Block::default().borders(Borders::ALL).title(title))
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, area);
        return;
    }

    let now = app.state.now();
    let rows = app.state.recycling_centers().iter().map(|center| {
        let open = center.available_at(&now);
        let style = if open {
            Style::default().fg(Color::Green)
        } else {
            Style::default().fg(Color::Gray)
        };

        Row::new(vec![
            Cell::from(center.full_name()),
            Cell::from(distance_label(app, center)),
            Cell::from(if open { "open" } else { "closed" }),
            Cell::from(center.hours_today(&now)),
        ])
        .style(style)
    });

    let column_widths = [
        Constraint::Min(24),
        Constraint::Length(10),
        Constraint::Length(8),
        Constraint::Min(20),
    ];

    let table = Table::new(rows, column_widths)
        .header(
            Row::new(vec!["Center", "Distance", "Now", "Today"])
                .style(Style::default().add_modifier(Modifier::BOLD)),
        )
        .block(Block::default().borders(Borders::ALL).title(title))
        .row_highlight_style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
        .column_spacing(1);

    let mut state = TableState::default();
    state.select(Some(app.center_list_index));
    frame.render_stateful_widget(table, area, &mut state);
}

fn draw_center_detail(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let Some(center) = app.state.selected_center() else {
        let paragraph = Paragraph::new("This center is no longer in the list.")
            .block(Block::default().borders(Borders::ALL).title("Center"))
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, area);
        return;
    };

    let now = app.state.now();
    let field = |label: &'static str, value: String| {
        Line::from(vec![
            Span::styled(format!("{label:<10}"), Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(value),
        ])
    };

    let mut lines = vec![
        field("Address", center.address().unwrap_or("–").to_owned()),
        field("Distance", distance_label(app, center)),
        field("Today", center.hours_today(&now)),
        field(
            "Now",
            if center.available_at(&now) {
                "open".to_owned()
            } else {
                "closed".to_owned()
            },
        ),
        field("Hours", center.hours_summary()),
    ];
    if !center.schedule().is_empty() {
        lines.push(field("Weekly", center.full_hours()));
    }
    if let Some(location) = center.location() {
        lines.push(field("Where", location.to_owned()));
    }
    if let Some(description) = center.description() {
        lines.push(Line::raw(""));
        lines.push(Line::raw(description.to_owned()));
    }

    let title = format!("{} (Esc/←/b to go back)", center.full_name());
    let paragraph = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title(title))
        .wrap(Wrap { trim: true });
    frame.render_widget(paragraph, area);
}
