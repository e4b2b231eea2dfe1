//! Terminal UI rendering.
//!
//! All drawing logic lives here, separated from application state ([`App`])
//! and input handling ([`crate::input`]).  Nothing in this module mutates
//! anything except the list widgets' scroll state.
//!
//! ## For contributors
//!
//! * The layout is a header with the view tabs, the active view, and a
//!   two-line footer (status + data credit / API key notice).
//! * Views with no data draw a placeholder instead of an empty box; the
//!   gallery additionally tells apart searching, failure, no results and
//!   no search yet.
//! * [`ratatui`] is the TUI framework; see its docs for widget details.

use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, List, ListItem, Paragraph, Tabs, Wrap},
    Frame,
};

use crate::app::{App, SearchState, View};
use crate::source::{GalleryItem, NeoRecord};

const ACCENT: Color = Color::Magenta;

/// Draw the complete UI for one frame.
pub fn draw(app: &mut App, frame: &mut Frame) {
    let [header_area, main_area, footer_area] = Layout::vertical([
        Constraint::Length(3),
        Constraint::Min(1),
        Constraint::Length(2),
    ])
    .areas(frame.area());

    draw_tabs(app, frame, header_area);

    if app.loading && app.editing {
        let [search_area, loading_area] =
            Layout::vertical([Constraint::Length(3), Constraint::Min(1)]).areas(main_area);
        draw_search_box(app, frame, search_area);
        draw_loading(frame, loading_area);
    } else if app.loading {
        draw_loading(frame, main_area);
    } else {
        match app.view {
            View::Apod => draw_apod(app, frame, main_area),
            View::Gallery => draw_gallery(app, frame, main_area),
            View::Neo => draw_neo(app, frame, main_area),
        }
    }

    draw_footer(app, frame, footer_area);
}

fn draw_tabs(app: &App, frame: &mut Frame, area: Rect) {
    let titles: Vec<Line> = View::ALL
        .iter()
        .map(|v| Line::from(format!(" {} {} ", v.index() + 1, v.title())))
        .collect();

    let tabs = Tabs::new(titles)
        .block(
            Block::default()
                .title(" NASA Dashboard ")
                .borders(Borders::ALL),
        )
        .select(app.view.index())
        .highlight_style(
            Style::default()
                .fg(Color::White)
                .bg(ACCENT)
                .add_modifier(Modifier::BOLD),
        );
    frame.render_widget(tabs, area);
}

fn draw_loading(frame: &mut Frame, area: Rect) {
    let text = Paragraph::new("Loading NASA data…")
        .alignment(Alignment::Center)
        .style(Style::default().fg(ACCENT).add_modifier(Modifier::BOLD))
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(text, area);
}

/// A bordered box with a centred, dimmed message.
fn draw_placeholder(frame: &mut Frame, area: Rect, title: &str, msg: &str) {
    let p = Paragraph::new(msg)
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::DarkGray))
        .block(
            Block::default()
                .title(format!(" {title} "))
                .borders(Borders::ALL),
        );
    frame.render_widget(p, area);
}

// ---------------------------------------------------------------------------
// Picture of the day
// ---------------------------------------------------------------------------

fn draw_apod(app: &App, frame: &mut Frame, area: Rect) {
    let Some(apod) = &app.apod else {
        draw_placeholder(
            frame,
            area,
            "Astronomy Picture of the Day",
            "The picture of the day could not be loaded.",
        );
        return;
    };

    let mut lines = vec![
        Line::from(Span::styled(
            apod.title.as_str(),
            Style::default().fg(ACCENT).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            apod.date.format("%Y-%m-%d").to_string(),
            Style::default().fg(Color::DarkGray),
        )),
        Line::from(vec![
            Span::styled(format!("[{}] ", apod.media_kind.label()), Style::default().fg(Color::Cyan)),
            Span::raw(apod.media_url.as_str()),
        ]),
        Line::raw(""),
        Line::raw(apod.explanation.as_str()),
    ];
    if let Some(c) = &apod.copyright {
        lines.push(Line::raw(""));
        lines.push(Line::from(Span::styled(
            format!("© {c}"),
            Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC),
        )));
    }

    let p = Paragraph::new(Text::from(lines))
        .wrap(Wrap { trim: true })
        .scroll((app.apod_scroll, 0))
        .block(
            Block::default()
                .title(" Astronomy Picture of the Day ")
                .borders(Borders::ALL),
        );
    frame.render_widget(p, area);
}

// ---------------------------------------------------------------------------
// Gallery
// ---------------------------------------------------------------------------

fn draw_gallery(app: &mut App, frame: &mut Frame, area: Rect) {
    let [search_area, body_area] =
        Layout::vertical([Constraint::Length(3), Constraint::Min(1)]).areas(area);

    draw_search_box(app, frame, search_area);

    let empty_msg = match app.search_state {
        SearchState::InProgress => Some("Searching NASA archives…"),
        SearchState::NotAttempted => Some("No search yet. Press / to search."),
        SearchState::Failed => Some("The image search failed. Try again with /."),
        SearchState::Done if app.gallery.is_empty() => {
            Some("No images found. Try a different search term!")
        }
        SearchState::Done => None,
    };
    if let Some(msg) = empty_msg {
        draw_placeholder(frame, body_area, "NASA Image Gallery", msg);
        return;
    }

    let [list_area, detail_area] =
        Layout::horizontal([Constraint::Percentage(55), Constraint::Percentage(45)])
            .areas(body_area);

    let rows: Vec<ListItem> = app.gallery.visible_items().iter().map(gallery_row).collect();

    let more = if app.gallery.has_more() {
        format!(
            " m: load more ({} of {}) ",
            app.gallery.visible_count(),
            app.gallery.total()
        )
    } else {
        format!(" {} of {} ", app.gallery.visible_count(), app.gallery.total())
    };

    let list = List::new(rows)
        .block(
            Block::default()
                .title(format!(" \"{}\" ", app.query))
                .title_bottom(Line::from(more).right_aligned())
                .borders(Borders::ALL),
        )
        .highlight_style(
            Style::default()
                .add_modifier(Modifier::BOLD)
                .bg(Color::DarkGray),
        )
        .highlight_symbol("▸ ");
    frame.render_stateful_widget(list, list_area, &mut app.gallery_list);

    draw_image_detail(app.selected_image(), frame, detail_area);
}

fn draw_search_box(app: &App, frame: &mut Frame, area: Rect) {
    let (text, style, title) = if app.editing {
        (
            format!("{}█", app.input),
            Style::default().fg(Color::White),
            " Search (Enter: go, Esc: cancel) ",
        )
    } else {
        (
            "mars, hubble, astronaut, galaxy…".to_string(),
            Style::default().fg(Color::DarkGray),
            " Search NASA images (/) ",
        )
    };
    let border = if app.editing { ACCENT } else { Color::Reset };
    let p = Paragraph::new(text).style(style).block(
        Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border)),
    );
    frame.render_widget(p, area);
}

fn gallery_row(item: &GalleryItem) -> ListItem<'_> {
    let date = item
        .created
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "unknown date".into());

    ListItem::new(Line::from(vec![
        Span::styled(format!("{date:<12}"), Style::default().fg(Color::DarkGray)),
        Span::raw(" "),
        Span::styled(item.title.as_str(), Style::default().fg(Color::White)),
        Span::raw("  "),
        Span::styled(format!("[{}]", item.center), Style::default().fg(Color::Cyan)),
    ]))
}

fn draw_image_detail(item: Option<&GalleryItem>, frame: &mut Frame, area: Rect) {
    let block = Block::default().title(" Details ").borders(Borders::ALL);
    let Some(item) = item else {
        frame.render_widget(block, area);
        return;
    };

    let mut lines = vec![
        Line::from(Span::styled(
            item.title.as_str(),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(item.center.as_str(), Style::default().fg(Color::Cyan))),
        Line::from(Span::styled(
            item.thumbnail_url.as_str(),
            Style::default().fg(Color::Blue).add_modifier(Modifier::UNDERLINED),
        )),
        Line::raw(""),
    ];
    if let Some(desc) = &item.description {
        lines.push(Line::raw(desc.as_str()));
    }

    let p = Paragraph::new(Text::from(lines))
        .wrap(Wrap { trim: true })
        .block(block);
    frame.render_widget(p, area);
}

// ---------------------------------------------------------------------------
// Near earth objects
// ---------------------------------------------------------------------------

fn draw_neo(app: &mut App, frame: &mut Frame, area: Rect) {
    let Some(neo) = &app.neo else {
        draw_placeholder(
            frame,
            area,
            "Near Earth Objects Today",
            "The near-earth-object feed could not be loaded.",
        );
        return;
    };

    let [stats_area, body_area] =
        Layout::vertical([Constraint::Length(3), Constraint::Min(1)]).areas(area);
    let [total_area, hazard_area, date_area] = Layout::horizontal([
        Constraint::Ratio(1, 3),
        Constraint::Ratio(1, 3),
        Constraint::Ratio(1, 3),
    ])
    .areas(stats_area);

    stat_card(frame, total_area, "Total Objects", &neo.total_count.to_string(), Color::Blue);
    stat_card(
        frame,
        hazard_area,
        "Potentially Hazardous",
        &neo.hazardous_count.to_string(),
        Color::Red,
    );
    stat_card(
        frame,
        date_area,
        "Date",
        &neo.date.format("%Y-%m-%d").to_string(),
        Color::Blue,
    );

    if neo.records.is_empty() {
        draw_placeholder(frame, body_area, "Objects", "No objects to show.");
        return;
    }

    let [list_area, detail_area] =
        Layout::horizontal([Constraint::Percentage(45), Constraint::Percentage(55)])
            .areas(body_area);

    let rows: Vec<ListItem> = neo.records.iter().map(neo_row).collect();
    let selected = app.neo_list.selected().and_then(|i| neo.records.get(i)).cloned();

    let list = List::new(rows)
        .block(Block::default().title(" Objects ").borders(Borders::ALL))
        .highlight_style(
            Style::default()
                .add_modifier(Modifier::BOLD)
                .bg(Color::DarkGray),
        )
        .highlight_symbol("▸ ");
    frame.render_stateful_widget(list, list_area, &mut app.neo_list);

    draw_neo_detail(selected.as_ref(), frame, detail_area);
}

fn stat_card(frame: &mut Frame, area: Rect, label: &str, value: &str, color: Color) {
    let p = Paragraph::new(Span::styled(
        value.to_string(),
        Style::default().fg(color).add_modifier(Modifier::BOLD),
    ))
    .alignment(Alignment::Center)
    .block(
        Block::default()
            .title(format!(" {label} "))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(color)),
    );
    frame.render_widget(p, area);
}

fn neo_row(neo: &NeoRecord) -> ListItem<'_> {
    let mut spans = vec![Span::styled(neo.name.as_str(), Style::default().fg(Color::White))];
    if neo.is_hazardous {
        spans.push(Span::raw("  "));
        spans.push(Span::styled(
            "⚠ Hazardous",
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        ));
    }
    ListItem::new(Line::from(spans))
}

fn draw_neo_detail(neo: Option<&NeoRecord>, frame: &mut Frame, area: Rect) {
    let block = Block::default().title(" Details ").borders(Borders::ALL);
    let Some(neo) = neo else {
        frame.render_widget(block, area);
        return;
    };

    let label = |s: &'static str| Span::styled(format!("{s:<20}"), Style::default().fg(Color::DarkGray));
    let lines = vec![
        Line::from(Span::styled(
            neo.name.as_str(),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::raw(""),
        Line::from(vec![
            label("Diameter (m)"),
            Span::raw(format!(
                "{} - {}",
                neo.diameter_m_min.round(),
                neo.diameter_m_max.round()
            )),
        ]),
        Line::from(vec![
            label("Velocity (km/h)"),
            Span::raw(group_thousands(neo.close_approach.velocity_kmh)),
        ]),
        Line::from(vec![
            label("Miss distance (km)"),
            Span::raw(group_thousands(neo.close_approach.miss_distance_km)),
        ]),
        Line::from(vec![
            label("Approach date"),
            Span::raw(neo.close_approach.date.format("%Y-%m-%d").to_string()),
        ]),
        Line::raw(""),
        Line::from(Span::styled(
            neo.jpl_url.as_str(),
            Style::default().fg(Color::Blue).add_modifier(Modifier::UNDERLINED),
        )),
    ];

    let p = Paragraph::new(Text::from(lines))
        .wrap(Wrap { trim: false })
        .block(block);
    frame.render_widget(p, area);
}

/// Round to a whole number and insert `,` every three digits.
fn group_thousands(value: f64) -> String {
    let rounded = value.round();
    let digits = format!("{}", rounded.abs() as u64);
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if rounded < 0.0 {
        out.push('-');
    }
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

// ---------------------------------------------------------------------------
// Footer
// ---------------------------------------------------------------------------

fn draw_footer(app: &App, frame: &mut Frame, area: Rect) {
    let [status_area, credit_area] =
        Layout::vertical([Constraint::Length(1), Constraint::Length(1)]).areas(area);

    let status = Paragraph::new(Line::from(vec![
        Span::raw(" "),
        Span::styled(app.status.as_str(), Style::default().fg(Color::Yellow)),
        Span::raw("  q: quit  1-3/Tab: view  /: search  m: more  ↑/↓: scroll"),
    ]));
    frame.render_widget(status, status_area);

    let mut credit = vec![Span::styled(
        " Data provided by NASA Open APIs",
        Style::default().fg(Color::DarkGray),
    )];
    if app.demo_key {
        credit.push(Span::styled(
            "  Using DEMO_KEY: requests are rate limited (get your own key at api.nasa.gov)",
            Style::default().fg(Color::Red),
        ));
    }
    frame.render_widget(Paragraph::new(Line::from(credit)), credit_area);
}
