//! Terminal UI rendering for Tagline Web
//!
//! This module mirrors tagline-cli's UI but uses ratzilla's rendering.

use ratzilla::ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Gauge, List, ListItem, Paragraph, Wrap},
    Frame,
};

use tagline_core::{App, EditorCell, Mode, Tag};

// Catppuccin Mocha colors
const SURFACE0: Color = Color::Rgb(49, 50, 68);
const SURFACE1: Color = Color::Rgb(69, 71, 90);
const TEXT: Color = Color::Rgb(205, 214, 244);
const SUBTEXT0: Color = Color::Rgb(166, 173, 200);
const RED: Color = Color::Rgb(243, 139, 168);
const BLUE: Color = Color::Rgb(137, 180, 250);
const MAUVE: Color = Color::Rgb(203, 166, 247);

pub fn draw(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Title bar
            Constraint::Length(1), // Progress
            Constraint::Min(0),    // Main content
            Constraint::Length(1), // Status bar
        ])
        .split(frame.area());

    draw_title_bar(frame, app, chunks[0]);
    draw_progress(frame, app, chunks[1]);
    draw_main_area(frame, app, chunks[2]);
    draw_status_bar(frame, app, chunks[3]);

    match app.mode {
        Mode::Alert => draw_alert(frame, app),
        Mode::Help => draw_help(frame),
        _ => {}
    }
}

fn tag_color(tag: Tag) -> Color {
    let (r, g, b) = tag.rgb();
    Color::Rgb(r, g, b)
}

fn draw_title_bar(frame: &mut Frame, app: &App, area: Rect) {
    let indicator = app.session.indicator();
    let tag_style = match app.session.active_tag() {
        Some(tag) => Style::default().fg(SURFACE0).bg(tag_color(tag)),
        None => Style::default().fg(SUBTEXT0).bg(SURFACE0),
    };

    let page_field = if app.mode == Mode::PageJump {
        format!("[{}_]", app.jump_field())
    } else {
        format!("[{}]", app.jump_field())
    };

    let line = Line::from(vec![
        Span::raw(format!(
            " Tagline (Web) - {} page {}/{} ",
            app.title(),
            page_field,
            app.session.store.total_pages()
        )),
        Span::styled(format!(" {} ", indicator.label), tag_style),
    ]);

    let title_bar = Paragraph::new(line).style(Style::default().fg(TEXT).bg(SURFACE0));
    frame.render_widget(title_bar, area);
}

fn draw_progress(frame: &mut Frame, app: &App, area: Rect) {
    let progress = app.session.store.progress();
    let gauge = Gauge::default()
        .gauge_style(Style::default().fg(BLUE).bg(SURFACE0))
        .ratio(progress.ratio().clamp(0.0, 1.0))
        .label(format!("{}%", progress.percent()));
    frame.render_widget(gauge, area);
}

fn draw_main_area(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Min(0),     // Editor
            Constraint::Length(32), // Sidebar
        ])
        .split(area);

    draw_editor(frame, app, chunks[0]);
    draw_sidebar(frame, app, chunks[1]);
}

fn draw_editor(frame: &mut Frame, app: &App, area: Rect) {
    let mode_indicator = match app.mode {
        Mode::Visual => " [VISUAL]",
        _ => "",
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(BLUE))
        .title(format!("Page{}", mode_indicator));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let lines: Vec<Line> = app
        .editor_rows()
        .into_iter()
        .map(|row| Line::from(row.into_iter().map(cell_span).collect::<Vec<_>>()))
        .collect();

    let paragraph = Paragraph::new(lines).wrap(Wrap { trim: false });
    frame.render_widget(paragraph, inner);
}

fn cell_span(cell: EditorCell) -> Span<'static> {
    let mut style = match cell.tag {
        Some(tag) => Style::default()
            .fg(tag_color(tag))
            .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
        None => Style::default().fg(TEXT),
    };
    if cell.selected {
        style = style.bg(SURFACE1);
    }
    if cell.caret {
        style = style.add_modifier(Modifier::REVERSED);
    }
    Span::styled(cell.ch.to_string(), style)
}

fn draw_sidebar(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(6), Constraint::Min(0)])
        .split(area);

    let legend: Vec<ListItem> = Tag::all()
        .iter()
        .enumerate()
        .map(|(i, tag)| {
            let active = app.session.active_tag() == Some(*tag);
            let marker = if active { ">" } else { " " };
            let mut style = Style::default().fg(tag_color(*tag));
            if active {
                style = style.bg(SURFACE1).add_modifier(Modifier::BOLD);
            }
            ListItem::new(format!("{} {} {} ({})", marker, i + 1, tag.name(), tag.label()))
                .style(style)
        })
        .collect();

    let legend = List::new(legend).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(SUBTEXT0))
            .title("Tags"),
    );
    frame.render_widget(legend, chunks[0]);

    let spans = app.active_page().map(|p| p.spans()).unwrap_or(&[]);
    let under_cursor = app.span_under_cursor().map(|s| s.range);
    let items: Vec<ListItem> = spans
        .iter()
        .map(|span| {
            let preview: String = span.text.chars().take(18).collect::<String>().replace('\n', " ");
            let mut style = Style::default().fg(tag_color(span.tag));
            if under_cursor == Some(span.range) {
                style = style.bg(SURFACE1).add_modifier(Modifier::BOLD);
            }
            ListItem::new(format!(
                "{:>3}-{:<3} \"{}\"",
                span.range.start_offset, span.range.end_offset, preview
            ))
            .style(style)
        })
        .collect();

    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(SUBTEXT0))
            .title(format!("Spans ({})", spans.len())),
    );
    frame.render_widget(list, chunks[1]);
}

fn draw_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let mode_str = match app.mode {
        Mode::Normal => "NORMAL",
        Mode::Visual => "VISUAL",
        Mode::PageJump => "GOTO",
        Mode::Alert => "ALERT",
        Mode::Help => "HELP",
    };

    let status = app.status_message.as_deref().unwrap_or("");

    let help_hint = "1-4 tag | v select | q/e page | d delete | r reset | s export | ? help";

    let status_text = format!(
        " {} | {}",
        mode_str,
        if status.is_empty() { help_hint } else { status },
    );

    let status_bar =
        Paragraph::new(status_text).style(Style::default().fg(SUBTEXT0).bg(SURFACE0));

    frame.render_widget(status_bar, area);
}

fn draw_alert(frame: &mut Frame, app: &App) {
    let area = centered_rect(50, 5, frame.area());
    frame.render_widget(Clear, area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(RED))
        .title("Cannot continue (press any key)");

    let message = app.alert.as_deref().unwrap_or("");
    let paragraph = Paragraph::new(message)
        .style(Style::default().fg(TEXT))
        .wrap(Wrap { trim: true })
        .block(block);
    frame.render_widget(paragraph, area);
}

fn draw_help(frame: &mut Frame) {
    let area = centered_rect(60, 22, frame.area());
    frame.render_widget(Clear, area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(BLUE))
        .title("Help (press any key to close)");

    let heading = Style::default().fg(MAUVE).add_modifier(Modifier::BOLD);
    let help_text = vec![
        Line::from(Span::styled("Pages", heading)),
        Line::from("  q / Left    Previous page"),
        Line::from("  e / Right   Next page"),
        Line::from("  g           Jump to page number"),
        Line::from("  d           Delete current page"),
        Line::from(""),
        Line::from(Span::styled("Tagging", heading)),
        Line::from("  1-4         FIRMA / POZITIF / NOTR / NEGATIF"),
        Line::from("  r           Clear tag and this page's spans"),
        Line::from("  h/l j/k w/b Move the caret"),
        Line::from("  v           Start selection"),
        Line::from("  Enter / a   Tag the selection"),
        Line::from("  Esc         Cancel selection"),
        Line::from(""),
        Line::from(Span::styled("Export", heading)),
        Line::from("  s           Download labeled_dataset.json and upload"),
        Line::from(""),
        Line::from(Span::styled("Press any key to close", Style::default().fg(SUBTEXT0))),
    ];

    let paragraph = Paragraph::new(help_text).block(block);
    frame.render_widget(paragraph, area);
}

fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width.min(area.width), height.min(area.height))
}
