//! Terminal UI rendering for the playground

use ratatui::{
    layout::{Constraint, Direction, Layout, Position, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph, Tabs},
    Frame,
};

use playground_core::{ExportFormat, Language, LayoutMode, Library, NoticeKind, Template};

use crate::tui::{Mode, Session};

struct Palette {
    surface0: Color,
    surface1: Color,
    text: Color,
    subtext: Color,
    red: Color,
    green: Color,
    blue: Color,
    mauve: Color,
    teal: Color,
}

// Catppuccin Mocha
const DARK: Palette = Palette {
    surface0: Color::Rgb(49, 50, 68),
    surface1: Color::Rgb(69, 71, 90),
    text: Color::Rgb(205, 214, 244),
    subtext: Color::Rgb(166, 173, 200),
    red: Color::Rgb(243, 139, 168),
    green: Color::Rgb(166, 227, 161),
    blue: Color::Rgb(137, 180, 250),
    mauve: Color::Rgb(203, 166, 247),
    teal: Color::Rgb(148, 226, 213),
};

// Catppuccin Latte
const LIGHT: Palette = Palette {
    surface0: Color::Rgb(204, 208, 218),
    surface1: Color::Rgb(188, 192, 204),
    text: Color::Rgb(76, 79, 105),
    subtext: Color::Rgb(108, 111, 133),
    red: Color::Rgb(210, 15, 57),
    green: Color::Rgb(64, 160, 43),
    blue: Color::Rgb(30, 102, 245),
    mauve: Color::Rgb(136, 57, 239),
    teal: Color::Rgb(23, 146, 153),
};

const GUTTER: u16 = 5;

fn palette(session: &Session) -> &'static Palette {
    if session.app.settings.dark_mode {
        &DARK
    } else {
        &LIGHT
    }
}

pub fn draw(frame: &mut Frame, session: &Session) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Title bar
            Constraint::Length(1), // Tabs
            Constraint::Min(0),    // Editor + libraries
            Constraint::Length(1), // Status bar
        ])
        .split(frame.area());

    draw_title_bar(frame, session, chunks[0]);
    draw_tabs(frame, session, chunks[1]);
    draw_main_area(frame, session, chunks[2]);
    draw_status_bar(frame, session, chunks[3]);

    // Draw popups/overlays
    match session.mode {
        Mode::TemplatePicker => draw_template_picker(frame, session),
        Mode::LibraryPicker => draw_library_picker(frame, session),
        Mode::ExportPicker => draw_export_picker(frame, session),
        Mode::Help => draw_help(frame, session),
        Mode::Edit => {}
    }
}

fn draw_title_bar(frame: &mut Frame, session: &Session, area: Rect) {
    let colors = palette(session);
    let dirty = if session.app.buffers.is_dirty() { " *" } else { "" };
    let title_text = format!(
        " Playground{} - run #{} - preview: {}",
        dirty,
        session.app.runs(),
        session.preview_path.display()
    );

    let title_bar = Paragraph::new(title_text)
        .style(Style::default().fg(colors.text).bg(colors.surface0));

    frame.render_widget(title_bar, area);
}

fn draw_tabs(frame: &mut Frame, session: &Session, area: Rect) {
    let colors = palette(session);
    let titles: Vec<&str> = Language::all().iter().map(Language::label).collect();
    let selected = Language::all()
        .iter()
        .position(|l| *l == session.app.active)
        .unwrap_or(0);

    let tabs = Tabs::new(titles)
        .select(selected)
        .style(Style::default().fg(colors.subtext))
        .highlight_style(Style::default().fg(colors.blue).add_modifier(Modifier::BOLD));

    frame.render_widget(tabs, area);
}

fn draw_main_area(frame: &mut Frame, session: &Session, area: Rect) {
    let direction = match session.app.settings.layout {
        LayoutMode::Horizontal => Direction::Horizontal,
        LayoutMode::Vertical => Direction::Vertical,
    };
    let side = match session.app.settings.layout {
        LayoutMode::Horizontal => Constraint::Length(30),
        LayoutMode::Vertical => Constraint::Length(6),
    };

    let chunks = Layout::default()
        .direction(direction)
        .constraints([Constraint::Min(0), side])
        .split(area);

    draw_editor(frame, session, chunks[0]);
    draw_libraries(frame, session, chunks[1]);
}

fn draw_editor(frame: &mut Frame, session: &Session, area: Rect) {
    let colors = palette(session);
    let editor = session.app.active_editor();

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(colors.blue))
        .title(format!("{} ({})", editor.language.label(), editor.language.file_name()));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    // Calculate scroll offset based on cursor
    let (row, col) = editor.cursor_pos();
    let visible_height = inner.height as usize;
    let scroll_offset = if visible_height > 0 && row >= visible_height {
        row - visible_height + 1
    } else {
        0
    };

    let lines: Vec<Line> = editor
        .content
        .split('\n')
        .enumerate()
        .skip(scroll_offset)
        .take(visible_height)
        .map(|(i, text)| {
            Line::from(vec![
                Span::styled(
                    format!("{:>4} ", i + 1),
                    Style::default().fg(colors.subtext),
                ),
                Span::styled(text.to_string(), Style::default().fg(colors.text)),
            ])
        })
        .collect();

    frame.render_widget(Paragraph::new(lines), inner);

    if session.mode == Mode::Edit && inner.width > GUTTER {
        let x = cursor_x(inner, col);
        let y = inner.y + (row - scroll_offset) as u16;
        frame.set_cursor_position(Position::new(x, y));
    }
}

/// Screen column of the cursor, clamped to the last cell of the text area
fn cursor_x(inner: Rect, col: usize) -> u16 {
    let max = inner.width.saturating_sub(GUTTER + 1);
    inner.x + GUTTER + u16::try_from(col).unwrap_or(u16::MAX).min(max)
}

fn draw_libraries(frame: &mut Frame, session: &Session, area: Rect) {
    let colors = palette(session);
    let enabled: Vec<ListItem> = Library::catalog()
        .iter()
        .filter(|lib| session.app.libraries.is_enabled(lib.id))
        .map(|lib| ListItem::new(format!(" {}", lib.name)).style(Style::default().fg(colors.teal)))
        .collect();

    let count = enabled.len();
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(colors.subtext))
        .title(format!("Libraries ({})", count));

    if enabled.is_empty() {
        let hint = Paragraph::new(" Ctrl+L to add").style(Style::default().fg(colors.subtext));
        frame.render_widget(hint.block(block), area);
    } else {
        frame.render_widget(List::new(enabled).block(block), area);
    }
}

fn draw_status_bar(frame: &mut Frame, session: &Session, area: Rect) {
    let colors = palette(session);
    let mode_str = match session.mode {
        Mode::Edit => "EDIT",
        Mode::Help => "HELP",
        Mode::TemplatePicker => "TEMPLATE",
        Mode::LibraryPicker => "LIBRARY",
        Mode::ExportPicker => "EXPORT",
    };

    let help_hint = "^R run | ^S save | ^N next tab | ^T templates | ^E export | F1 help";

    let (status, fg) = match &session.app.notice {
        Some(notice) => {
            let fg = match notice.kind {
                NoticeKind::Success => colors.green,
                NoticeKind::Error => colors.red,
                NoticeKind::Info => colors.text,
            };
            (notice.text.as_str(), fg)
        }
        None => (help_hint, colors.subtext),
    };

    let status_bar = Paragraph::new(format!(" {} | {}", mode_str, status))
        .style(Style::default().fg(fg).bg(colors.surface0));

    frame.render_widget(status_bar, area);
}

fn draw_picker(frame: &mut Frame, session: &Session, title: &str, items: Vec<String>) {
    let colors = palette(session);
    let area = centered_rect(44, items.len() as u16 + 2, frame.area());
    frame.render_widget(Clear, area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(colors.mauve))
        .title(title.to_string());

    let items: Vec<ListItem> = items
        .into_iter()
        .enumerate()
        .map(|(i, label)| {
            let selected = i == session.picker_selected;
            let marker = if selected { ">" } else { " " };
            let style = if selected {
                Style::default().fg(colors.text).bg(colors.surface1)
            } else {
                Style::default().fg(colors.text)
            };
            ListItem::new(format!("{} {}", marker, label)).style(style)
        })
        .collect();

    frame.render_widget(List::new(items).block(block), area);
}

fn draw_template_picker(frame: &mut Frame, session: &Session) {
    let items = Template::all().iter().map(|t| t.name.to_string()).collect();
    draw_picker(frame, session, "Load Template (Enter, Esc)", items);
}

fn draw_library_picker(frame: &mut Frame, session: &Session) {
    let items = Library::catalog()
        .iter()
        .map(|lib| {
            let mark = if session.app.libraries.is_enabled(lib.id) { "[x]" } else { "[ ]" };
            format!("{} {}", mark, lib.name)
        })
        .collect();
    draw_picker(frame, session, "Libraries (Space toggles, Esc)", items);
}

fn draw_export_picker(frame: &mut Frame, session: &Session) {
    let items = ExportFormat::all()
        .iter()
        .map(|format| format!("{:<5} -> {}", format.as_str(), format.file_name()))
        .collect();
    draw_picker(frame, session, "Export (Enter, Esc)", items);
}

fn draw_help(frame: &mut Frame, session: &Session) {
    let colors = palette(session);
    let area = centered_rect(60, 20, frame.area());
    frame.render_widget(Clear, area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(colors.blue))
        .title("Help (press any key to close)");

    let heading = Style::default().fg(colors.mauve).add_modifier(Modifier::BOLD);
    let help_text = vec![
        Line::from(Span::styled("Editing", heading)),
        Line::from("  Shift+Tab / ^N   Next tab (HTML, CSS, JavaScript)"),
        Line::from("  ^Left / ^Right   Word back/forward"),
        Line::from("  PgUp / PgDn      Top/bottom of buffer"),
        Line::from("  ^F               Format with prettier"),
        Line::from(""),
        Line::from(Span::styled("Preview", heading)),
        Line::from("  ^R               Run now (also 500 ms after typing)"),
        Line::from("  ^L               Toggle libraries"),
        Line::from(""),
        Line::from(Span::styled("Project", heading)),
        Line::from("  ^S               Save"),
        Line::from("  ^T               Load template"),
        Line::from("  ^E               Export (html, json, text, zip)"),
        Line::from("  ^D / ^O          Dark mode / layout"),
        Line::from("  ^Q               Quit"),
        Line::from(""),
        Line::from(Span::styled("Press any key to close", Style::default().fg(colors.subtext))),
    ];

    let paragraph = Paragraph::new(help_text).block(block);
    frame.render_widget(paragraph, area);
}

fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width.min(area.width), height.min(area.height))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cursor_column_is_clamped() {
        let inner = Rect::new(2, 1, 40, 10);
        assert_eq!(cursor_x(inner, 0), 2 + GUTTER);
        assert_eq!(cursor_x(inner, 3), 2 + GUTTER + 3);
        assert_eq!(cursor_x(inner, 500), 2 + 39);
        assert_eq!(cursor_x(inner, 65_536), 2 + 39);
    }
}
