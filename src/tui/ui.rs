use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use kube_wizard::wizard::{Menu, MenuId, Screen, StatusKind, Wizard};

const SELECTED_BG: Color = Color::Rgb(40, 40, 60);

pub fn draw(f: &mut Frame, wizard: &mut Wizard) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(5),
            Constraint::Length(3),
        ])
        .split(f.area());

    draw_header(f, wizard, chunks[0]);

    let screen = wizard.screen();
    if screen.is_viewport() {
        draw_viewport(f, wizard, chunks[1]);
    } else if screen.is_text_input() {
        draw_text_input(f, wizard, chunks[1]);
    } else if screen == Screen::CommandPreview {
        draw_preview(f, wizard, chunks[1]);
    } else {
        draw_menu(f, wizard.menu(), chunks[1]);
    }

    if let Some(message) = wizard.pending() {
        draw_pending(f, message);
    }

    draw_status_bar(f, wizard, chunks[2]);
}

fn draw_header(f: &mut Frame, wizard: &Wizard, area: Rect) {
    let context = wizard.current_context().unwrap_or("-");
    let namespace = wizard.default_namespace().unwrap_or("default");
    let header = Paragraph::new(Line::from(vec![
        Span::styled("context: ", Style::default().fg(Color::DarkGray)),
        Span::styled(context, Style::default().fg(Color::LightCyan)),
        Span::styled("  namespace: ", Style::default().fg(Color::DarkGray)),
        Span::styled(namespace, Style::default().fg(Color::LightMagenta)),
    ]))
    .block(
        Block::default()
            .title(Span::styled(
                " Kube Wizard ",
                Style::default()
                    .fg(Color::LightCyan)
                    .add_modifier(Modifier::BOLD),
            ))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray)),
    );
    f.render_widget(header, area);
}

fn draw_menu(f: &mut Frame, menu: &Menu, area: Rect) {
    // Two columns of padding for the border, two for the "▸ " prefix
    let label_width = usize::from(area.width.saturating_sub(4));
    let items: Vec<ListItem> = menu
        .items
        .iter()
        .enumerate()
        .map(|(i, item)| {
            let selected = i == menu.cursor();
            let style = if item.id == MenuId::Placeholder {
                Style::default().fg(Color::DarkGray)
            } else if selected {
                Style::default()
                    .fg(Color::White)
                    .bg(SELECTED_BG)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::Gray)
            };
            let prefix = if selected { "▸ " } else { "  " };

            let mut lines = vec![Line::from(vec![
                Span::styled(prefix, style),
                Span::styled(truncate(&item.label, label_width), style),
            ])];
            if selected && !item.description.is_empty() {
                lines.push(Line::from(vec![
                    Span::raw("    "),
                    Span::styled(
                        truncate(&item.description, label_width.saturating_sub(2)),
                        Style::default().fg(Color::DarkGray),
                    ),
                ]));
            }
            ListItem::new(lines)
        })
        .collect();

    let list = List::new(items)
        .block(
            Block::default()
                .title(Span::styled(
                    format!(" {} ", menu.title),
                    Style::default()
                        .fg(Color::LightMagenta)
                        .add_modifier(Modifier::BOLD),
                ))
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::LightMagenta)),
        )
        .highlight_style(Style::default());

    let mut state = ListState::default().with_selected(Some(menu.cursor()));
    f.render_stateful_widget(list, area, &mut state);
}

fn draw_preview(f: &mut Frame, wizard: &Wizard, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(5), Constraint::Min(3)])
        .split(area);

    let command = Paragraph::new(wizard.selection().command.as_str())
        .block(
            Block::default()
                .title(Span::styled(
                    " Command ",
                    Style::default()
                        .fg(Color::LightGreen)
                        .add_modifier(Modifier::BOLD),
                ))
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::LightGreen)),
        )
        .style(Style::default().fg(Color::White))
        .wrap(Wrap { trim: false });
    f.render_widget(command, chunks[0]);

    draw_menu(f, wizard.menu(), chunks[1]);
}

fn viewport_title(wizard: &Wizard) -> String {
    match (wizard.screen(), wizard.viewed_file()) {
        (Screen::SavedOutputView, Some(file)) => {
            let count = wizard
                .selected_base()
                .and_then(|base| wizard.groups().iter().find(|g| g.base == base))
                .map_or(1, |g| g.versions.len());
            if count > 1 {
                format!(" {} ({} versions, ←/→ to switch) ", file, count)
            } else {
                format!(" {} ", file)
            }
        }
        (Screen::CommandOutput, _) if !wizard.selection().command.is_empty() => {
            format!(" {} ", wizard.selection().command)
        }
        (screen, _) => format!(" {} ", screen.title()),
    }
}

fn draw_viewport(f: &mut Frame, wizard: &Wizard, area: Rect) {
    let block = Block::default()
        .title(Span::styled(
            viewport_title(wizard),
            Style::default()
                .fg(Color::LightYellow)
                .add_modifier(Modifier::BOLD),
        ))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray));
    let inner = block.inner(area);

    let paragraph = Paragraph::new(wizard.viewport().content.as_str())
        .style(Style::default().fg(Color::Gray))
        .wrap(Wrap { trim: false });

    // Clamp to the wrapped height so the last page stays filled
    let total = u16::try_from(paragraph.line_count(inner.width)).unwrap_or(u16::MAX);
    let max_scroll = total.saturating_sub(inner.height);
    let scroll = wizard.viewport().scroll.min(max_scroll);

    f.render_widget(paragraph.block(block).scroll((scroll, 0)), area);
}

fn draw_text_input(f: &mut Frame, wizard: &mut Wizard, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(0)])
        .split(area);

    let screen = wizard.screen();
    let input = wizard.input_mut();
    input.set_block(
        Block::default()
            .title(Span::styled(
                format!(" {} (Enter to submit, Esc to cancel) ", screen.prompt()),
                Style::default().fg(Color::LightGreen),
            ))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::LightGreen)),
    );
    input.set_cursor_style(Style::default().bg(Color::White).fg(Color::Black));
    f.render_widget(&*input, chunks[0]);

    let context = match screen {
        Screen::SaveFavourite | Screen::SaveOutputName => wizard.selection().command.as_str(),
        _ => "",
    };
    if !context.is_empty() {
        let hint = Paragraph::new(Line::from(vec![
            Span::styled("Command: ", Style::default().fg(Color::DarkGray)),
            Span::styled(context, Style::default().fg(Color::Gray)),
        ]))
        .wrap(Wrap { trim: false });
        f.render_widget(hint, chunks[1]);
    }
}

fn draw_pending(f: &mut Frame, message: &str) {
    let area = centered_rect(50, 20, f.area());
    f.render_widget(Clear, area);
    let popup = Paragraph::new(Line::from(Span::styled(
        message,
        Style::default().fg(Color::LightYellow),
    )))
    .block(
        Block::default()
            .title(Span::styled(" Working ", Style::default().fg(Color::LightYellow)))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::LightYellow)),
    )
    .wrap(Wrap { trim: true });
    f.render_widget(popup, area);
}

fn key_hints(screen: Screen) -> &'static [(&'static str, &'static str)] {
    match screen {
        Screen::MainMenu => &[("j/k", "nav"), ("Enter", "select"), ("F1-F12", "hotkeys"), ("q", "quit")],
        Screen::FlagsSelection => &[
            ("j/k", "nav"),
            ("Space", "toggle"),
            ("Enter", "toggle / done"),
            ("Esc", "back"),
        ],
        Screen::CommandOutput => &[
            ("j/k", "scroll"),
            ("PgUp/PgDn", "page"),
            ("s", "save output"),
            ("Esc", "back"),
            ("q", "main menu"),
        ],
        Screen::CommandHelp | Screen::ClusterConnectivity | Screen::ClusterInfo => {
            &[("j/k", "scroll"), ("PgUp/PgDn", "page"), ("Esc", "back")]
        }
        Screen::SavedOutputView => &[
            ("j/k", "scroll"),
            ("←/→", "version"),
            ("d", "delete"),
            ("Esc", "back"),
        ],
        Screen::FavouritesList => &[
            ("Enter", "open"),
            ("r", "rename"),
            ("d", "delete"),
            ("h", "bind hotkey"),
            ("Esc", "back"),
        ],
        Screen::HotkeysList => &[("Enter", "run"), ("d", "unbind"), ("Esc", "back")],
        Screen::CommandHistory => &[("Enter", "open"), ("s", "save favourite"), ("Esc", "back")],
        Screen::SavedOutputsList => &[
            ("Enter", "open"),
            ("r", "rename"),
            ("d", "delete group"),
            ("Esc", "back"),
        ],
        Screen::SavedOutputVersions => &[
            ("Enter", "view"),
            ("r", "rename group"),
            ("d", "delete version"),
            ("Esc", "back"),
        ],
        s if s.is_text_input() => &[("Enter", "submit"), ("Esc", "cancel"), ("Ctrl+C", "main menu")],
        _ => &[("j/k", "nav"), ("Enter", "select"), ("Esc", "back"), ("q", "main menu")],
    }
}

fn draw_status_bar(f: &mut Frame, wizard: &Wizard, area: Rect) {
    let line = match wizard.status() {
        Some(status) => {
            let color = match status.kind {
                StatusKind::Info => Color::LightYellow,
                StatusKind::Success => Color::LightGreen,
                StatusKind::Error => Color::LightRed,
            };
            Line::from(Span::styled(status.text.as_str(), Style::default().fg(color)))
        }
        None => {
            let mut spans = Vec::new();
            for (key, action) in key_hints(wizard.screen()) {
                spans.push(Span::styled(*key, Style::default().fg(Color::LightCyan)));
                spans.push(Span::styled(format!(" {}  ", action), Style::default().fg(Color::DarkGray)));
            }
            Line::from(spans)
        }
    };

    let bar = Paragraph::new(line).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray)),
    );
    f.render_widget(bar, area);
}

/// Cut `text` to `max` display columns, marking the cut with an ellipsis.
fn truncate(text: &str, max: usize) -> String {
    if text.width() <= max {
        return text.to_string();
    }
    let mut out = String::new();
    let mut width = 0;
    for ch in text.chars() {
        let w = ch.width().unwrap_or(0);
        if width + w + 1 > max {
            break;
        }
        out.push(ch);
        width += w;
    }
    out.push('…');
    out
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
