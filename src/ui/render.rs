use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use super::app::{App, Focus, InputMode};
use super::commands;
use super::screens;
use super::theme;

/// Five fields, a blank line above and below, a hint line and the borders.
pub(crate) const FORM_HEIGHT: u16 = 10;

/// Rows that fit in the records table for a terminal `height` lines tall.
pub(crate) fn record_rows(height: u16) -> usize {
    // title, status and command bars, table borders and header
    let chrome = 3 + FORM_HEIGHT + 3;
    (height.saturating_sub(chrome) as usize).max(1)
}

pub(crate) fn render(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),           // Title bar
            Constraint::Length(FORM_HEIGHT), // Form
            Constraint::Min(4),              // Records
            Constraint::Length(1),           // Status bar
            Constraint::Length(1),           // Command bar
        ])
        .split(f.area());

    render_title_bar(f, chunks[0], app);
    screens::form::render(f, chunks[1], app);
    screens::records::render(f, chunks[2], app);
    render_status_bar(f, chunks[3], app);
    render_command_bar(f, chunks[4], app);

    if app.show_help {
        render_help_overlay(f, f.area());
    }
}

fn render_title_bar(f: &mut Frame, area: Rect, app: &App) {
    let (form_style, records_style) = match app.focus {
        Focus::Form => (
            Style::default()
                .fg(theme::ACCENT)
                .add_modifier(Modifier::BOLD),
            Style::default().fg(theme::TEXT_DIM),
        ),
        Focus::Records => (
            Style::default().fg(theme::TEXT_DIM),
            Style::default()
                .fg(theme::ACCENT)
                .add_modifier(Modifier::BOLD),
        ),
    };

    let bar = Paragraph::new(Line::from(vec![
        Span::styled(" Beneficiaries ", theme::header_style()),
        Span::styled(" | ", Style::default().fg(theme::OVERLAY)),
        Span::styled("Form", form_style),
        Span::styled(" | ", Style::default().fg(theme::OVERLAY)),
        Span::styled("Records", records_style),
    ]))
    .style(Style::default().bg(theme::HEADER_BG));
    f.render_widget(bar, area);
}

fn render_status_bar(f: &mut Frame, area: Rect, app: &App) {
    let mode_label = format!(" {} ", app.input_mode);
    let mode_bg = match app.input_mode {
        InputMode::Normal => theme::ACCENT,
        InputMode::Command | InputMode::Editing => theme::GREEN,
        InputMode::Search => theme::YELLOW,
        InputMode::Confirm => theme::RED,
    };
    let mode_style = Style::default()
        .fg(theme::HEADER_BG)
        .bg(mode_bg)
        .add_modifier(Modifier::BOLD);

    let info = if app.search_input.is_empty() {
        format!(" {} records", app.record_count)
    } else {
        format!(
            " {} of {} records | name contains '{}'",
            app.records.len(),
            app.record_count,
            app.search_input
        )
    };

    let right = match (app.input_mode, app.focus) {
        (InputMode::Editing, _) => " Tab complete | Enter next | Esc done ",
        (_, Focus::Form) => " j/k field | Enter edit | a save | ? help ",
        (_, Focus::Records) => " j/k move | Enter load | :export | ? help ",
    };

    let available = area.width as usize;
    let used = mode_label.len() + info.chars().count() + right.len();
    let pad = available.saturating_sub(used);

    let bar = Paragraph::new(Line::from(vec![
        Span::styled(&mode_label, mode_style),
        Span::styled(&info, theme::status_bar_style()),
        Span::styled(" ".repeat(pad), theme::status_bar_style()),
        Span::styled(right, theme::status_bar_style()),
    ]));
    f.render_widget(bar, area);
}

fn render_command_bar(f: &mut Frame, area: Rect, app: &App) {
    let (content, cursor_offset) = match app.input_mode {
        InputMode::Command => (
            Line::from(vec![
                Span::styled(":", Style::default().fg(theme::ACCENT)),
                Span::styled(&app.command_input, theme::command_bar_style()),
            ]),
            Some(1 + app.command_input.chars().count() as u16),
        ),
        InputMode::Search => {
            let match_info = if !app.search_input.is_empty() {
                format!("  ({} matches)", app.records.len())
            } else {
                String::new()
            };
            (
                Line::from(vec![
                    Span::styled("/", Style::default().fg(theme::YELLOW)),
                    Span::styled(&app.search_input, theme::command_bar_style()),
                    Span::styled(match_info, theme::dim_style()),
                ]),
                Some(1 + app.search_input.chars().count() as u16),
            )
        }
        InputMode::Confirm => (
            Line::from(vec![
                Span::styled(&app.confirm_message, Style::default().fg(theme::YELLOW)),
                Span::styled(" [y/N] ", Style::default().fg(theme::RED)),
            ]),
            None,
        ),
        InputMode::Normal | InputMode::Editing => (
            if app.status_message.is_empty() {
                Line::from(Span::styled(
                    " Press : for commands, / to search, ? for help",
                    theme::dim_style(),
                ))
            } else {
                Line::from(Span::styled(
                    &app.status_message,
                    theme::command_bar_style(),
                ))
            },
            None,
        ),
    };

    let bar = Paragraph::new(content).style(Style::default().bg(theme::COMMAND_BG));
    f.render_widget(bar, area);

    if let Some(offset) = cursor_offset {
        f.set_cursor_position((area.x + offset, area.y));
    }
}

/// Key bindings listed in the help overlay, grouped by section.
const KEY_HELP: &[(&str, &[(&str, &str)])] = &[
    (
        "Moving around",
        &[
            ("Tab", "switch between form and records"),
            ("j / k", "next / previous field or record"),
            ("g / G", "first / last record"),
            ("Ctrl-q", "quit"),
        ],
    ),
    (
        "Form",
        &[
            ("Enter", "edit the field; Enter again moves on, saves on Year"),
            ("Tab (editing)", "accept the suggestion"),
            ("+ / -", "change the year"),
            ("a", "save"),
            ("x", "clear"),
        ],
    ),
    (
        "Records",
        &[
            ("Enter", "load the record into the form"),
            ("/", "live search by name"),
            ("Esc", "clear the search"),
            (":", "command mode"),
        ],
    ),
];

/// Lines of the help overlay: key sections, then one line per command.
pub(crate) fn help_lines() -> Vec<Line<'static>> {
    let section = Style::default()
        .fg(theme::YELLOW)
        .add_modifier(Modifier::BOLD);
    let mut lines = vec![
        Line::from(Span::styled(
            " Beneficiaries Help ",
            Style::default()
                .fg(theme::ACCENT)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
    ];

    for (title, keys) in KEY_HELP {
        lines.push(Line::from(Span::styled(format!(" {title}"), section)));
        for (key, what) in *keys {
            lines.push(Line::from(vec![
                Span::styled(format!("  {key:<16}"), Style::default().fg(theme::ACCENT)),
                Span::styled(*what, theme::normal_style()),
            ]));
        }
        lines.push(Line::from(""));
    }

    lines.push(Line::from(Span::styled(" Commands", section)));
    let mut cmds: Vec<(&str, &str)> = commands::COMMANDS
        .iter()
        .filter(|(name, _)| name.len() > 2)
        .map(|(&name, cmd)| (name, cmd.description))
        .collect();
    cmds.sort_unstable();
    for (name, desc) in cmds {
        lines.push(Line::from(vec![
            Span::styled(format!("  :{name:<15}"), Style::default().fg(theme::ACCENT)),
            Span::styled(desc, theme::normal_style()),
        ]));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        " Press any key to close ",
        theme::dim_style(),
    )));
    lines
}

fn render_help_overlay(f: &mut Frame, area: Rect) {
    let lines = help_lines();
    let height = (lines.len() as u16 + 2).min(area.height.saturating_sub(2));
    let width = 80.min(area.width.saturating_sub(4));
    let popup = Rect::new(
        area.x + area.width.saturating_sub(width) / 2,
        area.y + area.height.saturating_sub(height) / 2,
        width,
        height,
    );

    f.render_widget(Clear, popup);
    f.render_widget(
        Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(theme::ACCENT))
                .style(Style::default().bg(theme::HEADER_BG)),
        ),
        popup,
    );
}

#[cfg(test)]
#[path = "render_tests.rs"]
mod render_tests;
