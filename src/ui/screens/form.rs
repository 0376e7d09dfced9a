use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::ui::app::{App, Focus, FormField, InputMode};
use crate::ui::theme;

const LABEL_WIDTH: usize = 14;

pub(crate) fn render(f: &mut Frame, area: Rect, app: &App) {
    let focused = app.focus == Focus::Form;
    let editing = app.input_mode == InputMode::Editing;

    let mut lines = vec![Line::from("")];
    for &field in FormField::all() {
        let active = focused && field == app.form_field;
        let marker = if active { "> " } else { "  " };
        let value = app.form.value(field);

        let mut spans = vec![
            Span::styled(marker, theme::label_style(active)),
            Span::styled(
                format!("{:<width$}", field.label(), width = LABEL_WIDTH),
                theme::label_style(active),
            ),
            Span::styled(
                value.to_string(),
                if active && editing {
                    Style::default().fg(theme::TEXT).bg(theme::SURFACE)
                } else {
                    theme::normal_style()
                },
            ),
        ];

        if active && editing {
            if let Some(hint) = app.completion() {
                spans.push(Span::styled(
                    format!("  Tab: {hint}"),
                    Style::default()
                        .fg(theme::TEXT_DIM)
                        .add_modifier(Modifier::ITALIC),
                ));
            }
        } else if field == FormField::Year && active {
            spans.push(Span::styled("  +/- to change", theme::dim_style()));
        }
        lines.push(Line::from(spans));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "  Enter edit | a save | x clear | Tab records",
        theme::dim_style(),
    )));

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme::border_style(focused))
        .title(Span::styled(
            " Beneficiary ",
            Style::default()
                .fg(theme::ACCENT)
                .add_modifier(Modifier::BOLD),
        ));
    f.render_widget(Paragraph::new(lines).block(block), area);

    if focused && editing {
        let row = FormField::all()
            .iter()
            .position(|&fld| fld == app.form_field)
            .unwrap_or(0);
        let col = 2 + LABEL_WIDTH + app.form.value(app.form_field).chars().count();
        f.set_cursor_position((area.x + 1 + col as u16, area.y + 2 + row as u16));
    }
}
