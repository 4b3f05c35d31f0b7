use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use ratatui::Frame;

use crate::task::{Task, TaskStatus};

use super::app::{AppState, HelpContext, StatusKind};
use super::form::{AddTaskForm, FormFieldId};
use super::picker::CategoryPicker;

const STATUS_WIDTH: usize = 8;
const ACTIONS_WIDTH: usize = 10;
const HELP_KEY_WIDTH: usize = 14;
const FORM_LABEL_WIDTH: usize = 12;
const COLOR_TEXT: Color = Color::Rgb(234, 236, 239);
const COLOR_MUTED: Color = Color::Rgb(160, 165, 172);
const COLOR_MUTED_DARK: Color = Color::Rgb(118, 124, 130);
const COLOR_INFO: Color = Color::Rgb(116, 198, 219);
const COLOR_WARNING: Color = Color::Rgb(244, 200, 98);
const COLOR_ERROR: Color = Color::Rgb(255, 107, 107);
const COLOR_SUCCESS: Color = Color::Rgb(126, 210, 146);
const COLOR_ACCENT: Color = Color::Rgb(122, 170, 255);
const COLOR_BORDER_LIST: Color = Color::Rgb(92, 126, 166);
const COLOR_BORDER_FORM: Color = Color::Rgb(180, 156, 92);

pub fn render(frame: &mut Frame, app: &AppState) {
    let area = frame.size();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(
            [
                Constraint::Length(1),
                Constraint::Length(3),
                Constraint::Min(0),
                Constraint::Length(3),
            ]
            .as_ref(),
        )
        .split(area);

    render_title(frame, chunks[0]);
    render_controls(frame, app, chunks[1]);

    if let Some(form) = app.form.as_ref() {
        let main = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(55), Constraint::Percentage(45)].as_ref())
            .split(chunks[2]);
        render_list(frame, app, main[0]);
        render_form(frame, form, app.help_context == HelpContext::Form, main[1]);
    } else {
        render_list(frame, app, chunks[2]);
    }

    render_footer(frame, app, chunks[3]);

    if let Some(picker) = app.category_picker.as_ref() {
        render_category_modal(frame, area, picker);
    }
}

fn render_title(frame: &mut Frame, area: Rect) {
    let line = Line::from(Span::styled(
        "Grocery Shopping App",
        Style::default()
            .fg(COLOR_INFO)
            .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
    ));
    frame.render_widget(Paragraph::new(line), area);
}

fn render_controls(frame: &mut Frame, app: &AppState, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)].as_ref())
        .split(area);

    let search_text = if app.search_active {
        format!("{}_", app.search)
    } else if app.search.is_empty() {
        "type / to search".to_string()
    } else {
        app.search.clone()
    };
    let search_style = if app.search_active || !app.search.is_empty() {
        Style::default().fg(COLOR_TEXT)
    } else {
        Style::default().fg(COLOR_MUTED_DARK)
    };
    let border = if app.search_active {
        COLOR_ACCENT
    } else {
        COLOR_BORDER_LIST
    };
    let search = Paragraph::new(Line::from(Span::styled(search_text, search_style))).block(
        Block::default()
            .borders(Borders::ALL)
            .title("Search")
            .border_style(Style::default().fg(border)),
    );
    frame.render_widget(search, chunks[0]);

    let category = Paragraph::new(Line::from(Span::styled(
        app.category.label().to_string(),
        Style::default().fg(COLOR_WARNING),
    )))
    .block(
        Block::default()
            .borders(Borders::ALL)
            .title("Category")
            .border_style(Style::default().fg(COLOR_BORDER_LIST)),
    );
    frame.render_widget(category, chunks[1]);
}

fn render_list(frame: &mut Frame, app: &AppState, area: Rect) {
    let content_width = area.width.saturating_sub(2) as usize;
    let (item_width, description_width) = column_widths(content_width);
    let help_lines = if app.help_context == HelpContext::List {
        build_list_help_lines(content_width)
    } else {
        Vec::new()
    };
    let help_reserved = if help_lines.is_empty() {
        0
    } else {
        help_lines.len() + 1
    };

    let mut lines = vec![render_header_row(item_width, description_width)];

    if app.tasks.is_empty() {
        if app.filter().is_empty() {
            lines.push(Line::from(Span::styled(
                "No items yet. Press a to add one.",
                Style::default().fg(COLOR_MUTED),
            )));
        } else {
            lines.push(Line::from(Span::styled(
                "No matches",
                Style::default().fg(COLOR_MUTED),
            )));
        }
    } else {
        let list_height = (area.height as usize)
            .saturating_sub(2)
            .saturating_sub(lines.len())
            .saturating_sub(help_reserved);
        let (start, end) = list_window(app.tasks.len(), app.selected, list_height);
        for idx in start..end {
            if let Some(task) = app.tasks.get(idx) {
                lines.push(render_task_row(
                    task,
                    app.selected == Some(idx),
                    item_width,
                    description_width,
                ));
            }
        }
    }

    if !help_lines.is_empty() {
        lines.push(Line::from(""));
        lines.extend(help_lines);
    }

    let widget = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title("Items")
            .border_style(Style::default().fg(COLOR_BORDER_LIST)),
    );
    frame.render_widget(widget, area);
}

fn column_widths(content_width: usize) -> (usize, usize) {
    let remaining = content_width.saturating_sub(STATUS_WIDTH + ACTIONS_WIDTH);
    let item = (remaining * 2 / 5).max(4).min(remaining);
    (item, remaining - item)
}

fn render_header_row(item_width: usize, description_width: usize) -> Line<'static> {
    let style = Style::default()
        .fg(COLOR_MUTED)
        .add_modifier(Modifier::BOLD);
    Line::from(vec![
        Span::styled(pad_text("Status", STATUS_WIDTH), style),
        Span::styled(pad_text("Item", item_width), style),
        Span::styled(pad_text("Description", description_width), style),
        Span::styled(pad_text("Actions", ACTIONS_WIDTH), style),
    ])
}

fn render_task_row(
    task: &Task,
    selected: bool,
    item_width: usize,
    description_width: usize,
) -> Line<'static> {
    let purchased = task.status == TaskStatus::Purchased;
    let checkbox = if purchased { "[x]" } else { "[ ]" };
    let checkbox_style = if purchased {
        Style::default()
            .fg(COLOR_SUCCESS)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(COLOR_TEXT)
    };
    let item_style = if purchased {
        Style::default()
            .fg(COLOR_MUTED)
            .add_modifier(Modifier::CROSSED_OUT)
    } else {
        Style::default().fg(COLOR_TEXT)
    };

    let mut spans = vec![
        Span::styled(pad_text(&format!(" {checkbox}"), STATUS_WIDTH), checkbox_style),
        Span::styled(pad_text(&task.item, item_width), item_style),
        Span::styled(
            pad_text(task.description.as_deref().unwrap_or(""), description_width),
            Style::default().fg(COLOR_MUTED),
        ),
        Span::styled(
            pad_text("[delete]", ACTIONS_WIDTH),
            Style::default().fg(COLOR_ERROR),
        ),
    ];
    if selected {
        for span in &mut spans {
            span.style = span.style.add_modifier(Modifier::REVERSED);
        }
    }
    Line::from(spans)
}

fn render_form(frame: &mut Frame, form: &AddTaskForm, show_help: bool, area: Rect) {
    let content_width = area.width.saturating_sub(2) as usize;
    let lines = build_form_lines(form, content_width, show_help);
    let widget = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Add Item")
                .border_style(Style::default().fg(COLOR_BORDER_FORM)),
        )
        .wrap(Wrap { trim: false });
    frame.render_widget(widget, area);
}

fn build_form_lines(form: &AddTaskForm, width: usize, show_help: bool) -> Vec<Line<'static>> {
    let value_width = width.saturating_sub(FORM_LABEL_WIDTH + 2);
    let mut lines: Vec<Line<'static>> = Vec::new();
    for (idx, field) in form.fields().iter().enumerate() {
        let is_active = idx == form.active_index();
        let marker = if is_active { "> " } else { "  " };
        let label_style = if is_active {
            Style::default()
                .fg(COLOR_ACCENT)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(COLOR_MUTED_DARK)
        };
        let label = format!("{:<FORM_LABEL_WIDTH$}", field.label);

        let mut spans = vec![
            Span::styled(marker.to_string(), label_style),
            Span::styled(label, label_style),
        ];
        if field.id == FormFieldId::Status {
            spans.extend(status_select_spans(form.status(), is_active));
        } else if field.value.is_empty() && !is_active {
            let placeholder = if field.required {
                "<required>"
            } else {
                "(optional)"
            };
            spans.push(Span::styled(
                placeholder.to_string(),
                Style::default().fg(COLOR_MUTED),
            ));
        } else {
            let mut value = truncate_tail(&field.value, value_width.saturating_sub(1));
            if is_active {
                value.push('_');
            }
            spans.push(Span::styled(value, Style::default().fg(COLOR_TEXT)));
        }
        lines.push(Line::from(spans));
    }

    if let Some(error) = form.error() {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            error.to_string(),
            Style::default()
                .fg(COLOR_ERROR)
                .add_modifier(Modifier::BOLD),
        )));
    }

    if show_help {
        lines.push(Line::from(""));
        lines.extend(build_form_help_lines(width));
    }
    lines
}

fn status_select_spans(current: TaskStatus, active: bool) -> Vec<Span<'static>> {
    let mut spans = Vec::new();
    for (idx, status) in TaskStatus::ALL.iter().enumerate() {
        if idx > 0 {
            spans.push(Span::raw(" "));
        }
        let text = format!(" {} ", status.as_str());
        let mut style = Style::default().fg(COLOR_MUTED);
        if *status == current {
            style = Style::default()
                .fg(COLOR_WARNING)
                .add_modifier(Modifier::BOLD);
            if active {
                style = style.add_modifier(Modifier::REVERSED);
            }
        }
        spans.push(Span::styled(text, style));
    }
    spans
}

fn render_footer(frame: &mut Frame, app: &AppState, area: Rect) {
    let hint = app.footer_hint();
    let hint_span = Span::styled(hint, Style::default().fg(COLOR_INFO));
    let line = if let Some((status, kind)) = app.status_line() {
        let status_style = match kind {
            StatusKind::Error => Style::default()
                .fg(COLOR_ERROR)
                .add_modifier(Modifier::BOLD),
            StatusKind::Info => Style::default().fg(COLOR_SUCCESS),
        };
        Line::from(vec![
            hint_span,
            Span::raw("  |  "),
            Span::styled(status, status_style),
        ])
    } else {
        Line::from(hint_span)
    };
    let counts_line = Line::from(Span::styled(
        app.task_count_summary(),
        Style::default().fg(COLOR_ACCENT),
    ));
    let widget = Paragraph::new(vec![line, counts_line])
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::TOP)
                .border_style(Style::default().fg(COLOR_MUTED_DARK)),
        );
    frame.render_widget(widget, area);
}

fn render_category_modal(frame: &mut Frame, area: Rect, picker: &CategoryPicker) {
    let longest = picker
        .options()
        .iter()
        .map(|option| option.chars().count())
        .max()
        .unwrap_or(0)
        .min(u16::MAX as usize) as u16;
    let content_width = longest
        .saturating_add(4)
        .max(26)
        .min(area.width.saturating_sub(6));
    let height = (picker.options().len().min(u16::MAX as usize) as u16)
        .saturating_add(4)
        .min(area.height.saturating_sub(4));
    let modal = centered_rect(content_width, height, area);
    frame.render_widget(Clear, modal);

    let mut lines: Vec<Line<'static>> = Vec::new();
    for (idx, option) in picker.options().iter().enumerate() {
        let base_style = if idx == 0 {
            Style::default().fg(COLOR_INFO).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(COLOR_TEXT)
        };
        let mut span = Span::styled(option.clone(), base_style);
        if idx == picker.selected_index() {
            span.style = span.style.add_modifier(Modifier::REVERSED);
        }
        lines.push(Line::from(span));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "enter apply  esc cancel",
        Style::default().fg(COLOR_MUTED_DARK),
    )));

    let widget = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title("Category"))
        .wrap(Wrap { trim: true });
    frame.render_widget(widget, modal);
}

fn build_list_help_lines(width: usize) -> Vec<Line<'static>> {
    vec![
        help_header("More commands"),
        help_line("j/k or up/down", "move selection", width),
        help_line("g/G", "first or last item", width),
        help_line("space/x", "check or uncheck item", width),
        help_line("a/n", "add item", width),
        help_line("d/delete", "delete item", width),
        help_line("/", "search items", width),
        help_line("c", "category filter", width),
        help_line("r", "reload", width),
        help_line("q/esc", "quit", width),
        help_line("?", "hide help", width),
    ]
}

fn build_form_help_lines(width: usize) -> Vec<Line<'static>> {
    vec![
        help_header("Form commands"),
        help_line("tab/shift+tab", "next or previous field", width),
        help_line("enter", "next field, submit on last", width),
        help_line("ctrl+s", "submit", width),
        help_line("left/right", "change status", width),
        help_line("ctrl+u", "clear field", width),
        help_line("esc", "close form", width),
        help_line("f1", "hide help", width),
    ]
}

fn help_header(title: &str) -> Line<'static> {
    Line::from(Span::styled(
        title.to_string(),
        Style::default().fg(COLOR_INFO).add_modifier(Modifier::BOLD),
    ))
}

fn help_line(keys: &str, desc: &str, width: usize) -> Line<'static> {
    let key_text = pad_text(keys, HELP_KEY_WIDTH.min(width));
    let desc_width = width.saturating_sub(HELP_KEY_WIDTH + 1);
    let desc_text = truncate_text(desc, desc_width);
    Line::from(vec![
        Span::styled(
            key_text,
            Style::default()
                .fg(COLOR_ACCENT)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(" "),
        Span::styled(desc_text, Style::default().fg(COLOR_MUTED)),
    ])
}

fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width.saturating_sub(2));
    let height = height.min(area.height.saturating_sub(2));
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width, height)
}

fn list_window(total: usize, selected: Option<usize>, height: usize) -> (usize, usize) {
    if total == 0 || height == 0 {
        return (0, 0);
    }
    if total <= height {
        return (0, total);
    }
    let selected = selected.unwrap_or(0);
    let mut start = selected.saturating_sub(height / 2);
    if start + height > total {
        start = total - height;
    }
    (start, start + height)
}

/// Pad to `width` columns, truncating with an ellipsis; always leaves one
/// trailing space as a column gap.
fn pad_text(value: &str, width: usize) -> String {
    if width == 0 {
        return String::new();
    }
    let text = truncate_text(value, width - 1);
    format!("{text:width$}")
}

fn truncate_text(value: &str, max: usize) -> String {
    if max == 0 {
        return String::new();
    }
    let chars: Vec<char> = value.chars().collect();
    if chars.len() <= max {
        return value.to_string();
    }
    if max <= 3 {
        return chars[..max].iter().collect();
    }
    let mut out: String = chars[..(max - 3)].iter().collect();
    out.push_str("...");
    out
}

/// Keep the end of the input visible while typing.
fn truncate_tail(value: &str, max: usize) -> String {
    let chars: Vec<char> = value.chars().collect();
    if chars.len() <= max {
        return value.to_string();
    }
    chars[chars.len() - max..].iter().collect()
}
