use crate::application::{App, AppMode};
use crate::domain::{Element, NodeId};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

pub fn render_ui(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(3),
        ])
        .split(f.area());

    render_header(f, app, chunks[0]);
    render_page(f, app, chunks[1]);
    render_status_bar(f, app, chunks[2]);

    if matches!(app.mode, AppMode::Help) {
        render_help_popup(f, app.help_scroll);
    }
}

fn render_header(f: &mut Frame, app: &App, area: Rect) {
    let header = Paragraph::new(format!(
        "tforms - {} | Focus: {}",
        if app.title.is_empty() { "Form" } else { &app.title },
        app.focused_description()
    ))
    .style(Style::default().fg(Color::Cyan));
    f.render_widget(header, area);
}

/// Lines of the page body plus the line holding the focused element.
pub fn page_lines(app: &App) -> (Vec<Line<'static>>, usize) {
    let mut lines = Vec::new();
    let mut focus_line = 0;
    for &child in app.document.children(app.document.root()) {
        push_node(app, child, 0, &mut lines, &mut focus_line);
    }
    (lines, focus_line)
}

fn push_node(app: &App, node: NodeId, depth: usize, lines: &mut Vec<Line<'static>>, focus_line: &mut usize) {
    let Some(element) = app.document.element(node) else {
        return;
    };
    let indent = "  ".repeat(depth);
    let children = app.document.children(node);

    if is_control(app, element) {
        if app.is_focused(node) {
            *focus_line = lines.len();
        }
        let mut spans = vec![Span::raw(indent)];
        spans.extend(control_spans(app, node, element, true));
        lines.push(Line::from(spans));
        return;
    }

    // an unlabelled container of controls is drawn on one line, like a GPA row
    let inline = element.label.is_none()
        && !children.is_empty()
        && children
            .iter()
            .all(|&c| app.document.element(c).is_some_and(|e| is_control(app, e)));

    if inline {
        let mut spans = vec![Span::raw(indent)];
        for &child in children {
            if app.is_focused(child) {
                *focus_line = lines.len();
            }
            if let Some(e) = app.document.element(child) {
                spans.extend(control_spans(app, child, e, false));
                spans.push(Span::raw(" "));
            }
        }
        lines.push(Line::from(spans));
        return;
    }

    let mut child_depth = depth;
    if let Some(label) = &element.label {
        lines.push(Line::from(Span::styled(
            format!("{}{}", indent, label),
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        )));
        child_depth += 1;
    } else if !element.text.is_empty() {
        lines.push(Line::from(format!("{}{}", indent, element.text)));
    }
    for &child in children {
        push_node(app, child, child_depth, lines, focus_line);
    }
    if depth == 0 && element.label.is_some() {
        lines.push(Line::from(""));
    }
}

fn is_control(app: &App, element: &Element) -> bool {
    element.is_input() || element.is_button() || element.tag == app.evaluator.markup().formula_tag
}

fn control_spans(app: &App, node: NodeId, element: &Element, with_label: bool) -> Vec<Span<'static>> {
    let focused = app.is_focused(node);
    let mut spans = Vec::new();

    if with_label {
        if let Some(label) = &element.label {
            spans.push(Span::raw(format!("{:<14} ", label)));
        }
    }

    if element.is_input() {
        spans.extend(input_spans(app, element, focused));
    } else if element.is_button() {
        let style = if focused {
            Style::default().bg(Color::Blue).fg(Color::White)
        } else {
            Style::default().fg(Color::Magenta)
        };
        spans.push(Span::styled(format!("[ {} ]", element.text), style));
    } else {
        let invalid = element.has_class(&app.evaluator.markup().invalid_class);
        let mut style = if invalid {
            Style::default().fg(Color::Red)
        } else {
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
        };
        if focused {
            style = style.add_modifier(Modifier::REVERSED);
        }
        spans.push(Span::raw("= "));
        spans.push(Span::styled(element.text.clone(), style));
    }

    spans
}

fn input_spans(app: &App, element: &Element, focused: bool) -> Vec<Span<'static>> {
    let box_style = if focused {
        Style::default().bg(Color::Blue).fg(Color::White)
    } else {
        Style::default()
    };

    if focused && matches!(app.mode, AppMode::Editing) {
        let (before, after) = app.input.split_at(app.cursor_position);
        let mut rest = after.chars();
        let at_cursor = rest.next().map(String::from).unwrap_or_else(|| " ".to_string());
        return vec![
            Span::styled("[", box_style),
            Span::styled(before.to_string(), box_style),
            Span::styled(at_cursor, box_style.add_modifier(Modifier::REVERSED)),
            Span::styled(rest.as_str().to_string(), box_style),
            Span::styled("]", box_style),
        ];
    }

    if element.value.is_empty() {
        let placeholder = element.placeholder.clone().unwrap_or_default();
        vec![Span::styled(
            format!("[{:<10}]", placeholder),
            box_style.fg(if focused { Color::Gray } else { Color::DarkGray }),
        )]
    } else {
        vec![Span::styled(format!("[{:<10}]", element.value), box_style)]
    }
}

fn render_page(f: &mut Frame, app: &App, area: Rect) {
    let (lines, focus_line) = page_lines(app);
    let visible = area.height.saturating_sub(2) as usize;
    let scroll = if visible > 0 && focus_line >= visible {
        focus_line + 1 - visible
    } else {
        0
    };

    let page = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title("Form"))
        .scroll((scroll as u16, 0));
    f.render_widget(page, area);
}

fn render_status_bar(f: &mut Frame, app: &App, area: Rect) {
    let input_text = match app.mode {
        AppMode::Normal => {
            if let Some(ref status) = app.status_message {
                status.clone()
            } else {
                "Tab/jk: move | Enter: edit/press | a: add course | d: remove course | y: copy | F1/?: help | q: quit".to_string()
            }
        }
        AppMode::Editing => format!("Editing: {} (Enter to keep, Esc to cancel)", app.input),
        AppMode::Help => "↑↓/jk: scroll | PgUp/PgDn: fast scroll | Home: top | Esc/q: close help".to_string(),
    };

    let input = Paragraph::new(input_text)
        .block(Block::default().borders(Borders::ALL).title("Status"))
        .style(match app.mode {
            AppMode::Normal => Style::default(),
            AppMode::Editing => Style::default().fg(Color::Green),
            AppMode::Help => Style::default().fg(Color::Cyan),
        });
    f.render_widget(input, area);
}

fn render_help_popup(f: &mut Frame, scroll: usize) {
    let area = f.area();
    let popup_area = Rect {
        x: area.width / 10,
        y: area.height / 10,
        width: area.width * 4 / 5,
        height: area.height * 4 / 5,
    };

    f.render_widget(Clear, popup_area);

    let help_text = get_help_text();
    let help_lines: Vec<&str> = help_text.lines().collect();
    let visible_height = popup_area.height.saturating_sub(2) as usize;

    let start_line = scroll.min(help_lines.len().saturating_sub(visible_height));
    let end_line = (start_line + visible_height).min(help_lines.len());

    let visible_text = help_lines[start_line..end_line].join("\n");

    let help_widget = Paragraph::new(visible_text)
        .block(Block::default()
            .borders(Borders::ALL)
            .title(format!("tforms Help (Line {}/{})", start_line + 1, help_lines.len()))
            .style(Style::default().fg(Color::Cyan)))
        .style(Style::default().fg(Color::White));

    f.render_widget(help_widget, popup_area);
}

fn get_help_text() -> &'static str {
    r#"TFORMS - LIVE FORMULA FORMS

=== HOW IT WORKS ===
• Every change to an input recomputes every formula on the page
• A formula either evaluates an expression over input ids
  (e.g. weight / (height * height)) or averages GPA rows
• Empty inputs count as 0
• Inputs must be plain decimals: 12, -3, 0.5, -.25

=== EXPRESSIONS ===
+ - * /         Arithmetic, usual precedence
( )             Grouping
-x              Negation
name            Value of the input whose id is "name"

=== RESULTS ===
Invalid Formula                  An input is not a number, the
                                 expression is malformed, or the
                                 result is not finite (e.g. x / 0)
Invalid Formula (... positive)   A GPA grade/credit or a BMI
                                 weight/height is negative

=== GPA ===
GPA = Σ(grade × credit) / Σ(credit), or 0 with no credits
a / Ctrl+N      Add a course row
d / Ctrl+D      Remove the row holding the focus
[ - ]           Press a row's button to remove it
[ + ]           Press the add button to add a row

=== NAVIGATION ===
Tab / ↓ / j     Next field
Shift+Tab / ↑ / k Previous field
Enter / Space   Edit input or press button
0-9 . -         Start editing the focused input
Backspace       Clear the focused input
y               Copy focused value or result
F1 or ?         Show this help
q               Quit

=== EDITING ===
←/→ Home/End    Move the cursor
Backspace/Del   Delete characters
Enter           Keep the value
Tab / Shift+Tab Keep the value and move on
Esc             Restore the value from before editing"#
}
