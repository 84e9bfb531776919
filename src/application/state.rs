//! Application state management for the form terminal UI.
//!
//! This module contains the main application state and mode management.
//! It turns key-level intents (type a character, press a button) into the
//! input and click events the [`FormulaEvaluator`] reacts to.

use crate::domain::{ClickAction, Document, DomainResult, FormulaEvaluator, MarkupConfig, NodeId, PageSpec};
use tracing::error;

/// Represents the current mode of the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppMode {
    /// Navigation mode - Tab/arrows move focus, shortcuts available
    Normal,
    /// The focused input is being edited; every keystroke is an input event
    Editing,
    /// Help screen is displayed
    Help,
}

/// One formula as shown to the user.
#[derive(Debug, Clone, PartialEq)]
pub struct FormulaView {
    pub label: String,
    pub text: String,
    pub invalid: bool,
}

/// Main application state: the page document, its evaluator and UI state.
///
/// # Examples
///
/// ```
/// use tforms::application::App;
/// use tforms::domain::{MarkupConfig, PageSpec};
///
/// let page = PageSpec::demo().unwrap();
/// let app = App::new(&page, MarkupConfig::default()).unwrap();
/// assert_eq!(app.focus, 0);
/// assert_eq!(app.title, "Calculators");
/// ```
#[derive(Debug)]
pub struct App {
    pub document: Document,
    pub evaluator: FormulaEvaluator,
    pub title: String,
    /// Index into [`App::focusables`]
    pub focus: usize,
    pub mode: AppMode,
    /// Edit buffer, mirrored into the focused input on every change
    pub input: String,
    /// Byte offset of the cursor within `input`
    pub cursor_position: usize,
    pub help_scroll: usize,
    /// Temporary status message to display
    pub status_message: Option<String>,
    /// Value of the input before editing started, restored on cancel
    original_value: String,
}

impl App {
    /// Builds the page document and attaches the evaluator, which renders
    /// every formula once.
    pub fn new(page: &PageSpec, markup: MarkupConfig) -> DomainResult<Self> {
        let mut document = page.build()?;
        let evaluator = FormulaEvaluator::attach(&mut document, markup)?;

        Ok(Self {
            document,
            evaluator,
            title: page.title.clone(),
            focus: 0,
            mode: AppMode::Normal,
            input: String::new(),
            cursor_position: 0,
            help_scroll: 0,
            status_message: None,
            original_value: String::new(),
        })
    }

    /// Inputs, buttons and formulas in document order.
    pub fn focusables(&self) -> Vec<NodeId> {
        let formula_tag = &self.evaluator.markup().formula_tag;
        self.document.find_all(self.document.root(), |e| {
            e.is_input() || e.is_button() || &e.tag == formula_tag
        })
    }

    pub fn focused(&self) -> Option<NodeId> {
        self.focusables().get(self.focus).copied()
    }

    pub fn is_focused(&self, node: NodeId) -> bool {
        self.focused() == Some(node)
    }

    pub fn focus_next(&mut self) {
        let count = self.focusables().len();
        if count > 0 {
            self.focus = (self.focus + 1) % count;
        }
    }

    pub fn focus_previous(&mut self) {
        let count = self.focusables().len();
        if count > 0 {
            self.focus = (self.focus + count - 1) % count;
        }
    }

    pub fn focus_node(&mut self, node: NodeId) {
        if let Some(index) = self.focusables().iter().position(|&n| n == node) {
            self.focus = index;
        }
    }

    fn clamp_focus(&mut self) {
        let count = self.focusables().len();
        if self.focus >= count {
            self.focus = count.saturating_sub(1);
        }
    }

    fn focused_input(&self) -> Option<NodeId> {
        self.focused()
            .filter(|&node| self.document.element(node).is_some_and(|e| e.is_input()))
    }

    /// Short description of the focused element for the header.
    pub fn focused_description(&self) -> String {
        let Some(element) = self.focused().and_then(|n| self.document.element(n)) else {
            return "-".to_string();
        };
        element
            .id
            .clone()
            .or_else(|| element.label.clone())
            .or_else(|| element.placeholder.clone())
            .or_else(|| element.classes.first().cloned())
            .unwrap_or_else(|| element.tag.clone())
    }

    /// Enter editing mode on the focused input. Anything else is ignored.
    pub fn start_editing(&mut self) {
        let Some(node) = self.focused_input() else {
            return;
        };
        self.input = self.document.value(node).unwrap_or_default().to_string();
        self.original_value = self.input.clone();
        self.cursor_position = self.input.len();
        self.mode = AppMode::Editing;
        self.status_message = None;
    }

    /// Keeps the edited value and returns to normal mode.
    pub fn finish_editing(&mut self) {
        self.mode = AppMode::Normal;
        self.input.clear();
        self.original_value.clear();
        self.cursor_position = 0;
    }

    /// Restores the value the input had before editing started.
    pub fn cancel_editing(&mut self) {
        self.input = std::mem::take(&mut self.original_value);
        self.apply_input();
        self.mode = AppMode::Normal;
        self.input.clear();
        self.cursor_position = 0;
    }

    /// Writes the edit buffer into the focused input and fires an input
    /// event.
    fn apply_input(&mut self) {
        let Some(node) = self.focused_input() else {
            return;
        };
        let result = self
            .document
            .set_value(node, &self.input)
            .and_then(|_| self.evaluator.handle_input(&mut self.document));
        self.report(result);
    }

    pub fn insert_char(&mut self, c: char) {
        self.input.insert(self.cursor_position, c);
        self.cursor_position += c.len_utf8();
        self.apply_input();
    }

    pub fn delete_backward(&mut self) {
        if let Some((index, _)) = self.input[..self.cursor_position].char_indices().next_back() {
            self.input.remove(index);
            self.cursor_position = index;
            self.apply_input();
        }
    }

    pub fn delete_forward(&mut self) {
        if self.cursor_position < self.input.len() {
            self.input.remove(self.cursor_position);
            self.apply_input();
        }
    }

    pub fn move_cursor_left(&mut self) {
        if let Some((index, _)) = self.input[..self.cursor_position].char_indices().next_back() {
            self.cursor_position = index;
        }
    }

    pub fn move_cursor_right(&mut self) {
        if let Some(c) = self.input[self.cursor_position..].chars().next() {
            self.cursor_position += c.len_utf8();
        }
    }

    pub fn move_cursor_home(&mut self) {
        self.cursor_position = 0;
    }

    pub fn move_cursor_end(&mut self) {
        self.cursor_position = self.input.len();
    }

    /// Empties the focused input.
    pub fn clear_focused(&mut self) {
        if self.focused_input().is_none() {
            return;
        }
        self.input.clear();
        self.apply_input();
        self.status_message = None;
    }

    /// Enter on the focused element: edit an input, click a button.
    pub fn activate(&mut self) {
        let Some(node) = self.focused() else {
            return;
        };
        match self.document.element(node) {
            Some(e) if e.is_input() => self.start_editing(),
            Some(e) if e.is_button() => self.click(node),
            _ => {}
        }
    }

    /// Delivers a click event to `target`.
    pub fn click(&mut self, target: NodeId) {
        match self.evaluator.handle_click(&mut self.document, target) {
            Ok(ClickAction::RowAdded(row)) => self.after_row_added(row),
            Ok(ClickAction::RowRemoved(_)) => self.after_row_removed(),
            Ok(ClickAction::Ignored) => {}
            Err(err) => self.report(Err(err)),
        }
    }

    /// Adds a GPA row regardless of focus.
    pub fn add_row(&mut self) {
        match self.evaluator.add_gpa_row(&mut self.document) {
            Ok(Some(row)) => self.after_row_added(row),
            Ok(None) => self.status_message = Some("This page has no GPA rows".to_string()),
            Err(err) => self.report(Err(err)),
        }
    }

    /// Removes the GPA row containing the focused element, if any.
    pub fn remove_focused_row(&mut self) {
        let Some(node) = self.focused() else {
            return;
        };
        match self.evaluator.remove_gpa_row(&mut self.document, node) {
            Ok(Some(_)) => self.after_row_removed(),
            Ok(None) => self.status_message = Some("Focus is not on a course row".to_string()),
            Err(err) => self.report(Err(err)),
        }
    }

    fn after_row_added(&mut self, row: NodeId) {
        let grade_class = self.evaluator.markup().grade_class.clone();
        if let Some(grade) = self.document.first_with_class(row, &grade_class) {
            self.focus_node(grade);
        }
        self.status_message = Some("Course added".to_string());
    }

    fn after_row_removed(&mut self) {
        self.clamp_focus();
        self.status_message = Some("Course removed".to_string());
    }

    /// Text the copy command puts on the clipboard: an input's value or a
    /// formula's rendered result.
    pub fn copy_text(&self) -> Option<String> {
        let element = self.focused().and_then(|n| self.document.element(n))?;
        if element.is_input() {
            Some(element.value.clone())
        } else if element.is_button() {
            None
        } else {
            Some(element.text.clone())
        }
    }

    pub fn set_copy_result(&mut self, result: Result<String, String>) {
        self.status_message = Some(match result {
            Ok(text) => format!("Copied {}", text),
            Err(error) => format!("Copy failed: {}", error),
        });
    }

    /// Every formula with its label and current rendering.
    pub fn formula_views(&self) -> Vec<FormulaView> {
        let markup = self.evaluator.markup();
        self.evaluator
            .formulas()
            .iter()
            .filter_map(|&node| self.document.element(node))
            .map(|e| FormulaView {
                label: e
                    .label
                    .clone()
                    .or_else(|| e.attrs.get(&markup.evaluator_attr).cloned())
                    .unwrap_or_default(),
                text: e.text.clone(),
                invalid: e.has_class(&markup.invalid_class),
            })
            .collect()
    }

    fn report(&mut self, result: DomainResult<()>) {
        if let Err(err) = result {
            error!(error = %err, "document update failed");
            self.status_message = Some(format!("Error: {}", err));
        }
    }
}
