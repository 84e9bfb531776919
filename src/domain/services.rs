//! Formula evaluation services for form pages.
//!
//! [`FormulaEvaluator`] keeps every formula element of a [`Document`] in sync
//! with the inputs it depends on. Two kinds of formula exist:
//!
//! - the GPA rule, a credit-weighted average over the grade/credit rows of
//!   the GPA container, and
//! - arithmetic expressions whose identifiers are the ids of input elements.
//!
//! Failures never escape a formula: they are rendered into the element as
//! one of the [`FormulaError`] messages and flagged with the invalid class.

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, info, warn};

use super::document::{Document, Element, NodeId};
use super::errors::{DomainResult, FormulaError};
use super::models::MarkupConfig;
use super::parser::{parse_expression, Bindings, ExpressionEvaluator};

/// The one expression whose inputs must not be negative.
pub const BMI_EXPRESSION: &str = "weight / (height * height)";

static NUMERIC_LITERAL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^-?[0-9]*\.?[0-9]+$").expect("numeric literal pattern is valid"));

/// Longest leading decimal a GPA cell starts with; trailing text is ignored.
static LEADING_DECIMAL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[+-]?(Infinity|([0-9]+\.?[0-9]*|\.[0-9]+)([eE][+-]?[0-9]+)?)")
        .expect("leading decimal pattern is valid")
});

/// What a click inside the GPA container did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickAction {
    /// A row was added; carries the new row.
    RowAdded(NodeId),
    /// A row was removed; carries the detached row.
    RowRemoved(NodeId),
    Ignored,
}

/// Owns the formula elements of a document and recomputes them.
///
/// # Examples
///
/// ```
/// use tforms::domain::{Document, Element, FormulaEvaluator, MarkupConfig};
///
/// let mut doc = Document::new();
/// let root = doc.root();
/// let a = doc.create_element(root, Element::new("input").with_id("a").with_value("4")).unwrap();
/// let out = doc
///     .create_element(root, Element::new("formula").with_attr("evaluator", "a * 2 + 1"))
///     .unwrap();
///
/// let evaluator = FormulaEvaluator::attach(&mut doc, MarkupConfig::default()).unwrap();
/// assert_eq!(doc.text(out), Some("9"));
///
/// doc.set_value(a, "x").unwrap();
/// evaluator.handle_input(&mut doc).unwrap();
/// assert_eq!(doc.text(out), Some("Invalid Formula"));
/// assert!(doc.has_class(out, "invalid"));
/// ```
#[derive(Debug, Clone)]
pub struct FormulaEvaluator {
    markup: MarkupConfig,
    formulas: Vec<NodeId>,
    gpa_container: Option<NodeId>,
}

impl FormulaEvaluator {
    /// Locates the formula elements and the GPA container, then renders
    /// every formula once.
    pub fn attach(document: &mut Document, markup: MarkupConfig) -> DomainResult<Self> {
        let mut evaluator = Self {
            markup,
            formulas: Vec::new(),
            gpa_container: None,
        };
        evaluator.refresh(document);
        info!(
            formulas = evaluator.formulas.len(),
            gpa = evaluator.gpa_container.is_some(),
            "formula evaluator attached"
        );
        evaluator.update_all(document)?;
        Ok(evaluator)
    }

    pub fn markup(&self) -> &MarkupConfig {
        &self.markup
    }

    /// Formula elements in document order.
    pub fn formulas(&self) -> &[NodeId] {
        &self.formulas
    }

    pub fn gpa_container(&self) -> Option<NodeId> {
        self.gpa_container
    }

    /// Rebuilds the cached element list after a structural change.
    fn refresh(&mut self, document: &Document) {
        self.formulas = document.query_tag(document.root(), &self.markup.formula_tag);
        self.gpa_container = document.by_id(&self.markup.gpa_container_id);
    }

    /// Re-evaluates every formula element, independently and in order.
    pub fn update_all(&self, document: &mut Document) -> DomainResult<()> {
        debug!(formulas = self.formulas.len(), "recomputing formulas");
        for &formula in &self.formulas {
            self.evaluate_formula(document, formula)?;
        }
        Ok(())
    }

    /// An input value changed somewhere in the document.
    pub fn handle_input(&self, document: &mut Document) -> DomainResult<()> {
        self.update_all(document)
    }

    /// Computes one formula and renders the outcome into it.
    pub fn evaluate_formula(&self, document: &mut Document, formula: NodeId) -> DomainResult<()> {
        match self.compute(document, formula) {
            Ok(value) => {
                document.set_text(formula, &format_number(value))?;
                document.remove_class(formula, &self.markup.invalid_class)
            }
            Err(err) => {
                document.set_text(formula, &err.to_string())?;
                document.add_class(formula, &self.markup.invalid_class)
            }
        }
    }

    /// Computes the value of one formula element without touching it.
    pub fn compute(&self, document: &Document, formula: NodeId) -> Result<f64, FormulaError> {
        let evaluator = document
            .attr(formula, &self.markup.evaluator_attr)
            .unwrap_or_default();

        if evaluator == self.markup.gpa_marker {
            self.calculate_gpa(document, formula)
        } else {
            self.evaluate_expression(document, evaluator)
        }
    }

    fn calculate_gpa(&self, document: &Document, formula: NodeId) -> Result<f64, FormulaError> {
        let Some(container) = document.parent(formula) else {
            return Ok(0.0);
        };

        let mut total_weighted_grade = 0.0;
        let mut total_credits = 0.0;

        for row in document.query_class(container, &self.markup.row_class) {
            let grade = row_number(document, row, &self.markup.grade_class);
            let credit = row_number(document, row, &self.markup.credit_class);

            let (Some(grade), Some(credit)) = (grade, credit) else {
                return Err(FormulaError::Invalid);
            };
            if grade < 0.0 || credit < 0.0 {
                return Err(FormulaError::NegativeGradeOrCredit);
            }

            total_weighted_grade += grade * credit;
            total_credits += credit;
        }

        if total_credits == 0.0 {
            return Ok(0.0);
        }

        let gpa = total_weighted_grade / total_credits;
        if gpa.is_finite() {
            Ok(gpa)
        } else {
            Err(FormulaError::Invalid)
        }
    }

    fn evaluate_expression(&self, document: &Document, expr: &str) -> Result<f64, FormulaError> {
        let ast = parse_expression(expr).map_err(|_| FormulaError::Invalid)?;

        let mut context = Bindings::new();
        for name in ast.variables() {
            let value = resolve_variable(document, &name)?;
            if expr == BMI_EXPRESSION && value < 0.0 {
                return Err(FormulaError::NegativeWeightOrHeight);
            }
            context.insert(name, value);
        }

        let result = ExpressionEvaluator::new(&context)
            .evaluate(&ast)
            .map_err(|_| FormulaError::Invalid)?;

        if result.is_finite() {
            Ok(result)
        } else {
            Err(FormulaError::Invalid)
        }
    }

    /// Routes a click on `target`; only controls inside the GPA container
    /// react.
    pub fn handle_click(&mut self, document: &mut Document, target: NodeId) -> DomainResult<ClickAction> {
        let Some(container) = self.gpa_container else {
            return Ok(ClickAction::Ignored);
        };
        if target != container && !document.is_descendant_of(target, container) {
            return Ok(ClickAction::Ignored);
        }

        if document.has_class(target, &self.markup.add_class) {
            return Ok(match self.add_gpa_row(document)? {
                Some(row) => ClickAction::RowAdded(row),
                None => ClickAction::Ignored,
            });
        }

        if document.has_class(target, &self.markup.remove_class) {
            return Ok(match self.remove_gpa_row(document, target)? {
                Some(row) => ClickAction::RowRemoved(row),
                None => ClickAction::Ignored,
            });
        }

        Ok(ClickAction::Ignored)
    }

    /// Appends an empty grade/credit row just before the GPA formula and
    /// recomputes. Returns `None` when the page has no GPA container.
    pub fn add_gpa_row(&mut self, document: &mut Document) -> DomainResult<Option<NodeId>> {
        let Some(container) = self.gpa_container else {
            warn!("add row requested but the page has no GPA container");
            return Ok(None);
        };

        let markup = &self.markup;
        let row = document.create_detached(Element::new("div").with_class(&markup.row_class));
        document.create_element(
            row,
            Element::new("input")
                .with_attr("type", "text")
                .with_class(&markup.grade_class)
                .with_placeholder("Grade (/20)"),
        )?;
        document.create_element(
            row,
            Element::new("input")
                .with_attr("type", "text")
                .with_class(&markup.credit_class)
                .with_placeholder("Credit"),
        )?;
        document.create_element(
            row,
            Element::new("button")
                .with_attr("type", "button")
                .with_class(&markup.remove_class)
                .with_text("-"),
        )?;

        let formula = document
            .query_tag(container, &markup.formula_tag)
            .into_iter()
            .find(|&f| document.parent(f) == Some(container));
        match formula {
            Some(formula) => document.insert_before(container, row, formula)?,
            None => document.append_child(container, row)?,
        }
        info!(row = row.index(), "GPA row added");

        self.refresh(document);
        self.update_all(document)?;
        Ok(Some(row))
    }

    /// Removes the row enclosing `clicked` and recomputes. Returns the
    /// removed row, or `None` when `clicked` is not inside a row.
    pub fn remove_gpa_row(&mut self, document: &mut Document, clicked: NodeId) -> DomainResult<Option<NodeId>> {
        let Some(row) = document.closest_with_class(clicked, &self.markup.row_class) else {
            return Ok(None);
        };

        document.remove(row)?;
        info!(row = row.index(), "GPA row removed");

        self.refresh(document);
        self.update_all(document)?;
        Ok(Some(row))
    }
}

/// Reads a grade or credit cell of a GPA row. Empty means zero, otherwise
/// the leading decimal of the trimmed text counts (`"12abc"` is 12). A
/// missing cell or one with no leading decimal yields `None`.
fn row_number(document: &Document, row: NodeId, class: &str) -> Option<f64> {
    let cell = document.first_with_class(row, class)?;
    let raw = document.value(cell)?.trim();
    if raw.is_empty() {
        return Some(0.0);
    }
    let prefix = LEADING_DECIMAL.find(raw)?.as_str();
    prefix.parse::<f64>().ok()
}

/// Value of the element with id `name`: missing or empty is zero, anything
/// that is not a plain signed decimal is invalid.
fn resolve_variable(document: &Document, name: &str) -> Result<f64, FormulaError> {
    let value = document
        .by_id(name)
        .and_then(|node| document.value(node))
        .unwrap_or_default();

    if value.is_empty() {
        return Ok(0.0);
    }
    if !NUMERIC_LITERAL.is_match(value) {
        return Err(FormulaError::Invalid);
    }
    value.parse::<f64>().map_err(|_| FormulaError::Invalid)
}

/// Renders a result the way a formula element displays it: plain decimals
/// for magnitudes in `[1e-6, 1e21)`, exponent notation (`1e-7`, `1.5e+24`)
/// outside it.
pub fn format_number(value: f64) -> String {
    if value == 0.0 {
        // also folds -0 into 0
        return "0".to_string();
    }

    let magnitude = value.abs();
    if (1e-6..1e21).contains(&magnitude) {
        return value.to_string();
    }

    let exp = format!("{value:e}");
    match exp.split_once('e') {
        Some((mantissa, exponent)) if !exponent.starts_with('-') => {
            format!("{mantissa}e+{exponent}")
        }
        _ => exp,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Page {
        doc: Document,
        container: NodeId,
        gpa: NodeId,
        add: NodeId,
    }

    fn gpa_page(rows: &[(&str, &str)]) -> Page {
        let mut doc = Document::new();
        let root = doc.root();
        let container = doc
            .create_element(root, Element::new("div").with_id("gpa-container"))
            .unwrap();
        for (grade, credit) in rows {
            add_row(&mut doc, container, grade, credit);
        }
        let gpa = doc
            .create_element(
                container,
                Element::new("formula").with_attr("evaluator", "calculateGPA"),
            )
            .unwrap();
        let add = doc
            .create_element(container, Element::new("button").with_class("add-course"))
            .unwrap();
        Page { doc, container, gpa, add }
    }

    fn add_row(doc: &mut Document, container: NodeId, grade: &str, credit: &str) -> NodeId {
        let row = doc
            .create_element(container, Element::new("div").with_class("gpa-row"))
            .unwrap();
        doc.create_element(row, Element::new("input").with_class("grade").with_value(grade))
            .unwrap();
        doc.create_element(row, Element::new("input").with_class("credit").with_value(credit))
            .unwrap();
        doc.create_element(row, Element::new("button").with_class("remove-course"))
            .unwrap();
        row
    }

    fn expression_page(expr: &str, inputs: &[(&str, &str)]) -> (Document, NodeId) {
        let mut doc = Document::new();
        let root = doc.root();
        for (id, value) in inputs {
            doc.create_element(root, Element::new("input").with_id(id).with_value(value))
                .unwrap();
        }
        let formula = doc
            .create_element(root, Element::new("formula").with_attr("evaluator", expr))
            .unwrap();
        (doc, formula)
    }

    fn render_expression(expr: &str, inputs: &[(&str, &str)]) -> (String, bool) {
        let (mut doc, formula) = expression_page(expr, inputs);
        FormulaEvaluator::attach(&mut doc, MarkupConfig::default()).unwrap();
        (
            doc.text(formula).unwrap().to_string(),
            doc.has_class(formula, "invalid"),
        )
    }

    fn render_gpa(rows: &[(&str, &str)]) -> (String, bool) {
        let mut page = gpa_page(rows);
        FormulaEvaluator::attach(&mut page.doc, MarkupConfig::default()).unwrap();
        (
            page.doc.text(page.gpa).unwrap().to_string(),
            page.doc.has_class(page.gpa, "invalid"),
        )
    }

    #[test]
    fn test_gpa_weighted_average() {
        // (15*2 + 10*3) / 5 = 12
        assert_eq!(render_gpa(&[("15", "2"), ("10", "3")]), ("12".to_string(), false));
        assert_eq!(render_gpa(&[(" 12.5 ", "4")]), ("12.5".to_string(), false));
    }

    #[test]
    fn test_gpa_zero_credits_is_zero() {
        assert_eq!(render_gpa(&[]), ("0".to_string(), false));
        assert_eq!(render_gpa(&[("18", ""), ("", "")]), ("0".to_string(), false));
        assert_eq!(render_gpa(&[("18", "0")]), ("0".to_string(), false));
    }

    #[test]
    fn test_gpa_overflow_is_invalid() {
        let invalid = ("Invalid Formula".to_string(), true);
        assert_eq!(render_gpa(&[("1e308", "1e308")]), invalid);
        assert_eq!(render_gpa(&[("1e308", "1e308"), ("1e308", "1e308")]), invalid);
        assert_eq!(render_gpa(&[("Infinity", "2")]), invalid);
    }

    #[test]
    fn test_gpa_cells_read_leading_decimal() {
        assert_eq!(render_gpa(&[("12abc", "2")]), ("12".to_string(), false));
        assert_eq!(render_gpa(&[("15", "2 credits")]), ("15".to_string(), false));
        assert_eq!(render_gpa(&[("1.5e1x", "1"), ("+5.", "1")]), ("10".to_string(), false));
        assert_eq!(
            render_gpa(&[("-Infinity", "2")]),
            (
                "Invalid Formula (Grade and Credit must be positive numbers)".to_string(),
                true
            )
        );
    }

    #[test]
    fn test_gpa_non_numeric_is_invalid() {
        assert_eq!(
            render_gpa(&[("15", "2"), ("abc", "3")]),
            ("Invalid Formula".to_string(), true)
        );
        assert_eq!(render_gpa(&[("15", "NaN")]), ("Invalid Formula".to_string(), true));
    }

    #[test]
    fn test_gpa_negative_is_positivity_error() {
        let expected = (
            "Invalid Formula (Grade and Credit must be positive numbers)".to_string(),
            true,
        );
        assert_eq!(render_gpa(&[("-1", "2")]), expected);
        assert_eq!(render_gpa(&[("10", "2"), ("10", "-3")]), expected);
    }

    #[test]
    fn test_gpa_row_without_credit_input_is_invalid() {
        let mut page = gpa_page(&[]);
        let row = page
            .doc
            .create_detached(Element::new("div").with_class("gpa-row"));
        page.doc
            .create_element(row, Element::new("input").with_class("grade").with_value("10"))
            .unwrap();
        page.doc.insert_before(page.container, row, page.gpa).unwrap();
        FormulaEvaluator::attach(&mut page.doc, MarkupConfig::default()).unwrap();
        assert_eq!(page.doc.text(page.gpa), Some("Invalid Formula"));
    }

    #[test]
    fn test_expression_with_inputs() {
        assert_eq!(
            render_expression("a + b * c", &[("a", "1"), ("b", "2"), ("c", "3")]),
            ("7".to_string(), false)
        );
        assert_eq!(
            render_expression("(a + b) / 2", &[("a", "-.5"), ("b", "2.5")]),
            ("1".to_string(), false)
        );
    }

    #[test]
    fn test_expression_empty_or_missing_input_is_zero() {
        assert_eq!(render_expression("a + 5", &[("a", "")]), ("5".to_string(), false));
        assert_eq!(render_expression("nowhere + 5", &[]), ("5".to_string(), false));
    }

    #[test]
    fn test_expression_non_numeric_input_is_invalid() {
        for value in ["abc", "1e3", "5.", "+5", " 5", "1.2.3", "--1"] {
            assert_eq!(
                render_expression("a * 2", &[("a", value)]),
                ("Invalid Formula".to_string(), true),
                "value {value:?}"
            );
        }
    }

    #[test]
    fn test_bmi_rule() {
        assert_eq!(
            render_expression(BMI_EXPRESSION, &[("weight", "80"), ("height", "2")]),
            ("20".to_string(), false)
        );
        let expected = (
            "Invalid Formula (Weight and Height must be positive numbers)".to_string(),
            true,
        );
        assert_eq!(
            render_expression(BMI_EXPRESSION, &[("weight", "-80"), ("height", "2")]),
            expected
        );
        assert_eq!(
            render_expression(BMI_EXPRESSION, &[("weight", "80"), ("height", "-2")]),
            expected
        );
    }

    #[test]
    fn test_positivity_rule_only_applies_to_bmi_expression() {
        assert_eq!(
            render_expression("weight / (height*height)", &[("weight", "-80"), ("height", "2")]),
            ("-20".to_string(), false)
        );
    }

    #[test]
    fn test_malformed_or_non_finite_expression_is_invalid() {
        assert_eq!(render_expression("a +", &[("a", "1")]).0, "Invalid Formula");
        assert_eq!(render_expression("a / b", &[("a", "1"), ("b", "0")]).0, "Invalid Formula");
        // both inputs empty: 0 / 0
        assert_eq!(render_expression(BMI_EXPRESSION, &[]).0, "Invalid Formula");
        assert_eq!(render_expression("", &[]).0, "Invalid Formula");
    }

    #[test]
    fn test_invalid_marker_is_cleared_on_recovery() {
        let (mut doc, formula) = expression_page("a * 2", &[("a", "x")]);
        let evaluator = FormulaEvaluator::attach(&mut doc, MarkupConfig::default()).unwrap();
        assert!(doc.has_class(formula, "invalid"));

        let a = doc.by_id("a").unwrap();
        doc.set_value(a, "4").unwrap();
        evaluator.handle_input(&mut doc).unwrap();
        assert_eq!(doc.text(formula), Some("8"));
        assert!(!doc.has_class(formula, "invalid"));
    }

    #[test]
    fn test_one_failure_does_not_affect_other_formulas() {
        let (mut doc, bad) = expression_page("a +", &[("a", "1")]);
        let root = doc.root();
        let good = doc
            .create_element(root, Element::new("formula").with_attr("evaluator", "a + 1"))
            .unwrap();
        FormulaEvaluator::attach(&mut doc, MarkupConfig::default()).unwrap();
        assert_eq!(doc.text(bad), Some("Invalid Formula"));
        assert_eq!(doc.text(good), Some("2"));
    }

    #[test]
    fn test_recomputation_is_idempotent() {
        let mut page = gpa_page(&[("14", "3"), ("9", "1")]);
        let evaluator = FormulaEvaluator::attach(&mut page.doc, MarkupConfig::default()).unwrap();
        let first = page.doc.text(page.gpa).unwrap().to_string();
        evaluator.update_all(&mut page.doc).unwrap();
        evaluator.update_all(&mut page.doc).unwrap();
        assert_eq!(page.doc.text(page.gpa), Some(first.as_str()));
        assert!(!page.doc.has_class(page.gpa, "invalid"));
    }

    #[test]
    fn test_add_row_inserts_before_formula_and_recomputes() {
        let mut page = gpa_page(&[("10", "1")]);
        let mut evaluator =
            FormulaEvaluator::attach(&mut page.doc, MarkupConfig::default()).unwrap();

        let action = evaluator.handle_click(&mut page.doc, page.add).unwrap();
        let ClickAction::RowAdded(row) = action else {
            panic!("expected a new row, got {action:?}");
        };

        let children = page.doc.children(page.container).to_vec();
        let row_pos = children.iter().position(|&c| c == row).unwrap();
        let gpa_pos = children.iter().position(|&c| c == page.gpa).unwrap();
        assert_eq!(row_pos + 1, gpa_pos);

        let grade = page.doc.first_with_class(row, "grade").unwrap();
        let credit = page.doc.first_with_class(row, "credit").unwrap();
        assert_eq!(
            page.doc.element(grade).unwrap().placeholder.as_deref(),
            Some("Grade (/20)")
        );
        assert!(page.doc.first_with_class(row, "remove-course").is_some());

        // the new row joins the next pass
        page.doc.set_value(grade, "20").unwrap();
        page.doc.set_value(credit, "1").unwrap();
        evaluator.handle_input(&mut page.doc).unwrap();
        assert_eq!(page.doc.text(page.gpa), Some("15"));
    }

    #[test]
    fn test_remove_row_recomputes_without_it() {
        let mut page = gpa_page(&[("10", "1"), ("-4", "1")]);
        let mut evaluator =
            FormulaEvaluator::attach(&mut page.doc, MarkupConfig::default()).unwrap();
        assert!(page.doc.has_class(page.gpa, "invalid"));

        let rows = page.doc.query_class(page.container, "gpa-row");
        let remove = page.doc.first_with_class(rows[1], "remove-course").unwrap();
        let action = evaluator.handle_click(&mut page.doc, remove).unwrap();

        assert_eq!(action, ClickAction::RowRemoved(rows[1]));
        assert!(!page.doc.is_attached(rows[1]));
        assert_eq!(page.doc.text(page.gpa), Some("10"));
        assert!(!page.doc.has_class(page.gpa, "invalid"));
    }

    #[test]
    fn test_clicks_outside_gpa_container_are_ignored() {
        let mut page = gpa_page(&[]);
        let root = page.doc.root();
        let stray = page
            .doc
            .create_element(root, Element::new("button").with_class("add-course"))
            .unwrap();
        let mut evaluator =
            FormulaEvaluator::attach(&mut page.doc, MarkupConfig::default()).unwrap();

        assert_eq!(
            evaluator.handle_click(&mut page.doc, stray).unwrap(),
            ClickAction::Ignored
        );
        assert_eq!(
            evaluator.handle_click(&mut page.doc, page.gpa).unwrap(),
            ClickAction::Ignored
        );
        assert!(page.doc.query_class(page.container, "gpa-row").is_empty());
    }

    #[test]
    fn test_add_row_without_container_is_a_no_op() {
        let (mut doc, _) = expression_page("1 + 1", &[]);
        let mut evaluator = FormulaEvaluator::attach(&mut doc, MarkupConfig::default()).unwrap();
        assert_eq!(evaluator.gpa_container(), None);
        assert_eq!(evaluator.add_gpa_row(&mut doc).unwrap(), None);
    }

    #[test]
    fn test_custom_markup_names() {
        let markup = MarkupConfig {
            formula_tag: "output".into(),
            evaluator_attr: "data-expr".into(),
            invalid_class: "error".into(),
            ..MarkupConfig::default()
        };
        let mut doc = Document::new();
        let root = doc.root();
        doc.create_element(root, Element::new("input").with_id("x").with_value("oops"))
            .unwrap();
        let out = doc
            .create_element(root, Element::new("output").with_attr("data-expr", "x * 3"))
            .unwrap();
        FormulaEvaluator::attach(&mut doc, markup).unwrap();
        assert_eq!(doc.text(out), Some("Invalid Formula"));
        assert!(doc.has_class(out, "error"));
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(5.0), "5");
        assert_eq!(format_number(-0.0), "0");
        assert_eq!(format_number(2.5), "2.5");
        assert_eq!(format_number(-3.25), "-3.25");
        assert_eq!(format_number(0.000001), "0.000001");
        assert_eq!(format_number(1.0 / 10000000.0), "1e-7");
        assert_eq!(format_number(1e24), "1e+24");
        assert_eq!(format_number(-1.5e21), "-1.5e+21");
        assert_eq!(format_number(123456789012345680000.0), "123456789012345680000");
    }
}
