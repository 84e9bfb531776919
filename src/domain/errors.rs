use thiserror::Error;

/// A formula that could not be rendered as a number.
///
/// The `Display` text of each variant is exactly what the formula element
/// shows in place of a result.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FormulaError {
    #[error("Invalid Formula")]
    Invalid,
    #[error("Invalid Formula (Grade and Credit must be positive numbers)")]
    NegativeGradeOrCredit,
    #[error("Invalid Formula (Weight and Height must be positive numbers)")]
    NegativeWeightOrHeight,
}

/// Structural misuse of the document tree.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DocumentError {
    #[error("node {0} is not an element")]
    NotAnElement(usize),
    #[error("node {0} is not a direct child of node {1}")]
    NotAChild(usize, usize),
    #[error("inserting node {0} would create a cycle")]
    Cycle(usize),
    #[error("the document root cannot be moved or removed")]
    Root,
}

pub type DomainResult<T> = Result<T, DocumentError>;
