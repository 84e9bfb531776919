use std::collections::HashMap;
use serde::{Deserialize, Serialize};

use super::document::{Document, Element, NodeId};
use super::errors::DomainResult;

/// Names that tie a page's markup to formula behaviour.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarkupConfig {
    /// Tag of formula output elements.
    pub formula_tag: String,
    /// Attribute holding the expression (or the GPA marker).
    pub evaluator_attr: String,
    /// Evaluator value that selects the GPA rule instead of an expression.
    pub gpa_marker: String,
    /// Id of the element holding GPA rows.
    pub gpa_container_id: String,
    pub row_class: String,
    pub grade_class: String,
    pub credit_class: String,
    pub add_class: String,
    pub remove_class: String,
    /// Class set on a formula element while it shows an error.
    pub invalid_class: String,
}

impl Default for MarkupConfig {
    fn default() -> Self {
        Self {
            formula_tag: "formula".into(),
            evaluator_attr: "evaluator".into(),
            gpa_marker: "calculateGPA".into(),
            gpa_container_id: "gpa-container".into(),
            row_class: "gpa-row".into(),
            grade_class: "grade".into(),
            credit_class: "credit".into(),
            add_class: "add-course".into(),
            remove_class: "remove-course".into(),
            invalid_class: "invalid".into(),
        }
    }
}

/// A page definition: the markup a [`Document`] is built from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageSpec {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub body: Vec<NodeSpec>,
}

/// One element of a page definition and its children.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NodeSpec {
    pub tag: String,
    pub id: Option<String>,
    pub class: Vec<String>,
    pub attrs: HashMap<String, String>,
    pub value: Option<String>,
    pub text: Option<String>,
    pub placeholder: Option<String>,
    pub label: Option<String>,
    pub children: Vec<NodeSpec>,
}

const DEMO_PAGE: &str = include_str!("../../pages/demo.json");

impl PageSpec {
    /// The page shown when no page file is given.
    pub fn demo() -> Result<Self, serde_json::Error> {
        serde_json::from_str(DEMO_PAGE)
    }

    /// Builds a fresh document containing this page's body.
    pub fn build(&self) -> DomainResult<Document> {
        let mut document = Document::new();
        let root = document.root();
        for node in &self.body {
            node.build_into(&mut document, root)?;
        }
        Ok(document)
    }
}

impl NodeSpec {
    fn to_element(&self) -> Element {
        Element {
            tag: self.tag.clone(),
            id: self.id.clone(),
            classes: self.class.clone(),
            attrs: self.attrs.clone(),
            value: self.value.clone().unwrap_or_default(),
            text: self.text.clone().unwrap_or_default(),
            placeholder: self.placeholder.clone(),
            label: self.label.clone(),
        }
    }

    fn build_into(&self, document: &mut Document, parent: NodeId) -> DomainResult<NodeId> {
        let node = document.create_element(parent, self.to_element())?;
        for child in &self.children {
            child.build_into(document, node)?;
        }
        Ok(node)
    }
}
