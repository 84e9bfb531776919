//! In-memory document tree for form pages.
//!
//! Nodes live in an arena and are addressed by [`NodeId`]. Removing a node
//! detaches it from its parent but keeps it in the arena, so ids held by
//! callers stay valid; detached subtrees are simply unreachable from the
//! root and are skipped by every query.

use std::collections::HashMap;

use super::errors::{DocumentError, DomainResult};

/// Handle to a node in a [`Document`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// An element node: tag, id, classes, attributes and the two kinds of
/// content a form cares about (an input `value` and rendered `text`).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Element {
    pub tag: String,
    pub id: Option<String>,
    pub classes: Vec<String>,
    pub attrs: HashMap<String, String>,
    pub value: String,
    pub text: String,
    pub placeholder: Option<String>,
    pub label: Option<String>,
}

impl Element {
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_string(),
            ..Self::default()
        }
    }

    pub fn with_id(mut self, id: &str) -> Self {
        self.id = Some(id.to_string());
        self
    }

    pub fn with_class(mut self, class: &str) -> Self {
        if !self.has_class(class) {
            self.classes.push(class.to_string());
        }
        self
    }

    pub fn with_attr(mut self, name: &str, value: &str) -> Self {
        self.attrs.insert(name.to_string(), value.to_string());
        self
    }

    pub fn with_value(mut self, value: &str) -> Self {
        self.value = value.to_string();
        self
    }

    pub fn with_text(mut self, text: &str) -> Self {
        self.text = text.to_string();
        self
    }

    pub fn with_placeholder(mut self, placeholder: &str) -> Self {
        self.placeholder = Some(placeholder.to_string());
        self
    }

    pub fn with_label(mut self, label: &str) -> Self {
        self.label = Some(label.to_string());
        self
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    pub fn is_input(&self) -> bool {
        self.tag == "input"
    }

    pub fn is_button(&self) -> bool {
        self.tag == "button"
    }
}

#[derive(Debug, Clone)]
enum NodeType {
    Document,
    Element(Element),
}

#[derive(Debug, Clone)]
struct Node {
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    node_type: NodeType,
}

#[derive(Debug, Clone)]
pub struct Document {
    nodes: Vec<Node>,
    root: NodeId,
    id_index: HashMap<String, NodeId>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    pub fn new() -> Self {
        let root = Node {
            parent: None,
            children: Vec::new(),
            node_type: NodeType::Document,
        };
        Self {
            nodes: vec![root],
            root: NodeId(0),
            id_index: HashMap::new(),
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Creates an element and appends it as the last child of `parent`.
    pub fn create_element(&mut self, parent: NodeId, element: Element) -> DomainResult<NodeId> {
        let id = self.create_detached(element);
        self.append_child(parent, id)?;
        Ok(id)
    }

    /// Creates an element that is not yet part of the tree.
    pub fn create_detached(&mut self, element: Element) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            parent: None,
            children: Vec::new(),
            node_type: NodeType::Element(element),
        });
        id
    }

    pub fn element(&self, node: NodeId) -> Option<&Element> {
        match &self.nodes.get(node.0)?.node_type {
            NodeType::Element(element) => Some(element),
            NodeType::Document => None,
        }
    }

    pub fn element_mut(&mut self, node: NodeId) -> Option<&mut Element> {
        match &mut self.nodes.get_mut(node.0)?.node_type {
            NodeType::Element(element) => Some(element),
            NodeType::Document => None,
        }
    }

    fn require_element_mut(&mut self, node: NodeId) -> DomainResult<&mut Element> {
        self.element_mut(node)
            .ok_or(DocumentError::NotAnElement(node.0))
    }

    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.nodes.get(node.0).and_then(|n| n.parent)
    }

    pub fn children(&self, node: NodeId) -> &[NodeId] {
        self.nodes
            .get(node.0)
            .map(|n| n.children.as_slice())
            .unwrap_or(&[])
    }

    /// Returns true when `node` is reachable from the document root.
    pub fn is_attached(&self, node: NodeId) -> bool {
        let mut cursor = Some(node);
        while let Some(current) = cursor {
            if current == self.root {
                return true;
            }
            cursor = self.parent(current);
        }
        false
    }

    pub fn is_descendant_of(&self, node: NodeId, ancestor: NodeId) -> bool {
        let mut cursor = self.parent(node);
        while let Some(current) = cursor {
            if current == ancestor {
                return true;
            }
            cursor = self.parent(current);
        }
        false
    }

    /// Looks up an attached element by its id. The first element in
    /// document order wins when ids are duplicated.
    pub fn by_id(&self, id: &str) -> Option<NodeId> {
        self.id_index.get(id).copied()
    }

    /// All nodes below `scope` in document (pre-)order, excluding `scope`.
    pub fn descendants(&self, scope: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.children(scope).iter().rev().copied().collect();
        while let Some(node) = stack.pop() {
            out.push(node);
            stack.extend(self.children(node).iter().rev().copied());
        }
        out
    }

    pub fn find_all<F>(&self, scope: NodeId, predicate: F) -> Vec<NodeId>
    where
        F: Fn(&Element) -> bool,
    {
        self.descendants(scope)
            .into_iter()
            .filter(|&node| self.element(node).is_some_and(&predicate))
            .collect()
    }

    pub fn find_first<F>(&self, scope: NodeId, predicate: F) -> Option<NodeId>
    where
        F: Fn(&Element) -> bool,
    {
        self.descendants(scope)
            .into_iter()
            .find(|&node| self.element(node).is_some_and(&predicate))
    }

    pub fn query_tag(&self, scope: NodeId, tag: &str) -> Vec<NodeId> {
        self.find_all(scope, |e| e.tag == tag)
    }

    pub fn query_class(&self, scope: NodeId, class: &str) -> Vec<NodeId> {
        self.find_all(scope, |e| e.has_class(class))
    }

    pub fn first_with_class(&self, scope: NodeId, class: &str) -> Option<NodeId> {
        self.find_first(scope, |e| e.has_class(class))
    }

    /// Nearest element carrying `class`, starting at `node` itself.
    pub fn closest_with_class(&self, node: NodeId, class: &str) -> Option<NodeId> {
        let mut cursor = Some(node);
        while let Some(current) = cursor {
            if self.element(current).is_some_and(|e| e.has_class(class)) {
                return Some(current);
            }
            cursor = self.parent(current);
        }
        None
    }

    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> DomainResult<()> {
        self.check_insertable(parent, child)?;
        self.detach(child);
        self.nodes[child.0].parent = Some(parent);
        self.nodes[parent.0].children.push(child);
        self.rebuild_id_index();
        Ok(())
    }

    /// Inserts `child` into `parent` immediately before `reference`.
    pub fn insert_before(
        &mut self,
        parent: NodeId,
        child: NodeId,
        reference: NodeId,
    ) -> DomainResult<()> {
        if self.parent(reference) != Some(parent) {
            return Err(DocumentError::NotAChild(reference.0, parent.0));
        }
        if child == reference {
            return Ok(());
        }
        self.check_insertable(parent, child)?;
        self.detach(child);

        let index = self.nodes[parent.0]
            .children
            .iter()
            .position(|id| *id == reference)
            .ok_or(DocumentError::NotAChild(reference.0, parent.0))?;
        self.nodes[child.0].parent = Some(parent);
        self.nodes[parent.0].children.insert(index, child);
        self.rebuild_id_index();
        Ok(())
    }

    /// Detaches `node` (and its subtree) from the tree.
    pub fn remove(&mut self, node: NodeId) -> DomainResult<()> {
        if node == self.root {
            return Err(DocumentError::Root);
        }
        if node.0 >= self.nodes.len() {
            return Err(DocumentError::NotAnElement(node.0));
        }
        self.detach(node);
        self.rebuild_id_index();
        Ok(())
    }

    pub fn value(&self, node: NodeId) -> Option<&str> {
        self.element(node).map(|e| e.value.as_str())
    }

    pub fn set_value(&mut self, node: NodeId, value: &str) -> DomainResult<()> {
        self.require_element_mut(node)?.value = value.to_string();
        Ok(())
    }

    pub fn text(&self, node: NodeId) -> Option<&str> {
        self.element(node).map(|e| e.text.as_str())
    }

    pub fn set_text(&mut self, node: NodeId, text: &str) -> DomainResult<()> {
        self.require_element_mut(node)?.text = text.to_string();
        Ok(())
    }

    pub fn attr(&self, node: NodeId, name: &str) -> Option<&str> {
        self.element(node)
            .and_then(|e| e.attrs.get(name))
            .map(String::as_str)
    }

    pub fn has_class(&self, node: NodeId, class: &str) -> bool {
        self.element(node).is_some_and(|e| e.has_class(class))
    }

    pub fn add_class(&mut self, node: NodeId, class: &str) -> DomainResult<()> {
        let element = self.require_element_mut(node)?;
        if !element.has_class(class) {
            element.classes.push(class.to_string());
        }
        Ok(())
    }

    pub fn remove_class(&mut self, node: NodeId, class: &str) -> DomainResult<()> {
        self.require_element_mut(node)?.classes.retain(|c| c != class);
        Ok(())
    }

    fn check_insertable(&self, parent: NodeId, child: NodeId) -> DomainResult<()> {
        if child == self.root {
            return Err(DocumentError::Root);
        }
        if parent.0 >= self.nodes.len() {
            return Err(DocumentError::NotAnElement(parent.0));
        }
        if self.element(child).is_none() {
            return Err(DocumentError::NotAnElement(child.0));
        }
        // parent must not sit inside child's subtree
        let mut cursor = Some(parent);
        while let Some(node) = cursor {
            if node == child {
                return Err(DocumentError::Cycle(child.0));
            }
            cursor = self.parent(node);
        }
        Ok(())
    }

    fn detach(&mut self, node: NodeId) {
        if let Some(old_parent) = self.nodes[node.0].parent.take() {
            self.nodes[old_parent.0].children.retain(|id| *id != node);
        }
    }

    fn rebuild_id_index(&mut self) {
        let mut index = HashMap::new();
        for node in self.descendants(self.root) {
            if let Some(id) = self.element(node).and_then(|e| e.id.as_deref()) {
                if !id.is_empty() {
                    index.entry(id.to_string()).or_insert(node);
                }
            }
        }
        self.id_index = index;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> (Document, NodeId, NodeId, NodeId) {
        let mut doc = Document::new();
        let root = doc.root();
        let form = doc
            .create_element(root, Element::new("div").with_id("form"))
            .unwrap();
        let a = doc
            .create_element(form, Element::new("input").with_id("a").with_value("1"))
            .unwrap();
        let out = doc
            .create_element(form, Element::new("formula").with_attr("evaluator", "a"))
            .unwrap();
        (doc, form, a, out)
    }

    #[test]
    fn test_by_id_finds_attached_elements() {
        let (doc, form, a, _) = sample();
        assert_eq!(doc.by_id("form"), Some(form));
        assert_eq!(doc.by_id("a"), Some(a));
        assert_eq!(doc.by_id("missing"), None);
    }

    #[test]
    fn test_removed_node_leaves_id_index() {
        let (mut doc, _, a, _) = sample();
        doc.remove(a).unwrap();
        assert_eq!(doc.by_id("a"), None);
        assert!(!doc.is_attached(a));
        // the handle still resolves to the detached element
        assert_eq!(doc.value(a), Some("1"));
    }

    #[test]
    fn test_duplicate_ids_resolve_to_first_in_document_order() {
        let (mut doc, form, a, _) = sample();
        doc.create_element(form, Element::new("input").with_id("a"))
            .unwrap();
        assert_eq!(doc.by_id("a"), Some(a));
    }

    #[test]
    fn test_insert_before_places_child_ahead_of_reference() {
        let (mut doc, form, a, out) = sample();
        let b = doc.create_detached(Element::new("input").with_id("b"));
        doc.insert_before(form, b, out).unwrap();
        assert_eq!(doc.children(form), &[a, b, out]);
        assert_eq!(doc.by_id("b"), Some(b));
    }

    #[test]
    fn test_insert_before_rejects_foreign_reference() {
        let (mut doc, _, a, _) = sample();
        let root = doc.root();
        let b = doc.create_detached(Element::new("input"));
        assert_eq!(
            doc.insert_before(root, b, a),
            Err(DocumentError::NotAChild(a.index(), root.index()))
        );
    }

    #[test]
    fn test_cycles_are_rejected() {
        let (mut doc, form, a, _) = sample();
        assert_eq!(doc.append_child(a, form), Err(DocumentError::Cycle(form.index())));
        assert_eq!(doc.remove(doc.root()), Err(DocumentError::Root));
    }

    #[test]
    fn test_descendants_are_in_document_order() {
        let (mut doc, form, a, out) = sample();
        let inner = doc.create_element(a, Element::new("span")).unwrap();
        assert_eq!(doc.descendants(doc.root()), vec![form, a, inner, out]);
    }

    #[test]
    fn test_closest_includes_self_and_ancestors() {
        let mut doc = Document::new();
        let root = doc.root();
        let row = doc
            .create_element(root, Element::new("div").with_class("gpa-row"))
            .unwrap();
        let button = doc
            .create_element(row, Element::new("button").with_class("remove-course"))
            .unwrap();
        assert_eq!(doc.closest_with_class(button, "gpa-row"), Some(row));
        assert_eq!(doc.closest_with_class(row, "gpa-row"), Some(row));
        assert_eq!(doc.closest_with_class(button, "other"), None);
    }

    #[test]
    fn test_class_and_content_mutation() {
        let (mut doc, _, a, out) = sample();
        doc.add_class(out, "invalid").unwrap();
        doc.add_class(out, "invalid").unwrap();
        assert_eq!(doc.element(out).unwrap().classes, vec!["invalid".to_string()]);
        doc.remove_class(out, "invalid").unwrap();
        assert!(!doc.has_class(out, "invalid"));

        doc.set_value(a, "42").unwrap();
        doc.set_text(out, "42").unwrap();
        assert_eq!(doc.value(a), Some("42"));
        assert_eq!(doc.text(out), Some("42"));
        assert_eq!(doc.attr(out, "evaluator"), Some("a"));
        assert!(doc.set_text(doc.root(), "x").is_err());
    }

    #[test]
    fn test_query_helpers() {
        let (doc, form, _, out) = sample();
        assert_eq!(doc.query_tag(doc.root(), "formula"), vec![out]);
        assert!(doc.query_class(form, "grade").is_empty());
        assert!(doc.is_descendant_of(out, form));
        assert!(!doc.is_descendant_of(form, out));
    }
}
