use indexmap::IndexMap;
use std::cell::{Cell, RefCell};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u64);

/// The slice of the DOM that nonce'd client code touches. Methods take
/// `&self`, as DOM handles do, so a guard can hold a shared borrow while the
/// rest of the page keeps working with the document.
pub trait Document {
    fn create_element(&self, tag: &str) -> NodeId;
    fn set_attribute(&self, node: NodeId, name: &str, value: &str);
    fn set_text(&self, node: NodeId, text: &str);
    fn append_to_body(&self, node: NodeId);
    /// Detaches and discards the node. Returns `false` if it was not attached.
    fn remove_from_body(&self, node: NodeId) -> bool;
    fn body_contains(&self, node: NodeId) -> bool;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub tag: String,
    pub attributes: IndexMap<String, String>,
    pub text: String,
}

impl Element {
    #[inline]
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }
}

/// A document kept in memory, for the server-side demo and for tests.
#[derive(Debug, Default)]
pub struct MemoryDocument {
    next_id: Cell<u64>,
    nodes: RefCell<IndexMap<NodeId, Element>>,
    body: RefCell<Vec<NodeId>>,
}

impl MemoryDocument {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn element(&self, node: NodeId) -> Option<Element> {
        self.nodes.borrow().get(&node).cloned()
    }

    pub fn body_children(&self) -> Vec<NodeId> {
        self.body.borrow().clone()
    }

    /// Every node the document still holds, attached or not.
    #[inline]
    pub fn node_count(&self) -> usize {
        self.nodes.borrow().len()
    }

    pub fn elements_by_tag(&self, tag: &str) -> Vec<Element> {
        self.nodes
            .borrow()
            .values()
            .filter(|e| e.tag.eq_ignore_ascii_case(tag))
            .cloned()
            .collect()
    }
}

impl Document for MemoryDocument {
    fn create_element(&self, tag: &str) -> NodeId {
        let id = NodeId(self.next_id.get());
        self.next_id.set(id.0 + 1);
        self.nodes.borrow_mut().insert(
            id,
            Element {
                tag: tag.to_ascii_lowercase(),
                attributes: IndexMap::new(),
                text: String::new(),
            },
        );
        id
    }

    fn set_attribute(&self, node: NodeId, name: &str, value: &str) {
        if let Some(element) = self.nodes.borrow_mut().get_mut(&node) {
            element.attributes.insert(name.to_owned(), value.to_owned());
        }
    }

    fn set_text(&self, node: NodeId, text: &str) {
        if let Some(element) = self.nodes.borrow_mut().get_mut(&node) {
            element.text = text.to_owned();
        }
    }

    fn append_to_body(&self, node: NodeId) {
        if !self.nodes.borrow().contains_key(&node) {
            return;
        }
        let mut body = self.body.borrow_mut();
        if !body.contains(&node) {
            body.push(node);
        }
    }

    fn remove_from_body(&self, node: NodeId) -> bool {
        let mut body = self.body.borrow_mut();
        let Some(position) = body.iter().position(|n| *n == node) else {
            return false;
        };
        body.remove(position);
        self.nodes.borrow_mut().shift_remove(&node);
        true
    }

    fn body_contains(&self, node: NodeId) -> bool {
        self.body.borrow().contains(&node)
    }
}
