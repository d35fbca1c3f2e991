//! Document builder
//!
//! Records a document tree in pre-order. The position of each node in the
//! builder becomes its identifier once the document is stored: the
//! document node is [`NodeId::FIRST`], then the root element, its
//! attributes, its children, and so on.
//!
//! Builder misuse (attributes after content, unbalanced elements) is
//! recorded and reported by [`DocumentBuilder::finish`].

use arbor_core::{Error, NodeId, NodeType, Result};

/// Node recorded by the builder, positioned in pre-order
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct PendingNode {
    pub(crate) node_type: NodeType,
    pub(crate) name: Option<String>,
    pub(crate) value: String,
    pub(crate) parent: Option<usize>,
    pub(crate) subtree_end: usize,
}

/// Pre-order recorder for one document
#[derive(Debug, Clone)]
pub struct DocumentBuilder {
    nodes: Vec<PendingNode>,
    open: Vec<usize>,
    error: Option<String>,
}

impl DocumentBuilder {
    /// Builder holding only the document node
    pub fn new() -> Self {
        DocumentBuilder {
            nodes: vec![PendingNode {
                node_type: NodeType::Document,
                name: None,
                value: String::new(),
                parent: None,
                subtree_end: 1,
            }],
            open: vec![0],
            error: None,
        }
    }

    /// Open an element as the next child of the current element
    pub fn start_element(&mut self, name: impl Into<String>) -> &mut Self {
        let idx = self.push(NodeType::Element, Some(name.into()), String::new());
        self.open.push(idx);
        self
    }

    /// Add an attribute to the element opened last
    ///
    /// Must directly follow `start_element` or another attribute.
    pub fn attribute(&mut self, name: impl Into<String>, value: impl Into<String>) -> &mut Self {
        let name = name.into();
        let current = self.current();
        let last = self.nodes.len() - 1;
        let in_start_tag = self.nodes[current].node_type == NodeType::Element
            && (last == current
                || (self.nodes[last].node_type == NodeType::Attribute
                    && self.nodes[last].parent == Some(current)));
        if !in_start_tag {
            self.fail(format!("attribute '{}' must follow its element's start tag", name));
            return self;
        }
        self.push(NodeType::Attribute, Some(name), value.into());
        self
    }

    /// Add a text node
    pub fn text(&mut self, value: impl Into<String>) -> &mut Self {
        self.push(NodeType::Text, None, value.into());
        self
    }

    /// Add a CDATA section
    pub fn cdata(&mut self, value: impl Into<String>) -> &mut Self {
        self.push(NodeType::CData, None, value.into());
        self
    }

    /// Add a comment
    pub fn comment(&mut self, value: impl Into<String>) -> &mut Self {
        self.push(NodeType::Comment, None, value.into());
        self
    }

    /// Add a processing instruction
    pub fn processing_instruction(
        &mut self,
        target: impl Into<String>,
        data: impl Into<String>,
    ) -> &mut Self {
        self.push(NodeType::ProcessingInstruction, Some(target.into()), data.into());
        self
    }

    /// Close the element opened last
    pub fn end_element(&mut self) -> &mut Self {
        if self.open.len() <= 1 {
            self.fail("end_element without a matching start_element".to_string());
            return self;
        }
        if let Some(idx) = self.open.pop() {
            self.nodes[idx].subtree_end = self.nodes.len();
        }
        self
    }

    /// Number of nodes recorded so far, document node included
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// True if only the document node has been recorded
    pub fn is_empty(&self) -> bool {
        self.nodes.len() == 1
    }

    /// Identifier the next recorded node will receive
    pub fn next_id(&self) -> NodeId {
        NodeId::new(self.nodes.len() as u64 + 1)
    }

    /// Validate and hand over the recorded nodes
    pub(crate) fn finish(mut self) -> Result<Vec<PendingNode>> {
        if let Some(msg) = self.error.take() {
            return Err(Error::invalid_operation(msg));
        }
        if self.open.len() > 1 {
            return Err(Error::invalid_operation(format!(
                "{} element(s) left open",
                self.open.len() - 1
            )));
        }
        self.nodes[0].subtree_end = self.nodes.len();
        Ok(self.nodes)
    }

    fn current(&self) -> usize {
        self.open.last().copied().unwrap_or(0)
    }

    fn push(&mut self, node_type: NodeType, name: Option<String>, value: String) -> usize {
        let idx = self.nodes.len();
        self.nodes.push(PendingNode {
            node_type,
            name,
            value,
            parent: Some(self.current()),
            subtree_end: idx + 1,
        });
        idx
    }

    fn fail(&mut self, msg: String) {
        if self.error.is_none() {
            self.error = Some(msg);
        }
    }
}

impl Default for DocumentBuilder {
    fn default() -> Self {
        Self::new()
    }
}
