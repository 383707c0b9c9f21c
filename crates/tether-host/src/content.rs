#![forbid(unsafe_code)]

//! Content model for a host's rendered output: declared slots and the
//! child nodes projected into them.
//!
//! # Design
//!
//! A host's output declares a set of slots — the default slot plus any
//! number of named slots. Projected children are distributed by name:
//! elements carrying a slot name go to the matching named slot, elements
//! without one and bare text go to the default slot. Content whose target
//! slot is not declared is retained but inert: it is not assigned anywhere
//! and produces no change signal.
//!
//! Internally the default slot is the empty name, which is also the name
//! carried by change signals for it.

/// A child content item projected into a host.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Node {
    /// An element child, optionally targeting a named slot.
    Element(Element),
    /// A bare text child. Always distributes to the default slot.
    Text(String),
}

impl Node {
    /// The text content of this node.
    #[must_use]
    pub fn text(&self) -> &str {
        match self {
            Self::Element(el) => el.text(),
            Self::Text(text) => text,
        }
    }

    /// Name of the slot this node distributes to (empty for the default
    /// slot).
    pub(crate) fn target_slot(&self) -> &str {
        match self {
            Self::Element(el) => el.slot.as_deref().unwrap_or(""),
            Self::Text(_) => "",
        }
    }
}

/// An element child: a tag, an optional target slot name, and text content.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Element {
    tag: String,
    slot: Option<String>,
    text: String,
}

impl Element {
    /// Create an element with the given tag and no slot target or text.
    #[must_use]
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            slot: None,
            text: String::new(),
        }
    }

    /// Target a named slot.
    #[must_use]
    pub fn with_slot(mut self, slot: impl Into<String>) -> Self {
        self.slot = Some(slot.into());
        self
    }

    /// Set the text content.
    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    #[must_use]
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// The named slot this element targets, if any.
    #[must_use]
    pub fn slot(&self) -> Option<&str> {
        self.slot.as_deref()
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }
}

/// Declared slots and projected children for one host.
#[derive(Default)]
pub(crate) struct ContentArea {
    /// Declared slot names in declaration order; `""` is the default slot.
    declared: Vec<String>,
    children: Vec<Node>,
}

impl ContentArea {
    /// Declare a slot. Returns the canonical slot name if it was newly
    /// declared, `None` if it already existed.
    pub(crate) fn declare(&mut self, name: Option<&str>) -> Option<String> {
        let canonical = name.unwrap_or("");
        if self.declared.iter().any(|n| n == canonical) {
            return None;
        }
        self.declared.push(canonical.to_owned());
        Some(canonical.to_owned())
    }

    /// Append a child. Returns the canonical name of the declared slot it
    /// was assigned to, or `None` if its target slot is not declared.
    pub(crate) fn append(&mut self, node: Node) -> Option<String> {
        let target = node.target_slot().to_owned();
        self.children.push(node);
        self.is_declared(&target).then_some(target)
    }

    pub(crate) fn is_declared(&self, canonical: &str) -> bool {
        self.declared.iter().any(|n| n == canonical)
    }

    /// Whether any child currently distributes to the given slot.
    pub(crate) fn has_children_for(&self, canonical: &str) -> bool {
        self.children.iter().any(|n| n.target_slot() == canonical)
    }

    /// All nodes assigned to the named (or default) slot, or `None` if no
    /// such slot is declared.
    pub(crate) fn assigned_nodes(&self, name: Option<&str>) -> Option<Vec<Node>> {
        let canonical = name.unwrap_or("");
        if !self.is_declared(canonical) {
            return None;
        }
        Some(
            self.children
                .iter()
                .filter(|n| n.target_slot() == canonical)
                .cloned()
                .collect(),
        )
    }

    /// Element children assigned to the named (or default) slot, or `None`
    /// if no such slot is declared.
    pub(crate) fn assigned_elements(&self, name: Option<&str>) -> Option<Vec<Element>> {
        let canonical = name.unwrap_or("");
        if !self.is_declared(canonical) {
            return None;
        }
        Some(
            self.children
                .iter()
                .filter(|n| n.target_slot() == canonical)
                .filter_map(|n| match n {
                    Node::Element(el) => Some(el.clone()),
                    Node::Text(_) => None,
                })
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn elements_distribute_by_slot_name() {
        let mut area = ContentArea::default();
        area.declare(None);
        area.declare(Some("side"));

        assert_eq!(
            area.append(Node::Element(Element::new("span").with_slot("side"))),
            Some("side".to_owned())
        );
        assert_eq!(area.append(Node::Element(Element::new("p"))), Some(String::new()));
        assert_eq!(area.append(Node::Text("hello".into())), Some(String::new()));

        assert_eq!(area.assigned_nodes(Some("side")).map(|n| n.len()), Some(1));
        assert_eq!(area.assigned_nodes(None).map(|n| n.len()), Some(2));
    }

    #[test]
    fn text_never_reaches_named_slots() {
        let mut area = ContentArea::default();
        area.declare(Some("side"));
        area.append(Node::Text("stray".into()));

        assert_eq!(area.assigned_nodes(Some("side")), Some(vec![]));
        // Default slot is not declared, so the text is inert.
        assert_eq!(area.assigned_nodes(None), None);
    }

    #[test]
    fn undeclared_slot_yields_none() {
        let area = ContentArea::default();
        assert_eq!(area.assigned_nodes(Some("missing")), None);
        assert_eq!(area.assigned_elements(Some("missing")), None);
    }

    #[test]
    fn append_to_undeclared_slot_is_inert() {
        let mut area = ContentArea::default();
        area.declare(None);
        assert_eq!(
            area.append(Node::Element(Element::new("span").with_slot("later"))),
            None
        );
        // Declaring afterwards picks the child up.
        assert_eq!(area.declare(Some("later")), Some("later".to_owned()));
        assert!(area.has_children_for("later"));
        assert_eq!(area.assigned_elements(Some("later")).map(|e| e.len()), Some(1));
    }

    #[test]
    fn declare_is_idempotent() {
        let mut area = ContentArea::default();
        assert!(area.declare(Some("x")).is_some());
        assert!(area.declare(Some("x")).is_none());
    }

    #[test]
    fn assigned_elements_filters_text_nodes() {
        let mut area = ContentArea::default();
        area.declare(None);
        area.append(Node::Element(Element::new("span").with_text("Test Element")));
        area.append(Node::Text("Test Node".into()));

        let elements = area.assigned_elements(None).expect("default slot declared");
        assert_eq!(elements.len(), 1);
        assert_eq!(elements[0].text(), "Test Element");

        let nodes = area.assigned_nodes(None).expect("default slot declared");
        assert_eq!(nodes.len(), 2);
        assert_eq!(nodes[1].text(), "Test Node");
    }
}
