//! Rendered element tree.
//!
//! Widgets render into a small DOM-like tree of [`Element`]s. The tree is what
//! hosts mount and what tests query: tag names, ordered attributes, inline
//! [`Style`], optional text content and children.
//!
//! A *fragment* groups siblings without adding a node of its own; appending a
//! fragment to a parent splices its children in place.

use crate::style::Style;
use serde::{Deserialize, Serialize};

/// A node in the rendered tree.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Element {
    tag: String,
    attributes: Vec<(String, String)>,
    style: Style,
    text: Option<String>,
    children: Vec<Element>,
}

impl Element {
    /// Create an element with the given tag name.
    #[must_use]
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Self::default()
        }
    }

    /// Create a fragment holding the given children.
    #[must_use]
    pub fn fragment(children: Vec<Self>) -> Self {
        let mut fragment = Self::default();
        for child in children {
            fragment.append(child);
        }
        fragment
    }

    /// Check if this node is a fragment.
    #[must_use]
    pub fn is_fragment(&self) -> bool {
        self.tag.is_empty()
    }

    /// Tag name (empty for fragments).
    #[must_use]
    pub fn tag(&self) -> &str {
        &self.tag
    }

    // === Attributes ===

    /// Builder form of [`Element::set_attr`].
    #[must_use]
    pub fn with_attr(mut self, name: &str, value: impl Into<String>) -> Self {
        self.set_attr(name, value);
        self
    }

    /// Set an attribute only when a value is present.
    #[must_use]
    pub fn with_optional_attr(self, name: &str, value: Option<&str>) -> Self {
        match value {
            Some(v) => self.with_attr(name, v),
            None => self,
        }
    }

    /// Set a boolean attribute (present with an empty value) when `on`.
    #[must_use]
    pub fn with_flag(self, name: &str, on: bool) -> Self {
        if on {
            self.with_attr(name, "")
        } else {
            self
        }
    }

    /// Set an attribute, replacing an existing value in place.
    pub fn set_attr(&mut self, name: &str, value: impl Into<String>) {
        let value = value.into();
        match self.attributes.iter_mut().find(|(n, _)| n == name) {
            Some((_, existing)) => *existing = value,
            None => self.attributes.push((name.to_string(), value)),
        }
    }

    /// Remove an attribute.
    pub fn remove_attr(&mut self, name: &str) -> Option<String> {
        let index = self.attributes.iter().position(|(n, _)| n == name)?;
        Some(self.attributes.remove(index).1)
    }

    /// Get an attribute value.
    #[must_use]
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Check whether an attribute is present.
    #[must_use]
    pub fn has_attr(&self, name: &str) -> bool {
        self.attributes.iter().any(|(n, _)| n == name)
    }

    /// Iterate over attributes in insertion order.
    pub fn attributes(&self) -> impl Iterator<Item = (&str, &str)> {
        self.attributes.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    /// Whitespace-separated class list.
    pub fn classes(&self) -> impl Iterator<Item = &str> {
        self.attr("class").unwrap_or("").split_whitespace()
    }

    // === Style ===

    /// Builder form that replaces the inline style.
    #[must_use]
    pub fn with_style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    /// Inline style.
    #[must_use]
    pub const fn style(&self) -> &Style {
        &self.style
    }

    /// Mutable inline style.
    pub fn style_mut(&mut self) -> &mut Style {
        &mut self.style
    }

    // === Content ===

    /// Builder form of [`Element::set_text`].
    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.set_text(text);
        self
    }

    /// Set the text content (the value of a form control).
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = Some(text.into());
    }

    /// Text content, `""` when none was set.
    #[must_use]
    pub fn text(&self) -> &str {
        self.text.as_deref().unwrap_or("")
    }

    /// Builder form of [`Element::append`].
    #[must_use]
    pub fn with_child(mut self, child: Self) -> Self {
        self.append(child);
        self
    }

    /// Append a child. Fragments are spliced.
    pub fn append(&mut self, child: Self) {
        if child.is_fragment() {
            self.children.extend(child.children);
        } else {
            self.children.push(child);
        }
    }

    /// Direct children.
    #[must_use]
    pub fn children(&self) -> &[Self] {
        &self.children
    }

    /// Depth-first, pre-order iteration over this node and its descendants.
    pub fn descendants(&self) -> Descendants<'_> {
        Descendants { stack: vec![self] }
    }

    // === Accessibility ===

    /// `aria-hidden="true"` on this node.
    #[must_use]
    pub fn is_aria_hidden(&self) -> bool {
        self.attr("aria-hidden") == Some("true")
    }

    /// Explicit `tabindex`, if it parses.
    #[must_use]
    pub fn tab_index(&self) -> Option<i32> {
        self.attr("tabindex").and_then(|v| v.trim().parse().ok())
    }

    /// Whether this node takes part in sequential keyboard navigation.
    ///
    /// Form controls are tabbable by default; any node with a non-negative
    /// `tabindex` is tabbable; disabled controls and hidden nodes never are.
    #[must_use]
    pub fn is_tabbable(&self) -> bool {
        if self.has_attr("disabled") || self.style.get("visibility") == "hidden" {
            return false;
        }
        match self.tab_index() {
            Some(index) => index >= 0,
            None => matches!(
                self.tag.as_str(),
                "textarea" | "input" | "button" | "select" | "a"
            ),
        }
    }

    // === Serialization ===

    /// Serialize to an HTML string.
    #[must_use]
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        self.write_html(&mut out);
        out
    }

    fn write_html(&self, out: &mut String) {
        if self.is_fragment() {
            for child in &self.children {
                child.write_html(out);
            }
            return;
        }

        out.push('<');
        out.push_str(&self.tag);
        for (name, value) in &self.attributes {
            out.push(' ');
            out.push_str(name);
            if !value.is_empty() {
                out.push_str("=\"");
                out.push_str(&escape(value));
                out.push('"');
            }
        }
        if !self.style.is_empty() {
            out.push_str(" style=\"");
            out.push_str(&escape(&self.style.to_string()));
            out.push('"');
        }
        out.push('>');
        if let Some(text) = &self.text {
            out.push_str(&escape(text));
        }
        for child in &self.children {
            child.write_html(out);
        }
        out.push_str("</");
        out.push_str(&self.tag);
        out.push('>');
    }
}

fn escape(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('"', "&quot;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Iterator returned by [`Element::descendants`].
#[derive(Debug)]
pub struct Descendants<'a> {
    stack: Vec<&'a Element>,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = &'a Element;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.stack.extend(node.children.iter().rev());
        Some(node)
    }
}
