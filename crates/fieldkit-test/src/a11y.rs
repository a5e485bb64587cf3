//! Accessibility view of a rendered tree.
//!
//! Approximates what assistive technology sees: subtrees marked
//! `aria-hidden="true"`, `visibility: hidden` or `display: none` are pruned,
//! and each remaining element with a role becomes an [`A11yNode`].

use fieldkit_core::Element;

/// An element exposed to assistive technology.
#[derive(Debug, Clone, Copy)]
pub struct A11yNode<'a> {
    /// The underlying element
    pub element: &'a Element,
    /// Explicit `role` attribute, else the implicit role of the tag
    pub role: &'a str,
    /// Accessible name, if any
    pub name: Option<&'a str>,
}

/// Accessibility tree over a rendered element.
#[derive(Debug, Clone, Copy)]
pub struct A11yTree<'a> {
    root: &'a Element,
}

impl<'a> A11yTree<'a> {
    /// Build the tree rooted at `root`.
    #[must_use]
    pub const fn new(root: &'a Element) -> Self {
        Self { root }
    }

    /// Every element exposed to assistive technology, in document order.
    #[must_use]
    pub fn accessible_elements(&self) -> Vec<A11yNode<'a>> {
        let mut nodes = Vec::new();
        collect_accessible(self.root, &mut nodes);
        nodes
    }

    /// Exposed elements with the given role.
    #[must_use]
    pub fn by_role(&self, role: &str) -> Vec<A11yNode<'a>> {
        self.accessible_elements()
            .into_iter()
            .filter(|node| node.role == role)
            .collect()
    }

    /// Elements reached by sequential keyboard navigation, in visiting order:
    /// positive `tabindex` values ascending, then everything else in
    /// document order.
    #[must_use]
    pub fn tab_order(&self) -> Vec<&'a Element> {
        let mut tabbable: Vec<(usize, &'a Element)> = Vec::new();
        collect_tabbable(self.root, &mut tabbable);

        let mut positive: Vec<(usize, &'a Element)> = tabbable
            .iter()
            .copied()
            .filter(|(_, el)| el.tab_index().is_some_and(|i| i > 0))
            .collect();
        positive.sort_by_key(|&(order, el)| (el.tab_index().unwrap_or(0), order));

        positive
            .into_iter()
            .chain(
                tabbable
                    .into_iter()
                    .filter(|(_, el)| !el.tab_index().is_some_and(|i| i > 0)),
            )
            .map(|(_, el)| el)
            .collect()
    }
}

fn is_pruned(element: &Element) -> bool {
    element.is_aria_hidden()
        || element.style().get("visibility") == "hidden"
        || element.style().get("display") == "none"
}

fn collect_accessible<'a>(element: &'a Element, nodes: &mut Vec<A11yNode<'a>>) {
    if is_pruned(element) {
        return;
    }
    if let Some(role) = role_of(element) {
        nodes.push(A11yNode {
            element,
            role,
            name: name_of(element),
        });
    }
    for child in element.children() {
        collect_accessible(child, nodes);
    }
}

fn collect_tabbable<'a>(element: &'a Element, out: &mut Vec<(usize, &'a Element)>) {
    if is_pruned(element) {
        return;
    }
    if element.is_tabbable() {
        out.push((out.len(), element));
    }
    for child in element.children() {
        collect_tabbable(child, out);
    }
}

/// Explicit role, else the implicit role of the tag.
/// `presentation` and `none` remove the element itself from the tree.
fn role_of(element: &Element) -> Option<&str> {
    if let Some(role) = element.attr("role") {
        return match role {
            "presentation" | "none" => None,
            _ => Some(role),
        };
    }
    match element.tag() {
        "textarea" => Some("textbox"),
        "input" => match element.attr("type") {
            Some("checkbox") => Some("checkbox"),
            Some("radio") => Some("radio"),
            Some("button" | "submit" | "reset") => Some("button"),
            _ => Some("textbox"),
        },
        "button" => Some("button"),
        "a" if element.has_attr("href") => Some("link"),
        "select" => Some("combobox"),
        _ => None,
    }
}

fn name_of(element: &Element) -> Option<&str> {
    if let Some(label) = element.attr("aria-label") {
        return Some(label);
    }
    match element.tag() {
        "button" | "a" => Some(element.text()).filter(|t| !t.is_empty()),
        _ => element.attr("placeholder"),
    }
}
