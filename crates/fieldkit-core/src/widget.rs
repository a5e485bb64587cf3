//! Widget trait and related types.
//!
//! This module defines the core `Widget` trait and supporting types for building
//! components in Fieldkit.
//!
//! # Widget Lifecycle
//!
//! Widgets follow a measure-layout-update-render cycle:
//!
//! 1. **Measure**: Compute intrinsic size given constraints
//! 2. **Layout**: Position self within allocated bounds
//! 3. **Update**: Synchronise host-dependent state (capabilities, measurements)
//! 4. **Render**: Produce the [`Element`] tree the host mounts
//!
//! Events may arrive between cycles; a host re-runs update and render after
//! dispatching them.
//!
//! # Examples
//!
//! ```
//! use fieldkit_core::{CommonProps, Element, TypeId, WidgetId};
//!
//! let id = WidgetId::new(42);
//! assert_eq!(id.0, 42);
//!
//! assert_ne!(TypeId::of::<String>(), TypeId::of::<i32>());
//!
//! let props = CommonProps::new().with_id("notes").with_class("field");
//! let el = props.apply_to(Element::new("textarea"));
//! assert_eq!(el.attr("id"), Some("notes"));
//! assert_eq!(el.attr("class"), Some("field"));
//! ```

use crate::constraints::Constraints;
use crate::element::Element;
use crate::event::Event;
use crate::geometry::{Rect, Size};
use crate::host::Host;
use crate::style::Style;
use serde::{Deserialize, Serialize};
use std::any::Any;

/// Unique identifier for a widget instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WidgetId(pub u64);

impl WidgetId {
    /// Create a new widget ID.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }
}

/// Type identifier for widget types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TypeId(std::any::TypeId);

impl TypeId {
    /// Get the type ID for a type.
    #[must_use]
    pub fn of<T: 'static>() -> Self {
        Self(std::any::TypeId::of::<T>())
    }
}

/// Result of laying out a widget.
#[derive(Debug, Clone, Copy, Default)]
pub struct LayoutResult {
    /// Computed size after layout
    pub size: Size,
}

/// Core widget trait that all components implement.
pub trait Widget: Send + Sync {
    /// Get the type identifier for this widget type.
    fn type_id(&self) -> TypeId;

    /// Compute intrinsic size constraints.
    fn measure(&self, constraints: Constraints) -> Size;

    /// Position within allocated bounds.
    fn layout(&mut self, bounds: Rect) -> LayoutResult;

    /// Synchronise host-dependent state before rendering.
    ///
    /// Runs on mount, after every dispatched event batch and after host
    /// resizes. Must be idempotent.
    fn update(&mut self, _host: &Host) {}

    /// Produce the element tree for the current state.
    fn render(&self) -> Element;

    /// Handle input events.
    fn event(&mut self, event: &Event) -> Option<Box<dyn Any + Send>>;

    /// Get child widgets for tree traversal.
    fn children(&self) -> &[Box<dyn Widget>];

    /// Get mutable child widgets.
    fn children_mut(&mut self) -> &mut [Box<dyn Widget>];

    /// Check if this widget is interactive (can receive focus/events).
    fn is_interactive(&self) -> bool {
        false
    }

    /// Check if this widget can receive keyboard focus.
    fn is_focusable(&self) -> bool {
        false
    }

    /// Get the accessible name for screen readers.
    fn accessible_name(&self) -> Option<&str> {
        None
    }

    /// Get the accessible role.
    fn accessible_role(&self) -> AccessibleRole {
        AccessibleRole::Generic
    }

    /// Get the test ID for this widget (if any).
    fn test_id(&self) -> Option<&str> {
        None
    }

    /// Get the current bounds of this widget.
    fn bounds(&self) -> Rect {
        Rect::new(0.0, 0.0, 0.0, 0.0)
    }
}

/// Props every component forwards to its root element.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommonProps {
    /// `id` attribute
    pub id: Option<String>,
    /// `class` attribute
    pub class_name: Option<String>,
    /// `data-testid` attribute
    pub test_id: Option<String>,
    /// Extra inline style, applied after the component's own style
    #[serde(default)]
    pub style: Style,
}

impl CommonProps {
    /// Create empty props.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the `id`.
    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Set the `class`.
    #[must_use]
    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.class_name = Some(class.into());
        self
    }

    /// Set the test ID.
    #[must_use]
    pub fn with_test_id(mut self, id: impl Into<String>) -> Self {
        self.test_id = Some(id.into());
        self
    }

    /// Set the extra inline style.
    #[must_use]
    pub fn with_style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    /// Forward these props onto `element`.
    #[must_use]
    pub fn apply_to(&self, mut element: Element) -> Element {
        if let Some(id) = &self.id {
            element.set_attr("id", id.clone());
        }
        if let Some(class) = &self.class_name {
            element.set_attr("class", class.clone());
        }
        if let Some(test_id) = &self.test_id {
            element.set_attr("data-testid", test_id.clone());
        }
        element.style_mut().extend(&self.style);
        element
    }
}

/// Text style used for measurement.
///
/// # Examples
///
/// ```
/// use fieldkit_core::TextStyle;
///
/// let style = TextStyle::default();
/// assert_eq!(style.size, 16.0);
/// assert_eq!(style.line_height, 1.5);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TextStyle {
    /// Font size in pixels
    pub size: f32,
    /// Line height as a multiple of the font size
    pub line_height: f32,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            size: 16.0,
            line_height: 1.5,
        }
    }
}

/// Accessible role for screen readers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AccessibleRole {
    /// Generic element
    #[default]
    Generic,
    /// Button
    Button,
    /// Single or multi-line text input
    TextInput,
    /// Hidden from assistive technology
    Presentation,
}

impl AccessibleRole {
    /// ARIA role name, `None` for generic content.
    #[must_use]
    pub const fn aria_role(self) -> Option<&'static str> {
        match self {
            Self::Generic => None,
            Self::Button => Some("button"),
            Self::TextInput => Some("textbox"),
            Self::Presentation => Some("presentation"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_widget_id() {
        let id = WidgetId::new(42);
        assert_eq!(id.0, 42);
        assert_eq!(WidgetId::new(1), WidgetId::new(1));
        assert_ne!(WidgetId::new(1), WidgetId::new(2));
    }

    #[test]
    fn test_type_id() {
        assert_eq!(TypeId::of::<u8>(), TypeId::of::<u8>());
        assert_ne!(TypeId::of::<u8>(), TypeId::of::<u16>());
    }

    #[test]
    fn test_text_style_default() {
        let style = TextStyle::default();
        assert_eq!(style.size, 16.0);
        assert_eq!(style.line_height, 1.5);
    }

    #[test]
    fn test_accessible_role_aria() {
        assert_eq!(AccessibleRole::default().aria_role(), None);
        assert_eq!(AccessibleRole::TextInput.aria_role(), Some("textbox"));
        assert_eq!(AccessibleRole::Button.aria_role(), Some("button"));
    }

    // =========================================================================
    // CommonProps Tests
    // =========================================================================

    #[test]
    fn test_common_props_apply_all() {
        let props = CommonProps::new()
            .with_id("bio")
            .with_class("field")
            .with_test_id("bio-input")
            .with_style(Style::new().with("color", "red"));

        let el = props.apply_to(Element::new("textarea").with_style(Style::new().with("height", "40px")));
        assert_eq!(el.attr("id"), Some("bio"));
        assert_eq!(el.attr("class"), Some("field"));
        assert_eq!(el.attr("data-testid"), Some("bio-input"));
        assert_eq!(el.style().get("height"), "40px");
        assert_eq!(el.style().get("color"), "red");
    }

    #[test]
    fn test_common_props_empty_is_noop() {
        let el = CommonProps::new().apply_to(Element::new("textarea"));
        assert_eq!(el, Element::new("textarea"));
    }

    #[test]
    fn test_common_props_serde() {
        let props = CommonProps::new().with_id("a");
        let json = serde_json::to_string(&props).unwrap();
        let back: CommonProps = serde_json::from_str(&json).unwrap();
        assert_eq!(back, props);
    }
}
