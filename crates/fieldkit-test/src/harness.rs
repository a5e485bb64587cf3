//! Test harness for Fieldkit components.
//!
//! Mounts a widget into a container `<div>` on a [`Host`], runs the
//! measure/layout/update/render cycle after every event batch and answers
//! selector queries against the rendered tree.

use fieldkit_core::{Constraints, Element, Event, Host, Key, Rect, Widget};
use std::any::Any;
use std::collections::VecDeque;

use crate::selector::Selector;

/// Test harness for interacting with a mounted widget.
pub struct Harness<W: Widget> {
    /// Root widget being tested
    root: W,
    /// Host the widget is mounted on
    host: Host,
    /// Event queue for simulation
    event_queue: VecDeque<Event>,
    /// Messages returned by the widget, oldest first
    messages: Vec<Box<dyn Any + Send>>,
    /// Current viewport size
    viewport: Rect,
    /// Rendered tree, wrapped in the container
    container: Element,
}

impl<W: Widget> Harness<W> {
    /// Mount `root` on the default host (ambient capabilities, monospace text).
    pub fn new(root: W) -> Self {
        Self::with_host(root, Host::default())
    }

    /// Mount `root` on `host`.
    pub fn with_host(root: W, host: Host) -> Self {
        let mut harness = Self {
            root,
            host,
            event_queue: VecDeque::new(),
            messages: Vec::new(),
            viewport: Rect::new(0.0, 0.0, 1280.0, 720.0),
            container: Element::new("div"),
        };
        harness.sync();
        harness
    }

    /// Set the viewport size and re-render.
    #[must_use]
    pub fn viewport(mut self, width: f32, height: f32) -> Self {
        self.viewport = Rect::new(0.0, 0.0, width, height);
        self.sync();
        self
    }

    // === Access ===

    /// The mounted widget.
    pub const fn widget(&self) -> &W {
        &self.root
    }

    /// Mutate the widget, then re-render (e.g. a controlled owner passing a
    /// new value down).
    pub fn update_widget(&mut self, f: impl FnOnce(&mut W)) -> &mut Self {
        f(&mut self.root);
        self.sync();
        self
    }

    /// Replace the host and re-render.
    pub fn set_host(&mut self, host: Host) -> &mut Self {
        self.host = host;
        self.sync();
        self
    }

    /// The container element holding the rendered tree.
    pub const fn container(&self) -> &Element {
        &self.container
    }

    /// Serialized markup of the container.
    pub fn html(&self) -> String {
        self.container.to_html()
    }

    // === Event Simulation ===

    /// Focus the widget and type `text` one character at a time.
    pub fn type_text(&mut self, text: &str) -> &mut Self {
        self.event_queue.push_back(Event::FocusIn);
        for c in text.chars() {
            self.event_queue.push_back(Event::TextInput {
                text: c.to_string(),
            });
        }
        self.process_events();
        self
    }

    /// Simulate a key press.
    pub fn press_key(&mut self, key: Key) -> &mut Self {
        self.event_queue.push_back(Event::KeyDown { key });
        self.event_queue.push_back(Event::KeyUp { key });
        self.process_events();
        self
    }

    /// Dispatch an arbitrary event.
    pub fn dispatch(&mut self, event: Event) -> &mut Self {
        self.event_queue.push_back(event);
        self.process_events();
        self
    }

    /// Resize the viewport and notify the widget.
    pub fn resize(&mut self, width: f32, height: f32) -> &mut Self {
        self.viewport = Rect::new(0.0, 0.0, width, height);
        self.event_queue.push_back(Event::Resize { width, height });
        self.process_events();
        self
    }

    /// Messages of type `T` emitted so far.
    pub fn messages<T: 'static>(&self) -> Vec<&T> {
        self.messages
            .iter()
            .filter_map(|m| m.downcast_ref::<T>())
            .collect()
    }

    /// Drain every recorded message.
    pub fn take_messages(&mut self) -> Vec<Box<dyn Any + Send>> {
        std::mem::take(&mut self.messages)
    }

    // === Queries ===

    /// First element matching the selector, in document order.
    pub fn query(&self, selector: &str) -> Option<&Element> {
        let sel = Selector::parse(selector).ok()?;
        self.container.descendants().find(|el| sel.matches(el))
    }

    /// All elements matching the selector, in document order.
    pub fn query_all(&self, selector: &str) -> Vec<&Element> {
        let Ok(sel) = Selector::parse(selector) else {
            return Vec::new();
        };
        self.container
            .descendants()
            .filter(|el| sel.matches(el))
            .collect()
    }

    /// Check if an element exists.
    pub fn exists(&self, selector: &str) -> bool {
        self.query(selector).is_some()
    }

    /// Inline style value of the first match, `""` when unset or unmatched.
    pub fn style(&self, selector: &str, property: &str) -> String {
        self.query(selector)
            .map(|el| el.style().get(property).to_string())
            .unwrap_or_default()
    }

    // === Assertions ===

    /// Assert that an element exists.
    ///
    /// # Panics
    ///
    /// Panics if the element does not exist.
    pub fn assert_exists(&self, selector: &str) -> &Self {
        assert!(
            self.exists(selector),
            "Expected element matching '{selector}' to exist in {}",
            self.html()
        );
        self
    }

    /// Assert that an element does not exist.
    ///
    /// # Panics
    ///
    /// Panics if the element exists.
    pub fn assert_not_exists(&self, selector: &str) -> &Self {
        assert!(
            !self.exists(selector),
            "Expected element matching '{selector}' to not exist in {}",
            self.html()
        );
        self
    }

    /// Assert the count of matching elements.
    ///
    /// # Panics
    ///
    /// Panics if the count does not match.
    pub fn assert_count(&self, selector: &str, expected: usize) -> &Self {
        let actual = self.query_all(selector).len();
        assert_eq!(
            actual, expected,
            "Expected {expected} elements matching '{selector}' but found {actual}"
        );
        self
    }

    /// Assert an attribute value on the first match.
    ///
    /// # Panics
    ///
    /// Panics if nothing matches or the value differs.
    pub fn assert_attr(&self, selector: &str, name: &str, expected: &str) -> &Self {
        let actual = self.query(selector).and_then(|el| el.attr(name));
        assert_eq!(
            actual,
            Some(expected),
            "Expected {name}=\"{expected}\" on '{selector}'"
        );
        self
    }

    /// Assert an inline style value on the first match (`""` for unset).
    ///
    /// # Panics
    ///
    /// Panics if nothing matches or the value differs.
    pub fn assert_style(&self, selector: &str, property: &str, expected: &str) -> &Self {
        self.assert_exists(selector);
        let actual = self.style(selector, property);
        assert_eq!(
            actual, expected,
            "Expected style {property}: '{expected}' on '{selector}' but got '{actual}'"
        );
        self
    }

    // === Internal ===

    fn process_events(&mut self) {
        while let Some(event) = self.event_queue.pop_front() {
            tracing::trace!(?event, "harness dispatch");
            if let Some(message) = self.root.event(&event) {
                self.messages.push(message);
            }
        }
        self.sync();
    }

    /// Run one full cycle: measure, lay out across the viewport width,
    /// update against the host, render into a fresh container.
    fn sync(&mut self) {
        let size = self.root.measure(Constraints::loose(self.viewport.size()));
        self.root
            .layout(Rect::new(0.0, 0.0, self.viewport.width, size.height));
        self.root.update(&self.host);

        let mut container = Element::new("div");
        container.append(self.root.render());
        self.container = container;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fieldkit_core::{LayoutResult, Size, TypeId};

    // Mock widget: a focusable input that echoes typed text and counts updates.
    #[derive(Default)]
    struct MockWidget {
        test_id: Option<String>,
        text: String,
        focused: bool,
        updates: usize,
        width: f32,
    }

    impl MockWidget {
        fn with_test_id(mut self, id: &str) -> Self {
            self.test_id = Some(id.to_string());
            self
        }
    }

    impl Widget for MockWidget {
        fn type_id(&self) -> TypeId {
            TypeId::of::<Self>()
        }
        fn measure(&self, c: Constraints) -> Size {
            c.constrain(Size::new(100.0, 50.0))
        }
        fn layout(&mut self, b: Rect) -> LayoutResult {
            self.width = b.width;
            LayoutResult { size: b.size() }
        }
        fn update(&mut self, _host: &Host) {
            self.updates += 1;
        }
        fn render(&self) -> Element {
            let input = Element::new("input")
                .with_optional_attr("data-testid", self.test_id.as_deref())
                .with_attr("value", self.text.clone())
                .with_attr("data-width", self.width.to_string());
            Element::fragment(vec![
                input,
                Element::new("span").with_attr("aria-hidden", "true"),
            ])
        }
        fn event(&mut self, event: &Event) -> Option<Box<dyn Any + Send>> {
            match event {
                Event::FocusIn => self.focused = true,
                Event::TextInput { text } if self.focused => {
                    self.text.push_str(text);
                    return Some(Box::new(self.text.clone()));
                }
                _ => {}
            }
            None
        }
        fn children(&self) -> &[Box<dyn Widget>] {
            &[]
        }
        fn children_mut(&mut self) -> &mut [Box<dyn Widget>] {
            &mut []
        }
        fn test_id(&self) -> Option<&str> {
            self.test_id.as_deref()
        }
    }

    #[test]
    fn test_harness_mounts_into_container() {
        let harness = Harness::new(MockWidget::default().with_test_id("root"));
        assert_eq!(harness.container().tag(), "div");
        assert_eq!(harness.container().children().len(), 2);
        assert!(harness.exists("[data-testid='root']"));
        assert!(!harness.exists("[data-testid='nonexistent']"));
        assert_eq!(harness.widget().updates, 1);
    }

    #[test]
    fn test_harness_lays_out_across_viewport() {
        let harness = Harness::new(MockWidget::default()).viewport(640.0, 480.0);
        harness.assert_attr("input", "data-width", "640");
    }

    #[test]
    #[should_panic(expected = "Expected element matching")]
    fn test_harness_assert_exists_fails() {
        let harness = Harness::new(MockWidget::default());
        harness.assert_exists("[data-testid='missing']");
    }

    #[test]
    fn test_harness_query_all() {
        let harness = Harness::new(MockWidget::default());
        harness.assert_count("input", 1);
        harness.assert_count("[aria-hidden='true']", 1);
        harness.assert_count("div", 1);
        assert!(harness.query_all("[=bad]").is_empty());
    }

    #[test]
    fn test_harness_type_text_records_messages() {
        let mut harness = Harness::new(MockWidget::default());
        harness.type_text("hi");
        harness.assert_attr("input", "value", "hi");
        let messages = harness.messages::<String>();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[1].as_str(), "hi");
        assert_eq!(harness.take_messages().len(), 2);
        assert!(harness.messages::<String>().is_empty());
    }

    #[test]
    fn test_harness_resyncs_after_events() {
        let mut harness = Harness::new(MockWidget::default());
        harness.press_key(Key::Tab).resize(300.0, 200.0);
        assert_eq!(harness.widget().updates, 3);
        harness.assert_attr("input", "data-width", "300");
    }

    #[test]
    fn test_harness_update_widget() {
        let mut harness = Harness::new(MockWidget::default());
        harness.update_widget(|w| w.text = "set".to_string());
        harness.assert_attr("input", "value", "set");
    }

    #[test]
    fn test_harness_style_defaults_to_empty() {
        let harness = Harness::new(MockWidget::default());
        assert_eq!(harness.style("input", "height"), "");
        assert_eq!(harness.style("#missing", "height"), "");
        harness.assert_style("input", "height", "");
    }

    #[test]
    fn test_harness_html() {
        let harness = Harness::new(MockWidget::default());
        assert!(harness.html().starts_with("<div>"));
    }
}
