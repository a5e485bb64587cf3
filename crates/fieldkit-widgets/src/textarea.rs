//! `Textarea` widget: multi-line text entry that grows with its content.
//!
//! When the host can size form controls from their content, the widget
//! renders a single `<textarea>` and lets the host do the work. Otherwise it
//! renders a hidden mirror next to it and writes an explicit height after
//! every update (see [`crate::autosize`]).

use crate::autosize::{self, AutoSize, BoxMetrics, BoxSizing, RowBounds};
use crate::config::TextareaConfig;
use fieldkit_core::style::format_px;
use fieldkit_core::{
    AccessibleRole, CommonProps, Constraints, Element, Event, Feature, Host, Key, LayoutResult,
    Rect, Size, SizingStrategy, Style, Support, TextStyle, TypeId, Widget,
};
use serde::{Deserialize, Serialize};
use std::any::Any;

/// Message emitted when the text changes.
///
/// For a controlled textarea this carries the proposed value; the owner
/// decides whether to pass it back through [`Textarea::set_value`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextChanged {
    /// The new text value
    pub value: String,
}

/// `Textarea` widget.
#[derive(Serialize, Deserialize)]
pub struct Textarea {
    /// Current text value
    value: String,
    /// Whether the owner holds the value
    controlled: bool,
    /// Placeholder text
    placeholder: String,
    /// Visible line range
    rows: RowBounds,
    /// Whether the textarea is disabled
    disabled: bool,
    /// Whether the textarea is read-only
    read_only: bool,
    /// Text style
    text_style: TextStyle,
    /// Padding on every side
    padding: f32,
    /// Border width on every side
    border: f32,
    /// Box model for the height style
    box_sizing: BoxSizing,
    /// Minimum width
    min_width: f32,
    /// Forwarded id/class/test id/style
    props: CommonProps,
    /// Accessible name
    accessible_name_value: Option<String>,
    /// Cached bounds
    #[serde(skip)]
    bounds: Rect,
    /// Whether focused
    #[serde(skip)]
    focused: bool,
    /// Cursor position (character index)
    #[serde(skip)]
    cursor: usize,
    /// Strategy from the last update
    #[serde(skip)]
    strategy: Option<SizingStrategy>,
    /// Height written by the fallback engine
    #[serde(skip)]
    applied: Option<AutoSize>,
    /// Whether the missing-primitive warning was logged
    #[serde(skip)]
    warned_unavailable: bool,
}

impl Default for Textarea {
    fn default() -> Self {
        Self::new()
    }
}

impl Textarea {
    /// Create a new, empty textarea.
    #[must_use]
    pub fn new() -> Self {
        Self {
            value: String::new(),
            controlled: false,
            placeholder: String::new(),
            rows: RowBounds::default(),
            disabled: false,
            read_only: false,
            text_style: TextStyle::default(),
            padding: 8.0,
            border: 1.0,
            box_sizing: BoxSizing::BorderBox,
            min_width: 100.0,
            props: CommonProps::default(),
            accessible_name_value: None,
            bounds: Rect::default(),
            focused: false,
            cursor: 0,
            strategy: None,
            applied: None,
            warned_unavailable: false,
        }
    }

    /// Create a textarea from a loaded configuration.
    #[must_use]
    pub fn from_config(config: &TextareaConfig) -> Self {
        let mut textarea = Self::new()
            .rows(RowBounds::new(config.min_rows, config.max_rows))
            .text_style(TextStyle {
                size: config.font_size,
                line_height: config.line_height,
            })
            .padding(config.padding)
            .border(config.border)
            .box_sizing(config.box_sizing);
        if let Some(placeholder) = &config.placeholder {
            textarea = textarea.placeholder(placeholder.clone());
        }
        textarea
    }

    // === Builder ===

    /// Set the minimum number of visible rows (at least 1).
    #[must_use]
    pub fn min_rows(mut self, min_rows: u32) -> Self {
        self.rows = RowBounds::new(min_rows, self.rows.max_rows());
        self
    }

    /// Cap the number of visible rows; taller content scrolls.
    #[must_use]
    pub fn max_rows(mut self, max_rows: u32) -> Self {
        self.rows = RowBounds::new(self.rows.min_rows(), Some(max_rows));
        self
    }

    /// Set both row bounds.
    #[must_use]
    pub const fn rows(mut self, rows: RowBounds) -> Self {
        self.rows = rows;
        self
    }

    /// Make the textarea controlled with the given value.
    ///
    /// Edits then only emit [`TextChanged`]; the owner feeds values back.
    #[must_use]
    pub fn value(mut self, value: impl Into<String>) -> Self {
        self.value = value.into();
        self.controlled = true;
        self.cursor = self.char_count();
        self
    }

    /// Set the initial value of an uncontrolled textarea.
    #[must_use]
    pub fn default_value(mut self, value: impl Into<String>) -> Self {
        self.value = value.into();
        self.controlled = false;
        self.cursor = self.char_count();
        self
    }

    /// Set placeholder text.
    #[must_use]
    pub fn placeholder(mut self, text: impl Into<String>) -> Self {
        self.placeholder = text.into();
        self
    }

    /// Set disabled state.
    #[must_use]
    pub const fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    /// Set read-only state.
    #[must_use]
    pub const fn read_only(mut self, read_only: bool) -> Self {
        self.read_only = read_only;
        self
    }

    /// Set the text style.
    #[must_use]
    pub const fn text_style(mut self, style: TextStyle) -> Self {
        self.text_style = style;
        self
    }

    /// Set padding.
    #[must_use]
    pub fn padding(mut self, padding: f32) -> Self {
        self.padding = padding.max(0.0);
        self
    }

    /// Set border width.
    #[must_use]
    pub fn border(mut self, border: f32) -> Self {
        self.border = border.max(0.0);
        self
    }

    /// Set the box model.
    #[must_use]
    pub const fn box_sizing(mut self, box_sizing: BoxSizing) -> Self {
        self.box_sizing = box_sizing;
        self
    }

    /// Set minimum width.
    #[must_use]
    pub fn min_width(mut self, width: f32) -> Self {
        self.min_width = width.max(0.0);
        self
    }

    /// Set the `id` attribute.
    #[must_use]
    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.props.id = Some(id.into());
        self
    }

    /// Set the `class` attribute.
    #[must_use]
    pub fn class_name(mut self, class: impl Into<String>) -> Self {
        self.props.class_name = Some(class.into());
        self
    }

    /// Set extra inline style.
    #[must_use]
    pub fn style(mut self, style: Style) -> Self {
        self.props.style = style;
        self
    }

    /// Set all forwarded props at once.
    #[must_use]
    pub fn props(mut self, props: CommonProps) -> Self {
        self.props = props;
        self
    }

    /// Set the test ID.
    #[must_use]
    pub fn with_test_id(mut self, id: impl Into<String>) -> Self {
        self.props.test_id = Some(id.into());
        self
    }

    /// Set the accessible name.
    #[must_use]
    pub fn with_accessible_name(mut self, name: impl Into<String>) -> Self {
        self.accessible_name_value = Some(name.into());
        self
    }

    // === Accessors ===

    /// Get the current value.
    #[must_use]
    pub fn get_value(&self) -> &str {
        &self.value
    }

    /// Get the placeholder.
    #[must_use]
    pub fn get_placeholder(&self) -> &str {
        &self.placeholder
    }

    /// Get the row bounds.
    #[must_use]
    pub const fn get_rows(&self) -> RowBounds {
        self.rows
    }

    /// Check if the owner holds the value.
    #[must_use]
    pub const fn is_controlled(&self) -> bool {
        self.controlled
    }

    /// Check if the textarea is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }

    /// Check if focused.
    #[must_use]
    pub const fn is_focused(&self) -> bool {
        self.focused
    }

    /// Get cursor position as a character index.
    #[must_use]
    pub const fn cursor_position(&self) -> usize {
        self.cursor
    }

    /// Strategy resolved by the last update, if any.
    #[must_use]
    pub const fn strategy(&self) -> Option<SizingStrategy> {
        self.strategy
    }

    /// Height written by the fallback engine, if any.
    #[must_use]
    pub fn applied_height(&self) -> Option<f32> {
        self.applied.map(|size| size.height)
    }

    /// Replace the value, e.g. when a controlled owner accepts a change.
    pub fn set_value(&mut self, value: impl Into<String>) {
        self.value = value.into();
        self.cursor = self.cursor.min(self.char_count());
    }

    // === Editing ===

    fn char_count(&self) -> usize {
        self.value.chars().count()
    }

    fn byte_offset(&self, char_index: usize) -> usize {
        self.value
            .char_indices()
            .nth(char_index)
            .map_or(self.value.len(), |(offset, _)| offset)
    }

    /// Apply an edit producing a candidate value and cursor.
    ///
    /// Uncontrolled textareas commit it; controlled ones only report it.
    fn commit(&mut self, candidate: String, cursor: usize) -> Option<TextChanged> {
        if candidate == self.value {
            return None;
        }
        if !self.controlled {
            self.value.clone_from(&candidate);
            self.cursor = cursor;
        }
        Some(TextChanged { value: candidate })
    }

    fn is_editable(&self) -> bool {
        !self.disabled && !self.read_only
    }

    fn insert_text(&mut self, text: &str) -> Option<TextChanged> {
        if !self.is_editable() || text.is_empty() {
            return None;
        }
        let at = self.byte_offset(self.cursor);
        let mut candidate = self.value.clone();
        candidate.insert_str(at, text);
        let cursor = self.cursor + text.chars().count();
        self.commit(candidate, cursor)
    }

    fn backspace(&mut self) -> Option<TextChanged> {
        if !self.is_editable() || self.cursor == 0 {
            return None;
        }
        let start = self.byte_offset(self.cursor - 1);
        let end = self.byte_offset(self.cursor);
        let mut candidate = self.value.clone();
        candidate.replace_range(start..end, "");
        self.commit(candidate, self.cursor - 1)
    }

    fn delete(&mut self) -> Option<TextChanged> {
        if !self.is_editable() || self.cursor >= self.char_count() {
            return None;
        }
        let start = self.byte_offset(self.cursor);
        let end = self.byte_offset(self.cursor + 1);
        let mut candidate = self.value.clone();
        candidate.replace_range(start..end, "");
        self.commit(candidate, self.cursor)
    }

    /// Character index where the line containing `index` starts.
    fn line_start(&self, index: usize) -> usize {
        self.value
            .chars()
            .take(index)
            .enumerate()
            .filter(|&(_, c)| c == '\n')
            .last()
            .map_or(0, |(i, _)| i + 1)
    }

    /// Character index of the end of the line containing `index`.
    fn line_end(&self, index: usize) -> usize {
        self.value
            .chars()
            .enumerate()
            .skip(index)
            .find(|&(_, c)| c == '\n')
            .map_or_else(|| self.char_count(), |(i, _)| i)
    }

    fn move_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    fn move_right(&mut self) {
        self.cursor = (self.cursor + 1).min(self.char_count());
    }

    fn move_home(&mut self) {
        self.cursor = self.line_start(self.cursor);
    }

    fn move_end(&mut self) {
        self.cursor = self.line_end(self.cursor);
    }

    fn move_up(&mut self) {
        let start = self.line_start(self.cursor);
        if start == 0 {
            self.cursor = 0;
            return;
        }
        let column = self.cursor - start;
        let prev_start = self.line_start(start - 1);
        self.cursor = (prev_start + column).min(start - 1);
    }

    fn move_down(&mut self) {
        let start = self.line_start(self.cursor);
        let end = self.line_end(self.cursor);
        if end >= self.char_count() {
            self.cursor = end;
            return;
        }
        let column = self.cursor - start;
        let next_start = end + 1;
        self.cursor = (next_start + column).min(self.line_end(next_start));
    }

    // === Rendering ===

    fn box_metrics(&self) -> BoxMetrics {
        BoxMetrics {
            padding_block: self.padding * 2.0,
            border_block: self.border * 2.0,
            box_sizing: self.box_sizing,
        }
    }

    /// Box and font declarations shared by the visible control and mirror.
    fn box_style(&self) -> Style {
        let padding = format_px(self.padding);
        Style::new()
            .with("box-sizing", self.box_sizing.as_str())
            .with("padding-top", padding.clone())
            .with("padding-right", padding.clone())
            .with("padding-bottom", padding.clone())
            .with("padding-left", padding)
            .with("border-width", format_px(self.border))
            .with("font-size", format_px(self.text_style.size))
            .with("line-height", self.text_style.line_height.to_string())
    }

    fn mirror(&self) -> Element {
        autosize::mirror_element(
            &self.box_style(),
            &self.props.style,
            self.props.class_name.as_deref(),
        )
    }

    fn visible(&self, strategy: SizingStrategy) -> Element {
        let placeholder = (!self.placeholder.is_empty()).then_some(self.placeholder.as_str());
        let element = Element::new("textarea")
            .with_attr("rows", self.rows.min_rows().to_string())
            .with_optional_attr("placeholder", placeholder)
            .with_optional_attr("aria-label", self.accessible_name_value.as_deref())
            .with_flag("disabled", self.disabled)
            .with_flag("readonly", self.read_only)
            .with_style(self.box_style())
            .with_text(self.value.clone());
        let mut element = self.props.apply_to(element);

        let style = element.style_mut();
        match strategy {
            SizingStrategy::Native => {
                style.set("field-sizing", "content");
                let metrics = self.box_metrics();
                style.set(
                    "min-height",
                    autosize::row_length(self.rows.min_rows(), metrics),
                );
                if let Some(max_rows) = self.rows.max_rows() {
                    style.set("max-height", autosize::row_length(max_rows, metrics));
                }
            }
            SizingStrategy::Fallback => {
                if let Some(size) = self.applied {
                    autosize::apply(style, size);
                }
            }
        }
        element
    }

    fn sync_height(&mut self, host: &Host) {
        let width = self.bounds.width - self.border * 2.0;
        let next = autosize::measure(
            host,
            &self.mirror(),
            width,
            &self.text_style,
            &self.value,
            &self.placeholder,
            self.rows,
            self.box_metrics(),
        );
        let Some(next) = next else {
            return;
        };
        if self.applied != Some(next) {
            tracing::trace!(
                height = next.height,
                overflow_hidden = next.overflow_hidden,
                "textarea height applied"
            );
            self.applied = Some(next);
        }
    }

    fn natural_height(&self) -> f32 {
        let line = self.text_style.size * self.text_style.line_height;
        self.rows.min_rows() as f32 * line + self.box_metrics().extra_height()
    }
}

impl Widget for Textarea {
    fn type_id(&self) -> TypeId {
        TypeId::of::<Self>()
    }

    fn measure(&self, constraints: Constraints) -> Size {
        let height = match (self.strategy, self.applied) {
            (Some(SizingStrategy::Native), _) | (_, None) => self.natural_height(),
            (_, Some(size)) => size.height,
        };
        constraints.constrain(Size::new(self.min_width.max(constraints.min_width), height))
    }

    fn layout(&mut self, bounds: Rect) -> LayoutResult {
        self.bounds = bounds;
        LayoutResult {
            size: bounds.size(),
        }
    }

    fn update(&mut self, host: &Host) {
        let support = host.capabilities().query(Feature::FIELD_SIZING_CONTENT);
        if support == Support::Unavailable {
            if self.warned_unavailable {
                tracing::debug!("capability primitive unavailable, using fallback sizing");
            } else {
                tracing::warn!(
                    feature = %Feature::FIELD_SIZING_CONTENT,
                    "capability primitive unavailable, using fallback sizing"
                );
                self.warned_unavailable = true;
            }
        }

        let strategy = SizingStrategy::from_support(support);
        if self.strategy != Some(strategy) {
            tracing::debug!(strategy = strategy.as_str(), "textarea sizing strategy resolved");
            self.strategy = Some(strategy);
        }

        match strategy {
            SizingStrategy::Native => self.applied = None,
            SizingStrategy::Fallback => self.sync_height(host),
        }
    }

    fn render(&self) -> Element {
        let strategy = self.strategy.unwrap_or(SizingStrategy::Fallback);
        let visible = self.visible(strategy);
        match strategy {
            SizingStrategy::Native => visible,
            SizingStrategy::Fallback => {
                let mirror = self
                    .mirror()
                    .with_text(autosize::mirror_text(&self.value, &self.placeholder));
                Element::fragment(vec![visible, mirror])
            }
        }
    }

    fn event(&mut self, event: &Event) -> Option<Box<dyn Any + Send>> {
        if self.disabled {
            return None;
        }

        let changed = match event {
            Event::MouseDown { position, .. } => {
                let was_focused = self.focused;
                self.focused = self.bounds.contains_point(position);
                if self.focused && !was_focused {
                    self.cursor = self.char_count();
                }
                None
            }
            Event::FocusIn => {
                self.focused = true;
                None
            }
            Event::FocusOut => {
                self.focused = false;
                None
            }
            Event::TextInput { text } if self.focused => self.insert_text(text),
            Event::KeyDown { key } if self.focused => match key {
                Key::Enter => self.insert_text("\n"),
                Key::Backspace => self.backspace(),
                Key::Delete => self.delete(),
                Key::Left => {
                    self.move_left();
                    None
                }
                Key::Right => {
                    self.move_right();
                    None
                }
                Key::Up => {
                    self.move_up();
                    None
                }
                Key::Down => {
                    self.move_down();
                    None
                }
                Key::Home => {
                    self.move_home();
                    None
                }
                Key::End => {
                    self.move_end();
                    None
                }
                _ => None,
            },
            _ => None,
        };

        changed.map(|message| Box::new(message) as Box<dyn Any + Send>)
    }

    fn children(&self) -> &[Box<dyn Widget>] {
        &[]
    }

    fn children_mut(&mut self) -> &mut [Box<dyn Widget>] {
        &mut []
    }

    fn is_interactive(&self) -> bool {
        !self.disabled
    }

    fn is_focusable(&self) -> bool {
        !self.disabled
    }

    fn accessible_name(&self) -> Option<&str> {
        self.accessible_name_value
            .as_deref()
            .or_else(|| (!self.placeholder.is_empty()).then_some(self.placeholder.as_str()))
    }

    fn accessible_role(&self) -> AccessibleRole {
        AccessibleRole::TextInput
    }

    fn test_id(&self) -> Option<&str> {
        self.props.test_id.as_deref()
    }

    fn bounds(&self) -> Rect {
        self.bounds
    }
}

// ===== Tests - TESTS FIRST =====
