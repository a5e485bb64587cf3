//! Content-driven height for multi-line text controls.
//!
//! Used when the host cannot size a text control from its content natively.
//! A hidden mirror element receives the same text and box styles as the
//! visible control; its scroll height, clamped to a row range, becomes the
//! visible control's explicit height.
//!
//! # Algorithm
//!
//! 1. Mirror text is the value, else the placeholder, else `"x"`; a trailing
//!    newline gets a space appended so the empty last line is measured.
//! 2. `inner` = mirror scroll height; `single` = scroll height of `"x"`.
//! 3. `outer` = `inner` clamped to `[min_rows * single, max_rows * single]`,
//!    and never below `single`.
//! 4. Under `border-box`, vertical padding and border are added back.
//! 5. The scrollbar is hidden when `outer` is within 1px of `inner`.
//!
//! Zero width or a non-positive single-row height means layout is not
//! available; nothing is applied in that case.

use fieldkit_core::style::format_px;
use fieldkit_core::{Element, Host, Style, TextStyle};
use serde::{Deserialize, Serialize};

/// Inclusive range of visible lines.
///
/// Deserialized ranges go through [`RowBounds::new`] like built ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawRowBounds")]
pub struct RowBounds {
    min_rows: u32,
    max_rows: Option<u32>,
}

impl RowBounds {
    /// Minimum rows when none are configured.
    pub const DEFAULT_MIN_ROWS: u32 = 2;

    /// Create bounds. `min_rows` is at least 1 and `max_rows` never below it.
    #[must_use]
    pub fn new(min_rows: u32, max_rows: Option<u32>) -> Self {
        let min_rows = min_rows.max(1);
        Self {
            min_rows,
            max_rows: max_rows.map(|max| max.max(min_rows)),
        }
    }

    /// Minimum number of rows.
    #[must_use]
    pub const fn min_rows(&self) -> u32 {
        self.min_rows
    }

    /// Maximum number of rows, if capped.
    #[must_use]
    pub const fn max_rows(&self) -> Option<u32> {
        self.max_rows
    }
}

impl Default for RowBounds {
    fn default() -> Self {
        Self::new(Self::DEFAULT_MIN_ROWS, None)
    }
}

#[derive(Deserialize)]
struct RawRowBounds {
    min_rows: u32,
    #[serde(default)]
    max_rows: Option<u32>,
}

impl From<RawRowBounds> for RowBounds {
    fn from(raw: RawRowBounds) -> Self {
        Self::new(raw.min_rows, raw.max_rows)
    }
}

/// Which box the `height` property sizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BoxSizing {
    /// Height includes padding and border
    #[default]
    BorderBox,
    /// Height covers the content only
    ContentBox,
}

impl BoxSizing {
    /// CSS keyword.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::BorderBox => "border-box",
            Self::ContentBox => "content-box",
        }
    }
}

/// Vertical box extents of the visible control.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BoxMetrics {
    /// Top + bottom padding
    pub padding_block: f32,
    /// Top + bottom border width
    pub border_block: f32,
    /// Box model
    pub box_sizing: BoxSizing,
}

impl BoxMetrics {
    /// Space the `height` property must add on top of the content height.
    #[must_use]
    pub fn extra_height(&self) -> f32 {
        match self.box_sizing {
            BoxSizing::BorderBox => self.padding_block + self.border_block,
            BoxSizing::ContentBox => 0.0,
        }
    }
}

/// Height to apply to the visible control.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AutoSize {
    /// Value for the `height` style, in pixels
    pub height: f32,
    /// Whether `overflow: hidden` should be applied
    pub overflow_hidden: bool,
}

/// Clamp a measured content height to the row bounds.
///
/// Returns `None` when `single_row` is not a positive finite height.
#[must_use]
pub fn clamp_height(
    inner: f32,
    single_row: f32,
    rows: RowBounds,
    box_metrics: BoxMetrics,
) -> Option<AutoSize> {
    if !single_row.is_finite() || single_row <= 0.0 || !inner.is_finite() {
        return None;
    }

    let mut outer = inner.max(rows.min_rows() as f32 * single_row);
    if let Some(max_rows) = rows.max_rows() {
        outer = outer.min(max_rows as f32 * single_row);
    }
    outer = outer.max(single_row);

    Some(AutoSize {
        height: outer + box_metrics.extra_height(),
        overflow_hidden: (outer - inner).abs() <= 1.0,
    })
}

/// A row bound as a CSS length, for hosts that size the control natively.
///
/// `height` limits cover padding and border under `border-box`, so those are
/// added on top of the rows.
#[must_use]
pub fn row_length(rows: u32, box_metrics: BoxMetrics) -> String {
    let extra = box_metrics.extra_height();
    if extra > 0.0 {
        format!("calc({rows}lh + {extra}px)")
    } else {
        format!("{rows}lh")
    }
}

/// Text placed in the mirror before measuring.
#[must_use]
pub fn mirror_text(value: &str, placeholder: &str) -> String {
    let mut text = if !value.is_empty() {
        value.to_string()
    } else if !placeholder.is_empty() {
        placeholder.to_string()
    } else {
        "x".to_string()
    };
    if text.ends_with('\n') {
        text.push(' ');
    }
    text
}

/// Build the hidden measurement mirror for a control.
///
/// `box_style` carries the control's box and font declarations, `user_style`
/// the caller's extra inline style. The hiding declarations are written last
/// so nothing can make the mirror visible or give it vertical padding.
#[must_use]
pub fn mirror_element(box_style: &Style, user_style: &Style, class: Option<&str>) -> Element {
    let mut style = box_style.clone();
    style.extend(user_style);
    style.set("visibility", "hidden");
    style.set("position", "absolute");
    style.set("overflow", "hidden");
    style.set("height", "0");
    style.set("top", "0");
    style.set("left", "0");
    style.set("transform", "translateZ(0)");
    style.set("padding-top", "0");
    style.set("padding-bottom", "0");

    Element::new("textarea")
        .with_attr("aria-hidden", "true")
        .with_attr("tabindex", "-1")
        .with_flag("readonly", true)
        .with_optional_attr("class", class)
        .with_style(style)
}

/// Measure `mirror` on `host` and compute the height for the visible control.
#[allow(clippy::too_many_arguments)]
#[must_use]
pub fn measure(
    host: &Host,
    mirror: &Element,
    width: f32,
    text_style: &TextStyle,
    value: &str,
    placeholder: &str,
    rows: RowBounds,
    box_metrics: BoxMetrics,
) -> Option<AutoSize> {
    if width <= 0.0 {
        tracing::trace!("auto-size skipped: control has no width");
        return None;
    }

    let mut probe = mirror.clone();
    probe.set_text(mirror_text(value, placeholder));
    let inner = host.scroll_height(&probe, width, text_style);

    probe.set_text("x");
    let single_row = host.scroll_height(&probe, width, text_style);

    let result = clamp_height(inner, single_row, rows, box_metrics);
    if result.is_none() {
        tracing::trace!(single_row, "auto-size skipped: host reported no layout");
    }
    result
}

/// Render an [`AutoSize`] onto a freshly built style.
///
/// `overflow: hidden` is only written when the content fits; otherwise any
/// `overflow` already on the style is left as it is.
pub fn apply(style: &mut Style, size: AutoSize) {
    style.set("height", format_px(size.height));
    if size.overflow_hidden {
        style.set("overflow", "hidden");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fieldkit_core::{Capabilities, MonospaceMetrics};
    use proptest::prelude::*;

    const NO_BOX: BoxMetrics = BoxMetrics {
        padding_block: 0.0,
        border_block: 0.0,
        box_sizing: BoxSizing::BorderBox,
    };

    fn host() -> Host {
        Host::new(Capabilities::absent(), MonospaceMetrics::default())
    }

    /// 10px font, 2.0 line height: 20px rows, 5px cells.
    fn text_style() -> TextStyle {
        TextStyle {
            size: 10.0,
            line_height: 2.0,
        }
    }

    // =========================================================================
    // RowBounds Tests
    // =========================================================================

    #[test]
    fn test_row_bounds_default() {
        let rows = RowBounds::default();
        assert_eq!(rows.min_rows(), 2);
        assert_eq!(rows.max_rows(), None);
    }

    #[test]
    fn test_row_bounds_normalize() {
        assert_eq!(RowBounds::new(0, None).min_rows(), 1);
        let rows = RowBounds::new(4, Some(2));
        assert_eq!(rows.max_rows(), Some(4));
    }

    // =========================================================================
    // Clamp Tests
    // =========================================================================

    #[test]
    fn test_clamp_min_rows() {
        let size = clamp_height(20.0, 20.0, RowBounds::new(3, None), NO_BOX).unwrap();
        assert_eq!(size.height, 60.0);
        assert!(!size.overflow_hidden);
    }

    #[test]
    fn test_clamp_max_rows() {
        let size = clamp_height(200.0, 20.0, RowBounds::new(2, Some(5)), NO_BOX).unwrap();
        assert_eq!(size.height, 100.0);
        // Content taller than the cap must stay scrollable.
        assert!(!size.overflow_hidden);
    }

    #[test]
    fn test_clamp_within_bounds_hides_overflow() {
        let size = clamp_height(80.0, 20.0, RowBounds::new(2, Some(5)), NO_BOX).unwrap();
        assert_eq!(size.height, 80.0);
        assert!(size.overflow_hidden);
    }

    #[test]
    fn test_clamp_unbounded_max() {
        let size = clamp_height(1000.0, 20.0, RowBounds::new(2, None), NO_BOX).unwrap();
        assert_eq!(size.height, 1000.0);
    }

    #[test]
    fn test_clamp_border_box_adds_padding_and_border() {
        let metrics = BoxMetrics {
            padding_block: 16.0,
            border_block: 2.0,
            box_sizing: BoxSizing::BorderBox,
        };
        let size = clamp_height(20.0, 20.0, RowBounds::new(2, None), metrics).unwrap();
        assert_eq!(size.height, 58.0);
    }

    #[test]
    fn test_clamp_content_box_ignores_padding() {
        let metrics = BoxMetrics {
            padding_block: 16.0,
            border_block: 2.0,
            box_sizing: BoxSizing::ContentBox,
        };
        let size = clamp_height(20.0, 20.0, RowBounds::new(2, None), metrics).unwrap();
        assert_eq!(size.height, 40.0);
    }

    #[test]
    fn test_clamp_no_layout() {
        assert!(clamp_height(0.0, 0.0, RowBounds::default(), NO_BOX).is_none());
        assert!(clamp_height(40.0, f32::NAN, RowBounds::default(), NO_BOX).is_none());
    }

    // =========================================================================
    // Mirror Tests
    // =========================================================================

    #[test]
    fn test_mirror_text_fallbacks() {
        assert_eq!(mirror_text("hello", "type here"), "hello");
        assert_eq!(mirror_text("", "type here"), "type here");
        assert_eq!(mirror_text("", ""), "x");
        assert_eq!(mirror_text("line\n", ""), "line\n ");
    }

    #[test]
    fn test_mirror_element_markers() {
        let mirror = mirror_element(&Style::new(), &Style::new(), Some("field"));
        assert_eq!(mirror.tag(), "textarea");
        assert_eq!(mirror.attr("aria-hidden"), Some("true"));
        assert_eq!(mirror.attr("tabindex"), Some("-1"));
        assert!(mirror.has_attr("readonly"));
        assert_eq!(mirror.attr("class"), Some("field"));
        assert_eq!(mirror.style().get("visibility"), "hidden");
        assert_eq!(mirror.style().get("position"), "absolute");
        assert_eq!(mirror.style().get("height"), "0");
    }

    #[test]
    fn test_mirror_element_user_style_cannot_reveal_it() {
        let user = Style::new()
            .with("visibility", "visible")
            .with("padding-top", "12px")
            .with("color", "red");
        let mirror = mirror_element(&Style::new(), &user, None);
        assert_eq!(mirror.style().get("visibility"), "hidden");
        assert_eq!(mirror.style().get("padding-top"), "0");
        assert_eq!(mirror.style().get("color"), "red");
    }

    #[test]
    fn test_mirror_element_keeps_horizontal_padding() {
        let base = Style::new()
            .with("padding-left", "8px")
            .with("padding-top", "8px");
        let mirror = mirror_element(&base, &Style::new(), None);
        assert_eq!(mirror.style().get("padding-left"), "8px");
        assert_eq!(mirror.style().get("padding-top"), "0");
    }

    // =========================================================================
    // Measurement Tests
    // =========================================================================

    #[test]
    fn test_measure_single_line_uses_min_rows() {
        let mirror = mirror_element(&Style::new(), &Style::new(), None);
        let size = measure(
            &host(),
            &mirror,
            200.0,
            &text_style(),
            "test",
            "",
            RowBounds::new(2, Some(5)),
            NO_BOX,
        )
        .unwrap();
        assert_eq!(size.height, 40.0);
    }

    #[test]
    fn test_measure_grows_with_lines() {
        let mirror = mirror_element(&Style::new(), &Style::new(), None);
        let size = measure(
            &host(),
            &mirror,
            200.0,
            &text_style(),
            "1\n2\n3\n4",
            "",
            RowBounds::new(2, Some(5)),
            NO_BOX,
        )
        .unwrap();
        assert_eq!(size.height, 80.0);
        assert!(size.overflow_hidden);
    }

    #[test]
    fn test_measure_trailing_newline_counts() {
        let mirror = mirror_element(&Style::new(), &Style::new(), None);
        let size = measure(
            &host(),
            &mirror,
            200.0,
            &text_style(),
            "1\n2\n",
            "",
            RowBounds::new(1, None),
            NO_BOX,
        )
        .unwrap();
        assert_eq!(size.height, 60.0);
    }

    #[test]
    fn test_measure_zero_width_skips() {
        let mirror = mirror_element(&Style::new(), &Style::new(), None);
        let size = measure(
            &host(),
            &mirror,
            0.0,
            &text_style(),
            "test",
            "",
            RowBounds::default(),
            NO_BOX,
        );
        assert!(size.is_none());
    }

    #[test]
    fn test_measure_headless_skips() {
        let mirror = mirror_element(&Style::new(), &Style::new(), None);
        let size = measure(
            &Host::headless(),
            &mirror,
            200.0,
            &text_style(),
            "test",
            "",
            RowBounds::default(),
            NO_BOX,
        );
        assert!(size.is_none());
    }

    #[test]
    fn test_apply_writes_height_and_overflow() {
        let mut style = Style::new();
        apply(
            &mut style,
            AutoSize {
                height: 40.0,
                overflow_hidden: true,
            },
        );
        assert_eq!(style.get("height"), "40px");
        assert_eq!(style.get("overflow"), "hidden");

        let mut style = Style::new();
        apply(
            &mut style,
            AutoSize {
                height: 48.0,
                overflow_hidden: false,
            },
        );
        assert_eq!(style.get("height"), "48px");
        assert_eq!(style.get("overflow"), "");
    }

    #[test]
    fn test_apply_keeps_existing_overflow_when_clamped() {
        let mut style = Style::new().with("overflow", "auto");
        apply(
            &mut style,
            AutoSize {
                height: 100.0,
                overflow_hidden: false,
            },
        );
        assert_eq!(style.get("overflow"), "auto");
    }

    // =========================================================================
    // Native Length Tests
    // =========================================================================

    #[test]
    fn test_row_length_border_box_adds_box() {
        let metrics = BoxMetrics {
            padding_block: 16.0,
            border_block: 2.0,
            box_sizing: BoxSizing::BorderBox,
        };
        assert_eq!(row_length(2, metrics), "calc(2lh + 18px)");
    }

    #[test]
    fn test_row_length_content_box_is_bare() {
        let metrics = BoxMetrics {
            padding_block: 16.0,
            border_block: 2.0,
            box_sizing: BoxSizing::ContentBox,
        };
        assert_eq!(row_length(2, metrics), "2lh");
        assert_eq!(row_length(3, NO_BOX), "3lh");
    }

    // =========================================================================
    // Serde Tests
    // =========================================================================

    #[test]
    fn test_row_bounds_deserialize_normalizes() {
        let rows: RowBounds = serde_json::from_str(r#"{"min_rows":5,"max_rows":2}"#).unwrap();
        assert_eq!(rows, RowBounds::new(5, Some(5)));

        let rows: RowBounds = serde_json::from_str(r#"{"min_rows":0}"#).unwrap();
        assert_eq!(rows.min_rows(), 1);
        assert_eq!(rows.max_rows(), None);
    }

    #[test]
    fn test_row_bounds_serde_roundtrip() {
        let rows = RowBounds::new(2, Some(6));
        let json = serde_json::to_string(&rows).unwrap();
        assert_eq!(serde_json::from_str::<RowBounds>(&json).unwrap(), rows);
    }

    // =========================================================================
    // Property Tests
    // =========================================================================

    proptest! {
        #[test]
        fn prop_height_within_row_bounds(
            inner in 0.0f32..5000.0,
            single in 1.0f32..100.0,
            min_rows in 1u32..10,
            extra in 0u32..10,
        ) {
            let rows = RowBounds::new(min_rows, Some(min_rows + extra));
            let size = clamp_height(inner, single, rows, NO_BOX).unwrap();
            let low = rows.min_rows() as f32 * single;
            let high = rows.max_rows().unwrap() as f32 * single;
            prop_assert!(size.height >= low - 1e-3);
            prop_assert!(size.height <= high + 1e-3);
        }

        #[test]
        fn prop_unbounded_never_below_min(
            inner in 0.0f32..5000.0,
            single in 1.0f32..100.0,
            min_rows in 1u32..10,
        ) {
            let rows = RowBounds::new(min_rows, None);
            let size = clamp_height(inner, single, rows, NO_BOX).unwrap();
            prop_assert!(size.height >= min_rows as f32 * single - 1e-3);
            prop_assert!(size.height >= inner - 1e-3);
        }
    }
}
