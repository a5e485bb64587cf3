//! Host capability detection.
//!
//! A host may expose a feature-query primitive answering "is this
//! `property: value` pair supported natively?". Widgets use it to pick between
//! native behaviour and a scripted fallback. The primitive is optional: a host
//! without it is treated exactly like one that answers "no".
//!
//! # Ambient capabilities
//!
//! [`Capabilities::current`] reads a thread-local override stack so tests can
//! swap the primitive without threading a host through every call:
//!
//! ```
//! use fieldkit_core::capability::{with_capability_override, Capabilities, Feature, Support};
//!
//! let caps = Capabilities::from_fn(|property, value| property == "field-sizing" && value == "content");
//! with_capability_override(caps, || {
//!     let current = Capabilities::current();
//!     assert_eq!(current.query(Feature::FIELD_SIZING_CONTENT), Support::Supported);
//! });
//!
//! // Outside the scope nothing is installed.
//! assert_eq!(
//!     Capabilities::current().query(Feature::FIELD_SIZING_CONTENT),
//!     Support::Unavailable
//! );
//! ```
//!
//! Overrides nest; the innermost wins. Guards pop on drop, including during
//! unwinding, and never cross threads.

use std::cell::RefCell;
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

// ============================================================================
// Query primitive
// ============================================================================

/// The host's feature-query primitive.
pub trait SupportsQuery: Send + Sync {
    /// Report whether `property: value` is supported natively.
    fn supports(&self, property: &str, value: &str) -> bool;
}

impl<F> SupportsQuery for F
where
    F: Fn(&str, &str) -> bool + Send + Sync,
{
    fn supports(&self, property: &str, value: &str) -> bool {
        self(property, value)
    }
}

/// A fixed allow-list of supported `property: value` pairs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StaticSupports {
    pairs: HashSet<(String, String)>,
}

impl StaticSupports {
    /// Create an empty allow-list (nothing supported).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a supported pair.
    #[must_use]
    pub fn with(mut self, property: impl Into<String>, value: impl Into<String>) -> Self {
        self.pairs.insert((property.into(), value.into()));
        self
    }
}

impl SupportsQuery for StaticSupports {
    fn supports(&self, property: &str, value: &str) -> bool {
        self.pairs
            .iter()
            .any(|(p, v)| p == property && v == value)
    }
}

// ============================================================================
// Features
// ============================================================================

/// A `property: value` pair to query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Feature {
    /// CSS property name
    pub property: &'static str,
    /// Property value
    pub value: &'static str,
}

impl Feature {
    /// Content-based sizing of form controls.
    pub const FIELD_SIZING_CONTENT: Self = Self::new("field-sizing", "content");

    /// Create a feature pair.
    #[must_use]
    pub const fn new(property: &'static str, value: &'static str) -> Self {
        Self { property, value }
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.property, self.value)
    }
}

/// Answer to a feature query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Support {
    /// The primitive reported support
    Supported,
    /// The primitive reported no support
    Unsupported,
    /// The host has no query primitive
    Unavailable,
}

impl Support {
    /// Only an explicit "yes" counts as native support.
    #[must_use]
    pub const fn is_supported(self) -> bool {
        matches!(self, Self::Supported)
    }
}

// ============================================================================
// Capabilities
// ============================================================================

/// The capability surface of a host.
#[derive(Clone, Default)]
pub struct Capabilities {
    supports: Option<Arc<dyn SupportsQuery>>,
}

impl Capabilities {
    /// A host without a query primitive.
    #[must_use]
    pub const fn absent() -> Self {
        Self { supports: None }
    }

    /// A host with the given query primitive.
    #[must_use]
    pub fn with_supports(supports: impl SupportsQuery + 'static) -> Self {
        Self {
            supports: Some(Arc::new(supports)),
        }
    }

    /// A host whose primitive is a closure.
    #[must_use]
    pub fn from_fn<F>(f: F) -> Self
    where
        F: Fn(&str, &str) -> bool + Send + Sync + 'static,
    {
        Self::with_supports(f)
    }

    /// A host whose primitive supports every listed feature and nothing else.
    #[must_use]
    pub fn supporting(features: &[Feature]) -> Self {
        let list = features
            .iter()
            .fold(StaticSupports::new(), |list, f| list.with(f.property, f.value));
        Self::with_supports(list)
    }

    /// A host whose primitive answers "no" to everything.
    #[must_use]
    pub fn supporting_nothing() -> Self {
        Self::with_supports(StaticSupports::new())
    }

    /// Check if the query primitive exists.
    #[must_use]
    pub fn has_primitive(&self) -> bool {
        self.supports.is_some()
    }

    /// Query a feature.
    #[must_use]
    pub fn query(&self, feature: Feature) -> Support {
        match &self.supports {
            None => Support::Unavailable,
            Some(q) if q.supports(feature.property, feature.value) => Support::Supported,
            Some(_) => Support::Unsupported,
        }
    }

    /// Ambient capabilities: the innermost active override, or
    /// [`Capabilities::absent`] when none is installed.
    #[must_use]
    pub fn current() -> Self {
        OVERRIDE_STACK.with(|stack| stack.borrow().last().cloned().unwrap_or_default())
    }
}

impl fmt::Debug for Capabilities {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Capabilities")
            .field("has_primitive", &self.has_primitive())
            .finish()
    }
}

// ============================================================================
// Override stack
// ============================================================================

thread_local! {
    static OVERRIDE_STACK: RefCell<Vec<Capabilities>> = const { RefCell::new(Vec::new()) };
}

/// RAII guard that removes an override when dropped.
#[must_use]
pub struct OverrideGuard {
    _marker: std::marker::PhantomData<*const ()>,
}

impl Drop for OverrideGuard {
    fn drop(&mut self) {
        let depth = OVERRIDE_STACK.with(|stack| {
            let mut stack = stack.borrow_mut();
            stack.pop();
            stack.len()
        });
        tracing::trace!(depth, "capability override removed");
    }
}

/// Push ambient capabilities for the current thread.
#[must_use = "the override is removed when the guard is dropped"]
pub fn push_override(capabilities: Capabilities) -> OverrideGuard {
    let depth = OVERRIDE_STACK.with(|stack| {
        let mut stack = stack.borrow_mut();
        stack.push(capabilities);
        stack.len()
    });
    tracing::trace!(depth, "capability override installed");
    OverrideGuard {
        _marker: std::marker::PhantomData,
    }
}

/// Run `f` with `capabilities` installed as the ambient capabilities.
pub fn with_capability_override<F, R>(capabilities: Capabilities, f: F) -> R
where
    F: FnOnce() -> R,
{
    let _guard = push_override(capabilities);
    f()
}

/// Check whether any override is active on this thread.
#[must_use]
pub fn has_active_overrides() -> bool {
    OVERRIDE_STACK.with(|stack| !stack.borrow().is_empty())
}

// ============================================================================
// Sizing strategy
// ============================================================================

/// How a content-sized control gets its height.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SizingStrategy {
    /// The host sizes the control from its content.
    Native,
    /// Script-driven measurement through a hidden mirror.
    Fallback,
}

impl SizingStrategy {
    /// Resolve the strategy for content-based sizing.
    ///
    /// A missing primitive resolves to [`SizingStrategy::Fallback`].
    #[must_use]
    pub fn detect(capabilities: &Capabilities) -> Self {
        Self::from_support(capabilities.query(Feature::FIELD_SIZING_CONTENT))
    }

    /// Map a query answer to a strategy.
    #[must_use]
    pub const fn from_support(support: Support) -> Self {
        if support.is_supported() {
            Self::Native
        } else {
            Self::Fallback
        }
    }

    /// Check if the fallback engine should run.
    #[must_use]
    pub const fn is_fallback(self) -> bool {
        matches!(self, Self::Fallback)
    }

    /// Stable lowercase name, used in log fields.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Native => "native",
            Self::Fallback => "fallback",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // =========================================================================
    // Query Tests
    // =========================================================================

    #[test]
    fn test_absent_primitive_is_unavailable() {
        let caps = Capabilities::absent();
        assert!(!caps.has_primitive());
        assert_eq!(caps.query(Feature::FIELD_SIZING_CONTENT), Support::Unavailable);
    }

    #[test]
    fn test_supporting_lists_features() {
        let caps = Capabilities::supporting(&[Feature::FIELD_SIZING_CONTENT]);
        assert_eq!(caps.query(Feature::FIELD_SIZING_CONTENT), Support::Supported);
        assert_eq!(
            caps.query(Feature::new("field-sizing", "fixed")),
            Support::Unsupported
        );
    }

    #[test]
    fn test_supporting_nothing() {
        let caps = Capabilities::supporting_nothing();
        assert!(caps.has_primitive());
        assert_eq!(caps.query(Feature::FIELD_SIZING_CONTENT), Support::Unsupported);
    }

    #[test]
    fn test_closure_primitive_receives_pair() {
        let caps = Capabilities::from_fn(|p, v| p == "display" && v == "grid");
        assert!(caps.query(Feature::new("display", "grid")).is_supported());
        assert!(!caps.query(Feature::FIELD_SIZING_CONTENT).is_supported());
    }

    #[test]
    fn test_feature_display() {
        assert_eq!(Feature::FIELD_SIZING_CONTENT.to_string(), "field-sizing: content");
    }

    // =========================================================================
    // Strategy Tests
    // =========================================================================

    #[test]
    fn test_strategy_detect() {
        assert_eq!(
            SizingStrategy::detect(&Capabilities::supporting(&[Feature::FIELD_SIZING_CONTENT])),
            SizingStrategy::Native
        );
        assert_eq!(
            SizingStrategy::detect(&Capabilities::supporting_nothing()),
            SizingStrategy::Fallback
        );
        assert_eq!(
            SizingStrategy::detect(&Capabilities::absent()),
            SizingStrategy::Fallback
        );
    }

    #[test]
    fn test_strategy_detect_is_idempotent() {
        let caps = Capabilities::supporting_nothing();
        let first = SizingStrategy::detect(&caps);
        let second = SizingStrategy::detect(&caps);
        assert_eq!(first, second);
    }

    #[test]
    fn test_strategy_names() {
        assert_eq!(SizingStrategy::Native.as_str(), "native");
        assert_eq!(SizingStrategy::Fallback.as_str(), "fallback");
        assert!(SizingStrategy::Fallback.is_fallback());
        assert!(!SizingStrategy::Native.is_fallback());
    }

    // =========================================================================
    // Override Stack Tests
    // =========================================================================

    #[test]
    fn test_current_without_override_is_absent() {
        assert!(!has_active_overrides());
        assert!(!Capabilities::current().has_primitive());
    }

    #[test]
    fn test_override_scope() {
        let supported = with_capability_override(
            Capabilities::supporting(&[Feature::FIELD_SIZING_CONTENT]),
            || {
                assert!(has_active_overrides());
                SizingStrategy::detect(&Capabilities::current())
            },
        );
        assert_eq!(supported, SizingStrategy::Native);
        assert!(!has_active_overrides());
    }

    #[test]
    fn test_override_nested_innermost_wins() {
        with_capability_override(Capabilities::supporting(&[Feature::FIELD_SIZING_CONTENT]), || {
            with_capability_override(Capabilities::absent(), || {
                assert_eq!(
                    Capabilities::current().query(Feature::FIELD_SIZING_CONTENT),
                    Support::Unavailable
                );
            });
            assert_eq!(
                Capabilities::current().query(Feature::FIELD_SIZING_CONTENT),
                Support::Supported
            );
        });
    }

    #[test]
    fn test_override_guard_drop() {
        {
            let _guard = push_override(Capabilities::supporting_nothing());
            assert!(Capabilities::current().has_primitive());
        }
        assert!(!Capabilities::current().has_primitive());
    }

    #[test]
    fn test_override_cleans_up_on_panic() {
        let result = std::panic::catch_unwind(|| {
            with_capability_override(Capabilities::supporting_nothing(), || {
                panic!("deliberate panic");
            });
        });
        assert!(result.is_err());
        assert!(!has_active_overrides());
    }

    #[test]
    fn test_override_is_thread_local() {
        let _guard = push_override(Capabilities::supporting_nothing());
        let other = std::thread::spawn(|| Capabilities::current().has_primitive())
            .join()
            .expect("thread join");
        assert!(!other);
    }
}
