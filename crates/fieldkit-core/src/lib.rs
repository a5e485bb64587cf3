//! Core types and traits for the Fieldkit component library.
//!
//! This crate provides foundational types used throughout Fieldkit:
//! - Geometric primitives: [`Point`], [`Size`], [`Rect`]
//! - Layout constraints: [`Constraints`]
//! - Events: [`Event`], [`Key`]
//! - The rendered tree: [`Element`] with inline [`Style`]
//! - The mounting environment: [`Host`], [`Capabilities`], [`TextMetrics`]
//! - Capability gating: [`SizingStrategy`]

pub mod capability;
mod constraints;
mod element;
mod error;
mod event;
mod geometry;
mod host;
pub mod logging;
pub mod metrics;
pub mod style;
pub mod widget;

pub use capability::{
    push_override, with_capability_override, Capabilities, Feature, OverrideGuard,
    SizingStrategy, StaticSupports, Support, SupportsQuery,
};
pub use constraints::Constraints;
pub use element::{Descendants, Element};
pub use error::CoreError;
pub use event::{Event, Key, MouseButton};
pub use geometry::{Point, Rect, Size};
pub use host::Host;
pub use metrics::{MonospaceMetrics, NullMetrics, TextMetrics};
pub use style::Style;
pub use widget::{
    AccessibleRole, CommonProps, LayoutResult, TextStyle, TypeId, Widget, WidgetId,
};
