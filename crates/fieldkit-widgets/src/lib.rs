//! Widget implementations for Fieldkit.
//!
//! - [`Textarea`]: multi-line text entry sized by its content, natively when
//!   the host supports it and through [`autosize`] otherwise.

pub mod autosize;
mod config;
mod textarea;

pub use autosize::{AutoSize, BoxMetrics, BoxSizing, RowBounds};
pub use config::{ConfigError, TextareaConfig};
pub use textarea::{TextChanged, Textarea};
