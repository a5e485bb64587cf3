//! Testing harness for Fieldkit components.
//!
//! ```
//! use fieldkit_test::Selector;
//!
//! let sel = Selector::parse("textarea[aria-hidden='true']").unwrap();
//! assert!(matches!(sel, Selector::Compound(_)));
//! ```

mod a11y;
mod conformance;
mod harness;
mod selector;

pub use a11y::{A11yNode, A11yTree};
pub use conformance::{describe_conformance, root_element, ConformanceCase, ConformanceReport};
pub use harness::Harness;
pub use selector::{Selector, SelectorError, SelectorParser};

use fieldkit_core::logging::{self, LOG_ENV};
use fieldkit_core::CoreError;

/// Route `tracing` output of the code under test to stderr, filtered by
/// `FIELDKIT_LOG`. Safe to call from every test; only the first call installs.
/// Bad directives are reported on stderr and replaced by `warn`.
pub fn init_logging() {
    let directives = std::env::var(LOG_ENV).unwrap_or_else(|_| "warn".to_string());
    if let Err(err) = try_init_logging(&directives) {
        eprintln!("fieldkit-test: ignoring {LOG_ENV}: {err}");
    }
}

/// Install a subscriber for `directives`.
///
/// A subscriber that is already installed is not an error. Invalid
/// directives install a `warn` subscriber instead and return the parse error.
pub fn try_init_logging(directives: &str) -> Result<(), CoreError> {
    install(directives).or_else(|err| install("warn").and(Err(err)))
}

fn install(directives: &str) -> Result<(), CoreError> {
    match logging::init(directives) {
        Ok(()) | Err(CoreError::Logging(_)) => Ok(()),
        Err(err) => Err(err),
    }
}
