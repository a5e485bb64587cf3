//! Shared conformance checks for components.
//!
//! Every component forwards [`CommonProps`] to its root element. The root is
//! the widget's rendered element, or the first child that is not
//! `aria-hidden` when it renders a fragment.

use fieldkit_core::{CommonProps, Element, Host, Style, Widget};

use crate::harness::Harness;

/// Outcome of one conformance check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConformanceCase {
    /// Check name
    pub name: &'static str,
    /// Whether it passed
    pub passed: bool,
    /// What was observed
    pub detail: String,
}

/// Results of [`describe_conformance`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConformanceReport {
    /// Individual checks, in run order
    pub cases: Vec<ConformanceCase>,
}

impl ConformanceReport {
    /// Check if every case passed.
    #[must_use]
    pub fn is_conformant(&self) -> bool {
        self.cases.iter().all(|c| c.passed)
    }

    /// Failed cases.
    pub fn failures(&self) -> impl Iterator<Item = &ConformanceCase> {
        self.cases.iter().filter(|c| !c.passed)
    }

    /// Assert that every case passed.
    ///
    /// # Panics
    ///
    /// Panics listing each failed case.
    pub fn assert_conformant(&self) {
        let failures: Vec<String> = self
            .failures()
            .map(|c| format!("{}: {}", c.name, c.detail))
            .collect();
        assert!(
            failures.is_empty(),
            "Component is not conformant:\n{}",
            failures.join("\n")
        );
    }

    fn record(&mut self, name: &'static str, passed: bool, detail: String) {
        self.cases.push(ConformanceCase {
            name,
            passed,
            detail,
        });
    }
}

/// The element a component's props land on.
#[must_use]
pub fn root_element(rendered: &Element) -> Option<&Element> {
    if rendered.is_fragment() {
        rendered.children().iter().find(|el| !el.is_aria_hidden())
    } else {
        Some(rendered)
    }
}

/// Run the shared conformance checks against a component.
///
/// `build` creates a fresh widget from forwarded props; each check mounts
/// its own instance on `host`.
pub fn describe_conformance<W, F>(root_tag: &str, host: &Host, build: F) -> ConformanceReport
where
    W: Widget,
    F: Fn(CommonProps) -> W,
{
    let mut report = ConformanceReport::default();

    let tag = observe(&build, host, CommonProps::new(), |el| el.tag().to_string());
    report.record("root tag", tag == root_tag, format!("expected <{root_tag}>, got <{tag}>"));

    let id = observe(&build, host, CommonProps::new().with_id("conformance-id"), |el| {
        el.attr("id").unwrap_or_default().to_string()
    });
    report.record("forwards id", id == "conformance-id", format!("id = '{id}'"));

    let class = observe(&build, host, CommonProps::new().with_class("conformance-class"), |el| {
        el.attr("class").unwrap_or_default().to_string()
    });
    report.record(
        "forwards class",
        class.split_whitespace().any(|c| c == "conformance-class"),
        format!("class = '{class}'"),
    );

    let test_id = observe(&build, host, CommonProps::new().with_test_id("conformance-test-id"), |el| {
        el.attr("data-testid").unwrap_or_default().to_string()
    });
    report.record(
        "forwards test id",
        test_id == "conformance-test-id",
        format!("data-testid = '{test_id}'"),
    );

    let style = Style::new().with("outline-color", "rebeccapurple");
    let color = observe(&build, host, CommonProps::new().with_style(style), |el| {
        el.style().get("outline-color").to_string()
    });
    report.record(
        "forwards style",
        color == "rebeccapurple",
        format!("outline-color = '{color}'"),
    );

    tracing::debug!(
        passed = report.cases.iter().filter(|c| c.passed).count(),
        total = report.cases.len(),
        "conformance checks finished"
    );
    report
}

/// Mount a fresh widget and read something off its root element.
fn observe<W: Widget>(
    build: &impl Fn(CommonProps) -> W,
    host: &Host,
    props: CommonProps,
    read: impl Fn(&Element) -> String,
) -> String {
    let harness = Harness::with_host(build(props), host.clone());
    let rendered = harness.widget().render();
    root_element(&rendered).map_or_else(|| "<nothing rendered>".to_string(), read)
}
