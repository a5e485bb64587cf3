//! CSS-like selector parsing for element queries.
//!
//! Supports:
//! - `"textarea"` - by tag
//! - `"#notes"` - by ID
//! - `".field"` - by class
//! - `"[data-testid='login']"` - by test ID
//! - `"[aria-hidden='true']"` / `"[readonly]"` - by attribute value or presence
//! - `"textarea[aria-hidden='true']"` - compounds of the above

use fieldkit_core::Element;

/// Parsed selector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selector {
    /// Match by tag name
    Tag(String),
    /// Match by ID (e.g., `#my-id`)
    Id(String),
    /// Match by test ID (e.g., `[data-testid='foo']`)
    TestId(String),
    /// Match by class (e.g., `.my-class`)
    Class(String),
    /// Match by attribute value (e.g., `[aria-label='foo']`)
    Attribute {
        /// Attribute name
        name: String,
        /// Expected value
        value: String,
    },
    /// Match by attribute presence (e.g., `[readonly]`)
    HasAttribute(String),
    /// Every part must match the same element
    Compound(Vec<Selector>),
}

impl Selector {
    /// Parse a selector string.
    ///
    /// # Errors
    ///
    /// Returns an error if the selector is invalid.
    pub fn parse(input: &str) -> Result<Self, SelectorError> {
        SelectorParser::new(input).parse()
    }

    /// Check if this selector matches an element. Fragments never match.
    #[must_use]
    pub fn matches(&self, element: &Element) -> bool {
        if element.is_fragment() {
            return false;
        }
        match self {
            Self::Tag(name) => element.tag().eq_ignore_ascii_case(name),
            Self::Id(id) => element.attr("id") == Some(id.as_str()),
            Self::TestId(id) => element.attr("data-testid") == Some(id.as_str()),
            Self::Class(class) => element.classes().any(|c| c == class),
            Self::Attribute { name, value } => element.attr(name) == Some(value.as_str()),
            Self::HasAttribute(name) => element.has_attr(name),
            Self::Compound(parts) => parts.iter().all(|part| part.matches(element)),
        }
    }
}

/// Selector parser.
pub struct SelectorParser<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> SelectorParser<'a> {
    /// Create a new parser.
    #[must_use]
    pub const fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    /// Parse the selector.
    pub fn parse(&mut self) -> Result<Selector, SelectorError> {
        self.skip_whitespace();
        if self.peek_char().is_none() {
            return Err(SelectorError::Empty);
        }

        let mut parts = Vec::new();
        while let Some(c) = self.peek_char() {
            if c.is_whitespace() {
                self.skip_whitespace();
                if let Some(next) = self.peek_char() {
                    return Err(SelectorError::UnexpectedChar(next));
                }
                break;
            }
            parts.push(self.parse_simple(parts.is_empty())?);
        }

        if parts.len() == 1 {
            Ok(parts.remove(0))
        } else {
            Ok(Selector::Compound(parts))
        }
    }

    fn parse_simple(&mut self, first: bool) -> Result<Selector, SelectorError> {
        let c = self.peek_char().ok_or(SelectorError::Empty)?;
        match c {
            '#' => self.parse_id(),
            '.' => self.parse_class(),
            '[' => self.parse_attribute(),
            _ if first && c.is_alphabetic() => self.parse_tag(),
            _ => Err(SelectorError::UnexpectedChar(c)),
        }
    }

    fn parse_id(&mut self) -> Result<Selector, SelectorError> {
        self.advance(); // Skip '#'
        let id = self.read_identifier()?;
        Ok(Selector::Id(id))
    }

    fn parse_class(&mut self) -> Result<Selector, SelectorError> {
        self.advance(); // Skip '.'
        let class = self.read_identifier()?;
        Ok(Selector::Class(class))
    }

    fn parse_tag(&mut self) -> Result<Selector, SelectorError> {
        let name = self.read_identifier()?;
        Ok(Selector::Tag(name))
    }

    fn parse_attribute(&mut self) -> Result<Selector, SelectorError> {
        self.advance(); // Skip '['

        let name = self.read_until_any(&['=', ']']).trim().to_string();
        if name.is_empty() {
            return Err(SelectorError::InvalidAttribute);
        }

        match self.peek_char() {
            Some(']') => {
                self.advance();
                return Ok(Selector::HasAttribute(name));
            }
            Some('=') => self.advance(),
            _ => return Err(SelectorError::UnclosedAttribute),
        }

        let quote = self.peek_char().filter(|&q| q == '\'' || q == '"');
        let value = match quote {
            Some(q) => {
                self.advance();
                let value = self.read_until_any(&[q]);
                if self.peek_char() != Some(q) {
                    return Err(SelectorError::UnclosedAttribute);
                }
                self.advance();
                value
            }
            None => self.read_until_any(&[']']),
        };

        if self.peek_char() != Some(']') {
            return Err(SelectorError::UnclosedAttribute);
        }
        self.advance();

        if name == "data-testid" {
            Ok(Selector::TestId(value))
        } else {
            Ok(Selector::Attribute { name, value })
        }
    }

    fn read_identifier(&mut self) -> Result<String, SelectorError> {
        let start = self.pos;
        while let Some(c) = self.peek_char() {
            if c.is_alphanumeric() || c == '-' || c == '_' {
                self.advance();
            } else {
                break;
            }
        }

        if self.pos == start {
            return Err(SelectorError::ExpectedIdentifier);
        }

        Ok(self.input[start..self.pos].to_string())
    }

    fn read_until_any(&mut self, stops: &[char]) -> String {
        let start = self.pos;
        while let Some(c) = self.peek_char() {
            if stops.contains(&c) {
                break;
            }
            self.advance();
        }
        self.input[start..self.pos].to_string()
    }

    fn skip_whitespace(&mut self) {
        while let Some(c) = self.peek_char() {
            if c.is_whitespace() {
                self.advance();
            } else {
                break;
            }
        }
    }

    fn peek_char(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn advance(&mut self) {
        if let Some(c) = self.peek_char() {
            self.pos += c.len_utf8();
        }
    }
}

/// Selector parsing error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectorError {
    /// Empty selector
    Empty,
    /// Unexpected character
    UnexpectedChar(char),
    /// Expected identifier
    ExpectedIdentifier,
    /// Invalid attribute syntax
    InvalidAttribute,
    /// Unclosed attribute bracket or quote
    UnclosedAttribute,
}

impl std::fmt::Display for SelectorError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty => write!(f, "empty selector"),
            Self::UnexpectedChar(c) => write!(f, "unexpected character: '{c}'"),
            Self::ExpectedIdentifier => write!(f, "expected identifier"),
            Self::InvalidAttribute => write!(f, "invalid attribute syntax"),
            Self::UnclosedAttribute => write!(f, "unclosed attribute bracket"),
        }
    }
}

impl std::error::Error for SelectorError {}
