// Element locators and their W3C WebDriver encoding.
//
// The site is addressed two ways: CSS selectors for controls that carry an
// id, and visible link text for the navigation menu. WebDriver has no
// "text=" strategy, so text locators are lowered to an XPath expression.

use std::fmt;

use serde::Serialize;

/// How to find an element on the page.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Locator {
    /// A CSS selector, e.g. `#txtUser`.
    Css(String),
    /// Any element in the page body whose own text contains this string.
    /// Script and style contents never match.
    Text(String),
    /// A raw XPath expression, relative when used under a parent element.
    XPath(String),
}

/// The `{"using", "value"}` body of a find-element request.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Selector {
    pub using: &'static str,
    pub value: String,
}

impl Locator {
    pub fn css(selector: impl Into<String>) -> Self {
        Self::Css(selector.into())
    }

    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }

    pub fn xpath(expr: impl Into<String>) -> Self {
        Self::XPath(expr.into())
    }

    /// Lower this locator to a WebDriver location strategy.
    pub fn selector(&self) -> Selector {
        match self {
            Self::Css(css) => Selector {
                using: "css selector",
                value: css.clone(),
            },
            Self::Text(text) => Selector {
                using: "xpath",
                value: format!(
                    "//body//*[not(self::script or self::style)][text()[contains(normalize-space(.), {})]]",
                    xpath_literal(text)
                ),
            },
            Self::XPath(expr) => Selector {
                using: "xpath",
                value: expr.clone(),
            },
        }
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Css(css) => f.write_str(css),
            Self::Text(text) => write!(f, "text={text}"),
            Self::XPath(expr) => write!(f, "xpath={expr}"),
        }
    }
}

/// Quote a string as an XPath 1.0 literal.
///
/// XPath has no escape sequences, so a string holding both quote kinds
/// has to be assembled with `concat()`.
pub fn xpath_literal(s: &str) -> String {
    if !s.contains('\'') {
        return format!("'{s}'");
    }
    if !s.contains('"') {
        return format!("\"{s}\"");
    }
    let parts: Vec<String> = s.split('\'').map(|p| format!("'{p}'")).collect();
    format!("concat({})", parts.join(", \"'\", "))
}

/// Quote a string as a CSS attribute value.
pub fn css_string(s: &str) -> String {
    let escaped = s.replace('\\', "\\\\").replace('"', "\\\"");
    format!("\"{escaped}\"")
}
