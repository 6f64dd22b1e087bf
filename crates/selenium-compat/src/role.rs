//! Role-specific fallback locators.
//!
//! Legacy keywords such as `Click Button` and `Click Link` search by id, name,
//! value, visible text, and so on when given a bare value. Only the id-or-name
//! fallback produced by the translator is rewritten. Explicit strategies pass
//! through untouched.

use std::fmt;
use std::str::FromStr;

use crate::locator::{is_default_locator, LocatorSpec};
use crate::result::CompatError;

/// Separator between OR'ed XPath alternatives
const ALTERNATIVE_SEPARATOR: &str = " | ";

/// Element roles with a dedicated fallback search
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    /// `<button>` and button-like `<input>`
    Button,
    /// Any `<input>`
    Input,
    /// `<img>`
    Image,
    /// `<a>`
    Link,
    /// `<select>`
    List,
}

impl Role {
    /// Role name as used in keyword names
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Button => "button",
            Self::Input => "input",
            Self::Image => "image",
            Self::Link => "link",
            Self::List => "list",
        }
    }

    /// `(tag, predicate)` pairs in their fixed order; `{}` is the literal slot
    const fn alternatives(&self) -> &'static [(&'static str, &'static str)] {
        match self {
            Self::Button => &[
                ("button", "@id"),
                ("button", "@name"),
                ("button", "@value"),
                ("button", "."),
                ("input", "@id"),
                ("input", "@name"),
                ("input", "@value"),
                ("input", "@src"),
            ],
            Self::Input => &[
                ("input", "@id"),
                ("input", "@name"),
                ("input", "@value"),
                ("input", "@src"),
            ],
            Self::Image => &[
                ("img", "@id"),
                ("img", "@name"),
                ("img", "@src"),
                ("img", "@alt"),
            ],
            Self::Link => &[
                ("a", "@id"),
                ("a", "@name"),
                ("a", "@href"),
                ("a", "normalize-space(descendant-or-self::text())"),
            ],
            Self::List => &[
                ("select", "@id"),
                ("select", "@name"),
                ("select", "@value"),
            ],
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = CompatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "button" => Ok(Self::Button),
            "input" => Ok(Self::Input),
            "image" | "img" => Ok(Self::Image),
            "link" | "a" => Ok(Self::Link),
            "list" | "select" => Ok(Self::List),
            other => Err(CompatError::InvalidArgument {
                message: format!("Unknown element role '{other}'"),
            }),
        }
    }
}

/// Quote a value as an XPath string literal.
///
/// Double quotes are used unless the value contains one; a value holding both
/// quote kinds is spelled with `concat()`.
#[must_use]
pub fn xpath_literal(value: &str) -> String {
    if !value.contains('"') {
        return format!("\"{value}\"");
    }
    if !value.contains('\'') {
        return format!("'{value}'");
    }
    let parts: Vec<String> = value
        .split('"')
        .map(|part| format!("\"{part}\""))
        .collect();
    format!("concat({})", parts.join(", '\"', "))
}

/// Rewrites id-or-name fallback locators into role-specific searches.
#[derive(Debug, Clone, Copy, Default)]
pub struct RoleLocatorResolver;

impl RoleLocatorResolver {
    /// Create a resolver
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Rewrite `spec` for `role`, or return it unchanged when it is not the
    /// id-or-name fallback.
    #[must_use]
    pub fn for_role(&self, spec: &LocatorSpec, role: Role) -> LocatorSpec {
        let Some(value) = is_default_locator(spec.native()) else {
            return spec.clone();
        };
        let literal = xpath_literal(value);
        let alternatives: Vec<String> = role
            .alternatives()
            .iter()
            .map(|(tag, predicate)| format!("//{tag}[{predicate}={literal}]"))
            .collect();
        spec.with_native(format!(
            "xpath={}",
            alternatives.join(ALTERNATIVE_SEPARATOR)
        ))
    }
}
