//! Fully qualified structural element names.

use std::fmt;

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Serialize, Serializer};
use thiserror::Error;

/// A PHP label: ASCII letters, digits and underscores plus any non-ASCII
/// character, not starting with a digit.
pub(crate) const LABEL: &str = r"[A-Za-z_\x{80}-\x{10FFFF}][A-Za-z0-9_\x{80}-\x{10FFFF}]*";

lazy_static! {
    /// `\`, `\A\B`, `\A\foo()`, `\A\Foo::bar()`, `\A\Foo::$bar`, `\A\Foo::BAR`.
    static ref FQSEN_PATTERN: Regex = Regex::new(&format!(
        r"^\\(?:{label}(?:\\{label})*)?(?:::\$?{label})?(?:\(\))?$",
        label = LABEL
    ))
    .expect("FQSEN pattern is valid");
}

/// Raised when a string is not a well-formed FQSEN.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("\"{0}\" is not a valid fully qualified structural element name")]
pub struct FqsenError(pub String);

/// Immutable identifier naming a declaration within a project.
///
/// Two values are equal only if their strings are byte-for-byte equal;
/// no case folding or other normalisation takes place.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Fqsen(String);

impl Fqsen {
    /// Validate and wrap a fully qualified name.
    pub fn new(value: impl Into<String>) -> Result<Self, FqsenError> {
        let value = value.into();
        if !FQSEN_PATTERN.is_match(&value) {
            return Err(FqsenError(value));
        }
        Ok(Self(value))
    }

    /// The global namespace, `\`.
    pub fn root() -> Self {
        Self("\\".to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_root(&self) -> bool {
        self.0 == "\\"
    }

    /// The unqualified name of the element, without `()` or `$`.
    ///
    /// `\A\Foo::bar()` yields `bar`, `\A\Foo` yields `Foo`, `\` yields an
    /// empty string.
    pub fn name(&self) -> &str {
        let trimmed = self.0.strip_suffix("()").unwrap_or(&self.0);
        let tail = match trimmed.rfind("::") {
            Some(idx) => &trimmed[idx + 2..],
            None => trimmed.rsplit('\\').next().unwrap_or(""),
        };
        tail.strip_prefix('$').unwrap_or(tail)
    }

    /// Name of an element declared inside this namespace.
    pub fn child(&self, name: &str) -> Result<Self, FqsenError> {
        let name = name.trim_start_matches('\\');
        if self.is_root() {
            Self::new(format!("\\{}", name))
        } else {
            Self::new(format!("{}\\{}", self.0, name))
        }
    }

    /// Name of a member of this class-like element (`separator` is already
    /// included in `member`, e.g. `bar()` or `$bar`).
    pub fn member(&self, member: &str) -> Result<Self, FqsenError> {
        Self::new(format!("{}::{}", self.0, member))
    }
}

impl fmt::Display for Fqsen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Fqsen {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<&str> for Fqsen {
    type Error = FqsenError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl Serialize for Fqsen {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_element_forms() {
        for value in [
            "\\",
            "\\mySpace",
            "\\My\\Space\\Foo",
            "\\myFunction()",
            "\\A\\Foo::bar()",
            "\\A\\Foo::$bar",
            "\\A\\Foo::BAR",
            "\\Straße\\Größe",
            "\\Währung\\€uro::$betrag€",
        ] {
            assert!(Fqsen::new(value).is_ok(), "expected {} to be valid", value);
        }
    }

    #[test]
    fn test_rejects_malformed() {
        for value in ["", "Foo", "\\Foo\\", "\\1abc", "\\Foo::", "\\Foo bar", "\\Foo-bar"] {
            assert!(Fqsen::new(value).is_err(), "expected {} to be invalid", value);
        }
    }

    #[test]
    fn test_name() {
        assert_eq!(Fqsen::new("\\A\\Foo").unwrap().name(), "Foo");
        assert_eq!(Fqsen::new("\\A\\foo()").unwrap().name(), "foo");
        assert_eq!(Fqsen::new("\\A\\Foo::bar()").unwrap().name(), "bar");
        assert_eq!(Fqsen::new("\\A\\Foo::$bar").unwrap().name(), "bar");
        assert_eq!(Fqsen::root().name(), "");
    }

    #[test]
    fn test_child_and_member() {
        let root = Fqsen::root();
        assert_eq!(root.child("Foo").unwrap().as_str(), "\\Foo");

        let ns = Fqsen::new("\\My\\Space").unwrap();
        let class = ns.child("Foo").unwrap();
        assert_eq!(class.as_str(), "\\My\\Space\\Foo");
        assert_eq!(class.member("bar()").unwrap().as_str(), "\\My\\Space\\Foo::bar()");
        assert!(ns.child("not valid").is_err());
    }

    #[test]
    fn test_equality_is_exact() {
        let lower = Fqsen::new("\\foo").unwrap();
        let upper = Fqsen::new("\\Foo").unwrap();
        assert_ne!(lower, upper);
    }
}
