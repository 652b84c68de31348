use std::fmt;
use std::ops::Deref;

use nanoid::nanoid;
use serde::Deserialize;
use serde::Serialize;

/// Opaque version token attached to a section or collection item.
///
/// Tokens carry no ordering; they are only compared for equality. A fresh
/// token is generated for every successful mutation of the owning
/// section/item.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Version(String);

impl Version {
    /// Generates a new random token
    pub fn generate() -> Self {
        Version(nanoid!())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Version {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Version {
    fn from(s: &str) -> Self {
        Version(s.to_string())
    }
}

impl From<String> for Version {
    fn from(s: String) -> Self {
        Version(s)
    }
}

impl PartialEq<str> for Version {
    fn eq(
        &self,
        other: &str,
    ) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for Version {
    fn eq(
        &self,
        other: &&str,
    ) -> bool {
        self.0 == *other
    }
}

/// A value stamped with the version token of its last successful write.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Versioned<T> {
    pub version: Version,
    #[serde(flatten)]
    pub value: T,
}

impl<T> Versioned<T> {
    /// Wraps `value` under a freshly generated version
    pub fn new(value: T) -> Self {
        Self {
            version: Version::generate(),
            value,
        }
    }

    pub fn with_version(
        value: T,
        version: Version,
    ) -> Self {
        Self { version, value }
    }

    pub fn version(&self) -> &Version {
        &self.version
    }

    pub fn into_inner(self) -> T {
        self.value
    }
}

impl<T> Deref for Versioned<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.value
    }
}

impl<T: Default> Default for Versioned<T> {
    fn default() -> Self {
        Versioned::new(T::default())
    }
}
