//! Bundle identity.
//!
//! A [`BundleRef`] is the `(name, namespace)` pair that identifies one bundle.
//! It is the unit of nodes and edges in the accumulated dependency state kept
//! by [`AssetRegistry`](crate::registry::AssetRegistry).

use serde::Serialize;
use std::fmt;

/// Identity of a bundle inside a namespace.
///
/// Two refs are equal iff both the bundle name and the namespace match, so the
/// same logical name configured under `scripts` and `templates` yields two
/// distinct refs.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct BundleRef {
    /// Bundle name as configured in the namespace's bundle table.
    pub name: String,
    /// Namespace the bundle lives in.
    pub namespace: String,
}

impl BundleRef {
    /// Create a ref from a bundle name and its namespace.
    pub fn new(name: impl Into<String>, namespace: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            namespace: namespace.into(),
        }
    }

    /// Whether this ref lives in `namespace`.
    pub fn is_in(&self, namespace: &str) -> bool {
        self.namespace == namespace
    }
}

impl fmt::Display for BundleRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.namespace, self.name)
    }
}

impl From<(&str, &str)> for BundleRef {
    fn from((name, namespace): (&str, &str)) -> Self {
        Self::new(name, namespace)
    }
}
