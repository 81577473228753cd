//! Title addresses for nodes within a presentation tree
//!
//! Provides [`Address`], the stable identity of a node: the ordered titles
//! from the tree root down to the node.

use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

/// Separator used when an address is rendered as a single string
pub const ADDRESS_SEPARATOR: &str = " → ";

/// Address of a node within a resolved tree
///
/// The first segment is always the root title. A child's address is its
/// parent's address plus its own title.
///
/// # Examples
/// - `["Disk full"]` → the root node
/// - `["Disk full", "Log rotation disabled"]` → a direct child
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Address(Vec<String>);

impl Address {
    /// Create new address from segments
    #[inline]
    #[must_use]
    pub fn new(segments: Vec<String>) -> Self {
        Self(segments)
    }

    /// Address of a tree root
    #[inline]
    #[must_use]
    pub fn root(title: impl Into<String>) -> Self {
        Self(vec![title.into()])
    }

    /// Get address segments
    #[inline]
    #[must_use]
    pub fn segments(&self) -> &[String] {
        &self.0
    }

    /// Get number of segments
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if address has no segments
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// True when the address names a tree root
    #[inline]
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.0.len() == 1
    }

    /// Get parent address (if there is one above the root)
    #[inline]
    #[must_use]
    pub fn parent(&self) -> Option<Self> {
        if self.0.len() <= 1 {
            None
        } else {
            Some(Self(self.0[..self.0.len() - 1].to_vec()))
        }
    }

    /// Title of the addressed node
    #[inline]
    #[must_use]
    pub fn last(&self) -> Option<&str> {
        self.0.last().map(String::as_str)
    }

    /// Title of the tree root
    #[inline]
    #[must_use]
    pub fn first(&self) -> Option<&str> {
        self.0.first().map(String::as_str)
    }

    /// Append a title, returning the child address
    #[inline]
    #[must_use]
    pub fn child(&self, title: impl Into<String>) -> Self {
        let mut new = self.clone();
        new.0.push(title.into());
        new
    }

    /// Check if this address is a prefix of another
    #[inline]
    #[must_use]
    pub fn is_prefix_of(&self, other: &Self) -> bool {
        if self.0.len() > other.0.len() {
            return false;
        }
        self.0 == other.0[..self.0.len()]
    }

    /// Check if this address is a strict ancestor of another
    #[inline]
    #[must_use]
    pub fn is_ancestor_of(&self, other: &Self) -> bool {
        self.0.len() < other.0.len() && self.is_prefix_of(other)
    }

    /// Every prefix from the root down to (and including) this address
    #[must_use]
    pub fn prefixes(&self) -> Vec<Self> {
        (1..=self.0.len()).map(|n| Self(self.0[..n].to_vec())).collect()
    }

    /// Iterator over segments from root to node
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    /// Join segments with custom separator
    #[inline]
    #[must_use]
    pub fn join(&self, separator: &str) -> String {
        self.0.join(separator)
    }
}

impl Display for Address {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.join(ADDRESS_SEPARATOR))
    }
}

impl FromStr for Address {
    type Err = PathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().is_empty() {
            return Err(PathError::Empty);
        }

        let segments: Vec<String> = s
            .split(ADDRESS_SEPARATOR)
            .map(|seg| {
                if seg.trim().is_empty() {
                    Err(PathError::EmptySegment)
                } else {
                    Ok(seg.to_string())
                }
            })
            .collect::<Result<_, _>>()?;

        Ok(Self(segments))
    }
}

impl From<Vec<String>> for Address {
    fn from(segments: Vec<String>) -> Self {
        Self(segments)
    }
}

impl From<&[String]> for Address {
    fn from(segments: &[String]) -> Self {
        Self(segments.to_vec())
    }
}

impl From<&[&str]> for Address {
    fn from(segments: &[&str]) -> Self {
        Self(segments.iter().map(|s| (*s).to_string()).collect())
    }
}

impl<const N: usize> From<[&str; N]> for Address {
    fn from(segments: [&str; N]) -> Self {
        Self(segments.iter().map(|s| (*s).to_string()).collect())
    }
}

/// Errors related to addresses
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PathError {
    /// Address string was blank
    #[error("address is empty")]
    Empty,

    /// Blank title between separators
    #[error("address contains empty segment")]
    EmptySegment,
}
