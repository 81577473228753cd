//! Source records: issues and their checklist entries
//!
//! An [`Issue`] is a named troubleshooting topic. Its checklist is an ordered
//! list of [`ChecklistEntry`] values, each either a full [`DetailEntry`] or a
//! [`ReferenceEntry`] standing in for another issue's whole tree.

use crate::error::ModelError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lowest accepted priority
pub const MIN_PRIORITY: u8 = 1;

/// Highest accepted priority
pub const MAX_PRIORITY: u8 = 10;

/// Priority used when a record does not specify one
pub const DEFAULT_PRIORITY: u8 = 5;

/// Checked priority in `[1, 10]`; larger is more important
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u8")]
pub struct Priority(u8);

impl Priority {
    /// Create a priority, rejecting values outside `[1, 10]`
    ///
    /// # Errors
    /// Returns [`ModelError::InvalidPriority`] when out of range
    pub fn new(value: i64) -> Result<Self, ModelError> {
        match u8::try_from(value) {
            Ok(v) if (MIN_PRIORITY..=MAX_PRIORITY).contains(&v) => Ok(Self(v)),
            _ => Err(ModelError::InvalidPriority(value)),
        }
    }

    /// Raw value
    #[inline]
    #[must_use]
    pub fn get(self) -> u8 {
        self.0
    }
}

impl Default for Priority {
    fn default() -> Self {
        Self(DEFAULT_PRIORITY)
    }
}

impl TryFrom<i64> for Priority {
    type Error = ModelError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Priority> for u8 {
    fn from(value: Priority) -> Self {
        value.0
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Supporting links attached to a checklist entry
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Links {
    /// Documentation pages
    #[serde(default)]
    pub docs: Vec<String>,
    /// Demo recordings
    #[serde(default)]
    pub demos: Vec<String>,
    /// Helper scripts
    #[serde(default)]
    pub scripts: Vec<String>,
}

impl Links {
    /// True when no link of any kind is present
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.docs.is_empty() && self.demos.is_empty() && self.scripts.is_empty()
    }
}

/// A named troubleshooting topic
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Issue {
    /// Unique name; also the title of the tree root built from it
    pub name: String,
    /// Longer explanation
    pub description: String,
    /// Importance of the issue as a whole
    pub priority: Priority,
    /// Affected version range, if known
    pub version: Option<String>,
    /// Offered as a navigable root
    pub visible: bool,
    /// Record that produced this issue (file stem for loaded records)
    pub source_id: String,
    /// Ordered possible causes
    pub checklist: Vec<ChecklistEntry>,
}

impl Issue {
    /// Create an issue with defaults for everything but the name
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            source_id: name.clone(),
            name,
            description: String::new(),
            priority: Priority::default(),
            version: None,
            visible: false,
            checklist: Vec::new(),
        }
    }

    /// With description
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// With priority
    #[must_use]
    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    /// With version tag
    #[must_use]
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    /// With visibility flag
    #[must_use]
    pub fn with_visible(mut self, visible: bool) -> Self {
        self.visible = visible;
        self
    }

    /// With source record id
    #[must_use]
    pub fn with_source(mut self, source_id: impl Into<String>) -> Self {
        self.source_id = source_id.into();
        self
    }

    /// Append a checklist entry
    #[must_use]
    pub fn with_entry(mut self, entry: impl Into<ChecklistEntry>) -> Self {
        self.checklist.push(entry.into());
        self
    }

    /// Top-level entries sorted by priority, highest first, stable on ties
    #[must_use]
    pub fn checklist_by_priority(&self) -> Vec<&ChecklistEntry> {
        let mut entries: Vec<_> = self.checklist.iter().collect();
        entries.sort_by(|a, b| b.priority().cmp(&a.priority()));
        entries
    }

    /// Check record-level invariants
    ///
    /// # Errors
    /// Returns the first violated invariant
    pub fn validate(&self) -> Result<(), ModelError> {
        if self.name.trim().is_empty() {
            return Err(ModelError::EmptyTitle {
                context: format!("issue from '{}'", self.source_id),
            });
        }
        for entry in &self.checklist {
            entry.validate(&self.name)?;
        }
        Ok(())
    }
}

/// One possible cause under an issue
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChecklistEntry {
    /// Full entry with its own remedy and optional nested entries
    Detail(DetailEntry),
    /// Inline the referenced issue's entire tree here
    Reference(ReferenceEntry),
}

impl ChecklistEntry {
    /// Priority used for ordering among siblings
    ///
    /// Reference entries without an override sort with the default priority;
    /// the expansion node itself takes the referenced issue's priority.
    #[must_use]
    pub fn priority(&self) -> Priority {
        match self {
            Self::Detail(d) => d.priority,
            Self::Reference(r) => r.priority.unwrap_or_default(),
        }
    }

    /// Validate this entry and every nested entry
    ///
    /// # Errors
    /// Returns the first violated invariant
    pub fn validate(&self, issue: &str) -> Result<(), ModelError> {
        match self {
            Self::Detail(d) => {
                if d.title.trim().is_empty() {
                    return Err(ModelError::EmptyTitle {
                        context: format!("checklist entry in '{issue}'"),
                    });
                }
                d.children.iter().try_for_each(|c| c.validate(issue))
            }
            Self::Reference(r) => {
                if r.issue.trim().is_empty() {
                    return Err(ModelError::EmptyReference {
                        issue: issue.to_string(),
                    });
                }
                Ok(())
            }
        }
    }
}

impl From<DetailEntry> for ChecklistEntry {
    fn from(value: DetailEntry) -> Self {
        Self::Detail(value)
    }
}

impl From<ReferenceEntry> for ChecklistEntry {
    fn from(value: ReferenceEntry) -> Self {
        Self::Reference(value)
    }
}

/// Leaf or branch checklist entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailEntry {
    /// Observable symptom; unique among siblings
    pub title: String,
    /// How to confirm the cause
    pub description: String,
    /// Importance among siblings
    pub priority: Priority,
    /// Affected version range
    pub version: Option<String>,
    /// Fix to apply once confirmed, possibly empty
    pub remedy: String,
    /// Supporting links
    pub links: Links,
    /// Nested entries
    pub children: Vec<ChecklistEntry>,
}

impl DetailEntry {
    /// Create an entry with the given title and defaults elsewhere
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: String::new(),
            priority: Priority::default(),
            version: None,
            remedy: String::new(),
            links: Links::default(),
            children: Vec::new(),
        }
    }

    /// With description
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// With priority
    #[must_use]
    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    /// With version tag
    #[must_use]
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    /// With remedy text
    #[must_use]
    pub fn with_remedy(mut self, remedy: impl Into<String>) -> Self {
        self.remedy = remedy.into();
        self
    }

    /// With links
    #[must_use]
    pub fn with_links(mut self, links: Links) -> Self {
        self.links = links;
        self
    }

    /// Append a nested entry
    #[must_use]
    pub fn with_child(mut self, child: impl Into<ChecklistEntry>) -> Self {
        self.children.push(child.into());
        self
    }
}

/// Reference to another issue, optionally overriding how it is shown
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceEntry {
    /// Name of the referenced issue
    pub issue: String,
    /// Priority override for the expansion node
    pub priority: Option<Priority>,
    /// Version override for the expansion node
    pub version: Option<String>,
}

impl ReferenceEntry {
    /// Reference without overrides
    #[must_use]
    pub fn new(issue: impl Into<String>) -> Self {
        Self {
            issue: issue.into(),
            priority: None,
            version: None,
        }
    }

    /// With priority override
    #[must_use]
    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = Some(priority);
        self
    }

    /// With version override
    #[must_use]
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(v: i64) -> Priority {
        Priority::new(v).unwrap()
    }

    #[test]
    fn priority_range_is_enforced() {
        assert!(Priority::new(1).is_ok());
        assert!(Priority::new(10).is_ok());
        assert!(matches!(Priority::new(0), Err(ModelError::InvalidPriority(0))));
        assert!(matches!(Priority::new(11), Err(ModelError::InvalidPriority(11))));
        assert!(matches!(Priority::new(-3), Err(ModelError::InvalidPriority(-3))));
    }

    #[test]
    fn checklist_by_priority_is_stable() {
        let issue = Issue::new("A")
            .with_entry(DetailEntry::new("low").with_priority(p(2)))
            .with_entry(DetailEntry::new("high-1").with_priority(p(9)))
            .with_entry(DetailEntry::new("high-2").with_priority(p(9)));

        let titles: Vec<_> = issue
            .checklist_by_priority()
            .into_iter()
            .map(|e| match e {
                ChecklistEntry::Detail(d) => d.title.as_str(),
                ChecklistEntry::Reference(r) => r.issue.as_str(),
            })
            .collect();
        assert_eq!(titles, vec!["high-1", "high-2", "low"]);
    }

    #[test]
    fn validate_rejects_blank_titles() {
        let issue = Issue::new("A").with_entry(
            DetailEntry::new("parent").with_child(DetailEntry::new("  ")),
        );
        assert!(matches!(issue.validate(), Err(ModelError::EmptyTitle { .. })));

        let issue = Issue::new("A").with_entry(ReferenceEntry::new(""));
        assert!(matches!(issue.validate(), Err(ModelError::EmptyReference { .. })));

        assert!(matches!(Issue::new(" ").validate(), Err(ModelError::EmptyTitle { .. })));
    }

    #[test]
    fn reference_priority_defaults_when_not_overridden() {
        let plain = ChecklistEntry::from(ReferenceEntry::new("B"));
        let overridden = ChecklistEntry::from(ReferenceEntry::new("B").with_priority(p(8)));
        assert_eq!(plain.priority(), Priority::default());
        assert_eq!(overridden.priority().get(), 8);
    }
}
