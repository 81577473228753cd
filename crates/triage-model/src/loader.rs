//! YAML record loader
//!
//! One issue per file. Checklist entries holding a `refer` key become
//! [`ReferenceEntry`] values; everything else must carry a `status` title.
//!
//! ```yaml
//! status: Disk full
//! describe: Node reports no space left
//! priority: 7
//! display: true
//! checklist:
//!   - status: Log rotation disabled
//!     describe: Check logrotate config
//!     priority: 8
//!     todo: Re-enable logrotate
//!   - refer: Inode exhaustion
//! ```

use crate::error::{ModelError, ModelResult};
use crate::issue::{ChecklistEntry, DetailEntry, Issue, Links, Priority, ReferenceEntry};
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize)]
struct RawIssue {
    status: Option<String>,
    #[serde(default)]
    describe: Option<String>,
    #[serde(default)]
    priority: Option<i64>,
    #[serde(default)]
    version: Option<String>,
    #[serde(default)]
    display: Option<bool>,
    #[serde(default)]
    checklist: Vec<RawEntry>,
}

#[derive(Debug, Deserialize)]
struct RawEntry {
    #[serde(default)]
    refer: Option<String>,
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    describe: Option<String>,
    #[serde(default)]
    priority: Option<i64>,
    #[serde(default)]
    version: Option<String>,
    #[serde(default)]
    todo: Option<String>,
    #[serde(default)]
    wiki_links: Vec<String>,
    #[serde(default)]
    gif_links: Vec<String>,
    #[serde(default)]
    script_links: Vec<String>,
    #[serde(default)]
    checklist: Vec<RawEntry>,
}

fn priority_or_default(value: Option<i64>) -> ModelResult<Priority> {
    value.map_or_else(|| Ok(Priority::default()), Priority::new)
}

fn convert_entry(raw: RawEntry, source_id: &str) -> ModelResult<ChecklistEntry> {
    if let Some(issue) = raw.refer {
        return Ok(ChecklistEntry::Reference(ReferenceEntry {
            issue,
            priority: raw.priority.map(Priority::new).transpose()?,
            version: raw.version,
        }));
    }

    let title = raw.status.ok_or_else(|| ModelError::MissingField {
        field: "status",
        context: format!("checklist entry in {source_id}"),
    })?;

    let children = raw
        .checklist
        .into_iter()
        .map(|child| convert_entry(child, source_id))
        .collect::<ModelResult<Vec<_>>>()?;

    Ok(ChecklistEntry::Detail(DetailEntry {
        title,
        description: raw.describe.unwrap_or_default(),
        priority: priority_or_default(raw.priority)?,
        version: raw.version,
        remedy: raw.todo.unwrap_or_default(),
        links: Links {
            docs: raw.wiki_links,
            demos: raw.gif_links,
            scripts: raw.script_links,
        },
        children,
    }))
}

/// Parse a single issue record
///
/// `source_id` becomes the issue's source record id.
///
/// # Errors
/// Returns an error for malformed YAML, a missing `status`, an out-of-range
/// priority or a blank title
pub fn parse_issue(source_id: &str, yaml: &str) -> ModelResult<Issue> {
    let raw: RawIssue =
        serde_yaml::from_str(yaml).map_err(|e| ModelError::yaml_error(source_id, e))?;

    let name = raw.status.ok_or_else(|| ModelError::MissingField {
        field: "status",
        context: source_id.to_string(),
    })?;

    let checklist = raw
        .checklist
        .into_iter()
        .map(|entry| convert_entry(entry, source_id))
        .collect::<ModelResult<Vec<_>>>()?;

    let issue = Issue {
        name,
        description: raw.describe.unwrap_or_default(),
        priority: priority_or_default(raw.priority)?,
        version: raw.version,
        visible: raw.display.unwrap_or(false),
        source_id: source_id.to_string(),
        checklist,
    };
    issue.validate()?;
    Ok(issue)
}

/// Record that could not be loaded
#[derive(Debug)]
pub struct LoadFailure {
    /// File that failed
    pub path: PathBuf,
    /// Why it failed
    pub error: ModelError,
}

/// Outcome of loading a directory
#[derive(Debug, Default)]
pub struct LoadReport {
    /// Successfully parsed issues, in file-name order
    pub issues: Vec<Issue>,
    /// Files that were skipped
    pub failures: Vec<LoadFailure>,
}

impl LoadReport {
    /// Whether every file loaded
    #[inline]
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

fn is_record_file(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("yml" | "yaml")
    )
}

/// Load every `*.yml` / `*.yaml` file in `dir`
///
/// A bad file is reported in [`LoadReport::failures`] and does not stop
/// the rest of the load.
///
/// # Errors
/// Returns an error only when the directory itself cannot be read
pub fn load_dir(dir: impl AsRef<Path>) -> ModelResult<LoadReport> {
    let dir = dir.as_ref();
    let entries = std::fs::read_dir(dir).map_err(|e| ModelError::io_error(dir, e))?;

    let mut files = Vec::new();
    for entry in entries {
        let path = entry.map_err(|e| ModelError::io_error(dir, e))?.path();
        if path.is_file() && is_record_file(&path) {
            files.push(path);
        }
    }
    files.sort();

    let mut report = LoadReport::default();
    for path in files {
        let source_id = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or_default()
            .to_string();

        let result = std::fs::read_to_string(&path)
            .map_err(|e| ModelError::io_error(&path, e))
            .and_then(|text| parse_issue(&source_id, &text));

        match result {
            Ok(issue) => {
                tracing::debug!(file = %path.display(), issue = %issue.name, "loaded issue");
                report.issues.push(issue);
            }
            Err(error) => {
                tracing::warn!(file = %path.display(), %error, "skipping issue record");
                report.failures.push(LoadFailure { path, error });
            }
        }
    }

    tracing::info!(
        loaded = report.issues.len(),
        failed = report.failures.len(),
        dir = %dir.display(),
        "loaded issue records"
    );
    Ok(report)
}
