//! Line-level configuration diffing.

use driftwatch_common::{ConfigStore, PollError, PollResult};
use std::collections::HashMap;
use std::sync::Arc;

/// Symmetric difference between two configurations.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigDiff {
    /// Lines present in the current configuration but not the archived one.
    pub added: Vec<String>,
    /// Lines present in the archived configuration but not the current one.
    pub deleted: Vec<String>,
}

impl ConfigDiff {
    /// Returns true when the two configurations had identical line multisets.
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.deleted.is_empty()
    }
}

/// Computes the multiset symmetric difference of two configurations.
///
/// Lines are trimmed and blanks discarded; each current line cancels one
/// occurrence of an equal archived line. What survives on the current side is
/// "added", what survives on the archived side is "deleted". This is not a
/// positional diff: reordering unchanged lines reports nothing, only a change
/// in a line's multiplicity does.
pub fn diff(current: &str, archived: &str) -> ConfigDiff {
    let current_lines = significant_lines(current);
    let archived_lines = significant_lines(archived);

    let mut remaining: HashMap<&str, usize> = HashMap::new();
    for line in &archived_lines {
        *remaining.entry(line.as_str()).or_insert(0) += 1;
    }

    let mut added = Vec::new();
    for line in &current_lines {
        match remaining.get_mut(line.as_str()) {
            Some(count) if *count > 0 => *count -= 1,
            _ => added.push(line.clone()),
        }
    }

    let mut deleted = Vec::new();
    for line in &archived_lines {
        if let Some(count) = remaining.get_mut(line.as_str()) {
            if *count > 0 {
                *count -= 1;
                deleted.push(line.clone());
            }
        }
    }

    ConfigDiff { added, deleted }
}

fn significant_lines(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(str::to_string)
        .collect()
}

/// Diffs a device's current configuration against its latest archive.
pub struct ConfigDiffer {
    store: Arc<dyn ConfigStore>,
}

impl ConfigDiffer {
    /// Creates a differ over the given store.
    pub fn new(store: Arc<dyn ConfigStore>) -> Self {
        Self { store }
    }

    /// Computes the diff for a device.
    ///
    /// Fails when the device has no current configuration or no archived
    /// version to compare against.
    pub async fn diff_latest(&self, unique_id: &str) -> PollResult<ConfigDiff> {
        let current = self
            .store
            .get_current(unique_id)
            .await?
            .ok_or_else(|| PollError::parse(format!("no current configuration for {unique_id}")))?;

        let history = self.store.get_archive_history(unique_id).await?;
        let previous = history.first().ok_or_else(|| {
            PollError::parse(format!("no archived configuration for {unique_id}"))
        })?;

        Ok(diff(&current.configuration, &previous.configuration))
    }
}
