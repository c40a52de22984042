//! Change classification between two revisions.
//!
//! A raw `--name-status` diff is resolved into a [`ChangeSet`]: at most one
//! [`DirChange`] per directory, keyed by the changed path's parent directory.
//! Root-level files are deliberately excluded — reconciliation targets
//! subdirectories, one deployable unit per directory.

use std::collections::btree_map::Entry;
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

use crate::error::DiffError;

// ---------------------------------------------------------------------------
// ChangeStatus
// ---------------------------------------------------------------------------

/// What kind of change a path underwent between two revisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChangeStatus {
    Added,
    Modified,
    Deleted,
    Renamed,
    Copied,
    Unchanged,
}

impl ChangeStatus {
    /// Parse a name-status code.
    ///
    /// Rename and copy records may carry a similarity score (`R100`, `C75`);
    /// the score is accepted and ignored. Anything else is unknown.
    pub fn from_code(code: &str) -> Option<Self> {
        let mut chars = code.chars();
        let status = match chars.next()? {
            'A' => Self::Added,
            'M' => Self::Modified,
            'D' => Self::Deleted,
            'R' => Self::Renamed,
            'C' => Self::Copied,
            ' ' => Self::Unchanged,
            _ => return None,
        };
        let rest = chars.as_str();
        match status {
            Self::Renamed | Self::Copied if rest.chars().all(|c| c.is_ascii_digit()) => {
                Some(status)
            }
            _ if rest.is_empty() => Some(status),
            _ => None,
        }
    }

    /// Merge precedence when one directory accumulates several statuses.
    ///
    /// A deletion anywhere under a directory outranks additions, which
    /// outrank modifications; rename/copy records rank below all of them.
    fn merge_priority(self) -> u8 {
        match self {
            Self::Deleted => 5,
            Self::Added => 4,
            Self::Modified => 3,
            Self::Renamed => 2,
            Self::Copied => 1,
            Self::Unchanged => 0,
        }
    }
}

impl fmt::Display for ChangeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Added => "added",
            Self::Modified => "modified",
            Self::Deleted => "deleted",
            Self::Renamed => "renamed",
            Self::Copied => "copied",
            Self::Unchanged => "unchanged",
        };
        f.write_str(name)
    }
}

// ---------------------------------------------------------------------------
// DirChange / ChangeSet
// ---------------------------------------------------------------------------

/// A change event: some path under `dir` changed with the given status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirChange {
    /// Directory path, relative to the repository root.
    pub dir: PathBuf,
    pub status: ChangeStatus,
}

/// Per-directory bookkeeping inside a [`ChangeSet`].
///
/// `status` is the priority-merged status that drives the service action.
/// `saw_update` remembers whether any added/modified record was folded in:
/// a directory whose merged status is `Deleted` may still contain modified
/// manifests (the deletion hit another file), and those must keep feeding
/// image prefetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct DirRecord {
    status: ChangeStatus,
    saw_update: bool,
}

/// The deduplicated change events of one reconciliation cycle.
///
/// Backed by an ordered map from directory to status, so iteration (and
/// therefore every downstream image pull and service action) is in
/// lexicographic directory order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeSet(BTreeMap<PathBuf, DirRecord>);

impl ChangeSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve raw `<code>\t<path>` diff lines into a change set.
    ///
    /// Blank lines are ignored. A line without a tab separator is logged and
    /// skipped. An unrecognized status code fails the whole resolution: the
    /// diff producer broke its format contract. Empty input is a valid
    /// "no changes" result.
    pub fn from_name_status(raw: &str) -> Result<Self, DiffError> {
        let mut set = Self::new();

        for line in raw.lines() {
            if line.trim().is_empty() {
                continue;
            }

            let Some((code, path_field)) = line.split_once('\t') else {
                log::warn!("unexpected diff output format: {line:?}, ignoring");
                continue;
            };

            let status =
                ChangeStatus::from_code(code).ok_or_else(|| DiffError::UnknownStatus {
                    code: code.to_string(),
                    path: path_field.trim().to_string(),
                })?;

            // Rename/copy records carry `old<TAB>new`; the destination path
            // is the one that exists at the new head.
            let path = path_field.rsplit('\t').next().unwrap_or(path_field).trim();

            let Some(dir) = parent_dir(Path::new(path)) else {
                continue;
            };

            set.record(dir, status);
        }

        Ok(set)
    }

    /// Record one change, merging by status priority when the directory is
    /// already present.
    pub fn record(&mut self, dir: PathBuf, status: ChangeStatus) {
        let saw_update = matches!(status, ChangeStatus::Added | ChangeStatus::Modified);
        match self.0.entry(dir) {
            Entry::Vacant(slot) => {
                slot.insert(DirRecord { status, saw_update });
            }
            Entry::Occupied(mut slot) => {
                let record = slot.get_mut();
                if status.merge_priority() > record.status.merge_priority() {
                    record.status = status;
                }
                record.saw_update |= saw_update;
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn status_of(&self, dir: &Path) -> Option<ChangeStatus> {
        self.0.get(dir).map(|record| record.status)
    }

    /// Change events in lexicographic directory order.
    pub fn iter(&self) -> impl Iterator<Item = DirChange> + '_ {
        self.0.iter().map(|(dir, record)| DirChange {
            dir: dir.clone(),
            status: record.status,
        })
    }

    /// Directories that saw at least one addition or modification, in
    /// lexicographic order. These are the directories whose manifests feed
    /// image prefetch — independent of the merged status, so a directory
    /// that also lost a file keeps prefetching what its manifests declare.
    pub fn updated_dirs(&self) -> impl Iterator<Item = &Path> {
        self.0
            .iter()
            .filter(|(_, record)| record.saw_update)
            .map(|(dir, _)| dir.as_path())
    }
}

/// Parent directory of a changed path, or `None` for root-level files.
fn parent_dir(path: &Path) -> Option<PathBuf> {
    let parent = path.parent()?;
    if parent.as_os_str().is_empty() {
        return None;
    }
    Some(parent.to_path_buf())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_diff_is_a_valid_empty_change_set() {
        let set = ChangeSet::from_name_status("").expect("resolve");
        assert!(set.is_empty());

        let blank = ChangeSet::from_name_status("\n   \n").expect("resolve");
        assert!(blank.is_empty());
    }

    #[test]
    fn changed_path_maps_to_parent_directory() {
        let set = ChangeSet::from_name_status("M\tfoo/bar.yaml").expect("resolve");
        assert_eq!(set.len(), 1);
        assert_eq!(
            set.status_of(Path::new("foo")),
            Some(ChangeStatus::Modified)
        );
    }

    #[test]
    fn nested_path_maps_to_immediate_parent() {
        let set = ChangeSet::from_name_status("A\tapps/web/deploy.yaml").expect("resolve");
        assert_eq!(
            set.status_of(Path::new("apps/web")),
            Some(ChangeStatus::Added)
        );
    }

    #[test]
    fn root_level_files_are_excluded() {
        let set = ChangeSet::from_name_status("A\troot.yaml").expect("resolve");
        assert!(set.is_empty());
    }

    #[test]
    fn unknown_status_code_fails_the_whole_resolution() {
        let err = ChangeSet::from_name_status("M\tfoo/a.yaml\nX\tfoo/bar.yaml")
            .expect_err("must fail");
        let DiffError::UnknownStatus { code, path } = err;
        assert_eq!(code, "X");
        assert_eq!(path, "foo/bar.yaml");
    }

    #[test]
    fn malformed_line_is_skipped_not_fatal() {
        let set = ChangeSet::from_name_status("garbage without tab\nM\tsvc/app.yaml")
            .expect("resolve");
        assert_eq!(set.len(), 1);
        assert_eq!(set.status_of(Path::new("svc")), Some(ChangeStatus::Modified));
    }

    #[test]
    fn multiple_files_in_one_directory_collapse_to_one_event() {
        let set = ChangeSet::from_name_status("M\tsvc/a.yaml\nM\tsvc/b.yaml").expect("resolve");
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn same_directory_statuses_merge_by_priority() {
        // Deletion outranks modification regardless of line order.
        let forward = ChangeSet::from_name_status("M\tsvc/deploy.yaml\nD\tsvc/app.kube")
            .expect("resolve");
        assert_eq!(forward.status_of(Path::new("svc")), Some(ChangeStatus::Deleted));

        let reversed = ChangeSet::from_name_status("D\tsvc/app.kube\nM\tsvc/deploy.yaml")
            .expect("resolve");
        assert_eq!(forward, reversed);
    }

    #[test]
    fn addition_outranks_modification_but_not_deletion() {
        let set = ChangeSet::from_name_status("M\tsvc/a.yaml\nA\tsvc/b.yaml").expect("resolve");
        assert_eq!(set.status_of(Path::new("svc")), Some(ChangeStatus::Added));

        let set = ChangeSet::from_name_status("A\tsvc/b.yaml\nD\tsvc/c.yaml").expect("resolve");
        assert_eq!(set.status_of(Path::new("svc")), Some(ChangeStatus::Deleted));
    }

    #[test]
    fn mixed_change_keeps_the_directory_marked_as_updated() {
        // A modified manifest next to a deleted file: the merged status is
        // deleted (stop the unit) but the directory still feeds prefetch.
        let set = ChangeSet::from_name_status("M\tsvc/deploy.yaml\nD\tsvc/app.kube")
            .expect("resolve");
        let updated: Vec<_> = set.updated_dirs().collect();
        assert_eq!(updated, vec![Path::new("svc")]);

        let pure_delete = ChangeSet::from_name_status("D\tsvc/app.kube").expect("resolve");
        assert_eq!(pure_delete.updated_dirs().count(), 0);
    }

    #[test]
    fn rename_record_resolves_to_destination_directory() {
        let set = ChangeSet::from_name_status("R100\told/app.kube\tnew/app.kube")
            .expect("resolve");
        assert_eq!(set.status_of(Path::new("new")), Some(ChangeStatus::Renamed));
        assert_eq!(set.status_of(Path::new("old")), None);
    }

    #[test]
    fn copy_score_suffix_is_accepted() {
        let set = ChangeSet::from_name_status("C75\tsvc/a.yaml\tother/a.yaml").expect("resolve");
        assert_eq!(set.status_of(Path::new("other")), Some(ChangeStatus::Copied));
    }

    #[test]
    fn score_suffix_on_plain_statuses_is_rejected() {
        assert!(ChangeStatus::from_code("M100").is_none());
        assert!(ChangeStatus::from_code("").is_none());
        assert_eq!(ChangeStatus::from_code("R"), Some(ChangeStatus::Renamed));
    }

    #[test]
    fn iteration_is_in_directory_order() {
        let set = ChangeSet::from_name_status("M\tzeta/a.yaml\nA\talpha/b.yaml").expect("resolve");
        let dirs: Vec<_> = set.iter().map(|c| c.dir).collect();
        assert_eq!(dirs, vec![PathBuf::from("alpha"), PathBuf::from("zeta")]);
    }
}
