//! Parsing and selection of `git ls-remote` output.
//!
//! A listing is turned into typed `(commit, ref)` pairs. Selecting the head
//! for a branch has two distinct failure modes: the listing was empty (the
//! remote has no such branch, often because its primary branch was renamed),
//! or it was non-empty but nothing matched the exact ref asked for.

use thiserror::Error;

/// One line of `ls-remote` output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteRef {
    /// Object id the ref points at
    pub commit: String,
    /// Full ref name, e.g. `refs/heads/main`
    pub name: String,
}

/// Which ref namespace `ls-remote` should list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefKind {
    /// Branches only (`--heads`)
    Heads,
    /// All refs without peeled tags (`--refs`)
    Refs,
}

impl RefKind {
    /// The `ls-remote` flag for this namespace.
    pub fn flag(self) -> &'static str {
        match self {
            Self::Heads => "--heads",
            Self::Refs => "--refs",
        }
    }
}

/// How to choose among the lines of a listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefSelector<'a> {
    /// The line whose ref name equals this exactly
    Exact(&'a str),
    /// The first line, whatever it is
    First,
}

/// Failure to find the remote head for a branch.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolutionError {
    /// The remote listed nothing for the branch
    #[error("no remote heads found for '{branch}' (possible change of primary branch?)")]
    NoRemoteHeads {
        /// Branch or tag that was looked up
        branch: String,
    },

    /// The remote listed refs, but none matched exactly
    #[error("failed to find remote head {wanted} among {candidates} listed refs")]
    NoExactMatch {
        /// Full ref name that was wanted
        wanted: String,
        /// Number of refs that were listed
        candidates: usize,
    },
}

/// Parse `ls-remote` output.
///
/// Blank lines and lines without both a commit and a ref name are skipped.
pub fn parse_ls_remote(output: &str) -> Vec<RemoteRef> {
    output
        .lines()
        .filter_map(|line| {
            let mut fields = line.split_whitespace();
            let commit = fields.next()?;
            let name = fields.next()?;
            Some(RemoteRef {
                commit: commit.to_string(),
                name: name.to_string(),
            })
        })
        .collect()
}

/// Pick the ref for `branch` from a parsed listing.
pub fn select<'r>(
    refs: &'r [RemoteRef],
    branch: &str,
    selector: RefSelector<'_>,
) -> Result<&'r RemoteRef, ResolutionError> {
    if refs.is_empty() {
        return Err(ResolutionError::NoRemoteHeads {
            branch: branch.to_string(),
        });
    }

    match selector {
        RefSelector::First => Ok(&refs[0]),
        RefSelector::Exact(wanted) => {
            refs.iter()
                .find(|r| r.name == wanted)
                .ok_or_else(|| ResolutionError::NoExactMatch {
                    wanted: wanted.to_string(),
                    candidates: refs.len(),
                })
        }
    }
}

/// Final component of a ref name: `refs/heads/feature/x` → `x`.
pub fn branch_leaf(symref: &str) -> &str {
    symref.rsplit('/').next().unwrap_or(symref)
}
