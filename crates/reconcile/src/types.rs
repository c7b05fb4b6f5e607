//! Core types for reconciliation runs

use crate::error::EntryError;
use std::time::Duration;

/// What each worker does for its entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Clone, compare against the remote, and update
    #[default]
    Reconcile,
    /// Only report the locally checked-out commit
    Revisions,
}

/// Knobs for a run
#[derive(Debug, Clone)]
pub struct Options {
    /// What workers do
    pub mode: Mode,
    /// Worker threads; 0 means one per entry
    pub jobs: usize,
    /// Carry the branch name in `Ok` and `Updated` outcomes
    pub show_branch: bool,
    /// Extra attempts for clones that fail with network errors
    pub clone_retries: usize,
    /// Delay before the first clone retry, doubled on each further attempt
    pub retry_backoff: Duration,
    /// Ceiling for any single retry delay
    pub max_backoff: Duration,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            mode: Mode::Reconcile,
            jobs: 0,
            show_branch: false,
            clone_retries: 0,
            retry_backoff: Duration::from_secs(2),
            max_backoff: Duration::from_secs(30),
        }
    }
}

impl Options {
    /// Delay before clone retry number `attempt` (0-based), capped at `max_backoff`
    pub fn backoff_for(&self, attempt: usize) -> Duration {
        let factor = u32::try_from(attempt)
            .ok()
            .and_then(|exp| 2_u32.checked_pow(exp))
            .unwrap_or(u32::MAX);
        self.retry_backoff
            .saturating_mul(factor)
            .min(self.max_backoff)
    }
}

/// Terminal state of one entry
#[derive(Debug)]
pub enum Outcome {
    /// The entry was absent and has been cloned
    Cloned,
    /// Local head equals the remote head
    Ok { branch: Option<String> },
    /// Local head differed and has been brought up to date
    Updated { branch: Option<String> },
    /// Checked-out commit (revisions mode)
    Revision { commit: String },
    /// The entry could not be reconciled
    Error(EntryError),
}

impl Outcome {
    /// Verb printed in front of the entry name
    pub fn verb(&self) -> &'static str {
        match self {
            Self::Cloned => "CLONED",
            Self::Ok { .. } => "OK",
            Self::Updated { .. } => "UPDATED",
            Self::Revision { .. } => "REVISION",
            Self::Error(_) => "ERROR",
        }
    }

    /// Check if the outcome is a failure
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }

    /// Branch carried by `Ok`/`Updated`, if requested
    pub fn branch(&self) -> Option<&str> {
        match self {
            Self::Ok { branch } | Self::Updated { branch } => branch.as_deref(),
            _ => None,
        }
    }
}

/// Exactly one of these is produced per input record
#[derive(Debug)]
pub struct Event {
    pub name: String,
    pub outcome: Outcome,
}

/// Everything the collector hands to the caller, in arrival order
#[derive(Debug)]
pub enum Report {
    /// Terminal event of one entry
    Entry(Event),
    /// The sweep removed an unregistered directory
    Deleted(String),
    /// The sweep could not list the install root or remove a directory
    SweepFailed { target: String, error: String },
}

/// Counts of what a run did
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Summary {
    pub cloned: usize,
    pub ok: usize,
    pub updated: usize,
    pub revisions: usize,
    pub errors: usize,
    pub deleted: usize,
    pub sweep_failures: usize,
}

impl Summary {
    /// Add one report to the counts
    pub fn record(&mut self, report: &Report) {
        match report {
            Report::Entry(event) => match event.outcome {
                Outcome::Cloned => self.cloned += 1,
                Outcome::Ok { .. } => self.ok += 1,
                Outcome::Updated { .. } => self.updated += 1,
                Outcome::Revision { .. } => self.revisions += 1,
                Outcome::Error(_) => self.errors += 1,
            },
            Report::Deleted(_) => self.deleted += 1,
            Report::SweepFailed { .. } => self.sweep_failures += 1,
        }
    }

    /// Number of entry events seen
    pub fn entries(&self) -> usize {
        self.cloned + self.ok + self.updated + self.revisions + self.errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_counts_reports() {
        let mut summary = Summary::default();
        summary.record(&Report::Entry(Event {
            name: "a".into(),
            outcome: Outcome::Ok { branch: None },
        }));
        summary.record(&Report::Entry(Event {
            name: "b".into(),
            outcome: Outcome::Error(EntryError::NotInstalled),
        }));
        summary.record(&Report::Deleted("orphan".into()));

        assert_eq!(summary.ok, 1);
        assert_eq!(summary.errors, 1);
        assert_eq!(summary.deleted, 1);
        assert_eq!(summary.entries(), 2);
    }

    #[test]
    fn test_backoff_doubles_up_to_ceiling() {
        let options = Options::default();
        assert_eq!(options.backoff_for(0), Duration::from_secs(2));
        assert_eq!(options.backoff_for(1), Duration::from_secs(4));
        assert_eq!(options.backoff_for(3), Duration::from_secs(16));
        assert_eq!(options.backoff_for(4), Duration::from_secs(30));
        assert_eq!(options.backoff_for(9), Duration::from_secs(30));
    }

    #[test]
    fn test_backoff_large_attempts_do_not_overflow() {
        let options = Options {
            max_backoff: Duration::from_secs(5),
            ..Options::default()
        };
        assert_eq!(options.backoff_for(31), Duration::from_secs(5));
        assert_eq!(options.backoff_for(32), Duration::from_secs(5));
        assert_eq!(options.backoff_for(usize::MAX), Duration::from_secs(5));

        let zero = Options {
            retry_backoff: Duration::ZERO,
            ..Options::default()
        };
        assert_eq!(zero.backoff_for(40), Duration::ZERO);
    }

    #[test]
    fn test_outcome_branch_only_for_ok_and_updated() {
        let ok = Outcome::Ok {
            branch: Some("main".into()),
        };
        assert_eq!(ok.branch(), Some("main"));
        assert_eq!(ok.verb(), "OK");
        assert_eq!(Outcome::Cloned.branch(), None);
        assert!(Outcome::Error(EntryError::NotInstalled).is_error());
    }
}
