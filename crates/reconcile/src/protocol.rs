//! The per-entry reconciliation protocol.
//!
//! For one record: clone it if absent, otherwise resolve the branch to
//! compare, fetch local and remote heads, and pull (plus reset when pinned)
//! if they differ. Steps run strictly in sequence; the first failure ends the
//! entry with an `Error` outcome.

use crate::error::EntryError;
use crate::install::InstallDir;
use crate::types::{Options, Outcome};
use gitkit::refs::{self, RefKind, RefSelector};
use gitkit::{Client, ErrorCategory};
use registry::PluginRecord;
use std::path::Path;
use std::thread;

/// Branch, ref namespace and remote used for one comparison
#[derive(Debug, Clone, PartialEq, Eq)]
struct Target {
    branch: String,
    /// Full symbolic ref of the checkout; `None` when pinned
    symref: Option<String>,
    locator: String,
}

impl Target {
    fn kind(&self) -> RefKind {
        if self.symref.is_some() {
            RefKind::Heads
        } else {
            RefKind::Refs
        }
    }

    fn selector(&self) -> RefSelector<'_> {
        match &self.symref {
            Some(symref) => RefSelector::Exact(symref),
            None => RefSelector::First,
        }
    }
}

pub(crate) struct Protocol<'a> {
    client: &'a Client,
    install: &'a dyn InstallDir,
    options: &'a Options,
}

impl<'a> Protocol<'a> {
    pub(crate) fn new(client: &'a Client, install: &'a dyn InstallDir, options: &'a Options) -> Self {
        Self {
            client,
            install,
            options,
        }
    }

    /// Bring one record in line with its remote
    pub(crate) fn reconcile(&self, record: &PluginRecord) -> Outcome {
        self.try_reconcile(record).unwrap_or_else(Outcome::Error)
    }

    /// Report the checked-out commit of one record
    pub(crate) fn revision(&self, record: &PluginRecord) -> Outcome {
        if !self.install.contains(&record.name) {
            return Outcome::Error(EntryError::NotInstalled);
        }
        let dir = self.install.path_of(&record.name);
        match self.client.rev_parse_head(&dir) {
            Ok(commit) => Outcome::Revision { commit },
            Err(e) => Outcome::Error(e.into()),
        }
    }

    fn try_reconcile(&self, record: &PluginRecord) -> Result<Outcome, EntryError> {
        if !self.install.contains(&record.name) {
            self.clone_fresh(record)?;
            return Ok(Outcome::Cloned);
        }

        let dir = self.install.path_of(&record.name);
        let target = self.resolve_target(&dir, record)?;

        let local = self.client.rev_parse_head(&dir)?;
        let listing =
            self.client
                .ls_remote(&dir, target.kind(), &target.locator, &target.branch)?;
        let remote = refs::select(&listing, &target.branch, target.selector())?;

        let branch = self.options.show_branch.then(|| target.branch.clone());
        if local == remote.commit {
            log::debug!("{}: up to date at {local}", record.name);
            return Ok(Outcome::Ok { branch });
        }

        log::debug!(
            "{}: local {local} differs from remote {} ({})",
            record.name,
            remote.commit,
            remote.name
        );
        self.client
            .pull_rebase(&dir, &target.locator, &target.branch)?;
        if record.is_pinned() {
            self.client.reset_hard(&dir, &target.branch)?;
        }
        Ok(Outcome::Updated { branch })
    }

    fn resolve_target(&self, dir: &Path, record: &PluginRecord) -> Result<Target, EntryError> {
        if let Some(pin) = &record.pin {
            return Ok(Target {
                branch: pin.clone(),
                symref: None,
                locator: record.url.clone(),
            });
        }

        let symref = self.client.symbolic_head(dir)?;
        let branch = refs::branch_leaf(&symref).to_string();
        let locator = match self.client.branch_remote_url(dir, &branch) {
            Ok(url) if !url.is_empty() => url,
            Ok(_) => record.url.clone(),
            // git config exits non-zero for unset keys
            Err(e @ gitkit::Error::CommandFailed { .. }) => {
                log::debug!(
                    "{}: no remote configured for {branch}, using {} ({e})",
                    record.name,
                    record.url
                );
                record.url.clone()
            }
            Err(e) => return Err(e.into()),
        };

        Ok(Target {
            branch,
            symref: Some(symref),
            locator,
        })
    }

    fn clone_fresh(&self, record: &PluginRecord) -> Result<(), EntryError> {
        let Some(pin) = record.pin.as_deref() else {
            return self.clone_with_retry(record, None).map_err(EntryError::from);
        };

        match self.clone_with_retry(record, Some(pin)) {
            Ok(()) => Ok(()),
            Err(e) if matches!(e.category(), ErrorCategory::Network | ErrorCategory::Timeout) => {
                Err(e.into())
            }
            Err(e) => {
                // The pin may be a commit id, which --branch cannot take
                log::debug!(
                    "{}: clone --branch {pin} failed, cloning default branch ({e})",
                    record.name
                );
                self.discard_partial(&record.name);
                self.clone_with_retry(record, None)?;
                self.client
                    .reset_hard(&self.install.path_of(&record.name), pin)?;
                Ok(())
            }
        }
    }

    fn clone_with_retry(&self, record: &PluginRecord, branch: Option<&str>) -> gitkit::Result<()> {
        let mut attempt = 0;
        loop {
            let result =
                self.client
                    .clone_repo(self.install.root(), &record.url, &record.name, branch);

            match result {
                Ok(_) => {
                    log::debug!("{}: cloned from {}", record.name, record.url);
                    return Ok(());
                }
                Err(e) if e.is_retryable() && attempt < self.options.clone_retries => {
                    let delay = self.options.backoff_for(attempt);
                    attempt += 1;
                    log::warn!(
                        "{}: clone failed ({}), retry {attempt}/{} in {delay:?}",
                        record.name,
                        e.category().description(),
                        self.options.clone_retries
                    );
                    self.discard_partial(&record.name);
                    thread::sleep(delay);
                }
                Err(e) => {
                    self.discard_partial(&record.name);
                    return Err(e);
                }
            }
        }
    }

    /// Remove whatever a failed clone left behind
    fn discard_partial(&self, name: &str) {
        if self.install.contains(name)
            && let Err(e) = self.install.remove(name)
        {
            log::warn!("{name}: failed to remove partial clone: {e}");
        }
    }
}
