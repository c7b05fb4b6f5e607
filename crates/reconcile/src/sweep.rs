//! Removal of install-root directories that no record claims.

use crate::install::InstallDir;
use crate::types::Report;
use std::collections::BTreeSet;
use std::io;
use std::sync::mpsc::SyncSender;

/// Directories under the install root whose name is not registered
pub fn orphans(install: &dyn InstallDir, registered: &BTreeSet<String>) -> io::Result<Vec<String>> {
    Ok(install
        .list()?
        .into_iter()
        .filter(|name| !registered.contains(name))
        .collect())
}

/// Delete every orphan, reporting each deletion or failure on `tx`
pub(crate) fn run(install: &dyn InstallDir, registered: &BTreeSet<String>, tx: &SyncSender<Report>) {
    let names = match orphans(install, registered) {
        Ok(names) => names,
        Err(e) => {
            log::warn!("Cannot list {}: {e}", install.root().display());
            let _ = tx.send(Report::SweepFailed {
                target: install.root().display().to_string(),
                error: e.to_string(),
            });
            return;
        }
    };

    for name in names {
        let report = match install.remove(&name) {
            Ok(()) => {
                log::debug!("Removed unregistered {name}");
                Report::Deleted(name)
            }
            Err(e) => {
                log::warn!("Failed to remove {name}: {e}");
                Report::SweepFailed {
                    target: name,
                    error: e.to_string(),
                }
            }
        };
        // the collector outlives every sender
        let _ = tx.send(report);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MemoryInstall;
    use std::sync::mpsc;
    use std::thread;

    fn registered(names: &[&str]) -> BTreeSet<String> {
        names.iter().map(|s| (*s).to_string()).collect()
    }

    #[test]
    fn test_orphans_excludes_registered() {
        let install = MemoryInstall::new(&["a", "orphan", ".hidden"]);
        let found = orphans(&install, &registered(&["a", "not-installed"])).unwrap();
        assert_eq!(found, vec![".hidden", "orphan"]);
    }

    #[test]
    fn test_run_reports_deletions_and_failures() {
        let install = MemoryInstall::new(&["a", "orphan", "stuck"]).fail_remove("stuck");
        let names = registered(&["a"]);
        let (tx, rx) = mpsc::sync_channel(0);

        let reports: Vec<Report> = thread::scope(|s| {
            let (install, names) = (&install, &names);
            s.spawn(move || run(install, names, &tx));
            rx.iter().collect()
        });

        assert_eq!(reports.len(), 2);
        assert!(matches!(&reports[0], Report::Deleted(name) if name == "orphan"));
        assert!(matches!(
            &reports[1],
            Report::SweepFailed { target, .. } if target == "stuck"
        ));
        assert_eq!(install.names(), vec!["a", "stuck"]);
    }
}
