//! Fan-out / fan-in over the selected records.
//!
//! Each record gets a worker on a dedicated rayon pool. Workers, and the
//! optional orphan sweep, send their reports over a rendezvous channel; the
//! calling thread is the only reader and hands every report to the caller's
//! sink as it arrives. `run` returns once all senders are gone, so nothing
//! is dropped even when entries fail or panic.

use crate::error::{EntryError, Result};
use crate::install::InstallDir;
use crate::protocol::Protocol;
use crate::sweep;
use crate::types::{Event, Mode, Options, Outcome, Report, Summary};
use gitkit::Client;
use rayon::prelude::*;
use registry::PluginRecord;
use std::any::Any;
use std::collections::BTreeSet;
use std::panic::{self, AssertUnwindSafe};
use std::sync::mpsc;
use std::thread;

/// Runs the reconciliation protocol for many records at once
pub struct Engine<'a> {
    client: &'a Client,
    install: &'a dyn InstallDir,
    options: Options,
}

impl<'a> Engine<'a> {
    pub fn new(client: &'a Client, install: &'a dyn InstallDir, options: Options) -> Self {
        Self {
            client,
            install,
            options,
        }
    }

    /// Process every record and deliver reports to `sink` in arrival order.
    ///
    /// With `registered` set, install-root directories not named in it are
    /// removed concurrently with the workers. Exactly one `Report::Entry` is
    /// delivered per record.
    pub fn run<F>(
        &self,
        records: &[PluginRecord],
        registered: Option<&BTreeSet<String>>,
        mut sink: F,
    ) -> Result<Summary>
    where
        F: FnMut(Report),
    {
        let threads = match self.options.jobs {
            0 => records.len(),
            n => n,
        }
        .max(1);

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .thread_name(|i| format!("plugsync-worker-{i}"))
            .build()?;

        log::debug!(
            "Processing {} records on {threads} threads ({:?})",
            records.len(),
            self.options.mode
        );

        let protocol = Protocol::new(self.client, self.install, &self.options);
        let mode = self.options.mode;
        let (tx, rx) = mpsc::sync_channel::<Report>(0);
        let mut summary = Summary::default();

        thread::scope(|s| {
            if let Some(registered) = registered {
                let tx = tx.clone();
                let install = self.install;
                s.spawn(move || sweep::run(install, registered, &tx));
            }

            let (protocol, pool) = (&protocol, &pool);
            s.spawn(move || {
                pool.install(|| {
                    records.par_iter().for_each_with(tx, |tx, record| {
                        let outcome = process(protocol, mode, record);
                        let event = Event {
                            name: record.name.clone(),
                            outcome,
                        };
                        // the collector outlives every sender
                        let _ = tx.send(Report::Entry(event));
                    });
                });
            });

            for report in rx {
                summary.record(&report);
                sink(report);
            }
        });

        log::debug!("Run finished: {summary:?}");
        Ok(summary)
    }
}

/// One worker: never panics, always yields an outcome
fn process(protocol: &Protocol<'_>, mode: Mode, record: &PluginRecord) -> Outcome {
    let result = panic::catch_unwind(AssertUnwindSafe(|| match mode {
        Mode::Reconcile => protocol.reconcile(record),
        Mode::Revisions => protocol.revision(record),
    }));

    result.unwrap_or_else(|payload| {
        let message = panic_message(payload.as_ref());
        log::error!("{}: worker panicked: {message}", record.name);
        Outcome::Error(EntryError::Panicked(message))
    })
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
