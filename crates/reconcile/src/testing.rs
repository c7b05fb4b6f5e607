//! In-memory stand-ins for git and the install root.

use crate::install::InstallDir;
use gitkit::Backend;
use registry::PluginRecord;
use std::collections::{BTreeSet, HashMap, VecDeque};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

pub const ROOT: &str = "/plugins";

/// Scripted answer to one git command
#[derive(Debug, Clone)]
pub enum Reply {
    Ok(String),
    Fail(String),
    Timeout,
    Panic,
}

pub fn ok(output: &str) -> Reply {
    Reply::Ok(output.to_string())
}

pub fn fail(output: &str) -> Reply {
    Reply::Fail(output.to_string())
}

/// Install root backed by a set of names
#[derive(Debug, Default)]
pub struct MemoryInstall {
    root: PathBuf,
    dirs: Mutex<BTreeSet<String>>,
    fail_remove: BTreeSet<String>,
}

impl MemoryInstall {
    pub fn new(present: &[&str]) -> Self {
        Self {
            root: PathBuf::from(ROOT),
            dirs: Mutex::new(present.iter().map(|s| (*s).to_string()).collect()),
            fail_remove: BTreeSet::new(),
        }
    }

    pub fn fail_remove(mut self, name: &str) -> Self {
        self.fail_remove.insert(name.to_string());
        self
    }

    pub fn add(&self, name: &str) {
        self.dirs.lock().unwrap().insert(name.to_string());
    }

    pub fn names(&self) -> Vec<String> {
        self.dirs.lock().unwrap().iter().cloned().collect()
    }
}

impl InstallDir for MemoryInstall {
    fn root(&self) -> &Path {
        &self.root
    }

    fn contains(&self, name: &str) -> bool {
        self.dirs.lock().unwrap().contains(name)
    }

    fn list(&self) -> io::Result<Vec<String>> {
        Ok(self.names())
    }

    fn remove(&self, name: &str) -> io::Result<()> {
        if self.fail_remove.contains(name) {
            return Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                "permission denied",
            ));
        }
        self.dirs.lock().unwrap().remove(name);
        Ok(())
    }
}

/// Git backend answering from per-plugin scripts.
///
/// Replies are keyed by plugin name and command line. Queued replies are
/// consumed in order and the last one repeats. Unscripted commands succeed
/// with empty output. A successful clone creates the plugin directory in the
/// shared [`MemoryInstall`].
pub struct FakeGit {
    install: Arc<MemoryInstall>,
    replies: Mutex<HashMap<(String, String), VecDeque<Reply>>>,
    delays: HashMap<String, Duration>,
    calls: Mutex<Vec<(String, String)>>,
}

impl FakeGit {
    pub fn new(install: Arc<MemoryInstall>) -> Self {
        Self {
            install,
            replies: Mutex::new(HashMap::new()),
            delays: HashMap::new(),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn on(self, plugin: &str, command: &str, reply: Reply) -> Self {
        self.replies
            .lock()
            .unwrap()
            .entry((plugin.to_string(), command.to_string()))
            .or_default()
            .push_back(reply);
        self
    }

    /// Sleep before answering any command for `plugin`
    pub fn delay(mut self, plugin: &str, delay: Duration) -> Self {
        self.delays.insert(plugin.to_string(), delay);
        self
    }

    /// Command lines issued for `plugin`, in order
    pub fn calls_for(&self, plugin: &str) -> Vec<String> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|(name, _)| name == plugin)
            .map(|(_, cmd)| cmd.clone())
            .collect()
    }

    fn next_reply(&self, plugin: &str, command: &str) -> Option<Reply> {
        let mut replies = self.replies.lock().unwrap();
        let queue = replies.get_mut(&(plugin.to_string(), command.to_string()))?;
        if queue.len() > 1 {
            queue.pop_front()
        } else {
            queue.front().cloned()
        }
    }
}

impl Backend for FakeGit {
    fn run(&self, dir: &Path, args: &[&str]) -> gitkit::Result<String> {
        let command = args.join(" ");
        // clone runs in the install root and names the plugin last
        let plugin = if args.first() == Some(&"clone") {
            args.last().copied().unwrap_or_default().to_string()
        } else {
            dir.file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default()
        };

        self.calls
            .lock()
            .unwrap()
            .push((plugin.clone(), command.clone()));

        if let Some(delay) = self.delays.get(&plugin) {
            thread::sleep(*delay);
        }

        let reply = self
            .next_reply(&plugin, &command)
            .unwrap_or_else(|| ok(""));
        match reply {
            Reply::Ok(output) => {
                if args.first() == Some(&"clone") {
                    self.install.add(&plugin);
                }
                Ok(output)
            }
            Reply::Fail(output) => Err(gitkit::Error::CommandFailed {
                command: format!("git {command}"),
                dir: dir.to_path_buf(),
                status: Some(128),
                output,
            }),
            Reply::Timeout => Err(gitkit::Error::TimedOut {
                command: format!("git {command}"),
                dir: dir.to_path_buf(),
                timeout: Duration::from_secs(30),
            }),
            Reply::Panic => panic!("scripted panic for {plugin}"),
        }
    }
}

/// Script a tracking checkout on `main` with the given local and remote heads
pub fn tracking(git: FakeGit, name: &str, local: &str, remote: &str) -> FakeGit {
    git.on(name, "symbolic-ref HEAD", ok("refs/heads/main"))
        .on(name, "config branch.main.remote", ok("origin"))
        .on(name, "config remote.origin.url", ok(&format!("https://example.com/{name}")))
        .on(name, "rev-parse HEAD", ok(local))
        .on(
            name,
            &format!("ls-remote --heads https://example.com/{name} main"),
            ok(&format!("{remote}\trefs/heads/main")),
        )
}

pub fn record(name: &str) -> PluginRecord {
    PluginRecord::new(name, format!("https://example.com/{name}"))
}
