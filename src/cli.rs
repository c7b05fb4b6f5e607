use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "plugsync")]
#[command(author = "Alberto Cavalcante")]
#[command(version)]
#[command(about = "Keep git-installed Neovim plugins in sync with a registry", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbosity level
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(flatten)]
    pub paths: PathArgs,

    #[command(subcommand)]
    pub command: Command,
}

/// Locations that override settings and defaults
#[derive(Args, Debug, Default, Clone)]
pub struct PathArgs {
    /// Registry document (JSON)
    #[arg(long, env = "PLUGSYNC_REGISTRY", global = true, value_name = "PATH")]
    pub registry: Option<PathBuf>,

    /// Directory holding one checkout per plugin
    #[arg(long, env = "PLUGSYNC_INSTALL_DIR", global = true, value_name = "PATH")]
    pub install_dir: Option<PathBuf>,

    /// Generated loader file
    #[arg(long, env = "PLUGSYNC_LOADER", global = true, value_name = "PATH")]
    pub loader: Option<PathBuf>,

    /// Settings file (TOML)
    #[arg(long, env = "PLUGSYNC_SETTINGS", global = true, value_name = "PATH")]
    pub settings: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Clone missing plugins, update stale ones, remove unregistered ones
    Check(CheckArgs),

    /// Print the checked-out commit of each plugin
    Revisions(RevisionsArgs),

    /// Compare the registry with what is on disk
    Verify(VerifyArgs),

    /// Pin plugins to a branch or tag
    Freeze(FreezeArgs),

    /// Remove pins so plugins track their checkout again
    Unfreeze(UnfreezeArgs),

    /// Regenerate the loader file from the registry
    Rebuild,

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Args)]
pub struct CheckArgs {
    /// Plugins to check (default: all)
    pub names: Vec<String>,

    /// Show the branch being compared
    #[arg(short, long)]
    pub branch: bool,

    /// Worker threads (0 = one per plugin)
    #[arg(short, long)]
    pub jobs: Option<usize>,

    /// Keep directories that no registered plugin claims
    #[arg(long)]
    pub no_prune: bool,

    /// Extra attempts for clones failing with network errors
    #[arg(long)]
    pub retries: Option<usize>,
}

#[derive(Args)]
pub struct RevisionsArgs {
    /// Plugins to inspect (default: all)
    pub names: Vec<String>,

    /// Worker threads (0 = one per plugin)
    #[arg(short, long)]
    pub jobs: Option<usize>,
}

#[derive(Args)]
pub struct VerifyArgs {
    /// Delete directories that no registered plugin claims
    #[arg(short, long)]
    pub delete: bool,
}

#[derive(Args)]
pub struct FreezeArgs {
    /// Branch or tag to pin to
    #[arg(long = "to", value_name = "REF")]
    pub reference: String,

    /// Plugins to pin
    #[arg(required = true)]
    pub names: Vec<String>,
}

#[derive(Args)]
pub struct UnfreezeArgs {
    /// Plugins to unpin
    #[arg(required = true)]
    pub names: Vec<String>,
}
