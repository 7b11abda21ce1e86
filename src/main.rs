use clap::{Parser, Subcommand};
use heady::commands::*;
use heady::core::{command_init::GlobalOptions, error::Result, print_error};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "heady")]
#[command(about = "Manage a stack of in-flight commits as a navigable tree")]
#[command(version)]
struct Cli {
    /// Enable debug logging
    #[arg(long, global = true)]
    debug: bool,

    /// Repository to operate on (default: discovered from the current directory)
    #[arg(long, global = true)]
    repo: Option<PathBuf>,

    /// Comma-separated trunk references (e.g. "origin/main,origin/stable")
    #[arg(long, global = true)]
    trunk: Option<String>,

    /// Remote used for push and pull request links
    #[arg(long, global = true)]
    remote: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the tree of visible heads
    Tree {
        /// Print the tree as JSON
        #[arg(long)]
        json: bool,
    },
    /// Hide the subtrees rooted at these revisions
    Hide {
        #[arg(required = true)]
        revs: Vec<String>,
    },
    /// Remove revisions from the hide list
    Unhide {
        #[arg(required = true)]
        revs: Vec<String>,
    },
    /// Move a subtree of commits onto a new parent
    Move {
        /// Root of the subtree to move
        source: String,
        /// New parent of the subtree
        dest: String,
    },
    /// Check out a revision using tree directions
    Goto {
        /// One of next, prev, tip, upstream
        direction: String,
        /// The upstream to go to, with 'upstream'
        upstream: Option<String>,
    },
    /// Move children of any amended revisions of HEAD onto HEAD
    Fixup,
    /// Add an upstream branch to a commit
    Upstream {
        /// The upstream branch to target, as <remote>/<branch>
        upstream_ref: String,
        /// The local revision to annotate
        #[arg(default_value = "HEAD")]
        rev: String,
    },
    /// Add the next heady_label to a commit
    Label {
        /// Label prefix (default from settings)
        #[arg(long)]
        prefix: Option<String>,
        #[arg(default_value = "HEAD")]
        rev: String,
    },
    /// Push commits with upstreams in the subtree of a revision
    Push {
        /// Remote to push to (default: --remote or settings)
        remote: Option<String>,
        /// Push this commit and every commit above it
        #[arg(default_value = "HEAD")]
        rev: String,
    },
    /// Print links to open stacked pull requests
    Pr {
        #[arg(default_value = "HEAD")]
        rev: String,
    },
    /// Hide commits whose upstreams are merged to trunk
    Autohide,
}

fn run(command: Commands, options: &GlobalOptions) -> Result<()> {
    match command {
        Commands::Tree { json } => execute_tree(options, json),
        Commands::Hide { revs } => execute_hide(options, revs),
        Commands::Unhide { revs } => execute_unhide(options, revs),
        Commands::Move { source, dest } => execute_move(options, &source, &dest),
        Commands::Goto {
            direction,
            upstream,
        } => execute_goto(options, &direction, upstream),
        Commands::Fixup => execute_fixup(options),
        Commands::Upstream { upstream_ref, rev } => execute_upstream(options, &upstream_ref, &rev),
        Commands::Label { prefix, rev } => execute_label(options, &rev, prefix.as_deref()),
        Commands::Push { remote, rev } => {
            execute_push(options, remote.or_else(|| options.remote.clone()), &rev)
        }
        Commands::Pr { rev } => execute_pr(options, &rev),
        Commands::Autohide => execute_autohide(options),
    }
}

fn main() {
    let cli = Cli::parse();

    // --debug wins; otherwise RUST_LOG if set, else info
    let mut logger =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if cli.debug {
        logger.filter_level(log::LevelFilter::Debug);
    }
    logger.init();

    let options = GlobalOptions {
        repo: cli.repo,
        trunk: cli.trunk,
        remote: cli.remote,
    };

    if let Err(e) = run(cli.command, &options) {
        print_error(&e.to_string());
        std::process::exit(1);
    }
}
