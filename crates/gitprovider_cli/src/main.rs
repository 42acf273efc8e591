//! gitprovider CLI - reconcile GitLab groups, projects and access from the shell.

mod commands;
mod config;
mod shutdown;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use gitprovider::ProviderError;
use gitprovider::platform::{RepositoryPermission, RepositoryVisibility, short_error_message};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "gitprovider")]
#[command(version)]
#[command(about = "Reconcile GitLab repositories, team access and deploy keys")]
#[command(
    long_about = "gitprovider compares the desired state given on the command line with what \
GitLab reports and creates, updates or leaves alone each resource. Every reconcile prints \
whether an action was taken."
)]
#[command(after_long_help = r#"EXAMPLES
    Make sure a project exists with a description:
        $ gitprovider repo reconcile acme/platform/demo --description "Demo project"

    Grant a subgroup push access:
        $ gitprovider team-access reconcile acme/demo acme/ops --permission push

    Register a read-only deploy key:
        $ gitprovider deploy-key reconcile acme/demo ci --key-file ~/.ssh/ci.pub

CONFIGURATION
    gitprovider reads configuration from:
      1. ~/.config/gitprovider/config.toml (or $XDG_CONFIG_HOME/gitprovider/config.toml)
      2. ./gitprovider.toml
      3. Environment variables (GITPROVIDER_* prefix)
      4. .env file in current directory

ENVIRONMENT VARIABLES
    GITPROVIDER_GITLAB_TOKEN    GitLab personal access token
    GITPROVIDER_GITLAB_HOST     GitLab host (default: gitlab.com)
"#)]
struct Cli {
    /// GitLab host (default: gitlab.com, or from config/env)
    #[arg(short = 'H', long, global = true)]
    host: Option<String>,

    /// Revalidate repeated reads with conditional requests
    #[arg(long, global = true)]
    conditional_requests: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Organization (group) operations
    Org {
        #[command(subcommand)]
        action: OrgAction,
    },
    /// Repository (project) operations
    Repo {
        #[command(subcommand)]
        action: RepoAction,
    },
    /// Team access on a repository
    TeamAccess {
        #[command(subcommand)]
        action: TeamAccessAction,
    },
    /// Deploy keys on a repository
    DeployKey {
        #[command(subcommand)]
        action: DeployKeyAction,
    },
    /// Repository files
    Files {
        #[command(subcommand)]
        action: FilesAction,
    },
}

/// How a repository path on the command line is addressed.
#[derive(Debug, Clone, clap::Args)]
struct RepoTarget {
    /// Repository path, e.g. "acme/platform/demo" or "octo/dotfiles" with --user
    repo: String,

    /// The owner is a user, not a group
    #[arg(short, long)]
    user: bool,
}

#[derive(Subcommand)]
enum OrgAction {
    /// List groups you are a member of
    List,
    /// Show one group
    Get {
        /// Group path, e.g. "acme" or "acme/platform"
        path: String,
    },
    /// List direct subgroups
    Children { path: String },
    /// List teams (subgroups) with their members
    Teams { path: String },
}

#[derive(Subcommand)]
enum RepoAction {
    /// Show a repository
    Get {
        #[command(flatten)]
        target: RepoTarget,
    },
    /// List repositories of a group, or of a user with --user
    List {
        owner: String,
        #[arg(short, long)]
        user: bool,
    },
    /// Create or update a repository to match the given state
    Reconcile {
        #[command(flatten)]
        target: RepoTarget,

        #[arg(short, long)]
        description: Option<String>,

        #[arg(short = 'b', long)]
        default_branch: Option<String>,

        #[arg(short = 'V', long, value_parser = parse_visibility)]
        visibility: Option<RepositoryVisibility>,

        /// Create an initial commit when the repository is new
        #[arg(long)]
        auto_init: bool,
    },
    /// Delete a repository (requires client.destructive_calls)
    Delete {
        #[command(flatten)]
        target: RepoTarget,
    },
}

#[derive(Subcommand)]
enum TeamAccessAction {
    /// List teams with access
    List {
        #[command(flatten)]
        target: RepoTarget,
    },
    /// Grant or adjust a team's access
    Reconcile {
        #[command(flatten)]
        target: RepoTarget,

        /// Team full path, e.g. "acme/ops"
        team: String,

        #[arg(short, long, value_parser = parse_permission)]
        permission: Option<RepositoryPermission>,
    },
}

#[derive(Subcommand)]
enum DeployKeyAction {
    /// List deploy keys
    List {
        #[command(flatten)]
        target: RepoTarget,
    },
    /// Register or adjust a deploy key
    Reconcile {
        #[command(flatten)]
        target: RepoTarget,

        /// Key title, unique per repository
        name: String,

        /// Public key file
        #[arg(short, long)]
        key_file: PathBuf,

        /// Allow pushes with this key
        #[arg(long)]
        read_write: bool,
    },
}

#[derive(Subcommand)]
enum FilesAction {
    /// Print every file in a directory
    Get {
        #[command(flatten)]
        target: RepoTarget,

        /// Directory inside the repository
        path: String,

        #[arg(short, long, default_value = "main")]
        branch: String,
    },
}

fn parse_visibility(s: &str) -> Result<RepositoryVisibility, String> {
    s.parse().map_err(|e: ProviderError| e.to_string())
}

fn parse_permission(s: &str) -> Result<RepositoryPermission, String> {
    s.parse().map_err(|e: ProviderError| e.to_string())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let env_filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::new("gitprovider=info,gitprovider_cli=info"),
    };
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let config = config::Config::load();
    let cli = Cli::parse();

    let host = cli.host.clone().unwrap_or_else(|| config.gitlab_host());
    let mut options = config.client_options(host);
    if cli.conditional_requests {
        options = options.with_conditional_requests(true);
    }
    let client = commands::shared::client(&config, options)?;

    let run = async {
        match cli.command {
            Commands::Org { action } => commands::org::handle_org(action, &client).await,
            Commands::Repo { action } => commands::repo::handle_repo(action, &client).await,
            Commands::TeamAccess { action } => {
                commands::access::handle_team_access(action, &client).await
            }
            Commands::DeployKey { action } => {
                commands::access::handle_deploy_key(action, &client).await
            }
            Commands::Files { action } => commands::files::handle_files(action, &client).await,
        }
    };

    let result = shutdown::run_until_interrupted(run).await;

    if let Some(stats) = client.cache_stats() {
        tracing::debug!(
            cache_hits = stats.cache_hits,
            fetched = stats.fetched,
            hit_ratio = stats.hit_ratio(),
            "conditional request cache"
        );
    }

    if let Err(err) = result {
        tracing::error!(error = %error_summary(&*err), "command failed");
        std::process::exit(1);
    }
    Ok(())
}

/// First line of a provider error; other errors are shown whole.
fn error_summary(err: &(dyn std::error::Error + 'static)) -> String {
    match err.downcast_ref::<ProviderError>() {
        Some(provider) => short_error_message(provider),
        None => err.to_string(),
    }
}
