use clap::{Parser, Subcommand};
use console::style;
use std::path::PathBuf;
use tracing::warn;

use skillsync_config::{ConfigLoader, SyncConfig};
use skillsync_core::SyncError;
use skillsync_skills::SyncAction;

mod sync;

/// Keep data/skills.yaml and the data/skills/ Markdown tree in step
#[derive(Parser, Debug)]
#[command(name = "skillsync", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to skillsync.toml config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// YAML document to sync (overrides config)
    #[arg(long, global = true)]
    yaml: Option<PathBuf>,

    /// Markdown tree to sync (overrides config)
    #[arg(long, global = true)]
    markdown_dir: Option<PathBuf>,

    /// Log level override (e.g. debug, info, warn, error)
    #[arg(short, long, global = true)]
    log_level: Option<String>,

    /// Enable verbose output (debug logging)
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Suppress all log output (errors only)
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
enum Commands {
    /// Sync whichever side is stale, or validate when both are current (default)
    Sync,
    /// Validate both sides without writing anything
    Check,
    /// Regenerate the YAML document from the Markdown tree
    ToYaml,
    /// Regenerate the Markdown tree from the YAML document
    ToMarkdown,
    /// Print the filename a skill name maps to
    Slug {
        /// Skill name
        name: String,
    },
}

impl Cli {
    pub fn run(self) -> skillsync_core::Result<()> {
        let command = self.command.unwrap_or(Commands::Sync);
        if let Commands::Slug { name } = &command {
            return sync::cmd_slug(name);
        }

        // Load config first so we can use it for log format
        let config_loader = ConfigLoader::load(self.config.as_deref())?;
        let mut config = config_loader.into_config();
        if let Some(yaml) = self.yaml {
            config.paths.yaml = yaml;
        }
        if let Some(dir) = self.markdown_dir {
            config.paths.markdown_dir = dir;
        }

        // Resolve log level: --verbose > --quiet > --log-level > config default
        let log_level = if self.verbose {
            "debug"
        } else if self.quiet {
            "error"
        } else {
            self.log_level
                .as_deref()
                .unwrap_or(config.logging.level.as_str())
        };

        // Flags may have replaced the loaded paths, so validate again
        let warnings = config.validate().map_err(SyncError::Config)?;
        init_tracing(&config, log_level);
        for w in &warnings {
            warn!("{}", w);
        }

        match command {
            Commands::Sync => sync::cmd_sync(&config),
            Commands::Check => sync::cmd_check(&config),
            Commands::ToYaml => sync::cmd_force(&config, SyncAction::GenerateYaml),
            Commands::ToMarkdown => sync::cmd_force(&config, SyncAction::GenerateMarkdown),
            Commands::Slug { .. } => Ok(()),
        }
    }
}

/// Logs go to stderr; stdout carries the report.
fn init_tracing(config: &SyncConfig, log_level: &str) {
    let filter = || {
        tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level))
    };

    match config.logging.format.as_str() {
        "json" => tracing_subscriber::fmt()
            .with_env_filter(filter())
            .with_writer(std::io::stderr)
            .json()
            .with_target(true)
            .init(),
        "compact" => tracing_subscriber::fmt()
            .with_env_filter(filter())
            .with_writer(std::io::stderr)
            .compact()
            .with_target(false)
            .init(),
        _ => tracing_subscriber::fmt()
            .with_env_filter(filter())
            .with_writer(std::io::stderr)
            .with_target(false)
            .init(),
    }
}

/// Print the operator-facing diagnostic for a failed run.
pub fn report_error(err: &SyncError) {
    match err {
        SyncError::Validation(messages) => {
            println!(
                "{} {}\n",
                style("❌").red(),
                style("SYNC ERROR: Content validation failed").red().bold()
            );
            for message in messages {
                println!("   • {message}");
            }
            println!("\n   Fix these errors and re-run skillsync");
        }
        SyncError::NoSources { yaml, markdown } => {
            println!("{} {}", style("❌").red(), style("ERROR: No skill data found").red().bold());
            println!(
                "   Create either {} or {}/**/*.md",
                yaml.display(),
                markdown.display()
            );
        }
        other => println!("{} {}", style("❌").red(), style(format!("ERROR: {other}")).red()),
    }
}
