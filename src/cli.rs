//! Command-line interface definition
//!
//! Usage: stacksync sync --stack-name <NAME> [OPTIONS]

use std::collections::BTreeMap;
use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// StackSync - incremental infrastructure and code synchronization
#[derive(Parser, Debug)]
#[command(name = "stacksync")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Sync local template and code changes to a deployed stack
    Sync {
        /// Name of the stack to sync
        #[arg(long)]
        stack_name: String,

        /// Path to the root template
        #[arg(short, long, default_value = "template.yaml")]
        template: PathBuf,

        /// Package function dependencies into a shared layer
        #[arg(long)]
        dependency_layer: bool,

        /// Template parameter overrides (Key=Value, repeatable)
        #[arg(long, value_parser = parse_key_value)]
        parameter_overrides: Vec<(String, String)>,

        /// Stack tags (Key=Value, repeatable)
        #[arg(long, value_parser = parse_key_value)]
        tags: Vec<(String, String)>,

        /// IAM capabilities to acknowledge (repeatable)
        #[arg(long)]
        capabilities: Vec<String>,

        /// Artifact bucket for packaged code
        #[arg(long)]
        s3_bucket: Option<String>,

        /// Key prefix inside the artifact bucket
        #[arg(long)]
        s3_prefix: Option<String>,

        /// KMS key for artifact encryption
        #[arg(long)]
        kms_key_id: Option<String>,

        /// Default image repository for container functions
        #[arg(long)]
        image_repository: Option<String>,

        /// Per-function image repositories (LogicalId=Repository, repeatable)
        #[arg(long, value_parser = parse_key_value)]
        image_repositories: Vec<(String, String)>,

        /// Skip the confirmation prompt before a full deploy
        #[arg(short, long)]
        yes: bool,

        /// Maximum concurrent code-sync workers
        #[arg(long)]
        concurrency: Option<usize>,

        /// Directory for sync state (defaults next to the template)
        #[arg(long)]
        state_dir: Option<PathBuf>,

        /// Command to run for a full deploy
        #[arg(long, env = "STACKSYNC_DEPLOY_COMMAND")]
        deploy_command: Option<String>,

        /// Command to run per drifted resource
        #[arg(long, env = "STACKSYNC_CODE_SYNC_COMMAND")]
        code_sync_command: Option<String>,
    },
}

/// Parse a `Key=Value` argument
pub fn parse_key_value(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(format!("expected Key=Value, got '{}'", raw)),
    }
}

/// Collect repeated `Key=Value` pairs; later values win
pub fn pairs_to_map(pairs: &[(String, String)]) -> BTreeMap<String, String> {
    pairs.iter().cloned().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_key_value_pairs() {
        assert_eq!(
            parse_key_value("Env=prod").unwrap(),
            ("Env".to_string(), "prod".to_string())
        );
        assert_eq!(
            parse_key_value("Image=repo=latest").unwrap(),
            ("Image".to_string(), "repo=latest".to_string())
        );
    }

    #[test]
    fn rejects_malformed_pairs() {
        assert!(parse_key_value("no-equals").is_err());
        assert!(parse_key_value("=empty-key").is_err());
    }

    #[test]
    fn later_pairs_win_in_map() {
        let map = pairs_to_map(&[
            ("A".into(), "1".into()),
            ("A".into(), "2".into()),
        ]);
        assert_eq!(map.get("A").map(String::as_str), Some("2"));
    }

    #[test]
    fn stack_name_is_required() {
        let result = Cli::try_parse_from(["stacksync", "sync"]);
        assert!(result.is_err());
    }

    #[test]
    fn sync_parses_full_option_set() {
        let cli = Cli::try_parse_from([
            "stacksync",
            "sync",
            "--stack-name",
            "demo",
            "--template",
            "infra/template.yaml",
            "--parameter-overrides",
            "Env=prod",
            "--tags",
            "Team=payments",
            "--capabilities",
            "CAPABILITY_IAM",
            "--yes",
            "--concurrency",
            "8",
        ])
        .unwrap();
        let Commands::Sync {
            stack_name,
            template,
            parameter_overrides,
            yes,
            concurrency,
            ..
        } = cli.command;
        assert_eq!(stack_name, "demo");
        assert_eq!(template, PathBuf::from("infra/template.yaml"));
        assert_eq!(parameter_overrides.len(), 1);
        assert!(yes);
        assert_eq!(concurrency, Some(8));
    }
}
