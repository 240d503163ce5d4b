//! StackSync CLI - incremental infrastructure and code synchronization
//!
//! Usage: stacksync sync --stack-name <NAME> [OPTIONS]

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;

use stacksync::application::{SyncOptions, SyncUseCase};
use stacksync::cli::{pairs_to_map, Cli, Commands};
use stacksync::infrastructure::{
    CommandProvider, ConsoleEventSink, DialoguerConfirmation, FileCodeHasher, FileTemplateSource,
    TomlFingerprintRepository,
};

fn main() -> Result<()> {
    let cli = Cli::parse();
    let verbose = cli.verbose > 0;

    match cli.command {
        Commands::Sync {
            stack_name,
            template,
            dependency_layer,
            parameter_overrides,
            tags,
            capabilities,
            s3_bucket,
            s3_prefix,
            kms_key_id,
            image_repository,
            image_repositories,
            yes,
            concurrency,
            state_dir,
            deploy_command,
            code_sync_command,
        } => {
            let mut options = SyncOptions::new(stack_name, &template)
                .with_dependency_layer(dependency_layer)
                .with_parameter_overrides(pairs_to_map(&parameter_overrides))
                .with_tags(pairs_to_map(&tags))
                .with_capabilities(capabilities)
                .with_image_repositories(pairs_to_map(&image_repositories))
                .with_auto_approve(yes);
            if let Some(bucket) = s3_bucket {
                options = options.with_artifact_bucket(bucket);
            }
            if let Some(prefix) = s3_prefix {
                options = options.with_artifact_prefix(prefix);
            }
            if let Some(key) = kms_key_id {
                options = options.with_kms_key_id(key);
            }
            if let Some(repository) = image_repository {
                options = options.with_image_repository(repository);
            }
            if let Some(workers) = concurrency {
                options = options.with_concurrency(workers);
            }

            let fingerprints = match state_dir {
                Some(dir) => TomlFingerprintRepository::new(dir),
                None => TomlFingerprintRepository::for_template(&template),
            };

            let use_case = SyncUseCase::new(
                FileTemplateSource::new(),
                CommandProvider::new(deploy_command, code_sync_command),
                fingerprints,
                FileCodeHasher::new(),
            )
            .with_confirmation(Box::new(DialoguerConfirmation::new()))
            .with_events(Arc::new(ConsoleEventSink::new(verbose)));

            // Ctrl+C requests a graceful stop: no new work is dispatched and
            // the session finishes with whatever already completed.
            let cancel = Arc::new(AtomicBool::new(false));
            let cancel_handler = cancel.clone();
            ctrlc::set_handler(move || {
                cancel_handler.store(true, Ordering::SeqCst);
            })?;

            match use_case.execute(&options, &cancel) {
                Ok(outcome) => {
                    std::process::exit(outcome.exit_code());
                }
                Err(err) => {
                    eprintln!("Error: {}", err);
                    std::process::exit(err.exit_code());
                }
            }
        }
    }
}
