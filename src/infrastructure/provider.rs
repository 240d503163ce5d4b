//! Command-backed stack provider
//!
//! Bridges to whatever deployment tooling the user already has by running
//! configured shell commands. Sync context is passed through `STACKSYNC_*`
//! environment variables so the commands stay declarative.

use std::process::{Command, Stdio};

use crate::domain::entities::ResolvedTemplate;
use crate::domain::ports::{DeployOutcome, DeployParameters, ProviderError, StackProvider};
use crate::domain::value_objects::ChangedResource;

/// Runs user-configured commands for deploys and per-resource code updates
///
/// The deploy command receives the stack identity and parameters via
/// environment variables and signals a fresh stack creation by printing
/// `created` as its first line of output; anything else counts as an
/// update. The code-sync command receives the qualified resource id and
/// its code path the same way.
pub struct CommandProvider {
    deploy_command: Option<String>,
    code_sync_command: Option<String>,
}

impl CommandProvider {
    pub fn new(deploy_command: Option<String>, code_sync_command: Option<String>) -> Self {
        Self {
            deploy_command,
            code_sync_command,
        }
    }

    fn run(command: &str, env: &[(&str, String)]) -> Result<String, ProviderError> {
        let mut cmd = Command::new("sh");
        cmd.arg("-c")
            .arg(command)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        for (key, value) in env {
            cmd.env(key, value);
        }

        let output = cmd
            .output()
            .map_err(|err| ProviderError::new(format!("failed to run command: {}", err)))?;

        if output.status.success() {
            Ok(String::from_utf8_lossy(&output.stdout).into_owned())
        } else {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let message = match stderr.trim() {
                "" => format!("command exited with {:?}", output.status.code()),
                detail => detail.to_string(),
            };
            Err(ProviderError::new(message))
        }
    }
}

impl StackProvider for CommandProvider {
    fn deploy(
        &self,
        template: &ResolvedTemplate,
        parameters: &DeployParameters,
    ) -> Result<DeployOutcome, ProviderError> {
        let command = self
            .deploy_command
            .as_deref()
            .ok_or_else(|| ProviderError::new("no deploy command configured"))?;

        let root = template
            .root()
            .ok_or_else(|| ProviderError::new("resolved template has no root stack"))?;

        let mut env = vec![
            ("STACKSYNC_STACK", parameters.stack_identity.clone()),
            ("STACKSYNC_TEMPLATE_BODY", root.raw().to_string()),
        ];
        if !parameters.parameter_overrides.is_empty() {
            env.push((
                "STACKSYNC_PARAMETER_OVERRIDES",
                join_pairs(&parameters.parameter_overrides),
            ));
        }
        if !parameters.tags.is_empty() {
            env.push(("STACKSYNC_TAGS", join_pairs(&parameters.tags)));
        }
        if !parameters.capabilities.is_empty() {
            env.push(("STACKSYNC_CAPABILITIES", parameters.capabilities.join(" ")));
        }
        if let Some(bucket) = &parameters.artifact_bucket {
            env.push(("STACKSYNC_S3_BUCKET", bucket.clone()));
        }
        if let Some(prefix) = &parameters.artifact_prefix {
            env.push(("STACKSYNC_S3_PREFIX", prefix.clone()));
        }
        if let Some(key) = &parameters.kms_key_id {
            env.push(("STACKSYNC_KMS_KEY_ID", key.clone()));
        }
        if let Some(repo) = &parameters.image_repository {
            env.push(("STACKSYNC_IMAGE_REPOSITORY", repo.clone()));
        }
        if !parameters.image_repositories.is_empty() {
            env.push((
                "STACKSYNC_IMAGE_REPOSITORIES",
                join_pairs(&parameters.image_repositories),
            ));
        }

        let stdout = Self::run(command, &env)?;
        if stdout.lines().next().map(str::trim) == Some("created") {
            Ok(DeployOutcome::Created)
        } else {
            Ok(DeployOutcome::Updated)
        }
    }

    fn update_resource_code(&self, resource: &ChangedResource) -> Result<(), ProviderError> {
        let command = self
            .code_sync_command
            .as_deref()
            .ok_or_else(|| ProviderError::new("no code sync command configured"))?;

        let mut env = vec![("STACKSYNC_RESOURCE", resource.qualified_id.clone())];
        if let Some(path) = resource.descriptor.code_location() {
            env.push(("STACKSYNC_CODE_PATH", path.display().to_string()));
        }
        env.push((
            "STACKSYNC_RESOURCE_KIND",
            resource.descriptor.kind().as_str().to_string(),
        ));

        Self::run(command, &env).map(|_| ())
    }
}

fn join_pairs(pairs: &std::collections::BTreeMap<String, String>) -> String {
    pairs
        .iter()
        .map(|(key, value)| format!("{}={}", key, value))
        .collect::<Vec<_>>()
        .join(" ")
}
