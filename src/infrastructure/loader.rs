//! File-backed template source
//!
//! Parses declarative stack templates from YAML or JSON (synthesized
//! templates, e.g. CDK output, arrive as JSON). Only semantically
//! meaningful fields make it into a resource's structural payload, so
//! whitespace and formatting differences never show up as changes.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::domain::entities::ResourceDescriptor;
use crate::domain::ports::{TemplateDocument, TemplateSource, TemplateSourceError};
use crate::domain::value_objects::ResourceKind;

/// Loads templates from the local filesystem
#[derive(Debug, Clone, Copy, Default)]
pub struct FileTemplateSource;

impl FileTemplateSource {
    pub fn new() -> Self {
        Self
    }
}

impl TemplateSource for FileTemplateSource {
    fn load(&self, path: &Path) -> Result<TemplateDocument, TemplateSourceError> {
        let raw = std::fs::read_to_string(path).map_err(|err| TemplateSourceError::Read {
            path: path.to_path_buf(),
            message: err.to_string(),
        })?;

        let value = parse_body(path, &raw)?;
        let template_dir = path.parent().unwrap_or_else(|| Path::new("."));
        let resources = extract_resources(path, &value, template_dir)?;

        Ok(TemplateDocument { raw, resources })
    }

    fn child_reference(&self, descriptor: &ResourceDescriptor) -> Option<PathBuf> {
        if descriptor.kind() == ResourceKind::ChildStack {
            descriptor.code_location().map(Path::to_path_buf)
        } else {
            None
        }
    }
}

/// Parse YAML or JSON by extension; JSON bodies are valid YAML, so the
/// YAML parser is the fallback for everything else.
fn parse_body(path: &Path, raw: &str) -> Result<Value, TemplateSourceError> {
    let is_json = path
        .extension()
        .map(|ext| ext.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let parsed: Result<Value, String> = if is_json {
        serde_json::from_str(raw).map_err(|e| e.to_string())
    } else {
        serde_yaml_ng::from_str(raw).map_err(|e| e.to_string())
    };

    parsed.map_err(|message| TemplateSourceError::Parse {
        path: path.to_path_buf(),
        message,
    })
}

fn extract_resources(
    path: &Path,
    value: &Value,
    template_dir: &Path,
) -> Result<BTreeMap<String, ResourceDescriptor>, TemplateSourceError> {
    let resources = value
        .get("Resources")
        .and_then(Value::as_object)
        .ok_or_else(|| TemplateSourceError::Parse {
            path: path.to_path_buf(),
            message: "missing 'Resources' section".to_string(),
        })?;

    let mut out = BTreeMap::new();
    for (logical_id, body) in resources {
        let type_name = body
            .get("Type")
            .and_then(Value::as_str)
            .ok_or_else(|| TemplateSourceError::Parse {
                path: path.to_path_buf(),
                message: format!("resource '{logical_id}' has no 'Type'"),
            })?;
        let kind = classify(type_name);

        let mut properties = body
            .get("Properties")
            .and_then(Value::as_object)
            .cloned()
            .unwrap_or_default();

        // Pull the code-content reference out of the structural payload.
        let mut code_location = None;
        for key in code_properties(kind) {
            if let Some(Value::String(location)) = properties.get(*key) {
                if is_local_reference(location) {
                    code_location = Some(template_dir.join(location));
                    properties.remove(*key);
                    break;
                }
            }
        }

        let config = serde_json::json!({
            "Type": type_name,
            "Properties": Value::Object(properties),
        });

        let mut descriptor = ResourceDescriptor::new(logical_id.clone(), kind, config);
        if let Some(location) = code_location {
            descriptor = descriptor.with_code_location(location);
        }
        out.insert(logical_id.clone(), descriptor);
    }
    Ok(out)
}

fn classify(type_name: &str) -> ResourceKind {
    match type_name {
        "AWS::Serverless::Function" | "AWS::Lambda::Function" => ResourceKind::Function,
        "AWS::Serverless::LayerVersion" | "AWS::Lambda::LayerVersion" => ResourceKind::Layer,
        "AWS::Serverless::Api" | "AWS::ApiGateway::RestApi" => ResourceKind::RestApi,
        "AWS::Serverless::StateMachine" | "AWS::StepFunctions::StateMachine" => {
            ResourceKind::StateMachine
        }
        "AWS::Serverless::Application" | "AWS::CloudFormation::Stack" => ResourceKind::ChildStack,
        _ => ResourceKind::Other,
    }
}

/// Property names that reference code content, per kind
fn code_properties(kind: ResourceKind) -> &'static [&'static str] {
    match kind {
        ResourceKind::Function => &["CodeUri", "Code"],
        ResourceKind::Layer => &["ContentUri", "Content"],
        ResourceKind::RestApi => &["DefinitionUri"],
        ResourceKind::StateMachine => &["DefinitionUri"],
        ResourceKind::ChildStack => &["Location", "TemplateURL"],
        ResourceKind::Other => &[],
    }
}

/// Remote references (already-uploaded artifacts, hosted templates) stay in
/// the structural payload; only local paths are tracked as code content.
fn is_local_reference(location: &str) -> bool {
    !(location.starts_with("s3://")
        || location.starts_with("http://")
        || location.starts_with("https://")
        || location.starts_with("arn:"))
}
