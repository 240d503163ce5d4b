//! Property tests for structural hashing.
//!
//! The structural hash must be a function of template structure alone:
//! declaration order, serialization format and code content never move it.

mod common;

use std::fmt::Write as _;

use proptest::prelude::*;

use common::Project;
use stacksync::domain::services::{ChangeDetector, TemplateResolver};
use stacksync::infrastructure::FileTemplateSource;

fn logical_id() -> impl Strategy<Value = String> {
    proptest::string::string_regex("[A-Z][A-Za-z0-9]{2,12}").unwrap()
}

fn runtime() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("python3.11".to_string()),
        Just("python3.12".to_string()),
        Just("nodejs20.x".to_string()),
    ]
}

/// A small single-stack template with one function per entry
fn render_template(functions: &[(String, String)]) -> String {
    let mut out = String::from("Resources:\n");
    for (id, rt) in functions {
        write!(
            out,
            "  {id}:\n    Type: AWS::Serverless::Function\n    Properties:\n      CodeUri: src/{id}\n      Runtime: {rt}\n",
        )
        .unwrap();
    }
    out
}

fn hash_project(template: &str, functions: &[(String, String)], code: &str) -> String {
    let project = Project {
        root: tempfile::TempDir::new().unwrap(),
    };
    project.write_template("template.yaml", template);
    for (id, _) in functions {
        project.write_code(&format!("src/{}/app.py", id), code);
    }
    let source = FileTemplateSource::new();
    let resolved = TemplateResolver::new(&source)
        .resolve(&project.template_path())
        .unwrap();
    ChangeDetector::structural_hash(&resolved).to_string()
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 32,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: declaration order of resources never changes the hash.
    #[test]
    fn declaration_order_is_irrelevant(
        mut functions in proptest::collection::btree_map(logical_id(), runtime(), 2..5)
            .prop_map(|m| m.into_iter().collect::<Vec<_>>())
    ) {
        let forward = render_template(&functions);
        functions.reverse();
        let reversed = render_template(&functions);

        prop_assert_eq!(
            hash_project(&forward, &functions, "code"),
            hash_project(&reversed, &functions, "code")
        );
    }

    /// PROPERTY: code content never feeds the structural hash.
    #[test]
    fn code_content_is_irrelevant(
        functions in proptest::collection::btree_map(logical_id(), runtime(), 1..4)
            .prop_map(|m| m.into_iter().collect::<Vec<_>>()),
        code_a in ".{0,64}",
        code_b in ".{0,64}",
    ) {
        let template = render_template(&functions);
        prop_assert_eq!(
            hash_project(&template, &functions, &code_a),
            hash_project(&template, &functions, &code_b)
        );
    }

    /// PROPERTY: any configuration difference moves the hash.
    #[test]
    fn runtime_edit_moves_the_hash(
        functions in proptest::collection::btree_map(logical_id(), Just("python3.11".to_string()), 1..4)
            .prop_map(|m| m.into_iter().collect::<Vec<_>>()),
    ) {
        let before = render_template(&functions);
        let edited: Vec<_> = functions
            .iter()
            .enumerate()
            .map(|(i, (id, rt))| {
                if i == 0 {
                    (id.clone(), "python3.12".to_string())
                } else {
                    (id.clone(), rt.clone())
                }
            })
            .collect();
        let after = render_template(&edited);

        prop_assert_ne!(
            hash_project(&before, &functions, "code"),
            hash_project(&after, &functions, "code")
        );
    }
}

/// Equivalent YAML and JSON templates hash identically.
#[test]
fn yaml_and_json_templates_hash_identically() {
    let yaml = "Resources:\n  Fn:\n    Type: AWS::Serverless::Function\n    Properties:\n      CodeUri: src/Fn\n      Runtime: python3.11\n";
    let json = r#"{"Resources":{"Fn":{"Type":"AWS::Serverless::Function","Properties":{"CodeUri":"src/Fn","Runtime":"python3.11"}}}}"#;

    let yaml_project = Project {
        root: tempfile::TempDir::new().unwrap(),
    };
    yaml_project.write_template("template.yaml", yaml);
    yaml_project.write_code("src/Fn/app.py", "a");

    let json_project = Project {
        root: tempfile::TempDir::new().unwrap(),
    };
    json_project.write_template("template.json", json);
    json_project.write_code("src/Fn/app.py", "a");

    let source = FileTemplateSource::new();
    let from_yaml = TemplateResolver::new(&source)
        .resolve(&yaml_project.template_path())
        .unwrap();
    let from_json = TemplateResolver::new(&source)
        .resolve(&json_project.path("template.json"))
        .unwrap();

    assert_eq!(
        ChangeDetector::structural_hash(&from_yaml),
        ChangeDetector::structural_hash(&from_json)
    );
}
