//! Common test utilities for stacksync scenario tests.
//!
//! Builds throwaway projects (template plus code directories) in temp
//! directories and wires the real infrastructure: file loader, file
//! hasher, TOML fingerprint store, and a command provider whose commands
//! append to log files so tests can assert exactly what ran.

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

use stacksync::infrastructure::CommandProvider;

pub const HELLO_TEMPLATE: &str = r#"AWSTemplateFormatVersion: '2010-09-09'
Transform: AWS::Serverless-2016-10-31
Resources:
  HelloWorldFunction:
    Type: AWS::Serverless::Function
    Properties:
      CodeUri: src/hello
      Handler: app.handler
      Runtime: python3.11
  HelloTable:
    Type: AWS::DynamoDB::Table
    Properties:
      BillingMode: PAY_PER_REQUEST
"#;

pub const NESTED_ROOT_TEMPLATE: &str = r#"AWSTemplateFormatVersion: '2010-09-09'
Transform: AWS::Serverless-2016-10-31
Resources:
  RootFunction:
    Type: AWS::Serverless::Function
    Properties:
      CodeUri: src/root
      Handler: app.handler
  ChildStack:
    Type: AWS::Serverless::Application
    Properties:
      Location: child/template.yaml
"#;

pub const NESTED_CHILD_TEMPLATE: &str = r#"AWSTemplateFormatVersion: '2010-09-09'
Transform: AWS::Serverless-2016-10-31
Resources:
  NestedFunction:
    Type: AWS::Serverless::Function
    Properties:
      CodeUri: src/nested
      Handler: app.handler
"#;

/// A throwaway project directory holding a template tree and code
pub struct Project {
    pub root: TempDir,
}

impl Project {
    /// Single-stack project with one function and one plain resource
    pub fn hello_world() -> Self {
        let project = Self {
            root: TempDir::new().unwrap(),
        };
        project.write_template("template.yaml", HELLO_TEMPLATE);
        project.write_code("src/hello/app.py", "def handler(event, context): return 1\n");
        project
    }

    /// Two-level project with a nested stack referenced by local path
    pub fn nested() -> Self {
        let project = Self {
            root: TempDir::new().unwrap(),
        };
        project.write_template("template.yaml", NESTED_ROOT_TEMPLATE);
        project.write_template("child/template.yaml", NESTED_CHILD_TEMPLATE);
        project.write_code("src/root/app.py", "root v1\n");
        project.write_code("child/src/nested/app.py", "nested v1\n");
        project
    }

    pub fn path(&self, relative: &str) -> PathBuf {
        self.root.path().join(relative)
    }

    pub fn template_path(&self) -> PathBuf {
        self.path("template.yaml")
    }

    pub fn write_template(&self, relative: &str, content: &str) {
        let path = self.path(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, content).unwrap();
    }

    pub fn write_code(&self, relative: &str, content: &str) {
        let path = self.path(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, content).unwrap();
    }

    pub fn fingerprint_file(&self, identity: &str) -> PathBuf {
        self.path(&format!(".stacksync/{}.fingerprint.toml", identity))
    }
}

/// Provider whose deploy and code-sync commands append to log files
///
/// `deploy.log` gets one line per full deploy; `code.log` gets the
/// qualified resource id of every code update.
pub struct LoggingProvider {
    pub deploy_log: PathBuf,
    pub code_log: PathBuf,
}

impl LoggingProvider {
    pub fn new(dir: &Path) -> Self {
        Self {
            deploy_log: dir.join("deploy.log"),
            code_log: dir.join("code.log"),
        }
    }

    pub fn provider(&self) -> CommandProvider {
        CommandProvider::new(
            Some(format!(
                "echo \"$STACKSYNC_STACK\" >> '{}'",
                self.deploy_log.display()
            )),
            Some(format!(
                "echo \"$STACKSYNC_RESOURCE\" >> '{}'",
                self.code_log.display()
            )),
        )
    }

    /// Provider whose deploy command fails with the given stderr message
    pub fn rejecting(&self, message: &str) -> CommandProvider {
        CommandProvider::new(
            Some(format!("echo '{}' >&2; exit 1", message)),
            Some(format!(
                "echo \"$STACKSYNC_RESOURCE\" >> '{}'",
                self.code_log.display()
            )),
        )
    }

    pub fn deploys(&self) -> Vec<String> {
        read_log(&self.deploy_log)
    }

    pub fn code_syncs(&self) -> Vec<String> {
        read_log(&self.code_log)
    }
}

fn read_log(path: &Path) -> Vec<String> {
    match fs::read_to_string(path) {
        Ok(content) => content.lines().map(str::to_string).collect(),
        Err(_) => Vec::new(),
    }
}
