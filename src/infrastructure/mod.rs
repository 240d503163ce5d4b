//! Infrastructure Layer
//!
//! Concrete implementations of domain ports.
//! This layer handles all I/O operations.
//!
//! ## Structure
//!
//! - `loader` - Template loading and parsing (YAML/JSON)
//! - `hasher` - Filesystem code-content hashing
//! - `provider` - Command-backed deploy/code-sync bridge
//! - `repositories/` - Fingerprint persistence and session locking
//! - `events` / `prompt` - Console observability and confirmation

pub mod events;
pub mod fs;
pub mod hasher;
pub mod loader;
pub mod prompt;
pub mod provider;
pub mod repositories;

// Re-export for convenience
pub use events::ConsoleEventSink;
pub use hasher::FileCodeHasher;
pub use loader::FileTemplateSource;
pub use prompt::DialoguerConfirmation;
pub use provider::CommandProvider;
pub use repositories::TomlFingerprintRepository;
