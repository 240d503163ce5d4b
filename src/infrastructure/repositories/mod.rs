//! Repository implementations

mod fingerprint;

pub use fingerprint::TomlFingerprintRepository;
