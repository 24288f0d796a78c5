//! Error types for the configuration compiler

use std::path::PathBuf;

/// Which configuration section an invalid entry came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Job,
    Connection,
    Trigger,
}

impl std::fmt::Display for EntryKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            EntryKind::Job => "job",
            EntryKind::Connection => "connection",
            EntryKind::Trigger => "trigger",
        };
        f.write_str(s)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CompileError {
    #[error("required configuration section '{section}' is missing")]
    ConfigurationMissing { section: String },

    #[error("{kind} entry #{index} is missing mandatory field '{field}'")]
    ConfigurationInvalid {
        kind: EntryKind,
        index: usize,
        field: &'static str,
    },

    #[error("failed to publish script for job '{job}': {source}")]
    ArtifactUpload {
        job: String,
        #[source]
        source: PublishError,
    },

    #[error("logical id '{id}' produced by both {first} and {second}")]
    IdentifierCollision {
        id: String,
        first: String,
        second: String,
    },

    #[error("'{name}' cannot be turned into a logical id")]
    InvalidName { name: String },
}

/// Failures of the artifact publisher
#[derive(Debug, thiserror::Error)]
pub enum PublishError {
    #[error("cannot read script {path}: {source}")]
    ReadScript {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("upload request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("upload rejected with status {status}")]
    Rejected { status: u16 },

    #[error("invalid storage endpoint '{0}'")]
    InvalidEndpoint(String),
}

pub type Result<T, E = CompileError> = std::result::Result<T, E>;
