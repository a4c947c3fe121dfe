use miette::{Diagnostic, SourceSpan};
use thiserror::Error;

pub type DialogueResult<T> = Result<T, DialogueError>;

/// Failures at the loading boundary. Playback itself never fails.
#[derive(Debug, Error, Diagnostic)]
pub enum DialogueError {
    #[error("script validation failed: {0}")]
    #[diagnostic(code("dialogue.invalid_script"))]
    InvalidScript(String),
    #[error("resource limit exceeded: {0}")]
    #[diagnostic(code("dialogue.resource_limit"))]
    ResourceLimit(String),
    #[error("security policy violation: {0}")]
    #[diagnostic(code("dialogue.security_policy"))]
    SecurityPolicy(String),
    #[error("serialization error: {message}")]
    #[diagnostic(code("dialogue.serialization"))]
    Serialization {
        message: String,
        #[source_code]
        src: String,
        #[label("here")]
        span: SourceSpan,
    },
    #[error("config error: {0}")]
    #[diagnostic(code("dialogue.config"))]
    Config(String),
    #[error("io error: {0}")]
    #[diagnostic(code("dialogue.io"))]
    Io(#[from] std::io::Error),
}
