use std::io;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to read font file {}: {source}", path.display())]
    FontRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse font file {}: {reason}", path.display())]
    FontParse { path: PathBuf, reason: String },

    /// Carries the whole cause chain as text; speedy2d's window errors are
    /// not `Send`, so they cannot be kept as a source.
    #[error("failed to create window: {0}")]
    Window(String),
}

/// Renders an error and every `source()` below it, outermost first.
pub fn describe_chain(err: &(dyn std::error::Error + 'static)) -> String {
    let mut msg = err.to_string();
    let mut cause = err.source();
    while let Some(inner) = cause {
        msg.push_str(": caused by: ");
        msg.push_str(&inner.to_string());
        cause = inner.source();
    }
    msg
}

pub type Result<T> = std::result::Result<T, Error>;
