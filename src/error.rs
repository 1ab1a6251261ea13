use std::path::PathBuf;

/// Every way a shipping run can fail. All of them are fatal.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid configuration: {message}")]
    Config {
        message: String,
        #[source]
        source: Option<anyhow::Error>,
    },
    #[error("unable to find github credentials, set GITHUB_TOKEN or GITHUB_USER and GITHUB_PASSWORD")]
    Credential,
    #[error("error {operation} for {repository}")]
    Registry {
        operation: &'static str,
        repository: String,
        #[source]
        source: anyhow::Error,
    },
    #[error("cannot find sha for tag {tag:?}")]
    Resolution {
        tag: String,
        #[source]
        source: anyhow::Error,
    },
    #[error("source file {path:?} for asset {name:?} not found")]
    SourceNotFound {
        name: String,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("asset {name:?} size did not match (remote {remote_size} bytes, local {local_size} bytes)")]
    AssetConflict {
        name: String,
        remote_size: u64,
        local_size: u64,
    },
    #[error("error uploading asset {name:?} from {path:?}")]
    Upload {
        name: String,
        path: PathBuf,
        #[source]
        source: anyhow::Error,
    },
}

impl Error {
    pub(crate) fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            source: None,
        }
    }

    pub(crate) fn config_with(message: impl Into<String>, source: impl Into<anyhow::Error>) -> Self {
        Self::Config {
            message: message.into(),
            source: Some(source.into()),
        }
    }
}

impl Error {
    /// The message followed by every underlying cause, separated by `: `.
    pub fn display_chain(&self) -> String {
        let mut out = self.to_string();
        let mut cause = std::error::Error::source(self);
        while let Some(err) = cause {
            out.push_str(": ");
            out.push_str(&err.to_string());
            cause = err.source();
        }
        out
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
