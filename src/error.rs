use std::path::PathBuf;

use thiserror::Error;

/// Everything that can go wrong while loading, selecting or deriving a dataset.
#[derive(Debug, Error)]
pub enum DatasetError {
    /// The requested name is not among the discovered handles.
    #[error("unknown dataset handle '{0}'")]
    UnknownHandle(String),

    /// A handle with this name was already registered.
    #[error("dataset handle '{0}' is already registered")]
    DuplicateHandle(String),

    /// An item lacks an attribute the derivations depend on.
    #[error("item {index} (type '{item_type}') has no '{attribute}' attribute")]
    MissingAttribute {
        index: usize,
        item_type: String,
        attribute: String,
    },

    /// Top-level document is neither a list of items nor `{ "items": [...] }`.
    #[error("malformed dataset '{source_name}': {reason}")]
    MalformedDataset { source_name: String, reason: String },

    #[error("reading {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, DatasetError>;

impl DatasetError {
    pub fn malformed(source_name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MalformedDataset {
            source_name: source_name.into(),
            reason: reason.into(),
        }
    }
}
