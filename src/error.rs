use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Fatal errors of a conversion run.
#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("failed to read document {}", path.display())]
    DocumentRead {
        path: PathBuf,
        #[source]
        source: DocxError,
    },
    #[error("failed to write {}", path.display())]
    OutputWrite {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to read answer")]
    Prompt(#[source] io::Error),
}

impl ConvertError {
    pub fn output_write(path: impl Into<PathBuf>, source: impl Into<io::Error>) -> Self {
        ConvertError::OutputWrite {
            path: path.into(),
            source: source.into(),
        }
    }
}

/// Why a `.docx` could not be read.
#[derive(Debug, Error)]
pub enum DocxError {
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error("not a docx archive")]
    Zip(#[from] zip::result::ZipError),
    #[error("malformed XML")]
    Xml(#[from] quick_xml::Error),
    #[error("malformed XML attribute")]
    Attr(#[from] quick_xml::events::attributes::AttrError),
    #[error("archive has no {0}")]
    MissingPart(&'static str),
}

/// Why an existing index was discarded. Never fatal.
#[derive(Debug, Error)]
pub enum IndexParseError {
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("top level is not an object")]
    NotAnObject,
}
