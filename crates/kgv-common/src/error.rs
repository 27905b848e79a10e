use thiserror::Error;

/// Top-level error type for KgView.
/// Each variant corresponds to one failure class of the ingestion,
/// query or edit paths. None of them is fatal: the next operation can
/// always proceed from the unchanged prior state.
#[derive(Error, Debug)]
pub enum KgvError {
    /// Malformed JSON or RDF text. The whole ingestion run fails.
    #[error("parse error: {0}")]
    Parse(String),

    #[error("query syntax error: {0}")]
    QuerySyntax(String),

    #[error("referential integrity error: {0}")]
    ReferentialIntegrity(String),

    #[error("duplicate id: {0}")]
    DuplicateId(String),

    #[error("import error: {0}")]
    Import(String),

    #[error("export error: {0}")]
    Export(String),

    #[error("cancelled")]
    Cancelled,

    #[error("io error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
}

pub type KgvResult<T> = Result<T, KgvError>;
