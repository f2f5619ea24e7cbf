use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Catalog not loaded: call load() before searching")]
    CatalogNotLoaded,

    #[error("Catalog was embedded with '{catalog}' but the provider is '{provider}'")]
    EmbedderMismatch { catalog: String, provider: String },

    #[error("Unknown query type: {0}")]
    UnknownQuery(String),

    #[error("Invalid catalog: {0}")]
    InvalidCatalog(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Embedding provider failed: {0}")]
    Provider(#[source] anyhow::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),
}

impl Error {
    /// Caller errors are reported and never worth retrying.
    pub fn is_caller_error(&self) -> bool {
        matches!(
            self,
            Self::CatalogNotLoaded | Self::EmbedderMismatch { .. } | Self::UnknownQuery(_) | Self::InvalidConfig(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, Error>;
