use thiserror::Error;

#[derive(Debug, Error)]
pub enum AccelError {
    #[error("no cuBLAS library could be loaded (tried: {tried})")]
    LibraryNotFound { tried: String },

    #[error("symbol {symbol} missing from {library}")]
    SymbolMissing {
        symbol: &'static str,
        library: String,
    },
}

impl AccelError {
    /// Short machine-readable reason, stored in `AccelReport::reason`.
    pub fn reason(&self) -> String {
        match self {
            AccelError::LibraryNotFound { .. } => "library_not_found".into(),
            AccelError::SymbolMissing { symbol, .. } => format!("symbol_missing:{symbol}"),
        }
    }
}

pub type Result<T> = std::result::Result<T, AccelError>;
