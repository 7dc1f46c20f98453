/// Errors that can occur while loading a catalog file.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV parse error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Missing required column: {0}")]
    MissingColumn(String),
}
