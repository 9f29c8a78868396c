use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum CatalogError {
    #[error("Catalog resource not found: {0}")]
    NotFound(String),
    #[error("Catalog returned status {status} for {url}")]
    Status { status: u16, url: String },
    #[error("Catalog transport error: {0}")]
    Transport(String),
    #[error("Catalog response could not be decoded: {0}")]
    Decode(String),
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Store I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Cart could not be encoded: {0}")]
    Encode(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Error, PartialEq)]
pub enum ConfigError {
    #[error("Invalid API base URL {url}: {reason}")]
    InvalidBaseUrl { url: String, reason: String },
    #[error("Invalid value for {var}: {value}")]
    InvalidValue { var: &'static str, value: String },
}

/// Failures of the cart plumbing itself. Cart operations never surface their
/// own rejections through this type; those become notifications.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum CartError {
    #[error("Cart service closed")]
    ServiceClosed,
    #[error("Cart service dropped the request")]
    ServiceDropped,
    #[error("Cart service task failed: {0}")]
    ServiceFailed(String),
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("Catalog setup error: {0}")]
    Catalog(#[from] CatalogError),
    #[error("Store setup error: {0}")]
    Store(String),
}

impl From<StoreError> for CartError {
    fn from(e: StoreError) -> Self {
        CartError::Store(e.to_string())
    }
}

/// Errors a page can hit while assembling what it renders.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ViewError {
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    #[error(transparent)]
    Cart(#[from] CartError),
}
