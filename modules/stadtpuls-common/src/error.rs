use thiserror::Error;

#[derive(Error, Debug)]
pub enum StadtpulsError {
    #[error("Catalog error: {0}")]
    Catalog(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}
