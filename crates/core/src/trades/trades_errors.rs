use thiserror::Error;

/// Errors specific to trade records and their persistence.
#[derive(Error, Debug)]
pub enum TradeError {
    #[error("Invalid trade type: {0}")]
    InvalidType(String),
}
