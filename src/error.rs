use thiserror::Error;

#[derive(Error, Debug)]
pub enum BotError {
    #[error("Failed to launch Chrome: {0}")]
    LaunchFailed(String),

    #[error("Navigation failed: {0}")]
    NavigationFailed(String),

    #[error("Element not found: {0}")]
    ElementNotFound(String),

    #[error("No page available")]
    NoPage,

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Unknown locale: {0}")]
    UnknownLocale(String),

    #[error("Report writer error: {0}")]
    Report(String),

    #[error("CDP error: {0}")]
    Cdp(#[from] chromiumoxide::error::CdpError),

    #[error("Other error: {0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, BotError>;
