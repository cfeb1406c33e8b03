use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GameError {
    #[error("Invalid card: {0:?}")]
    InvalidCard(String),
    #[error("Invalid round result: {0:?}")]
    InvalidOutcome(String),
    #[error("Hand total out of range: {0} (expected 0-9)")]
    TotalOutOfRange(u8),
    #[error("Card point value out of range: {0} (expected 0-9)")]
    PointOutOfRange(u8),
    #[error("Too many cards for one hand: {count} (maximum {maximum})")]
    TooManyCards { count: usize, maximum: usize },
}
