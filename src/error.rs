#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ReproError {
    #[error("invalid date: {input:?} is not a YYYY-MM-DD calendar date")]
    InvalidDate { input: String },
    #[error("invalid cycle length: {days} days (must be positive)")]
    InvalidCycleLength { days: i64 },
}

pub type ReproResult<T> = Result<T, ReproError>;
