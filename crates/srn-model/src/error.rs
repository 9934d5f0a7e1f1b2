use thiserror::Error;

#[derive(Debug, Error)]
pub enum NormalizeError {
    #[error("source table has {found} columns after flattening, template requires {expected}")]
    TooFewColumns { found: usize, expected: usize },
}
