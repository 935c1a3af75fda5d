use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid classification label: {0}")]
    InvalidLabel(i64),
}
