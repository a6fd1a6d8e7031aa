use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum BucketError {
    #[error("rate must be a positive finite number, got {0}")]
    InvalidRate(f64),
    #[error("capacity must be a positive finite number, got {0}")]
    InvalidCapacity(f64),
}

pub(crate) fn check_params(rate: f64, capacity: f64) -> Result<(), BucketError> {
    if !(rate.is_finite() && rate > 0.0) {
        return Err(BucketError::InvalidRate(rate));
    }
    if !(capacity.is_finite() && capacity > 0.0) {
        return Err(BucketError::InvalidCapacity(capacity));
    }
    Ok(())
}
