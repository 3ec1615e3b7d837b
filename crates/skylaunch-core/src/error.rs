use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    #[error("No availability domains to try")]
    NoZones,

    #[error("Backoff floor must be greater than zero")]
    ZeroBackoffFloor,

    #[error("Backoff floor {}s exceeds ceiling {}s", floor.as_secs(), ceiling.as_secs())]
    BackoffFloorAboveCeiling { floor: Duration, ceiling: Duration },
}

pub type Result<T> = std::result::Result<T, CoreError>;
