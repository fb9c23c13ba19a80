use hw_core::VehicleId;
use hw_road::RoadError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("road protocol error: {0}")]
    Road(#[from] RoadError),

    #[error("could not start a thread for {vehicle}: {source}")]
    Spawn {
        vehicle: VehicleId,
        #[source]
        source:  std::io::Error,
    },

    #[error("task for {0} panicked")]
    TaskPanicked(VehicleId),
}

pub type SimResult<T> = Result<T, SimError>;
