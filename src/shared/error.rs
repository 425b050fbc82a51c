/***************************************/
/*        3rd party libraries          */
/***************************************/
use thiserror::Error;

/***************************************/
/*       Public data structures        */
/***************************************/
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("floor {floor} is outside the building (0..{n_floors})")]
    InvalidFloor { floor: u8, n_floors: u8 },

    #[error("request for floor {floor} has no direction")]
    InvalidDirection { floor: u8 },

    #[error("a building needs at least one floor and one elevator (got {n_floors} floors, {n_elevators} elevators)")]
    InvalidBuilding { n_floors: u8, n_elevators: u8 },

    #[error("elevator {0} does not exist")]
    UnknownElevator(u8),

    #[error("state of elevator {0} is poisoned")]
    Poisoned(u8),

    #[error("failed to spawn elevator thread: {0}")]
    Spawn(#[from] std::io::Error),
}

pub type DispatchResult<T> = Result<T, DispatchError>;
