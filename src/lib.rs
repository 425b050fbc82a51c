//! Multi-elevator dispatch simulation.
//!
//! A [`Dispatcher`] assigns hall calls to the nearest eligible elevator and
//! runs one [`ElevatorFSM`] thread per car. Each car sweeps its current
//! direction until that stop queue is empty before it turns around.

/* Modules */
pub mod building;
pub mod config;
pub mod coordinator;
pub mod elevator;
pub mod generator;
pub mod shared;

/* Re-exports */
pub use building::{Building, Elevator};
pub use config::Config;
pub use coordinator::Dispatcher;
pub use elevator::{ElevatorFSM, StopQueues};
pub use generator::RequestGenerator;
pub use shared::{
    Assignment, Direction, DispatchError, DispatchEvent, ElevatorRequest, ElevatorState,
};
