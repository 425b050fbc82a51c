/***************************************/
/*        3rd party libraries          */
/***************************************/
use std::sync::Arc;

/***************************************/
/*           Local modules             */
/***************************************/
use crate::building::Elevator;
use crate::shared::{DispatchError, DispatchResult};

/**
 * The building served by the dispatcher.
 *
 * Immutable after construction. Elevators are numbered 1..=`n_elevators`
 * and all start parked at floor 0.
 */
#[derive(Debug)]
pub struct Building {
    n_floors: u8,
    elevators: Vec<Arc<Elevator>>,
}

impl Building {
    pub fn new(n_floors: u8, n_elevators: u8) -> DispatchResult<Building> {
        if n_floors == 0 || n_elevators == 0 {
            return Err(DispatchError::InvalidBuilding {
                n_floors,
                n_elevators,
            });
        }

        Ok(Building {
            n_floors,
            elevators: (1..=n_elevators).map(|id| Arc::new(Elevator::new(id))).collect(),
        })
    }

    pub fn n_floors(&self) -> u8 {
        self.n_floors
    }

    pub fn top_floor(&self) -> u8 {
        self.n_floors - 1
    }

    pub fn elevators(&self) -> &[Arc<Elevator>] {
        &self.elevators
    }

    pub fn elevator(&self, id: u8) -> Option<&Arc<Elevator>> {
        self.elevators.iter().find(|elevator| elevator.id() == id)
    }

    pub fn contains_floor(&self, floor: u8) -> bool {
        floor < self.n_floors
    }
}
