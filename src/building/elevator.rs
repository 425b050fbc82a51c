/***************************************/
/*        3rd party libraries          */
/***************************************/
use log::warn;
use std::sync::{Mutex, MutexGuard};

/***************************************/
/*           Local modules             */
/***************************************/
use crate::shared::{Direction, DispatchError, DispatchResult, ElevatorState};

/// Floor and service direction of one car, guarded together.
#[derive(Debug, Clone, Copy)]
pub struct Position {
    pub floor: u8,
    pub direction: Direction,
}

/**
 * One elevator car.
 *
 * The identity is fixed. The position is written by the car's own movement
 * loop. The dispatcher writes it only when it commits an idle car to a
 * direction, and that write happens while it holds the same lock.
 *
 * # Fields
 * - `id`:          Identity, 1..=N within a building.
 * - `position`:    Current floor and direction.
 */
#[derive(Debug)]
pub struct Elevator {
    id: u8,
    position: Mutex<Position>,
}

impl Elevator {
    pub fn new(id: u8) -> Elevator {
        Elevator {
            id,
            position: Mutex::new(Position {
                floor: 0,
                direction: Direction::Idle,
            }),
        }
    }

    pub fn id(&self) -> u8 {
        self.id
    }

    pub fn state(&self) -> DispatchResult<ElevatorState> {
        let position = self.lock()?;
        Ok(ElevatorState {
            id: self.id,
            floor: position.floor,
            direction: position.direction,
        })
    }

    pub fn lock(&self) -> DispatchResult<MutexGuard<'_, Position>> {
        self.position
            .lock()
            .map_err(|_| DispatchError::Poisoned(self.id))
    }

    /// Clears a poisoned lock so the car can keep serving.
    pub fn recover(&self) {
        if self.position.is_poisoned() {
            warn!("Elevator {} recovering poisoned state", self.id);
            self.position.clear_poison();
        }
    }

    #[cfg(test)]
    pub(crate) fn poison(&self) {
        let position = &self.position;
        let _ = std::thread::scope(|s| {
            s.spawn(|| {
                let _guard = position.lock();
                panic!("poisoning elevator state");
            })
            .join()
        });
    }
}
