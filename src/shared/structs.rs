/***************************************/
/*        3rd party libraries          */
/***************************************/
use serde::Deserialize;
use serde::Serialize;

/***************************************/
/*           Local modules             */
/***************************************/
use crate::shared::DispatchError;

/***************************************/
/*       Public data structures        */
/***************************************/
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
    Idle,
}

impl Direction {
    pub fn opposite(self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Idle => Direction::Idle,
        }
    }

    /// Direction of travel from `from` to `to`, `Idle` when already there.
    pub fn towards(from: u8, to: u8) -> Direction {
        if to > from {
            Direction::Up
        } else if to < from {
            Direction::Down
        } else {
            Direction::Idle
        }
    }
}

/**
 * A hall call: somebody at `floor` wants to travel in `direction`.
 *
 * Requests are plain values. A request never carries `Direction::Idle`,
 * so the fields are only reachable through the constructors.
 */
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct ElevatorRequest {
    floor: u8,
    direction: Direction,
}

impl ElevatorRequest {
    pub fn new(floor: u8, direction: Direction) -> Result<ElevatorRequest, DispatchError> {
        if direction == Direction::Idle {
            return Err(DispatchError::InvalidDirection { floor });
        }
        Ok(ElevatorRequest { floor, direction })
    }

    pub fn up(floor: u8) -> ElevatorRequest {
        ElevatorRequest {
            floor,
            direction: Direction::Up,
        }
    }

    pub fn down(floor: u8) -> ElevatorRequest {
        ElevatorRequest {
            floor,
            direction: Direction::Down,
        }
    }

    pub fn floor(&self) -> u8 {
        self.floor
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }
}

/// Read-only snapshot of one elevator.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct ElevatorState {
    pub id: u8,
    pub floor: u8,
    pub direction: Direction,
}

/// Outcome of running the selection policy for a single request.
#[derive(Debug)]
pub enum Assignment {
    /// `immediate` is set when the elevator was already at the requested floor.
    Assigned { elevator_id: u8, immediate: bool },
    Unassignable,
    Failed(DispatchError),
}

impl Assignment {
    pub fn elevator_id(&self) -> Option<u8> {
        match self {
            Assignment::Assigned { elevator_id, .. } => Some(*elevator_id),
            _ => None,
        }
    }
}
