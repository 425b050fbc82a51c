/***************************************/
/*        3rd party libraries          */
/***************************************/
use crossbeam_channel as cbc;
use log::{debug, info, warn};
use serde::Serialize;

/***************************************/
/*           Local modules             */
/***************************************/
use crate::shared::Direction;

/***************************************/
/*       Public data structures        */
/***************************************/
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(tag = "event")]
pub enum DispatchEvent {
    RequestAssigned {
        elevator_id: u8,
        floor: u8,
        direction: Direction,
    },
    RequestUnassignable {
        floor: u8,
        direction: Direction,
    },
    ElevatorMoved {
        elevator_id: u8,
        floor: u8,
    },
    ElevatorArrived {
        elevator_id: u8,
        floor: u8,
    },
}

/**
 * Fan-out point for dispatch events.
 *
 * Every event is written to the log. If a channel was supplied the event is
 * also forwarded on it without blocking. Events are advisory: when the channel
 * is full the event is dropped, and a disconnected receiver is ignored.
 */
#[derive(Clone, Default)]
pub struct EventSink {
    event_tx: Option<cbc::Sender<DispatchEvent>>,
}

impl EventSink {
    pub fn new(event_tx: Option<cbc::Sender<DispatchEvent>>) -> EventSink {
        EventSink { event_tx }
    }

    pub fn emit(&self, event: DispatchEvent) {
        match &event {
            DispatchEvent::RequestAssigned {
                elevator_id,
                floor,
                direction,
            } => info!(
                "Request ({}, {:?}) assigned to elevator {}",
                floor, direction, elevator_id
            ),
            DispatchEvent::RequestUnassignable { floor, direction } => {
                warn!("No elevator available for request ({}, {:?})", floor, direction)
            }
            DispatchEvent::ElevatorMoved { elevator_id, floor } => {
                debug!("Elevator {} passing floor {}", elevator_id, floor)
            }
            DispatchEvent::ElevatorArrived { elevator_id, floor } => {
                info!("Elevator {} arrived at floor {}", elevator_id, floor)
            }
        }

        // Never block the caller on a slow consumer
        if let Some(tx) = &self.event_tx {
            match tx.try_send(event) {
                Ok(()) | Err(cbc::TrySendError::Disconnected(_)) => {}
                Err(cbc::TrySendError::Full(event)) => {
                    debug!("Event channel full, dropping {:?}", event)
                }
            }
        }
    }
}
