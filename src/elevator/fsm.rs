/***************************************/
/*        3rd party libraries          */
/***************************************/
use crossbeam_channel as cbc;
use log::{debug, error, info};
use std::cell::Cell;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::time::Duration;

/***************************************/
/*           Local modules             */
/***************************************/
use crate::building::Elevator;
use crate::config::ElevatorConfig;
use crate::elevator::StopQueues;
use crate::shared::{Direction, DispatchEvent, DispatchResult, EventSink};

/// Pause before re-entering the loop after a fault.
pub const FAULT_BACKOFF: Duration = Duration::from_millis(100);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Terminate,
}

/**
 * Movement loop of a single elevator.
 *
 * The `ElevatorFSM` drains the elevator's stop queues. It sweeps one direction
 * until that queue is empty, then switches to the opposite queue if it has
 * stops, and otherwise parks as idle until a new stop wakes it up. Travel is
 * simulated one floor at a time.
 *
 * # Fields
 * - `elevator`:                The car this loop moves. Only this loop changes its floor.
 * - `queues`:                  Up and down stops, shared with the dispatcher.
 * - `events`:                  Sink for movement and arrival events.
 * - `wake_rx`:                 Receives a token whenever a stop is added.
 * - `terminate_rx`:            Stops the loop when a message arrives or the sender is dropped.
 * - `in_flight`:               Stop the car is travelling to, re-queued if the trip faults.
 * - `time_between_floors`:     Time spent on each single-floor step.
 * - `passenger_transfer_time`: Time the doors stay open at a stop.
 */
pub struct ElevatorFSM {
    elevator: Arc<Elevator>,
    queues: Arc<StopQueues>,
    events: EventSink,
    wake_rx: cbc::Receiver<()>,
    terminate_rx: cbc::Receiver<()>,
    in_flight: Cell<Option<(Direction, u8)>>,
    time_between_floors: Duration,
    passenger_transfer_time: Duration,
}

impl ElevatorFSM {
    pub fn new(
        config: &ElevatorConfig,
        elevator: Arc<Elevator>,
        queues: Arc<StopQueues>,
        events: EventSink,
        terminate_rx: cbc::Receiver<()>,
    ) -> ElevatorFSM {
        ElevatorFSM {
            wake_rx: queues.wake_rx(),
            elevator,
            queues,
            events,
            terminate_rx,
            in_flight: Cell::new(None),
            time_between_floors: config.time_between_floors(),
            passenger_transfer_time: config.passenger_transfer_time(),
        }
    }

    pub fn run(self) {
        let id = self.elevator.id();
        info!("Elevator {} in service", id);

        // Main loop
        loop {
            let flow = match panic::catch_unwind(AssertUnwindSafe(|| self.run_iteration())) {
                Ok(Ok(flow)) => flow,
                Ok(Err(e)) => {
                    error!("Elevator {} fault: {}", id, e);
                    self.recover()
                }
                Err(_) => {
                    error!("Elevator {} movement loop panicked, re-entering", id);
                    self.recover()
                }
            };

            if flow == Flow::Terminate {
                break;
            }
        }

        info!("Elevator {} out of service", id);
    }

    fn run_iteration(&self) -> DispatchResult<Flow> {
        match self.choose_direction()? {
            Direction::Idle => Ok(self.wait_for_stop()),
            direction => self.serve(direction),
        }
    }

    fn choose_direction(&self) -> DispatchResult<Direction> {
        let mut position = self.elevator.lock()?;

        // An idle car looks up first
        let current = match position.direction {
            Direction::Idle => Direction::Up,
            direction => direction,
        };

        let next = if self.queues.has_stops(current)? {
            current
        } else if self.queues.has_stops(current.opposite())? {
            current.opposite()
        } else {
            Direction::Idle
        };

        if next != position.direction {
            debug!(
                "Elevator {} direction {:?} -> {:?}",
                self.elevator.id(),
                position.direction,
                next
            );
            position.direction = next;
        }
        Ok(next)
    }

    fn serve(&self, direction: Direction) -> DispatchResult<Flow> {
        while let Some(target) = self.queues.pop_next(direction)? {
            self.in_flight.set(Some((direction, target)));
            let flow = self.travel_to(direction, target)?;
            self.in_flight.set(None);

            if flow == Flow::Terminate {
                return Ok(Flow::Terminate);
            }
        }
        Ok(Flow::Continue)
    }

    fn travel_to(&self, direction: Direction, mut target: u8) -> DispatchResult<Flow> {
        let id = self.elevator.id();

        loop {
            let floor = {
                let mut position = self.elevator.lock()?;
                match Direction::towards(position.floor, target) {
                    Direction::Up => position.floor += 1,
                    Direction::Down => position.floor -= 1,
                    Direction::Idle => break,
                }
                position.floor
            };

            self.events.emit(DispatchEvent::ElevatorMoved {
                elevator_id: id,
                floor,
            });
            if self.pause(self.time_between_floors) == Flow::Terminate {
                return Ok(Flow::Terminate);
            }

            if let Some(nearer) = self.queues.take_on_the_way(direction, floor, target)? {
                debug!("Elevator {} stopping at {} on the way to {}", id, nearer, target);
                self.in_flight.set(Some((direction, nearer)));
                target = nearer;
            }
        }

        self.events.emit(DispatchEvent::ElevatorArrived {
            elevator_id: id,
            floor: target,
        });
        Ok(self.pause(self.passenger_transfer_time))
    }

    fn wait_for_stop(&self) -> Flow {
        cbc::select! {
            recv(self.wake_rx) -> _ => Flow::Continue,
            recv(self.terminate_rx) -> _ => Flow::Terminate,
        }
    }

    fn pause(&self, duration: Duration) -> Flow {
        cbc::select! {
            recv(self.terminate_rx) -> _ => Flow::Terminate,
            default(duration) => Flow::Continue,
        }
    }

    fn recover(&self) -> Flow {
        let id = self.elevator.id();
        self.elevator.recover();
        self.queues.recover();

        // The faulted trip already popped its target
        if let Some((direction, floor)) = self.in_flight.take() {
            match self.queues.add_stop(direction, floor) {
                Ok(_) => info!("Elevator {} re-queued stop at floor {}", id, floor),
                Err(e) => error!("Elevator {} lost stop at floor {}: {}", id, floor, e),
            }
        }
        self.pause(FAULT_BACKOFF)
    }
}
