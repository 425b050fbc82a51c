/***************************************/
/*        3rd party libraries          */
/***************************************/
use crossbeam_channel as cbc;
use log::{debug, error, info};
use std::sync::Arc;
use std::thread::{Builder, JoinHandle};

/***************************************/
/*           Local modules             */
/***************************************/
use crate::building::Building;
use crate::config::ElevatorConfig;
use crate::elevator::{ElevatorFSM, StopQueues};
use crate::shared::{
    Assignment, Direction, DispatchError, DispatchEvent, DispatchResult, ElevatorRequest,
    ElevatorState, EventSink,
};

/**
 * Assigns hall requests to elevators and runs their movement loops.
 *
 * Requests go to the nearest elevator that is idle or already serving the
 * requested direction. Ties go to the lowest id. The dispatcher never waits
 * on elevator movement: it takes one elevator's position lock, inserts into
 * one stop set and returns.
 *
 * # Fields
 * - `building`:        Floors and elevators.
 * - `queues`:          Stop queues, indexed like `building.elevators()`.
 * - `events`:          Sink for assignment events, cloned into every loop.
 * - `config`:          Timings handed to the movement loops.
 * - `terminate_txs`:   One terminate channel per running loop.
 * - `handles`:         Join handles of the running loops.
 */
pub struct Dispatcher {
    building: Building,
    queues: Vec<Arc<StopQueues>>,
    events: EventSink,
    config: ElevatorConfig,
    terminate_txs: Vec<cbc::Sender<()>>,
    handles: Vec<JoinHandle<()>>,
}

fn is_eligible(current: Direction, requested: Direction) -> bool {
    current == Direction::Idle || current == requested
}

impl Dispatcher {
    pub fn new(
        building: Building,
        config: &ElevatorConfig,
        event_tx: Option<cbc::Sender<DispatchEvent>>,
    ) -> Dispatcher {
        let queues = building
            .elevators()
            .iter()
            .map(|elevator| Arc::new(StopQueues::new(elevator.id())))
            .collect();

        Dispatcher {
            building,
            queues,
            events: EventSink::new(event_tx),
            config: config.clone(),
            terminate_txs: Vec::new(),
            handles: Vec::new(),
        }
    }

    pub fn building(&self) -> &Building {
        &self.building
    }

    /// Spawns one movement loop per elevator. Calling it again is a no-op.
    pub fn start(&mut self) -> DispatchResult<()> {
        if !self.handles.is_empty() {
            return Ok(());
        }

        for (elevator, queues) in self.building.elevators().iter().zip(&self.queues) {
            let (terminate_tx, terminate_rx) = cbc::bounded::<()>(1);
            let fsm = ElevatorFSM::new(
                &self.config,
                elevator.clone(),
                queues.clone(),
                self.events.clone(),
                terminate_rx,
            );

            let handle = Builder::new()
                .name(format!("elevator_{}", elevator.id()))
                .spawn(move || fsm.run())?;

            self.terminate_txs.push(terminate_tx);
            self.handles.push(handle);
        }

        info!(
            "Dispatcher started {} elevators over {} floors",
            self.handles.len(),
            self.building.n_floors()
        );
        Ok(())
    }

    /// Stops every movement loop and waits for the threads to finish.
    pub fn shutdown(&mut self) {
        for terminate_tx in self.terminate_txs.drain(..) {
            let _ = terminate_tx.send(());
        }
        for handle in self.handles.drain(..) {
            if handle.join().is_err() {
                error!("Elevator thread ended with a panic");
            }
        }
    }

    /// Submits a hall call. `Ok(None)` means no elevator took it.
    pub fn submit(&self, floor: u8, direction: Direction) -> DispatchResult<Option<u8>> {
        self.check_floor(floor)?;
        let request = ElevatorRequest::new(floor, direction)?;

        Ok(self.assign_request(request).elevator_id())
    }

    pub fn assign_request(&self, request: ElevatorRequest) -> Assignment {
        match self.try_assign(request) {
            Ok(Some((elevator_id, immediate))) => {
                self.events.emit(DispatchEvent::RequestAssigned {
                    elevator_id,
                    floor: request.floor(),
                    direction: request.direction(),
                });
                if immediate {
                    self.events.emit(DispatchEvent::ElevatorArrived {
                        elevator_id,
                        floor: request.floor(),
                    });
                }
                Assignment::Assigned {
                    elevator_id,
                    immediate,
                }
            }
            Ok(None) => {
                self.events.emit(DispatchEvent::RequestUnassignable {
                    floor: request.floor(),
                    direction: request.direction(),
                });
                Assignment::Unassignable
            }
            Err(e) => {
                error!(
                    "Selection failed for request ({}, {:?}): {}",
                    request.floor(),
                    request.direction(),
                    e
                );
                Assignment::Failed(e)
            }
        }
    }

    pub fn snapshot(&self) -> DispatchResult<Vec<ElevatorState>> {
        self.building
            .elevators()
            .iter()
            .map(|elevator| elevator.state())
            .collect()
    }

    /// Pending up stops (ascending) and down stops (descending) of one elevator.
    pub fn pending_stops(&self, elevator_id: u8) -> DispatchResult<(Vec<u8>, Vec<u8>)> {
        let queues = self
            .building
            .elevators()
            .iter()
            .position(|elevator| elevator.id() == elevator_id)
            .map(|index| &self.queues[index])
            .ok_or(DispatchError::UnknownElevator(elevator_id))?;

        Ok((
            queues.pending(Direction::Up)?,
            queues.pending(Direction::Down)?,
        ))
    }

    /// True when every elevator is idle with nothing left to serve.
    pub fn is_quiescent(&self) -> DispatchResult<bool> {
        for (elevator, queues) in self.building.elevators().iter().zip(&self.queues) {
            if elevator.state()?.direction != Direction::Idle || !queues.is_empty()? {
                return Ok(false);
            }
        }
        Ok(true)
    }

    fn check_floor(&self, floor: u8) -> DispatchResult<()> {
        if self.building.contains_floor(floor) {
            Ok(())
        } else {
            Err(DispatchError::InvalidFloor {
                floor,
                n_floors: self.building.n_floors(),
            })
        }
    }

    fn try_assign(&self, request: ElevatorRequest) -> DispatchResult<Option<(u8, bool)>> {
        self.check_floor(request.floor())?;
        let mut excluded = Vec::new();

        while let Some(index) = self.select_elevator(request, &excluded)? {
            let elevator = &self.building.elevators()[index];
            let mut position = elevator.lock()?;

            // The read in select_elevator may be stale
            if !is_eligible(position.direction, request.direction()) {
                debug!(
                    "Elevator {} turned {:?} during selection, reselecting",
                    elevator.id(),
                    position.direction
                );
                excluded.push(index);
                continue;
            }

            if position.floor == request.floor() {
                return Ok(Some((elevator.id(), true)));
            }

            self.queues[index].add_stop(request.direction(), request.floor())?;
            if position.direction == Direction::Idle {
                position.direction = request.direction();
            }
            return Ok(Some((elevator.id(), false)));
        }

        Ok(None)
    }

    fn select_elevator(
        &self,
        request: ElevatorRequest,
        excluded: &[usize],
    ) -> DispatchResult<Option<usize>> {
        let mut best: Option<(usize, u8)> = None;

        for (index, elevator) in self.building.elevators().iter().enumerate() {
            if excluded.contains(&index) {
                continue;
            }

            let state = elevator.state()?;
            if !is_eligible(state.direction, request.direction()) {
                continue;
            }

            // Strict comparison keeps the lowest id on ties
            let distance = state.floor.abs_diff(request.floor());
            if best.map_or(true, |(_, best_distance)| distance < best_distance) {
                best = Some((index, distance));
            }
        }

        Ok(best.map(|(index, _)| index))
    }
}

impl Drop for Dispatcher {
    fn drop(&mut self) {
        self.shutdown();
    }
}
