/*
 * Unit tests for the elevator movement loop
 *
 * The unit tests follows the Arrange, Act, Assert pattern.
 *
 * Tests:
 * - test_fsm_parks_without_stops
 * - test_fsm_serves_single_stop
 * - test_fsm_up_sweep_ascending
 * - test_fsm_down_sweep_descending
 * - test_fsm_no_reversal_mid_sweep
 * - test_fsm_idle_prefers_up
 * - test_fsm_recovers_from_poisoned_state
 * - test_fsm_requeues_stop_after_fault_in_travel
 * - test_fsm_terminates_during_travel
 *
 */

/***************************************/
/*             Unit tests              */
/***************************************/
#[cfg(test)]
mod fsm_tests {
    use crate::building::Elevator;
    use crate::config::ElevatorConfig;
    use crate::elevator::{ElevatorFSM, StopQueues};
    use crate::shared::Direction::{Down, Idle, Up};
    use crate::shared::{DispatchEvent, EventSink};
    use crossbeam_channel::{unbounded, Receiver, RecvTimeoutError, Sender};
    use std::sync::Arc;
    use std::thread::{sleep, spawn};
    use std::time::{Duration, Instant};

    fn setup_fsm(
        time_between_floors: u64,
    ) -> (
        ElevatorFSM,
        Arc<Elevator>,
        Arc<StopQueues>,
        Receiver<DispatchEvent>,
        Sender<()>,
    ) {
        // Arrange mock channels
        let (event_tx, event_rx) = unbounded::<DispatchEvent>();
        let (terminate_tx, terminate_rx) = unbounded::<()>();

        // Fast configuration
        let config = ElevatorConfig {
            time_between_floors,
            passenger_transfer_time: 2,
        };

        let elevator = Arc::new(Elevator::new(1));
        let queues = Arc::new(StopQueues::new(1));

        (
            ElevatorFSM::new(
                &config,
                elevator.clone(),
                queues.clone(),
                EventSink::new(Some(event_tx)),
                terminate_rx,
            ),
            elevator,
            queues,
            event_rx,
            terminate_tx,
        )
    }

    fn next_event(event_rx: &Receiver<DispatchEvent>) -> DispatchEvent {
        match event_rx.recv_timeout(Duration::from_secs(3)) {
            Ok(event) => event,
            Err(RecvTimeoutError::Timeout) => panic!("Timed out waiting for event_rx"),
            Err(e) => panic!("Error receiving from event_rx: {:?}", e),
        }
    }

    /// Collects events until `count` arrivals have been seen.
    fn collect_arrivals(event_rx: &Receiver<DispatchEvent>, count: usize) -> (Vec<u8>, Vec<u8>) {
        let mut moves = Vec::new();
        let mut arrivals = Vec::new();
        while arrivals.len() < count {
            match next_event(event_rx) {
                DispatchEvent::ElevatorMoved { floor, .. } => moves.push(floor),
                DispatchEvent::ElevatorArrived { floor, .. } => arrivals.push(floor),
                other => panic!("Unexpected event {:?}", other),
            }
        }
        (moves, arrivals)
    }

    fn wait_for_idle(elevator: &Elevator) {
        let deadline = Instant::now() + Duration::from_secs(3);
        while elevator.state().unwrap().direction != Idle {
            if Instant::now() > deadline {
                panic!("Timed out waiting for elevator to go idle");
            }
            sleep(Duration::from_millis(5));
        }
    }

    #[test]
    fn test_fsm_parks_without_stops() {
        // Purpose: Verify that an elevator without stops stays parked and idle

        // Arrange
        let (fsm, elevator, _queues, event_rx, terminate_tx) = setup_fsm(2);
        let fsm_thread = spawn(move || fsm.run());

        // Act
        sleep(Duration::from_millis(50));

        // Assert
        let state = elevator.state().unwrap();
        assert_eq!(state.floor, 0);
        assert_eq!(state.direction, Idle);
        assert!(event_rx.try_recv().is_err());

        // Cleanup
        terminate_tx.send(()).unwrap();
        fsm_thread.join().unwrap();
    }

    #[test]
    fn test_fsm_serves_single_stop() {
        // Purpose: Verify one floor step per move and idle after the last stop

        // Arrange
        let (fsm, elevator, queues, event_rx, terminate_tx) = setup_fsm(2);
        let fsm_thread = spawn(move || fsm.run());

        // Act
        queues.add_stop(Up, 3).unwrap();
        let (moves, arrivals) = collect_arrivals(&event_rx, 1);

        // Assert
        assert_eq!(moves, vec![1, 2, 3]);
        assert_eq!(arrivals, vec![3]);
        wait_for_idle(&elevator);
        assert_eq!(elevator.state().unwrap().floor, 3);
        assert!(queues.is_empty().unwrap());

        // Cleanup
        terminate_tx.send(()).unwrap();
        fsm_thread.join().unwrap();
    }

    #[test]
    fn test_fsm_up_sweep_ascending() {
        // Arrange
        let (fsm, elevator, queues, event_rx, terminate_tx) = setup_fsm(1);
        for floor in [5, 2, 4] {
            queues.add_stop(Up, floor).unwrap();
        }

        // Act
        let fsm_thread = spawn(move || fsm.run());
        let (moves, arrivals) = collect_arrivals(&event_rx, 3);

        // Assert
        assert_eq!(arrivals, vec![2, 4, 5]);
        assert_eq!(moves, vec![1, 2, 3, 4, 5]);
        wait_for_idle(&elevator);

        // Cleanup
        terminate_tx.send(()).unwrap();
        fsm_thread.join().unwrap();
    }

    #[test]
    fn test_fsm_down_sweep_descending() {
        // Arrange
        let (fsm, elevator, queues, event_rx, terminate_tx) = setup_fsm(1);
        elevator.lock().unwrap().floor = 8;
        for floor in [1, 6, 3] {
            queues.add_stop(Down, floor).unwrap();
        }

        // Act
        let fsm_thread = spawn(move || fsm.run());
        let (moves, arrivals) = collect_arrivals(&event_rx, 3);

        // Assert
        assert_eq!(arrivals, vec![6, 3, 1]);
        assert_eq!(moves, vec![7, 6, 5, 4, 3, 2, 1]);
        wait_for_idle(&elevator);

        // Cleanup
        terminate_tx.send(()).unwrap();
        fsm_thread.join().unwrap();
    }

    #[test]
    fn test_fsm_no_reversal_mid_sweep() {
        // Purpose: A down stop added while travelling up is served only after the up stop

        // Arrange
        let (fsm, elevator, queues, event_rx, terminate_tx) = setup_fsm(10);
        let fsm_thread = spawn(move || fsm.run());
        queues.add_stop(Up, 6).unwrap();

        // Act
        match next_event(&event_rx) {
            DispatchEvent::ElevatorMoved { floor: 1, .. } => {}
            other => panic!("Expected first move to floor 1, got {:?}", other),
        }
        queues.add_stop(Down, 3).unwrap();
        assert_eq!(elevator.state().unwrap().direction, Up);
        let (moves, arrivals) = collect_arrivals(&event_rx, 2);

        // Assert
        assert_eq!(arrivals, vec![6, 3]);
        assert_eq!(moves, vec![2, 3, 4, 5, 6, 5, 4, 3]);
        wait_for_idle(&elevator);
        assert_eq!(elevator.state().unwrap().floor, 3);

        // Cleanup
        terminate_tx.send(()).unwrap();
        fsm_thread.join().unwrap();
    }

    #[test]
    fn test_fsm_idle_prefers_up() {
        // Purpose: With stops in both sets an idle elevator serves the up set first

        // Arrange
        let (fsm, elevator, queues, event_rx, terminate_tx) = setup_fsm(1);
        elevator.lock().unwrap().floor = 5;
        queues.add_stop(Down, 2).unwrap();
        queues.add_stop(Up, 7).unwrap();

        // Act
        let fsm_thread = spawn(move || fsm.run());
        let (_moves, arrivals) = collect_arrivals(&event_rx, 2);

        // Assert
        assert_eq!(arrivals, vec![7, 2]);
        wait_for_idle(&elevator);

        // Cleanup
        terminate_tx.send(()).unwrap();
        fsm_thread.join().unwrap();
    }

    #[test]
    fn test_fsm_recovers_from_poisoned_state() {
        // Purpose: A fault inside the loop is logged and the elevator keeps serving

        // Arrange
        let (fsm, elevator, queues, event_rx, terminate_tx) = setup_fsm(1);
        elevator.poison();
        queues.add_stop(Up, 2).unwrap();

        // Act
        let fsm_thread = spawn(move || fsm.run());
        let (_moves, arrivals) = collect_arrivals(&event_rx, 1);

        // Assert
        assert_eq!(arrivals, vec![2]);
        wait_for_idle(&elevator);

        // Cleanup
        terminate_tx.send(()).unwrap();
        fsm_thread.join().unwrap();
    }

    #[test]
    fn test_fsm_requeues_stop_after_fault_in_travel() {
        // Purpose: A fault between floors keeps the stop the car was travelling to

        // Arrange
        let (fsm, elevator, queues, event_rx, terminate_tx) = setup_fsm(20);
        let fsm_thread = spawn(move || fsm.run());
        queues.add_stop(Up, 4).unwrap();
        match next_event(&event_rx) {
            DispatchEvent::ElevatorMoved { floor: 1, .. } => {}
            other => panic!("Expected first move to floor 1, got {:?}", other),
        }

        // Act
        elevator.poison();
        let (_moves, arrivals) = collect_arrivals(&event_rx, 1);

        // Assert
        assert_eq!(arrivals, vec![4]);
        wait_for_idle(&elevator);
        assert_eq!(elevator.state().unwrap().floor, 4);
        assert!(queues.is_empty().unwrap());

        // Cleanup
        terminate_tx.send(()).unwrap();
        fsm_thread.join().unwrap();
    }

    #[test]
    fn test_fsm_terminates_during_travel() {
        // Purpose: Shutdown interrupts the timed pause between floors

        // Arrange
        let (fsm, _elevator, queues, event_rx, terminate_tx) = setup_fsm(10_000);
        let fsm_thread = spawn(move || fsm.run());
        queues.add_stop(Up, 9).unwrap();
        next_event(&event_rx);

        // Act
        let start = Instant::now();
        terminate_tx.send(()).unwrap();
        fsm_thread.join().unwrap();

        // Assert
        assert!(start.elapsed() < Duration::from_secs(5));
    }
}
