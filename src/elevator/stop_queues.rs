/***************************************/
/*        3rd party libraries          */
/***************************************/
use crossbeam_channel as cbc;
use log::warn;
use std::collections::BTreeSet;
use std::sync::{Mutex, MutexGuard};

/***************************************/
/*           Local modules             */
/***************************************/
use crate::shared::{Direction, DispatchError, DispatchResult};

/**
 * Pending stops of one elevator, split by service direction.
 *
 * Each set has its own lock. Up stops are served lowest floor first and down
 * stops highest floor first. Every insertion drops a token in the wake
 * channel so an idle movement loop re-evaluates without polling.
 *
 * # Fields
 * - `elevator_id`:     Owner of the queues, used in errors and logs.
 * - `up`:              Floors waiting for upward service.
 * - `down`:            Floors waiting for downward service.
 * - `wake_tx`:         Signals the movement loop that a stop was added.
 * - `wake_rx`:         Receiving side, handed to the movement loop.
 */
pub struct StopQueues {
    elevator_id: u8,
    up: Mutex<BTreeSet<u8>>,
    down: Mutex<BTreeSet<u8>>,
    wake_tx: cbc::Sender<()>,
    wake_rx: cbc::Receiver<()>,
}

impl StopQueues {
    pub fn new(elevator_id: u8) -> StopQueues {
        let (wake_tx, wake_rx) = cbc::bounded::<()>(1);
        StopQueues {
            elevator_id,
            up: Mutex::new(BTreeSet::new()),
            down: Mutex::new(BTreeSet::new()),
            wake_tx,
            wake_rx,
        }
    }

    /// Returns `false` if the floor was already pending in that direction.
    pub fn add_stop(&self, direction: Direction, floor: u8) -> DispatchResult<bool> {
        let set = self
            .set(direction)
            .ok_or(DispatchError::InvalidDirection { floor })?;
        let inserted = self.lock(set)?.insert(floor);

        // A full channel already holds a wake-up
        let _ = self.wake_tx.try_send(());
        Ok(inserted)
    }

    /// Removes and returns the nearest stop in the direction of travel.
    pub fn pop_next(&self, direction: Direction) -> DispatchResult<Option<u8>> {
        let Some(set) = self.set(direction) else {
            return Ok(None);
        };
        let mut set = self.lock(set)?;
        Ok(match direction {
            Direction::Up => set.pop_first(),
            _ => set.pop_last(),
        })
    }

    /**
     * Swaps `target` for a pending stop that lies on the way to it.
     *
     * A car at `floor` heading for `target` takes the nearest stop in
     * `[floor, target)` when going up, or `(target, floor]` when going down.
     * The old target goes back into the set. Returns the new target, or `None`
     * when nothing lies on the way.
     */
    pub fn take_on_the_way(
        &self,
        direction: Direction,
        floor: u8,
        target: u8,
    ) -> DispatchResult<Option<u8>> {
        let Some(set) = self.set(direction) else {
            return Ok(None);
        };
        let mut set = self.lock(set)?;
        let nearer = match direction {
            Direction::Up if floor < target => set.range(floor..target).next().copied(),
            Direction::Down if floor > target => set.range(target + 1..=floor).next_back().copied(),
            _ => None,
        };

        if let Some(stop) = nearer {
            set.remove(&stop);
            set.insert(target);
        }
        Ok(nearer)
    }

    pub fn has_stops(&self, direction: Direction) -> DispatchResult<bool> {
        match self.set(direction) {
            Some(set) => Ok(!self.lock(set)?.is_empty()),
            None => Ok(false),
        }
    }

    /// Pending floors in service order.
    pub fn pending(&self, direction: Direction) -> DispatchResult<Vec<u8>> {
        let Some(set) = self.set(direction) else {
            return Ok(Vec::new());
        };
        let set = self.lock(set)?;
        Ok(match direction {
            Direction::Up => set.iter().copied().collect(),
            _ => set.iter().rev().copied().collect(),
        })
    }

    pub fn is_empty(&self) -> DispatchResult<bool> {
        Ok(!self.has_stops(Direction::Up)? && !self.has_stops(Direction::Down)?)
    }

    pub fn wake_rx(&self) -> cbc::Receiver<()> {
        self.wake_rx.clone()
    }

    pub fn recover(&self) {
        for set in [&self.up, &self.down] {
            if set.is_poisoned() {
                warn!("Elevator {} recovering poisoned stop set", self.elevator_id);
                set.clear_poison();
            }
        }
    }

    fn set(&self, direction: Direction) -> Option<&Mutex<BTreeSet<u8>>> {
        match direction {
            Direction::Up => Some(&self.up),
            Direction::Down => Some(&self.down),
            Direction::Idle => None,
        }
    }

    fn lock<'a>(&self, set: &'a Mutex<BTreeSet<u8>>) -> DispatchResult<MutexGuard<'a, BTreeSet<u8>>> {
        set.lock().map_err(|_| DispatchError::Poisoned(self.elevator_id))
    }
}
