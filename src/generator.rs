/***************************************/
/*        3rd party libraries          */
/***************************************/
use log::{error, info};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use std::thread::sleep;
use std::time::Duration;

/***************************************/
/*           Local modules             */
/***************************************/
use crate::coordinator::Dispatcher;
use crate::shared::ElevatorRequest;

/**
 * Produces random hall calls and feeds them to the dispatcher.
 *
 * Floor 0 only calls up and the top floor only calls down. With a seed the
 * sequence of requests is reproducible.
 */
pub struct RequestGenerator {
    n_floors: u8,
    interval: Duration,
    rng: SmallRng,
}

impl RequestGenerator {
    pub fn new(n_floors: u8, interval: Duration, seed: Option<u64>) -> RequestGenerator {
        let rng = match seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_entropy(),
        };
        RequestGenerator {
            n_floors: n_floors.max(1),
            interval,
            rng,
        }
    }

    pub fn next_request(&mut self) -> ElevatorRequest {
        let floor = self.rng.gen_range(0..self.n_floors);
        if floor == 0 {
            ElevatorRequest::up(floor)
        } else if floor == self.n_floors - 1 {
            ElevatorRequest::down(floor)
        } else if self.rng.gen_bool(0.5) {
            ElevatorRequest::up(floor)
        } else {
            ElevatorRequest::down(floor)
        }
    }

    /// Submits a request every interval, `limit` times or forever.
    pub fn run(mut self, dispatcher: &Dispatcher, limit: Option<u64>) {
        let mut submitted = 0;

        while limit.map_or(true, |limit| submitted < limit) {
            let request = self.next_request();
            match dispatcher.submit(request.floor(), request.direction()) {
                Ok(Some(_)) => {}
                Ok(None) => info!(
                    "Request ({}, {:?}) dropped, no elevator available",
                    request.floor(),
                    request.direction()
                ),
                Err(e) => error!("Generator produced an invalid request: {}", e),
            }

            submitted += 1;
            sleep(self.interval);
        }

        info!("Generator finished after {} requests", submitted);
    }
}

/***************************************/
/*             Unit tests              */
/***************************************/
