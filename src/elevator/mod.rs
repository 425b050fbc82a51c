pub mod fsm;
pub mod fsm_tests;
pub mod stop_queues;

pub use fsm::ElevatorFSM;
pub use stop_queues::StopQueues;
