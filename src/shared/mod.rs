pub mod error;
pub mod events;
pub mod macros;
pub mod structs;

pub use error::DispatchError;
pub use error::DispatchResult;
pub use events::DispatchEvent;
pub use events::EventSink;
pub use structs::Assignment;
pub use structs::Direction;
pub use structs::ElevatorRequest;
pub use structs::ElevatorState;
