pub mod building;
pub mod elevator;

pub use building::Building;
pub use elevator::Elevator;
pub use elevator::Position;
