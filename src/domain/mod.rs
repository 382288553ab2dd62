// Domain layer: hospital entities and the persistence port.

pub mod model;
pub mod patient;
pub mod ports;
pub mod team;
pub mod ward;
