// Domain layer: records exchanged with the booking API, per-vertical config and ports.

pub mod business_types;
pub mod model;
pub mod ports;
