// Domain layer: participants, assignments and the ports the run talks through.

pub mod model;
pub mod ports;
