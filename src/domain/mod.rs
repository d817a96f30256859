// Domain layer: trip records, batches, and the upload port.

pub mod model;
pub mod ports;
