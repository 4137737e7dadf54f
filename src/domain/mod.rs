// Domain layer: production job model, ports, and the pure ETL steps.

pub mod model;
pub mod ports;
pub mod sample;
pub mod summary;
pub mod transform;
