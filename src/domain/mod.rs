// Domain layer: table rows, index keys and the ports (interfaces) the pipeline depends on.

pub mod model;
pub mod ports;
