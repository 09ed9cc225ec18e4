// Domain layer: core models and ports (interfaces). No external dependencies beyond std/chrono.

pub mod model;
pub mod ports;
