// Domain layer: models, ports (interfaces) and the pure alarm rules.
// No I/O here; adapters and the engine live elsewhere.

pub mod model;
pub mod ports;
pub mod rules;
