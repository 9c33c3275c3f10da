// Domain layer: entities, report outcomes and ports (interfaces). Depends only on serde and chrono.

pub mod model;
pub mod ports;
