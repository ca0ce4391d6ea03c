// Domain layer: flat records produced by one run and the ports the pipeline talks through.

pub mod model;
pub mod ports;
