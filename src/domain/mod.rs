// Domain layer: deploy models and ports. No process or network code here.

pub mod model;
pub mod ports;
