// Domain layer: row/record models and the ports the ETL shell plugs into.

pub mod model;
pub mod ports;
