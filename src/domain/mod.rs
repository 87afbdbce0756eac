// Domain layer: climb and drivetrain models plus ports. No I/O here.

pub mod model;
pub mod ports;
