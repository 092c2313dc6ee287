//! Background tasks spawned from the binary entrypoint.

pub mod sweeper;
