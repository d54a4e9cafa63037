pub mod batch;
pub mod delivery;
pub mod server;
