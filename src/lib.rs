pub mod global;
pub mod server;
pub mod tracker;
