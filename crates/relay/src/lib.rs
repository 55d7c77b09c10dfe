pub mod config;
pub mod lobby;
pub mod server;

pub use config::RelayConfig;
pub use server::serve;
