pub mod backup;
pub mod config_io;
pub mod lock;
pub mod notebook_io;
pub mod session;
pub mod store;
