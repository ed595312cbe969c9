pub mod config;
pub mod folder;
pub mod notebook;
pub mod page;

pub use config::*;
pub use folder::*;
pub use notebook::*;
pub use page::*;
