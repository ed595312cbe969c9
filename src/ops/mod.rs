//! Notebook mutations and queries.
//!
//! Every function here is total: an unknown id is a no-op reported through
//! the return value, never an error.

pub mod content;
pub mod folder_ops;
pub mod page_ops;
pub mod search;
pub mod tree;
