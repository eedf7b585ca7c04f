pub mod backend;
pub mod config;
pub mod draft;
pub mod error;
pub mod format;
pub mod gateway;
pub mod guard;
pub mod listing;
pub mod memory;
pub mod query;
pub mod session;
pub mod subscription;
pub mod theme;
