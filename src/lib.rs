pub mod compute;
pub mod config;
pub mod entities;
pub mod error;
pub mod input;
pub mod session;
pub mod store;
pub mod viewport;
