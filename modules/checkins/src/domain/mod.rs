pub mod dates;
pub mod error;
pub mod events;
pub mod ports;
pub mod repo;
pub mod service;
pub mod streak;
pub mod tier;
pub mod timeline;
