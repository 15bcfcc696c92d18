pub mod bean;
pub mod brewlog;
pub mod config;
pub mod recipe;
pub mod session;
