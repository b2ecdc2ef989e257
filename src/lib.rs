pub mod auth;
pub mod cache;
pub mod client;
pub mod config;
pub mod display;
pub mod filelock;
pub mod finance;
pub mod jwt;
pub mod logs;
pub mod session;
pub mod storage;
pub mod table;
pub mod time;
pub mod types;
