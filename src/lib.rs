pub mod charts;
pub mod compute;
pub mod config;
pub mod controller;
pub mod entities;
pub mod launcher;
pub mod session_log;
pub mod stats;
