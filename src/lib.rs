pub mod error;
pub mod config;
pub mod identity;
pub mod routes;
pub mod guard;
pub mod records;
pub mod console;
pub mod cli;
