pub mod catalog;
pub mod config;
pub mod error;
pub mod logging;
pub mod pages;
pub mod routes;
pub mod session;
pub mod startup;
pub mod state;
