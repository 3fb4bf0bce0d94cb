pub mod config;
pub mod controller;
pub mod events;
pub mod logging;
pub mod lot;
pub mod vehicles;
