pub mod aggregate;
pub mod classify;
pub mod client;
pub mod config;
pub mod fallback;
pub mod ingest;
pub mod logging;
pub mod model;
pub mod sample;
pub mod schedule;
pub mod sites;
pub mod verify;
pub mod view;
