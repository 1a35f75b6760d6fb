//! SmartStock dashboard: trains the models on synthetic history, keeps a
//! periodically refreshed snapshot and serves it as HTML and JSON.

pub mod app;
pub mod config;
pub mod context;
pub mod refresher;
pub mod snapshot;

#[cfg(test)]
pub(crate) mod testing;
