//! hand-pointer library crate.
//!
//! Turns a stream of hand landmarks into pointer moves, clicks, scrolls and
//! editing shortcuts. The gesture core lives in [`gesture`]; everything else
//! feeds it frames or carries out its actions.

pub mod actions;
pub mod cli;
pub mod config;
pub mod error;
pub mod gesture;
pub mod input;
pub mod landmarks;
pub mod run_loop;
pub mod shutdown;

pub use error::Error;
