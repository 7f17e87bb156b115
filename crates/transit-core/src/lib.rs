//! Shared model and engine for the transit departure board.
//!
//! Everything that does not touch the terminal lives here: the station
//! store, the schedule fetcher, the card reconciler and the session
//! controller that ties them together.

pub mod board;
pub mod cache;
pub mod catalog;
pub mod config;
pub mod error;
pub mod fetcher;
pub mod model;
pub mod platform;
pub mod session;
pub mod store;
