//! Sequential operations across every game.

pub mod runner;

pub use runner::{BatchReport, BatchRunner};
