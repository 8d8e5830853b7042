//! Query modules for the DLC manager SDK.
//!
//! Each module provides a query struct that borrows from a
//! [`Connection`](crate::connection::Connection) and exposes methods returning
//! `Result<T>`. Results are also recorded in the connection's state.

pub mod dlcs;
pub mod games;
pub mod maintenance;

pub use dlcs::DlcQuery;
pub use games::GameQuery;
pub use maintenance::MaintenanceQuery;
