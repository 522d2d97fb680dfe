//! taskdeck: a local task cache over a REST task service.
//!
//! [`store::TaskStore`] holds the fetched tasks plus the personal and
//! date-indexed views, [`api`] talks to the backend, and [`stats`] derives the
//! dashboard numbers on read.

pub mod api;
pub mod cli;
pub mod error;
pub mod model;
pub mod stats;
pub mod storage;
pub mod store;
