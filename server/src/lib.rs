//! Echo Chamber Network Server
//!
//! REST API for a small social network: users, their thoughts, reactions
//! to thoughts, and one-directional friend lists.

pub mod api;
pub mod config;
pub mod db;
pub mod store;
pub mod thoughts;
pub mod users;
