//! PantryChef Library
//!
//! Recipe search by pantry ingredients, with a single-slot query cache and a
//! persistent favorites list. The binary in `main.rs` is a thin layer over
//! `app::App`; the modules are public for integration tests.

pub mod app;
pub mod cache;
pub mod cli;
pub mod data;
pub mod favorites;
pub mod pantry;
pub mod search;
pub mod storage;
