// src/services/mod.rs
pub mod analytics;
pub mod fundamentals;
pub mod store;
pub mod yahoo;
