// src/handlers/mod.rs
pub mod dashboard;
pub mod error;
pub mod history;
pub mod news;
pub mod profile;
pub mod report;
pub mod returns;
pub mod risk;
