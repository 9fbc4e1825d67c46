//! Application service layer - config, form state, submission controller

pub mod app;
pub mod clients;
pub mod config;
