//! Instrumentos Server library.
//!
//! Core functionality for the musical instrument catalog server: database
//! operations, media storage, AI-backed catalog population, and API services.

pub mod api;
pub mod config;
pub mod db;
pub mod entity;
pub mod error;
pub mod middleware;
pub mod migration;
pub mod models;
pub mod services;
