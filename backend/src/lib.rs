//! Nutri Coach Backend Library
//!
//! This library exposes the backend modules for use in tests and the
//! `prepare-recipes` tool.

pub mod auth;
pub mod catalog;
pub mod clients;
pub mod config;
pub mod db;
pub mod error;
pub mod repositories;
pub mod routes;
pub mod services;
pub mod state;
