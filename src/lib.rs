pub mod app_state;
pub mod config;
pub mod error;
pub mod mapping;
pub mod models;
pub mod repository;
pub mod service;
pub mod task;
