// src/handlers/mod.rs

pub mod auth;
pub mod courses;
pub mod dashboard;
pub mod notifications;
pub mod quiz;
