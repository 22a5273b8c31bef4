// src/models/mod.rs

pub mod course;
pub mod notification;
pub mod quiz;
pub mod submission;
pub mod user;
