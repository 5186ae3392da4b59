// src/handlers/mod.rs

pub mod article;
pub mod comment;
pub mod profile;
pub mod tag;
pub mod user;
