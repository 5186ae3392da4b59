// src/services/mod.rs
//
// Each public function is one unit of work: reads share a single pooled
// connection, mutations run inside one transaction that commits or rolls back
// as a whole.

pub mod article;
pub mod comment;
pub mod profile;
pub mod tag;
pub mod user;
