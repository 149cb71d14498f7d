// src/types/mod.rs
pub mod payload;
pub mod profile;
pub mod response;
