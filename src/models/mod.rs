// src/models/mod.rs

pub mod file;
