// src/utils/mod.rs

pub mod admission;
pub mod html;
