// src/preferences/mod.rs
//!
//! Preferences Module
//!
//! The shell's persisted user preferences: one open, additive JSON key/value
//! document, read at startup and rewritten on demand.

pub mod store;

pub use store::*;

#[cfg(test)]
mod tests;
