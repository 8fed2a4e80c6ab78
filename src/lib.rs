//! Imsakiye library - iftar/sahur countdown engine
//!
//! This module exports internal components for integration testing.

pub mod config;
pub mod countdown;
pub mod engine;
pub mod provider;
pub mod state;
