//! Core controller components, free of any hardware specifics
pub mod bridge;
pub mod command;
pub mod controller;
pub mod engine;
pub mod state;
pub mod waveform;
