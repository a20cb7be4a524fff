//! Intake chat — scripted questionnaire presented as a chat.

pub mod adapter;
pub mod catalog;
pub mod cli;
pub mod config;
pub mod error;
pub mod handoff;
pub mod render;
pub mod session;
