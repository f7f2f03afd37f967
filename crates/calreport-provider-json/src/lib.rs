//! JSON calendar-export provider for calreport
//!
//! This crate implements the event-source trait for calendar exports shaped
//! like Google Calendar `events.list` responses.

pub mod data_loader;

pub use data_loader::DataLoader;
