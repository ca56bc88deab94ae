//! Roster Engine - in-memory student record store with flat-file persistence
//!
//! This crate provides the core for the roster tools: the record store
//! holding all student records, and the codec that maps the store to its
//! on-disk delimited-text representation.

pub mod codec;
pub mod error;
pub mod store;

pub use error::{RosterError, RosterResult};
pub use store::{RecordStore, StudentRecord};
