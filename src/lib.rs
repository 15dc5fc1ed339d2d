//! Core library for the `ammocheck` CLI.
//!
//! The binary replays a recorded request/answer corpus against an HTTP
//! server and checks every response. This crate holds the pieces it is built
//! from: corpus parsing, the load engine, the JSON body comparator, and the
//! verdict reporting. The command-line application is the primary interface;
//! library APIs may change with it.
pub mod app;
pub mod args;
pub mod compare;
pub mod config;
pub mod corpus;
pub mod engine;
pub mod entry;
pub mod error;
pub mod metrics;
mod system;
pub mod verify;

#[cfg(feature = "fuzzing")]
pub mod fuzzing;
