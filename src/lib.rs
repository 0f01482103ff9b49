//! Party invite tracker: students, their friends and teachers, each with an
//! invitation state, persisted under a single storage key and exchanged as
//! JSON (lossless) or CSV (flat, export only).

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod util;
