//! handle library crate.
//!
//! A five-letter word game played with hand signs. Classified camera frames
//! flow through a dwell-based confirmation pipeline that turns held gestures
//! into letters and submissions; guesses are scored with the usual two-pass
//! green/yellow/grey rules.

pub mod classification;
pub mod cli;
pub mod config;
pub mod confirm;
pub mod evaluate;
pub mod frame_loop;
pub mod frames;
pub mod game;
pub mod gesture;
pub mod input;
pub mod session;
pub mod words;

/// Letters per word and per guess.
pub const WORD_LEN: usize = 5;
