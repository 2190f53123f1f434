//! Teachback Terminal
//!
//! A line-oriented front end for the teaching session controller. Typed lines
//! become UI events, and the controller's view calls are printed as text. The
//! `teach` binary is a thin wrapper around this library.

pub mod config;
pub mod input;
pub mod terminal;
