//! The tools module provides the helpers around the codec.
//!
//! The tools are:
//! - cli: Command line interface and the options it produces.
//! - freq_count: Frequency count of the input, sequential or parallel.
//!
pub mod cli;
pub mod freq_count;
