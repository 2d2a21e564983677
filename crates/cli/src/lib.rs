//! CLI utilities for medinstruct
//!
//! Provides shared CLI functionality:
//! - Status messages
//! - Match result formatting
//! - Progress spinners

#![warn(missing_docs)]

pub mod output;
pub mod progress;
