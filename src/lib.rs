//! Exam question extraction from exported discussion HTML pages
//!
//! Turns question-bank pages into a self-contained JSON exam document:
//! - question cards located by CSS selectors
//! - question and answer text split into ordered text/image fragments
//! - correct answers recovered from class markers, vote bars or answer spans
//! - "most voted" hints and duplicated answer labels removed

pub mod assemble;
pub mod config;
pub mod error;
pub mod exam;
pub mod extractors;

pub use assemble::*;
pub use config::{ExtractConfig, SelectorConfig};
pub use error::{ExtractError, Result};
pub use exam::*;
pub use extractors::*;
