//! HTML extraction modules
//!
//! Leaf-first: text sanitizing and label stripping, fragment extraction,
//! correct-answer detection, and card parsing on top of them.

mod cards;
mod correct_answers;
mod fragments;
mod labels;
mod sanitize;
mod selectors;

pub use cards::*;
pub use correct_answers::*;
pub use fragments::*;
pub use labels::*;
pub use sanitize::*;
pub use selectors::CardSelectors;
