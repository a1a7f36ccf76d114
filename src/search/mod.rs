//! Search trigger heuristic and augmentation backends.

pub mod augment;
pub mod trigger;

pub use augment::{SearchAugmenter, SearchResult, SimulatedSearch};
pub use trigger::{KeywordTrigger, DEFAULT_KEYWORDS};
