//! Training corpus generation.

mod synthetic;

pub use synthetic::generate;
