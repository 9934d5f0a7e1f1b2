pub mod dates;
pub mod flatten;
pub mod frame;
pub mod normalizer;
pub mod stages;

pub use dates::parse_day_first;
pub use flatten::flatten_labels;
pub use frame::NormalizedFrame;
pub use normalizer::Normalizer;
pub use stages::{clean_cell, coerce_numeric, last_chars, parse_amount};
