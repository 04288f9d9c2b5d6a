//! Text and label preprocessing shared by training and inference.
//!
//! ## Main Types
//!
//! - [`clean_review`] - Strips HTML and non-alphabetic characters, lower-cases and splits
//! - [`WordIndex`] - Frequency-ranked word index with an OOV bucket
//! - [`pad_sequences`] - Pads and truncates integer sequences to a fixed length
//! - [`OneHotEncoder`] - Maps label strings to one-hot rows and back
//! - [`train_test_split`] - Seeded shuffle split of sample indices

pub mod cleaning;
pub mod one_hot;
pub mod sequence;
pub mod split;
pub mod word_index;

pub use cleaning::{clean_review, clean_reviews};
pub use one_hot::OneHotEncoder;
pub use sequence::{median_length, pad_sequences, Padding, Truncating};
pub use split::train_test_split;
pub use word_index::WordIndex;
