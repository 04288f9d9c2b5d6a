pub mod layers;

pub use layers::{Bidirectional, Embedding, Linear};
