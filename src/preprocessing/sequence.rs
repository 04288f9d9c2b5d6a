use serde::{Deserialize, Serialize};

/// Which end of a short sequence receives the padding value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Padding {
    Pre,
    #[default]
    Post,
}

/// Which end of a long sequence is cut off.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Truncating {
    Pre,
    #[default]
    Post,
}

/// Brings every sequence to exactly `max_len` ids.
pub fn pad_sequences(
    sequences: &[Vec<u32>],
    max_len: usize,
    padding: Padding,
    truncating: Truncating,
    value: u32,
) -> Vec<Vec<u32>> {
    sequences
        .iter()
        .map(|seq| pad_sequence(seq, max_len, padding, truncating, value))
        .collect()
}

pub fn pad_sequence(
    seq: &[u32],
    max_len: usize,
    padding: Padding,
    truncating: Truncating,
    value: u32,
) -> Vec<u32> {
    let kept = if seq.len() > max_len {
        match truncating {
            Truncating::Post => &seq[..max_len],
            Truncating::Pre => &seq[seq.len() - max_len..],
        }
    } else {
        seq
    };

    let fill = max_len - kept.len();
    let mut out = Vec::with_capacity(max_len);
    match padding {
        Padding::Post => {
            out.extend_from_slice(kept);
            out.resize(max_len, value);
        }
        Padding::Pre => {
            out.resize(fill, value);
            out.extend_from_slice(kept);
        }
    }
    out
}

/// Median sequence length, truncated towards zero.
///
/// For an even count the two middle lengths are averaged before truncation.
pub fn median_length<T>(sequences: &[Vec<T>]) -> usize {
    if sequences.is_empty() {
        return 0;
    }
    let mut lengths: Vec<usize> = sequences.iter().map(Vec::len).collect();
    lengths.sort_unstable();

    let mid = lengths.len() / 2;
    if lengths.len() % 2 == 1 {
        lengths[mid]
    } else {
        (lengths[mid - 1] + lengths[mid]) / 2
    }
}
