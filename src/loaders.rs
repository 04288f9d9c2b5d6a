//! Dataset loading for labelled review CSV files.
//!
//! ## Main Types
//!
//! - [`CsvDatasetLoader`] - Reads a text column and a label column from a CSV file
//! - [`ReviewDataset`] - The loaded rows, in file order
//! - [`DatasetSummary`] - Row, duplicate and missing-value counts for inspection
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use review_sentiment::loaders::CsvDatasetLoader;
//!
//! let dataset = CsvDatasetLoader::new("IMDB-Dataset.csv").load()?;
//! println!("{}", dataset.summary());
//! # Ok::<(), anyhow::Error>(())
//! ```

use crate::core::SentimentError;
use anyhow::Context;
use serde::Serialize;
use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::io::Read;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct CsvDatasetLoader {
    pub path: PathBuf,
    pub text_column: String,
    pub label_column: String,
}

impl CsvDatasetLoader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            text_column: "review".to_string(),
            label_column: "sentiment".to_string(),
        }
    }

    pub fn columns(mut self, text: impl Into<String>, label: impl Into<String>) -> Self {
        self.text_column = text.into();
        self.label_column = label.into();
        self
    }

    pub fn load(&self) -> anyhow::Result<ReviewDataset> {
        let file = std::fs::File::open(&self.path)
            .with_context(|| format!("Failed to open dataset {:?}", self.path))?;
        let dataset = read_reviews(file, &self.text_column, &self.label_column)
            .with_context(|| format!("Failed to read dataset {:?}", self.path))?;
        tracing::info!(path = ?self.path, rows = dataset.len(), "loaded dataset");
        Ok(dataset)
    }
}

/// Shorthand for `CsvDatasetLoader::new(path).columns(..).load()`.
pub fn load_reviews(
    path: impl Into<PathBuf>,
    text_column: &str,
    label_column: &str,
) -> anyhow::Result<ReviewDataset> {
    CsvDatasetLoader::new(path)
        .columns(text_column, label_column)
        .load()
}

/// Parses review rows from any CSV source with a header line.
pub fn read_reviews<R: Read>(
    source: R,
    text_column: &str,
    label_column: &str,
) -> anyhow::Result<ReviewDataset> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(source);

    let headers = reader.headers()?.clone();
    let text_idx = column_index(&headers, text_column)?;
    let label_idx = column_index(&headers, label_column)?;

    let mut dataset = ReviewDataset::default();
    for record in reader.records() {
        let record = record?;
        dataset.push(
            record.get(text_idx).unwrap_or_default(),
            record.get(label_idx).unwrap_or_default().trim(),
        );
    }
    Ok(dataset)
}

fn column_index(headers: &csv::StringRecord, name: &str) -> Result<usize, SentimentError> {
    let wanted = name.trim().to_lowercase();
    headers
        .iter()
        .position(|h| h.trim().trim_start_matches('\u{feff}').to_lowercase() == wanted)
        .ok_or_else(|| SentimentError::MissingColumn(name.to_string()))
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReviewDataset {
    pub reviews: Vec<String>,
    pub sentiments: Vec<String>,
}

impl ReviewDataset {
    pub fn push(&mut self, review: impl Into<String>, sentiment: impl Into<String>) {
        self.reviews.push(review.into());
        self.sentiments.push(sentiment.into());
    }

    pub fn len(&self) -> usize {
        self.reviews.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reviews.is_empty()
    }

    pub fn summary(&self) -> DatasetSummary {
        let mut seen = HashSet::new();
        let mut summary = DatasetSummary {
            rows: self.len(),
            ..Default::default()
        };

        for (review, sentiment) in self.reviews.iter().zip(&self.sentiments) {
            if !seen.insert((review.as_str(), sentiment.as_str())) {
                summary.duplicates += 1;
            }
            if review.is_empty() {
                summary.missing_text += 1;
            }
            if sentiment.is_empty() {
                summary.missing_label += 1;
            } else {
                *summary.label_counts.entry(sentiment.clone()).or_default() += 1;
            }
        }
        summary
    }

    /// Drops rows whose text or label is empty, returning how many were removed.
    pub fn drop_missing(&mut self) -> usize {
        let before = self.len();
        let (reviews, sentiments): (Vec<String>, Vec<String>) = std::mem::take(&mut self.reviews)
            .into_iter()
            .zip(std::mem::take(&mut self.sentiments))
            .filter(|(review, sentiment)| !review.is_empty() && !sentiment.is_empty())
            .unzip();
        self.reviews = reviews;
        self.sentiments = sentiments;
        before - self.len()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DatasetSummary {
    pub rows: usize,
    pub duplicates: usize,
    pub missing_text: usize,
    pub missing_label: usize,
    pub label_counts: BTreeMap<String, usize>,
}

impl fmt::Display for DatasetSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "rows:          {}", self.rows)?;
        writeln!(f, "duplicates:    {}", self.duplicates)?;
        writeln!(f, "missing text:  {}", self.missing_text)?;
        writeln!(f, "missing label: {}", self.missing_label)?;
        for (label, count) in &self.label_counts {
            writeln!(f, "  {label}: {count}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CSV: &str = "\u{feff}Review,Sentiment\n\
        \"Great film, loved it<br />\",positive\n\
        Awful.,negative\n\
        \"Great film, loved it<br />\",positive\n\
        ,negative\n";

    #[test]
    fn reads_columns_case_insensitively() -> anyhow::Result<()> {
        let dataset = read_reviews(CSV.as_bytes(), "review", "sentiment")?;
        assert_eq!(dataset.len(), 4);
        assert_eq!(dataset.reviews[0], "Great film, loved it<br />");
        assert_eq!(dataset.sentiments[1], "negative");
        Ok(())
    }

    #[test]
    fn missing_column_is_reported() {
        let err = read_reviews(CSV.as_bytes(), "text", "sentiment").unwrap_err();
        assert!(matches!(
            err.downcast_ref::<SentimentError>(),
            Some(SentimentError::MissingColumn(col)) if col == "text"
        ));
    }

    #[test]
    fn summary_counts_duplicates_and_missing() -> anyhow::Result<()> {
        let dataset = read_reviews(CSV.as_bytes(), "review", "sentiment")?;
        let summary = dataset.summary();
        assert_eq!(summary.rows, 4);
        assert_eq!(summary.duplicates, 1);
        assert_eq!(summary.missing_text, 1);
        assert_eq!(summary.missing_label, 0);
        assert_eq!(summary.label_counts["positive"], 2);
        assert_eq!(summary.label_counts["negative"], 2);
        Ok(())
    }

    #[test]
    fn drop_missing_keeps_order() -> anyhow::Result<()> {
        let mut dataset = read_reviews(CSV.as_bytes(), "review", "sentiment")?;
        assert_eq!(dataset.drop_missing(), 1);
        assert_eq!(dataset.len(), 3);
        assert_eq!(dataset.sentiments, vec!["positive", "negative", "positive"]);
        Ok(())
    }

    #[test]
    fn whitespace_only_text_is_not_missing() -> anyhow::Result<()> {
        let csv = "review,sentiment\n\"   \",positive\n,negative\n";
        let mut dataset = read_reviews(csv.as_bytes(), "review", "sentiment")?;
        assert_eq!(dataset.summary().missing_text, 1);
        assert_eq!(dataset.drop_missing(), 1);
        assert_eq!(dataset.reviews, vec!["   "]);
        Ok(())
    }
}
