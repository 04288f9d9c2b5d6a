use crate::core::SentimentError;
use crate::utils::artifacts::{load_json, save_json};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::Path;

/// One-hot label encoder with categories in sorted order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OneHotEncoder {
    categories: Vec<String>,
}

impl OneHotEncoder {
    pub fn fit<S: AsRef<str>>(labels: &[S]) -> Self {
        let categories: BTreeSet<&str> = labels.iter().map(AsRef::as_ref).collect();
        Self {
            categories: categories.into_iter().map(str::to_string).collect(),
        }
    }

    pub fn from_categories(categories: Vec<String>) -> Self {
        let mut categories = categories;
        categories.sort();
        categories.dedup();
        Self { categories }
    }

    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    pub fn num_classes(&self) -> usize {
        self.categories.len()
    }

    pub fn index_of(&self, label: &str) -> Result<usize, SentimentError> {
        self.categories
            .binary_search_by(|c| c.as_str().cmp(label))
            .map_err(|_| SentimentError::UnknownLabel(label.to_string()))
    }

    pub fn inverse(&self, index: usize) -> Option<&str> {
        self.categories.get(index).map(String::as_str)
    }

    /// Class indices for each label, in input order.
    pub fn encode<S: AsRef<str>>(&self, labels: &[S]) -> Result<Vec<usize>, SentimentError> {
        labels.iter().map(|l| self.index_of(l.as_ref())).collect()
    }

    pub fn transform<S: AsRef<str>>(&self, labels: &[S]) -> Result<Vec<Vec<f32>>, SentimentError> {
        let indices = self.encode(labels)?;
        Ok(indices.into_iter().map(|i| self.one_hot(i)).collect())
    }

    pub fn one_hot(&self, index: usize) -> Vec<f32> {
        let mut row = vec![0.0; self.num_classes()];
        if let Some(slot) = row.get_mut(index) {
            *slot = 1.0;
        }
        row
    }

    pub fn save(&self, path: impl AsRef<Path>) -> anyhow::Result<()> {
        save_json(path, self)
    }

    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let encoder: Self = load_json(path)?;
        Ok(Self::from_categories(encoder.categories))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn categories_are_sorted_and_unique() {
        let encoder = OneHotEncoder::fit(&["positive", "negative", "positive"]);
        assert_eq!(encoder.categories(), ["negative", "positive"]);
        assert_eq!(encoder.num_classes(), 2);
    }

    #[test]
    fn transform_produces_one_hot_rows() -> anyhow::Result<()> {
        let encoder = OneHotEncoder::fit(&["positive", "negative"]);
        let rows = encoder.transform(&["positive", "negative"])?;
        assert_eq!(rows, vec![vec![0.0, 1.0], vec![1.0, 0.0]]);
        assert_eq!(encoder.inverse(1), Some("positive"));
        assert_eq!(encoder.inverse(2), None);
        Ok(())
    }

    #[test]
    fn unknown_label_is_rejected() {
        let encoder = OneHotEncoder::fit(&["positive", "negative"]);
        assert!(matches!(
            encoder.transform(&["neutral"]),
            Err(SentimentError::UnknownLabel(label)) if label == "neutral"
        ));
    }

    #[test]
    fn survives_a_save_and_load() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("label_encoder.json");
        let encoder = OneHotEncoder::fit(&["b", "a", "c"]);
        encoder.save(&path)?;
        assert_eq!(OneHotEncoder::load(&path)?, encoder);
        Ok(())
    }
}
