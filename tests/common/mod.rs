use review_sentiment::{ModelConfig, TrainingConfig};
use std::path::{Path, PathBuf};

const POSITIVE: &[&str] = &[
    "A wonderful film with a great cast, I loved it.",
    "Great story and brilliant acting<br /><br />loved every minute!",
    "Brilliant, moving and wonderful. A great watch.",
    "I loved the music and the great direction.",
    "Wonderful performances, a brilliant script. Great fun.",
];

const NEGATIVE: &[&str] = &[
    "An awful film, boring and far too long.",
    "Terrible acting<br />and a boring plot. Awful!",
    "Boring, terrible and a waste of time.",
    "The worst script, awful dialogue and terrible pacing.",
    "Dull and boring. Terrible from start to finish.",
];

const ROUNDS: [&str; 3] = ["one", "two", "three"];

/// Writes a small labelled review CSV (30 rows, balanced) and returns its path.
pub fn write_reviews_csv(dir: &Path) -> anyhow::Result<PathBuf> {
    let path = dir.join("reviews.csv");
    let mut writer = csv::Writer::from_path(&path)?;
    writer.write_record(["review", "sentiment"])?;
    for round in ROUNDS {
        for (pos, neg) in POSITIVE.iter().zip(NEGATIVE) {
            writer.write_record([format!("{pos} Take {round}."), "positive".to_string()])?;
            writer.write_record([format!("{neg} Take {round}."), "negative".to_string()])?;
        }
    }
    writer.flush()?;
    Ok(path)
}

pub fn tiny_config() -> TrainingConfig {
    TrainingConfig {
        vocab_size: 50,
        epochs: 2,
        batch_size: 8,
        learning_rate: 1e-2,
        model: ModelConfig {
            embedding_dim: 8,
            hidden_size: 8,
            dropout: 0.1,
        },
        ..Default::default()
    }
}
