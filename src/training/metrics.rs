use serde::Serialize;
use std::fmt;

/// Fraction of positions where `predicted` equals `expected`.
pub fn accuracy(expected: &[usize], predicted: &[usize]) -> f64 {
    if expected.is_empty() {
        return 0.0;
    }
    let hits = expected
        .iter()
        .zip(predicted)
        .filter(|(e, p)| e == p)
        .count();
    hits as f64 / expected.len() as f64
}

/// Counts indexed `[true class][predicted class]`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConfusionMatrix {
    pub labels: Vec<String>,
    pub counts: Vec<Vec<usize>>,
}

impl ConfusionMatrix {
    /// Class indices outside `labels` are ignored.
    pub fn new(labels: &[String], expected: &[usize], predicted: &[usize]) -> Self {
        let n = labels.len();
        let mut counts = vec![vec![0; n]; n];
        for (&e, &p) in expected.iter().zip(predicted) {
            if e < n && p < n {
                counts[e][p] += 1;
            }
        }
        Self {
            labels: labels.to_vec(),
            counts,
        }
    }

    pub fn total(&self) -> usize {
        self.counts.iter().flatten().sum()
    }

    pub fn correct(&self) -> usize {
        (0..self.labels.len()).map(|i| self.counts[i][i]).sum()
    }

    fn predicted_as(&self, class: usize) -> usize {
        self.counts.iter().map(|row| row[class]).sum()
    }

    fn support(&self, class: usize) -> usize {
        self.counts[class].iter().sum()
    }
}

impl fmt::Display for ConfusionMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = self.labels.iter().map(String::len).max().unwrap_or(0).max(9);
        write!(f, "{:>width$}", "")?;
        for label in &self.labels {
            write!(f, " {label:>width$}")?;
        }
        writeln!(f)?;
        for (label, row) in self.labels.iter().zip(&self.counts) {
            write!(f, "{label:>width$}")?;
            for count in row {
                write!(f, " {count:>width$}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassMetrics {
    pub label: String,
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
    pub support: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassificationReport {
    pub classes: Vec<ClassMetrics>,
    pub accuracy: f64,
    pub macro_avg: ClassMetrics,
    pub weighted_avg: ClassMetrics,
}

fn ratio(num: usize, den: usize) -> f64 {
    if den == 0 {
        0.0
    } else {
        num as f64 / den as f64
    }
}

fn f1(precision: f64, recall: f64) -> f64 {
    if precision + recall == 0.0 {
        0.0
    } else {
        2.0 * precision * recall / (precision + recall)
    }
}

impl ClassificationReport {
    pub fn from_confusion(matrix: &ConfusionMatrix) -> Self {
        let classes: Vec<ClassMetrics> = matrix
            .labels
            .iter()
            .enumerate()
            .map(|(i, label)| {
                let tp = matrix.counts[i][i];
                let precision = ratio(tp, matrix.predicted_as(i));
                let recall = ratio(tp, matrix.support(i));
                ClassMetrics {
                    label: label.clone(),
                    precision,
                    recall,
                    f1: f1(precision, recall),
                    support: matrix.support(i),
                }
            })
            .collect();

        let total = matrix.total();
        let n = classes.len().max(1) as f64;
        let macro_avg = ClassMetrics {
            label: "macro avg".to_string(),
            precision: classes.iter().map(|c| c.precision).sum::<f64>() / n,
            recall: classes.iter().map(|c| c.recall).sum::<f64>() / n,
            f1: classes.iter().map(|c| c.f1).sum::<f64>() / n,
            support: total,
        };

        let weighted = |metric: fn(&ClassMetrics) -> f64| {
            if total == 0 {
                return 0.0;
            }
            classes
                .iter()
                .map(|c| metric(c) * c.support as f64)
                .sum::<f64>()
                / total as f64
        };
        let weighted_avg = ClassMetrics {
            label: "weighted avg".to_string(),
            precision: weighted(|c| c.precision),
            recall: weighted(|c| c.recall),
            f1: weighted(|c| c.f1),
            support: total,
        };

        Self {
            accuracy: ratio(matrix.correct(), total),
            classes,
            macro_avg,
            weighted_avg,
        }
    }

    pub fn new(labels: &[String], expected: &[usize], predicted: &[usize]) -> Self {
        Self::from_confusion(&ConfusionMatrix::new(labels, expected, predicted))
    }
}

impl fmt::Display for ClassificationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = self
            .classes
            .iter()
            .map(|c| c.label.len())
            .chain(std::iter::once(self.weighted_avg.label.len()))
            .max()
            .unwrap_or(0);

        writeln!(
            f,
            "{:>width$}  {:>9} {:>9} {:>9} {:>9}",
            "", "precision", "recall", "f1-score", "support"
        )?;
        writeln!(f)?;
        for class in &self.classes {
            write_row(f, class, width)?;
        }
        writeln!(f)?;
        writeln!(
            f,
            "{:>width$}  {:>9} {:>9} {:>9.2} {:>9}",
            "accuracy", "", "", self.accuracy, self.macro_avg.support
        )?;
        write_row(f, &self.macro_avg, width)?;
        write_row(f, &self.weighted_avg, width)
    }
}

fn write_row(f: &mut fmt::Formatter<'_>, m: &ClassMetrics, width: usize) -> fmt::Result {
    writeln!(
        f,
        "{:>width$}  {:>9.2} {:>9.2} {:>9.2} {:>9}",
        m.label, m.precision, m.recall, m.f1, m.support
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels() -> Vec<String> {
        vec!["negative".to_string(), "positive".to_string()]
    }

    #[test]
    fn accuracy_counts_matches() {
        assert_eq!(accuracy(&[0, 1, 1, 0], &[0, 1, 0, 0]), 0.75);
        assert_eq!(accuracy(&[], &[]), 0.0);
    }

    #[test]
    fn confusion_matrix_rows_are_true_classes() {
        let matrix = ConfusionMatrix::new(&labels(), &[0, 0, 1, 1, 1], &[0, 1, 1, 1, 0]);
        assert_eq!(matrix.counts, vec![vec![1, 1], vec![1, 2]]);
        assert_eq!(matrix.total(), 5);
        assert_eq!(matrix.correct(), 3);
    }

    #[test]
    fn report_matches_hand_computed_scores() {
        // negative: tp=1 fp=1 fn=1 ; positive: tp=2 fp=1 fn=1
        let report = ClassificationReport::new(&labels(), &[0, 0, 1, 1, 1], &[0, 1, 1, 1, 0]);
        let neg = &report.classes[0];
        let pos = &report.classes[1];
        assert!((neg.precision - 0.5).abs() < 1e-12);
        assert!((neg.recall - 0.5).abs() < 1e-12);
        assert!((pos.precision - 2.0 / 3.0).abs() < 1e-12);
        assert!((pos.recall - 2.0 / 3.0).abs() < 1e-12);
        assert_eq!((neg.support, pos.support), (2, 3));
        assert!((report.accuracy - 0.6).abs() < 1e-12);
        assert!((report.macro_avg.f1 - (0.5 + 2.0 / 3.0) / 2.0).abs() < 1e-12);
        assert!((report.weighted_avg.recall - 0.6).abs() < 1e-12);
    }

    #[test]
    fn classes_never_predicted_score_zero() {
        let report = ClassificationReport::new(&labels(), &[0, 1], &[0, 0]);
        assert_eq!(report.classes[1].precision, 0.0);
        assert_eq!(report.classes[1].f1, 0.0);
    }

    #[test]
    fn report_renders_a_table() {
        let report = ClassificationReport::new(&labels(), &[0, 1], &[0, 1]);
        let text = report.to_string();
        assert!(text.contains("precision"));
        assert!(text.contains("weighted avg"));
        assert!(text.lines().any(|l| l.trim_start().starts_with("positive")));
    }
}
