use crate::error::{Error, Result};
use nalgebra::DMatrix;

/// Counts of (actual, predicted) class pairs. Rows are actual classes, columns predicted.
///
/// With two classes the second one, the last in sorted order, is the positive class.
#[derive(Clone, Debug, PartialEq)]
pub struct ConfusionMatrix {
    classes: Vec<String>,
    counts: DMatrix<usize>,
}

impl ConfusionMatrix {
    pub fn new<I, S>(classes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let classes: Vec<String> = classes.into_iter().map(Into::into).collect();
        let counts = DMatrix::zeros(classes.len(), classes.len());
        Self { classes, counts }
    }

    /// Records one prediction. Returns `false`, recording nothing, when either label is
    /// not one of the known classes.
    pub fn record(&mut self, actual: &str, predicted: &str) -> bool {
        let row = self.classes.iter().position(|class| class == actual);
        let column = self.classes.iter().position(|class| class == predicted);
        match (row, column) {
            (Some(row), Some(column)) => {
                self.counts[(row, column)] += 1;
                true
            }
            _ => false,
        }
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    pub fn counts(&self) -> &DMatrix<usize> {
        &self.counts
    }

    pub fn total(&self) -> usize {
        self.counts.sum()
    }

    /// Computes the accuracy over the recorded predictions.
    ///
    /// # Errors
    ///
    /// [`Error::EmptyTestSet`] when nothing was recorded.
    pub fn accuracy(&self) -> Result<f64> {
        let total = self.total();
        if total == 0 {
            return Err(Error::EmptyTestSet);
        }
        let correct: usize = self.counts.diagonal().iter().sum();
        Ok(correct as f64 / total as f64)
    }

    /// Precision of the positive class for two classes, macro-averaged otherwise.
    pub fn precision(&self) -> f64 {
        let num_classes = self.counts.nrows();

        if num_classes == 2 {
            let tp = self.counts[(1, 1)];
            let fp = self.counts[(0, 1)];

            if tp + fp > 0 {
                return tp as f64 / (tp + fp) as f64;
            }
        }

        let mut precision_total = 0.0;
        for class in 0..num_classes {
            let tp = self.counts[(class, class)];
            let fp = self.counts.column(class).sum() - tp;

            if tp + fp > 0 {
                precision_total += tp as f64 / (tp + fp) as f64;
            }
        }

        if num_classes == 0 {
            0.0
        } else {
            precision_total / num_classes as f64
        }
    }

    /// Recall of the positive class for two classes, macro-averaged otherwise.
    pub fn recall(&self) -> f64 {
        let num_classes = self.counts.nrows();

        if num_classes == 2 {
            let tp = self.counts[(1, 1)];
            let fn_ = self.counts[(1, 0)];

            if tp + fn_ > 0 {
                return tp as f64 / (tp + fn_) as f64;
            }
        }

        let mut recall_total = 0.0;
        for class in 0..num_classes {
            let tp = self.counts[(class, class)];
            let fn_ = self.counts.row(class).sum() - tp;

            if tp + fn_ > 0 {
                recall_total += tp as f64 / (tp + fn_) as f64;
            }
        }

        if num_classes == 0 {
            0.0
        } else {
            recall_total / num_classes as f64
        }
    }

    /// Harmonic mean of precision and recall, undefined when both are 0.
    pub fn f1_score(&self) -> Option<f64> {
        let precision = self.precision();
        let recall = self.recall();

        if (precision + recall).abs() < f64::EPSILON {
            None
        } else {
            Some(2.0 * (precision * recall) / (precision + recall))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn filled(classes: &[&str], pairs: &[(&str, &str)]) -> ConfusionMatrix {
        let mut matrix = ConfusionMatrix::new(classes.iter().copied());
        for (actual, predicted) in pairs {
            assert!(matrix.record(actual, predicted));
        }
        matrix
    }

    fn binary() -> ConfusionMatrix {
        filled(
            &["No", "Yes"],
            &[
                ("Yes", "Yes"),
                ("No", "Yes"),
                ("Yes", "No"),
                ("No", "No"),
                ("Yes", "Yes"),
            ],
        )
    }

    fn multiclass() -> ConfusionMatrix {
        filled(
            &["a", "b", "c"],
            &[
                ("a", "a"),
                ("b", "c"),
                ("c", "b"),
                ("b", "b"),
                ("a", "a"),
                ("c", "c"),
            ],
        )
    }

    #[test]
    fn test_confusion_matrix() {
        let expected = DMatrix::from_vec(2, 2, vec![1, 1, 1, 2]);

        assert_eq!(binary().counts(), &expected);
    }

    #[test]
    fn test_confusion_matrix_multiclass() {
        let expected = DMatrix::from_vec(3, 3, vec![2, 0, 0, 0, 1, 1, 0, 1, 1]);

        assert_eq!(multiclass().counts(), &expected);
    }

    #[test]
    fn test_record_unknown_label() {
        let mut matrix = ConfusionMatrix::new(["No", "Yes"]);

        assert!(!matrix.record("Yes", "Failure"));
        assert_eq!(matrix.total(), 0);
    }

    #[test]
    fn test_accuracy() {
        assert_relative_eq!(binary().accuracy().unwrap(), 0.6);
    }

    #[test]
    fn test_accuracy_empty() {
        let matrix = ConfusionMatrix::new(["No", "Yes"]);

        assert!(matches!(matrix.accuracy(), Err(Error::EmptyTestSet)));
    }

    #[test]
    fn test_precision_and_recall() {
        assert_relative_eq!(binary().precision(), 2.0 / 3.0);
        assert_relative_eq!(binary().recall(), 2.0 / 3.0);
        assert_relative_eq!(binary().f1_score().unwrap(), 2.0 / 3.0);
    }

    #[test]
    fn test_precision_multiclass() {
        let expected = (2.0 / 2.0 + 1.0 / 2.0 + 1.0 / 2.0) / 3.0;

        assert_relative_eq!(multiclass().precision(), expected);
        assert_relative_eq!(multiclass().recall(), expected);
    }

    #[test]
    fn test_f1_score_undefined() {
        let matrix = filled(&["No", "Yes"], &[("Yes", "No"), ("Yes", "No")]);

        assert_eq!(matrix.precision(), 0.0);
        assert_eq!(matrix.recall(), 0.0);
        assert!(matrix.f1_score().is_none());
    }
}
