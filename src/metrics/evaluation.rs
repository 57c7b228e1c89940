//! Scoring a built tree against held-out rows.
use super::confusion::ConfusionMatrix;
use crate::data::attribute::Attribute;
use crate::data::dataset::Row;
use crate::error::{Error, Result};
use crate::trees::id3::classify;
use crate::trees::node::TreeNode;
use tracing::{debug, warn};

/// Outcome of classifying every test row.
#[derive(Clone, Debug, PartialEq)]
pub struct Evaluation {
    success: usize,
    failure: usize,
    unclassified: usize,
    confusion: ConfusionMatrix,
}

impl Evaluation {
    pub fn success(&self) -> usize {
        self.success
    }

    /// Misclassified rows, including the ones no branch accepted.
    pub fn failure(&self) -> usize {
        self.failure
    }

    /// Rows no branch accepted, or too short to read.
    pub fn unclassified(&self) -> usize {
        self.unclassified
    }

    pub fn total(&self) -> usize {
        self.success + self.failure
    }

    /// Success percentage rounded up, `None` for an empty test set.
    pub fn rate(&self) -> Option<usize> {
        match self.total() {
            0 => None,
            total => Some((self.success * 100).div_ceil(total)),
        }
    }

    pub fn accuracy(&self) -> Result<f64> {
        match self.total() {
            0 => Err(Error::EmptyTestSet),
            total => Ok(self.success as f64 / total as f64),
        }
    }

    pub fn confusion(&self) -> &ConfusionMatrix {
        &self.confusion
    }
}

/// Classifies every row and compares the prediction with the row's trimmed target value.
///
/// A row that no branch accepts is logged and counted as a failure instead of aborting
/// the evaluation.
pub fn evaluate(tree: &TreeNode, target: &Attribute, rows: &[&Row]) -> Evaluation {
    let mut evaluation = Evaluation {
        success: 0,
        failure: 0,
        unclassified: 0,
        confusion: ConfusionMatrix::new(target.values()),
    };

    for (position, &row) in rows.iter().enumerate() {
        let outcome = target
            .field(row)
            .and_then(|actual| Ok((actual, classify(tree, row)?)));
        match outcome {
            Ok((actual, Some(predicted))) => {
                evaluation.confusion.record(actual, predicted);
                if predicted == actual {
                    evaluation.success += 1;
                } else {
                    evaluation.failure += 1;
                }
            }
            Ok((_, None)) => {
                debug!(row = position, "row reached an untrained leaf");
                evaluation.failure += 1;
            }
            Err(err) => {
                warn!(row = position, %err, "row could not be classified");
                evaluation.unclassified += 1;
                evaluation.failure += 1;
            }
        }
    }

    debug!(
        success = evaluation.success,
        failure = evaluation.failure,
        unclassified = evaluation.unclassified,
        "evaluated test rows"
    );
    evaluation
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::attribute::Branch;
    use crate::trees::node::LeafKind;
    use approx::assert_relative_eq;

    fn rows(data: &[&str]) -> Vec<Row> {
        data.iter().map(|line| line.split(',').collect()).collect()
    }

    fn play() -> Attribute {
        Attribute::categorical("Play", 1, ["Yes", "No"])
    }

    fn weather_tree() -> TreeNode {
        TreeNode::Internal {
            attribute: Attribute::categorical("Weather", 0, ["Rain", "Sunny"]),
            branches: vec![
                (
                    Branch::Value("Rain".into()),
                    TreeNode::leaf(&play(), "No", LeafKind::Uniform),
                ),
                (Branch::Value("Sunny".into()), TreeNode::Failure),
            ],
        }
    }

    #[test]
    fn test_evaluate_counts() {
        let data = rows(&["Rain,No", "Rain,Yes", "Sunny,Yes", "Snow,No"]);
        let refs = data.iter().collect::<Vec<_>>();

        let evaluation = evaluate(&weather_tree(), &play(), &refs);

        assert_eq!(evaluation.success(), 1);
        assert_eq!(evaluation.failure(), 3);
        assert_eq!(evaluation.unclassified(), 1);
        assert_eq!(evaluation.total(), refs.len());
        assert_eq!(evaluation.rate(), Some(25));
        assert_relative_eq!(evaluation.accuracy().unwrap(), 0.25);
        assert_eq!(evaluation.confusion().total(), 2);
    }

    #[test]
    fn test_evaluate_untrained_leaf_never_succeeds() {
        let outcome = Attribute::categorical("Outcome", 1, ["Failure", "Success"]);
        let tree = TreeNode::Internal {
            attribute: Attribute::categorical("Weather", 0, ["Rain", "Sunny"]),
            branches: vec![
                (
                    Branch::Value("Rain".into()),
                    TreeNode::leaf(&outcome, "Success", LeafKind::Uniform),
                ),
                (Branch::Value("Sunny".into()), TreeNode::Failure),
            ],
        };
        let data = rows(&["Sunny,Failure", "Rain,Success"]);
        let refs = data.iter().collect::<Vec<_>>();

        let evaluation = evaluate(&tree, &outcome, &refs);

        assert_eq!(evaluation.success(), 1);
        assert_eq!(evaluation.failure(), 1);
        assert_eq!(evaluation.unclassified(), 0);
        assert_eq!(evaluation.confusion().total(), 1);
    }

    #[test]
    fn test_evaluate_short_row_is_unclassified() {
        let data = rows(&["Rain,No", "Rain"]);
        let refs = data.iter().collect::<Vec<_>>();

        let evaluation = evaluate(&weather_tree(), &play(), &refs);

        assert_eq!(evaluation.success(), 1);
        assert_eq!(evaluation.failure(), 1);
        assert_eq!(evaluation.unclassified(), 1);
    }

    #[test]
    fn test_evaluate_rate_rounds_up() {
        let data = rows(&["Rain,No", "Rain,Yes", "Rain,Yes"]);
        let refs = data.iter().collect::<Vec<_>>();

        let evaluation = evaluate(&weather_tree(), &play(), &refs);

        assert_eq!(evaluation.rate(), Some(34));
    }

    #[test]
    fn test_evaluate_empty_test_set() {
        let evaluation = evaluate(&weather_tree(), &play(), &[]);

        assert_eq!(evaluation.total(), 0);
        assert_eq!(evaluation.rate(), None);
        assert!(matches!(evaluation.accuracy(), Err(Error::EmptyTestSet)));
    }
}
