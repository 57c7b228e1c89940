//! End-to-end run: parse, split, build, evaluate, report.
pub mod params;

use crate::data::dataset::{Dataset, Row};
use crate::error::{Error, Result};
use crate::metrics::evaluation::{evaluate, Evaluation};
use crate::trees::id3::DecisionTree;
use crate::trees::report::format_tree;
use params::{EvaluationParams, SplitMethod};
use rand::{rngs::StdRng, Rng, SeedableRng};
use std::fmt;
use tracing::{info, instrument};

/// A tree together with its score on the rows it was not trained on.
#[derive(Clone, Debug)]
pub struct Trial {
    pub tree: DecisionTree,
    pub evaluation: Evaluation,
}

/// Everything printed at the end of a run.
#[derive(Clone, Debug)]
pub struct Report {
    entries: usize,
    attributes: Vec<String>,
    method: SplitMethod,
    trials: Vec<Trial>,
}

impl Report {
    pub fn entries(&self) -> usize {
        self.entries
    }

    pub fn attributes(&self) -> &[String] {
        &self.attributes
    }

    pub fn trials(&self) -> &[Trial] {
        &self.trials
    }

    /// Mean of the per-trial rates, skipping trials with an empty test set.
    pub fn mean_rate(&self) -> Option<f64> {
        let rates = self
            .trials
            .iter()
            .filter_map(|trial| trial.evaluation.rate())
            .collect::<Vec<_>>();
        if rates.is_empty() {
            return None;
        }
        Some(rates.iter().sum::<usize>() as f64 / rates.len() as f64)
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "The file has {} entries", self.entries)?;
        writeln!(f, "The attributes are:")?;
        for name in &self.attributes {
            writeln!(f, "- {}", name)?;
        }

        for (fold, trial) in self.trials.iter().enumerate() {
            writeln!(f)?;
            if let SplitMethod::CrossFold { .. } = self.method {
                writeln!(f, "Fold {}:", fold + 1)?;
            }
            writeln!(f, "The tree is:")?;
            if let Some(root) = trial.tree.root() {
                write!(f, "{}", format_tree(root))?;
            }
            writeln!(f)?;
            write_evaluation(f, &trial.evaluation)?;
        }

        if let SplitMethod::CrossFold { .. } = self.method {
            writeln!(f)?;
            match self.mean_rate() {
                Some(rate) => writeln!(f, "Mean rate: {:.2}%", rate)?,
                None => writeln!(f, "Mean rate: undefined")?,
            }
        }
        Ok(())
    }
}

fn write_evaluation(f: &mut fmt::Formatter<'_>, evaluation: &Evaluation) -> fmt::Result {
    writeln!(f, "Successful: {}", evaluation.success())?;
    writeln!(f, "Failure: {}", evaluation.failure())?;
    writeln!(f, "Unclassified: {}", evaluation.unclassified())?;
    match evaluation.rate() {
        Some(rate) => writeln!(f, "Rate: {}%", rate)?,
        None => writeln!(f, "Rate: undefined")?,
    }

    let confusion = evaluation.confusion();
    if confusion.total() == 0 {
        return Ok(());
    }
    writeln!(f, "Precision: {:.2}", confusion.precision())?;
    writeln!(f, "Recall: {:.2}", confusion.recall())?;
    match confusion.f1_score() {
        Some(f1) => writeln!(f, "F1 score: {:.2}", f1)?,
        None => writeln!(f, "F1 score: undefined")?,
    }
    writeln!(f, "Confusion matrix (actual by predicted):")?;
    for (class, counts) in confusion.classes().iter().zip(confusion.counts().row_iter()) {
        let counts = counts.iter().map(ToString::to_string).collect::<Vec<_>>();
        writeln!(f, "{}: {}", class, counts.join(" "))?;
    }
    Ok(())
}

/// Parses `lines` and evaluates an ID3 tree on them as `params` describes.
///
/// # Errors
///
/// Malformed declarations or rows ([`Error::Parse`], [`Error::Format`]) abort the run, as
/// do parameters the dataset cannot satisfy.
#[instrument(skip_all, fields(method = ?params.method()))]
pub fn run<S: AsRef<str>>(lines: &[S], params: &EvaluationParams) -> Result<Report> {
    let dataset = Dataset::from_lines(lines)?;
    info!(
        entries = dataset.len(),
        attributes = dataset.attributes().len(),
        "loaded dataset"
    );

    let trials = match params.method() {
        SplitMethod::Holdout => {
            let (train, test) = dataset.train_test_split(params.train_size())?;
            let train = train.iter().collect::<Vec<_>>();
            let test = test.iter().collect::<Vec<_>>();
            vec![trial(&dataset, &train, &test)?]
        }
        SplitMethod::CrossFold { folds } => {
            let mut rng = match params.seed() {
                Some(seed) => StdRng::seed_from_u64(seed),
                None => StdRng::from_entropy(),
            };
            cross_validate(&dataset, folds, &mut rng)?
        }
    };

    Ok(Report {
        entries: dataset.len(),
        attributes: dataset
            .attributes()
            .iter()
            .map(|attribute| attribute.name().to_string())
            .collect(),
        method: params.method(),
        trials,
    })
}

/// Trains on every fold but one and tests on the one left out, once per fold.
pub fn cross_validate<R: Rng + ?Sized>(
    dataset: &Dataset,
    folds: usize,
    rng: &mut R,
) -> Result<Vec<Trial>> {
    let folds = dataset.cross_folds(folds, rng)?;

    folds
        .iter()
        .enumerate()
        .map(|(held_out, test)| {
            let train = folds
                .iter()
                .enumerate()
                .filter(|&(fold, _)| fold != held_out)
                .flat_map(|(_, rows)| rows.iter().copied())
                .collect::<Vec<_>>();
            info!(fold = held_out + 1, train = train.len(), test = test.len(), "fold");
            trial(dataset, &train, test)
        })
        .collect()
}

fn trial(dataset: &Dataset, train: &[&Row], test: &[&Row]) -> Result<Trial> {
    let mut tree = DecisionTree::new();
    tree.fit(dataset.predictors(), dataset.target(), train)?;

    let root = tree
        .root()
        .ok_or_else(|| Error::Parameters("tree wasn't built".into()))?;
    let evaluation = evaluate(root, dataset.target(), test);
    info!(
        success = evaluation.success(),
        failure = evaluation.failure(),
        rate = ?evaluation.rate(),
        "trial finished"
    );

    Ok(Trial { tree, evaluation })
}
