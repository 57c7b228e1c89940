use crate::error::{Error, Result};

/// How rows are divided between training and testing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SplitMethod {
    /// Leading rows train, the remaining rows test.
    Holdout,
    /// Rows are dealt at random into `folds` folds; each fold is tested once against a
    /// tree trained on the others.
    CrossFold { folds: usize },
}

#[derive(Clone, Debug, PartialEq)]
pub struct EvaluationParams {
    train_size: f64,
    method: SplitMethod,
    seed: Option<u64>,
}

impl Default for EvaluationParams {
    fn default() -> Self {
        Self::new()
    }
}

impl EvaluationParams {
    pub fn new() -> Self {
        Self {
            train_size: 0.75,
            method: SplitMethod::Holdout,
            seed: None,
        }
    }

    pub fn set_train_size(&mut self, train_size: f64) -> Result<()> {
        if !(train_size > 0.0 && train_size < 1.0) {
            return Err(Error::Parameters(
                "the train size must be strictly between 0.0 and 1.0".into(),
            ));
        }
        self.train_size = train_size;
        Ok(())
    }

    pub fn set_method(&mut self, method: SplitMethod) -> Result<()> {
        if let SplitMethod::CrossFold { folds } = method {
            if folds < 2 {
                return Err(Error::Parameters(
                    "cross-fold evaluation needs at least 2 folds".into(),
                ));
            }
        }
        self.method = method;
        Ok(())
    }

    /// Seeds the fold shuffling; `None` draws a seed from the OS.
    pub fn set_seed(&mut self, seed: Option<u64>) {
        self.seed = seed;
    }

    pub fn train_size(&self) -> f64 {
        self.train_size
    }

    pub fn method(&self) -> SplitMethod {
        self.method
    }

    pub fn seed(&self) -> Option<u64> {
        self.seed
    }
}
