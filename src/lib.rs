//! # id3-tree
//!
//! `id3-tree` induces ID3 decision trees from ARFF-like text and scores them on held-out rows.
//! Categorical attributes branch once per declared value; continuous attributes are split on a
//! single discovered threshold.
//!
//! ## Example Usage
//!
//! Here's how you can build a tree on the first 75% of a small dataset and evaluate it on the rest:
//!
//! ```rust
//! use id3_tree::experiment::{params::EvaluationParams, run};
//!
//! let text = "\
//! @attribute Weather {Sunny,Rain}
//! @attribute Temp real
//! @attribute Play {Yes,No}
//! @data
//! Sunny,30,Yes
//! Rain,25,No
//! Sunny,22,Yes
//! Rain,18,No
//! Sunny,15,Yes
//! Rain,28,Yes
//! Sunny,20,Yes
//! Rain,26,No";
//!
//! let lines = text.lines().collect::<Vec<_>>();
//! let report = run(&lines, &EvaluationParams::default()).unwrap();
//!
//! assert_eq!(report.trials()[0].evaluation.rate(), Some(100));
//! println!("{}", report);
//! ```

/// Attribute declarations and dataset parsing
pub mod data;
/// Error types
pub mod error;
/// Building, evaluating and reporting in one run
pub mod experiment;
/// Functions for evaluating model performance
pub mod metrics;
/// Decision trees
pub mod trees;

pub use error::{Error, Result};
