//! ID3 decision tree with threshold splits on continuous attributes.
use super::gain::best_attribute;
use super::node::{LeafKind, TreeNode};
use crate::data::attribute::Attribute;
use crate::data::dataset::Row;
use crate::error::{Error, Result};
use tracing::{debug, instrument};

/// ID3 decision tree classifier
#[derive(Clone, Debug, Default)]
pub struct DecisionTree {
    root: Option<TreeNode>,
}

impl DecisionTree {
    pub fn new() -> Self {
        Self { root: None }
    }

    /// Builds the tree from the training rows.
    ///
    /// # Arguments
    ///
    /// * `predictors` - Attributes the tree may split on.
    /// * `target` - The categorical attribute to predict.
    /// * `rows` - Training rows.
    ///
    /// # Errors
    ///
    /// Fails with [`Error::Format`] when a continuous field is not a number.
    #[instrument(skip_all, fields(rows = rows.len()))]
    pub fn fit(
        &mut self,
        predictors: &[Attribute],
        target: &Attribute,
        rows: &[&Row],
    ) -> Result<()> {
        let root = build(predictors, target, rows)?;
        debug!(
            depth = root.depth(),
            leaves = root.leaf_count(),
            "finished building the tree"
        );
        self.root = Some(root);
        Ok(())
    }

    pub fn root(&self) -> Option<&TreeNode> {
        self.root.as_ref()
    }

    /// Predicts the target value of a single row, `None` when it lands on a leaf no
    /// training row reached.
    pub fn classify(&self, row: &Row) -> Result<Option<&str>> {
        let root = self
            .root
            .as_ref()
            .ok_or_else(|| Error::Parameters("tree wasn't built yet".into()))?;
        classify(root, row)
    }

    /// Predicts the target value of every row, failing on the first row no branch accepts.
    pub fn predict(&self, rows: &[&Row]) -> Result<Vec<Option<String>>> {
        rows.iter()
            .map(|row| Ok(self.classify(row)?.map(str::to_string)))
            .collect()
    }
}

/// Recursively builds the subtree for `rows`.
///
/// Each level consumes the chosen attribute, so the depth is bounded by
/// `attributes.len()`.
pub fn build(attributes: &[Attribute], target: &Attribute, rows: &[&Row]) -> Result<TreeNode> {
    let Some(first) = rows.first() else {
        return Ok(TreeNode::Failure);
    };

    let first_value = target.field(first)?;
    let mut uniform = true;
    for &row in rows {
        if target.field(row)? != first_value {
            uniform = false;
            break;
        }
    }
    if uniform {
        return Ok(TreeNode::leaf(target, first_value, LeafKind::Uniform));
    }

    if attributes.is_empty() {
        return Ok(TreeNode::leaf(
            target,
            most_frequent(target, rows)?,
            LeafKind::Majority,
        ));
    }

    let best = best_attribute(attributes, target, rows)?;
    debug!(
        attribute = best.name(),
        rows = rows.len(),
        branches = best.branches().len(),
        "split"
    );

    let remaining: Vec<Attribute> = attributes
        .iter()
        .filter(|attribute| attribute.index() != best.index())
        .cloned()
        .collect();

    let mut branches = Vec::with_capacity(best.branches().len());
    for branch in best.branches() {
        let mut subset = Vec::new();
        for &row in rows {
            if branch.matches(&best, row)? {
                subset.push(row);
            }
        }
        let child = build(&remaining, target, &subset)?;
        branches.push((branch.clone(), child));
    }

    Ok(TreeNode::Internal {
        attribute: best,
        branches,
    })
}

/// Most frequent target value; among equally frequent values the first seen wins.
fn most_frequent<'r>(target: &Attribute, rows: &[&'r Row]) -> Result<&'r str> {
    let mut counts: Vec<(&str, usize)> = Vec::new();
    for &row in rows {
        let value = target.field(row)?;
        match counts.iter_mut().find(|(seen, _)| *seen == value) {
            Some((_, count)) => *count += 1,
            None => counts.push((value, 1)),
        }
    }

    let mut best = ("", 0);
    for (value, count) in counts {
        if count > best.1 {
            best = (value, count);
        }
    }
    Ok(best.0)
}

/// Walks the tree from `node` down to a leaf and returns the predicted target value.
///
/// A leaf no training row reached predicts nothing and yields `None`.
///
/// # Errors
///
/// [`Error::Classification`] when none of a node's branches accepts the row's value.
pub fn classify<'t>(node: &'t TreeNode, row: &Row) -> Result<Option<&'t str>> {
    match node {
        TreeNode::Failure => Ok(None),
        TreeNode::Leaf { value, .. } => Ok(Some(value.as_str())),
        TreeNode::Internal {
            attribute,
            branches,
        } => {
            for (branch, child) in branches {
                if branch.matches(attribute, row)? {
                    return classify(child, row);
                }
            }
            Err(Error::Classification {
                attribute: attribute.name().to_string(),
                value: attribute.field(row)?.to_string(),
            })
        }
    }
}
