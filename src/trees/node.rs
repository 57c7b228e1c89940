use crate::data::attribute::{Attribute, Branch};

/// Name printed for leaves that no training row reached.
pub const FAILURE: &str = "Failure";

/// How a non-failure leaf settled on its value.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LeafKind {
    /// Every row reaching the leaf had this target value.
    Uniform,
    /// Attributes ran out; the most frequent target value was taken.
    Majority,
}

/// Decision tree node
///
/// Internal nodes pair every branch label with the subtree built from the rows on that
/// branch, in label order.
#[derive(Clone, Debug, PartialEq)]
pub enum TreeNode {
    Failure,
    Leaf {
        attribute: Attribute,
        value: String,
        kind: LeafKind,
    },
    Internal {
        attribute: Attribute,
        branches: Vec<(Branch, TreeNode)>,
    },
}

impl TreeNode {
    pub fn leaf(target: &Attribute, value: &str, kind: LeafKind) -> Self {
        TreeNode::Leaf {
            attribute: target.clone(),
            value: value.to_string(),
            kind,
        }
    }

    pub fn is_leaf(&self) -> bool {
        !matches!(self, TreeNode::Internal { .. })
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, TreeNode::Failure)
    }

    /// Name of the tested attribute, the target for leaves.
    pub fn name(&self) -> &str {
        match self {
            TreeNode::Failure => FAILURE,
            TreeNode::Leaf { attribute, .. } | TreeNode::Internal { attribute, .. } => {
                attribute.name()
            }
        }
    }

    pub fn depth(&self) -> usize {
        match self {
            TreeNode::Internal { branches, .. } => {
                1 + branches
                    .iter()
                    .map(|(_, child)| child.depth())
                    .max()
                    .unwrap_or(0)
            }
            _ => 0,
        }
    }

    pub fn leaf_count(&self) -> usize {
        match self {
            TreeNode::Internal { branches, .. } => {
                branches.iter().map(|(_, child)| child.leaf_count()).sum()
            }
            _ => 1,
        }
    }
}
