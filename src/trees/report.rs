//! Indented text dump of a built tree.
use super::node::TreeNode;
use std::fmt::Write;

/// Renders `node` one edge per line as `level + name + ":" + branch`, where `level` grows by
/// one `-` per depth. Subtrees no training row reached are left out; a node whose subtrees
/// are all left out prints its first branch. Leaves print `target:value`.
pub fn format_tree(node: &TreeNode) -> String {
    let mut out = String::new();
    write_node(&mut out, "", node);
    out
}

fn write_node(out: &mut String, level: &str, node: &TreeNode) {
    match node {
        TreeNode::Failure => {
            let _ = writeln!(out, "{}{}:{}", level, node.name(), node.name());
        }
        TreeNode::Leaf {
            attribute, value, ..
        } => {
            let _ = writeln!(out, "{}{}:{}", level, attribute.name(), value);
        }
        TreeNode::Internal {
            attribute,
            branches,
        } => {
            let reached = branches
                .iter()
                .filter(|(_, child)| !child.is_failure())
                .collect::<Vec<_>>();

            if reached.is_empty() {
                let first = branches
                    .first()
                    .map(|(branch, _)| branch.to_string())
                    .unwrap_or_default();
                let _ = writeln!(out, "{}{}:{}", level, attribute.name(), first);
                return;
            }

            let deeper = format!("{}-", level);
            for (branch, child) in reached {
                let _ = writeln!(out, "{}{}:{}", level, attribute.name(), branch);
                write_node(out, &deeper, child);
            }
        }
    }
}
