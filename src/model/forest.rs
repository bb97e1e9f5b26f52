//! Regression tree ensemble (random forest / boosted trees).
//!
//! Trees are stored as flat node arrays rooted at index 0. A split sends the
//! row left when `row[feature] <= threshold`. Child indices are always greater
//! than their parent's, so traversal terminates in at most `nodes.len()` steps.

use serde::{Deserialize, Serialize};

use super::{check_width, ModelError, Regressor};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TreeNode {
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf {
        value: f64,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Tree {
    pub nodes: Vec<TreeNode>,
}

impl Tree {
    fn validate(&self, tree_index: usize, n_features: usize) -> Result<(), ModelError> {
        let invalid = |msg: String| ModelError::InvalidArtifact(format!("tree {tree_index}: {msg}"));

        if self.nodes.is_empty() {
            return Err(invalid("has no nodes".into()));
        }
        for (i, node) in self.nodes.iter().enumerate() {
            match *node {
                TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    if feature >= n_features {
                        return Err(invalid(format!(
                            "node {i} splits on feature {feature}, model has {n_features}"
                        )));
                    }
                    if !threshold.is_finite() {
                        return Err(invalid(format!("node {i} threshold is not finite")));
                    }
                    for child in [left, right] {
                        if child <= i || child >= self.nodes.len() {
                            return Err(invalid(format!(
                                "node {i} has out-of-order child {child}"
                            )));
                        }
                    }
                }
                TreeNode::Leaf { value } => {
                    if !value.is_finite() {
                        return Err(invalid(format!("leaf {i} value is not finite")));
                    }
                }
            }
        }
        Ok(())
    }

    /// Walk from the root to a leaf. A path visits each node at most once,
    /// so more than `nodes.len()` steps means the tree has a cycle.
    fn evaluate(&self, row: &[f64]) -> Result<f64, ModelError> {
        let mut index = 0;
        for _ in 0..self.nodes.len() {
            match self.nodes.get(index) {
                Some(TreeNode::Leaf { value }) => return Ok(*value),
                Some(TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                }) => {
                    let x = row.get(*feature).copied().unwrap_or(0.0);
                    index = if x <= *threshold { *left } else { *right };
                }
                None => {
                    return Err(ModelError::InvalidArtifact(format!(
                        "node index {index} out of bounds"
                    )))
                }
            }
        }
        Err(ModelError::InvalidArtifact(format!(
            "no leaf reached after {} steps; the tree has a cycle",
            self.nodes.len()
        )))
    }
}

/// How per-tree outputs are combined.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Aggregation {
    /// Bagged forests average their trees.
    #[default]
    Mean,
    /// Boosted ensembles add their trees.
    Sum,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeEnsemble {
    pub feature_names: Vec<String>,
    #[serde(default)]
    pub base_score: f64,
    #[serde(default)]
    pub aggregation: Aggregation,
    pub trees: Vec<Tree>,
}

impl TreeEnsemble {
    pub(super) fn validate(&self) -> Result<(), ModelError> {
        if self.trees.is_empty() {
            return Err(ModelError::InvalidArtifact(
                "tree ensemble has no trees".into(),
            ));
        }
        if !self.base_score.is_finite() {
            return Err(ModelError::InvalidArtifact(
                "base_score is not finite".into(),
            ));
        }
        let n_features = self.feature_names.len();
        for (i, tree) in self.trees.iter().enumerate() {
            tree.validate(i, n_features)?;
        }
        Ok(())
    }
}

impl Regressor for TreeEnsemble {
    fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    fn predict(&self, row: &[f64]) -> Result<f64, ModelError> {
        check_width(row, self.feature_names.len())?;
        let mut total = 0.0;
        for tree in &self.trees {
            total += tree.evaluate(row)?;
        }
        let combined = match self.aggregation {
            Aggregation::Mean => total / self.trees.len() as f64,
            Aggregation::Sum => total,
        };
        Ok(self.base_score + combined)
    }

    fn kind(&self) -> &'static str {
        "tree_ensemble"
    }
}
