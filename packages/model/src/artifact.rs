//! On-disk representation of a trained rent model.
//!
//! The artifact is a JSON-serialized gradient-boosted regression tree
//! ensemble. Trees are stored as flat node arrays where every child index is
//! strictly greater than its parent's, so evaluation always terminates.

use std::collections::BTreeSet;

use rent_predictor_property_models::FeatureKind;
use serde::{Deserialize, Serialize};

use crate::ModelError;

/// The only artifact layout this crate understands.
pub const SUPPORTED_FORMAT_VERSION: u32 = 1;

/// Root of a model artifact file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelArtifact {
    /// Layout version, checked against [`SUPPORTED_FORMAT_VERSION`].
    pub format_version: u32,
    /// Name of the predicted column.
    #[serde(default)]
    pub target: Option<String>,
    /// Input columns in training order.
    pub features: Vec<ArtifactFeature>,
    /// Constant added to the sum of all tree outputs.
    pub base_score: f64,
    /// The tree ensemble.
    pub trees: Vec<Tree>,
    /// Importances computed on a held-out set at training time, if one was
    /// available.
    #[serde(default)]
    pub feature_importance: Option<Vec<ImportanceEntry>>,
}

/// An input column as seen at training time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArtifactFeature {
    /// Column name.
    pub name: String,
    /// Column kind.
    pub kind: FeatureKind,
    /// Vocabulary for categorical columns. A value is encoded as its index
    /// here; values outside the vocabulary are treated as missing.
    #[serde(default)]
    pub categories: Vec<String>,
}

/// A single regression tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tree {
    /// Nodes; index 0 is the root.
    pub nodes: Vec<Node>,
}

/// A tree node.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Node {
    /// Goes `left` when the encoded feature value is below `threshold`.
    Split {
        /// Index into [`ModelArtifact::features`].
        feature: usize,
        /// Split threshold on the encoded value.
        threshold: f64,
        /// Node index taken when the value is below the threshold.
        left: usize,
        /// Node index taken otherwise.
        right: usize,
        /// Whether missing values go left.
        #[serde(default)]
        missing_left: bool,
    },
    /// Terminal node.
    Leaf {
        /// Contribution of this leaf.
        leaf: f64,
    },
}

/// A precomputed importance score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportanceEntry {
    /// Feature name.
    pub feature: String,
    /// Importance score.
    pub importance: f64,
}

fn incompatible(message: impl Into<String>) -> ModelError {
    ModelError::Incompatible {
        message: message.into(),
    }
}

impl ModelArtifact {
    /// Checks that the artifact can be evaluated by this crate.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::Incompatible`] for an unsupported format version,
    /// duplicate or vocabulary-less features, dangling node references, or
    /// non-finite scores.
    pub fn validate(&self) -> Result<(), ModelError> {
        if self.format_version != SUPPORTED_FORMAT_VERSION {
            return Err(incompatible(format!(
                "unsupported format version {} (expected {SUPPORTED_FORMAT_VERSION})",
                self.format_version
            )));
        }

        if self.features.is_empty() {
            return Err(incompatible("artifact declares no features"));
        }

        let mut names = BTreeSet::new();
        for feature in &self.features {
            if !names.insert(feature.name.as_str()) {
                return Err(incompatible(format!("duplicate feature '{}'", feature.name)));
            }
            if feature.kind == FeatureKind::Categorical && feature.categories.is_empty() {
                return Err(incompatible(format!(
                    "categorical feature '{}' has no categories",
                    feature.name
                )));
            }
        }

        if !self.base_score.is_finite() {
            return Err(incompatible("base score is not finite"));
        }

        for (tree_idx, tree) in self.trees.iter().enumerate() {
            self.validate_tree(tree_idx, tree)?;
        }

        if let Some(entries) = &self.feature_importance
            && let Some(entry) = entries.iter().find(|e| !e.importance.is_finite())
        {
            return Err(incompatible(format!(
                "importance of '{}' is not finite",
                entry.feature
            )));
        }

        Ok(())
    }

    fn validate_tree(&self, tree_idx: usize, tree: &Tree) -> Result<(), ModelError> {
        if tree.nodes.is_empty() {
            return Err(incompatible(format!("tree {tree_idx} has no nodes")));
        }

        for (idx, node) in tree.nodes.iter().enumerate() {
            match node {
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                    ..
                } => {
                    if *feature >= self.features.len() {
                        return Err(incompatible(format!(
                            "tree {tree_idx} node {idx} splits on unknown feature {feature}"
                        )));
                    }
                    if !threshold.is_finite() {
                        return Err(incompatible(format!(
                            "tree {tree_idx} node {idx} has a non-finite threshold"
                        )));
                    }
                    for child in [*left, *right] {
                        if child <= idx || child >= tree.nodes.len() {
                            return Err(incompatible(format!(
                                "tree {tree_idx} node {idx} has invalid child {child}"
                            )));
                        }
                    }
                }
                Node::Leaf { leaf } => {
                    if !leaf.is_finite() {
                        return Err(incompatible(format!(
                            "tree {tree_idx} leaf {idx} is not finite"
                        )));
                    }
                }
            }
        }

        Ok(())
    }
}

impl Tree {
    /// Walks the tree for one encoded row (`None` = missing value).
    ///
    /// Returns `None` if the walk leaves the node array, splits on a column
    /// the row does not have, or steps back to an earlier node.
    pub(crate) fn evaluate(&self, encoded: &[Option<f64>]) -> Option<f64> {
        let mut idx = 0;
        loop {
            match self.nodes.get(idx)? {
                Node::Leaf { leaf } => return Some(*leaf),
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                    missing_left,
                } => {
                    let next = match *encoded.get(*feature)? {
                        Some(value) if value < *threshold => *left,
                        Some(_) => *right,
                        None if *missing_left => *left,
                        None => *right,
                    };
                    if next <= idx {
                        return None;
                    }
                    idx = next;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn split(feature: usize, left: usize, right: usize) -> Node {
        Node::Split {
            feature,
            threshold: 10.0,
            left,
            right,
            missing_left: false,
        }
    }

    #[test]
    fn follows_threshold_and_missing_branches() {
        let tree = Tree {
            nodes: vec![split(0, 1, 2), Node::Leaf { leaf: 1.0 }, Node::Leaf { leaf: 2.0 }],
        };
        assert_eq!(tree.evaluate(&[Some(5.0)]), Some(1.0));
        assert_eq!(tree.evaluate(&[Some(10.0)]), Some(2.0));
        assert_eq!(tree.evaluate(&[None]), Some(2.0));
    }

    #[test]
    fn malformed_trees_do_not_panic_or_loop() {
        assert_eq!(Tree { nodes: vec![] }.evaluate(&[]), None);

        let dangling = Tree {
            nodes: vec![split(0, 1, 5), Node::Leaf { leaf: 1.0 }],
        };
        assert_eq!(dangling.evaluate(&[Some(50.0)]), None);

        let short_row = Tree {
            nodes: vec![split(3, 1, 2), Node::Leaf { leaf: 1.0 }, Node::Leaf { leaf: 2.0 }],
        };
        assert_eq!(short_row.evaluate(&[Some(1.0)]), None);

        let cycle = Tree {
            nodes: vec![split(0, 0, 0)],
        };
        assert_eq!(cycle.evaluate(&[Some(1.0)]), None);
    }
}
