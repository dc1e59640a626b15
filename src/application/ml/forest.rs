//! Tree-ensemble classifier loaded from a JSON artifact.
//!
//! The artifact carries everything inference needs: the trained column order,
//! the class labels, an ordinal encoder for each categorical column and the
//! trees themselves. Probabilities are the mean of the per-tree leaf
//! distributions and the predicted label is their argmax.

use super::predictor::Classifier;
use crate::domain::errors::{ArtifactError, PredictionError};
use crate::domain::ml::feature_registry::{FEATURE_NAMES, FeatureKind, feature_kind};
use crate::domain::ml::{Cell, TabularBatch};
use crate::domain::prediction::RatingCategory;
use ndarray::{Array2, ArrayView1};
use serde::Deserialize;
use std::collections::{HashMap, HashSet};

const SUPPORTED_MODEL_TYPES: &[&str] = &["random_forest", "decision_tree"];

/// On-disk layout of the model artifact.
#[derive(Debug, Clone, Deserialize)]
pub struct ForestArtifact {
    #[serde(default = "default_model_type")]
    pub model_type: String,
    pub feature_columns: Vec<String>,
    #[serde(default = "default_classes")]
    pub classes: Vec<RatingCategory>,
    #[serde(default)]
    pub encoders: HashMap<String, CategoryEncoder>,
    pub trees: Vec<TreeSpec>,
}

fn default_model_type() -> String {
    "random_forest".to_string()
}

fn default_classes() -> Vec<RatingCategory> {
    RatingCategory::ALL.to_vec()
}

/// Ordinal encoder for one categorical column.
///
/// A value is encoded as its position in `categories`. Values never seen at
/// training time map to `unknown_value` when one is set and are rejected
/// otherwise.
#[derive(Debug, Clone, Deserialize)]
pub struct CategoryEncoder {
    pub categories: Vec<String>,
    #[serde(default)]
    pub unknown_value: Option<f64>,
}

impl CategoryEncoder {
    fn encode(&self, value: &str) -> Option<f64> {
        self.categories
            .iter()
            .position(|c| c == value)
            .map(|idx| idx as f64)
            .or(self.unknown_value)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct TreeSpec {
    pub nodes: Vec<Node>,
}

/// Tree node. Node 0 is the root; a split sends `x <= threshold` left.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Node {
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf {
        value: Vec<f64>,
    },
}

#[derive(Debug)]
pub struct ForestClassifier {
    name: String,
    feature_columns: Vec<String>,
    classes: Vec<RatingCategory>,
    /// One slot per feature column, `Some` for categorical columns
    encoders: Vec<Option<CategoryEncoder>>,
    /// Leaf distributions are normalized at load time
    trees: Vec<Vec<Node>>,
}

impl ForestClassifier {
    pub fn from_slice(bytes: &[u8], path: &str) -> Result<Self, ArtifactError> {
        let artifact: ForestArtifact =
            serde_json::from_slice(bytes).map_err(|source| ArtifactError::Parse {
                path: path.to_string(),
                source,
            })?;
        Self::try_from(artifact)
    }

    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }

    fn encode(&self, batch: &TabularBatch) -> Result<Array2<f64>, PredictionError> {
        if batch.columns() != self.feature_columns.as_slice() {
            return Err(PredictionError::inference(format!(
                "Batch columns {:?} do not match trained columns {:?}",
                batch.columns(),
                self.feature_columns
            )));
        }

        let mut matrix = Array2::<f64>::zeros((batch.len(), self.feature_columns.len()));
        for (row_idx, row) in batch.rows().iter().enumerate() {
            for (col_idx, cell) in row.iter().enumerate() {
                let column = &self.feature_columns[col_idx];
                matrix[[row_idx, col_idx]] = match (cell, &self.encoders[col_idx]) {
                    (Cell::Numeric(value), None) => *value,
                    (Cell::Categorical(value), Some(encoder)) => {
                        encoder.encode(value).ok_or_else(|| {
                            PredictionError::malformed(format!(
                                "movies[{}].{}: unknown category '{}'",
                                row_idx, column, value
                            ))
                        })?
                    }
                    (cell, _) => {
                        return Err(PredictionError::inference(format!(
                            "Column '{}' cannot hold {:?}",
                            column, cell
                        )));
                    }
                };
            }
        }
        Ok(matrix)
    }

    fn leaf<'a>(nodes: &'a [Node], row: ArrayView1<f64>) -> &'a [f64] {
        let mut idx = 0;
        loop {
            match &nodes[idx] {
                Node::Leaf { value } => return value,
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    idx = if row[*feature] <= *threshold {
                        *left
                    } else {
                        *right
                    };
                }
            }
        }
    }
}

impl TryFrom<ForestArtifact> for ForestClassifier {
    type Error = ArtifactError;

    fn try_from(artifact: ForestArtifact) -> Result<Self, Self::Error> {
        let invalid = |reason: String| ArtifactError::Invalid { reason };

        if !SUPPORTED_MODEL_TYPES.contains(&artifact.model_type.as_str()) {
            return Err(invalid(format!(
                "unsupported model_type '{}'",
                artifact.model_type
            )));
        }

        // Columns: every registered feature exactly once, in any order.
        let mut seen = HashSet::new();
        for column in &artifact.feature_columns {
            if feature_kind(column).is_none() {
                return Err(invalid(format!("unknown feature column '{}'", column)));
            }
            if !seen.insert(column.as_str()) {
                return Err(invalid(format!("duplicate feature column '{}'", column)));
            }
        }
        if seen.len() != FEATURE_NAMES.len() {
            return Err(invalid(format!(
                "expected {} feature columns, found {}",
                FEATURE_NAMES.len(),
                seen.len()
            )));
        }

        if artifact.classes.is_empty() {
            return Err(invalid("no class labels".to_string()));
        }
        let unique: HashSet<_> = artifact.classes.iter().collect();
        if unique.len() != artifact.classes.len() {
            return Err(invalid("duplicate class labels".to_string()));
        }

        let mut encoders_by_name = artifact.encoders;
        let mut encoders = Vec::with_capacity(artifact.feature_columns.len());
        for column in &artifact.feature_columns {
            match feature_kind(column) {
                Some(FeatureKind::Categorical) => {
                    let encoder = encoders_by_name.remove(column).ok_or_else(|| {
                        invalid(format!("missing encoder for column '{}'", column))
                    })?;
                    if encoder.unknown_value.is_some_and(|v| !v.is_finite()) {
                        return Err(invalid(format!(
                            "non-finite unknown_value for column '{}'",
                            column
                        )));
                    }
                    encoders.push(Some(encoder));
                }
                _ => encoders.push(None),
            }
        }
        if let Some(extra) = encoders_by_name.keys().next() {
            return Err(invalid(format!(
                "encoder given for non-categorical column '{}'",
                extra
            )));
        }

        if artifact.trees.is_empty() {
            return Err(invalid("no trees".to_string()));
        }
        if artifact.model_type == "decision_tree" && artifact.trees.len() != 1 {
            return Err(invalid(format!(
                "decision_tree artifact holds {} trees",
                artifact.trees.len()
            )));
        }

        let n_columns = artifact.feature_columns.len();
        let n_classes = artifact.classes.len();
        let mut trees = Vec::with_capacity(artifact.trees.len());
        for (tree_idx, tree) in artifact.trees.into_iter().enumerate() {
            if tree.nodes.is_empty() {
                return Err(invalid(format!("tree {} has no nodes", tree_idx)));
            }
            let n_nodes = tree.nodes.len();
            let mut nodes = Vec::with_capacity(n_nodes);
            for (node_idx, node) in tree.nodes.into_iter().enumerate() {
                let at = format!("tree {} node {}", tree_idx, node_idx);
                match node {
                    Node::Split {
                        feature,
                        threshold,
                        left,
                        right,
                    } => {
                        if feature >= n_columns {
                            return Err(invalid(format!(
                                "{}: feature {} out of range",
                                at, feature
                            )));
                        }
                        if !threshold.is_finite() {
                            return Err(invalid(format!("{}: non-finite threshold", at)));
                        }
                        // Children after parents keeps traversal acyclic.
                        for child in [left, right] {
                            if child <= node_idx || child >= n_nodes {
                                return Err(invalid(format!(
                                    "{}: bad child index {}",
                                    at, child
                                )));
                            }
                        }
                        nodes.push(Node::Split {
                            feature,
                            threshold,
                            left,
                            right,
                        });
                    }
                    Node::Leaf { value } => {
                        if value.len() != n_classes {
                            return Err(invalid(format!(
                                "{}: leaf has {} entries for {} classes",
                                at,
                                value.len(),
                                n_classes
                            )));
                        }
                        if value.iter().any(|v| !v.is_finite() || *v < 0.0) {
                            return Err(invalid(format!(
                                "{}: negative or non-finite leaf entry",
                                at
                            )));
                        }
                        let total: f64 = value.iter().sum();
                        if total <= 0.0 {
                            return Err(invalid(format!("{}: empty leaf distribution", at)));
                        }
                        if !total.is_finite() {
                            return Err(invalid(format!("{}: leaf total overflows", at)));
                        }
                        nodes.push(Node::Leaf {
                            value: value.into_iter().map(|v| v / total).collect(),
                        });
                    }
                }
            }
            trees.push(nodes);
        }

        Ok(Self {
            name: artifact.model_type,
            feature_columns: artifact.feature_columns,
            classes: artifact.classes,
            encoders,
            trees,
        })
    }
}

impl Classifier for ForestClassifier {
    fn feature_columns(&self) -> &[String] {
        &self.feature_columns
    }

    fn classes(&self) -> &[RatingCategory] {
        &self.classes
    }

    fn predict(&self, batch: &TabularBatch) -> Result<Vec<usize>, PredictionError> {
        let proba = self.predict_proba(batch)?;
        Ok(argmax_rows(&proba))
    }

    fn predict_proba(&self, batch: &TabularBatch) -> Result<Array2<f64>, PredictionError> {
        let encoded = self.encode(batch)?;
        let mut proba = Array2::<f64>::zeros((batch.len(), self.classes.len()));

        for (row_idx, row) in encoded.rows().into_iter().enumerate() {
            let mut out = proba.row_mut(row_idx);
            for tree in &self.trees {
                for (acc, p) in out.iter_mut().zip(Self::leaf(tree, row.view())) {
                    *acc += p;
                }
            }
        }

        let n_trees = self.trees.len() as f64;
        proba.mapv_inplace(|v| v / n_trees);
        Ok(proba)
    }

    fn predict_scored(
        &self,
        batch: &TabularBatch,
    ) -> Result<(Vec<usize>, Array2<f64>), PredictionError> {
        let proba = self.predict_proba(batch)?;
        Ok((argmax_rows(&proba), proba))
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// First maximum wins so ties resolve to the lowest class index.
fn argmax_rows(proba: &Array2<f64>) -> Vec<usize> {
    proba
        .rows()
        .into_iter()
        .map(|row| {
            let mut best = 0;
            for (idx, p) in row.iter().enumerate() {
                if *p > row[best] {
                    best = idx;
                }
            }
            best
        })
        .collect()
}
