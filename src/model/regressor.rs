//! Regression models
//!
//! Two model kinds can be deserialized from the model artifact:
//! - `random_forest`: an ensemble of CART trees, output is the mean of the trees
//! - `linear`: intercept plus dot product with the coefficient vector
//!
//! Trees use the flat node-array layout of a fitted decision tree. Node `i`
//! is a leaf when `children_left[i] == -1`, otherwise the sample goes to
//! `children_left[i]` when `row[feature[i]] <= threshold[i]` and to
//! `children_right[i]` otherwise.

use serde::Deserialize;

/// Marker used in `children_left` / `children_right` for leaf nodes
const TREE_LEAF: i64 = -1;

/// Fitted regressor
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Regressor {
    RandomForest { trees: Vec<Tree> },
    Linear { intercept: f64, coefficients: Vec<f64> },
}

impl Regressor {
    /// Check the model against the number of training features
    pub fn validate(&self, feature_count: usize) -> Result<(), String> {
        match self {
            Self::RandomForest { trees } => {
                if trees.is_empty() {
                    return Err("random forest has no trees".to_string());
                }
                let required = self.required_features();
                if required > feature_count {
                    return Err(format!(
                        "trees split on feature index {} but only {feature_count} feature names are known",
                        required - 1
                    ));
                }
                Ok(())
            }
            Self::Linear {
                intercept,
                coefficients,
            } => {
                if coefficients.len() != feature_count {
                    return Err(format!(
                        "linear model has {} coefficients for {feature_count} features",
                        coefficients.len()
                    ));
                }
                if !intercept.is_finite() || coefficients.iter().any(|c| !c.is_finite()) {
                    return Err("linear model contains non-finite parameters".to_string());
                }
                Ok(())
            }
        }
    }

    /// Minimum row width the model reads from
    pub fn required_features(&self) -> usize {
        match self {
            Self::RandomForest { trees } => trees
                .iter()
                .map(Tree::required_features)
                .max()
                .unwrap_or(0),
            Self::Linear { coefficients, .. } => coefficients.len(),
        }
    }

    /// Predict a single row. The row must be at least
    /// [`required_features`](Self::required_features) wide.
    #[allow(clippy::cast_precision_loss)]
    pub fn predict(&self, row: &[f64]) -> f64 {
        match self {
            Self::RandomForest { trees } => {
                let sum: f64 = trees.iter().map(|tree| tree.predict(row)).sum();
                sum / trees.len() as f64
            }
            Self::Linear {
                intercept,
                coefficients,
            } => {
                intercept
                    + coefficients
                        .iter()
                        .zip(row)
                        .map(|(c, x)| c * x)
                        .sum::<f64>()
            }
        }
    }
}

/// Tree node after validation
#[derive(Debug, Clone, PartialEq)]
enum Node {
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf(f64),
}

/// Single regression tree
#[derive(Debug, Clone, Deserialize)]
#[serde(try_from = "RawTree")]
pub struct Tree {
    nodes: Vec<Node>,
}

/// Node arrays as stored in the artifact
#[derive(Debug, Deserialize)]
struct RawTree {
    children_left: Vec<i64>,
    children_right: Vec<i64>,
    feature: Vec<i64>,
    threshold: Vec<f64>,
    value: Vec<f64>,
}

impl TryFrom<RawTree> for Tree {
    type Error = String;

    fn try_from(raw: RawTree) -> Result<Self, Self::Error> {
        let n = raw.children_left.len();
        if n == 0 {
            return Err("tree has no nodes".to_string());
        }
        if [
            raw.children_right.len(),
            raw.feature.len(),
            raw.threshold.len(),
            raw.value.len(),
        ]
        .iter()
        .any(|&len| len != n)
        {
            return Err("tree node arrays have different lengths".to_string());
        }

        let mut nodes = Vec::with_capacity(n);
        for i in 0..n {
            let (left, right) = (raw.children_left[i], raw.children_right[i]);
            if left == TREE_LEAF && right == TREE_LEAF {
                let value = raw.value[i];
                if !value.is_finite() {
                    return Err(format!("leaf {i} has a non-finite value"));
                }
                nodes.push(Node::Leaf(value));
                continue;
            }

            // Children are stored after their parent, which also rules out cycles
            let child = |c: i64| {
                usize::try_from(c)
                    .ok()
                    .filter(|&c| c > i && c < n)
                    .ok_or_else(|| format!("node {i} has invalid child index {c}"))
            };
            let feature = usize::try_from(raw.feature[i])
                .map_err(|_| format!("node {i} has invalid feature index {}", raw.feature[i]))?;
            let threshold = raw.threshold[i];
            if threshold.is_nan() {
                return Err(format!("node {i} has a NaN threshold"));
            }
            nodes.push(Node::Split {
                feature,
                threshold,
                left: child(left)?,
                right: child(right)?,
            });
        }
        Ok(Self { nodes })
    }
}

impl Tree {
    fn required_features(&self) -> usize {
        self.nodes
            .iter()
            .filter_map(|node| match node {
                Node::Split { feature, .. } => Some(feature + 1),
                Node::Leaf(_) => None,
            })
            .max()
            .unwrap_or(0)
    }

    fn predict(&self, row: &[f64]) -> f64 {
        let mut index = 0;
        loop {
            match self.nodes[index] {
                Node::Leaf(value) => return value,
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    let x = row.get(feature).copied().unwrap_or(0.0);
                    index = if x <= threshold { left } else { right };
                }
            }
        }
    }
}
