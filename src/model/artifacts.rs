//! Artifact loading
//!
//! Reads the model, the label encoders and the training feature names from
//! their JSON files and cross-checks them before the server starts.

use serde::de::DeserializeOwned;
use std::collections::{BTreeMap, HashSet};

use super::encoder::LabelEncoder;
use super::error::ArtifactError;
use super::regressor::Regressor;
use crate::config::ModelConfig;

/// Encoders keyed by feature name
pub type EncoderMap = BTreeMap<String, LabelEncoder>;

/// Everything needed to score a request, loaded once at startup
#[derive(Debug, Clone)]
pub struct ModelArtifacts {
    pub regressor: Regressor,
    pub encoders: EncoderMap,
    pub feature_names: Vec<String>,
}

impl ModelArtifacts {
    /// Load and validate all three artifacts
    pub fn load(config: &ModelConfig) -> Result<Self, ArtifactError> {
        let regressor: Regressor = read_json(&config.model_path)?;
        let encoders: EncoderMap = read_json(&config.encoders_path)?;
        let feature_names: Vec<String> = read_json(&config.feature_names_path)?;

        validate_feature_names(&feature_names).map_err(|message| ArtifactError::Invalid {
            path: config.feature_names_path.clone(),
            message,
        })?;
        regressor
            .validate(feature_names.len())
            .map_err(|message| ArtifactError::Invalid {
                path: config.model_path.clone(),
                message,
            })?;

        Ok(Self {
            regressor,
            encoders,
            feature_names,
        })
    }
}

fn read_json<T: DeserializeOwned>(path: &str) -> Result<T, ArtifactError> {
    let data = std::fs::read(path).map_err(|source| ArtifactError::Io {
        path: path.to_string(),
        source,
    })?;
    serde_json::from_slice(&data).map_err(|source| ArtifactError::Parse {
        path: path.to_string(),
        source,
    })
}

fn validate_feature_names(names: &[String]) -> Result<(), String> {
    if names.is_empty() {
        return Err("feature name list is empty".to_string());
    }
    let mut seen = HashSet::with_capacity(names.len());
    for name in names {
        if name.is_empty() {
            return Err("feature name list contains an empty name".to_string());
        }
        if !seen.insert(name.as_str()) {
            return Err(format!("duplicate feature name '{name}'"));
        }
    }
    Ok(())
}
