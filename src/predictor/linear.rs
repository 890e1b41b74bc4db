use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use super::TransferFeeModel;
use crate::error::PredictionError;
use crate::models::prediction::{ FeatureRecord, FeatureValue };

/// Linear regression exported as JSON: numeric coefficients plus one weight
/// per known category. Unseen categories weigh nothing.
#[derive(Deserialize, Debug, Clone)]
pub struct LinearModel {
    pub intercept: f64,
    #[serde(default)]
    pub numeric: BTreeMap<String, f64>,
    #[serde(default)]
    pub categorical: BTreeMap<String, BTreeMap<String, f64>>,
}

impl LinearModel {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, PredictionError> {
        let path = path.as_ref();
        let artifact_error = |reason: String| PredictionError::Artifact {
            path: path.display().to_string(),
            reason,
        };
        let content = fs::read_to_string(path).map_err(|e| artifact_error(e.to_string()))?;
        Self::from_json(&content).map_err(|e| artifact_error(e.to_string()))
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

impl TransferFeeModel for LinearModel {
    fn predict(&self, record: &FeatureRecord) -> Result<f64, PredictionError> {
        let mut estimate = self.intercept;

        for (column, coefficient) in &self.numeric {
            match record.get(column) {
                Some(FeatureValue::Numeric(value)) => {
                    estimate += coefficient * value;
                }
                Some(FeatureValue::Categorical(_)) => {
                    return Err(
                        PredictionError::FeatureMismatch(
                            format!("column '{}' is categorical but has a numeric coefficient", column)
                        )
                    );
                }
                None => {
                    return Err(
                        PredictionError::FeatureMismatch(format!("column '{}' not in record", column))
                    );
                }
            }
        }

        for (column, weights) in &self.categorical {
            match record.get(column) {
                Some(FeatureValue::Categorical(value)) => {
                    estimate += weights.get(value).copied().unwrap_or(0.0);
                }
                Some(FeatureValue::Numeric(_)) => {
                    return Err(
                        PredictionError::FeatureMismatch(
                            format!("column '{}' is numeric but has category weights", column)
                        )
                    );
                }
                None => {
                    return Err(
                        PredictionError::FeatureMismatch(format!("column '{}' not in record", column))
                    );
                }
            }
        }

        Ok(estimate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> FeatureRecord {
        FeatureRecord {
            season: 2024,
            window: "Summer".into(),
            player_age: 25,
            player_nation: "Germany".into(),
            player_pos: "FW".into(),
            market_val_amnt: 20_000_000,
            is_free: 0,
            is_loan: 1,
            is_loan_end: 0,
            is_retired: 0,
        }
    }

    #[test]
    fn sums_intercept_numeric_and_categorical_terms() {
        let model = LinearModel::from_json(
            r#"{
                "intercept": 1000.0,
                "numeric": { "market_val_amnt": 0.5, "player_age": -100.0, "is_loan": -2000.0 },
                "categorical": {
                    "player_pos": { "FW": 500.0, "GK": -500.0 },
                    "window": { "Summer": 250.0 }
                }
            }"#
        ).unwrap();
        let estimate = model.predict(&record()).unwrap();
        assert_eq!(estimate, 1000.0 + 10_000_000.0 - 2500.0 - 2000.0 + 500.0 + 250.0);
    }

    #[test]
    fn unseen_category_contributes_nothing() {
        let model = LinearModel::from_json(
            r#"{ "intercept": 42.0, "categorical": { "player_nation": { "France": 9.0 } } }"#
        ).unwrap();
        assert_eq!(model.predict(&record()).unwrap(), 42.0);
    }

    #[test]
    fn unknown_column_surfaces_at_prediction_time() {
        let model = LinearModel::from_json(
            r#"{ "intercept": 0.0, "numeric": { "contract_years": 3.0 } }"#
        ).unwrap();
        assert!(matches!(model.predict(&record()), Err(PredictionError::FeatureMismatch(_))));
    }

    #[test]
    fn wrong_column_kind_is_a_mismatch() {
        let model = LinearModel::from_json(
            r#"{ "intercept": 0.0, "numeric": { "player_nation": 1.0 } }"#
        ).unwrap();
        assert!(matches!(model.predict(&record()), Err(PredictionError::FeatureMismatch(_))));

        let model = LinearModel::from_json(
            r#"{ "intercept": 0.0, "categorical": { "season": { "2024": 1.0 } } }"#
        ).unwrap();
        assert!(matches!(model.predict(&record()), Err(PredictionError::FeatureMismatch(_))));
    }

    #[test]
    fn missing_file_is_an_artifact_error() {
        let err = LinearModel::from_path("missing/transfer_fee_model.json").unwrap_err();
        assert!(matches!(err, PredictionError::Artifact { .. }));
    }

    #[test]
    fn nation_outside_the_artifact_scores_like_no_nation_weights() {
        let path = concat!(env!("CARGO_MANIFEST_DIR"), "/transfer_fee_model.json");
        let model = LinearModel::from_path(path).unwrap();
        let mut without_nations = model.clone();
        without_nations.categorical.remove("player_nation");

        let mut unlisted = record();
        unlisted.player_nation = "Atlantis".into();
        assert_eq!(model.predict(&unlisted).unwrap(), without_nations.predict(&unlisted).unwrap());
        assert_ne!(model.predict(&record()).unwrap(), without_nations.predict(&record()).unwrap());
    }

    #[test]
    fn bundled_artifact_parses() {
        let model = LinearModel::from_path(
            concat!(env!("CARGO_MANIFEST_DIR"), "/transfer_fee_model.json")
        ).unwrap();
        assert!(model.predict(&record()).unwrap().is_finite());
    }
}
