pub mod linear;

use log::{ debug, error, info };
use std::path::Path;
use std::sync::Arc;

use crate::error::PredictionError;
use crate::models::prediction::{ FeatureRecord, PredictionInput };
use self::linear::LinearModel;

/// A loaded regression model: one row in, one estimate out.
pub trait TransferFeeModel: Send + Sync {
    fn predict(&self, record: &FeatureRecord) -> Result<f64, PredictionError>;
}

/// Read-only handle shared by every session. Holds either a loaded model or
/// the reason loading failed, so a missing artifact surfaces per prediction.
#[derive(Clone)]
pub struct Predictor {
    model: Result<Arc<dyn TransferFeeModel>, String>,
}

impl Predictor {
    pub fn new(model: Arc<dyn TransferFeeModel>) -> Self {
        Self { model: Ok(model) }
    }

    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self { model: Err(reason.into()) }
    }

    /// Loads the artifact at `path`. Failure is logged and kept, not returned.
    pub fn load<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        match LinearModel::from_path(path) {
            Ok(model) => {
                info!("Transfer fee model loaded from '{}'", path.display());
                Self::new(Arc::new(model))
            }
            Err(e) => {
                error!("{}", e);
                Self::unavailable(e.to_string())
            }
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.model.is_ok()
    }

    pub fn predict(&self, input: &PredictionInput) -> Result<f64, PredictionError> {
        let model = self.model.as_ref().map_err(|reason| PredictionError::ModelUnavailable(reason.clone()))?;
        let record = input.to_record();
        debug!("Prediction record: {}", serde_json::to_string(&record).unwrap_or_default());

        let estimate = model.predict(&record)?;
        if !estimate.is_finite() {
            return Err(PredictionError::NonFinite(estimate));
        }
        Ok(estimate)
    }
}

/// Formats an estimate as euros with thousands separators and two decimals.
pub fn format_currency(amount: f64) -> String {
    let fixed = format!("{:.2}", amount.abs());
    let (whole, cents) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let sign = if amount < 0.0 && fixed.chars().any(|c| c != '0' && c != '.') { "-" } else { "" };
    format!("{}€{}.{}", sign, grouped, cents)
}
