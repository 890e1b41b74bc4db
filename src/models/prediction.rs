use serde::{ Deserialize, Serialize };
use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;

use crate::error::PredictionError;

pub const SEASON_RANGE: RangeInclusive<i32> = 2000..=2025;
pub const AGE_RANGE: RangeInclusive<i32> = 16..=40;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransferWindow {
    Summer,
    Winter,
}

impl TransferWindow {
    pub const ALL: [TransferWindow; 2] = [TransferWindow::Summer, TransferWindow::Winter];

    pub fn as_str(&self) -> &'static str {
        match self {
            TransferWindow::Summer => "Summer",
            TransferWindow::Winter => "Winter",
        }
    }
}

impl FromStr for TransferWindow {
    type Err = PredictionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "Summer" => Ok(TransferWindow::Summer),
            "Winter" => Ok(TransferWindow::Winter),
            other =>
                Err(PredictionError::InvalidInput(format!("unknown transfer window '{}'", other))),
        }
    }
}

impl fmt::Display for TransferWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayerPosition {
    GK,
    DF,
    MF,
    FW,
}

impl PlayerPosition {
    pub const ALL: [PlayerPosition; 4] = [
        PlayerPosition::GK,
        PlayerPosition::DF,
        PlayerPosition::MF,
        PlayerPosition::FW,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PlayerPosition::GK => "GK",
            PlayerPosition::DF => "DF",
            PlayerPosition::MF => "MF",
            PlayerPosition::FW => "FW",
        }
    }
}

impl FromStr for PlayerPosition {
    type Err = PredictionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "GK" => Ok(PlayerPosition::GK),
            "DF" => Ok(PlayerPosition::DF),
            "MF" => Ok(PlayerPosition::MF),
            "FW" => Ok(PlayerPosition::FW),
            other =>
                Err(PredictionError::InvalidInput(format!("unknown player position '{}'", other))),
        }
    }
}

impl fmt::Display for PlayerPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Everything a user fills in to get a transfer fee estimate.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PredictionInput {
    pub season: i32,
    pub window: TransferWindow,
    pub player_age: i32,
    pub player_nation: String,
    pub player_pos: PlayerPosition,
    pub market_val_amnt: i64,
    #[serde(default)]
    pub is_free: bool,
    #[serde(default)]
    pub is_loan: bool,
    #[serde(default)]
    pub is_loan_end: bool,
    #[serde(default)]
    pub is_retired: bool,
}

impl PredictionInput {
    pub fn validate(&self) -> Result<(), PredictionError> {
        if !SEASON_RANGE.contains(&self.season) {
            return Err(
                PredictionError::InvalidInput(
                    format!(
                        "season must be between {} and {} (got {})",
                        SEASON_RANGE.start(),
                        SEASON_RANGE.end(),
                        self.season
                    )
                )
            );
        }
        if !AGE_RANGE.contains(&self.player_age) {
            return Err(
                PredictionError::InvalidInput(
                    format!(
                        "player age must be between {} and {} (got {})",
                        AGE_RANGE.start(),
                        AGE_RANGE.end(),
                        self.player_age
                    )
                )
            );
        }
        Ok(())
    }

    pub fn to_record(&self) -> FeatureRecord {
        FeatureRecord::from(self)
    }
}

/// The single row handed to the model. Flags are already encoded as 0/1.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct FeatureRecord {
    pub season: i32,
    pub window: String,
    pub player_age: i32,
    pub player_nation: String,
    pub player_pos: String,
    pub market_val_amnt: i64,
    pub is_free: u8,
    pub is_loan: u8,
    pub is_loan_end: u8,
    pub is_retired: u8,
}

impl From<&PredictionInput> for FeatureRecord {
    fn from(input: &PredictionInput) -> Self {
        Self {
            season: input.season,
            window: input.window.as_str().to_string(),
            player_age: input.player_age,
            player_nation: input.player_nation.clone(),
            player_pos: input.player_pos.as_str().to_string(),
            market_val_amnt: input.market_val_amnt,
            is_free: u8::from(input.is_free),
            is_loan: u8::from(input.is_loan),
            is_loan_end: u8::from(input.is_loan_end),
            is_retired: u8::from(input.is_retired),
        }
    }
}

/// A named column of a [`FeatureRecord`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum FeatureValue<'a> {
    Numeric(f64),
    Categorical(&'a str),
}

impl FeatureRecord {
    pub const COLUMNS: [&'static str; 10] = [
        "season",
        "window",
        "player_age",
        "player_nation",
        "player_pos",
        "market_val_amnt",
        "is_free",
        "is_loan",
        "is_loan_end",
        "is_retired",
    ];

    pub fn get(&self, column: &str) -> Option<FeatureValue<'_>> {
        let value = match column {
            "season" => FeatureValue::Numeric(self.season as f64),
            "window" => FeatureValue::Categorical(&self.window),
            "player_age" => FeatureValue::Numeric(self.player_age as f64),
            "player_nation" => FeatureValue::Categorical(&self.player_nation),
            "player_pos" => FeatureValue::Categorical(&self.player_pos),
            "market_val_amnt" => FeatureValue::Numeric(self.market_val_amnt as f64),
            "is_free" => FeatureValue::Numeric(self.is_free as f64),
            "is_loan" => FeatureValue::Numeric(self.is_loan as f64),
            "is_loan_end" => FeatureValue::Numeric(self.is_loan_end as f64),
            "is_retired" => FeatureValue::Numeric(self.is_retired as f64),
            _ => {
                return None;
            }
        };
        Some(value)
    }
}

/// Raw predictor form as posted by the browser. Every field stays a string so
/// that bad values come back to the user as a message instead of a rejection.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct PredictForm {
    #[serde(default)]
    pub season: String,
    #[serde(default)]
    pub window: String,
    #[serde(default)]
    pub player_age: String,
    #[serde(default)]
    pub player_nation: String,
    #[serde(default)]
    pub player_pos: String,
    #[serde(default)]
    pub market_val_amnt: String,
    #[serde(default)]
    pub is_free: Option<String>,
    #[serde(default)]
    pub is_loan: Option<String>,
    #[serde(default)]
    pub is_loan_end: Option<String>,
    #[serde(default)]
    pub is_retired: Option<String>,
}

impl Default for PredictForm {
    fn default() -> Self {
        Self {
            season: "2024".into(),
            window: TransferWindow::Summer.as_str().into(),
            player_age: "25".into(),
            player_nation: "Germany".into(),
            player_pos: PlayerPosition::GK.as_str().into(),
            market_val_amnt: "20000000".into(),
            is_free: None,
            is_loan: None,
            is_loan_end: None,
            is_retired: None,
        }
    }
}

fn checkbox(value: &Option<String>) -> bool {
    matches!(value.as_deref().map(str::trim), Some("on") | Some("true") | Some("1"))
}

fn parse_number<T: FromStr>(label: &str, raw: &str) -> Result<T, PredictionError> {
    raw.trim()
        .parse::<T>()
        .map_err(|_| PredictionError::InvalidInput(format!("{} must be a whole number (got '{}')", label, raw)))
}

impl PredictForm {
    pub fn is_checked(&self, field: &str) -> bool {
        match field {
            "is_free" => checkbox(&self.is_free),
            "is_loan" => checkbox(&self.is_loan),
            "is_loan_end" => checkbox(&self.is_loan_end),
            "is_retired" => checkbox(&self.is_retired),
            _ => false,
        }
    }
}

impl TryFrom<&PredictForm> for PredictionInput {
    type Error = PredictionError;

    fn try_from(form: &PredictForm) -> Result<Self, Self::Error> {
        let input = PredictionInput {
            season: parse_number("season", &form.season)?,
            window: form.window.parse()?,
            player_age: parse_number("player age", &form.player_age)?,
            player_nation: form.player_nation.clone(),
            player_pos: form.player_pos.parse()?,
            market_val_amnt: parse_number("market value", &form.market_val_amnt)?,
            is_free: checkbox(&form.is_free),
            is_loan: checkbox(&form.is_loan),
            is_loan_end: checkbox(&form.is_loan_end),
            is_retired: checkbox(&form.is_retired),
        };
        input.validate()?;
        Ok(input)
    }
}
