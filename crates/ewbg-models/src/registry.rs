use std::str::FromStr;

use serde::{Deserialize, Serialize};

use ewbg_core::{ErrorInfo, EwbgError, PotentialModel, SmConstants};

use crate::portal::{DarkPortalModel, PortalParams};
use crate::quartic::QuarticModel;

/// Implemented model identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ModelId {
    /// Single-field thermal quartic toy.
    Quartic,
    /// Higgs plus dark-charged singlet portal.
    DarkPortal,
}

impl ModelId {
    /// Stable CLI/config name of the model.
    pub fn as_str(&self) -> &'static str {
        match self {
            ModelId::Quartic => "quartic",
            ModelId::DarkPortal => "dark-portal",
        }
    }

    /// Vev output column labels of the model, known without an instance.
    pub fn vev_legend(&self) -> Vec<String> {
        match self {
            ModelId::Quartic => vec!["omega_c".into()],
            ModelId::DarkPortal => vec!["omega_c".into(), "omega_sc".into()],
        }
    }
}

impl FromStr for ModelId {
    type Err = EwbgError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.to_ascii_lowercase().as_str() {
            "quartic" => Ok(ModelId::Quartic),
            "dark-portal" | "darkportal" | "vdm" => Ok(ModelId::DarkPortal),
            other => Err(EwbgError::Config(
                ErrorInfo::new("model_unknown", "model name not recognised")
                    .with_context("model", other)
                    .with_hint("known models: quartic, dark-portal"),
            )),
        }
    }
}

/// Builds a model instance from one whitespace-delimited parameter row.
///
/// `use_index_col` skips a leading row-index column, matching input files
/// whose legend starts with an index label.
pub fn build_model(
    id: ModelId,
    line: &str,
    use_index_col: bool,
    sm: &SmConstants,
) -> Result<Box<dyn PotentialModel + Send + Sync>, EwbgError> {
    match id {
        ModelId::Quartic => {
            let mut fields = Vec::new();
            let raw: Vec<&str> = line.split_whitespace().collect();
            let start = usize::from(use_index_col);
            for token in raw.iter().skip(start) {
                let value = token.parse::<f64>().map_err(|err| {
                    EwbgError::Input(
                        ErrorInfo::new("quartic_row_parse", "non-numeric parameter column")
                            .with_context("token", *token)
                            .with_context("cause", err.to_string()),
                    )
                })?;
                fields.push(value);
            }
            Ok(Box::new(QuarticModel::from_fields(&fields)?))
        }
        ModelId::DarkPortal => {
            let params = PortalParams::from_line(line, use_index_col)?;
            Ok(Box::new(DarkPortalModel::new(params, sm.clone())?))
        }
    }
}
