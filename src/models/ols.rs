//! Ordinary least squares regression results.
//!
//! The regression itself is computed elsewhere; this type carries its
//! reported statistics together with the design matrix and response, so
//! fitted values and residuals can be derived here:
//!
//! ```text
//! fitted = X β
//! resid  = y - X β
//! ```

use std::any::Any;

use nalgebra::{DMatrix, DVector};
use serde::{Deserialize, Serialize};

use crate::domain::{ExtractOptions, FitResult, Kind, LeafType, TypeTag};
use crate::error::{Result, TidyError};
use crate::models::decode_leaf;
use crate::registry::{Collaborator, Registry};
use crate::table::{Table, Value};

/// Name of the constant regressor, left out of `augment` output.
pub const INTERCEPT: &str = "Intercept";

const AUGMENT_COLUMNS: [&str; 3] = ["_fitted", "_se_fit", "_resid"];

/// Serialized form of an [`OlsResult`] (row-major design matrix).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OlsRecord {
    pub exog: Vec<Vec<f64>>,
    pub exog_names: Vec<String>,
    pub endog: Vec<f64>,
    #[serde(default = "default_endog_name")]
    pub endog_name: String,
    pub params: Vec<f64>,
    pub bse: Vec<f64>,
    pub tvalues: Vec<f64>,
    pub pvalues: Vec<f64>,
    pub rsquared: f64,
    pub rsquared_adj: f64,
    pub fvalue: f64,
    pub f_pvalue: f64,
    pub df_model: f64,
    pub df_resid: f64,
    pub aic: f64,
    pub bic: f64,
}

fn default_endog_name() -> String {
    "y".to_string()
}

/// A validated OLS result: all per-term vectors have one entry per column of
/// the design matrix, and the response has one entry per row.
#[derive(Debug, Clone, Deserialize)]
#[serde(try_from = "OlsRecord")]
pub struct OlsResult {
    exog: DMatrix<f64>,
    endog: DVector<f64>,
    params: DVector<f64>,
    record: OlsRecord,
}

impl TryFrom<OlsRecord> for OlsResult {
    type Error = TidyError;

    fn try_from(record: OlsRecord) -> Result<Self> {
        let invalid = |reason: String| TidyError::InvalidResult {
            type_name: OlsResult::TAG.to_string(),
            reason,
        };
        let n = record.endog.len();
        let k = record.exog_names.len();

        if record.exog.len() != n {
            return Err(invalid(format!("exog has {} rows but endog has {n} values", record.exog.len())));
        }
        if let Some((i, row)) = record.exog.iter().enumerate().find(|(_, row)| row.len() != k) {
            return Err(invalid(format!("exog row {i} has {} values, expected {k}", row.len())));
        }
        for (label, v) in [
            ("params", &record.params),
            ("bse", &record.bse),
            ("tvalues", &record.tvalues),
            ("pvalues", &record.pvalues),
        ] {
            if v.len() != k {
                return Err(invalid(format!("{label} has {} values, expected {k}", v.len())));
            }
        }

        let mut seen = std::collections::HashSet::new();
        if let Some(dup) = record.exog_names.iter().find(|name| !seen.insert(name.as_str())) {
            return Err(invalid(format!("exog_names lists '{dup}' more than once")));
        }
        if seen.contains(record.endog_name.as_str()) {
            return Err(invalid(format!("endog_name '{}' is also a regressor", record.endog_name)));
        }
        if let Some(name) = [record.endog_name.as_str()]
            .into_iter()
            .chain(seen.iter().copied())
            .find(|name| AUGMENT_COLUMNS.contains(name))
        {
            return Err(invalid(format!("'{name}' is reserved for augment output")));
        }

        let flat: Vec<f64> = record.exog.iter().flatten().copied().collect();
        Ok(OlsResult {
            exog: DMatrix::from_row_slice(n, k, &flat),
            endog: DVector::from_column_slice(&record.endog),
            params: DVector::from_column_slice(&record.params),
            record,
        })
    }
}

impl OlsResult {
    pub fn new(record: OlsRecord) -> Result<Self> {
        Self::try_from(record)
    }

    pub fn record(&self) -> &OlsRecord {
        &self.record
    }

    pub fn n_obs(&self) -> usize {
        self.endog.len()
    }

    pub fn fitted_values(&self) -> DVector<f64> {
        &self.exog * &self.params
    }

    pub fn residuals(&self) -> DVector<f64> {
        &self.endog - self.fitted_values()
    }
}

impl FitResult for OlsResult {
    fn type_tag(&self) -> TypeTag {
        Self::TAG
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl LeafType for OlsResult {
    const TAG: TypeTag = TypeTag("OlsResult");
}

/// Registers OLS extractors and the decoder.
pub struct OlsExtractors;

impl Collaborator for OlsExtractors {
    fn name(&self) -> &'static str {
        "ols"
    }

    fn register(&self, registry: &mut Registry) {
        registry.register_for::<OlsResult, _>(Kind::Tidy, tidy_ols);
        registry.register_for::<OlsResult, _>(Kind::Glance, glance_ols);
        registry.register_for::<OlsResult, _>(Kind::Augment, augment_ols);
        registry.register_decoder(OlsResult::TAG, decode_leaf::<OlsResult>);
    }
}

/// One row per regression term.
pub fn tidy_ols(result: &OlsResult, _opts: &ExtractOptions) -> Result<Table> {
    let r = &result.record;
    let mut table = Table::with_rows(r.exog_names.len());
    table.push_column("term", r.exog_names.iter().map(String::as_str))?;
    table.push_column("estimate", r.params.iter().copied())?;
    table.push_column("std_error", r.bse.iter().copied())?;
    table.push_column("statistic", r.tvalues.iter().copied())?;
    table.push_column("p_value", r.pvalues.iter().copied())?;
    Ok(table)
}

pub fn glance_ols(result: &OlsResult, _opts: &ExtractOptions) -> Result<Table> {
    let r = &result.record;
    Table::from_record([
        ("r_squared", Value::from(r.rsquared)),
        ("adj_r_squared", Value::from(r.rsquared_adj)),
        ("statistic", Value::from(r.fvalue)),
        ("p_value", Value::from(r.f_pvalue)),
        ("df", Value::from(r.df_model)),
        ("df_residual", Value::from(r.df_resid)),
        ("aic", Value::from(r.aic)),
        ("bic", Value::from(r.bic)),
    ])
}

/// One row per observation: response, regressors (without the intercept),
/// `_fitted`, `_se_fit`, `_resid`.
pub fn augment_ols(result: &OlsResult, _opts: &ExtractOptions) -> Result<Table> {
    let r = &result.record;
    let mut table = Table::with_rows(result.n_obs());
    table.push_column(r.endog_name.as_str(), result.endog.iter().copied())?;
    for (j, name) in r.exog_names.iter().enumerate() {
        if name == INTERCEPT {
            continue;
        }
        table.push_column(name.as_str(), result.exog.column(j).iter().copied())?;
    }
    table.push_column("_fitted", result.fitted_values().iter().copied())?;
    // Standard errors of the fit are not reported by the producer.
    table.push_column("_se_fit", std::iter::repeat_n(Value::Null, result.n_obs()))?;
    table.push_column("_resid", result.residuals().iter().copied())?;
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::fixtures;

    #[test]
    fn rejects_inconsistent_dimensions() {
        let mut record = fixtures::ols_record(10);
        record.bse.pop();
        assert!(matches!(OlsResult::new(record), Err(TidyError::InvalidResult { .. })));

        let mut record = fixtures::ols_record(10);
        record.endog.pop();
        assert!(OlsResult::new(record).is_err());
    }

    #[test]
    fn rejects_response_named_like_a_regressor() {
        let mut record = fixtures::ols_record(10);
        record.endog_name = "x".to_string();
        match OlsResult::new(record) {
            Err(TidyError::InvalidResult { reason, .. }) => assert!(reason.contains("endog_name"), "got {reason}"),
            other => panic!("expected InvalidResult, got {other:?}"),
        }
    }

    #[test]
    fn rejects_duplicate_and_reserved_names() {
        let mut record = fixtures::ols_record(10);
        record.exog_names = vec!["x".to_string(), "x".to_string()];
        let err = OlsResult::new(record).unwrap_err();
        assert!(err.to_string().contains("more than once"), "got {err}");

        let mut record = fixtures::ols_record(10);
        record.exog_names[1] = "_resid".to_string();
        let err = OlsResult::new(record).unwrap_err();
        assert!(err.to_string().contains("reserved"), "got {err}");
    }

    #[test]
    fn fitted_values_follow_design_matrix() {
        let result = OlsResult::new(fixtures::ols_record(5)).unwrap();
        let fitted = result.fitted_values();
        let r = result.record();
        for i in 0..5 {
            let expected = r.params[0] + r.params[1] * r.exog[i][1];
            assert!((fitted[i] - expected).abs() < 1e-12);
        }
        let resid = result.residuals();
        assert!((resid[0] - (r.endog[0] - fitted[0])).abs() < 1e-12);
    }

    #[test]
    fn tidy_has_one_row_per_term() {
        let result = OlsResult::new(fixtures::ols_record(20)).unwrap();
        let table = tidy_ols(&result, &ExtractOptions::default()).unwrap();
        assert_eq!(table.row_count(), 2);
        assert_eq!(table.column("term").unwrap().values(), &[Value::from("Intercept"), Value::from("x")]);
    }

    #[test]
    fn glance_is_one_row() {
        let result = OlsResult::new(fixtures::ols_record(20)).unwrap();
        let table = glance_ols(&result, &ExtractOptions::default()).unwrap();
        assert_eq!(table.row_count(), 1);
        assert_eq!(table.column_count(), 8);
    }

    #[test]
    fn augment_drops_intercept_column() {
        let result = OlsResult::new(fixtures::ols_record(50)).unwrap();
        let table = augment_ols(&result, &ExtractOptions::default()).unwrap();
        assert_eq!(table.row_count(), 50);
        assert_eq!(table.column_names(), vec!["y", "x", "_fitted", "_se_fit", "_resid"]);
        assert!(table.column("_se_fit").unwrap().values().iter().all(Value::is_null));
    }

    #[test]
    fn decodes_through_validation() {
        let mut json = serde_json::to_value(fixtures::ols_record(3)).unwrap();
        let result: OlsResult = serde_json::from_value(json.clone()).unwrap();
        assert_eq!(result.n_obs(), 3);

        json["params"] = serde_json::json!([1.0]);
        assert!(serde_json::from_value::<OlsResult>(json).is_err());
    }
}
