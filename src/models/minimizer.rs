//! Minimizer and model fit results.
//!
//! A `MinimizerResult` is the outcome of minimizing an objective over a set
//! of named, optionally bounded parameters. A `ModelResult` extends it with
//! the model that was fitted: the data, the independent variable and the
//! evaluated best fit. Extraction rules:
//!
//! - `tidy`: registered on `MinimizerResult` only; a `ModelResult` reaches it
//!   through its supertype.
//! - `glance`: registered on both; the model variant adds a `model` column.
//! - `augment`: `ModelResult` only (a bare minimizer has no data to augment).

use std::any::Any;
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::{ExtractOptions, FitResult, Kind, LeafType, TypeTag};
use crate::error::{Result, TidyError};
use crate::models::decode_leaf;
use crate::registry::{Collaborator, Registry};
use crate::table::{Table, Value};

/// One fitted parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
    pub name: String,
    pub value: f64,
    /// Lower bound; unbounded when absent.
    pub min: Option<f64>,
    /// Upper bound; unbounded when absent.
    pub max: Option<f64>,
    #[serde(default = "default_vary")]
    pub vary: bool,
    /// Constraint expression tying this parameter to others.
    pub expr: Option<String>,
    pub stderr: Option<f64>,
}

fn default_vary() -> bool {
    true
}

/// Outcome of a minimization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MinimizerResult {
    pub params: Vec<Parameter>,
    /// Starting values; derived parameters may have none.
    #[serde(default)]
    pub init_values: BTreeMap<String, f64>,
    pub method: String,
    pub nvarys: usize,
    pub ndata: usize,
    pub nfev: usize,
    pub chisqr: f64,
    pub redchi: f64,
    pub aic: f64,
    pub bic: f64,
    pub success: bool,
    #[serde(default)]
    pub message: String,
    /// Method-specific keyword arguments, reported as `<method>_<key>`.
    pub kws: Option<BTreeMap<String, Value>>,
    #[serde(default)]
    pub residual: Vec<f64>,
}

impl FitResult for MinimizerResult {
    fn type_tag(&self) -> TypeTag {
        Self::TAG
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl LeafType for MinimizerResult {
    const TAG: TypeTag = TypeTag("MinimizerResult");
}

/// One evaluated model component (for composite models).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Component {
    pub name: String,
    pub values: Vec<f64>,
}

/// Outcome of fitting a model to data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelResult {
    #[serde(flatten)]
    pub fit: MinimizerResult,
    pub model_name: String,
    pub independent_vars: Vec<String>,
    /// Values of the independent variables, by name.
    #[serde(default)]
    pub userkws: BTreeMap<String, Vec<f64>>,
    pub data: Vec<f64>,
    pub best_fit: Vec<f64>,
    #[serde(default)]
    pub components: Vec<Component>,
}

impl FitResult for ModelResult {
    fn type_tag(&self) -> TypeTag {
        Self::TAG
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn supertype(&self) -> Option<&dyn FitResult> {
        Some(&self.fit)
    }
}

impl LeafType for ModelResult {
    const TAG: TypeTag = TypeTag("ModelResult");
}

/// Registers minimizer/model extractors and decoders.
pub struct MinimizerExtractors;

impl Collaborator for MinimizerExtractors {
    fn name(&self) -> &'static str {
        "minimizer"
    }

    fn register(&self, registry: &mut Registry) {
        registry.register_for::<MinimizerResult, _>(Kind::Tidy, tidy_minimizer);
        registry.register_for::<MinimizerResult, _>(Kind::Glance, glance_minimizer);
        registry.register_for::<ModelResult, _>(Kind::Glance, glance_model);
        registry.register_for::<ModelResult, _>(Kind::Augment, augment_model);
        registry.register_decoder(MinimizerResult::TAG, decode_leaf::<MinimizerResult>);
        registry.register_decoder(ModelResult::TAG, decode_leaf::<ModelResult>);
    }
}

/// One row per parameter, sorted by name.
///
/// Columns: `name, value, min, max, vary, expr, stderr, init_value`.
pub fn tidy_minimizer(result: &MinimizerResult, _opts: &ExtractOptions) -> Result<Table> {
    let mut params: Vec<&Parameter> = result.params.iter().collect();
    params.sort_by(|a, b| a.name.cmp(&b.name));

    let mut table = Table::with_rows(params.len());
    table.push_column("name", params.iter().map(|p| p.name.as_str()))?;
    table.push_column("value", params.iter().map(|p| p.value))?;
    table.push_column("min", params.iter().map(|p| p.min.unwrap_or(f64::NEG_INFINITY)))?;
    table.push_column("max", params.iter().map(|p| p.max.unwrap_or(f64::INFINITY)))?;
    table.push_column("vary", params.iter().map(|p| p.vary))?;
    table.push_column("expr", params.iter().map(|p| p.expr.as_deref()))?;
    table.push_column("stderr", params.iter().map(|p| p.stderr))?;
    table.push_column(
        "init_value",
        params.iter().map(|p| result.init_values.get(&p.name).copied()),
    )?;
    Ok(table)
}

fn summary_record(result: &MinimizerResult) -> Vec<(String, Value)> {
    let mut record: Vec<(String, Value)> = vec![
        ("method".into(), result.method.as_str().into()),
        ("num_params".into(), result.nvarys.into()),
        ("num_data_points".into(), result.ndata.into()),
        ("chisqr".into(), result.chisqr.into()),
        ("redchi".into(), result.redchi.into()),
        ("AIC".into(), result.aic.into()),
        ("BIC".into(), result.bic.into()),
        ("num_func_eval".into(), result.nfev.into()),
        ("success".into(), result.success.into()),
        ("message".into(), result.message.as_str().into()),
    ];
    if let Some(kws) = &result.kws {
        for (key, value) in kws {
            record.push((format!("{}_{key}", result.method), value.clone()));
        }
    }
    record
}

/// One row of fit statistics.
pub fn glance_minimizer(result: &MinimizerResult, _opts: &ExtractOptions) -> Result<Table> {
    Table::from_record(summary_record(result))
}

/// Like [`glance_minimizer`], with the model name first.
pub fn glance_model(result: &ModelResult, _opts: &ExtractOptions) -> Result<Table> {
    let mut record = vec![("model".to_string(), Value::from(result.model_name.as_str()))];
    record.extend(summary_record(&result.fit));
    Table::from_record(record)
}

/// One row per data point: `x, data, best_fit, residual`, plus one column
/// per component when the model has more than one.
pub fn augment_model(result: &ModelResult, _opts: &ExtractOptions) -> Result<Table> {
    let x_name = match result.independent_vars.as_slice() {
        [one] => one,
        other => {
            return Err(TidyError::InvalidResult {
                type_name: ModelResult::TAG.to_string(),
                reason: format!("only 1 independent variable is supported, found {other:?}"),
            });
        }
    };
    let x = result.userkws.get(x_name).ok_or_else(|| TidyError::InvalidResult {
        type_name: ModelResult::TAG.to_string(),
        reason: format!("no values for independent variable '{x_name}'"),
    })?;

    let n = result.fit.ndata;
    let components: &[Component] = if result.components.len() > 1 { result.components.as_slice() } else { &[] };
    let arrays = [
        (x_name.as_str(), x),
        ("data", &result.data),
        ("best_fit", &result.best_fit),
        ("residual", &result.fit.residual),
    ]
    .into_iter()
    .chain(components.iter().map(|c| (c.name.as_str(), &c.values)));
    for (label, values) in arrays {
        if values.len() != n {
            return Err(TidyError::InvalidResult {
                type_name: ModelResult::TAG.to_string(),
                reason: format!("'{label}' has {} values, expected {n} (ndata)", values.len()),
            });
        }
    }
    let mut seen: Vec<&str> = vec!["x", "data", "best_fit", "residual"];
    for c in components {
        if seen.contains(&c.name.as_str()) {
            return Err(TidyError::InvalidResult {
                type_name: ModelResult::TAG.to_string(),
                reason: format!("component name '{}' clashes with another column", c.name),
            });
        }
        seen.push(c.name.as_str());
    }

    let mut table = Table::with_rows(n);
    table.push_column("x", x.iter().copied())?;
    table.push_column("data", result.data.iter().copied())?;
    table.push_column("best_fit", result.best_fit.iter().copied())?;
    table.push_column("residual", result.fit.residual.iter().copied())?;

    if result.components.len() > 1 {
        for c in &result.components {
            table.push_column(c.name.as_str(), c.values.iter().copied())?;
        }
    }
    Ok(table)
}
