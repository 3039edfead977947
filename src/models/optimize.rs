//! Generic optimizer results (bare parameter vector plus optional diagnostics).
//!
//! Which diagnostics are present depends on the optimizer that produced the
//! result. Each extractor declares the optional attributes it reports
//! (`GLANCE_ATTRS`, `TIDY_ATTRS`) and checks them one by one with
//! [`OptimizeResult::has`], so absent attributes simply produce no column.

use std::any::Any;

use serde::{Deserialize, Serialize};

use crate::domain::{ExtractOptions, FitResult, Kind, LeafType, TypeTag};
use crate::error::{Result, TidyError};
use crate::models::decode_leaf;
use crate::registry::{Collaborator, Registry};
use crate::table::{Table, Value, map_to_table};

/// Objective value: a scalar, or one residual per observation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Objective {
    Scalar(f64),
    Residuals(Vec<f64>),
}

impl Objective {
    pub fn as_slice(&self) -> &[f64] {
        match self {
            Objective::Scalar(v) => std::slice::from_ref(v),
            Objective::Residuals(v) => v,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OptimizeResult {
    /// Solution vector (parameter values, unnamed).
    pub x: Vec<f64>,
    pub success: Option<bool>,
    pub cost: Option<f64>,
    pub optimality: Option<f64>,
    pub nfev: Option<i64>,
    pub njev: Option<i64>,
    pub nit: Option<i64>,
    pub status: Option<i64>,
    pub message: Option<String>,
    pub fun: Option<Objective>,
    pub grad: Option<Vec<f64>>,
    pub active_mask: Option<Vec<i64>>,
}

/// Optional attributes of an [`OptimizeResult`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptimizeAttr {
    Success,
    Cost,
    Optimality,
    Nfev,
    Njev,
    Nit,
    Status,
    Message,
    Fun,
    Grad,
    ActiveMask,
}

impl OptimizeAttr {
    pub fn name(self) -> &'static str {
        match self {
            OptimizeAttr::Success => "success",
            OptimizeAttr::Cost => "cost",
            OptimizeAttr::Optimality => "optimality",
            OptimizeAttr::Nfev => "nfev",
            OptimizeAttr::Njev => "njev",
            OptimizeAttr::Nit => "nit",
            OptimizeAttr::Status => "status",
            OptimizeAttr::Message => "message",
            OptimizeAttr::Fun => "fun",
            OptimizeAttr::Grad => "grad",
            OptimizeAttr::ActiveMask => "active_mask",
        }
    }
}

/// Summary attributes reported by `glance`, in column order.
pub const GLANCE_ATTRS: [OptimizeAttr; 8] = [
    OptimizeAttr::Success,
    OptimizeAttr::Cost,
    OptimizeAttr::Optimality,
    OptimizeAttr::Nfev,
    OptimizeAttr::Njev,
    OptimizeAttr::Nit,
    OptimizeAttr::Status,
    OptimizeAttr::Message,
];

/// Per-parameter attributes reported by `tidy`, in column order.
pub const TIDY_ATTRS: [OptimizeAttr; 2] = [OptimizeAttr::Grad, OptimizeAttr::ActiveMask];

impl OptimizeResult {
    pub fn has(&self, attr: OptimizeAttr) -> bool {
        match attr {
            OptimizeAttr::Success => self.success.is_some(),
            OptimizeAttr::Cost => self.cost.is_some(),
            OptimizeAttr::Optimality => self.optimality.is_some(),
            OptimizeAttr::Nfev => self.nfev.is_some(),
            OptimizeAttr::Njev => self.njev.is_some(),
            OptimizeAttr::Nit => self.nit.is_some(),
            OptimizeAttr::Status => self.status.is_some(),
            OptimizeAttr::Message => self.message.is_some(),
            OptimizeAttr::Fun => self.fun.is_some(),
            OptimizeAttr::Grad => self.grad.is_some(),
            OptimizeAttr::ActiveMask => self.active_mask.is_some(),
        }
    }

    /// Scalar attribute value; `Null` for absent or vector-valued attributes.
    fn scalar(&self, attr: OptimizeAttr) -> Value {
        match attr {
            OptimizeAttr::Success => self.success.into(),
            OptimizeAttr::Cost => self.cost.into(),
            OptimizeAttr::Optimality => self.optimality.into(),
            OptimizeAttr::Nfev => self.nfev.into(),
            OptimizeAttr::Njev => self.njev.into(),
            OptimizeAttr::Nit => self.nit.into(),
            OptimizeAttr::Status => self.status.into(),
            OptimizeAttr::Message => self.message.as_deref().into(),
            OptimizeAttr::Fun => match self.fun.as_ref().map(Objective::as_slice) {
                Some([single]) => Value::Float(*single),
                _ => Value::Null,
            },
            OptimizeAttr::Grad | OptimizeAttr::ActiveMask => Value::Null,
        }
    }

    /// Per-parameter vector attribute, in solution order.
    fn vector(&self, attr: OptimizeAttr) -> Option<Vec<Value>> {
        match attr {
            OptimizeAttr::Grad => self.grad.as_ref().map(|g| g.iter().copied().map(Value::from).collect()),
            OptimizeAttr::ActiveMask => self.active_mask.as_ref().map(|m| m.iter().copied().map(Value::from).collect()),
            _ => None,
        }
    }
}

impl FitResult for OptimizeResult {
    fn type_tag(&self) -> TypeTag {
        Self::TAG
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl LeafType for OptimizeResult {
    const TAG: TypeTag = TypeTag("OptimizeResult");
}

/// Registers optimizer extractors and the decoder.
pub struct OptimizeExtractors;

impl Collaborator for OptimizeExtractors {
    fn name(&self) -> &'static str {
        "optimize"
    }

    fn register(&self, registry: &mut Registry) {
        registry.register_for::<OptimizeResult, _>(Kind::Tidy, tidy_optimize);
        registry.register_for::<OptimizeResult, _>(Kind::Glance, glance_optimize);
        registry.register_for::<OptimizeResult, _>(Kind::Augment, augment_optimize);
        registry.register_decoder(OptimizeResult::TAG, decode_leaf::<OptimizeResult>);
    }
}

/// One row per parameter, sorted by name.
///
/// The result carries no parameter names, so `opts.param_names` is required.
/// Columns: key column, value column (see [`ExtractOptions`]), then any of
/// `grad`, `active_mask` that are present.
pub fn tidy_optimize(result: &OptimizeResult, opts: &ExtractOptions) -> Result<Table> {
    let names = opts.param_names.as_ref().ok_or_else(|| TidyError::MissingRequiredOption {
        option: "param_names",
        type_name: OptimizeResult::TAG.to_string(),
    })?;
    if names.len() != result.x.len() {
        return Err(TidyError::InvalidOption {
            option: "param_names",
            reason: format!("{} names given for {} fitted values", names.len(), result.x.len()),
        });
    }
    let mut order: Vec<usize> = (0..names.len()).collect();
    order.sort_by(|&a, &b| names[a].cmp(&names[b]));
    if let Some(pair) = order.windows(2).find(|w| names[w[0]] == names[w[1]]) {
        return Err(TidyError::InvalidOption {
            option: "param_names",
            reason: format!("duplicate parameter name '{}'", names[pair[0]]),
        });
    }

    let entries = names.iter().zip(&result.x).map(|(n, v)| (n.as_str(), Value::from(*v)));
    let mut table = map_to_table(entries, opts.key_column(), opts.value_column(), &[])?;

    for attr in TIDY_ATTRS {
        if !result.has(attr) {
            continue;
        }
        let Some(values) = result.vector(attr) else {
            continue;
        };
        if values.len() != order.len() {
            return Err(TidyError::InvalidResult {
                type_name: OptimizeResult::TAG.to_string(),
                reason: format!("`{}` has {} entries for {} parameters", attr.name(), values.len(), order.len()),
            });
        }
        table.push_column(attr.name(), order.iter().map(|&i| values[i].clone()))?;
    }
    Ok(table)
}

/// One row with every present summary attribute, plus `fun` when scalar.
pub fn glance_optimize(result: &OptimizeResult, _opts: &ExtractOptions) -> Result<Table> {
    let mut record: Vec<(&str, Value)> = GLANCE_ATTRS
        .iter()
        .filter(|attr| result.has(**attr))
        .map(|attr| (attr.name(), result.scalar(*attr)))
        .collect();
    let fun = result.scalar(OptimizeAttr::Fun);
    if !fun.is_null() {
        record.push((OptimizeAttr::Fun.name(), fun));
    }
    Table::from_record(record)
}

/// One row per residual in `fun`: `point, residual`.
pub fn augment_optimize(result: &OptimizeResult, _opts: &ExtractOptions) -> Result<Table> {
    let fun = result.fun.as_ref().ok_or_else(|| TidyError::MissingAttribute {
        type_name: OptimizeResult::TAG.to_string(),
        attribute: OptimizeAttr::Fun.name(),
    })?;
    let residuals = fun.as_slice();

    let mut table = Table::with_rows(residuals.len());
    table.push_column("point", 0..residuals.len())?;
    table.push_column("residual", residuals.iter().copied())?;
    Ok(table)
}
