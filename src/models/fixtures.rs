//! Deterministic fit results for tests.
//!
//! Data follow smooth closed-form curves with a small periodic wiggle, so the
//! numbers are reproducible without a random source.

use std::collections::BTreeMap;

use nalgebra::{DMatrix, DVector};

use crate::models::{
    Component, MinimizerResult, ModelResult, Objective, OlsRecord, OptimizeResult, Parameter,
};

fn wiggle(i: usize) -> f64 {
    0.05 * (i as f64 * 1.7).sin()
}

fn grid(n: usize) -> Vec<f64> {
    (0..n).map(|i| i as f64 / n.max(1) as f64 * 10.0).collect()
}

/// A `leastsq` minimization over parameters `p0..p{n-1}`, declared in reverse
/// name order.
pub fn minimizer_result(n_params: usize) -> MinimizerResult {
    let params: Vec<Parameter> = (0..n_params)
        .rev()
        .map(|i| Parameter {
            name: format!("p{i}"),
            value: 1.0 + i as f64,
            min: Some(0.0),
            max: None,
            vary: true,
            expr: None,
            stderr: Some(0.01 * (i + 1) as f64),
        })
        .collect();
    let init_values = params.iter().map(|p| (p.name.clone(), p.value * 0.9)).collect();
    let ndata = 10;

    MinimizerResult {
        params,
        init_values,
        method: "leastsq".to_string(),
        nvarys: n_params,
        ndata,
        nfev: 17 + n_params,
        chisqr: 0.125,
        redchi: 0.125 / (ndata.saturating_sub(n_params).max(1)) as f64,
        aic: -42.0,
        bic: -40.5,
        success: true,
        message: "Fit succeeded.".to_string(),
        kws: None,
        residual: (0..ndata).map(wiggle).collect(),
    }
}

/// A single-peak gaussian model fit over `n_obs` points.
pub fn model_result(n_params: usize, n_obs: usize) -> ModelResult {
    let x = grid(n_obs);
    let best_fit: Vec<f64> = x.iter().map(|xi| 3.0 * (-(xi - 5.0).powi(2) / 2.0).exp()).collect();
    let data: Vec<f64> = best_fit.iter().enumerate().map(|(i, y)| y + wiggle(i)).collect();
    let residual: Vec<f64> = data.iter().zip(&best_fit).map(|(d, f)| d - f).collect();

    let mut fit = minimizer_result(n_params);
    fit.ndata = n_obs;
    fit.residual = residual;

    let mut userkws = BTreeMap::new();
    userkws.insert("x".to_string(), x);

    ModelResult {
        fit,
        model_name: "Model(gaussian)".to_string(),
        independent_vars: vec!["x".to_string()],
        userkws,
        components: vec![Component {
            name: "gaussian".to_string(),
            values: best_fit.clone(),
        }],
        data,
        best_fit,
    }
}

/// A least-squares optimizer result with a residual vector of length `n_obs`.
pub fn optimize_result(n_params: usize, n_obs: usize) -> OptimizeResult {
    OptimizeResult {
        x: (0..n_params).map(|i| 0.5 * (i + 1) as f64).collect(),
        success: Some(true),
        cost: Some(0.02),
        optimality: Some(1e-9),
        nfev: Some(8),
        njev: Some(7),
        nit: None,
        status: Some(1),
        message: Some("`gtol` termination condition is satisfied.".to_string()),
        fun: Some(Objective::Residuals((0..n_obs).map(wiggle).collect())),
        grad: Some(vec![1e-10; n_params]),
        active_mask: Some(vec![0; n_params]),
    }
}

/// A straight-line regression `y ~ Intercept + x`, solved by least squares.
pub fn ols_record(n_obs: usize) -> OlsRecord {
    let x = grid(n_obs);
    let endog: Vec<f64> = x.iter().enumerate().map(|(i, xi)| 1.0 + 2.0 * xi + wiggle(i)).collect();
    let exog: Vec<Vec<f64>> = x.iter().map(|xi| vec![1.0, *xi]).collect();

    let flat: Vec<f64> = exog.iter().flatten().copied().collect();
    let design = DMatrix::from_row_slice(n_obs, 2, &flat);
    let y = DVector::from_column_slice(&endog);
    let beta = design
        .svd(true, true)
        .solve(&y, 1e-10)
        .unwrap_or_else(|_| DVector::from_column_slice(&[1.0, 2.0]));
    let params: Vec<f64> = beta.iter().copied().collect();

    let df_resid = n_obs.saturating_sub(2) as f64;
    OlsRecord {
        exog,
        exog_names: vec!["Intercept".to_string(), "x".to_string()],
        endog,
        endog_name: "y".to_string(),
        bse: vec![0.02, 0.004],
        tvalues: params.iter().map(|p| p / 0.01).collect(),
        pvalues: vec![1e-6, 1e-12],
        params,
        rsquared: 0.999,
        rsquared_adj: 0.998,
        fvalue: 1.2e4,
        f_pvalue: 1e-20,
        df_model: 1.0,
        df_resid,
        aic: -30.0,
        bic: -27.0,
    }
}
