//! Annualized internal rate of return over irregularly dated cash flows.
//!
//! Solves `sum(CF_i / (1 + r)^(days_i / 365)) = 0` for `r`, where `days_i` counts from the
//! earliest flow. Newton-Raphson runs first from the configured initial guess; if it stalls or
//! leaves the domain, bisection over the configured bounds takes over. Both phases share the
//! same iteration cap, which bounds latency without any wall-clock timeout.

use chrono::NaiveDate;
use log::{debug, warn};
use num_traits::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::performance_model::CashFlow;
use crate::constants::DAYS_PER_YEAR;
use crate::settings::EngineSettings;

const MIN_DERIVATIVE: f64 = 1e-12;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum XirrMethod {
    /// Fewer than two flows, no sign change, or all flows on one date; the rate is zero.
    Degenerate,
    Newton,
    Bisection,
    /// Neither phase met the tolerance; the rate with the smallest `|NPV|` seen is returned.
    BestEstimate,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct XirrSolution {
    pub rate: f64,
    pub npv: f64,
    pub iterations: u32,
    pub method: XirrMethod,
}

impl XirrSolution {
    fn degenerate() -> Self {
        XirrSolution {
            rate: 0.0,
            npv: 0.0,
            iterations: 0,
            method: XirrMethod::Degenerate,
        }
    }

    pub fn converged(&self) -> bool {
        matches!(self.method, XirrMethod::Newton | XirrMethod::Bisection)
    }
}

/// Annualized rate as a decimal fraction (`0.1` is 10%). Zero for degenerate input.
pub fn calculate_xirr(flows: &[CashFlow], settings: &EngineSettings) -> Decimal {
    let solution = solve_xirr(flows, settings);
    Decimal::from_f64(solution.rate).unwrap_or(Decimal::ZERO)
}

/// Net present value of `flows` at `rate`, discounted to the earliest flow date.
pub fn xnpv(flows: &[CashFlow], rate: f64) -> f64 {
    let Some(base) = earliest_date(flows) else {
        return 0.0;
    };
    prepared(flows, base)
        .map(|(years, amount)| amount / (1.0 + rate).powf(years))
        .sum()
}

pub fn solve_xirr(flows: &[CashFlow], settings: &EngineSettings) -> XirrSolution {
    if !has_sign_change(flows) {
        debug!(
            "XIRR degenerate for {} cash flows (no sign change); reporting 0",
            flows.len()
        );
        return XirrSolution::degenerate();
    }
    let Some(base) = earliest_date(flows) else {
        return XirrSolution::degenerate();
    };
    let points: Vec<(f64, f64)> = prepared(flows, base).collect();
    if points.iter().all(|&(years, _)| years == 0.0) {
        debug!("XIRR degenerate: all {} cash flows share one date; reporting 0", flows.len());
        return XirrSolution::degenerate();
    }

    let lower = settings.xirr_lower_bound;
    let upper = settings.xirr_upper_bound;
    let tolerance = settings.xirr_tolerance;
    let max_iterations = settings.xirr_max_iterations;

    let mut best = (0.0, f64::INFINITY);
    let mut track = |rate: f64, npv: f64| {
        if npv.is_finite() && npv.abs() < best.1.abs() {
            best = (rate, npv);
        }
    };

    // Newton-Raphson
    let mut rate = settings.xirr_initial_guess;
    for iteration in 1..=max_iterations {
        let (npv, derivative) = npv_and_derivative(&points, rate);
        track(rate, npv);
        if npv.abs() < tolerance {
            return XirrSolution {
                rate,
                npv,
                iterations: iteration,
                method: XirrMethod::Newton,
            };
        }
        if !derivative.is_finite() || derivative.abs() < MIN_DERIVATIVE {
            break;
        }
        let next = rate - npv / derivative;
        if !next.is_finite() {
            break;
        }
        rate = next.clamp(lower, upper);
    }

    // Bisection over [lower, upper]
    let mut lo = lower;
    let mut hi = upper;
    let mut f_lo = npv_and_derivative(&points, lo).0;
    let f_hi = npv_and_derivative(&points, hi).0;
    track(lo, f_lo);
    track(hi, f_hi);
    if f_lo.is_finite() && f_hi.is_finite() && f_lo.signum() != f_hi.signum() {
        for iteration in 1..=max_iterations {
            let mid = (lo + hi) / 2.0;
            let f_mid = npv_and_derivative(&points, mid).0;
            track(mid, f_mid);
            if f_mid.abs() < tolerance {
                return XirrSolution {
                    rate: mid,
                    npv: f_mid,
                    iterations: iteration,
                    method: XirrMethod::Bisection,
                };
            }
            if f_mid.signum() == f_lo.signum() {
                lo = mid;
                f_lo = f_mid;
            } else {
                hi = mid;
            }
        }
    }

    warn!(
        "XIRR did not reach tolerance {} within {} iterations; best estimate {} (NPV {})",
        tolerance, max_iterations, best.0, best.1
    );
    XirrSolution {
        rate: best.0,
        npv: best.1,
        iterations: max_iterations,
        method: XirrMethod::BestEstimate,
    }
}

fn has_sign_change(flows: &[CashFlow]) -> bool {
    flows.len() >= 2
        && flows.iter().any(|cf| cf.amount.is_sign_negative() && !cf.amount.is_zero())
        && flows.iter().any(|cf| cf.amount.is_sign_positive() && !cf.amount.is_zero())
}

fn earliest_date(flows: &[CashFlow]) -> Option<NaiveDate> {
    flows.iter().map(|cf| cf.date).min()
}

/// `(years since base, amount)` pairs.
fn prepared(flows: &[CashFlow], base: NaiveDate) -> impl Iterator<Item = (f64, f64)> + '_ {
    flows.iter().map(move |cf| {
        let years = (cf.date - base).num_days() as f64 / DAYS_PER_YEAR;
        (years, cf.amount.to_f64().unwrap_or(0.0))
    })
}

fn npv_and_derivative(points: &[(f64, f64)], rate: f64) -> (f64, f64) {
    let base = 1.0 + rate;
    points
        .iter()
        .fold((0.0, 0.0), |(npv, derivative), &(years, amount)| {
            let discount = base.powf(-years);
            (
                npv + amount * discount,
                derivative - years * amount * discount / base,
            )
        })
}
