mod cash_flows;
mod performance_model;
mod valuation_service;
pub mod xirr;

pub use cash_flows::build_cash_flows;
pub use performance_model::*;
pub use valuation_service::value_portfolio;
pub use xirr::{calculate_xirr, solve_xirr, xnpv, XirrMethod, XirrSolution};
