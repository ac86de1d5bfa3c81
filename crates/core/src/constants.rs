/// Day-count basis used to annualize XIRR cash flows
pub const DAYS_PER_YEAR: f64 = 365.0;

/// Default IANA timezone used to decide what "today" is
pub const DEFAULT_VALUATION_TZ_NAME: &str = "America/New_York";
