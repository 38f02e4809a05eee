//! Debt payoff planning
//!
//! Payoff uses straight-line amortization: the whole monthly payment goes
//! against the combined balance, and "interest" is whatever the rounded-up
//! final month overshoots. It is an approximation for comparing strategies,
//! not a compound-interest schedule.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use tracing::debug;

use crate::dates::{add_months, month_label, month_start};
use crate::error::{Error, Result};
use crate::models::Account;

/// Default minimum payment as a share of total debt
pub const DEFAULT_MIN_PAYMENT_RATE: f64 = 0.02;

/// Months covered by the balance trajectory
pub const TRAJECTORY_MONTHS: usize = 12;

/// Which debt to focus extra payments on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Strategy {
    /// Highest APR first
    #[default]
    Avalanche,
    /// Smallest balance first
    Snowball,
}

impl Strategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Avalanche => "avalanche",
            Self::Snowball => "snowball",
        }
    }
}

impl FromStr for Strategy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "avalanche" => Ok(Self::Avalanche),
            "snowball" => Ok(Self::Snowball),
            _ => Err(format!("Unknown strategy: {} (expected avalanche or snowball)", s)),
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Time to clear a balance at a fixed monthly payment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayoffHorizon {
    Months(u32),
    /// The payment never reduces the balance
    Unbounded,
}

impl PayoffHorizon {
    fn for_payment(total_debt: f64, monthly_payment: f64) -> Self {
        if total_debt <= 0.0 {
            return Self::Months(0);
        }
        if monthly_payment.is_nan() || monthly_payment <= 0.0 {
            return Self::Unbounded;
        }
        let months = (total_debt / monthly_payment).ceil();
        if months.is_finite() && months <= u32::MAX as f64 {
            Self::Months(months as u32)
        } else {
            Self::Unbounded
        }
    }

    pub fn months(&self) -> Option<u32> {
        match self {
            Self::Months(n) => Some(*n),
            Self::Unbounded => None,
        }
    }

    /// Overpayment implied by paying `monthly_payment` for the whole horizon
    fn interest(&self, total_debt: f64, monthly_payment: f64) -> Option<f64> {
        match self {
            Self::Months(0) => Some(0.0),
            Self::Months(n) => Some(*n as f64 * monthly_payment - total_debt),
            Self::Unbounded => None,
        }
    }
}

impl fmt::Display for PayoffHorizon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Months(n) => write!(f, "{}y {}m", n / 12, n % 12),
            Self::Unbounded => write!(f, "never"),
        }
    }
}

/// One bar of the remaining-debt chart
#[derive(Debug, Clone, PartialEq)]
pub struct TrajectoryPoint {
    pub label: String,
    pub remaining: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PayoffPlan {
    pub strategy: Strategy,
    pub total_debt: f64,
    pub min_payment: f64,
    pub extra_payment: f64,
    pub monthly_payment: f64,
    /// Debts in the order extra payments should target them
    pub priority: Vec<Account>,
    pub horizon: PayoffHorizon,
    pub total_interest: Option<f64>,
    /// Minimum payments only
    pub baseline_horizon: PayoffHorizon,
    pub baseline_interest: Option<f64>,
    /// `None` when either side has no finite interest figure
    pub interest_saved: Option<f64>,
    pub trajectory: Vec<TrajectoryPoint>,
}

impl PayoffPlan {
    /// Debt the strategy says to pay down first
    pub fn focus(&self) -> Option<&Account> {
        self.priority.first()
    }
}

/// Order debts by strategy; ties keep their input order
pub fn prioritize(debts: &mut [Account], strategy: Strategy) {
    match strategy {
        Strategy::Avalanche => debts.sort_by(|a, b| {
            b.apr
                .unwrap_or(0.0)
                .total_cmp(&a.apr.unwrap_or(0.0))
        }),
        Strategy::Snowball => debts.sort_by(|a, b| a.balance.abs().total_cmp(&b.balance.abs())),
    }
}

/// Build a payoff plan for a set of debt accounts
///
/// `extra_payment` must be a finite non-negative amount and
/// `min_payment_rate` a share within [0, 1]. The trajectory starts at
/// the month containing `today`.
pub fn payoff_plan<'a, I>(
    debts: I,
    strategy: Strategy,
    extra_payment: f64,
    min_payment_rate: f64,
    today: NaiveDate,
) -> Result<PayoffPlan>
where
    I: IntoIterator<Item = &'a Account>,
{
    if !extra_payment.is_finite() || extra_payment < 0.0 {
        return Err(Error::Validation(format!(
            "Extra payment must be a non-negative amount, got {}",
            extra_payment
        )));
    }
    if !(0.0..=1.0).contains(&min_payment_rate) {
        return Err(Error::Validation(format!(
            "Minimum payment rate must be within [0, 1], got {}",
            min_payment_rate
        )));
    }

    let mut priority: Vec<Account> = debts.into_iter().cloned().collect();
    let total_debt: f64 = priority.iter().map(|a| a.balance.abs()).sum();
    let min_payment = total_debt * min_payment_rate;
    let monthly_payment = min_payment + extra_payment;

    prioritize(&mut priority, strategy);

    let horizon = PayoffHorizon::for_payment(total_debt, monthly_payment);
    let total_interest = horizon.interest(total_debt, monthly_payment);
    let baseline_horizon = PayoffHorizon::for_payment(total_debt, min_payment);
    let baseline_interest = baseline_horizon.interest(total_debt, min_payment);
    let interest_saved = match (baseline_interest, total_interest) {
        (Some(baseline), Some(with_extra)) => Some((baseline - with_extra).max(0.0)),
        _ => None,
    };

    let start = month_start(today);
    let mut remaining = total_debt;
    let trajectory = (0..TRAJECTORY_MONTHS)
        .map(|i| {
            let point = TrajectoryPoint {
                label: month_label(add_months(start, i as i32)),
                remaining,
            };
            remaining = (remaining - monthly_payment).max(0.0);
            point
        })
        .collect();

    debug!(
        %strategy,
        total_debt,
        monthly_payment,
        months = ?horizon.months(),
        "Computed payoff plan"
    );

    Ok(PayoffPlan {
        strategy,
        total_debt,
        min_payment,
        extra_payment,
        monthly_payment,
        priority,
        horizon,
        total_interest,
        baseline_horizon,
        baseline_interest,
        interest_saved,
        trajectory,
    })
}
