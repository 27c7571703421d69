mod aggregate;
mod memo;

pub use aggregate::{aggregate_by_employee, EmployeeCommissions};
pub use memo::{AggregateMemo, Memoised};

use std::collections::HashSet;

use crate::models::{Commission, WorkOrder};

/// Share of an order's total paid to the mechanic
pub const COMMISSION_RATE: f64 = 0.5;

/// Workshop-wide commission figures
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CommissionTotals {
    pub pending: f64,
    pub paid: f64,
    /// Distinct employees with at least one pending commission
    pub employees_with_pending: usize,
}

impl CommissionTotals {
    pub fn from_records(records: &[Commission]) -> Self {
        let mut totals = CommissionTotals::default();
        let mut owed: HashSet<&str> = HashSet::new();

        for c in records {
            if c.is_pending() {
                totals.pending += c.amount;
                if let Some(employee) = c.employee() {
                    owed.insert(employee.ci.as_str());
                }
            } else if c.is_paid() {
                totals.paid += c.amount;
            }
        }

        totals.employees_with_pending = owed.len();
        totals
    }
}

/// Commission a finished order would generate
pub fn commission_for(order: &WorkOrder) -> f64 {
    order.total() * COMMISSION_RATE
}

/// Finished orders that no commission references yet
pub fn commission_candidates<'a>(
    orders: &'a [WorkOrder],
    commissions: &[Commission],
) -> Vec<&'a WorkOrder> {
    let taken: HashSet<&str> = commissions.iter().filter_map(Commission::order_ref).collect();

    orders
        .iter()
        .filter(|o| o.is_finished())
        .filter(|o| !taken.contains(o.id.as_str()))
        .collect()
}
