use std::collections::HashMap;

use crate::models::{Commission, CommissionStatus, Employee};

/// Per-employee rollup of commission records
#[derive(Debug, Clone, PartialEq)]
pub struct EmployeeCommissions {
    pub employee: Employee,
    pub pending: Vec<Commission>,
    pub paid: Vec<Commission>,
    pub pending_total: f64,
    pub paid_total: f64,
    /// Pending plus paid; cancelled and unknown statuses never count
    pub total_generated: f64,
}

impl EmployeeCommissions {
    fn new(employee: Employee) -> Self {
        Self {
            employee,
            pending: Vec::new(),
            paid: Vec::new(),
            pending_total: 0.0,
            paid_total: 0.0,
            total_generated: 0.0,
        }
    }

    fn record(&mut self, commission: &Commission) {
        match commission.status {
            Some(CommissionStatus::Pending) => {
                self.pending_total += commission.amount;
                self.total_generated += commission.amount;
                self.pending.push(commission.clone());
            }
            Some(CommissionStatus::Paid) => {
                self.paid_total += commission.amount;
                self.total_generated += commission.amount;
                self.paid.push(commission.clone());
            }
            _ => {}
        }
    }

    /// Share of the generated total already paid out, in `0.0..=1.0`.
    /// Zero when nothing was generated.
    pub fn paid_fraction(&self) -> f64 {
        if self.total_generated > 0.0 {
            self.paid_total / self.total_generated
        } else {
            0.0
        }
    }
}

/// Group a flat commission list by employee.
///
/// Records without a resolvable employee are skipped. Employees come out
/// ordered by pending total, highest first; ties keep the order in which the
/// employee first appeared.
pub fn aggregate_by_employee(records: &[Commission]) -> Vec<EmployeeCommissions> {
    let mut slots: HashMap<&str, usize> = HashMap::new();
    let mut summaries: Vec<EmployeeCommissions> = Vec::new();

    for commission in records {
        let Some(employee) = commission.employee() else {
            continue;
        };

        let idx = *slots.entry(employee.ci.as_str()).or_insert_with(|| {
            summaries.push(EmployeeCommissions::new(employee.clone()));
            summaries.len() - 1
        });

        summaries[idx].record(commission);
    }

    // stable: equal pending totals stay in first-seen order
    summaries.sort_by(|a, b| b.pending_total.total_cmp(&a.pending_total));
    summaries
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn commission(id: u32, ci: &str, amount: f64, status: &str) -> Commission {
        serde_json::from_value(json!({
            "id": id,
            "monto": amount,
            "estadoPago": status,
            "fechaPago": "2025-05-01",
            "ordenTrabajo": {
                "id": id * 10,
                "empleado": {"ci": ci, "nombre": format!("Emp {ci}"), "apellidos": "Test"}
            }
        }))
        .unwrap()
    }

    fn orphan(id: u32, amount: f64) -> Commission {
        serde_json::from_value(json!({"id": id, "monto": amount, "estadoPago": "PENDIENTE"}))
            .unwrap()
    }

    #[test]
    fn cancelled_amounts_are_excluded() {
        let records = vec![
            commission(1, "100", 100.0, "PENDIENTE"),
            commission(2, "100", 50.0, "PAGADO"),
            commission(3, "100", 30.0, "CANCELADO"),
        ];

        let summary = aggregate_by_employee(&records);
        assert_eq!(summary.len(), 1);

        let emp = &summary[0];
        assert_eq!(emp.pending_total, 100.0);
        assert_eq!(emp.paid_total, 50.0);
        assert_eq!(emp.total_generated, 150.0);
        assert_eq!(emp.pending.len(), 1);
        assert_eq!(emp.paid.len(), 1);
    }

    #[test]
    fn totals_match_their_lists() {
        let records = vec![
            commission(1, "A", 10.0, "PENDIENTE"),
            commission(2, "B", 20.5, "PAGADO"),
            commission(3, "A", 5.25, "PENDIENTE"),
            commission(4, "B", 7.0, "CANCELADO"),
            commission(5, "A", 3.0, "PAGADO"),
            commission(6, "C", 1.0, "EN_REVISION"),
        ];

        for emp in aggregate_by_employee(&records) {
            let pending: f64 = emp.pending.iter().map(|c| c.amount).sum();
            let paid: f64 = emp.paid.iter().map(|c| c.amount).sum();
            assert_eq!(emp.pending_total, pending);
            assert_eq!(emp.paid_total, paid);
            assert_eq!(emp.total_generated, emp.pending_total + emp.paid_total);
            assert!(emp.total_generated >= 0.0);
        }
    }

    #[test]
    fn one_summary_per_employee() {
        let records = vec![
            commission(1, "A", 10.0, "PENDIENTE"),
            commission(2, "B", 20.0, "PAGADO"),
            commission(3, "A", 5.0, "PAGADO"),
            commission(4, "C", 7.0, "CANCELADO"),
        ];

        let summary = aggregate_by_employee(&records);
        let mut ids: Vec<&str> = summary.iter().map(|s| s.employee.ci.as_str()).collect();
        ids.sort();
        assert_eq!(ids, vec!["A", "B", "C"]);
    }

    #[test]
    fn fully_cancelled_employee_has_zero_sums() {
        let records = vec![commission(1, "Z", 40.0, "CANCELADO")];
        let summary = aggregate_by_employee(&records);

        assert_eq!(summary.len(), 1);
        assert_eq!(summary[0].pending_total, 0.0);
        assert!(summary[0].pending.is_empty());
        assert_eq!(summary[0].total_generated, 0.0);
    }

    #[test]
    fn records_without_employee_are_skipped() {
        let records = vec![orphan(1, 999.0), commission(2, "A", 1.0, "PENDIENTE")];
        let summary = aggregate_by_employee(&records);

        assert_eq!(summary.len(), 1);
        assert_eq!(summary[0].pending_total, 1.0);
        assert!(!summary.iter().any(|s| s.employee.ci == "missing"));
    }

    #[test]
    fn sorted_by_pending_desc_with_stable_ties() {
        let records = vec![
            commission(1, "first", 50.0, "PENDIENTE"),
            commission(2, "big", 500.0, "PENDIENTE"),
            commission(3, "second", 50.0, "PENDIENTE"),
            commission(4, "none", 80.0, "PAGADO"),
        ];

        let order: Vec<String> = aggregate_by_employee(&records)
            .into_iter()
            .map(|s| s.employee.ci)
            .collect();
        assert_eq!(order, vec!["big", "first", "second", "none"]);

        let again: Vec<String> = aggregate_by_employee(&records)
            .into_iter()
            .map(|s| s.employee.ci)
            .collect();
        assert_eq!(order, again);
    }

    #[test]
    fn empty_input_gives_empty_output() {
        assert!(aggregate_by_employee(&[]).is_empty());
    }

    #[test]
    fn malformed_amount_counts_as_zero() {
        let record: Commission = serde_json::from_value(json!({
            "id": 1,
            "monto": "not-a-number",
            "estadoPago": "PENDIENTE",
            "ordenTrabajo": {"id": 1, "empleado": {"ci": "A"}}
        }))
        .unwrap();

        let summary = aggregate_by_employee(&[record]);
        assert_eq!(summary[0].pending_total, 0.0);
        assert_eq!(summary[0].pending.len(), 1);
    }

    #[test]
    fn paid_fraction_is_zero_without_total() {
        let summary = aggregate_by_employee(&[commission(1, "A", 0.0, "PENDIENTE")]);
        assert_eq!(summary[0].paid_fraction(), 0.0);
        assert!(!summary[0].paid_fraction().is_nan());

        let summary = aggregate_by_employee(&[
            commission(1, "A", 30.0, "PENDIENTE"),
            commission(2, "A", 10.0, "PAGADO"),
        ]);
        assert_eq!(summary[0].paid_fraction(), 0.25);
    }
}
