use super::aggregate::{aggregate_by_employee, EmployeeCommissions};
use crate::models::Commission;

/// Keeps the last aggregation and reuses it while the input is unchanged
#[derive(Debug, Default)]
pub struct AggregateMemo {
    /// Input of the last aggregation, compared field by field
    last_input: Option<Vec<Commission>>,
    cached: Vec<EmployeeCommissions>,
    computations: usize,
}

/// Result of a memoised lookup
pub struct Memoised<'a> {
    pub summaries: &'a [EmployeeCommissions],
    /// False when the cached aggregation was returned as-is
    pub changed: bool,
}

impl AggregateMemo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_or_compute(&mut self, records: &[Commission]) -> Memoised<'_> {
        let changed = self.last_input.as_deref() != Some(records);

        if changed {
            self.cached = aggregate_by_employee(records);
            self.last_input = Some(records.to_vec());
            self.computations += 1;
        }

        Memoised {
            summaries: &self.cached,
            changed,
        }
    }

    /// How many times the aggregation actually ran
    pub fn computations(&self) -> usize {
        self.computations
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn records(amount: f64) -> Vec<Commission> {
        serde_json::from_value(json!([
            {"id": 1, "monto": amount, "estadoPago": "PENDIENTE",
             "ordenTrabajo": {"id": 5, "empleado": {"ci": "A"}}},
            {"id": 2, "monto": 10, "estadoPago": "PAGADO",
             "ordenTrabajo": {"id": 6, "empleado": {"ci": "B"}}}
        ]))
        .unwrap()
    }

    #[test]
    fn reuses_result_for_identical_input() {
        let mut memo = AggregateMemo::new();

        assert!(memo.get_or_compute(&records(40.0)).changed);
        let second = memo.get_or_compute(&records(40.0));
        assert!(!second.changed);
        assert_eq!(second.summaries.len(), 2);
        assert_eq!(memo.computations(), 1);
    }

    #[test]
    fn recomputes_when_input_changes() {
        let mut memo = AggregateMemo::new();
        memo.get_or_compute(&records(40.0));

        let next = memo.get_or_compute(&records(45.0));
        assert!(next.changed);
        assert_eq!(next.summaries[0].pending_total, 45.0);
        assert_eq!(memo.computations(), 2);
    }

    #[test]
    fn renamed_employee_is_a_change() {
        let mut memo = AggregateMemo::new();
        let mut input = records(40.0);
        memo.get_or_compute(&input);

        if let Some(employee) = input[0].order.as_mut().and_then(|o| o.employee.as_mut()) {
            employee.name = "Luis".to_string();
        }
        let next = memo.get_or_compute(&input);
        assert!(next.changed);
        assert_eq!(next.summaries[0].employee.name, "Luis");
        assert_eq!(memo.computations(), 2);

        assert!(!memo.get_or_compute(&input).changed);
    }

    #[test]
    fn empty_input_is_computed_once() {
        let mut memo = AggregateMemo::new();
        assert!(memo.get_or_compute(&[]).changed);
        assert!(!memo.get_or_compute(&[]).changed);
        assert_eq!(memo.computations(), 1);
    }
}
