use serde::Deserialize;

use super::people::Employee;
use super::status::CommissionStatus;
use super::{id_string, lenient_amount, opt_id_string, opt_lenient_string};

/// Amount owed to a mechanic for a finished work order
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Commission {
    #[serde(default, deserialize_with = "id_string")]
    pub id: String,
    #[serde(rename = "monto", default, deserialize_with = "lenient_amount")]
    pub amount: f64,
    #[serde(rename = "estadoPago", default)]
    pub status: Option<CommissionStatus>,
    #[serde(rename = "fechaPago", default, deserialize_with = "opt_lenient_string")]
    pub paid_on: Option<String>,
    #[serde(rename = "ordenId", default, deserialize_with = "opt_id_string")]
    pub order_id: Option<String>,
    #[serde(rename = "ordenTrabajo", default)]
    pub order: Option<CommissionOrder>,
}

/// Slice of the work order embedded in a commission record
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CommissionOrder {
    #[serde(default, deserialize_with = "opt_id_string")]
    pub id: Option<String>,
    #[serde(rename = "empleado", default)]
    pub employee: Option<Employee>,
}

impl Commission {
    /// Employee the commission belongs to, if the record carries one with an id
    pub fn employee(&self) -> Option<&Employee> {
        self.order
            .as_ref()
            .and_then(|o| o.employee.as_ref())
            .filter(|e| !e.ci.is_empty())
    }

    /// Work order id, from the nested order when the flat field is absent
    pub fn order_ref(&self) -> Option<&str> {
        self.order_id
            .as_deref()
            .or_else(|| self.order.as_ref().and_then(|o| o.id.as_deref()))
    }

    pub fn is_pending(&self) -> bool {
        self.status == Some(CommissionStatus::Pending)
    }

    pub fn is_paid(&self) -> bool {
        self.status == Some(CommissionStatus::Paid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decodes_loose_record() {
        let commission: Commission = serde_json::from_value(json!({
            "id": 3,
            "monto": "175.50",
            "estadoPago": "PENDIENTE",
            "fechaPago": "2025-04-02T00:00:00.000Z",
            "ordenTrabajo": {"id": 41, "empleado": {"ci": 123, "nombre": "Luis"}}
        }))
        .unwrap();

        assert_eq!(commission.amount, 175.5);
        assert!(commission.is_pending());
        assert_eq!(commission.order_ref(), Some("41"));
        assert_eq!(commission.employee().map(|e| e.ci.as_str()), Some("123"));
    }

    #[test]
    fn missing_fields_default() {
        let commission: Commission =
            serde_json::from_value(json!({"id": 1, "monto": null, "estadoPago": null})).unwrap();
        assert_eq!(commission.amount, 0.0);
        assert!(commission.status.is_none());
        assert!(commission.employee().is_none());
        assert!(commission.order_ref().is_none());
    }

    #[test]
    fn employee_without_id_is_unresolvable() {
        let commission: Commission = serde_json::from_value(json!({
            "id": 1,
            "ordenTrabajo": {"id": 2, "empleado": {"nombre": "Sin CI"}}
        }))
        .unwrap();
        assert!(commission.employee().is_none());
    }

    #[test]
    fn one_sloppy_record_does_not_sink_the_list() {
        let records: Vec<Commission> = crate::models::extract_list(
            json!({"comisiones": [
                {"id": 1, "monto": 100, "estadoPago": "PENDIENTE",
                 "ordenTrabajo": {"id": 7, "empleado": {"ci": 5, "nombre": "Luis", "apellidos": null}}},
                {"id": 2, "monto": 40, "estadoPago": 1,
                 "ordenTrabajo": {"id": 8, "empleado": {"ci": 5, "nombre": 77, "apellidos": "Rojas"}}}
            ]}),
            "comisiones",
        )
        .unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].employee().map(|e| e.full_name()), Some("Luis".to_string()));
        assert_eq!(records[1].status, Some(CommissionStatus::Other("1".to_string())));

        let summaries = crate::commission::aggregate_by_employee(&records);
        assert_eq!(summaries.len(), 1);
        assert_eq!(summaries[0].pending_total, 100.0);
        assert_eq!(summaries[0].paid_total, 0.0);
        assert_eq!(summaries[0].total_generated, 100.0);
    }
}
