use serde::Deserialize;

use super::people::{Customer, Employee};
use super::status::{OrderStatus, ProformaStatus};
use super::{id_string, lenient_amount, opt_id_string, opt_lenient_string};

/// Quotation a work order or invoice may be based on
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Proforma {
    #[serde(default, deserialize_with = "id_string")]
    pub id: String,
    #[serde(rename = "fecha", default, deserialize_with = "opt_lenient_string")]
    pub date: Option<String>,
    #[serde(default, deserialize_with = "lenient_amount")]
    pub total: f64,
    #[serde(rename = "estado", default)]
    pub status: Option<ProformaStatus>,
    #[serde(rename = "clienteCi", default, deserialize_with = "opt_id_string")]
    pub customer_ci: Option<String>,
    #[serde(rename = "cliente", default)]
    pub customer: Option<Customer>,
    #[serde(rename = "diagnostico", default)]
    pub diagnosis: Option<Diagnosis>,
}

impl Proforma {
    pub fn is_billable(&self) -> bool {
        self.status.as_ref().is_some_and(ProformaStatus::is_billable)
    }

    /// Customer id, from the nested customer when the flat field is absent
    pub fn customer_id(&self) -> Option<String> {
        self.customer_ci
            .clone()
            .or_else(|| self.customer.as_ref().map(|c| c.ci.clone()))
            .filter(|ci| !ci.is_empty())
    }

    pub fn motorcycle(&self) -> Option<&Motorcycle> {
        self.diagnosis.as_ref().and_then(|d| d.motorcycle.as_ref())
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Diagnosis {
    #[serde(rename = "moto", default)]
    pub motorcycle: Option<Motorcycle>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Motorcycle {
    #[serde(rename = "modelo", default, deserialize_with = "opt_lenient_string")]
    pub model: Option<String>,
    #[serde(rename = "placa", default, deserialize_with = "opt_lenient_string")]
    pub plate: Option<String>,
}

/// Quotation line a work order is attached to
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct OrderDetail {
    #[serde(default, deserialize_with = "opt_id_string")]
    pub id: Option<String>,
    #[serde(default)]
    pub proforma: Option<Proforma>,
}

/// Unit of repair work assigned to a mechanic
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct WorkOrder {
    #[serde(default, deserialize_with = "id_string")]
    pub id: String,
    #[serde(rename = "fechaInicio", default, deserialize_with = "opt_lenient_string")]
    pub started_on: Option<String>,
    #[serde(rename = "fechaFin", default, deserialize_with = "opt_lenient_string")]
    pub finished_on: Option<String>,
    #[serde(rename = "estado", default)]
    pub status: Option<OrderStatus>,
    #[serde(rename = "empleadoCi", default, deserialize_with = "opt_id_string")]
    pub employee_ci: Option<String>,
    #[serde(rename = "usuarioId", default, deserialize_with = "opt_id_string")]
    pub user_id: Option<String>,
    #[serde(rename = "detalleId", default, deserialize_with = "opt_id_string")]
    pub detail_id: Option<String>,
    #[serde(rename = "empleado", default)]
    pub employee: Option<Employee>,
    #[serde(rename = "detalle", default)]
    pub detail: Option<OrderDetail>,
}

impl WorkOrder {
    pub fn proforma(&self) -> Option<&Proforma> {
        self.detail.as_ref().and_then(|d| d.proforma.as_ref())
    }

    /// Total of the quotation behind this order, zero when there is none
    pub fn total(&self) -> f64 {
        self.proforma().map(|p| p.total).unwrap_or(0.0)
    }

    pub fn customer(&self) -> Option<&Customer> {
        self.proforma().and_then(|p| p.customer.as_ref())
    }

    pub fn is_finished(&self) -> bool {
        self.status == Some(OrderStatus::Finished)
    }

    /// Employee id, from the nested employee when the flat field is absent
    pub fn employee_id(&self) -> Option<String> {
        self.employee_ci
            .clone()
            .or_else(|| self.employee.as_ref().map(|e| e.ci.clone()))
            .filter(|ci| !ci.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decodes_nested_order() {
        let order: WorkOrder = serde_json::from_value(json!({
            "id": 12,
            "fechaInicio": "2025-03-01T00:00:00.000Z",
            "fechaFin": null,
            "estado": "FINALIZADA",
            "empleado": {"ci": 4455, "nombre": "Luis", "apellidos": "Rojas"},
            "detalle": {
                "id": 3,
                "proforma": {
                    "id": 9,
                    "estado": "APROBADA",
                    "total": "350.00",
                    "cliente": {"ci": 77, "nombre": "Marta", "telefono": 71234567},
                    "diagnostico": {"moto": {"modelo": "XR150", "placa": "1234-ABC"}}
                }
            }
        }))
        .unwrap();

        assert_eq!(order.id, "12");
        assert!(order.is_finished());
        assert_eq!(order.total(), 350.0);
        assert_eq!(order.employee_id().as_deref(), Some("4455"));
        assert_eq!(
            order.customer().and_then(|c| c.phone.as_deref()),
            Some("71234567")
        );
        let moto = order.proforma().and_then(Proforma::motorcycle).unwrap();
        assert_eq!(moto.plate.as_deref(), Some("1234-ABC"));
    }

    #[test]
    fn order_without_detail_has_zero_total() {
        let order: WorkOrder = serde_json::from_value(json!({"id": 1})).unwrap();
        assert_eq!(order.total(), 0.0);
        assert!(order.customer().is_none());
        assert!(order.employee_id().is_none());
    }

    #[test]
    fn proforma_customer_falls_back_to_nested() {
        let proforma: Proforma = serde_json::from_value(json!({
            "id": 5,
            "cliente": {"ci": "8899"}
        }))
        .unwrap();
        assert_eq!(proforma.customer_id().as_deref(), Some("8899"));
        assert!(!proforma.is_billable());
    }
}
