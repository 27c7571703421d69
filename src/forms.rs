//! Form input checked before anything is sent to the backend.
//!
//! Each form turns raw command-line input into the JSON payload the backend
//! expects, or a validation error naming the offending field.

use chrono::NaiveDate;
use serde::Serialize;

use crate::error::{Result, TallerError};
use crate::format::parse_backend_date;
use crate::models::{Commission, CommissionStatus, OrderStatus, Proforma, WorkOrder};

pub fn parse_date(input: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d")
        .map_err(|_| TallerError::InvalidDate(input.to_string()))
}

fn parse_id(field: &'static str, input: &str) -> Result<u64> {
    input
        .trim()
        .parse::<u64>()
        .map_err(|_| TallerError::validation(field, format!("'{input}' is not a valid id")))
}

/// Backend date fields are prefilled as plain `YYYY-MM-DD`
fn date_field(raw: Option<&str>) -> Option<String> {
    raw.and_then(parse_backend_date)
        .map(|d| d.format("%Y-%m-%d").to_string())
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderPayload {
    pub fecha_inicio: String,
    pub fecha_fin: Option<String>,
    pub estado: OrderStatus,
    pub empleado_ci: u64,
    pub usuario_id: Option<u64>,
    pub detalle_id: Option<u64>,
}

/// Work order form
#[derive(Debug, Clone, Default)]
pub struct OrderForm {
    pub started_on: Option<String>,
    pub finished_on: Option<String>,
    pub status: Option<OrderStatus>,
    pub employee_ci: Option<String>,
    pub user_id: Option<String>,
    pub detail_id: Option<String>,
}

impl OrderForm {
    /// Blank form for a new order: starts today, status open
    pub fn new_order(today: NaiveDate) -> Self {
        Self {
            started_on: Some(today.format("%Y-%m-%d").to_string()),
            status: Some(OrderStatus::Open),
            ..Self::default()
        }
    }

    /// Form prefilled from an existing order
    pub fn from_order(order: &WorkOrder) -> Self {
        Self {
            started_on: date_field(order.started_on.as_deref()),
            finished_on: date_field(order.finished_on.as_deref()),
            status: Some(order.status.clone().unwrap_or(OrderStatus::Open)),
            employee_ci: order.employee_id(),
            user_id: order.user_id.clone(),
            detail_id: order
                .detail_id
                .clone()
                .or_else(|| order.detail.as_ref().and_then(|d| d.id.clone())),
        }
    }

    pub fn validate(&self, today: NaiveDate) -> Result<OrderPayload> {
        let start_raw = self
            .started_on
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .ok_or_else(|| TallerError::validation("start date", "is required"))?;
        let start = parse_date(start_raw)?;
        if start > today {
            return Err(TallerError::validation(
                "start date",
                "cannot be later than today",
            ));
        }

        let end = match self.finished_on.as_deref().filter(|s| !s.trim().is_empty()) {
            Some(raw) => {
                let end = parse_date(raw)?;
                if end < start {
                    return Err(TallerError::validation(
                        "end date",
                        "cannot be earlier than the start date",
                    ));
                }
                Some(end)
            }
            None => None,
        };

        let employee = self
            .employee_ci
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .ok_or_else(|| TallerError::validation("employee", "is required"))?;

        let status = self
            .status
            .clone()
            .ok_or_else(|| TallerError::validation("status", "is required"))?;

        Ok(OrderPayload {
            fecha_inicio: start.format("%Y-%m-%d").to_string(),
            fecha_fin: end.map(|d| d.format("%Y-%m-%d").to_string()),
            estado: status,
            empleado_ci: parse_id("employee", employee)?,
            usuario_id: optional_id("user", self.user_id.as_deref())?,
            detalle_id: optional_id("detail", self.detail_id.as_deref())?,
        })
    }
}

fn optional_id(field: &'static str, raw: Option<&str>) -> Result<Option<u64>> {
    raw.filter(|s| !s.trim().is_empty())
        .map(|s| parse_id(field, s))
        .transpose()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommissionPayload {
    pub orden_id: u64,
    pub estado_pago: CommissionStatus,
    pub fecha_pago: String,
}

/// Commission form
#[derive(Debug, Clone, Default)]
pub struct CommissionForm {
    pub order_id: Option<String>,
    pub status: Option<CommissionStatus>,
    pub paid_on: Option<String>,
}

impl CommissionForm {
    /// Blank form: pending, dated today
    pub fn new_commission(today: NaiveDate) -> Self {
        Self {
            order_id: None,
            status: Some(CommissionStatus::Pending),
            paid_on: Some(today.format("%Y-%m-%d").to_string()),
        }
    }

    /// Form prefilled from an existing commission
    pub fn from_commission(commission: &Commission, today: NaiveDate) -> Self {
        Self {
            order_id: commission.order_ref().map(str::to_string),
            status: Some(
                commission
                    .status
                    .clone()
                    .unwrap_or(CommissionStatus::Pending),
            ),
            paid_on: date_field(commission.paid_on.as_deref())
                .or_else(|| Some(today.format("%Y-%m-%d").to_string())),
        }
    }

    pub fn validate(&self) -> Result<CommissionPayload> {
        let order = self
            .order_id
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .ok_or_else(|| TallerError::validation("work order", "a work order must be selected"))?;
        let order_id = parse_id("work order", order)?;
        if order_id == 0 {
            return Err(TallerError::validation(
                "work order",
                "a work order must be selected",
            ));
        }

        let status = self
            .status
            .clone()
            .ok_or_else(|| TallerError::validation("payment status", "is required"))?;

        let paid_on = self
            .paid_on
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .ok_or_else(|| TallerError::validation("payment date", "is required"))?;
        let paid_on = parse_date(paid_on)?;

        Ok(CommissionPayload {
            orden_id: order_id,
            estado_pago: status,
            fecha_pago: paid_on.format("%Y-%m-%d").to_string(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoicePayload {
    pub cliente_ci: String,
    pub proforma_id: Option<String>,
}

/// Invoice form
#[derive(Debug, Clone, Default)]
pub struct InvoiceForm {
    pub customer_ci: Option<String>,
    pub proforma_id: Option<String>,
}

impl InvoiceForm {
    /// Check the form against the quotations that may be invoiced.
    ///
    /// Picking a quotation also picks its customer.
    pub fn validate(&self, proformas: &[Proforma]) -> Result<InvoicePayload> {
        let proforma_id = self
            .proforma_id
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty());

        let mut customer = self
            .customer_ci
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string);

        if let Some(id) = proforma_id {
            let proforma = proformas
                .iter()
                .find(|p| p.id == id)
                .ok_or_else(|| TallerError::ProformaNotFound(id.to_string()))?;
            if !proforma.is_billable() {
                return Err(TallerError::validation(
                    "proforma",
                    format!("proforma #{id} is not approved or completed"),
                ));
            }
            if let Some(ci) = proforma.customer_id() {
                customer = Some(ci);
            }
        }

        let customer =
            customer.ok_or_else(|| TallerError::validation("customer", "is required"))?;

        Ok(InvoicePayload {
            cliente_ci: customer,
            proforma_id: proforma_id.map(str::to_string),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RatingPayload {
    pub nombre: String,
    pub correo: String,
    pub calificacion: u8,
    pub comentario: String,
}

/// Public rating form
#[derive(Debug, Clone, Default)]
pub struct RatingForm {
    pub name: Option<String>,
    pub email: Option<String>,
    pub score: u8,
    pub comment: Option<String>,
}

impl RatingForm {
    pub fn validate(&self) -> Result<RatingPayload> {
        if !(1..=5).contains(&self.score) {
            return Err(TallerError::validation(
                "rating",
                "please choose a rating from 1 to 5",
            ));
        }
        Ok(RatingPayload {
            nombre: self.name.clone().unwrap_or_default(),
            correo: self.email.clone().unwrap_or_default(),
            calificacion: self.score,
            comentario: self.comment.clone().unwrap_or_default(),
        })
    }
}
