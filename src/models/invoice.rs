use serde::Deserialize;

use super::people::Customer;
use super::status::InvoiceStatus;
use super::{id_string, lenient_amount, opt_id_string, opt_lenient_string};

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Invoice {
    #[serde(rename = "nro", default, deserialize_with = "id_string")]
    pub number: String,
    #[serde(rename = "fecha", default, deserialize_with = "opt_lenient_string")]
    pub date: Option<String>,
    #[serde(default, deserialize_with = "lenient_amount")]
    pub total: f64,
    #[serde(rename = "estado", default)]
    pub status: Option<InvoiceStatus>,
    #[serde(rename = "clienteCi", default, deserialize_with = "opt_id_string")]
    pub customer_ci: Option<String>,
    #[serde(rename = "proformaId", default, deserialize_with = "opt_id_string")]
    pub proforma_id: Option<String>,
    #[serde(rename = "cliente", default)]
    pub customer: Option<Customer>,
}

impl Invoice {
    pub fn is_void(&self) -> bool {
        self.status == Some(InvoiceStatus::Void)
    }
}
