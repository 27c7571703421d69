pub mod api;
pub mod commission;
pub mod config;
pub mod error;
pub mod filter;
pub mod format;
pub mod forms;
pub mod models;
pub mod reports;
pub mod whatsapp;

pub use api::{ApiClient, ApiRequest, Credential};
pub use commission::{aggregate_by_employee, AggregateMemo, CommissionTotals, EmployeeCommissions};
pub use config::{Config, Session};
pub use error::{Result, TallerError};
