//! Pre-aggregated reports served by the backend.

use chrono::{Datelike, NaiveDate};
use serde::Deserialize;
use std::fmt;
use std::str::FromStr;

use crate::error::{Result, TallerError};
use crate::models::{
    id_string, lenient_amount, lenient_count, lenient_string, opt_lenient_string,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportKind {
    FrequentCustomers,
    RequestedServices,
    MonthlyIncome,
    EmployeeActivity,
}

impl ReportKind {
    pub fn path(self) -> &'static str {
        match self {
            ReportKind::FrequentCustomers => "reportes/clientes-frecuentes",
            ReportKind::RequestedServices => "reportes/servicios-solicitados",
            ReportKind::MonthlyIncome => "reportes/ingresos-mensuales",
            ReportKind::EmployeeActivity => "reportes/actividad-empleados",
        }
    }

    /// Name used by the export endpoints
    pub fn export_name(self) -> &'static str {
        match self {
            ReportKind::FrequentCustomers => "clientes",
            ReportKind::RequestedServices => "servicios",
            ReportKind::MonthlyIncome => "ingresos",
            ReportKind::EmployeeActivity => "actividad-empleados",
        }
    }

    /// Monthly income is yearly; the others are per month
    pub fn needs_month(self) -> bool {
        self != ReportKind::MonthlyIncome
    }

    pub fn export_path(self, format: ExportFormat) -> String {
        format!("reportes/export/{}-{}", self.export_name(), format.suffix())
    }

    /// Query parameters for this report and period
    pub fn params(self, period: Period) -> Vec<(&'static str, String)> {
        let mut params = Vec::with_capacity(2);
        if self.needs_month() {
            params.push(("mes", period.month.to_string()));
        }
        params.push(("anio", period.year.to_string()));
        params
    }

    /// Default file name for an export
    pub fn file_name(self, period: Period, format: ExportFormat) -> String {
        if self.needs_month() {
            format!(
                "reporte-{}-{:02}-{}.{}",
                self.export_name(),
                period.month,
                period.year,
                format.extension()
            )
        } else {
            format!(
                "reporte-{}-{}.{}",
                self.export_name(),
                period.year,
                format.extension()
            )
        }
    }
}

/// Month and year a report covers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Period {
    pub month: u32,
    pub year: i32,
}

impl Period {
    pub fn new(month: u32, year: i32) -> Result<Self> {
        if !(1..=12).contains(&month) {
            return Err(TallerError::validation(
                "month",
                format!("{month} is not a month (expected 1-12)"),
            ));
        }
        Ok(Self { month, year })
    }

    /// Fill in whatever the user left out from `today`
    pub fn resolve(month: Option<u32>, year: Option<i32>, today: NaiveDate) -> Result<Self> {
        Self::new(
            month.unwrap_or_else(|| today.month()),
            year.unwrap_or_else(|| today.year()),
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Excel,
    Pdf,
}

impl ExportFormat {
    pub fn suffix(self) -> &'static str {
        match self {
            ExportFormat::Excel => "excel",
            ExportFormat::Pdf => "pdf",
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Excel => "xlsx",
            ExportFormat::Pdf => "pdf",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.suffix())
    }
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "excel" | "xlsx" => Ok(ExportFormat::Excel),
            "pdf" => Ok(ExportFormat::Pdf),
            other => Err(format!("unknown export format '{other}' (expected excel or pdf)")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FrequentCustomersReport {
    #[serde(default, deserialize_with = "opt_lenient_string")]
    pub mes_nombre: Option<String>,
    #[serde(default, deserialize_with = "lenient_count")]
    pub total_clientes: u64,
    #[serde(default)]
    pub clientes: Vec<FrequentCustomer>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FrequentCustomer {
    #[serde(default, deserialize_with = "id_string")]
    pub ci: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub cliente: String,
    #[serde(default, deserialize_with = "id_string")]
    pub telefono: String,
    #[serde(default, deserialize_with = "lenient_count")]
    pub total_visitas: u64,
    #[serde(default, deserialize_with = "lenient_amount")]
    pub total_gastado: f64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestedServicesReport {
    #[serde(default, deserialize_with = "lenient_count")]
    pub total_servicios: u64,
    #[serde(default)]
    pub servicios: Vec<RequestedService>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestedService {
    #[serde(default, deserialize_with = "lenient_string")]
    pub servicio: String,
    #[serde(default, deserialize_with = "opt_lenient_string")]
    pub categoria: Option<String>,
    #[serde(rename = "vecessolicitado", default, deserialize_with = "lenient_count")]
    pub times_requested: u64,
    #[serde(default, deserialize_with = "lenient_amount")]
    pub cantidad_total: f64,
    #[serde(default, deserialize_with = "lenient_amount")]
    pub ingreso_total: f64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyIncomeReport {
    #[serde(default, deserialize_with = "lenient_amount")]
    pub total_anual: f64,
    #[serde(default)]
    pub ingresos: Vec<MonthlyIncome>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyIncome {
    #[serde(default, deserialize_with = "lenient_string")]
    pub mes: String,
    #[serde(default, deserialize_with = "lenient_count")]
    pub total_proformas: u64,
    #[serde(default, deserialize_with = "lenient_amount")]
    pub ingreso_total: f64,
}

impl MonthlyIncomeReport {
    /// Share of the annual total earned in one month, zero when the year is empty
    pub fn share(&self, month: &MonthlyIncome) -> f64 {
        if self.total_anual > 0.0 {
            month.ingreso_total / self.total_anual
        } else {
            0.0
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeActivityReport {
    #[serde(default, deserialize_with = "lenient_count")]
    pub total_empleados: u64,
    #[serde(default)]
    pub empleados: Vec<EmployeeActivity>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeActivity {
    #[serde(default, deserialize_with = "id_string")]
    pub ci: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub empleado: String,
    #[serde(default, deserialize_with = "id_string")]
    pub telefono: String,
    #[serde(default, deserialize_with = "lenient_count")]
    pub total_ordenes: u64,
    #[serde(default, deserialize_with = "lenient_count")]
    pub total_diagnosticos: u64,
    #[serde(default, deserialize_with = "lenient_count")]
    pub total_actividades: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn period_defaults_and_bounds() {
        let today = NaiveDate::from_ymd_opt(2025, 7, 20).unwrap();
        assert_eq!(
            Period::resolve(None, None, today).unwrap(),
            Period { month: 7, year: 2025 }
        );
        assert_eq!(
            Period::resolve(Some(1), Some(2024), today).unwrap(),
            Period { month: 1, year: 2024 }
        );
        assert!(Period::resolve(Some(13), None, today).is_err());
        assert!(Period::resolve(Some(0), None, today).is_err());
    }

    #[test]
    fn monthly_income_is_yearly() {
        let period = Period::new(3, 2025).unwrap();
        assert_eq!(
            ReportKind::MonthlyIncome.params(period),
            vec![("anio", "2025".to_string())]
        );
        assert_eq!(
            ReportKind::EmployeeActivity.params(period),
            vec![("mes", "3".to_string()), ("anio", "2025".to_string())]
        );
    }

    #[test]
    fn export_paths_and_files() {
        let period = Period::new(3, 2025).unwrap();
        assert_eq!(
            ReportKind::EmployeeActivity.export_path(ExportFormat::Excel),
            "reportes/export/actividad-empleados-excel"
        );
        assert_eq!(
            ReportKind::FrequentCustomers.file_name(period, ExportFormat::Pdf),
            "reporte-clientes-03-2025.pdf"
        );
        assert_eq!(
            ReportKind::MonthlyIncome.file_name(period, ExportFormat::Excel),
            "reporte-ingresos-2025.xlsx"
        );
        assert_eq!("XLSX".parse::<ExportFormat>(), Ok(ExportFormat::Excel));
        assert!("csv".parse::<ExportFormat>().is_err());
    }

    #[test]
    fn income_share_handles_empty_year() {
        let report: MonthlyIncomeReport = serde_json::from_value(json!({
            "anio": 2025,
            "totalAnual": "400",
            "ingresos": [
                {"mes": "Enero", "totalProformas": 2, "ingresoTotal": 100},
                {"mes": "Febrero", "totalProformas": 3, "ingresoTotal": "300"}
            ]
        }))
        .unwrap();
        assert_eq!(report.share(&report.ingresos[0]), 0.25);
        assert_eq!(report.share(&report.ingresos[1]), 0.75);

        let empty: MonthlyIncomeReport = serde_json::from_value(json!({
            "totalAnual": 0,
            "ingresos": [{"mes": "Enero", "ingresoTotal": 0}]
        }))
        .unwrap();
        assert_eq!(empty.share(&empty.ingresos[0]), 0.0);
    }

    #[test]
    fn services_decode_backend_field_names() {
        let report: RequestedServicesReport = serde_json::from_value(json!({
            "totalServicios": 1,
            "servicios": [{
                "servicio": "Cambio de aceite",
                "categoria": "Mantenimiento",
                "vecessolicitado": "4",
                "cantidadTotal": 4,
                "ingresoTotal": "320.5"
            }]
        }))
        .unwrap();
        assert_eq!(report.servicios[0].times_requested, 4);
        assert_eq!(report.servicios[0].ingreso_total, 320.5);
    }
}
