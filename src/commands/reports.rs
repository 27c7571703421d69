use std::path::PathBuf;
use tabled::Tabled;

use taller::api::ApiClient;
use taller::format::{format_percent_with, progress_bar};
use taller::reports::{
    EmployeeActivityReport, ExportFormat, FrequentCustomersReport, MonthlyIncomeReport, Period,
    ReportKind, RequestedServicesReport,
};
use taller::Result;

use super::{or_na, print_table, save_download, today, Context};

pub struct ReportOptions {
    pub month: Option<u32>,
    pub year: Option<i32>,
    pub export: Option<ExportFormat>,
    pub output: Option<PathBuf>,
    pub print_url: bool,
}

#[derive(Tabled)]
struct CustomerRow {
    #[tabled(rename = "#")]
    rank: usize,
    #[tabled(rename = "CI")]
    ci: String,
    #[tabled(rename = "CUSTOMER")]
    customer: String,
    #[tabled(rename = "PHONE")]
    phone: String,
    #[tabled(rename = "VISITS")]
    visits: u64,
    #[tabled(rename = "SPENT")]
    spent: String,
}

#[derive(Tabled)]
struct ServiceRow {
    #[tabled(rename = "#")]
    rank: usize,
    #[tabled(rename = "SERVICE")]
    service: String,
    #[tabled(rename = "CATEGORY")]
    category: String,
    #[tabled(rename = "TIMES")]
    times: u64,
    #[tabled(rename = "QUANTITY")]
    quantity: String,
    #[tabled(rename = "INCOME")]
    income: String,
}

#[derive(Tabled)]
struct IncomeRow {
    #[tabled(rename = "MONTH")]
    month: String,
    #[tabled(rename = "PROFORMAS")]
    proformas: u64,
    #[tabled(rename = "INCOME")]
    income: String,
    #[tabled(rename = "SHARE")]
    share: String,
}

#[derive(Tabled)]
struct ActivityRow {
    #[tabled(rename = "CI")]
    ci: String,
    #[tabled(rename = "EMPLOYEE")]
    employee: String,
    #[tabled(rename = "PHONE")]
    phone: String,
    #[tabled(rename = "ORDERS")]
    orders: u64,
    #[tabled(rename = "DIAGNOSES")]
    diagnoses: u64,
    #[tabled(rename = "TOTAL")]
    total: u64,
}

/// Print a report, or export it as a file
pub fn cmd_report(ctx: &Context, kind: ReportKind, options: ReportOptions) -> Result<()> {
    let period = Period::resolve(options.month, options.year, today())?;
    let client = ctx.client()?;

    if let Some(format) = options.export {
        if options.print_url {
            println!("{}", client.export_url(kind, period, format)?);
            return Ok(());
        }
        let bytes = client.export_report(kind, period, format)?;
        let path = options
            .output
            .unwrap_or_else(|| ctx.download_path(&kind.file_name(period, format)));
        return save_download(&path, &bytes);
    }

    match kind {
        ReportKind::FrequentCustomers => frequent_customers(ctx, &client, period),
        ReportKind::RequestedServices => requested_services(ctx, &client, period),
        ReportKind::MonthlyIncome => monthly_income(ctx, &client, period),
        ReportKind::EmployeeActivity => employee_activity(&client, period),
    }
}

fn heading(title: &str, period: Period, month_name: Option<&str>) {
    match month_name {
        Some(name) => println!("{title}: {name} {}", period.year),
        None => println!("{title}: {:02}/{}", period.month, period.year),
    }
}

fn frequent_customers(ctx: &Context, client: &ApiClient, period: Period) -> Result<()> {
    let report: FrequentCustomersReport = client.report(ReportKind::FrequentCustomers, period)?;
    heading("Frequent customers", period, report.mes_nombre.as_deref());

    if report.clientes.is_empty() {
        println!("No customer visits in this period.");
        return Ok(());
    }

    let rows: Vec<CustomerRow> = report
        .clientes
        .iter()
        .enumerate()
        .map(|(i, c)| CustomerRow {
            rank: i + 1,
            ci: c.ci.clone(),
            customer: c.cliente.clone(),
            phone: or_na(Some(c.telefono.as_str())),
            visits: c.total_visitas,
            spent: ctx.money(c.total_gastado),
        })
        .collect();
    print_table(rows);
    println!("Customers: {}", report.total_clientes);
    Ok(())
}

fn requested_services(ctx: &Context, client: &ApiClient, period: Period) -> Result<()> {
    let report: RequestedServicesReport = client.report(ReportKind::RequestedServices, period)?;
    heading("Requested services", period, None);

    if report.servicios.is_empty() {
        println!("No services requested in this period.");
        return Ok(());
    }

    let rows: Vec<ServiceRow> = report
        .servicios
        .iter()
        .enumerate()
        .map(|(i, s)| ServiceRow {
            rank: i + 1,
            service: s.servicio.clone(),
            category: or_na(s.categoria.as_deref()),
            times: s.times_requested,
            quantity: format!("{}", s.cantidad_total),
            income: ctx.money(s.ingreso_total),
        })
        .collect();
    print_table(rows);
    println!("Services: {}", report.total_servicios);
    Ok(())
}

fn monthly_income(ctx: &Context, client: &ApiClient, period: Period) -> Result<()> {
    let report: MonthlyIncomeReport = client.report(ReportKind::MonthlyIncome, period)?;
    println!("Monthly income: {}", period.year);

    if report.ingresos.is_empty() {
        println!("No income recorded for this year.");
        return Ok(());
    }

    let rows: Vec<IncomeRow> = report
        .ingresos
        .iter()
        .map(|m| IncomeRow {
            month: m.mes.clone(),
            proformas: m.total_proformas,
            income: ctx.money(m.ingreso_total),
            share: format!(
                "{} {}",
                progress_bar(report.share(m), 10),
                format_percent_with(report.share(m), 1)
            ),
        })
        .collect();
    print_table(rows);
    println!("Year total: {}", ctx.money(report.total_anual));
    Ok(())
}

fn employee_activity(client: &ApiClient, period: Period) -> Result<()> {
    let report: EmployeeActivityReport = client.report(ReportKind::EmployeeActivity, period)?;
    heading("Employee activity", period, None);

    if report.empleados.is_empty() {
        println!("No employee activity in this period.");
        return Ok(());
    }

    let rows: Vec<ActivityRow> = report
        .empleados
        .iter()
        .map(|e| ActivityRow {
            ci: e.ci.clone(),
            employee: e.empleado.clone(),
            phone: or_na(Some(e.telefono.as_str())),
            orders: e.total_ordenes,
            diagnoses: e.total_diagnosticos,
            total: e.total_actividades,
        })
        .collect();
    print_table(rows);
    println!("Employees: {}", report.total_empleados);
    Ok(())
}
