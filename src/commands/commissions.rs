use std::thread;
use std::time::Duration;
use tabled::Tabled;
use tracing::{debug, info};

use taller::commission::{
    commission_candidates, commission_for, AggregateMemo, CommissionTotals, EmployeeCommissions,
};
use taller::format::{display_date, format_percent, progress_bar};
use taller::forms::CommissionForm;
use taller::models::{Commission, CommissionStatus};
use taller::{Result, TallerError};

use super::{print_table, today, Context};

#[derive(Tabled)]
struct CommissionRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "EMPLOYEE")]
    employee: String,
    #[tabled(rename = "ORDER")]
    order: String,
    #[tabled(rename = "AMOUNT")]
    amount: String,
    #[tabled(rename = "STATUS")]
    status: String,
    #[tabled(rename = "PAID ON")]
    paid_on: String,
}

#[derive(Tabled)]
struct SummaryRow {
    #[tabled(rename = "EMPLOYEE")]
    employee: String,
    #[tabled(rename = "PENDING")]
    pending: String,
    #[tabled(rename = "#P")]
    pending_count: usize,
    #[tabled(rename = "PAID")]
    paid: String,
    #[tabled(rename = "#PD")]
    paid_count: usize,
    #[tabled(rename = "GENERATED")]
    generated: String,
    #[tabled(rename = "PAID SHARE")]
    paid_share: String,
}

#[derive(Tabled)]
struct CandidateRow {
    #[tabled(rename = "ORDER")]
    order: String,
    #[tabled(rename = "FINISHED")]
    finished: String,
    #[tabled(rename = "EMPLOYEE")]
    employee: String,
    #[tabled(rename = "ORDER TOTAL")]
    total: String,
    #[tabled(rename = "COMMISSION")]
    commission: String,
}

/// List commission records
pub fn cmd_list(ctx: &Context) -> Result<()> {
    let commissions = ctx.client()?.commissions()?;
    if commissions.is_empty() {
        println!("No commissions found.");
        return Ok(());
    }

    let rows: Vec<CommissionRow> = commissions
        .iter()
        .map(|c| CommissionRow {
            id: c.id.clone(),
            employee: c
                .employee()
                .map(|e| e.full_name())
                .unwrap_or_else(|| "N/A".to_string()),
            order: c
                .order_ref()
                .map(|o| format!("#{o}"))
                .unwrap_or_else(|| "N/A".to_string()),
            amount: ctx.money(c.amount),
            status: c
                .status
                .as_ref()
                .map(|s| s.label().to_string())
                .unwrap_or_else(|| "N/A".to_string()),
            paid_on: display_date(c.paid_on.as_deref()),
        })
        .collect();
    print_table(rows);
    Ok(())
}

fn render_summary(ctx: &Context, records: &[Commission], summaries: &[EmployeeCommissions]) {
    let totals = CommissionTotals::from_records(records);
    println!("Pending:  {}", ctx.money(totals.pending));
    println!("Paid:     {}", ctx.money(totals.paid));
    println!("Employees with pending commissions: {}", totals.employees_with_pending);
    println!();

    if summaries.is_empty() {
        println!("No commissions found.");
        return;
    }

    let rows: Vec<SummaryRow> = summaries
        .iter()
        .map(|s| SummaryRow {
            employee: s.employee.full_name(),
            pending: ctx.money(s.pending_total),
            pending_count: s.pending.len(),
            paid: ctx.money(s.paid_total),
            paid_count: s.paid.len(),
            generated: ctx.money(s.total_generated),
            paid_share: format!(
                "{} {}",
                progress_bar(s.paid_fraction(), 10),
                format_percent(s.paid_fraction())
            ),
        })
        .collect();
    print_table(rows);
}

/// Per-employee commission summary, optionally refreshed on an interval
pub fn cmd_summary(ctx: &Context, watch: Option<u64>) -> Result<()> {
    let client = ctx.client()?;
    let mut memo = AggregateMemo::new();

    let Some(secs) = watch else {
        let records = client.commissions()?;
        let result = memo.get_or_compute(&records);
        render_summary(ctx, &records, result.summaries);
        return Ok(());
    };

    let interval = Duration::from_secs(secs.max(1));
    loop {
        let records = client.commissions()?;
        let result = memo.get_or_compute(&records);
        if result.changed {
            render_summary(ctx, &records, result.summaries);
            println!(
                "Updated {}. Refreshing every {}s, Ctrl-C to stop.",
                chrono::Local::now().format("%H:%M:%S"),
                interval.as_secs()
            );
        } else {
            debug!(computations = memo.computations(), "commissions unchanged");
        }
        thread::sleep(interval);
    }
}

/// Finished orders without a commission, with the amount each would generate
pub fn cmd_candidates(ctx: &Context) -> Result<()> {
    let client = ctx.client()?;
    let orders = client.orders()?;
    let commissions = client.commissions()?;
    let candidates = commission_candidates(&orders, &commissions);

    if candidates.is_empty() {
        println!("Every finished work order already has a commission.");
        return Ok(());
    }

    let rows: Vec<CandidateRow> = candidates
        .iter()
        .map(|o| CandidateRow {
            order: format!("#{}", o.id),
            finished: display_date(o.finished_on.as_deref()),
            employee: o
                .employee
                .as_ref()
                .map(|e| e.full_name())
                .unwrap_or_else(|| "N/A".to_string()),
            total: ctx.money(o.total()),
            commission: ctx.money(commission_for(o)),
        })
        .collect();
    print_table(rows);
    Ok(())
}

/// Record a commission
pub fn cmd_create(
    ctx: &Context,
    order: String,
    status: Option<CommissionStatus>,
    date: Option<String>,
) -> Result<()> {
    let defaults = CommissionForm::new_commission(today());
    let form = CommissionForm {
        order_id: Some(order),
        status: status.or(defaults.status),
        paid_on: date.or(defaults.paid_on),
    };

    let payload = form.validate()?;
    ctx.client()?.create_commission(&payload)?;
    info!(order = payload.orden_id, "commission created");
    println!("Commission created for work order #{}.", payload.orden_id);
    Ok(())
}

/// Update a commission; fields left out keep their current values
pub fn cmd_update(
    ctx: &Context,
    id: &str,
    order: Option<String>,
    status: Option<CommissionStatus>,
    date: Option<String>,
) -> Result<()> {
    let client = ctx.client()?;
    let current = client
        .commissions()?
        .into_iter()
        .find(|c| c.id == id)
        .ok_or_else(|| TallerError::validation("commission", format!("#{id} not found")))?;
    let current = CommissionForm::from_commission(&current, today());

    let form = CommissionForm {
        order_id: order.or(current.order_id),
        status: status.or(current.status),
        paid_on: date.or(current.paid_on),
    };

    let payload = form.validate()?;
    client.update_commission(id, &payload)?;
    println!("Commission #{id} updated.");
    Ok(())
}
