use tabled::Tabled;
use tracing::{info, warn};

use taller::filter::ListFilter;
use taller::format::display_date;
use taller::forms::OrderForm;
use taller::models::{OrderStatus, WorkOrder};
use taller::whatsapp::notify_link;
use taller::{Result, TallerError};

use super::{print_table, today, Context};

#[derive(Tabled)]
struct OrderRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "START")]
    start: String,
    #[tabled(rename = "END")]
    end: String,
    #[tabled(rename = "EMPLOYEE")]
    employee: String,
    #[tabled(rename = "TOTAL")]
    total: String,
    #[tabled(rename = "STATUS")]
    status: String,
}

/// List work orders
pub fn cmd_list(ctx: &Context, search: Option<&str>, status: Option<OrderStatus>) -> Result<()> {
    let orders = ctx.client()?.orders()?;
    let filter = ListFilter::new(search, status);
    let shown = filter.apply(&orders);

    if shown.is_empty() {
        println!("No work orders found.");
        return Ok(());
    }

    let rows: Vec<OrderRow> = shown
        .iter()
        .map(|o| OrderRow {
            id: o.id.clone(),
            start: display_date(o.started_on.as_deref()),
            end: display_date(o.finished_on.as_deref()),
            employee: o
                .employee
                .as_ref()
                .map(|e| e.full_name())
                .unwrap_or_else(|| "N/A".to_string()),
            total: ctx.money(o.total()),
            status: o
                .status
                .as_ref()
                .map(|s| s.label().to_string())
                .unwrap_or_else(|| "N/A".to_string()),
        })
        .collect();
    print_table(rows);

    if shown.len() != orders.len() {
        println!("{} of {} work orders", shown.len(), orders.len());
    }
    Ok(())
}

/// Create a work order
pub fn cmd_create(ctx: &Context, input: OrderForm) -> Result<()> {
    let today = today();
    let defaults = OrderForm::new_order(today);
    let form = OrderForm {
        started_on: input.started_on.or(defaults.started_on),
        status: input.status.or(defaults.status),
        ..input
    };

    let payload = form.validate(today)?;
    ctx.client()?.create_order(&payload)?;
    info!(employee = payload.empleado_ci, "work order created");
    println!("Work order created.");
    Ok(())
}

fn find_order(orders: Vec<WorkOrder>, id: &str) -> Result<WorkOrder> {
    orders
        .into_iter()
        .find(|o| o.id == id)
        .ok_or_else(|| TallerError::OrderNotFound(id.to_string()))
}

/// Update a work order; fields left out keep their current values
pub fn cmd_update(ctx: &Context, id: &str, input: OrderForm) -> Result<()> {
    let client = ctx.client()?;
    let current = OrderForm::from_order(&find_order(client.orders()?, id)?);

    let form = OrderForm {
        started_on: input.started_on.or(current.started_on),
        finished_on: input.finished_on.or(current.finished_on),
        status: input.status.or(current.status),
        employee_ci: input.employee_ci.or(current.employee_ci),
        user_id: input.user_id.or(current.user_id),
        detail_id: input.detail_id.or(current.detail_id),
    };

    let payload = form.validate(today())?;
    client.update_order(id, &payload)?;
    println!("Work order #{id} updated.");
    Ok(())
}

/// Delete a work order
pub fn cmd_delete(ctx: &Context, id: &str) -> Result<()> {
    ctx.client()?.delete_order(id)?;
    println!("Work order #{id} deleted.");
    Ok(())
}

/// Print the WhatsApp pickup notice for an order's customer
pub fn cmd_notify(ctx: &Context, id: &str) -> Result<()> {
    let order = find_order(ctx.client()?.orders()?, id)?;
    if !order.is_finished() {
        warn!(order = %order.id, "order is not finished yet");
    }
    println!("{}", notify_link(&order)?);
    Ok(())
}
