use std::path::PathBuf;
use tabled::Tabled;
use tracing::warn;

use taller::api::ApiClient;
use taller::filter::ListFilter;
use taller::format::display_date;
use taller::forms::{InvoiceForm, InvoicePayload};
use taller::models::{Invoice, InvoiceStatus};
use taller::{Result, TallerError};

use super::{print_table, save_download, Context};

#[derive(Tabled)]
struct InvoiceRow {
    #[tabled(rename = "NUMBER")]
    number: String,
    #[tabled(rename = "DATE")]
    date: String,
    #[tabled(rename = "CUSTOMER")]
    customer: String,
    #[tabled(rename = "TOTAL")]
    total: String,
    #[tabled(rename = "STATUS")]
    status: String,
}

/// List invoices
pub fn cmd_list(ctx: &Context, search: Option<&str>, status: Option<InvoiceStatus>) -> Result<()> {
    let invoices = ctx.client()?.invoices()?;
    let shown = ListFilter::new(search, status).apply(&invoices);

    if shown.is_empty() {
        println!("No invoices found.");
        return Ok(());
    }

    let rows: Vec<InvoiceRow> = shown
        .iter()
        .map(|inv| InvoiceRow {
            number: inv.number.clone(),
            date: display_date(inv.date.as_deref()),
            customer: inv
                .customer
                .as_ref()
                .map(|c| c.full_name())
                .or_else(|| inv.customer_ci.clone())
                .unwrap_or_else(|| "N/A".to_string()),
            total: ctx.money(inv.total),
            status: inv
                .status
                .as_ref()
                .map(|s| s.label().to_string())
                .unwrap_or_else(|| "N/A".to_string()),
        })
        .collect();
    print_table(rows);

    let issued: f64 = shown.iter().filter(|i| !i.is_void()).map(|i| i.total).sum();
    println!("Issued total: {}", ctx.money(issued));
    Ok(())
}

/// Validate the form, fetching proformas only when one is referenced
fn validated(client: &ApiClient, form: &InvoiceForm) -> Result<InvoicePayload> {
    let has_proforma = form
        .proforma_id
        .as_deref()
        .is_some_and(|p| !p.trim().is_empty());
    let proformas = if has_proforma {
        client.proformas()?
    } else {
        Vec::new()
    };

    let payload = form.validate(&proformas)?;
    if payload.proforma_id.is_none() {
        warn!("no proforma attached; the invoice total will be 0");
    }
    Ok(payload)
}

/// Issue an invoice
pub fn cmd_create(ctx: &Context, form: InvoiceForm) -> Result<()> {
    let client = ctx.client()?;
    let payload = validated(&client, &form)?;
    client.create_invoice(&payload)?;
    println!("Invoice created for customer {}.", payload.cliente_ci);
    Ok(())
}

fn find_invoice(client: &ApiClient, number: &str) -> Result<Invoice> {
    client
        .invoices()?
        .into_iter()
        .find(|i| i.number == number)
        .ok_or_else(|| TallerError::InvoiceNotFound(number.to_string()))
}

/// Update an invoice; fields left out keep their current values
pub fn cmd_update(ctx: &Context, number: &str, input: InvoiceForm) -> Result<()> {
    let client = ctx.client()?;
    let current = find_invoice(&client, number)?;

    let form = InvoiceForm {
        customer_ci: input.customer_ci.or(current.customer_ci),
        proforma_id: input.proforma_id.or(current.proforma_id),
    };
    let payload = validated(&client, &form)?;
    client.update_invoice(number, &payload)?;
    println!("Invoice #{number} updated.");
    Ok(())
}

/// Void an issued invoice
pub fn cmd_void(ctx: &Context, number: &str) -> Result<()> {
    let client = ctx.client()?;
    let invoice = find_invoice(&client, number)?;
    if invoice.is_void() {
        return Err(TallerError::InvoiceAlreadyVoid(number.to_string()));
    }

    client.void_invoice(number)?;
    println!("Invoice #{number} voided.");
    Ok(())
}

/// Delete an invoice
pub fn cmd_delete(ctx: &Context, number: &str) -> Result<()> {
    ctx.client()?.delete_invoice(number)?;
    println!("Invoice #{number} deleted.");
    Ok(())
}

/// Download an invoice PDF, or print its URL
pub fn cmd_pdf(
    ctx: &Context,
    number: &str,
    output: Option<PathBuf>,
    print_url: bool,
) -> Result<()> {
    let client = ctx.client()?;
    if print_url {
        println!("{}", client.invoice_pdf_url(number)?);
        return Ok(());
    }

    let bytes = client.invoice_pdf(number)?;
    let path = output.unwrap_or_else(|| ctx.download_path(&format!("factura-{number}.pdf")));
    save_download(&path, &bytes)
}
