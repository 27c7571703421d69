use tabled::Tabled;

use taller::format::display_date;
use taller::Result;

use super::{or_na, print_table, Context};

#[derive(Tabled)]
struct PersonRow {
    #[tabled(rename = "CI")]
    ci: String,
    #[tabled(rename = "NAME")]
    name: String,
    #[tabled(rename = "PHONE")]
    phone: String,
}

#[derive(Tabled)]
struct UserRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "EMAIL")]
    email: String,
    #[tabled(rename = "NAME")]
    name: String,
}

#[derive(Tabled)]
struct ProformaRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "DATE")]
    date: String,
    #[tabled(rename = "CUSTOMER")]
    customer: String,
    #[tabled(rename = "MOTORCYCLE")]
    motorcycle: String,
    #[tabled(rename = "TOTAL")]
    total: String,
    #[tabled(rename = "STATUS")]
    status: String,
}

/// List customers
pub fn cmd_customers(ctx: &Context) -> Result<()> {
    let customers = ctx.client()?.customers()?;
    if customers.is_empty() {
        println!("No customers found.");
        return Ok(());
    }

    let rows: Vec<PersonRow> = customers
        .iter()
        .map(|c| PersonRow {
            ci: c.ci.clone(),
            name: c.full_name(),
            phone: or_na(c.phone.as_deref()),
        })
        .collect();
    print_table(rows);
    Ok(())
}

/// List employees
pub fn cmd_employees(ctx: &Context) -> Result<()> {
    let employees = ctx.client()?.employees()?;
    if employees.is_empty() {
        println!("No employees found.");
        return Ok(());
    }

    let rows: Vec<PersonRow> = employees
        .iter()
        .map(|e| PersonRow {
            ci: e.ci.clone(),
            name: e.full_name(),
            phone: or_na(e.phone.as_deref()),
        })
        .collect();
    print_table(rows);
    Ok(())
}

/// List back-office users
pub fn cmd_users(ctx: &Context) -> Result<()> {
    let users = ctx.client()?.users()?;
    if users.is_empty() {
        println!("No users found.");
        return Ok(());
    }

    let rows: Vec<UserRow> = users
        .iter()
        .map(|u| UserRow {
            id: u.id.clone(),
            email: u.email.clone(),
            name: or_na(u.name.as_deref()),
        })
        .collect();
    print_table(rows);
    Ok(())
}

/// List proformas, optionally only the ones that can be invoiced
pub fn cmd_proformas(ctx: &Context, billable_only: bool) -> Result<()> {
    let proformas = ctx.client()?.proformas()?;
    let proformas: Vec<_> = proformas
        .iter()
        .filter(|p| !billable_only || p.is_billable())
        .collect();

    if proformas.is_empty() {
        println!("No proformas found.");
        return Ok(());
    }

    let rows: Vec<ProformaRow> = proformas
        .iter()
        .map(|p| ProformaRow {
            id: p.id.clone(),
            date: display_date(p.date.as_deref()),
            customer: p
                .customer
                .as_ref()
                .map(|c| c.full_name())
                .or_else(|| p.customer_id())
                .unwrap_or_else(|| "N/A".to_string()),
            motorcycle: p
                .motorcycle()
                .map(|m| {
                    format!(
                        "{} ({})",
                        m.model.as_deref().unwrap_or("N/A"),
                        m.plate.as_deref().unwrap_or("N/A")
                    )
                })
                .unwrap_or_else(|| "N/A".to_string()),
            total: ctx.money(p.total),
            status: p
                .status
                .as_ref()
                .map(|s| s.label().to_string())
                .unwrap_or_else(|| "N/A".to_string()),
        })
        .collect();
    print_table(rows);
    Ok(())
}
