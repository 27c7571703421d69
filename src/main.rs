mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::str::FromStr;
use tracing_subscriber::EnvFilter;

use taller::config::config_dir;
use taller::models::{CommissionStatus, InvoiceStatus, OrderStatus};
use taller::reports::ExportFormat;
use taller::Result;

use crate::commands::Context;

#[derive(Parser)]
#[command(name = "taller")]
#[command(version, about = "Admin client for a motorcycle repair workshop", long_about = None)]
struct Cli {
    /// Path to config directory (default: ~/.taller or XDG config)
    #[arg(short = 'C', long, global = true)]
    config_dir: Option<PathBuf>,

    /// Backend base URL, overriding config.toml
    #[arg(long, global = true, env = "TALLER_API_URL")]
    api_url: Option<String>,

    /// Access token, overriding the stored session
    #[arg(long, global = true, env = "TALLER_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// Log requests and responses to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize config directory with a template config.toml
    Init,

    /// Store an access token for later commands (use with --token)
    Login {
        /// Email shown in status and expiry messages
        #[arg(long)]
        email: Option<String>,
    },

    /// Forget the stored access token
    Logout,

    /// Show backend and session information
    Status,

    /// List customers
    Customers,

    /// List employees
    Employees,

    /// List back-office users
    Users,

    /// List proformas (quotations)
    Proformas {
        /// Only proformas that can be invoiced (approved or completed)
        #[arg(long)]
        billable: bool,
    },

    /// Work orders
    Orders {
        #[command(subcommand)]
        command: OrderCommand,
    },

    /// Invoices
    Invoices {
        #[command(subcommand)]
        command: InvoiceCommand,
    },

    /// Mechanic commissions
    Commissions {
        #[command(subcommand)]
        command: CommissionCommand,
    },

    /// Monthly and yearly reports
    Reports {
        #[command(subcommand)]
        report: ReportCommand,
    },

    /// Customer ratings
    Ratings {
        #[command(subcommand)]
        command: RatingCommand,
    },
}

/// Fields shared by `orders create` and `orders update`
#[derive(clap::Args)]
struct OrderArgs {
    /// Start date (YYYY-MM-DD, default: today on create)
    #[arg(long)]
    start: Option<String>,

    /// End date (YYYY-MM-DD)
    #[arg(long)]
    end: Option<String>,

    /// Status (ABIERTA, EN_PROCESO, FINALIZADA, CANCELADA)
    #[arg(long, value_parser = OrderStatus::from_str)]
    status: Option<OrderStatus>,

    /// Employee ci
    #[arg(long)]
    employee: Option<String>,

    /// User id
    #[arg(long)]
    user: Option<String>,

    /// Proforma detail id
    #[arg(long)]
    detail: Option<String>,
}

#[derive(Subcommand)]
enum OrderCommand {
    /// List work orders
    List {
        /// Match order id or employee name
        #[arg(short, long)]
        search: Option<String>,

        /// Only orders with this status
        #[arg(long, value_parser = OrderStatus::from_str)]
        status: Option<OrderStatus>,
    },

    /// Create a work order
    Create {
        #[command(flatten)]
        fields: OrderArgs,
    },

    /// Update a work order
    Update {
        /// Work order id
        id: String,

        #[command(flatten)]
        fields: OrderArgs,
    },

    /// Delete a work order
    Delete {
        /// Work order id
        id: String,
    },

    /// Print a WhatsApp link telling the customer the motorcycle is ready
    Notify {
        /// Work order id
        id: String,
    },
}

#[derive(Subcommand)]
enum InvoiceCommand {
    /// List invoices
    List {
        /// Match invoice number or customer name
        #[arg(short, long)]
        search: Option<String>,

        /// Only invoices with this status (EMITIDA, ANULADA)
        #[arg(long, value_parser = InvoiceStatus::from_str)]
        status: Option<InvoiceStatus>,
    },

    /// Issue an invoice
    Create {
        /// Customer ci (taken from the proforma when one is given)
        #[arg(long)]
        customer: Option<String>,

        /// Approved or completed proforma to invoice
        #[arg(long)]
        proforma: Option<String>,
    },

    /// Update an invoice
    Update {
        /// Invoice number
        number: String,

        #[arg(long)]
        customer: Option<String>,

        #[arg(long)]
        proforma: Option<String>,
    },

    /// Void an issued invoice
    Void {
        /// Invoice number
        number: String,
    },

    /// Delete an invoice
    Delete {
        /// Invoice number
        number: String,
    },

    /// Download an invoice PDF
    Pdf {
        /// Invoice number
        number: String,

        /// Output file (default: downloads/factura-<number>.pdf)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Print the download URL instead of downloading
        #[arg(long)]
        print_url: bool,
    },
}

#[derive(Subcommand)]
enum CommissionCommand {
    /// List commission records
    List,

    /// Per-employee totals, highest pending first
    Summary {
        /// Refresh every N seconds until interrupted
        #[arg(long, value_name = "SECS")]
        watch: Option<u64>,
    },

    /// Finished work orders that have no commission yet
    Candidates,

    /// Record a commission
    Create {
        /// Work order id
        #[arg(long)]
        order: String,

        /// Payment status (PENDIENTE, PAGADO, CANCELADO)
        #[arg(long, value_parser = CommissionStatus::from_str)]
        status: Option<CommissionStatus>,

        /// Payment date (YYYY-MM-DD, default: today)
        #[arg(long)]
        date: Option<String>,
    },

    /// Update a commission
    Update {
        /// Commission id
        id: String,

        /// Work order id (default: unchanged)
        #[arg(long)]
        order: Option<String>,

        #[arg(long, value_parser = CommissionStatus::from_str)]
        status: Option<CommissionStatus>,

        #[arg(long)]
        date: Option<String>,
    },
}

/// Report period and export options
#[derive(clap::Args)]
struct ReportArgs {
    /// Month 1-12 (default: current month)
    #[arg(short, long)]
    month: Option<u32>,

    /// Year (default: current year)
    #[arg(short, long)]
    year: Option<i32>,

    /// Download the report as excel or pdf instead of printing it
    #[arg(long, value_name = "FORMAT")]
    export: Option<ExportFormat>,

    /// Output file for --export (default: downloads/<report>.<ext>)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// With --export, print the download URL instead of downloading
    #[arg(long)]
    print_url: bool,
}

#[derive(Subcommand)]
enum ReportCommand {
    /// Customers with the most visits in a month
    FrequentCustomers {
        #[command(flatten)]
        args: ReportArgs,
    },

    /// Most requested services in a month
    RequestedServices {
        #[command(flatten)]
        args: ReportArgs,
    },

    /// Income per month for a year
    MonthlyIncome {
        #[command(flatten)]
        args: ReportArgs,
    },

    /// Orders, diagnoses and activity per employee in a month
    EmployeeActivity {
        #[command(flatten)]
        args: ReportArgs,
    },
}

#[derive(Subcommand)]
enum RatingCommand {
    /// List customer ratings
    List,

    /// Average and distribution of ratings
    Stats,

    /// Delete a rating
    Delete {
        /// Rating id
        id: String,
    },

    /// Leave a rating (no login needed)
    Submit {
        /// Score from 1 to 5
        #[arg(short, long)]
        rating: u8,

        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        email: Option<String>,

        #[arg(long)]
        comment: Option<String>,
    },

    /// Print the public rating page and a WhatsApp link to share it
    Link,
}

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "taller=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    // Determine config directory
    let cfg_dir = match cli.config_dir {
        Some(p) => p,
        None => config_dir()?,
    };

    // Commands that work without a loaded config
    match &cli.command {
        Commands::Init => return commands::session::cmd_init(&cfg_dir, cli.api_url.as_deref()),
        Commands::Logout => return commands::session::cmd_logout(&cfg_dir),
        Commands::Login { email } => {
            return commands::session::cmd_login(&cfg_dir, cli.token.as_deref(), email.clone())
        }
        _ => {}
    }

    let ctx = Context::load(cfg_dir, cli.api_url, cli.token)?;

    match cli.command {
        Commands::Init | Commands::Login { .. } | Commands::Logout => Ok(()),
        Commands::Status => commands::session::cmd_status(&ctx),
        Commands::Customers => commands::lookups::cmd_customers(&ctx),
        Commands::Employees => commands::lookups::cmd_employees(&ctx),
        Commands::Users => commands::lookups::cmd_users(&ctx),
        Commands::Proformas { billable } => commands::lookups::cmd_proformas(&ctx, billable),
        Commands::Orders { command } => run_orders(&ctx, command),
        Commands::Invoices { command } => run_invoices(&ctx, command),
        Commands::Commissions { command } => run_commissions(&ctx, command),
        Commands::Reports { report } => run_reports(&ctx, report),
        Commands::Ratings { command } => run_ratings(&ctx, command),
    }
}

fn order_form(fields: OrderArgs) -> taller::forms::OrderForm {
    taller::forms::OrderForm {
        started_on: fields.start,
        finished_on: fields.end,
        status: fields.status,
        employee_ci: fields.employee,
        user_id: fields.user,
        detail_id: fields.detail,
    }
}

fn run_orders(ctx: &Context, command: OrderCommand) -> Result<()> {
    use commands::orders;

    match command {
        OrderCommand::List { search, status } => orders::cmd_list(ctx, search.as_deref(), status),
        OrderCommand::Create { fields } => orders::cmd_create(ctx, order_form(fields)),
        OrderCommand::Update { id, fields } => orders::cmd_update(ctx, &id, order_form(fields)),
        OrderCommand::Delete { id } => orders::cmd_delete(ctx, &id),
        OrderCommand::Notify { id } => orders::cmd_notify(ctx, &id),
    }
}

fn run_invoices(ctx: &Context, command: InvoiceCommand) -> Result<()> {
    use commands::invoices;
    use taller::forms::InvoiceForm;

    match command {
        InvoiceCommand::List { search, status } => {
            invoices::cmd_list(ctx, search.as_deref(), status)
        }
        InvoiceCommand::Create { customer, proforma } => invoices::cmd_create(
            ctx,
            InvoiceForm {
                customer_ci: customer,
                proforma_id: proforma,
            },
        ),
        InvoiceCommand::Update {
            number,
            customer,
            proforma,
        } => invoices::cmd_update(
            ctx,
            &number,
            InvoiceForm {
                customer_ci: customer,
                proforma_id: proforma,
            },
        ),
        InvoiceCommand::Void { number } => invoices::cmd_void(ctx, &number),
        InvoiceCommand::Delete { number } => invoices::cmd_delete(ctx, &number),
        InvoiceCommand::Pdf {
            number,
            output,
            print_url,
        } => invoices::cmd_pdf(ctx, &number, output, print_url),
    }
}

fn run_commissions(ctx: &Context, command: CommissionCommand) -> Result<()> {
    use commands::commissions;

    match command {
        CommissionCommand::List => commissions::cmd_list(ctx),
        CommissionCommand::Summary { watch } => commissions::cmd_summary(ctx, watch),
        CommissionCommand::Candidates => commissions::cmd_candidates(ctx),
        CommissionCommand::Create {
            order,
            status,
            date,
        } => commissions::cmd_create(ctx, order, status, date),
        CommissionCommand::Update {
            id,
            order,
            status,
            date,
        } => commissions::cmd_update(ctx, &id, order, status, date),
    }
}

fn run_reports(ctx: &Context, report: ReportCommand) -> Result<()> {
    use commands::reports::{cmd_report, ReportOptions};
    use taller::reports::ReportKind;

    let (kind, args) = match report {
        ReportCommand::FrequentCustomers { args } => (ReportKind::FrequentCustomers, args),
        ReportCommand::RequestedServices { args } => (ReportKind::RequestedServices, args),
        ReportCommand::MonthlyIncome { args } => (ReportKind::MonthlyIncome, args),
        ReportCommand::EmployeeActivity { args } => (ReportKind::EmployeeActivity, args),
    };

    cmd_report(
        ctx,
        kind,
        ReportOptions {
            month: args.month,
            year: args.year,
            export: args.export,
            output: args.output,
            print_url: args.print_url,
        },
    )
}

fn run_ratings(ctx: &Context, command: RatingCommand) -> Result<()> {
    use commands::ratings;
    use taller::forms::RatingForm;

    match command {
        RatingCommand::List => ratings::cmd_list(ctx),
        RatingCommand::Stats => ratings::cmd_stats(ctx),
        RatingCommand::Delete { id } => ratings::cmd_delete(ctx, &id),
        RatingCommand::Submit {
            rating,
            name,
            email,
            comment,
        } => ratings::cmd_submit(
            ctx,
            RatingForm {
                name,
                email,
                score: rating,
                comment,
            },
        ),
        RatingCommand::Link => ratings::cmd_link(ctx),
    }
}
