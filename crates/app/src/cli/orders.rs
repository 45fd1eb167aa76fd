use clap::{Args, Subcommand};
use jiff::Timestamp;
use storefront::{
    catalog::display_price,
    orders::{OrderStatus, OrderTransition, format_order_number, parse_order_number},
};
use storefront_app::{context::AppContext, domain::orders::records::OrderRecord};

use super::output::{BulkReport, Listing, OutputFormat, cell};

#[derive(Debug, Args)]
pub(crate) struct OrdersCommand {
    #[command(subcommand)]
    command: OrdersSubcommand,
}

#[derive(Debug, Subcommand)]
enum OrdersSubcommand {
    /// List orders, newest first
    List(ListOrdersArgs),

    /// Show a single order
    Show(OrderArgs),

    /// Confirm pending orders
    Confirm(OrdersArgs),

    /// Move confirmed orders into processing
    Process(OrdersArgs),

    /// Mark orders as shipped
    Ship(OrdersArgs),

    /// Mark shipped orders as delivered
    Deliver(OrdersArgs),

    /// Cancel orders that have not shipped
    Cancel(OrdersArgs),

    /// Refund orders
    Refund(OrdersArgs),

    /// Replace the staff notes on an order
    Notes(OrderNotesArgs),
}

#[derive(Debug, Args)]
struct ListOrdersArgs {
    /// Only show orders in this status
    #[arg(long)]
    status: Option<OrderStatus>,
}

#[derive(Debug, Args)]
struct OrderArgs {
    /// Order number (RP-0042) or numeric id
    #[arg(value_parser = parse_order_arg)]
    order: i64,
}

#[derive(Debug, Args)]
struct OrdersArgs {
    /// Order numbers (RP-0042) or numeric ids
    #[arg(value_parser = parse_order_arg, required = true)]
    orders: Vec<i64>,
}

#[derive(Debug, Args)]
struct OrderNotesArgs {
    #[command(flatten)]
    order: OrderArgs,

    /// New notes; omit to clear them
    #[arg(long)]
    notes: Option<String>,
}

fn parse_order_arg(value: &str) -> Result<i64, String> {
    parse_order_number(value).ok_or_else(|| format!("not an order number: {value}"))
}

pub(crate) async fn run(
    command: OrdersCommand,
    ctx: &AppContext,
    format: OutputFormat,
) -> Result<(), String> {
    match command.command {
        OrdersSubcommand::List(args) => list(ctx, args.status, format).await,
        OrdersSubcommand::Show(args) => show(ctx, args.order, format).await,
        OrdersSubcommand::Confirm(args) => {
            transition(ctx, &args.orders, OrderTransition::Confirm, format).await
        }
        OrdersSubcommand::Process(args) => {
            transition(ctx, &args.orders, OrderTransition::MarkProcessing, format).await
        }
        OrdersSubcommand::Ship(args) => {
            transition(ctx, &args.orders, OrderTransition::MarkShipped, format).await
        }
        OrdersSubcommand::Deliver(args) => {
            transition(ctx, &args.orders, OrderTransition::MarkDelivered, format).await
        }
        OrdersSubcommand::Cancel(args) => {
            transition(ctx, &args.orders, OrderTransition::Cancel, format).await
        }
        OrdersSubcommand::Refund(args) => {
            transition(ctx, &args.orders, OrderTransition::Refund, format).await
        }
        OrdersSubcommand::Notes(args) => notes(ctx, args, format).await,
    }
}

async fn list(
    ctx: &AppContext,
    status: Option<OrderStatus>,
    format: OutputFormat,
) -> Result<(), String> {
    let orders = ctx
        .orders
        .list_all_orders(status)
        .await
        .map_err(|error| format!("failed to list orders: {error}"))?;

    if orders.is_empty() && format == OutputFormat::Table {
        println!("no orders found");
        return Ok(());
    }

    print_orders(&orders, format)
}

async fn show(ctx: &AppContext, order_id: i64, format: OutputFormat) -> Result<(), String> {
    let order = find(ctx, order_id).await?;

    print_orders(&[order], format)
}

async fn transition(
    ctx: &AppContext,
    order_ids: &[i64],
    transition: OrderTransition,
    format: OutputFormat,
) -> Result<(), String> {
    let mut report = BulkReport::new("order");

    for &order_id in order_ids {
        match transition_one(ctx, order_id, transition).await {
            Ok(order) => report.succeeded(order.order_number(), order.status.label()),
            Err(error) => report.failed(format_order_number(order_id), error),
        }
    }

    report.finish(format)
}

async fn transition_one(
    ctx: &AppContext,
    order_id: i64,
    transition: OrderTransition,
) -> Result<OrderRecord, String> {
    let order = find(ctx, order_id).await?;

    ctx.orders
        .transition_order(order.uuid, transition)
        .await
        .map_err(|error| error.to_string())
}

async fn notes(ctx: &AppContext, args: OrderNotesArgs, format: OutputFormat) -> Result<(), String> {
    let order = find(ctx, args.order.order).await?;

    let updated = ctx
        .orders
        .update_notes(order.uuid, args.notes)
        .await
        .map_err(|error| format!("failed to update notes: {error}"))?;

    print_orders(&[updated], format)
}

async fn find(ctx: &AppContext, order_id: i64) -> Result<OrderRecord, String> {
    ctx.orders
        .get_order_by_number(order_id)
        .await
        .map_err(|error| format!("failed to load order {}: {error}", format_order_number(order_id)))
}

fn print_orders(orders: &[OrderRecord], format: OutputFormat) -> Result<(), String> {
    let now = Timestamp::now();
    let mut listing = Listing::new(&[
        "order",
        "product",
        "total",
        "status",
        "placed",
        "processing_hours",
        "notes",
    ]);

    for order in orders {
        let total = display_price(Some(order.total_amount()))
            .map_err(|error| format!("failed to format total: {error}"))?;

        listing.push(vec![
            order.order_number(),
            order.product_name.clone(),
            cell(total, "-"),
            order.status.label().to_string(),
            order.created_at.to_string(),
            order.processing_time(now).to_string(),
            cell(order.notes.as_deref(), ""),
        ]);
    }

    println!("{}", listing.render(format)?);

    Ok(())
}
