use clap::{Args, Subcommand};
use storefront::tickets::{Rating, TicketPriority, TicketStatus, TicketTransition};
use storefront_app::{
    context::AppContext,
    domain::tickets::{
        data::NewTicketReply,
        records::{TicketRecord, TicketReplyRecord},
    },
};

use super::output::{BulkReport, Listing, OutputFormat, cell};

#[derive(Debug, Args)]
pub(crate) struct TicketsCommand {
    #[command(subcommand)]
    command: TicketsSubcommand,
}

#[derive(Debug, Subcommand)]
enum TicketsSubcommand {
    /// List tickets, newest first
    List(ListTicketsArgs),

    /// Show a ticket and its replies
    Show(TicketArgs),

    /// Start working on tickets
    Progress(TicketsArgs),

    /// Wait for the customers to answer
    Wait(TicketsArgs),

    /// Mark tickets resolved
    Resolve(TicketsArgs),

    /// Close tickets
    Close(TicketsArgs),

    /// Record the staff response shown to the customer
    Respond(RespondArgs),

    /// Post a staff reply on the ticket thread
    Reply(RespondArgs),

    /// Change the ticket priority
    Priority(PriorityArgs),

    /// Record the customer's rating of a resolved ticket
    Rate(RateArgs),

    /// Replace the internal resolution notes
    Notes(ResolutionNotesArgs),
}

#[derive(Debug, Args)]
struct ListTicketsArgs {
    /// Only show tickets in this status
    #[arg(long)]
    status: Option<TicketStatus>,
}

#[derive(Debug, Args)]
struct TicketArgs {
    /// Ticket number, e.g. TKT-20261019-0A1B2C
    number: String,
}

#[derive(Debug, Args)]
struct TicketsArgs {
    /// Ticket numbers
    #[arg(required = true)]
    numbers: Vec<String>,
}

#[derive(Debug, Args)]
struct ResolutionNotesArgs {
    #[command(flatten)]
    ticket: TicketArgs,

    /// New notes; omit to clear them
    #[arg(long)]
    notes: Option<String>,
}

#[derive(Debug, Args)]
struct RespondArgs {
    #[command(flatten)]
    ticket: TicketArgs,

    /// Message text
    #[arg(long)]
    message: String,
}

#[derive(Debug, Args)]
struct PriorityArgs {
    #[command(flatten)]
    ticket: TicketArgs,

    /// New priority (low, medium, high, urgent)
    #[arg(long)]
    priority: TicketPriority,
}

#[derive(Debug, Args)]
struct RateArgs {
    #[command(flatten)]
    ticket: TicketArgs,

    /// Rating from 1 to 5
    #[arg(long, value_parser = parse_rating)]
    rating: Rating,

    /// Optional customer feedback
    #[arg(long)]
    feedback: Option<String>,
}

fn parse_rating(value: &str) -> Result<Rating, String> {
    let value: i64 = value
        .parse()
        .map_err(|error| format!("not a number: {error}"))?;

    Rating::new(value).map_err(|error| error.to_string())
}

pub(crate) async fn run(
    command: TicketsCommand,
    ctx: &AppContext,
    format: OutputFormat,
) -> Result<(), String> {
    match command.command {
        TicketsSubcommand::List(args) => list(ctx, args.status, format).await,
        TicketsSubcommand::Show(args) => show(ctx, &args.number, format).await,
        TicketsSubcommand::Progress(args) => {
            transition(ctx, &args.numbers, TicketTransition::MarkInProgress, format).await
        }
        TicketsSubcommand::Wait(args) => {
            transition(ctx, &args.numbers, TicketTransition::MarkWaitingCustomer, format).await
        }
        TicketsSubcommand::Resolve(args) => {
            transition(ctx, &args.numbers, TicketTransition::MarkResolved, format).await
        }
        TicketsSubcommand::Close(args) => {
            transition(ctx, &args.numbers, TicketTransition::Close, format).await
        }
        TicketsSubcommand::Respond(args) => respond(ctx, args, format).await,
        TicketsSubcommand::Reply(args) => reply(ctx, args, format).await,
        TicketsSubcommand::Priority(args) => priority(ctx, args, format).await,
        TicketsSubcommand::Rate(args) => rate(ctx, args, format).await,
        TicketsSubcommand::Notes(args) => resolution_notes(ctx, args, format).await,
    }
}

async fn list(
    ctx: &AppContext,
    status: Option<TicketStatus>,
    format: OutputFormat,
) -> Result<(), String> {
    let tickets = ctx
        .tickets
        .list_tickets(status)
        .await
        .map_err(|error| format!("failed to list tickets: {error}"))?;

    if tickets.is_empty() && format == OutputFormat::Table {
        println!("no tickets found");
        return Ok(());
    }

    print_tickets(&tickets, format)
}

async fn show(ctx: &AppContext, number: &str, format: OutputFormat) -> Result<(), String> {
    let ticket = find(ctx, number).await?;

    let replies = ctx
        .tickets
        .list_replies(ticket.uuid)
        .await
        .map_err(|error| format!("failed to load replies: {error}"))?;

    print_tickets(std::slice::from_ref(&ticket), format)?;

    if !replies.is_empty() {
        print_replies(&replies, format)?;
    }

    Ok(())
}

async fn transition(
    ctx: &AppContext,
    numbers: &[String],
    transition: TicketTransition,
    format: OutputFormat,
) -> Result<(), String> {
    let mut report = BulkReport::new("ticket");

    for number in numbers {
        match transition_one(ctx, number, transition).await {
            Ok(ticket) => report.succeeded(ticket.ticket_number, ticket.status.label()),
            Err(error) => report.failed(number.clone(), error),
        }
    }

    report.finish(format)
}

async fn transition_one(
    ctx: &AppContext,
    number: &str,
    transition: TicketTransition,
) -> Result<TicketRecord, String> {
    let ticket = find(ctx, number).await?;

    ctx.tickets
        .transition_ticket(ticket.uuid, transition)
        .await
        .map_err(|error| error.to_string())
}

async fn respond(ctx: &AppContext, args: RespondArgs, format: OutputFormat) -> Result<(), String> {
    let ticket = find(ctx, &args.ticket.number).await?;

    let updated = ctx
        .tickets
        .respond(ticket.uuid, args.message)
        .await
        .map_err(|error| format!("failed to respond to {}: {error}", args.ticket.number))?;

    print_tickets(&[updated], format)
}

async fn reply(ctx: &AppContext, args: RespondArgs, format: OutputFormat) -> Result<(), String> {
    let ticket = find(ctx, &args.ticket.number).await?;

    let reply = ctx
        .tickets
        .add_reply(NewTicketReply {
            ticket_uuid: ticket.uuid,
            user_uuid: None,
            is_staff_reply: true,
            message: args.message,
        })
        .await
        .map_err(|error| format!("failed to reply to {}: {error}", args.ticket.number))?;

    print_replies(&[reply], format)
}

async fn priority(ctx: &AppContext, args: PriorityArgs, format: OutputFormat) -> Result<(), String> {
    let ticket = find(ctx, &args.ticket.number).await?;

    let updated = ctx
        .tickets
        .set_priority(ticket.uuid, args.priority)
        .await
        .map_err(|error| format!("failed to set priority: {error}"))?;

    print_tickets(&[updated], format)
}

async fn rate(ctx: &AppContext, args: RateArgs, format: OutputFormat) -> Result<(), String> {
    let ticket = find(ctx, &args.ticket.number).await?;

    let updated = ctx
        .tickets
        .rate_ticket(ticket.uuid, args.rating, args.feedback)
        .await
        .map_err(|error| format!("failed to rate {}: {error}", args.ticket.number))?;

    print_tickets(&[updated], format)
}

async fn resolution_notes(
    ctx: &AppContext,
    args: ResolutionNotesArgs,
    format: OutputFormat,
) -> Result<(), String> {
    let ticket = find(ctx, &args.ticket.number).await?;

    let updated = ctx
        .tickets
        .set_resolution_notes(ticket.uuid, args.notes)
        .await
        .map_err(|error| format!("failed to update notes: {error}"))?;

    print_tickets(&[updated], format)
}

async fn find(ctx: &AppContext, number: &str) -> Result<TicketRecord, String> {
    ctx.tickets
        .get_ticket_by_number(number)
        .await
        .map_err(|error| format!("failed to load ticket {number}: {error}"))
}

fn print_tickets(tickets: &[TicketRecord], format: OutputFormat) -> Result<(), String> {
    let mut listing = Listing::new(&[
        "ticket",
        "subject",
        "status",
        "priority",
        "customer",
        "opened",
        "response_hours",
        "resolution_hours",
        "rating",
        "resolution_notes",
    ]);

    for ticket in tickets {
        listing.push(vec![
            ticket.ticket_number.clone(),
            ticket.subject.label().to_string(),
            ticket.status.label().to_string(),
            ticket.priority.label().to_string(),
            ticket.email.clone(),
            ticket.created_at.to_string(),
            cell(ticket.response_time(), "-"),
            cell(ticket.resolution_time(), "-"),
            cell(ticket.rating, "-"),
            cell(ticket.resolution_notes.as_deref(), ""),
        ]);
    }

    println!("{}", listing.render(format)?);

    Ok(())
}

fn print_replies(replies: &[TicketReplyRecord], format: OutputFormat) -> Result<(), String> {
    let mut listing = Listing::new(&["from", "posted", "message"]);

    for reply in replies {
        let from = if reply.is_staff_reply { "staff" } else { "customer" };

        listing.push(vec![
            from.to_string(),
            reply.created_at.to_string(),
            reply.message.clone(),
        ]);
    }

    println!("{}", listing.render(format)?);

    Ok(())
}
