use clap::{Args, Subcommand};
use storefront_app::{
    context::AppContext,
    domain::contact::records::{ContactMessageRecord, ContactMessageUuid},
};

use super::output::{BulkReport, Listing, OutputFormat};

#[derive(Debug, Args)]
pub(crate) struct ContactCommand {
    #[command(subcommand)]
    command: ContactSubcommand,
}

#[derive(Debug, Subcommand)]
enum ContactSubcommand {
    /// List contact form messages, newest first
    List(ListMessagesArgs),

    /// Mark messages as read
    Read(MessagesArgs),

    /// Mark messages as unread
    Unread(MessagesArgs),
}

#[derive(Debug, Args)]
struct ListMessagesArgs {
    /// Only show messages nobody has read yet
    #[arg(long)]
    unread: bool,
}

#[derive(Debug, Args)]
struct MessagesArgs {
    /// Message UUIDs
    #[arg(required = true)]
    messages: Vec<ContactMessageUuid>,
}

pub(crate) async fn run(
    command: ContactCommand,
    ctx: &AppContext,
    format: OutputFormat,
) -> Result<(), String> {
    match command.command {
        ContactSubcommand::List(args) => list(ctx, args.unread, format).await,
        ContactSubcommand::Read(args) => set_read(ctx, &args.messages, true, format).await,
        ContactSubcommand::Unread(args) => set_read(ctx, &args.messages, false, format).await,
    }
}

async fn list(ctx: &AppContext, unread: bool, format: OutputFormat) -> Result<(), String> {
    let filter = unread.then_some(false);

    let messages = ctx
        .contact
        .list_messages(filter)
        .await
        .map_err(|error| format!("failed to list messages: {error}"))?;

    if messages.is_empty() && format == OutputFormat::Table {
        println!("no messages found");
        return Ok(());
    }

    let mut listing = Listing::new(&["message", "from", "email", "subject", "received", "read"]);

    for message in &messages {
        listing.push(vec![
            message.uuid.to_string(),
            message.name.clone(),
            message.email.clone(),
            message.subject.clone(),
            message.created_at.to_string(),
            read_label(message).to_string(),
        ]);
    }

    println!("{}", listing.render(format)?);

    Ok(())
}

async fn set_read(
    ctx: &AppContext,
    messages: &[ContactMessageUuid],
    is_read: bool,
    format: OutputFormat,
) -> Result<(), String> {
    let mut report = BulkReport::new("message");

    for &message in messages {
        let result = if is_read {
            ctx.contact.mark_read(message).await
        } else {
            ctx.contact.mark_unread(message).await
        };

        match result {
            Ok(updated) => report.succeeded(updated.uuid.to_string(), read_label(&updated)),
            Err(error) => report.failed(message.to_string(), error.to_string()),
        }
    }

    report.finish(format)
}

fn read_label(message: &ContactMessageRecord) -> &'static str {
    if message.is_read { "read" } else { "unread" }
}

