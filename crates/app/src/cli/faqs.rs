use clap::{Args, Subcommand};
use storefront_app::context::AppContext;

use super::output::{Listing, OutputFormat, cell};

#[derive(Debug, Args)]
pub(crate) struct FaqsCommand {
    #[command(subcommand)]
    command: FaqsSubcommand,
}

#[derive(Debug, Subcommand)]
enum FaqsSubcommand {
    /// List active FAQs with their view and vote counters
    List,
}

pub(crate) async fn run(
    command: FaqsCommand,
    ctx: &AppContext,
    format: OutputFormat,
) -> Result<(), String> {
    match command.command {
        FaqsSubcommand::List => list(ctx, format).await,
    }
}

async fn list(ctx: &AppContext, format: OutputFormat) -> Result<(), String> {
    let faqs = ctx
        .faqs
        .list_faqs()
        .await
        .map_err(|error| format!("failed to list faqs: {error}"))?;

    let mut listing = Listing::new(&[
        "category",
        "question",
        "views",
        "helpful",
        "not_helpful",
        "helpful_percent",
    ]);

    for faq in &faqs {
        listing.push(vec![
            faq.category.label().to_string(),
            faq.question.clone(),
            faq.counters.views.to_string(),
            faq.counters.helpful_count.to_string(),
            faq.counters.not_helpful_count.to_string(),
            cell(faq.counters.helpful_percentage(), "-"),
        ]);
    }

    if listing.is_empty() && format == OutputFormat::Table {
        println!("no faqs found");
        return Ok(());
    }

    println!("{}", listing.render(format)?);

    Ok(())
}
