use clap::{Args, Subcommand};
use storefront_app::context::AppContext;

use super::output::{Listing, OutputFormat, cell};

#[derive(Debug, Args)]
pub(crate) struct ProductsCommand {
    #[command(subcommand)]
    command: ProductsSubcommand,
}

#[derive(Debug, Subcommand)]
enum ProductsSubcommand {
    /// List the catalog
    List,
}

pub(crate) async fn run(
    command: ProductsCommand,
    ctx: &AppContext,
    format: OutputFormat,
) -> Result<(), String> {
    match command.command {
        ProductsSubcommand::List => list(ctx, format).await,
    }
}

async fn list(ctx: &AppContext, format: OutputFormat) -> Result<(), String> {
    let products = ctx
        .products
        .list_products()
        .await
        .map_err(|error| format!("failed to list products: {error}"))?;

    let mut listing = Listing::new(&["sku", "name", "brand", "category", "price"]);

    for product in &products {
        let price = product
            .display_price()
            .map_err(|error| format!("failed to format price of {}: {error}", product.name))?;

        listing.push(vec![
            product.sku.to_string(),
            product.name.clone(),
            product.brand.clone(),
            cell(product.category.as_deref(), ""),
            cell(price, "-"),
        ]);
    }

    if listing.is_empty() && format == OutputFormat::Table {
        println!("no products found");
        return Ok(());
    }

    println!("{}", listing.render(format)?);

    Ok(())
}
