use clap::{Parser, Subcommand};
use storefront_app::context::AppContext;

mod config;
mod contact;
mod db;
mod faqs;
mod logging;
mod orders;
mod output;
mod products;
mod site;
mod tickets;

use config::{DatabaseConfig, LoggingConfig};
use output::OutputFormat;

#[derive(Debug, Parser)]
#[command(name = "storefront", about = "Storefront administration", long_about = None)]
pub(crate) struct Cli {
    #[command(flatten)]
    logging: LoggingConfig,

    #[command(flatten)]
    database: DatabaseConfig,

    /// Output format for listings
    #[arg(long, value_enum, default_value_t = OutputFormat::Table, global = true)]
    format: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Database maintenance
    Db(db::DbCommand),

    /// Catalog
    Products(products::ProductsCommand),

    /// Order fulfilment
    Orders(orders::OrdersCommand),

    /// Support tickets
    Tickets(tickets::TicketsCommand),

    /// Contact form messages
    Contact(contact::ContactCommand),

    /// Frequently asked questions
    Faqs(faqs::FaqsCommand),

    /// Show the admin branding in effect
    Site(site::SiteCommand),
}

impl Cli {
    pub(crate) fn init_logging(&self) -> Result<(), String> {
        logging::init(&self.logging)
    }

    pub(crate) async fn run(self) -> Result<(), String> {
        let format = self.format;

        match self.command {
            Commands::Site(command) => site::run(&command, format),
            Commands::Db(command) => db::run(command, self.database.url()?).await,
            Commands::Products(command) => {
                products::run(command, &connect(&self.database).await?, format).await
            }
            Commands::Orders(command) => {
                orders::run(command, &connect(&self.database).await?, format).await
            }
            Commands::Tickets(command) => {
                tickets::run(command, &connect(&self.database).await?, format).await
            }
            Commands::Contact(command) => {
                contact::run(command, &connect(&self.database).await?, format).await
            }
            Commands::Faqs(command) => {
                faqs::run(command, &connect(&self.database).await?, format).await
            }
        }
    }
}

async fn connect(database: &DatabaseConfig) -> Result<AppContext, String> {
    AppContext::from_database_url(database.url()?)
        .await
        .map_err(|error| error.to_string())
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn command_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn order_numbers_accept_prefixed_and_bare_forms() {
        let prefixed = Cli::try_parse_from(["storefront", "orders", "ship", "RP-0042"]);
        let bare = Cli::try_parse_from(["storefront", "orders", "ship", "42"]);

        assert!(prefixed.is_ok(), "{prefixed:?}");
        assert!(bare.is_ok(), "{bare:?}");
    }

    #[test]
    fn malformed_order_number_is_rejected() {
        let result = Cli::try_parse_from(["storefront", "orders", "ship", "RP-"]);

        assert!(result.is_err(), "expected parse failure");
    }

    #[test]
    fn ratings_outside_range_are_rejected() {
        let result = Cli::try_parse_from([
            "storefront",
            "tickets",
            "rate",
            "TKT-20261019-0A1B2C",
            "--rating",
            "6",
        ]);

        assert!(result.is_err(), "expected rating 6 to be rejected");
    }

    #[test]
    fn ticket_status_filter_uses_stored_names() {
        let result = Cli::try_parse_from([
            "storefront",
            "tickets",
            "list",
            "--status",
            "waiting_customer",
        ]);

        assert!(result.is_ok(), "{result:?}");
    }

    #[test]
    fn order_transitions_accept_several_orders() {
        let result = Cli::try_parse_from(["storefront", "orders", "ship", "RP-0001", "2"]);

        assert!(result.is_ok(), "{result:?}");
    }

    #[test]
    fn order_transitions_need_at_least_one_order() {
        let result = Cli::try_parse_from(["storefront", "orders", "ship"]);

        assert!(result.is_err(), "expected missing orders to be rejected");
    }

    #[test]
    fn ticket_transitions_accept_several_tickets() {
        let result = Cli::try_parse_from([
            "storefront",
            "tickets",
            "close",
            "TKT-20261019-0A1B2C",
            "TKT-20261019-3D4E5F",
        ]);

        assert!(result.is_ok(), "{result:?}");
    }

    #[test]
    fn resolution_notes_can_be_set_or_cleared() {
        let set = Cli::try_parse_from([
            "storefront",
            "tickets",
            "notes",
            "TKT-20261019-0A1B2C",
            "--notes",
            "Replaced the unit",
        ]);
        let cleared = Cli::try_parse_from(["storefront", "tickets", "notes", "TKT-20261019-0A1B2C"]);

        assert!(set.is_ok(), "{set:?}");
        assert!(cleared.is_ok(), "{cleared:?}");
    }

    #[test]
    fn contact_commands_take_message_uuids() {
        let list = Cli::try_parse_from(["storefront", "contact", "list", "--unread"]);
        let read = Cli::try_parse_from([
            "storefront",
            "contact",
            "read",
            "0199f7a4-5c1e-7d2b-9a3f-1e2d3c4b5a69",
            "0199f7a4-5c1e-7d2b-9a3f-1e2d3c4b5a70",
        ]);
        let malformed = Cli::try_parse_from(["storefront", "contact", "unread", "not-a-uuid"]);

        assert!(list.is_ok(), "{list:?}");
        assert!(read.is_ok(), "{read:?}");
        assert!(malformed.is_err(), "expected malformed uuid to be rejected");
    }
}
