//! Satchel CLI

use clap::{Parser, Subcommand};

use crate::{config::ClientConfig, context::AppContext};

mod cart;
mod checkout;
mod orders;
mod session;

#[derive(Debug, Parser)]
#[command(name = "satchel", about = "Storefront cart and checkout client", long_about = None)]
pub struct Cli {
    #[command(flatten)]
    config: ClientConfig,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Inspect and mutate the current owner's cart
    Cart(cart::CartCommand),

    /// Validate the cart and place an order
    Checkout(checkout::CheckoutArgs),

    /// List previously placed orders
    Orders,

    /// Manage the stored login session
    Session(session::SessionCommand),
}

impl Cli {
    /// Run the parsed command to completion.
    ///
    /// # Errors
    ///
    /// Returns a human-readable message when the command fails.
    pub async fn run(self) -> Result<(), String> {
        let context = AppContext::from_config(&self.config)
            .map_err(|error| format!("failed to initialise storage: {error}"))?;

        match self.command {
            Commands::Cart(command) => cart::run(command, &context),
            Commands::Checkout(args) => checkout::run(args, &context).await,
            Commands::Orders => orders::run(&context).await,
            Commands::Session(command) => session::run(command, &context),
        }
    }
}
