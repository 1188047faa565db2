use clap::{Args, Subcommand};

use crate::{
    context::AppContext,
    domain::{
        carts::models::Cart,
        products::{Product, ProductId, RawProduct},
    },
    notify::NoticeKind,
};

#[derive(Debug, Args)]
pub(crate) struct CartCommand {
    #[command(subcommand)]
    command: CartSubcommand,
}

#[derive(Debug, Subcommand)]
enum CartSubcommand {
    /// Add one unit of a product
    Add(AddArgs),

    /// Remove one unit of a product
    Remove(RemoveArgs),

    /// Print the cart
    Show,

    /// Empty the cart
    Clear,
}

#[derive(Debug, Args)]
struct AddArgs {
    /// Product payload as the catalog delivers it (JSON)
    #[arg(long, conflicts_with_all = ["id", "title", "price", "image"])]
    json: Option<String>,

    /// Product id
    #[arg(long)]
    id: Option<String>,

    /// Product title
    #[arg(long)]
    title: Option<String>,

    /// Unit price in major units
    #[arg(long)]
    price: Option<f64>,

    /// Image path
    #[arg(long)]
    image: Option<String>,
}

#[derive(Debug, Args)]
struct RemoveArgs {
    /// Product id
    #[arg(long)]
    id: String,
}

pub(crate) fn run(command: CartCommand, context: &AppContext) -> Result<(), String> {
    match command.command {
        CartSubcommand::Add(args) => add(args, context),
        CartSubcommand::Remove(args) => {
            let cart = context.cart.remove_item(&ProductId::new(args.id));
            print_cart(&cart);

            Ok(())
        }
        CartSubcommand::Show => {
            print_cart(&context.cart.snapshot());

            Ok(())
        }
        CartSubcommand::Clear => {
            print_cart(&context.cart.clear());

            Ok(())
        }
    }
}

fn add(args: AddArgs, context: &AppContext) -> Result<(), String> {
    let raw = match args.json {
        Some(json) => serde_json::from_str::<RawProduct>(&json)
            .map_err(|error| format!("invalid product payload: {error}"))?,
        None => RawProduct {
            id: args.id,
            title: args.title,
            price: args.price,
            image: args.image,
            ..RawProduct::default()
        },
    };

    let product = match Product::from_raw(raw) {
        Ok(product) => product,
        Err(error) => {
            context
                .notifier
                .notify(NoticeKind::Error, &format!("Could not add product: {error}"));

            return Err(format!("could not add product: {error}"));
        }
    };

    let cart = context.cart.add_item(&product);
    print_cart(&cart);

    Ok(())
}

fn print_cart(cart: &Cart) {
    println!("owner: {}", cart.owner);

    if cart.is_empty() {
        println!("cart is empty");
        return;
    }

    for line in &cart.lines {
        println!(
            "{} x{} @ {} = {}",
            line.title,
            line.quantity,
            line.price,
            line.line_total()
        );
    }
    println!("items: {}", cart.line_count);
    println!("total: {}", cart.total_price);
}
