use clap::{Args, ValueEnum};

use crate::{
    context::AppContext,
    domain::orders::{
        errors::OrderFlowError,
        models::{CheckoutForm, Payment},
    },
};

#[derive(Debug, Args)]
pub(crate) struct CheckoutArgs {
    /// Delivery address
    #[arg(long)]
    address: String,

    /// Payment method
    #[arg(long, value_enum, default_value_t = PaymentMethodArg::Cod)]
    method: PaymentMethodArg,

    /// UPI handle, required with `--method upi`
    #[arg(long)]
    upi_id: Option<String>,

    /// Card number, required with `--method card`
    #[arg(long)]
    card_number: Option<String>,

    /// Cardholder name, required with `--method card`
    #[arg(long)]
    card_name: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum PaymentMethodArg {
    Cod,
    Upi,
    Card,
}

pub(crate) async fn run(args: CheckoutArgs, context: &AppContext) -> Result<(), String> {
    let payment = match args.method {
        PaymentMethodArg::Cod => Payment::CashOnDelivery,
        PaymentMethodArg::Upi => Payment::Upi {
            upi_id: args.upi_id.unwrap_or_default(),
        },
        PaymentMethodArg::Card => Payment::Card {
            card_number: args.card_number.unwrap_or_default(),
            cardholder: args.card_name.unwrap_or_default(),
        },
    };

    let form = CheckoutForm {
        delivery_address: args.address,
        payment,
    };

    let order = match context.orders.submit(&form).await {
        Ok(order) => order,
        Err(OrderFlowError::SessionExpired) => {
            return Err("session expired; log in again with `satchel session login`".to_string());
        }
        Err(error) => return Err(format!("failed to place order: {error}")),
    };

    println!("order_ref: {}", order.id);
    if let Some(status) = &order.status {
        println!("status: {status}");
    }
    println!("total: {}", order.total_amount);

    Ok(())
}
