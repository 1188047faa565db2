use crate::{context::AppContext, domain::orders::errors::OrderFlowError};

pub(crate) async fn run(context: &AppContext) -> Result<(), String> {
    let orders = match context.orders.history().await {
        Ok(orders) => orders,
        Err(OrderFlowError::SessionExpired) => {
            return Err("session expired; log in again with `satchel session login`".to_string());
        }
        Err(error) => return Err(format!("failed to load orders: {error}")),
    };

    if orders.is_empty() {
        println!("no orders yet");
        return Ok(());
    }

    for order in &orders {
        let status = order.status.as_deref().unwrap_or("unknown");

        print!("{}  {}  total {}", order.id, status, order.total_amount);
        if let Some(created_at) = order.created_at {
            print!("  placed {created_at}");
        }
        println!();

        for item in &order.items {
            println!("  {} x{} @ {}", item.name, item.quantity, item.price);
        }
    }

    Ok(())
}
