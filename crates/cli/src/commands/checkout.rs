//! Order placement command.

use clap::Args;
use shopfront_client::{ClientState, checkout};
use shopfront_core::{Price, ShippingAddress, ShippingMethod};

/// Arguments for `sf checkout`.
#[derive(Debug, Args)]
pub struct CheckoutArgs {
    #[arg(long)]
    pub first_name: String,

    #[arg(long)]
    pub last_name: String,

    /// Street address
    #[arg(long)]
    pub address: String,

    #[arg(long)]
    pub apartment: Option<String>,

    #[arg(long)]
    pub city: String,

    #[arg(long)]
    pub state: String,

    #[arg(long)]
    pub zip_code: String,

    #[arg(long, default_value = "US")]
    pub country: String,

    #[arg(long)]
    pub phone: String,

    /// Shipping method (`standard`, `express`, `overnight`)
    #[arg(short, long, default_value = "standard")]
    pub shipping: ShippingMethod,
}

impl From<CheckoutArgs> for ShippingAddress {
    fn from(args: CheckoutArgs) -> Self {
        Self {
            first_name: args.first_name,
            last_name: args.last_name,
            address: args.address,
            apartment: args.apartment,
            city: args.city,
            state: args.state,
            zip_code: args.zip_code,
            country: args.country,
            phone: args.phone,
        }
    }
}

/// Submit the cart as an order.
#[allow(clippy::print_stdout)]
pub async fn place(
    state: &ClientState,
    args: CheckoutArgs,
) -> Result<(), checkout::CheckoutError> {
    let method = args.shipping;
    let mut cart = state.cart();

    let placed =
        checkout::place_order(state.api(), &mut cart, args.into(), method, state.pricing()).await?;

    println!("Order placed successfully!");
    if let Some(order_id) = &placed.order_id {
        println!("Order ID: {order_id}");
    }
    println!("Total charged: {}", Price::usd(placed.summary.total).display());
    Ok(())
}
