//! Shopfront CLI - Cart, login and backend access from the terminal.
//!
//! # Usage
//!
//! ```bash
//! # Add a product to the cart (looked up on the backend)
//! sf cart add 42 --size M --color Black
//!
//! # Add a product without a backend lookup
//! sf cart add 42 --name "Linen Shirt" --price 39.50 --quantity 2
//!
//! # Show the cart and the checkout totals
//! sf cart list
//! sf cart summary --shipping express
//!
//! # Sign in with a one-time password
//! sf auth otp +15551234567
//! sf auth login +15551234567 123456
//!
//! # Raw backend access
//! sf api get /products/search -q q=linen
//!
//! # Place the order
//! sf checkout --first-name Ada --last-name Lovelace --address "1 Main St" \
//!     --city Springfield --state IL --zip-code 62701 --phone 5551234567
//! ```
//!
//! # Commands
//!
//! - `cart` - List and change the local cart
//! - `auth` - Request an OTP, log in and out, check the session
//! - `api` - Send a GET request through the authenticated client
//! - `checkout` - Submit the cart as an order

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use shopfront_client::{ClientConfig, ClientState};
use shopfront_core::ShippingMethod;
use tracing_subscriber::EnvFilter;

mod commands;

const DEFAULT_LOG_FILTER: &str = "shopfront_client=info,shopfront_cli=info";

#[derive(Parser)]
#[command(name = "sf")]
#[command(author, version, about = "Shopfront storefront CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage the local cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
    /// Manage the login session
    Auth {
        #[command(subcommand)]
        action: AuthAction,
    },
    /// Call the backend directly
    Api {
        #[command(subcommand)]
        action: ApiAction,
    },
    /// Place an order for the cart contents
    Checkout(commands::checkout::CheckoutArgs),
}

#[derive(Subcommand)]
enum CartAction {
    /// Show cart lines
    List,
    /// Add a product
    Add(commands::cart::AddArgs),
    /// Set the quantity of a line (0 removes it)
    Update {
        /// Line ID (or a unique prefix of it)
        line: String,
        quantity: u32,
    },
    /// Remove a line
    Remove {
        /// Line ID (or a unique prefix of it)
        line: String,
    },
    /// Empty the cart
    Clear,
    /// Show subtotal, shipping, tax and total
    Summary {
        /// Shipping method (`standard`, `express`, `overnight`)
        #[arg(short, long, default_value = "standard")]
        shipping: ShippingMethod,
    },
}

#[derive(Subcommand)]
enum AuthAction {
    /// Request a one-time password
    Otp { phone_number: String },
    /// Log in with a phone number and one-time password
    Login { phone_number: String, otp: String },
    /// Forget the stored token
    Logout,
    /// Verify the stored token with the backend
    Status,
}

#[derive(Subcommand)]
enum ApiAction {
    /// GET a path relative to the API base URL
    Get {
        path: String,

        /// Query parameter as `key=value` (repeatable)
        #[arg(short, long = "query")]
        query: Vec<String>,
    },
}

#[tokio::main]
async fn main() {
    init_tracing();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let config = ClientConfig::from_env()?;
    let state = ClientState::new(config)?;

    match cli.command {
        Commands::Cart { action } => match action {
            CartAction::List => commands::cart::list(&state),
            CartAction::Add(args) => commands::cart::add(&state, args).await?,
            CartAction::Update { line, quantity } => {
                commands::cart::update(&state, &line, quantity)?;
            }
            CartAction::Remove { line } => commands::cart::remove(&state, &line)?,
            CartAction::Clear => commands::cart::clear(&state),
            CartAction::Summary { shipping } => commands::cart::summary(&state, shipping),
        },
        Commands::Auth { action } => match action {
            AuthAction::Otp { phone_number } => {
                commands::auth::send_otp(&state, &phone_number).await?;
            }
            AuthAction::Login { phone_number, otp } => {
                commands::auth::login(&state, &phone_number, &otp).await?;
            }
            AuthAction::Logout => commands::auth::logout(&state)?,
            AuthAction::Status => commands::auth::status(&state).await?,
        },
        Commands::Api { action } => match action {
            ApiAction::Get { path, query } => commands::api::get(&state, &path, &query).await?,
        },
        Commands::Checkout(args) => commands::checkout::place(&state, args).await?,
    }
    Ok(())
}
