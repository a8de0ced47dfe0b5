//! Nexis CLI - Drive the storefront cart, wishlist and checkout from a shell.
//!
//! State persists in the profile directory (`NEXIS_STORAGE_DIR`, default
//! `.nexis`) between invocations.
//!
//! # Usage
//!
//! ```bash
//! # Add a product to the cart
//! nexis cart add 7 "Mug" 12.50 --image /img/mug.jpg
//!
//! # Set a line's quantity
//! nexis cart set 7 3
//!
//! # Toggle a wishlist entry and list the wishlist against a catalog export
//! nexis wishlist toggle 7
//! nexis wishlist show --catalog catalog.json
//!
//! # Review and place the order
//! nexis checkout summary
//! nexis checkout place --first-name Ada --last-name Lovelace ...
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::sync::Arc;

use clap::{Parser, Subcommand};
use nexis_storefront::StorefrontState;
use nexis_storefront::config::StorefrontConfig;
use nexis_storefront::notify::{ToastQueue, TracingObserver};
use sentry::integrations::tracing as sentry_tracing;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

use commands::{CartAction, CheckoutAction, WishlistAction};

#[derive(Parser)]
#[command(name = "nexis")]
#[command(author, version, about = "Nexis storefront CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Inspect and change the cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
    /// Inspect and change the wishlist
    Wishlist {
        #[command(subcommand)]
        action: WishlistAction,
    },
    /// Review and place an order
    Checkout {
        #[command(subcommand)]
        action: CheckoutAction,
    },
}

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(config: &StorefrontConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_ref()?;

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            environment: config
                .sentry_environment
                .clone()
                .map(std::borrow::Cow::Owned),
            attach_stacktrace: true,
            ..Default::default()
        },
    ));

    tracing::info!("Sentry initialized");
    Some(guard)
}

/// Filter tracing events to Sentry event types.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR | tracing::Level::WARN => sentry_tracing::EventFilter::Event,
        tracing::Level::INFO | tracing::Level::DEBUG => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

fn main() {
    let config = match StorefrontConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing_subscriber::fmt::init();
            tracing::error!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    // Initialize Sentry (must be done before tracing subscriber)
    let _sentry_guard = init_sentry(&config);

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "nexis_storefront=info,nexis_cli=info".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();

    let cli = Cli::parse();

    let result = run(cli, &config);

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

fn run(cli: Cli, config: &StorefrontConfig) -> nexis_storefront::Result<()> {
    let state = StorefrontState::from_config(config);
    let toasts = Arc::new(ToastQueue::new());

    state.cart().subscribe(toasts.clone());
    state.cart().subscribe(Arc::new(TracingObserver));
    state.wishlist().subscribe(toasts.clone());
    state.wishlist().subscribe(Arc::new(TracingObserver));
    state.hydrate();

    let result = match cli.command {
        Commands::Cart { action } => commands::cart::run(&state, action),
        Commands::Wishlist { action } => commands::wishlist::run(&state, action),
        Commands::Checkout { action } => commands::checkout::run(&state, action),
    };

    commands::report_toasts(&toasts);
    result
}
