//! Autumn CLI - customer lookups against the Autumn billing API.
//!
//! Reads `AUTUMN_SECRET_KEY` from the environment (or a `.env` file).

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use autumn_client::{
    AutumnClient, ClientConfig, CustomerData, CustomerExpand, CustomerId, ListCustomersParams,
};

mod render;

#[derive(Debug, Parser)]
#[command(name = "autumn", version, about = "Manage Autumn billing customers")]
struct Cli {
    /// API base URL, including the version prefix.
    #[arg(long, global = true, env = "AUTUMN_BASE_URL")]
    base_url: Option<String>,

    /// Pin the API version sent in `x-api-version`.
    #[arg(long, global = true, env = "AUTUMN_API_VERSION")]
    api_version: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Fetch a customer, creating it if it does not exist.
    GetOrCreate {
        /// Customer ID.
        customer_id: CustomerId,
        /// Name to use if the customer is created.
        #[arg(long)]
        name: Option<String>,
        /// Email to use if the customer is created.
        #[arg(long)]
        email: Option<String>,
        /// Device fingerprint to use if the customer is created.
        #[arg(long)]
        fingerprint: Option<String>,
    },
    /// Fetch a customer.
    Get {
        /// Customer ID.
        customer_id: CustomerId,
        /// Related data to include (comma separated).
        #[arg(long, value_delimiter = ',')]
        expand: Vec<CustomerExpand>,
    },
    /// List customers.
    List {
        /// Page size (max 100).
        #[arg(long)]
        limit: Option<u32>,
        /// Number of customers to skip.
        #[arg(long)]
        offset: Option<u32>,
    },
    /// Delete a customer.
    Delete {
        /// Customer ID.
        customer_id: CustomerId,
        /// Also delete the linked Stripe customer.
        #[arg(long)]
        delete_in_stripe: bool,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    // Initialize tracing; stdout is reserved for command output
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn,autumn=info,autumn_client=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let mut config = ClientConfig::from_env()?;
    if let Some(base_url) = cli.base_url {
        config = config.with_base_url(base_url);
    }
    if let Some(version) = cli.api_version {
        config = config.with_api_version(version);
    }
    tracing::debug!(?config, "Configuration loaded");

    let client = AutumnClient::from_config(config)?;
    let customers = client.customers();

    match cli.command {
        Command::GetOrCreate {
            customer_id,
            name,
            email,
            fingerprint,
        } => {
            let data = CustomerData {
                name,
                email,
                fingerprint,
                metadata: None,
            };
            let outcome = customers.get_or_create(&customer_id, Some(data)).await?;
            for line in render::get_or_create_lines(&outcome)? {
                println!("{line}");
            }
        }
        Command::Get {
            customer_id,
            expand,
        } => {
            let customer = customers.get(&customer_id, &expand).await?;
            println!("{}", serde_json::to_string_pretty(&customer)?);
        }
        Command::List { limit, offset } => {
            let page = customers.list(ListCustomersParams { limit, offset }).await?;
            for line in render::customer_list_lines(&page) {
                println!("{line}");
            }
        }
        Command::Delete {
            customer_id,
            delete_in_stripe,
        } => {
            let customer = customers.delete(&customer_id, delete_in_stripe).await?;
            println!("Deleted {}", render::customer_summary(&customer));
        }
    }

    Ok(())
}
