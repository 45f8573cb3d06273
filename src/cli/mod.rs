pub mod api_client;
mod commands;
pub mod error;
mod utils;

#[cfg(test)]
mod utils_test;

use std::net::IpAddr;
use std::path::PathBuf;

use clap::{CommandFactory, Parser, Subcommand};
use miette::{IntoDiagnostic, Result};

use crate::cli::commands::PageParams;
use crate::cli::commands::property::CreatePropertyRequest;
use crate::cli::commands::unit::CreateUnitRequest;

#[derive(Parser)]
#[command(name = "estate")]
#[command(author, version, about = "Property management server and client", long_about = None)]
pub struct Cli {
    /// Override the API URL (default: ESTATE_API_URL env or http://localhost:3737)
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the REST API server
    Api {
        /// Host address to bind to
        #[arg(long, default_value = "0.0.0.0")]
        host: IpAddr,
        /// Port to listen on
        #[arg(short, long, default_value_t = 3737)]
        port: u16,
        /// Data directory (default: ESTATE_HOME or ~/.local/share/estate)
        #[arg(long, env = "ESTATE_HOME")]
        home: Option<PathBuf>,
        /// Increase log verbosity (-v info, -vv debug, -vvv trace)
        #[arg(short, long, action = clap::ArgAction::Count)]
        verbose: u8,
        /// Serve interactive API docs at /docs
        #[arg(long)]
        docs: bool,
    },
    /// Property commands
    Property {
        #[command(subcommand)]
        command: PropertyCommands,
    },
    /// Property unit commands
    Unit {
        #[command(subcommand)]
        command: UnitCommands,
    },
}

#[derive(clap::Args)]
struct PageArgs {
    #[arg(long)]
    limit: Option<u32>,
    #[arg(long)]
    offset: Option<u32>,
    /// Column to sort by
    #[arg(long)]
    sort: Option<String>,
    /// asc or desc
    #[arg(long)]
    order: Option<String>,
}

impl PageArgs {
    fn params(&self) -> PageParams<'_> {
        PageParams {
            limit: self.limit,
            offset: self.offset,
            sort: self.sort.as_deref(),
            order: self.order.as_deref(),
        }
    }
}

#[derive(Subcommand)]
enum PropertyCommands {
    /// List properties
    List {
        /// Only children of this grouping property
        #[arg(long)]
        parent: Option<String>,
        /// floor, building or multi-storey-apartment
        #[arg(long)]
        group_type: Option<String>,
        #[command(flatten)]
        page: PageArgs,
        /// Output format (table or json)
        #[arg(long, default_value = "table")]
        format: String,
    },
    /// Show a property
    Get {
        id: String,
        #[arg(long, default_value = "table")]
        format: String,
    },
    /// Create a property
    Create {
        name: String,
        #[arg(long)]
        group_type: Option<String>,
        /// Parent grouping property ID
        #[arg(long)]
        parent: Option<String>,
        #[arg(long, default_value = "")]
        address: String,
        /// Image file name, stored under property_images/
        #[arg(long)]
        image: Option<String>,
    },
    /// Delete a property with its units, ownerships, leases and transactions
    Delete {
        id: String,
        #[arg(long)]
        force: bool,
    },
}

#[derive(Subcommand)]
enum UnitCommands {
    /// List units
    List {
        #[arg(long)]
        property: Option<String>,
        /// apartment, studio, flat or plot
        #[arg(long)]
        housing_type: Option<String>,
        #[command(flatten)]
        page: PageArgs,
        #[arg(long, default_value = "table")]
        format: String,
    },
    /// Show a unit
    Get {
        id: String,
        #[arg(long, default_value = "table")]
        format: String,
    },
    /// Create a unit; without --property one is provisioned from the unit name
    Create {
        name: String,
        #[arg(long, default_value = "apartment")]
        housing_type: String,
        #[arg(long, default_value_t = 0)]
        area: i64,
        #[arg(long)]
        property: Option<String>,
        /// Image file name, stored under property_unit_images/
        #[arg(long)]
        image: Option<String>,
    },
    /// Delete a unit
    Delete {
        id: String,
        #[arg(long)]
        force: bool,
    },
}

pub async fn run() -> Result<()> {
    let cli = Cli::parse();

    let output = match cli.command {
        Some(Commands::Api {
            host,
            port,
            home,
            verbose,
            docs,
        }) => return commands::api::run(host, port, home, verbose, docs).await,
        Some(Commands::Property { command }) => {
            let api_client = api_client::ApiClient::new(cli.api_url);
            match command {
                PropertyCommands::List {
                    parent,
                    group_type,
                    page,
                    format,
                } => {
                    commands::property::list_properties(
                        &api_client,
                        parent.as_deref(),
                        group_type.as_deref(),
                        page.params(),
                        &format,
                    )
                    .await?
                }
                PropertyCommands::Get { id, format } => {
                    commands::property::get_property(&api_client, &id, &format).await?
                }
                PropertyCommands::Create {
                    name,
                    group_type,
                    parent,
                    address,
                    image,
                } => {
                    commands::property::create_property(
                        &api_client,
                        CreatePropertyRequest {
                            name,
                            group_type,
                            re_group_id: parent,
                            address_segment: address,
                            image,
                        },
                    )
                    .await?
                }
                PropertyCommands::Delete { id, force } => {
                    commands::property::delete_property(&api_client, &id, force).await?
                }
            }
        }
        Some(Commands::Unit { command }) => {
            let api_client = api_client::ApiClient::new(cli.api_url);
            match command {
                UnitCommands::List {
                    property,
                    housing_type,
                    page,
                    format,
                } => {
                    commands::unit::list_units(
                        &api_client,
                        property.as_deref(),
                        housing_type.as_deref(),
                        page.params(),
                        &format,
                    )
                    .await?
                }
                UnitCommands::Get { id, format } => {
                    commands::unit::get_unit(&api_client, &id, &format).await?
                }
                UnitCommands::Create {
                    name,
                    housing_type,
                    area,
                    property,
                    image,
                } => {
                    commands::unit::create_unit(
                        &api_client,
                        CreateUnitRequest {
                            unit_name: name,
                            housing_type,
                            area_sq_ft: area,
                            property_id: property,
                            image,
                        },
                    )
                    .await?
                }
                UnitCommands::Delete { id, force } => {
                    commands::unit::delete_unit(&api_client, &id, force).await?
                }
            }
        }
        None => {
            Cli::command().print_help().into_diagnostic()?;
            return Ok(());
        }
    };

    println!("{}", output);
    Ok(())
}
