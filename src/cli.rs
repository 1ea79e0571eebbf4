use crate::client::{DynamodbClient, Throughput, Wait};
use crate::command::{self, CopyOptions, ImportOptions};
use crate::config::{Config, Target};
use crate::error::Error;
use crate::model::Inference;
use crate::progress::Progress;
use crate::{ENV_AWS_PROFILE, ENV_AWS_REGION, ENV_CONFIG_PATH, ENV_DB_HOST, ENV_DB_REGION};

use anyhow::Result;
use clap::Parser;
use dialoguer::Confirm;
use std::path::PathBuf;
use tracing::{info, Level};

/// Import, export and copy DynamoDB tables
#[derive(Debug, Parser)]
#[command(name = "database-assistant", version, long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub global: Global,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Clone, clap::Args)]
pub struct Global {
    /// YAML file with default hosts, regions and output directory
    #[arg(long, global = true, env = ENV_CONFIG_PATH, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Enable debug logs
    #[arg(long, global = true, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Only print errors and results
    #[arg(long, global = true)]
    pub quiet: bool,
}

impl Global {
    pub fn log_level(&self) -> Level {
        if self.verbose {
            Level::DEBUG
        } else if self.quiet {
            Level::ERROR
        } else {
            Level::WARN
        }
    }
}

#[derive(Debug, clap::Subcommand)]
pub enum Commands {
    /// Work with DynamoDB tables
    Dynamodb(DynamodbCommand),
}

#[derive(Debug, clap::Parser)]
pub struct DynamodbCommand {
    #[command(subcommand)]
    pub action: DynamodbAction,
}

#[derive(Debug, clap::Subcommand)]
pub enum DynamodbAction {
    /// Export a cloud table to a JSON file
    GetData(GetDataCommand),

    /// Copy a cloud table into the local instance
    ImportFromCloudToLocal(CopyCommand),

    /// Commands against the local instance
    Local(LocalCommand),
}

#[derive(Debug, clap::Parser)]
pub struct LocalCommand {
    #[command(subcommand)]
    pub action: LocalAction,
}

#[derive(Debug, clap::Subcommand)]
pub enum LocalAction {
    /// Delete a local table
    DeleteTable(DeleteTableCommand),

    /// List local tables
    ListTables(ListTablesCommand),

    /// Export a local table to a JSON file
    GetData(LocalGetDataCommand),

    /// Import a CSV file into a local table
    ImportCsv(ImportCsvCommand),
}

#[derive(Debug, Clone, clap::Args)]
pub struct LocalArgs {
    /// Endpoint of the local instance
    #[arg(long, env = ENV_DB_HOST)]
    pub host: Option<String>,

    /// Region of the local instance
    #[arg(long, env = ENV_DB_REGION)]
    pub region: Option<String>,
}

#[derive(Debug, Clone, clap::Args)]
pub struct CloudArgs {
    /// AWS region of the cloud table
    #[arg(long, env = ENV_AWS_REGION)]
    pub region: Option<String>,

    /// AWS profile used for credentials
    #[arg(long, env = ENV_AWS_PROFILE)]
    pub profile: Option<String>,
}

#[derive(Debug, clap::Parser)]
pub struct GetDataCommand {
    pub table_name: String,

    /// Output file, `<TABLE_NAME>.json` by default
    #[arg(long, short)]
    pub output: Option<PathBuf>,

    #[command(flatten)]
    pub cloud: CloudArgs,
}

#[derive(Debug, clap::Parser)]
pub struct LocalGetDataCommand {
    pub table_name: String,

    /// Output file, `<TABLE_NAME>.json` by default
    #[arg(long, short)]
    pub output: Option<PathBuf>,

    #[command(flatten)]
    pub local: LocalArgs,
}

#[derive(Debug, clap::Parser)]
pub struct ListTablesCommand {
    #[command(flatten)]
    pub local: LocalArgs,
}

#[derive(Debug, clap::Parser)]
pub struct DeleteTableCommand {
    pub table_name: String,

    /// Skip the confirmation prompt
    #[arg(long, short)]
    pub yes: bool,

    #[command(flatten)]
    pub local: LocalArgs,
}

#[derive(Debug, clap::Parser)]
pub struct ImportCsvCommand {
    pub csv_file: PathBuf,

    pub table_name: String,

    /// Endpoint of the local instance
    #[arg(env = ENV_DB_HOST)]
    pub host: Option<String>,

    /// Region of the local instance
    #[arg(env = ENV_DB_REGION)]
    pub region: Option<String>,

    /// Read capacity units when the table is created
    #[arg(long, default_value_t = 1)]
    pub read_capacity: i64,

    /// Write capacity units when the table is created
    #[arg(long, default_value_t = 1)]
    pub write_capacity: i64,

    /// Store every cell as a string instead of inferring types
    #[arg(long)]
    pub raw_strings: bool,
}

#[derive(Debug, clap::Parser)]
#[command(long_about = "Copy a cloud table into the local instance.

The local table is created with the key schema of the cloud table when it
does not exist yet. Items are copied page by page with one PutItem each.")]
pub struct CopyCommand {
    pub table_name: String,

    /// Name of the local table, the cloud table name by default
    #[arg(long)]
    pub target_table: Option<String>,

    /// Endpoint of the local instance
    #[arg(long, env = ENV_DB_HOST)]
    pub host: Option<String>,

    /// Region of the local instance
    #[arg(long, env = ENV_DB_REGION)]
    pub local_region: Option<String>,

    #[command(flatten)]
    pub cloud: CloudArgs,
}

pub async fn run(cli: Cli) -> Result<()> {
    let config = Config::new(cli.global.config.as_ref());
    let progress = Progress::new(cli.global.quiet);

    match cli.command {
        Commands::Dynamodb(cmd) => match cmd.action {
            DynamodbAction::GetData(cmd) => {
                let target = config.cloud_target(cmd.cloud.region, cmd.cloud.profile);
                let output = config.output_path(&cmd.table_name, cmd.output);
                export(&target, &cmd.table_name, output, progress).await
            }
            DynamodbAction::ImportFromCloudToLocal(cmd) => copy(&config, cmd, progress).await,
            DynamodbAction::Local(cmd) => run_local(&config, cmd.action, progress).await,
        },
    }
}

async fn run_local(config: &Config, action: LocalAction, progress: Progress) -> Result<()> {
    match action {
        LocalAction::DeleteTable(cmd) => {
            let target = config.local_target(cmd.local.host, cmd.local.region);
            if !cmd.yes {
                let confirmed = Confirm::new()
                    .with_prompt(format!(
                        "Delete table `{}` on {target}? ALL DATA WILL BE LOST",
                        cmd.table_name
                    ))
                    .default(false)
                    .interact()?;
                if !confirmed {
                    return Err(Error::UserCancelled.into());
                }
            }

            let client = connect(&target).await;
            command::delete_table(&client, &cmd.table_name).await?;
            println!("Deleted table {}", cmd.table_name);
        }
        LocalAction::ListTables(cmd) => {
            let target = config.local_target(cmd.local.host, cmd.local.region);
            let client = connect(&target).await;
            for table_name in command::list_tables(&client).await? {
                println!("{table_name}");
            }
        }
        LocalAction::GetData(cmd) => {
            let target = config.local_target(cmd.local.host, cmd.local.region);
            let output = config.output_path(&cmd.table_name, cmd.output);
            export(&target, &cmd.table_name, output, progress).await?;
        }
        LocalAction::ImportCsv(cmd) => {
            let target = config.local_target(cmd.host, cmd.region);
            let client = connect(&target).await;
            let options = ImportOptions {
                throughput: Throughput {
                    read_capacity_units: cmd.read_capacity,
                    write_capacity_units: cmd.write_capacity,
                },
                inference: if cmd.raw_strings {
                    Inference::Raw
                } else {
                    Inference::Infer
                },
                wait: Wait::default(),
            };

            let summary =
                command::import_csv(&client, &cmd.csv_file, &cmd.table_name, options, progress)
                    .await?;
            println!("Imported {} items", summary.total);
        }
    }

    Ok(())
}

async fn export(target: &Target, table_name: &str, output: PathBuf, progress: Progress) -> Result<()> {
    let client = connect(target).await;
    let count = command::export_table(&client, table_name, &output, progress).await?;
    println!("Exported {count} items to {}", output.to_string_lossy());
    Ok(())
}

async fn copy(config: &Config, cmd: CopyCommand, progress: Progress) -> Result<()> {
    let source = connect(&config.cloud_target(cmd.cloud.region, cmd.cloud.profile)).await;
    let target = connect(&config.local_target(cmd.host, cmd.local_region)).await;
    let options = CopyOptions {
        target_table: cmd.target_table,
        ..CopyOptions::default()
    };

    let summary = command::copy_table(&source, &target, &cmd.table_name, options, progress).await?;
    println!(
        "Copied {} items into local table {}",
        summary.copied, summary.target_table
    );
    Ok(())
}

async fn connect(target: &Target) -> DynamodbClient {
    info!("Target: {target}");
    DynamodbClient::builder(target).await.build()
}
