mod copy_table;
mod delete_table;
mod export_table;
mod import_csv;
mod list_tables;

pub use copy_table::{copy_table, CopyOptions, CopySummary};
pub use delete_table::delete_table;
pub use export_table::export_table;
pub use import_csv::{import_csv, ImportOptions, ImportSummary};
pub use list_tables::list_tables;

use crate::client::{self, Client, TableSpec, Throughput, Wait};
use crate::error::Result;

use tracing::info;

/// Creates the table unless it exists. Returns whether it was created.
async fn ensure_table(
    client: &dyn Client,
    spec: &TableSpec,
    throughput: Throughput,
    wait: Wait,
) -> Result<bool> {
    if client::table_exists(client, &spec.table_name).await? {
        info!("Table `{}` already exists", spec.table_name);
        return Ok(false);
    }

    info!("Creating table `{}`", spec.table_name);
    client.create_table(spec, throughput).await?;
    client::wait_until_active(client, &spec.table_name, wait).await?;
    Ok(true)
}
