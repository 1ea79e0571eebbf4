use crate::client::{self, Client};
use crate::error::{Error, Result};
use crate::json::write_items;
use crate::progress::Progress;

use std::path::Path;
use tracing::info;

/// Scans the whole table and writes it to `output` as a JSON array.
/// Returns the number of exported items.
pub async fn export_table(
    client: &dyn Client,
    table_name: &str,
    output: &Path,
    progress: Progress,
) -> Result<usize> {
    if !client::table_exists(client, table_name).await? {
        return Err(Error::TableNotFound(table_name.into()));
    }

    let spinner = progress.spinner(&format!("Scanning {table_name}"));
    let items = client::scan_all(client, table_name).await?;
    spinner.set_position(items.len() as u64);
    spinner.finish();

    let count = items.len();
    write_items(output, items)?;
    info!(
        "Exported {count} items from `{table_name}` to {}",
        output.to_string_lossy()
    );

    Ok(count)
}
