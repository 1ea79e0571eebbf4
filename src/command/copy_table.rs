use super::ensure_table;
use crate::client::{Client, Item, Throughput, Wait};
use crate::error::{Error, Result};
use crate::progress::Progress;

use tracing::{debug, info};

#[derive(Debug, Clone, Default)]
pub struct CopyOptions {
    /// Name of the table on the target; defaults to the source table name.
    pub target_table: Option<String>,
    pub throughput: Throughput,
    pub wait: Wait,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CopySummary {
    pub target_table: String,
    pub copied: usize,
    pub created: bool,
}

/// Copies every item of `table_name` on `source` into `target`, page by page.
pub async fn copy_table(
    source: &dyn Client,
    target: &dyn Client,
    table_name: &str,
    options: CopyOptions,
    progress: Progress,
) -> Result<CopySummary> {
    let info = source
        .describe_table(table_name)
        .await?
        .ok_or_else(|| Error::TableNotFound(table_name.into()))?;

    let target_table = options
        .target_table
        .unwrap_or_else(|| table_name.to_string());
    let spec = info.spec.with_table_name(&target_table);
    let created = ensure_table(target, &spec, options.throughput, options.wait).await?;

    let spinner = progress.spinner(&format!("Copying {table_name}"));
    let mut copied: usize = 0;
    let mut exclusive_start_key: Option<Item> = None;

    loop {
        let output = source.scan(table_name, exclusive_start_key).await?;
        debug!("Copying page of {} items", output.items.len());

        for item in output.items {
            target.put_item(&target_table, item).await?;
            copied += 1;
            spinner.inc(1);
        }

        match output.last_evaluated_key {
            Some(key) => exclusive_start_key = Some(key),
            None => break,
        }
    }
    spinner.finish();

    info!("Copied {copied} items from `{table_name}` into `{target_table}`");
    Ok(CopySummary {
        target_table,
        copied,
        created,
    })
}
