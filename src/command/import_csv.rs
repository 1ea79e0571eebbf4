use super::ensure_table;
use crate::client::{Client, Item, Throughput, Wait};
use crate::csv_parser::parse_csv;
use crate::error::{Error, Result};
use crate::model::{Inference, Model};
use crate::progress::Progress;

use std::path::Path;
use tracing::info;

#[derive(Debug, Clone, Copy, Default)]
pub struct ImportOptions {
    pub throughput: Throughput,
    pub inference: Inference,
    pub wait: Wait,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportSummary {
    pub written: usize,
    /// Item count of the table after the import.
    pub total: usize,
    pub created: bool,
}

/// Imports every CSV row into `table_name`, creating the table from the first row.
///
/// All rows are converted before anything is written, so a bad row leaves the
/// table untouched.
pub async fn import_csv(
    client: &dyn Client,
    csv_file: &Path,
    table_name: &str,
    options: ImportOptions,
    progress: Progress,
) -> Result<ImportSummary> {
    let records = parse_csv(csv_file)?;
    let sample = records
        .first()
        .ok_or_else(|| Error::EmptyCsv(csv_file.to_path_buf()))?;

    let model = Model::from_sample(table_name, sample, options.inference)?;
    let items = records
        .iter()
        .enumerate()
        .map(|(index, record)| model.to_item(record, index + 1))
        .collect::<Result<Vec<Item>>>()?;

    let created = ensure_table(client, &model.table_spec(), options.throughput, options.wait).await?;

    let bar = progress.bar(items.len(), table_name);
    let mut written: usize = 0;
    for item in items {
        client.put_item(table_name, item).await?;
        written += 1;
        bar.inc(1);
    }
    bar.finish();

    let total = client.count(table_name).await?;
    info!("Wrote {written} rows into `{table_name}`");

    Ok(ImportSummary {
        written,
        total,
        created,
    })
}
