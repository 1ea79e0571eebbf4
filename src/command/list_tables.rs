use crate::client::{self, Client};
use crate::error::Result;

use tracing::debug;

pub async fn list_tables(client: &dyn Client) -> Result<Vec<String>> {
    let tables = client::list_all_tables(client).await?;
    debug!("Found {} tables", tables.len());
    Ok(tables)
}
