mod dynamodb;
#[cfg(test)]
mod mock;

use crate::error::{Error, Result};

use async_trait::async_trait;
use aws_sdk_dynamodb::types::{AttributeValue, KeyType, ScalarAttributeType, TableStatus};
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, info};

pub use dynamodb::{DynamodbClient, DynamodbClientBuilder};
#[cfg(test)]
pub use mock::MockClient;

pub type Item = HashMap<String, AttributeValue>;

#[derive(Debug, Clone, PartialEq)]
pub struct KeyAttribute {
    pub name: String,
    pub key_type: KeyType,
    pub attribute_type: ScalarAttributeType,
}

/// Key schema needed to create a table.
#[derive(Debug, Clone, PartialEq)]
pub struct TableSpec {
    pub table_name: String,
    pub keys: Vec<KeyAttribute>,
}

impl TableSpec {
    pub fn with_table_name<T: Into<String>>(self, table_name: T) -> Self {
        Self {
            table_name: table_name.into(),
            ..self
        }
    }

    pub fn key_names(&self) -> impl Iterator<Item = &str> {
        self.keys.iter().map(|k| k.name.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TableInfo {
    pub spec: TableSpec,
    pub status: Option<TableStatus>,
}

impl TableInfo {
    pub fn is_active(&self) -> bool {
        matches!(self.status, Some(TableStatus::Active))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Throughput {
    pub read_capacity_units: i64,
    pub write_capacity_units: i64,
}

impl Default for Throughput {
    fn default() -> Self {
        Self {
            read_capacity_units: 1,
            write_capacity_units: 1,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ListTablesOutput {
    pub table_names: Vec<String>,
    pub last_evaluated_table_name: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct ScanOutput {
    pub items: Vec<Item>,
    pub last_evaluated_key: Option<Item>,
}

#[async_trait]
pub trait Client: Send + Sync {
    async fn list_tables(&self, exclusive_start: Option<String>) -> anyhow::Result<ListTablesOutput>;
    /// Returns `None` when the table does not exist.
    async fn describe_table(&self, table_name: &str) -> anyhow::Result<Option<TableInfo>>;
    async fn create_table(&self, spec: &TableSpec, throughput: Throughput) -> anyhow::Result<()>;
    async fn delete_table(&self, table_name: &str) -> anyhow::Result<()>;
    async fn put_item(&self, table_name: &str, item: Item) -> anyhow::Result<()>;
    async fn scan(&self, table_name: &str, exclusive_start_key: Option<Item>) -> anyhow::Result<ScanOutput>;
    async fn count(&self, table_name: &str) -> anyhow::Result<usize>;
}

pub async fn list_all_tables(client: &dyn Client) -> anyhow::Result<Vec<String>> {
    let mut table_names: Vec<String> = vec![];
    let mut exclusive_start: Option<String> = None;

    loop {
        let mut output = client.list_tables(exclusive_start).await?;
        table_names.append(&mut output.table_names);

        match output.last_evaluated_table_name {
            Some(name) => exclusive_start = Some(name),
            None => return Ok(table_names),
        }
    }
}

pub async fn scan_all(client: &dyn Client, table_name: &str) -> anyhow::Result<Vec<Item>> {
    let mut items: Vec<Item> = vec![];
    let mut exclusive_start_key: Option<Item> = None;

    loop {
        let mut output = client.scan(table_name, exclusive_start_key).await?;
        debug!("Scanned {} items from `{table_name}`", output.items.len());
        items.append(&mut output.items);

        match output.last_evaluated_key {
            Some(key) => exclusive_start_key = Some(key),
            None => return Ok(items),
        }
    }
}

pub async fn table_exists(client: &dyn Client, table_name: &str) -> anyhow::Result<bool> {
    client
        .describe_table(table_name)
        .await
        .map(|info| info.is_some())
}

#[derive(Debug, Clone, Copy)]
pub struct Wait {
    pub max_attempts: u32,
    pub delay: Duration,
}

impl Default for Wait {
    fn default() -> Self {
        Self {
            max_attempts: 60,
            delay: Duration::from_secs(2),
        }
    }
}

pub async fn wait_until_active(client: &dyn Client, table_name: &str, wait: Wait) -> Result<()> {
    for attempt in 1..=wait.max_attempts {
        if let Some(info) = client.describe_table(table_name).await? {
            if info.is_active() {
                info!("Table `{table_name}` is active");
                return Ok(());
            }
            debug!(
                "Table `{table_name}` is {:?} (attempt {attempt}/{})",
                info.status, wait.max_attempts
            );
        }
        if attempt < wait.max_attempts {
            tokio::time::sleep(wait.delay).await;
        }
    }

    Err(Error::TableActivationTimeout(table_name.into()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use itertools::Itertools;

    fn spec(table_name: &str) -> TableSpec {
        TableSpec {
            table_name: table_name.into(),
            keys: vec![KeyAttribute {
                name: "id".into(),
                key_type: KeyType::Hash,
                attribute_type: ScalarAttributeType::S,
            }],
        }
    }

    fn item(id: &str) -> Item {
        let mut item = HashMap::new();
        item.insert("id".to_string(), AttributeValue::S(id.into()));
        item
    }

    #[tokio::test]
    async fn it_lists_tables_across_pages() {
        let client = MockClient::new().with_page_size(2);
        for name in ["c", "a", "e", "b", "d"] {
            client.create_table(&spec(name), Throughput::default()).await.unwrap();
        }

        let tables = list_all_tables(&client).await.unwrap();
        assert_eq!(tables, vec!["a", "b", "c", "d", "e"]);
    }

    #[tokio::test]
    async fn it_scans_every_page() {
        let client = MockClient::new().with_page_size(2);
        client.create_table(&spec("People"), Throughput::default()).await.unwrap();
        for id in ["1", "2", "3", "4", "5"] {
            client.put_item("People", item(id)).await.unwrap();
        }

        let items = scan_all(&client, "People").await.unwrap();
        let ids = items
            .iter()
            .filter_map(|i| i.get("id"))
            .filter_map(|v| v.as_s().ok())
            .sorted()
            .collect::<Vec<&String>>();
        assert_eq!(ids, vec!["1", "2", "3", "4", "5"]);
    }

    #[tokio::test]
    async fn it_tells_whether_a_table_exists() {
        let client = MockClient::new();
        client.create_table(&spec("People"), Throughput::default()).await.unwrap();

        assert!(table_exists(&client, "People").await.unwrap());
        assert!(!table_exists(&client, "Users").await.unwrap());
    }

    #[tokio::test]
    async fn it_waits_until_the_table_is_active() {
        let client = MockClient::new().with_pending_activations(2);
        client.create_table(&spec("People"), Throughput::default()).await.unwrap();

        let wait = Wait {
            max_attempts: 5,
            delay: Duration::ZERO,
        };
        assert!(wait_until_active(&client, "People", wait).await.is_ok());
        assert_eq!(client.describe_calls(), 3);
    }

    #[tokio::test]
    async fn it_times_out_if_the_table_never_becomes_active() {
        let client = MockClient::new().with_pending_activations(10);
        client.create_table(&spec("People"), Throughput::default()).await.unwrap();

        let wait = Wait {
            max_attempts: 3,
            delay: Duration::ZERO,
        };
        let result = wait_until_active(&client, "People", wait).await;
        assert!(matches!(result, Err(Error::TableActivationTimeout(_))));
    }

    #[tokio::test]
    async fn it_does_not_sleep_after_the_last_attempt() {
        let client = MockClient::new().with_pending_activations(10);
        client.create_table(&spec("People"), Throughput::default()).await.unwrap();

        let wait = Wait {
            max_attempts: 1,
            delay: Duration::from_secs(3600),
        };
        let result = tokio::time::timeout(
            Duration::from_secs(1),
            wait_until_active(&client, "People", wait),
        )
        .await
        .unwrap();
        assert!(matches!(result, Err(Error::TableActivationTimeout(_))));
        assert_eq!(client.describe_calls(), 1);
    }
}
