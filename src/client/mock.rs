use super::{Client, Item, ListTablesOutput, ScanOutput, TableInfo, TableSpec, Throughput};

use anyhow::Result;
use async_trait::async_trait;
use aws_sdk_dynamodb::types::TableStatus;
use std::collections::BTreeMap;
use std::sync::Mutex;

#[derive(Debug)]
struct MockTable {
    spec: TableSpec,
    items: Vec<Item>,
    pending_activations: usize,
}

impl MockTable {
    fn key_of(&self, item: &Item) -> Result<Item> {
        self.spec
            .key_names()
            .map(|name| {
                item.get(name)
                    .map(|value| (name.to_string(), value.clone()))
                    .ok_or(anyhow::anyhow!("Missing key attribute `{name}`"))
            })
            .collect()
    }
}

/// In-memory stand-in for a DynamoDB service.
#[derive(Debug)]
pub struct MockClient {
    tables: Mutex<BTreeMap<String, MockTable>>,
    page_size: usize,
    pending_activations: usize,
    describe_calls: Mutex<usize>,
}

impl Default for MockClient {
    fn default() -> Self {
        Self::new()
    }
}

impl MockClient {
    pub fn new() -> Self {
        Self {
            tables: Mutex::new(BTreeMap::new()),
            page_size: 100,
            pending_activations: 0,
            describe_calls: Mutex::new(0),
        }
    }

    pub fn with_page_size(self, page_size: usize) -> Self {
        Self { page_size, ..self }
    }

    /// Newly created tables report `CREATING` for this many describe calls.
    pub fn with_pending_activations(self, pending_activations: usize) -> Self {
        Self {
            pending_activations,
            ..self
        }
    }

    pub fn describe_calls(&self) -> usize {
        *self.describe_calls.lock().unwrap()
    }

    pub fn items(&self, table_name: &str) -> Vec<Item> {
        self.tables
            .lock()
            .unwrap()
            .get(table_name)
            .map(|t| t.items.clone())
            .unwrap_or_default()
    }

    pub fn spec(&self, table_name: &str) -> Option<TableSpec> {
        self.tables
            .lock()
            .unwrap()
            .get(table_name)
            .map(|t| t.spec.clone())
    }
}

#[async_trait]
impl Client for MockClient {
    async fn list_tables(&self, exclusive_start: Option<String>) -> Result<ListTablesOutput> {
        let tables = self.tables.lock().unwrap();
        let mut names = tables
            .keys()
            .filter(|name| match &exclusive_start {
                Some(start) => *name > start,
                None => true,
            })
            .cloned();

        let table_names: Vec<String> = names.by_ref().take(self.page_size).collect();
        let last_evaluated_table_name = match names.next() {
            Some(_) => table_names.last().cloned(),
            None => None,
        };

        Ok(ListTablesOutput {
            table_names,
            last_evaluated_table_name,
        })
    }

    async fn describe_table(&self, table_name: &str) -> Result<Option<TableInfo>> {
        *self.describe_calls.lock().unwrap() += 1;

        let mut tables = self.tables.lock().unwrap();
        Ok(tables.get_mut(table_name).map(|table| {
            let status = if table.pending_activations > 0 {
                table.pending_activations -= 1;
                TableStatus::Creating
            } else {
                TableStatus::Active
            };
            TableInfo {
                spec: table.spec.clone(),
                status: Some(status),
            }
        }))
    }

    async fn create_table(&self, spec: &TableSpec, _throughput: Throughput) -> Result<()> {
        let mut tables = self.tables.lock().unwrap();
        if tables.contains_key(&spec.table_name) {
            return Err(anyhow::anyhow!(
                "ResourceInUseException: Table already exists: {}",
                spec.table_name
            ));
        }

        tables.insert(
            spec.table_name.clone(),
            MockTable {
                spec: spec.clone(),
                items: vec![],
                pending_activations: self.pending_activations,
            },
        );
        Ok(())
    }

    async fn delete_table(&self, table_name: &str) -> Result<()> {
        self.tables
            .lock()
            .unwrap()
            .remove(table_name)
            .map(|_| ())
            .ok_or(anyhow::anyhow!(
                "ResourceNotFoundException: Requested resource not found"
            ))
    }

    async fn put_item(&self, table_name: &str, item: Item) -> Result<()> {
        let mut tables = self.tables.lock().unwrap();
        let table = tables.get_mut(table_name).ok_or(anyhow::anyhow!(
            "ResourceNotFoundException: Requested resource not found"
        ))?;

        let key = table.key_of(&item)?;
        let existing = table
            .items
            .iter()
            .position(|i| table.key_of(i).map(|k| k == key).unwrap_or(false));

        match existing {
            Some(index) => table.items[index] = item,
            None => table.items.push(item),
        }
        Ok(())
    }

    async fn scan(&self, table_name: &str, exclusive_start_key: Option<Item>) -> Result<ScanOutput> {
        let tables = self.tables.lock().unwrap();
        let table = tables.get(table_name).ok_or(anyhow::anyhow!(
            "ResourceNotFoundException: Requested resource not found"
        ))?;

        let start = match exclusive_start_key {
            Some(key) => table
                .items
                .iter()
                .position(|i| table.key_of(i).map(|k| k == key).unwrap_or(false))
                .map(|index| index + 1)
                .unwrap_or(table.items.len()),
            None => 0,
        };

        let items: Vec<Item> = table
            .items
            .iter()
            .skip(start)
            .take(self.page_size)
            .cloned()
            .collect();

        let last_evaluated_key = if start + items.len() < table.items.len() {
            items.last().map(|i| table.key_of(i)).transpose()?
        } else {
            None
        };

        Ok(ScanOutput {
            items,
            last_evaluated_key,
        })
    }

    async fn count(&self, table_name: &str) -> Result<usize> {
        self.tables
            .lock()
            .unwrap()
            .get(table_name)
            .map(|t| t.items.len())
            .ok_or(anyhow::anyhow!(
                "ResourceNotFoundException: Requested resource not found"
            ))
    }
}
