use super::{
    Client, Item, KeyAttribute, ListTablesOutput, ScanOutput, TableInfo, TableSpec, Throughput,
};
use crate::config::Target;

use anyhow::Result;
use async_trait::async_trait;
use aws_sdk_dynamodb::{
    config::{Builder as DbConfigBuilder, Credentials, Region},
    error::SdkError,
    operation::describe_table::{DescribeTableError, DescribeTableOutput},
    types::{
        AttributeDefinition, KeySchemaElement, ProvisionedThroughput, Select, TableDescription,
    },
    Client as DbClient,
};
use tracing::{debug, info};

const LOCAL_CREDENTIALS_PROVIDER: &str = "database-assistant";

#[derive(Debug, Clone)]
pub struct DynamodbClient {
    db_client: DbClient,
}

impl DynamodbClient {
    pub async fn builder(target: &Target) -> DynamodbClientBuilder {
        DynamodbClientBuilder::new(target).await
    }
}

#[derive(Debug)]
pub struct DynamodbClientBuilder {
    db_builder: DbConfigBuilder,
}

impl DynamodbClientBuilder {
    pub async fn new(target: &Target) -> Self {
        let mut loader = aws_config::from_env();
        match target {
            Target::Local { host, region } => {
                // DynamoDB Local accepts any credentials, but requests must be signed.
                // Region and credentials are explicit so the provider chains never run.
                let credentials = Credentials::new(
                    "local",
                    "local",
                    None,
                    None,
                    LOCAL_CREDENTIALS_PROVIDER,
                );
                loader = loader
                    .endpoint_url(host)
                    .region(Region::new(region.clone()))
                    .credentials_provider(credentials);
            }
            Target::Cloud { region, profile } => {
                if let Some(profile) = profile {
                    loader = loader.profile_name(profile);
                }
                if let Some(region) = region {
                    loader = loader.region(Region::new(region.clone()));
                }
            }
        }

        let config = loader.load().await;
        Self {
            db_builder: DbConfigBuilder::from(&config),
        }
    }

    pub fn build(self) -> DynamodbClient {
        let db_config = self.db_builder.build();
        let db_client = DbClient::from_conf(db_config);
        DynamodbClient { db_client }
    }
}

#[async_trait]
impl Client for DynamodbClient {
    async fn list_tables(&self, exclusive_start: Option<String>) -> Result<ListTablesOutput> {
        self.db_client
            .list_tables()
            .set_exclusive_start_table_name(exclusive_start)
            .send()
            .await
            .map(|output| ListTablesOutput {
                table_names: output.table_names.unwrap_or_default(),
                last_evaluated_table_name: output.last_evaluated_table_name,
            })
            .map_err(anyhow::Error::from)
    }

    async fn describe_table(&self, table_name: &str) -> Result<Option<TableInfo>> {
        self.db_client
            .describe_table()
            .table_name(table_name)
            .send()
            .await
            .map(Some)
            .or_else(from_describe_table_err)?
            .and_then(|output: DescribeTableOutput| output.table)
            .map(into_table_info)
            .transpose()
    }

    async fn create_table(&self, spec: &TableSpec, throughput: Throughput) -> Result<()> {
        let key_schema = spec
            .keys
            .iter()
            .map(|key| {
                KeySchemaElement::builder()
                    .attribute_name(&key.name)
                    .key_type(key.key_type.clone())
                    .build()
            })
            .collect::<std::result::Result<Vec<_>, _>>()?;

        let attribute_definitions = spec
            .keys
            .iter()
            .map(|key| {
                AttributeDefinition::builder()
                    .attribute_name(&key.name)
                    .attribute_type(key.attribute_type.clone())
                    .build()
            })
            .collect::<std::result::Result<Vec<_>, _>>()?;

        let provisioned_throughput = ProvisionedThroughput::builder()
            .read_capacity_units(throughput.read_capacity_units)
            .write_capacity_units(throughput.write_capacity_units)
            .build()?;

        let output = self
            .db_client
            .create_table()
            .table_name(&spec.table_name)
            .set_key_schema(Some(key_schema))
            .set_attribute_definitions(Some(attribute_definitions))
            .provisioned_throughput(provisioned_throughput)
            .send()
            .await?;

        if let Some(description) = output.table_description {
            info!(
                "Created table `{}` ({:?})",
                spec.table_name, description.table_status
            );
        }
        Ok(())
    }

    async fn delete_table(&self, table_name: &str) -> Result<()> {
        self.db_client
            .delete_table()
            .table_name(table_name)
            .send()
            .await
            .map(|_| ())
            .map_err(anyhow::Error::from)
    }

    async fn put_item(&self, table_name: &str, item: Item) -> Result<()> {
        self.db_client
            .put_item()
            .table_name(table_name)
            .set_item(Some(item))
            .send()
            .await
            .map(|_| ())
            .map_err(anyhow::Error::from)
    }

    async fn scan(&self, table_name: &str, exclusive_start_key: Option<Item>) -> Result<ScanOutput> {
        self.db_client
            .scan()
            .table_name(table_name)
            .set_exclusive_start_key(exclusive_start_key)
            .send()
            .await
            .map(|output| ScanOutput {
                items: output.items.unwrap_or_default(),
                last_evaluated_key: output.last_evaluated_key,
            })
            .map_err(anyhow::Error::from)
    }

    async fn count(&self, table_name: &str) -> Result<usize> {
        let mut count: usize = 0;
        let mut exclusive_start_key: Option<Item> = None;

        loop {
            let output = self
                .db_client
                .scan()
                .table_name(table_name)
                .select(Select::Count)
                .set_exclusive_start_key(exclusive_start_key)
                .send()
                .await?;

            count += usize::try_from(output.count()).unwrap_or_default();
            debug!("Counted {count} items in `{table_name}` so far");

            match output.last_evaluated_key {
                Some(key) => exclusive_start_key = Some(key),
                None => return Ok(count),
            }
        }
    }
}

fn from_describe_table_err(
    err: SdkError<DescribeTableError>,
) -> Result<Option<DescribeTableOutput>> {
    match err {
        SdkError::ServiceError(e) => match e.into_err() {
            DescribeTableError::ResourceNotFoundException(_) => Ok(None),
            e => Err(anyhow::Error::from(e)),
        },
        _ => Err(anyhow::Error::from(err)),
    }
}

fn into_table_info(table: TableDescription) -> Result<TableInfo> {
    let TableDescription {
        table_name,
        key_schema,
        attribute_definitions,
        table_status,
        ..
    } = table;

    let attribute_definitions = attribute_definitions.unwrap_or_default();
    let keys = key_schema
        .unwrap_or_default()
        .into_iter()
        .map(|element| {
            let name = element.attribute_name().to_string();
            attribute_definitions
                .iter()
                .find(|d| d.attribute_name() == name)
                .map(|d| KeyAttribute {
                    name: name.clone(),
                    key_type: element.key_type().clone(),
                    attribute_type: d.attribute_type().clone(),
                })
                .ok_or(anyhow::anyhow!(
                    "Key `{name}` has no entry in `attribute_definitions`"
                ))
        })
        .collect::<Result<Vec<KeyAttribute>>>()?;

    Ok(TableInfo {
        spec: TableSpec {
            table_name: table_name.unwrap_or_default(),
            keys,
        },
        status: table_status,
    })
}
