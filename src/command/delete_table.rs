use crate::client::{self, Client};
use crate::error::{Error, Result};

use tracing::info;

pub async fn delete_table(client: &dyn Client, table_name: &str) -> Result<()> {
    if !client::table_exists(client, table_name).await? {
        return Err(Error::TableNotFound(table_name.into()));
    }

    client.delete_table(table_name).await?;
    info!("Deleted table `{table_name}`");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::{KeyAttribute, MockClient, TableSpec, Throughput};
    use aws_sdk_dynamodb::types::{KeyType, ScalarAttributeType};

    #[tokio::test]
    async fn it_deletes_the_table() {
        let client = MockClient::new();
        let spec = TableSpec {
            table_name: "People".into(),
            keys: vec![KeyAttribute {
                name: "id".into(),
                key_type: KeyType::Hash,
                attribute_type: ScalarAttributeType::S,
            }],
        };
        client.create_table(&spec, Throughput::default()).await.unwrap();

        assert!(delete_table(&client, "People").await.is_ok());
        assert!(client.spec("People").is_none());
    }

    #[tokio::test]
    async fn it_returns_err_if_the_table_does_not_exist() {
        let client = MockClient::new();
        let result = delete_table(&client, "People").await;
        assert_eq!(result.unwrap_err().to_string(), "Table `People` does not exist");
    }
}
