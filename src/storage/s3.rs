//! AWS S3 state store.
//!
//! Keeps the last known release date in a single object so that stateless
//! Lambda invocations can share it.

use async_trait::async_trait;
use aws_sdk_s3::Client;
use aws_sdk_s3::primitives::ByteStream;

use crate::error::{AppError, Result};
use crate::models::ReleaseDate;
use crate::storage::{StateStore, decode_state, encode_state};

/// S3-backed state store.
#[derive(Clone)]
pub struct S3StateStore {
    client: Client,
    bucket: String,
    key: String,
}

impl S3StateStore {
    /// Create a new S3 state store.
    pub fn new(client: Client, bucket: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            client,
            bucket: bucket.into(),
            key: key.into(),
        }
    }

    /// Create the store using the default AWS credential chain.
    pub async fn from_env(bucket: impl Into<String>, key: impl Into<String>) -> Result<Self> {
        let config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
        let client = Client::new(&config);
        Ok(Self::new(client, bucket, key))
    }

    /// Read the object, returning None if the key does not exist.
    async fn read_string(&self) -> Result<Option<String>> {
        let result = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(&self.key)
            .send()
            .await;

        match result {
            Ok(output) => {
                let bytes = output
                    .body
                    .collect()
                    .await
                    .map_err(|e| AppError::S3(e.to_string()))?;
                let content = String::from_utf8(bytes.into_bytes().to_vec()).map_err(|e| {
                    AppError::S3(format!("{} is not valid UTF-8: {}", self.location(), e))
                })?;
                Ok(Some(content))
            }
            Err(err) => {
                let service_err = err.into_service_error();
                if service_err.is_no_such_key() {
                    log::info!("No existing state at {}", self.location());
                    Ok(None)
                } else {
                    Err(AppError::S3(service_err.to_string()))
                }
            }
        }
    }
}

#[async_trait]
impl StateStore for S3StateStore {
    async fn load_last_date(&self) -> Result<Option<ReleaseDate>> {
        match self.read_string().await? {
            Some(content) => decode_state(&content, &self.location()),
            None => Ok(None),
        }
    }

    async fn save_last_date(&self, date: ReleaseDate) -> Result<()> {
        let body = ByteStream::from(encode_state(date).into_bytes());

        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(&self.key)
            .body(body)
            .content_type("text/plain; charset=utf-8")
            .send()
            .await
            .map_err(|e| AppError::S3(e.to_string()))?;

        log::info!("Saved release date {} to {}", date, self.location());
        Ok(())
    }

    fn location(&self) -> String {
        format!("s3://{}/{}", self.bucket, self.key)
    }
}
