use minio::s3::args::{BucketExistsArgs, MakeBucketArgs, PutObjectArgs, RemoveObjectArgs};
use minio::s3::client::{Client, ClientBuilder};
use minio::s3::creds::StaticProvider;
use minio::s3::http::BaseUrl;
use std::io::Cursor;
use tracing::{error, info, instrument, warn};

use crate::config::MinioConfig;

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Configuration error: {0}")]
    ConfigError(String),
    #[error("Connection error: {0}")]
    ConnectionError(String),
    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),
    #[error("Operation failed: {0}")]
    OperationError(String),
}

/// Object storage for uploaded menu images, backed by MinIO.
#[derive(Debug, Clone)]
pub struct ImageStorageService {
    client: Client,
    pub config: MinioConfig,
}

impl ImageStorageService {
    #[instrument(skip(config), fields(endpoint = %config.endpoint, bucket = %config.bucket_name))]
    pub async fn new(config: MinioConfig) -> Result<Self, StorageError> {
        info!("Initializing image storage service");
        config
            .validate()
            .map_err(|e| StorageError::ConfigError(e.to_string()))?;

        let base_url = config
            .get_endpoint_url()
            .parse::<BaseUrl>()
            .map_err(|e| StorageError::ConnectionError(format!("Invalid endpoint URL: {}", e)))?;

        let static_provider = StaticProvider::new(&config.access_key, &config.secret_key, None);
        let client = ClientBuilder::new(base_url)
            .provider(Some(Box::new(static_provider)))
            .build()
            .map_err(|e| StorageError::ConnectionError(format!("Client creation failed: {}", e)))?;

        let service = Self { client, config };
        service.ensure_bucket_exists().await?;
        info!("Image storage service initialized successfully");
        Ok(service)
    }

    #[instrument(skip(self))]
    async fn ensure_bucket_exists(&self) -> Result<(), StorageError> {
        let bucket_exists_args = BucketExistsArgs::new(&self.config.bucket_name)
            .map_err(|e| StorageError::InvalidArguments(e.to_string()))?;

        let exists = self
            .client
            .bucket_exists(&bucket_exists_args)
            .await
            .map_err(|e| StorageError::OperationError(format!("Bucket exists check failed: {}", e)))?;

        if exists {
            return Ok(());
        }

        warn!("Bucket '{}' does not exist, creating it", self.config.bucket_name);
        let make_bucket_args = MakeBucketArgs::new(&self.config.bucket_name)
            .map_err(|e| StorageError::InvalidArguments(e.to_string()))?;
        self.client
            .make_bucket(&make_bucket_args)
            .await
            .map_err(|e| StorageError::OperationError(format!("Bucket creation failed: {}", e)))?;
        Ok(())
    }

    /// Upload an image under the given object key.
    #[instrument(skip(self, data), fields(object_name = %object_name, size = data.len()))]
    pub async fn put_image(
        &self,
        object_name: &str,
        data: Vec<u8>,
        content_type: &str,
    ) -> Result<(), StorageError> {
        info!("Uploading object '{}' to bucket '{}'", object_name, self.config.bucket_name);

        let bucket_name = self.config.bucket_name.clone();
        let object_name_owned = object_name.to_string();
        let content_type_owned = content_type.to_string();
        let client = self.client.clone();

        // The minio put_object API takes a blocking reader
        tokio::task::spawn_blocking(move || {
            let mut reader = Cursor::new(data);
            let data_len = reader.get_ref().len();

            let mut args = PutObjectArgs::new(
                &bucket_name,
                &object_name_owned,
                &mut reader,
                Some(data_len),
                None,
            )
            .map_err(|e| StorageError::InvalidArguments(e.to_string()))?;
            args.content_type = &content_type_owned;

            futures::executor::block_on(client.put_object(&mut args))
                .map_err(|e| StorageError::OperationError(format!("Upload failed: {}", e)))?;
            Ok(())
        })
        .await
        .map_err(|e| {
            error!("Failed to join blocking task for put_image: {}", e);
            StorageError::OperationError(format!("Join error: {}", e))
        })??;

        info!("Successfully uploaded object '{}'", object_name);
        Ok(())
    }

    #[instrument(skip(self), fields(object_name = %object_name))]
    pub async fn remove_image(&self, object_name: &str) -> Result<(), StorageError> {
        let args = RemoveObjectArgs::new(&self.config.bucket_name, object_name)
            .map_err(|e| StorageError::InvalidArguments(e.to_string()))?;
        self.client
            .remove_object(&args)
            .await
            .map_err(|e| StorageError::OperationError(format!("Remove failed: {}", e)))?;
        Ok(())
    }

    /// Public URL for a stored object
    pub fn public_url(&self, object_name: &str) -> String {
        format!(
            "{}/{}/{}",
            self.config.links_prefix.trim_end_matches('/'),
            self.config.bucket_name,
            object_name
        )
    }
}
