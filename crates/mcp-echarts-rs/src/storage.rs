//! Optional offloading of rendered PNGs to an S3-compatible object store
//! (MinIO in practice), so responses carry a URL instead of inline bytes.

use async_trait::async_trait;
use mcp_error_rs::{Error, Result};
use s3::{Bucket, Region, bucket_ops::BucketConfiguration, creds::Credentials};
use tracing::{debug, info};
use uuid::Uuid;

/// MinIO ignores the region, but the signature needs one.
const REGION: &str = "us-east-1";
const OBJECT_PREFIX: &str = "charts";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageConfig {
    pub endpoint: Option<String>,
    pub port: u16,
    pub use_ssl: bool,
    pub access_key: Option<String>,
    pub secret_key: Option<String>,
    pub bucket: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            port: 9000,
            use_ssl: false,
            access_key: None,
            secret_key: None,
            bucket: "mcp-echarts".to_string(),
        }
    }
}

impl StorageConfig {
    /// Offloading is on only when an endpoint and both keys are present.
    pub fn is_configured(&self) -> bool {
        let present = |v: &Option<String>| v.as_deref().is_some_and(|s| !s.is_empty());
        present(&self.endpoint) && present(&self.access_key) && present(&self.secret_key)
    }

    fn base_url(&self) -> Option<String> {
        let scheme = if self.use_ssl { "https" } else { "http" };
        self.endpoint
            .as_deref()
            .map(|host| format!("{}://{}:{}", scheme, host, self.port))
    }
}

#[async_trait]
pub trait ChartStore: Send + Sync {
    /// Uploads `bytes` under a fresh object name and returns its public URL.
    async fn store(&self, bytes: &[u8], extension: &str, content_type: &str) -> Result<String>;
}

pub struct OssStore {
    bucket: Box<Bucket>,
    bucket_name: String,
    region: Region,
    credentials: Credentials,
    base_url: String,
}

impl OssStore {
    pub fn new(config: &StorageConfig) -> Result<Self> {
        let base_url = config
            .base_url()
            .ok_or_else(|| Error::Storage("object storage endpoint is not set".into()))?;

        let region = Region::Custom {
            region: REGION.to_string(),
            endpoint: base_url.clone(),
        };

        let credentials = Credentials::new(
            config.access_key.as_deref(),
            config.secret_key.as_deref(),
            None,
            None,
            None,
        )
        .map_err(|e| Error::Storage(format!("Credentials error: {}", e)))?;

        let bucket = Bucket::new(&config.bucket, region.clone(), credentials.clone())
            .map_err(|e| Error::Storage(format!("Bucket error: {}", e)))?
            .with_path_style();

        Ok(Self {
            bucket,
            bucket_name: config.bucket.clone(),
            region,
            credentials,
            base_url,
        })
    }

    async fn ensure_bucket(&self) -> Result<()> {
        let exists = self
            .bucket
            .exists()
            .await
            .map_err(|e| Error::Storage(format!("Bucket check failed: {}", e)))?;
        if exists {
            return Ok(());
        }

        info!(bucket = %self.bucket_name, "creating bucket");
        Bucket::create_with_path_style(
            &self.bucket_name,
            self.region.clone(),
            self.credentials.clone(),
            BucketConfiguration::default(),
        )
        .await
        .map_err(|e| Error::Storage(format!("Bucket creation failed: {}", e)))?;
        Ok(())
    }
}

/// `charts/{millis}-{uuid}.{ext}`
fn object_name(extension: &str) -> String {
    format!(
        "{}/{}-{}.{}",
        OBJECT_PREFIX,
        chrono::Utc::now().timestamp_millis(),
        Uuid::new_v4(),
        extension
    )
}

#[async_trait]
impl ChartStore for OssStore {
    async fn store(&self, bytes: &[u8], extension: &str, content_type: &str) -> Result<String> {
        self.ensure_bucket().await?;

        let object = object_name(extension);
        let response = self
            .bucket
            .put_object_with_content_type(&object, bytes, content_type)
            .await
            .map_err(|e| Error::Storage(format!("Upload error: {}", e)))?;

        let code = response.status_code();
        if !(200..300).contains(&code) {
            return Err(Error::Storage(format!("Upload failed, code: {}", code)));
        }

        let url = format!("{}/{}/{}", self.base_url, self.bucket_name, object);
        debug!(%url, size = bytes.len(), "chart uploaded");
        Ok(url)
    }
}
