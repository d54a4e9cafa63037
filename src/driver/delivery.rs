use std::path::{Path, PathBuf};
use std::time::Duration;

use aws_sdk_s3::config::timeout::TimeoutConfig;
use aws_sdk_s3::config::{Credentials, Region};
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::primitives::ByteStream;

use crate::calendar::{Error, ErrorKind};
use crate::config;

/// Where the batch job puts corrected feeds.
#[derive(Debug, Clone)]
pub enum Destination {
  Directory(PathBuf),
  Bucket {
    client: aws_sdk_s3::Client,
    bucket: String,
    prefix: String,
  },
}

impl Destination {
  /// # Errors
  /// Returns an error if a bucket is configured without access keys.
  pub fn new(delivery: &config::Delivery, timeout: Duration) -> Result<Self, Error> {
    match delivery {
      config::Delivery::Directory { path } => Ok(Self::Directory(path.clone())),
      config::Delivery::Bucket(bucket) => Ok(Self::Bucket {
        client: s3_client(bucket, timeout)?,
        bucket: bucket.bucket.clone(),
        prefix: bucket.prefix.clone(),
      }),
    }
  }

  /// Store `contents` under `key`.
  ///
  /// # Errors
  /// Returns an error if writing the file or the upload fails.
  pub async fn put(&self, key: &str, contents: &str) -> Result<(), Error> {
    match self {
      Self::Directory(dir) => {
        let path = dir.join(key);
        write_file(&path, contents)?;
        log::info!("Wrote {}", path.display());
      }
      Self::Bucket { client, bucket, prefix } => {
        let object_key = object_key(prefix, key);

        client
          .put_object()
          .bucket(bucket)
          .key(&object_key)
          .content_type("text/calendar; charset=utf-8")
          .body(ByteStream::from(contents.as_bytes().to_vec()))
          .send()
          .await
          .map_err(|e| Error::new(ErrorKind::Delivery, DisplayErrorContext(&e).to_string()))?;

        log::info!("Uploaded s3://{bucket}/{object_key}");
      }
    }

    Ok(())
  }
}

fn s3_client(bucket: &config::Bucket, timeout: Duration) -> Result<aws_sdk_s3::Client, Error> {
  let (Some(access_key_id), Some(secret_access_key)) = (&bucket.access_key_id, &bucket.secret_access_key) else {
    return Err(Error::new(
      ErrorKind::Delivery,
      format!("No access keys for bucket {}", bucket.bucket),
    ));
  };

  let credentials = Credentials::new(access_key_id, secret_access_key, None, None, "penncal-fixer");

  let mut builder = aws_sdk_s3::Config::builder()
    .credentials_provider(credentials)
    .region(Region::new(bucket.region.clone()))
    .timeout_config(TimeoutConfig::builder().operation_timeout(timeout).build())
    .behavior_version_latest();

  if let Some(endpoint) = &bucket.endpoint {
    builder = builder.endpoint_url(endpoint).force_path_style(true);
  }

  Ok(aws_sdk_s3::Client::from_conf(builder.build()))
}

fn write_file(path: &Path, contents: &str) -> Result<(), Error> {
  if let Some(parent) = path.parent() {
    std::fs::create_dir_all(parent)?;
  }

  std::fs::write(path, contents)?;

  Ok(())
}

fn object_key(prefix: &str, key: &str) -> String {
  if prefix.is_empty() || prefix.ends_with('/') {
    format!("{prefix}{key}")
  } else {
    format!("{prefix}/{key}")
  }
}

#[cfg(test)]
mod tests {
  use std::sync::{Arc, Mutex};

  use axum::extract::{Path as UrlPath, State};
  use axum::http::{header, HeaderMap};
  use axum::routing::put;

  use super::*;

  fn bucket(endpoint: Option<String>) -> config::Bucket {
    config::Bucket {
      bucket: "penncalfixer".to_owned(),
      region: "us-east-1".to_owned(),
      endpoint,
      prefix: "feeds".to_owned(),
      access_key_id: Some("uploader".to_owned()),
      secret_access_key_file: None,
      secret_access_key: Some("hunter2".to_owned()),
    }
  }

  #[tokio::test]
  async fn writes_into_directory() {
    let dir = tempfile::tempdir().unwrap();
    let destination = Destination::new(
      &config::Delivery::Directory { path: dir.path().join("feeds") },
      Duration::from_secs(1),
    )
    .unwrap();

    destination.put("upenn-ese.ics", "BEGIN:VCALENDAR\r\nEND:VCALENDAR\r\n").await.unwrap();

    assert_eq!(
      std::fs::read_to_string(dir.path().join("feeds/upenn-ese.ics")).unwrap(),
      "BEGIN:VCALENDAR\r\nEND:VCALENDAR\r\n"
    );
  }

  #[test]
  fn object_keys() {
    assert_eq!(object_key("", "upenn-cis.ics"), "upenn-cis.ics");
    assert_eq!(object_key("feeds", "upenn-cis.ics"), "feeds/upenn-cis.ics");
    assert_eq!(object_key("feeds/", "upenn-cis.ics"), "feeds/upenn-cis.ics");
  }

  #[test]
  fn bucket_needs_access_keys() {
    let mut bucket = bucket(None);
    bucket.secret_access_key = None;

    let error = Destination::new(&config::Delivery::Bucket(bucket), Duration::from_secs(1)).unwrap_err();

    assert_eq!(error.kind, ErrorKind::Delivery);
    assert_eq!(error.message, "No access keys for bucket penncalfixer");
  }

  type Uploads = Arc<Mutex<Vec<(String, String, String)>>>;

  async fn put_object(
    State(uploads): State<Uploads>,
    UrlPath((bucket, key)): UrlPath<(String, String)>,
    headers: HeaderMap,
    body: String,
  ) {
    let content_type = headers
      .get(header::CONTENT_TYPE)
      .and_then(|v| v.to_str().ok())
      .unwrap_or_default()
      .to_owned();

    uploads.lock().unwrap().push((format!("{bucket}/{key}"), content_type, body));
  }

  #[tokio::test(flavor = "multi_thread")]
  async fn uploads_to_bucket_endpoint() {
    let uploads = Uploads::default();
    let app = axum::Router::new()
      .route("/{bucket}/{*key}", put(put_object))
      .with_state(uploads.clone());
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let endpoint = format!("http://{}", listener.local_addr().unwrap());
    tokio::spawn(async move { axum::serve(listener, app).await.unwrap() });

    let destination = Destination::new(
      &config::Delivery::Bucket(bucket(Some(endpoint))),
      Duration::from_secs(5),
    )
    .unwrap();

    destination.put("upenn-ese.ics", "BEGIN:VCALENDAR\r\nEND:VCALENDAR\r\n").await.unwrap();

    let uploads = uploads.lock().unwrap();
    assert_eq!(uploads.len(), 1);
    assert_eq!(uploads[0].0, "penncalfixer/feeds/upenn-ese.ics");
    assert_eq!(uploads[0].1, "text/calendar; charset=utf-8");
    assert!(uploads[0].2.contains("BEGIN:VCALENDAR"));
  }

  #[tokio::test(flavor = "multi_thread")]
  async fn upload_failure_is_a_delivery_error() {
    let destination = Destination::new(
      &config::Delivery::Bucket(bucket(Some("http://127.0.0.1:9".to_owned()))),
      Duration::from_secs(1),
    )
    .unwrap();

    let error = destination.put("upenn-ese.ics", "BEGIN:VCALENDAR\r\n").await.unwrap_err();

    assert_eq!(error.kind, ErrorKind::Delivery);
  }
}
