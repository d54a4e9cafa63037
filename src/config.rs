use std::net::SocketAddr;
use std::path::PathBuf;

use url::Url;

use crate::calendar::{Timezone, TimezonePolicy};

#[derive(Debug, Default, serde::Deserialize)]
pub struct Config {
    #[serde(default)]
    pub export: Export,
    #[serde(default)]
    pub batch: Batch,
    #[serde(default)]
    pub server: Server,
}

#[derive(Clone, Debug, serde::Deserialize)]
pub struct Export {
    #[serde(default = "default_base_url")]
    pub base_url: Url,
    #[serde(default)]
    pub timezone: Timezone,
    #[serde(default)]
    pub timezone_policy: TimezonePolicy,
    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

impl Default for Export {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timezone: Timezone::default(),
            timezone_policy: TimezonePolicy::default(),
            timeout: default_timeout(),
        }
    }
}

#[derive(Clone, Debug, serde::Deserialize)]
pub struct Batch {
    #[serde(default = "default_school")]
    pub school: u32,
    #[serde(default = "default_showndays")]
    pub showndays: u32,
    #[serde(default = "default_feeds")]
    pub feeds: Vec<Feed>,
    #[serde(default)]
    pub delivery: Delivery,
}

impl Default for Batch {
    fn default() -> Self {
        Self {
            school: default_school(),
            showndays: default_showndays(),
            feeds: default_feeds(),
            delivery: Delivery::default(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Deserialize)]
pub struct Feed {
    pub owner: u32,
    pub key: String,
}

#[derive(Clone, Debug, serde::Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum Delivery {
    Directory { path: PathBuf },
    Bucket(Bucket),
}

impl Default for Delivery {
    fn default() -> Self {
        Self::Directory {
            path: PathBuf::from("."),
        }
    }
}

/// S3 compatible bucket. Keys missing here are taken from `AWS_ACCESS_KEY_ID` and
/// `AWS_SECRET_ACCESS_KEY`.
#[derive(Clone, serde::Deserialize)]
pub struct Bucket {
    pub bucket: String,
    #[serde(default = "default_region")]
    pub region: String,
    /// Custom endpoint for MinIO and friends, addressed path style.
    pub endpoint: Option<String>,
    #[serde(default)]
    pub prefix: String,
    pub access_key_id: Option<String>,
    pub secret_access_key_file: Option<PathBuf>,
    pub secret_access_key: Option<String>,
}

impl core::fmt::Debug for Bucket {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Bucket")
            .field("bucket", &self.bucket)
            .field("region", &self.region)
            .field("endpoint", &self.endpoint)
            .field("prefix", &self.prefix)
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key_file", &self.secret_access_key_file)
            .field("secret_access_key", &"<hidden>")
            .finish()
    }
}

#[derive(Clone, Debug, serde::Deserialize)]
pub struct Server {
    #[serde(default = "default_listen")]
    pub listen: SocketAddr,
    /// Where users reach this service, shown in the usage text.
    #[serde(default = "default_public_url")]
    pub public_url: Url,
}

impl Default for Server {
    fn default() -> Self {
        Self {
            listen: default_listen(),
            public_url: default_public_url(),
        }
    }
}

/// Loads the configuration, or the defaults when no file is given.
pub fn init(path: Option<PathBuf>) -> Result<Config, Box<dyn std::error::Error>> {
    let mut config: Config = match path {
        Some(path) => toml::from_str(&std::fs::read_to_string(path)?)?,
        None => Config::default(),
    };

    if let Delivery::Bucket(bucket) = &mut config.batch.delivery {
        if let Some(file) = &bucket.secret_access_key_file {
            bucket.secret_access_key = Some(std::fs::read_to_string(file)?.trim_end().to_owned());
        }

        if bucket.access_key_id.is_none() {
            bucket.access_key_id = std::env::var("AWS_ACCESS_KEY_ID").ok();
        }

        if bucket.secret_access_key.is_none() {
            bucket.secret_access_key = std::env::var("AWS_SECRET_ACCESS_KEY").ok();
        }
    }

    Ok(config)
}

fn default_base_url() -> Url {
    Url::parse("http://www.upenn.edu/calendar-export/").expect("valid default export url")
}

const fn default_timeout() -> u64 {
    30
}

const fn default_school() -> u32 {
    4
}

const fn default_showndays() -> u32 {
    500
}

fn default_feeds() -> Vec<Feed> {
    vec![
        Feed {
            owner: 115,
            key: "upenn-ese.ics".to_owned(),
        },
        Feed {
            owner: 15,
            key: "upenn-cis.ics".to_owned(),
        },
    ]
}

fn default_region() -> String {
    "us-east-1".to_owned()
}

fn default_listen() -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], 8080))
}

fn default_public_url() -> Url {
    Url::parse("http://localhost:8080/penncalfixer").expect("valid default public url")
}
