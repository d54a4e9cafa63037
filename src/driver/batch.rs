use std::time::Duration;

use chrono::{Local, NaiveDate};

use crate::calendar::export::{Client, DepartmentQuery};
use crate::calendar::Error;
use crate::config::{self, Config};
use crate::logger::LogExt as _;

use super::delivery::Destination;

/// Regenerates every configured department feed.
#[derive(Debug)]
pub struct Job {
  client: Client,
  destination: Destination,
  /// Drives the uploads; fetching stays blocking.
  runtime: tokio::runtime::Runtime,
  export: config::Export,
  batch: config::Batch,
}

impl Job {
  /// # Errors
  /// Returns an error if the destination cannot be set up.
  pub fn new(config: &Config) -> anyhow::Result<Self> {
    let timeout = Duration::from_secs(config.export.timeout);

    Ok(Self {
      client: Client::new(config.export.base_url.clone(), timeout),
      destination: Destination::new(&config.batch.delivery, timeout)?,
      runtime: tokio::runtime::Builder::new_current_thread().enable_all().build()?,
      export: config.export.clone(),
      batch: config.batch.clone(),
    })
  }

  /// Fix and deliver one feed.
  ///
  /// # Errors
  /// Returns an error if fetching, parsing or delivering the feed fails.
  pub fn run_feed(&self, feed: &config::Feed, today: NaiveDate) -> Result<(), Error> {
    let query = DepartmentQuery {
      school: self.batch.school,
      owner: feed.owner,
      showndays: self.batch.showndays,
    };
    let urls = self.client.department_urls(&query, today);

    let (fixed, _report) = self.client.get_fixed(&urls, self.export.timezone, self.export.timezone_policy)?;

    log::info!("Delivering {}", feed.key);
    self.runtime.block_on(self.destination.put(&feed.key, &fixed.to_ical()))
  }

  /// Runs all feeds, even after one of them failed.
  ///
  /// # Errors
  /// Returns an error naming the failed feeds.
  pub fn run(&self) -> anyhow::Result<()> {
    let today = Local::now().date_naive();

    let failed: Vec<&str> = self.batch.feeds
      .iter()
      .filter_map(|feed| {
        self.run_feed(feed, today)
          .log_error(&format!("Could not fix feed {}", feed.key))
          .err()
          .map(|_| feed.key.as_str())
      })
      .collect();

    if !failed.is_empty() {
      anyhow::bail!("{} of {} feeds failed: {}", failed.len(), self.batch.feeds.len(), failed.join(", "));
    }

    log::info!("Finished {} feeds", self.batch.feeds.len());

    Ok(())
  }
}
