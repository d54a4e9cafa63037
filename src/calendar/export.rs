use std::time::Duration;

use chrono::{Datelike as _, NaiveDate};
use ureq::Agent;
use url::Url;

use super::engine::{Engine, RewriteReport};
use super::error::Error;
use super::extract;
use super::feed::IcalFeed;
use super::timezone::{Timezone, TimezonePolicy};
use super::xml_index::XmlEventIndex;

/// The two renditions of one listing offered by the export service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedUrls {
  pub xml: Url,
  pub ical: Url,
}

/// Listing of one department, starting on the first of the current month one year back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DepartmentQuery {
  pub school: u32,
  pub owner: u32,
  pub showndays: u32,
}

#[derive(Debug, Clone)]
pub struct Client {
  agent: Agent,
  base_url: Url,
}

impl Client {
  pub fn new(base_url: Url, timeout: Duration) -> Self {
    Self {
      agent: ureq::AgentBuilder::new().timeout(timeout).build(),
      base_url,
    }
  }

  pub const fn base_url(&self) -> &Url {
    &self.base_url
  }

  /// URLs of a department listing as of `today`.
  ///
  /// The export service takes a zero-based `month`, so January is `month=0`.
  pub fn department_urls(&self, query: &DepartmentQuery, today: NaiveDate) -> FeedUrls {
    let listing = format!(
      "school={}&owner={}&showndays={}&year={}&month={}&day=1",
      query.school,
      query.owner,
      query.showndays,
      today.year() - 1,
      today.month0(),
    );

    FeedUrls {
      xml: self.with_query(&format!("{listing}&type=xml")),
      ical: self.with_query(&format!("{listing}&type=ical2")),
    }
  }

  /// URLs for a query string passed through verbatim from a caller.
  pub fn passthrough_urls(&self, query: &str) -> FeedUrls {
    FeedUrls {
      xml: self.with_query(query),
      ical: self.with_query(&format!("{query}&type=ical2")),
    }
  }

  fn with_query(&self, query: &str) -> Url {
    let mut url = self.base_url.clone();
    url.set_query(Some(query));
    url
  }

  fn get_string(&self, url: &Url) -> Result<String, Error> {
    log::info!("Fetching {url}");

    Ok(self.agent.get(url.as_str()).call()?.into_string()?)
  }

  /// Fetch and parse the XML listing.
  ///
  /// # Errors
  /// Returns an error if the request or the XML parsing fails.
  pub fn get_xml(&self, url: &Url) -> Result<xmltree::Element, Error> {
    let content = self.get_string(url)?;

    Ok(extract::parse_document(content.as_bytes())?)
  }

  /// Fetch and parse the iCal listing.
  ///
  /// # Errors
  /// Returns an error if the request or the iCal parsing fails.
  pub fn get_ical(&self, url: &Url) -> Result<IcalFeed, Error> {
    let content = self.get_string(url)?;

    IcalFeed::parse(&content)
  }

  /// Fetch both renditions and return the iCal one with locations taken from the XML one.
  ///
  /// # Errors
  /// Returns an error if fetching or parsing either document fails.
  pub fn get_fixed(
    &self,
    urls: &FeedUrls,
    timezone: Timezone,
    policy: TimezonePolicy,
  ) -> Result<(IcalFeed, RewriteReport), Error> {
    let root = self.get_xml(&urls.xml)?;
    let mut feed = self.get_ical(&urls.ical)?;

    let engine = Engine::new(XmlEventIndex::new(&root), timezone, policy);
    let report = engine.rewrite_feed(&mut feed);

    Ok((feed, report))
  }
}
