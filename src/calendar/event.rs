use super::feed::Component;
use super::property_set::{unescape_text, Property, PropertySet};
use super::timezone::{Timezone, TimezonePolicy};

pub const UID: &str = "UID";
pub const LOCATION: &str = "LOCATION";
pub const TZID: &str = "TZID";

/// A `VEVENT` of the iCal feed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IcalEvent {
  pub properties: PropertySet,
  /// Nested components such as `VALARM`, written back untouched.
  pub components: Vec<Component>,
}

impl IcalEvent {
  pub fn new(properties: PropertySet) -> Self {
    Self {
      properties,
      components: Vec::new(),
    }
  }

  pub fn uid(&self) -> Option<&str> {
    self.properties.value(UID)
  }

  pub fn location(&self) -> Option<String> {
    self.properties.value(LOCATION).map(unescape_text)
  }

  #[cfg(test)]
  pub fn timezone_ids(&self) -> impl Iterator<Item = &str> {
    self.properties
      .iter()
      .filter(|p| p.is(TZID))
      .map(|p| p.value.as_str())
  }

  /// Replaces the location with `location` and attaches `timezone`.
  pub fn rewrite(&mut self, location: &str, timezone: &Timezone, policy: TimezonePolicy) {
    self.properties.upsert(Property::text(LOCATION, location));

    match policy {
      TimezonePolicy::Always => self.properties.append(Property::new(TZID, timezone.id())),
      TimezonePolicy::IfAbsent if !self.properties.contains(TZID) => {
        self.properties.append(Property::new(TZID, timezone.id()));
      }
      TimezonePolicy::IfAbsent => {}
    }
  }
}
