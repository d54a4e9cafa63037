use super::correlation::CorrelationKey;
use super::event::IcalEvent;
use super::feed::IcalFeed;
use super::location;
use super::timezone::{Timezone, TimezonePolicy};
use super::xml_index::XmlEventIndex;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RewriteReport {
    pub rewritten: usize,
    pub unmatched: usize,
    pub missing_uid: usize,
}

/// Moves locations from the XML export onto the iCal events that share their link id.
#[derive(Debug)]
pub struct Engine {
    index: XmlEventIndex,
    timezone: Timezone,
    policy: TimezonePolicy,
}

impl Engine {
    pub const fn new(index: XmlEventIndex, timezone: Timezone, policy: TimezonePolicy) -> Self {
        Self {
            index,
            timezone,
            policy,
        }
    }

    /// Rewrites one event. Events without a uid or an XML counterpart stay as they are.
    pub fn rewrite_event(&self, event: &mut IcalEvent, report: &mut RewriteReport) {
        let Some(uid) = event.uid() else {
            report.missing_uid += 1;
            return;
        };

        let key = CorrelationKey::from_uid(uid);
        let Some(record) = self.index.get(key) else {
            log::trace!("No XML event for {key}");
            report.unmatched += 1;
            return;
        };

        let composed = location::compose(record);
        log::trace!("{key}: location {:?} -> {composed:?}", event.location());

        event.rewrite(&composed, &self.timezone, self.policy);
        report.rewritten += 1;
    }

    pub fn rewrite_events<'a>(&self, events: impl IntoIterator<Item = &'a mut IcalEvent>) -> RewriteReport {
        let mut report = RewriteReport::default();

        for event in events {
            self.rewrite_event(event, &mut report);
        }

        report
    }

    pub fn rewrite_feed(&self, feed: &mut IcalFeed) -> RewriteReport {
        let report = self.rewrite_events(feed.events_mut());

        log::info!(
            "Rewrote {} events ({} without XML counterpart, {} without uid)",
            report.rewritten,
            report.unmatched,
            report.missing_uid
        );

        report
    }
}
