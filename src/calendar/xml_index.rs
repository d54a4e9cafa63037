use std::collections::HashMap;

use super::correlation::CorrelationKey;
use super::extract;

/// The parts of an XML `<event>` the rewrite needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlEventRecord {
    pub link_id: String,
    pub location: Option<String>,
    pub room: Option<String>,
}

impl XmlEventRecord {
    fn from_event(link_id: &str, event: &xmltree::Element) -> Self {
        Self {
            link_id: link_id.to_owned(),
            location: extract::location(event),
            room: extract::room(event),
        }
    }
}

/// Lookup of XML events by the `id` of their `<link>` child.
///
/// Only the first `<link>` carrying a given id in document order counts. When that link's parent
/// is not an `<event>` the id resolves to nothing, even if a later `<event>` reuses it.
#[derive(Debug, Default)]
pub struct XmlEventIndex {
    by_link_id: HashMap<String, Option<XmlEventRecord>>,
}

impl XmlEventIndex {
    pub fn new(root: &xmltree::Element) -> Self {
        let mut index = Self::default();
        index.visit(root);

        log::debug!(
            "Indexed {} XML events ({} link ids)",
            index.len(),
            index.by_link_id.len()
        );

        index
    }

    /// Pre-order walk, so links are seen in document order.
    fn visit(&mut self, parent: &xmltree::Element) {
        for child in parent.children.iter().filter_map(|c| c.as_element()) {
            if let Some(id) = extract::link_id(child) {
                if !self.by_link_id.contains_key(id) {
                    let record = extract::is_event(parent).then(|| XmlEventRecord::from_event(id, parent));
                    self.by_link_id.insert(id.to_owned(), record);
                } else {
                    log::trace!("Ignoring repeated link id {id}");
                }
            }

            self.visit(child);
        }
    }

    pub fn get(&self, key: CorrelationKey<'_>) -> Option<&XmlEventRecord> {
        self.by_link_id.get(key.as_str()).and_then(Option::as_ref)
    }

    /// Number of ids that resolve to an event.
    pub fn len(&self) -> usize {
        self.by_link_id.values().filter(|record| record.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
