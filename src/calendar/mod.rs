mod correlation;
mod engine;
mod error;
mod event;
mod extract;
mod feed;
mod location;
mod property_set;
mod timezone;
mod xml_index;

pub mod export;

pub use correlation::CorrelationKey;
pub use engine::{Engine, RewriteReport};
pub use error::{Error, ErrorKind};
pub use event::IcalEvent;
pub use feed::{FeedComponent, IcalFeed};
pub use timezone::{Timezone, TimezonePolicy};
pub use xml_index::{XmlEventIndex, XmlEventRecord};
