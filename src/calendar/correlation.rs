use std::fmt::{Display, Formatter, Result};

/// Local part of an iCal `UID`, the same value the XML export carries as `<link id="...">`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CorrelationKey<'a>(&'a str);

impl<'a> CorrelationKey<'a> {
    /// Everything before the first `@`, or the whole uid when there is none.
    pub fn from_uid(uid: &'a str) -> Self {
        Self(uid.split_once('@').map_or(uid, |(local, _)| local))
    }

    pub const fn as_str(&self) -> &'a str {
        self.0
    }
}

impl Display for CorrelationKey<'_> {
    fn fmt(&self, formatter: &mut Formatter) -> Result {
        formatter.write_str(self.0)
    }
}
