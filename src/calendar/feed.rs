use icalendar::parser;

use super::error::{Error, ErrorKind};
use super::event::IcalEvent;
use super::property_set::{Parameter, Property, PropertySet};

const MAX_LINE_OCTETS: usize = 75;
const BEGIN_CALENDAR: &str = "BEGIN:VCALENDAR";

/// Any component the rewrite does not touch (`VTIMEZONE`, `VTODO`, `VALARM`, ...).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Component {
    pub name: String,
    pub properties: PropertySet,
    pub components: Vec<Component>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedComponent {
    Event(IcalEvent),
    Other(Component),
}

/// An owned iCal document: calendar properties and top-level components in feed order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IcalFeed {
    pub properties: PropertySet,
    pub components: Vec<FeedComponent>,
}

impl IcalFeed {
    /// Parses iCal text.
    ///
    /// # Errors
    /// Returns an error if the text is not a calendar.
    pub fn parse(text: &str) -> Result<Self, Error> {
        let text = text.strip_prefix('\u{feff}').unwrap_or(text);

        let begins_calendar = text
            .trim_start()
            .get(..BEGIN_CALENDAR.len())
            .is_some_and(|start| start.eq_ignore_ascii_case(BEGIN_CALENDAR));
        if !begins_calendar {
            let start: String = text.trim_start().chars().take(40).collect();
            return Err(Error::new(
                ErrorKind::Calendar,
                format!("Expected {BEGIN_CALENDAR}, got {start:?}"),
            ));
        }

        let unfolded = parser::unfold(text);
        let calendar = parser::read_calendar(&unfolded)
            .map_err(|e| Error::new(ErrorKind::Calendar, e.to_string()))?;

        Ok(Self {
            properties: calendar.properties.iter().map(property).collect(),
            components: calendar
                .components
                .iter()
                .map(|c| {
                    let component = component(c);
                    if component.name.eq_ignore_ascii_case("VEVENT") {
                        FeedComponent::Event(IcalEvent {
                            properties: component.properties,
                            components: component.components,
                        })
                    } else {
                        FeedComponent::Other(component)
                    }
                })
                .collect(),
        })
    }

    #[cfg(test)]
    pub fn events(&self) -> impl Iterator<Item = &IcalEvent> {
        self.components.iter().filter_map(|c| match c {
            FeedComponent::Event(event) => Some(event),
            FeedComponent::Other(_) => None,
        })
    }

    pub fn events_mut(&mut self) -> impl Iterator<Item = &mut IcalEvent> {
        self.components.iter_mut().filter_map(|c| match c {
            FeedComponent::Event(event) => Some(event),
            FeedComponent::Other(_) => None,
        })
    }

    /// Writes the feed as CRLF separated, folded content lines.
    pub fn to_ical(&self) -> String {
        let mut out = String::new();

        write_line(&mut out, "BEGIN:VCALENDAR");
        write_properties(&mut out, &self.properties);
        for component in &self.components {
            match component {
                FeedComponent::Event(event) => {
                    write_component(&mut out, "VEVENT", &event.properties, &event.components);
                }
                FeedComponent::Other(other) => {
                    write_component(&mut out, &other.name, &other.properties, &other.components);
                }
            }
        }
        write_line(&mut out, "END:VCALENDAR");

        out
    }
}

fn property(parsed: &parser::Property<'_>) -> Property {
    Property {
        name: parsed.name.to_string(),
        params: parsed
            .params
            .iter()
            .map(|param| Parameter {
                key: param.key.to_string(),
                value: param.val.as_ref().map(|v| v.to_string()),
            })
            .collect(),
        value: parsed.val.to_string(),
    }
}

fn component(parsed: &parser::Component<'_>) -> Component {
    Component {
        name: parsed.name.to_string(),
        properties: parsed.properties.iter().map(property).collect(),
        components: parsed.components.iter().map(component).collect(),
    }
}

fn write_component(out: &mut String, name: &str, properties: &PropertySet, components: &[Component]) {
    write_line(out, &format!("BEGIN:{name}"));
    write_properties(out, properties);
    for nested in components {
        write_component(out, &nested.name, &nested.properties, &nested.components);
    }
    write_line(out, &format!("END:{name}"));
}

fn write_properties(out: &mut String, properties: &PropertySet) {
    for property in properties {
        write_line(out, &property.to_string());
    }
}

/// Folds after 75 octets, never inside a UTF-8 sequence.
fn write_line(out: &mut String, line: &str) {
    let mut limit = MAX_LINE_OCTETS;
    let mut used = 0;

    for c in line.chars() {
        if used + c.len_utf8() > limit {
            out.push_str("\r\n ");
            used = 0;
            limit = MAX_LINE_OCTETS - 1;
        }

        out.push(c);
        used += c.len_utf8();
    }

    out.push_str("\r\n");
}

#[cfg(test)]
mod tests {
    use super::*;

    const FEED: &str = "BEGIN:VCALENDAR\r\n\
VERSION:2.0\r\n\
PRODID:-//University of Pennsylvania//Calendar Export//EN\r\n\
BEGIN:VTIMEZONE\r\n\
TZID:America/New_York\r\n\
BEGIN:STANDARD\r\n\
TZOFFSETFROM:-0400\r\n\
TZOFFSETTO:-0500\r\n\
DTSTART:19701101T020000\r\n\
END:STANDARD\r\n\
END:VTIMEZONE\r\n\
BEGIN:VEVENT\r\n\
UID:42@upenn.edu\r\n\
DTSTART;TZID=America/New_York:20240108T100000\r\n\
SUMMARY:Distinguished Lecture\r\n\
LOCATION:TBD\r\n\
END:VEVENT\r\n\
BEGIN:VEVENT\r\n\
UID:43@upenn.edu\r\n\
SUMMARY:Faculty Meeting\r\n\
BEGIN:VALARM\r\n\
ACTION:DISPLAY\r\n\
TRIGGER:-PT15M\r\n\
END:VALARM\r\n\
END:VEVENT\r\n\
END:VCALENDAR\r\n";

    #[test]
    fn parses_events_and_other_components() {
        let feed = IcalFeed::parse(FEED).unwrap();

        assert_eq!(feed.properties.value("VERSION"), Some("2.0"));
        assert_eq!(feed.components.len(), 3);
        assert!(matches!(&feed.components[0], FeedComponent::Other(c) if c.name == "VTIMEZONE"));

        let uids: Vec<_> = feed.events().filter_map(IcalEvent::uid).collect();
        assert_eq!(uids, ["42@upenn.edu", "43@upenn.edu"]);

        let first = feed.events().next().unwrap();
        let dtstart = first.properties.get("DTSTART").unwrap();
        assert_eq!(dtstart.params[0].key, "TZID");
        assert_eq!(dtstart.params[0].value.as_deref(), Some("America/New_York"));

        let second = feed.events().nth(1).unwrap();
        assert_eq!(second.components[0].name, "VALARM");
    }

    #[test]
    fn writes_untouched_feed_back() {
        let feed = IcalFeed::parse(FEED).unwrap();

        assert_eq!(feed.to_ical(), FEED);
    }

    #[test]
    fn folds_long_lines() {
        let mut out = String::new();
        let line = format!("LOCATION:{}", "x".repeat(100));
        write_line(&mut out, &line);

        let lines: Vec<_> = out.split("\r\n").collect();
        assert_eq!(lines[0].len(), 75);
        assert!(lines[1].starts_with(' '));
        assert!(lines[1].len() <= 75);
        assert_eq!(lines.concat().replace(' ', ""), line.replace(' ', ""));
    }

    #[test]
    fn folding_keeps_characters_whole() {
        let mut out = String::new();
        write_line(&mut out, &format!("LOCATION:{}", "ü".repeat(60)));

        for line in out.split("\r\n") {
            assert!(line.len() <= 75);
        }
        assert_eq!(out.matches('ü').count(), 60);
    }

    #[test]
    fn rejects_documents_that_are_not_calendars() {
        for text in ["<html><body>502 Bad Gateway</body></html>", "", "  \r\n", "BEGIN:VCARD\r\nEND:VCARD\r\n"] {
            let error = IcalFeed::parse(text).unwrap_err();

            assert_eq!(error.kind, ErrorKind::Calendar, "{text:?}");
        }
    }

    #[test]
    fn accepts_byte_order_mark_and_lowercase() {
        let feed = IcalFeed::parse(&format!("\u{feff}{FEED}")).unwrap();
        assert_eq!(feed.events().count(), 2);
        assert_eq!(feed.to_ical(), FEED);

        let lower = "begin:vcalendar\r\nBEGIN:VEVENT\r\nUID:7@upenn.edu\r\nEND:VEVENT\r\nend:vcalendar\r\n";
        assert_eq!(IcalFeed::parse(lower).unwrap().events().count(), 1);
    }

    #[test]
    fn folded_input_is_unfolded() {
        let folded = "BEGIN:VCALENDAR\r\nBEGIN:VEVENT\r\nUID:42@upenn.edu\r\nLOCATION:Wu\r\n  Hall\r\nEND:VEVENT\r\nEND:VCALENDAR\r\n";
        let feed = IcalFeed::parse(folded).unwrap();

        assert_eq!(feed.events().next().unwrap().location().as_deref(), Some("Wu Hall"));
    }
}
