use super::xml_index::XmlEventRecord;

/// Builds the location shown in calendar clients: the XML location, then a space and the room.
///
/// A room without a location keeps its leading space and a record with neither yields `""`.
pub fn compose(record: &XmlEventRecord) -> String {
    let mut composed = record.location.clone().unwrap_or_default();

    if let Some(room) = &record.room {
        composed.push(' ');
        composed.push_str(room);
    }

    composed
}
