/// Parses an export document, keeping whitespace-only text such as `<room> </room>`.
///
/// # Errors
/// Returns an error if the document is not well-formed.
pub fn parse_document(content: &[u8]) -> Result<xmltree::Element, xmltree::ParseError> {
    let config = xmltree::ParserConfig::new().whitespace_to_characters(true);

    xmltree::Element::parse_with_config(content, config)
}

/// Text of the named child, `Some("")` for an empty element and `None` when the child is missing.
pub fn child_text(element: &xmltree::Element, name: &str) -> Option<String> {
    element
        .get_child(name)
        .map(|e| e.get_text().map(|text| text.into_owned()).unwrap_or_default())
}

pub fn location(element: &xmltree::Element) -> Option<String> {
    child_text(element, "location")
}

pub fn room(element: &xmltree::Element) -> Option<String> {
    child_text(element, "room")
}

pub fn link_id(element: &xmltree::Element) -> Option<&str> {
    if element.name != "link" {
        return None;
    }

    element.attributes.get("id").map(String::as_str)
}

pub fn is_event(element: &xmltree::Element) -> bool {
    element.name == "event"
}
