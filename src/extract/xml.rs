use roxmltree::{Document, Node};

// ---------------------------------------------------------------------------
// Attribute queries over a session document
// ---------------------------------------------------------------------------
//
// A session document is a sequence of `frame` elements, each holding named
// `block` elements, each holding `sensors/sensor` (and, for ring,
// `actuators/actuator`) elements. The helpers below stand in for the
// original log format's path queries: each returns the matched attribute
// values in document order, one entry per matching element.

/// First `frame` element of the document, if any.
pub fn first_frame<'a, 'input>(doc: &'a Document<'input>) -> Option<Node<'a, 'input>> {
    doc.root_element()
        .children()
        .find(|n| n.is_element() && n.has_tag_name("frame"))
}

fn frames<'a, 'input>(doc: &'a Document<'input>) -> impl Iterator<Item = Node<'a, 'input>> {
    doc.root_element()
        .children()
        .filter(|n| n.is_element() && n.has_tag_name("frame"))
}

fn named_blocks<'a, 'input>(doc: &'a Document<'input>, block: &str) -> Vec<Node<'a, 'input>> {
    frames(doc)
        .flat_map(|frame| frame.children())
        .filter(|n| n.is_element() && n.has_tag_name("block") && n.attribute("name") == Some(block))
        .collect()
}

fn elements_under<'a, 'input>(
    parent: Node<'a, 'input>,
    wrapper: &str,
    tag: &str,
) -> Vec<Node<'a, 'input>> {
    parent
        .children()
        .filter(|n| n.is_element() && n.has_tag_name(wrapper))
        .flat_map(|w| w.children())
        .filter(|n| n.is_element() && n.has_tag_name(tag))
        .collect()
}

/// `frame/block[@name=block]/@attr`
pub fn block_attr<'a>(doc: &'a Document, block: &str, attr: &str) -> Vec<&'a str> {
    named_blocks(doc, block)
        .into_iter()
        .filter_map(|b| b.attribute(attr))
        .collect()
}

/// All `sensors/sensor` elements inside blocks named `block`, document order.
pub fn sensors<'a, 'input>(doc: &'a Document<'input>, block: &str) -> Vec<Node<'a, 'input>> {
    named_blocks(doc, block)
        .into_iter()
        .flat_map(|b| elements_under(b, "sensors", "sensor"))
        .collect()
}

/// `frame/block[@name=block]/sensors/sensor[@key=value]/@attr`
pub fn sensor_attr<'a>(
    doc: &'a Document,
    block: &str,
    key: &str,
    value: &str,
    attr: &str,
) -> Vec<&'a str> {
    sensors(doc, block)
        .into_iter()
        .filter(|s| s.attribute(key) == Some(value))
        .filter_map(|s| s.attribute(attr))
        .collect()
}

/// First match of `sensor_attr`, for record-level scalars.
pub fn first_sensor_attr<'a>(
    doc: &'a Document,
    block: &str,
    key: &str,
    value: &str,
    attr: &str,
) -> Option<&'a str> {
    sensors(doc, block)
        .into_iter()
        .filter(|s| s.attribute(key) == Some(value))
        .find_map(|s| s.attribute(attr))
}

/// `frame/block[@name=block]/actuators/actuator[@type=kind]/@attr`
pub fn actuator_attr<'a>(doc: &'a Document, block: &str, kind: &str, attr: &str) -> Vec<&'a str> {
    named_blocks(doc, block)
        .into_iter()
        .flat_map(|b| elements_under(b, "actuators", "actuator"))
        .filter(|a| a.attribute("type") == Some(kind))
        .filter_map(|a| a.attribute(attr))
        .collect()
}
