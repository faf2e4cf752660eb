//! CycloneDX XML format handler
//!
//! CycloneDX carries the same information in XML and JSON, but the shapes
//! differ: XML wraps collections in container elements, puts identifiers
//! in attributes and encodes a few structures (hashes, properties,
//! licenses, dependencies) differently. This module reads the XML into a
//! small element tree and reshapes it into the JSON layout, so that both
//! inputs end up as the same [`CdxBom`].

use crate::cdx_version::CdxVersion;
use crate::errors::ConverterError;
use crate::models_cdx::{BOM_FORMAT, CdxBom};
use log::warn;
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use serde_json::{Map, Number, Value};
use std::io::Read;

/// Collection wrappers and the element name of their items.
const WRAPPERS: &[(&str, &str)] = &[
    ("components", "component"),
    ("services", "service"),
    ("tools", "tool"),
    ("hashes", "hash"),
    ("externalReferences", "reference"),
    ("properties", "property"),
    ("dependencies", "dependency"),
    ("authors", "author"),
    ("lifecycles", "lifecycle"),
    ("endpoints", "endpoint"),
    ("vulnerabilities", "vulnerability"),
    ("references", "reference"),
    ("ratings", "rating"),
    ("cwes", "cwe"),
    ("advisories", "advisory"),
    ("affects", "target"),
    ("versions", "version"),
    ("patches", "patch"),
    ("commits", "commit"),
    ("tags", "tag"),
];

/// Organizational entities whose `url`/`contact` children are always lists.
const ORGANIZATIONAL_ENTITIES: &[&str] = &["supplier", "manufacturer", "manufacture", "provider"];

/// Elements whose text is numeric in JSON.
const NUMERIC: &[&str] = &["cwe", "score"];

#[derive(Debug, Default)]
struct XmlElement {
    name: String,
    attributes: Vec<(String, String)>,
    children: Vec<XmlElement>,
    text: String,
}

impl XmlElement {
    fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }
}

/// Parse CycloneDX from XML
pub fn parse<R: Read>(mut reader: R) -> Result<CdxBom, ConverterError> {
    let mut xml = String::new();
    reader
        .read_to_string(&mut xml)
        .map_err(|e| ConverterError::Io(e, "Failed to read CycloneDX XML".to_string()))?;
    xml_str_to_bom(&xml)
}

/// Normalizes a CycloneDX XML document into a typed BOM.
pub fn xml_str_to_bom(xml: &str) -> Result<CdxBom, ConverterError> {
    super::json::from_value(xml_str_to_json(xml)?)
}

/// Normalizes a CycloneDX XML document into its JSON shape.
pub fn xml_str_to_json(xml: &str) -> Result<Value, ConverterError> {
    let root = parse_tree(xml)?;
    bom_to_json(&root)
}

fn parse_tree(xml: &str) -> Result<XmlElement, ConverterError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut stack: Vec<XmlElement> = Vec::new();
    let mut root: Option<XmlElement> = None;

    loop {
        let event = reader.read_event().map_err(|e| {
            ConverterError::ParseError(format!(
                "Failed to parse CycloneDX XML at byte {}: {}",
                reader.buffer_position(),
                e
            ))
        })?;

        match event {
            Event::Start(ref e) => stack.push(start_element(e)?),
            Event::Empty(ref e) => {
                let element = start_element(e)?;
                attach(&mut stack, &mut root, element);
            }
            Event::Text(ref e) => {
                let text = e.unescape().map_err(|e| {
                    ConverterError::ParseError(format!("Invalid text in CycloneDX XML: {}", e))
                })?;
                if let Some(current) = stack.last_mut() {
                    current.text.push_str(&text);
                }
            }
            Event::CData(ref e) => {
                if let Some(current) = stack.last_mut() {
                    current.text.push_str(&String::from_utf8_lossy(e));
                }
            }
            Event::End(_) => {
                if let Some(element) = stack.pop() {
                    attach(&mut stack, &mut root, element);
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if !stack.is_empty() {
        return Err(ConverterError::ParseError(
            "Unexpected end of CycloneDX XML document".to_string(),
        ));
    }
    root.ok_or_else(|| ConverterError::ParseError("CycloneDX XML has no root element".to_string()))
}

fn start_element(e: &BytesStart<'_>) -> Result<XmlElement, ConverterError> {
    let mut element = XmlElement {
        name: String::from_utf8_lossy(e.local_name().as_ref()).into_owned(),
        ..Default::default()
    };

    for attr in e.attributes() {
        let attr = attr.map_err(|e| {
            ConverterError::ParseError(format!("Invalid attribute in CycloneDX XML: {}", e))
        })?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        // xmlns:xsi, xsi:schemaLocation, ...
        if key.contains(':') {
            continue;
        }
        let value = attr.unescape_value().map_err(|e| {
            ConverterError::ParseError(format!("Invalid attribute value in CycloneDX XML: {}", e))
        })?;
        element.attributes.push((key, value.into_owned()));
    }

    Ok(element)
}

fn attach(stack: &mut [XmlElement], root: &mut Option<XmlElement>, element: XmlElement) {
    match stack.last_mut() {
        Some(parent) => parent.children.push(element),
        None => *root = Some(element),
    }
}

fn bom_to_json(root: &XmlElement) -> Result<Value, ConverterError> {
    if root.name != "bom" {
        return Err(ConverterError::InvalidInput(format!(
            "Expected a CycloneDX <bom> root element, found <{}>",
            root.name
        )));
    }

    let mut bom = Map::new();
    bom.insert("bomFormat".to_string(), Value::from(BOM_FORMAT));

    match root.attr("xmlns").and_then(CdxVersion::from_namespace) {
        Some(version) => {
            bom.insert("specVersion".to_string(), Value::from(version.as_str()));
        }
        None => warn!(
            "Could not derive the CycloneDX version from namespace {:?}",
            root.attr("xmlns")
        ),
    }
    if let Some(serial) = root.attr("serialNumber") {
        bom.insert("serialNumber".to_string(), Value::from(serial));
    }
    let version = root
        .attr("version")
        .and_then(|v| v.parse::<u64>().ok())
        .unwrap_or(1);
    bom.insert("version".to_string(), Value::from(version));

    insert_children(&mut bom, root);
    Ok(Value::Object(bom))
}

/// Converts an element according to the fixed CycloneDX reshaping rules.
fn element_to_json(element: &XmlElement) -> Value {
    match element.name.as_str() {
        "licenses" => return licenses_to_json(element),
        "hash" => return hash_to_json(element),
        "property" => return property_to_json(element),
        "dependency" => return dependency_to_json(element),
        _ => {}
    }

    if let Some(item) = wrapper_item(&element.name) {
        if element.children.iter().all(|c| c.name == item) {
            return Value::Array(element.children.iter().map(element_to_json).collect());
        }
    }

    if element.children.is_empty() && element.attributes.is_empty() {
        return scalar(&element.name, &element.text);
    }

    let mut object = Map::new();
    for (key, value) in &element.attributes {
        if key == "xmlns" {
            continue;
        }
        object.insert(json_key(key), Value::from(value.as_str()));
    }
    if element.children.is_empty() && !element.text.is_empty() {
        // e.g. <text content-type="text/plain">...</text>
        object.insert("content".to_string(), Value::from(element.text.as_str()));
    }
    insert_children(&mut object, element);
    Value::Object(object)
}

/// Groups children by name: single occurrences become plain values,
/// repeated ones become arrays.
fn insert_children(object: &mut Map<String, Value>, element: &XmlElement) {
    let mut seen: Vec<&str> = Vec::new();
    for child in &element.children {
        if seen.contains(&child.name.as_str()) {
            continue;
        }
        seen.push(child.name.as_str());

        let same: Vec<&XmlElement> = element
            .children
            .iter()
            .filter(|c| c.name == child.name)
            .collect();
        let value = if same.len() == 1 && !always_array(&element.name, &child.name) {
            element_to_json(same[0])
        } else {
            Value::Array(same.into_iter().map(element_to_json).collect())
        };
        object.insert(child.name.clone(), value);
    }
}

fn licenses_to_json(element: &XmlElement) -> Value {
    let choices = element
        .children
        .iter()
        .filter_map(|child| match child.name.as_str() {
            "license" => {
                let mut choice = Map::new();
                choice.insert("license".to_string(), element_to_json(child));
                Some(Value::Object(choice))
            }
            "expression" => {
                let mut choice = Map::new();
                for (key, value) in &child.attributes {
                    choice.insert(json_key(key), Value::from(value.as_str()));
                }
                choice.insert("expression".to_string(), Value::from(child.text.as_str()));
                Some(Value::Object(choice))
            }
            other => {
                warn!("Ignoring unexpected <{}> inside <licenses>", other);
                None
            }
        })
        .collect();
    Value::Array(choices)
}

fn hash_to_json(element: &XmlElement) -> Value {
    let mut hash = Map::new();
    hash.insert(
        "alg".to_string(),
        Value::from(element.attr("alg").unwrap_or_default()),
    );
    hash.insert("content".to_string(), Value::from(element.text.as_str()));
    Value::Object(hash)
}

fn property_to_json(element: &XmlElement) -> Value {
    let mut property = Map::new();
    property.insert(
        "name".to_string(),
        Value::from(element.attr("name").unwrap_or_default()),
    );
    if !element.text.is_empty() {
        property.insert("value".to_string(), Value::from(element.text.as_str()));
    }
    Value::Object(property)
}

fn dependency_to_json(element: &XmlElement) -> Value {
    let mut dependency = Map::new();
    dependency.insert(
        "ref".to_string(),
        Value::from(element.attr("ref").unwrap_or_default()),
    );
    let depends_on: Vec<Value> = element
        .children
        .iter()
        .filter(|c| c.name == "dependency")
        .filter_map(|c| c.attr("ref"))
        .map(Value::from)
        .collect();
    if !depends_on.is_empty() {
        dependency.insert("dependsOn".to_string(), Value::Array(depends_on));
    }
    Value::Object(dependency)
}

fn wrapper_item(name: &str) -> Option<&'static str> {
    WRAPPERS
        .iter()
        .find(|(wrapper, _)| *wrapper == name)
        .map(|(_, item)| *item)
}

fn always_array(parent: &str, child: &str) -> bool {
    ORGANIZATIONAL_ENTITIES.contains(&parent) && matches!(child, "url" | "contact")
}

fn scalar(name: &str, text: &str) -> Value {
    if NUMERIC.contains(&name) {
        if let Ok(n) = text.parse::<i64>() {
            return Value::from(n);
        }
        if let Some(n) = text.parse::<f64>().ok().and_then(Number::from_f64) {
            return Value::Number(n);
        }
    }
    Value::from(text)
}

/// `content-type` -> `contentType`; `bom-ref` keeps its hyphen.
fn json_key(attribute: &str) -> String {
    if attribute == "bom-ref" {
        return attribute.to_string();
    }
    let mut key = String::with_capacity(attribute.len());
    let mut upper = false;
    for c in attribute.chars() {
        if c == '-' {
            upper = true;
        } else if upper {
            key.extend(c.to_uppercase());
            upper = false;
        } else {
            key.push(c);
        }
    }
    key
}
