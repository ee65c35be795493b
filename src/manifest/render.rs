//! XML serialization of a [`ManifestDocument`].

use super::document::{Item, ManifestDocument, Resource};
use crate::error::PackError;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

const NS_ADLNAV: &str = "http://www.adlnet.org/xsd/adlnav_v1p3";
const NS_IMSCP: &str = "http://www.imsglobal.org/xsd/imscp_v1p1";
const NS_ADLSEQ: &str = "http://www.adlnet.org/xsd/adlseq_v1p3";
const NS_IMSSS: &str = "http://www.imsglobal.org/xsd/imsss";
const NS_ADLCP: &str = "http://www.adlnet.org/xsd/adlcp_v1p3";
const NS_XSI: &str = "http://www.w3.org/2001/XMLSchema-instance";
const SCHEMA_LOCATION: &str = "http://www.imsglobal.org/xsd/imscp_v1p1 imscp_v1p1.xsd \
http://www.adlnet.org/xsd/adlcp_v1p3 adlcp_v1p3.xsd \
http://www.adlnet.org/xsd/adlseq_v1p3 adlseq_v1p3.xsd \
http://www.adlnet.org/xsd/adlnav_v1p3 adlnav_v1p3.xsd \
http://www.imsglobal.org/xsd/imsss imsss_v1p0.xsd";

const SCHEMA_NAME: &str = "ADL SCORM";
const SCHEMA_VERSION: &str = "2004 4th Edition";

type XmlWriter = Writer<Vec<u8>>;

/// Serialize the document as tab-indented XML.
///
/// Text and attribute values are escaped. Output depends only on the document,
/// so identical input renders byte-identical XML.
pub fn render_manifest(doc: &ManifestDocument) -> Result<String, PackError> {
    let mut w = Writer::new_with_indent(Vec::new(), b'\t', 1);

    emit(
        &mut w,
        Event::Decl(BytesDecl::new("1.0", Some("utf-8"), Some("no"))),
    )?;
    start(
        &mut w,
        "manifest",
        &[
            ("identifier", doc.identifier.as_str()),
            ("version", "1"),
            ("xmlns:adlnav", NS_ADLNAV),
            ("xmlns", NS_IMSCP),
            ("xmlns:adlseq", NS_ADLSEQ),
            ("xmlns:imsss", NS_IMSSS),
            ("xmlns:adlcp", NS_ADLCP),
            ("xmlns:xsi", NS_XSI),
            ("xsi:schemaLocation", SCHEMA_LOCATION),
        ],
    )?;

    start(&mut w, "metadata", &[])?;
    text_element(&mut w, "schema", SCHEMA_NAME)?;
    text_element(&mut w, "schemaversion", SCHEMA_VERSION)?;
    end(&mut w, "metadata")?;

    let org = &doc.organization;
    start(
        &mut w,
        "organizations",
        &[("default", org.identifier.as_str())],
    )?;
    start(
        &mut w,
        "organization",
        &[("identifier", org.identifier.as_str())],
    )?;
    text_element(&mut w, "title", &org.title)?;
    for item in &org.items {
        write_item(&mut w, item)?;
    }
    start(&mut w, "imsss:sequencing", &[])?;
    empty(
        &mut w,
        "imsss:controlMode",
        &[("choice", "true"), ("flow", "true")],
    )?;
    end(&mut w, "imsss:sequencing")?;
    end(&mut w, "organization")?;
    end(&mut w, "organizations")?;

    start(&mut w, "resources", &[])?;
    for resource in &doc.resources {
        write_resource(&mut w, resource)?;
    }
    end(&mut w, "resources")?;
    end(&mut w, "manifest")?;

    let mut xml = String::from_utf8(w.into_inner())
        .map_err(|e| PackError::Manifest(format!("manifest is not UTF-8: {}", e)))?;
    xml.push('\n');
    Ok(xml)
}

fn write_item(w: &mut XmlWriter, item: &Item) -> Result<(), PackError> {
    start(
        w,
        "item",
        &[
            ("identifier", item.identifier.as_str()),
            ("identifierref", item.identifierref.as_str()),
        ],
    )?;
    text_element(w, "title", &item.title)?;

    let measure = item.sequencing.min_normalized_measure.to_string();
    start(w, "imsss:sequencing", &[])?;
    start(w, "imsss:objectives", &[])?;
    start(
        w,
        "imsss:primaryObjective",
        &[
            ("objectiveID", item.sequencing.objective_id.as_str()),
            ("satisfiedByMeasure", "true"),
        ],
    )?;
    text_element(w, "imsss:minNormalizedMeasure", &measure)?;
    end(w, "imsss:primaryObjective")?;
    end(w, "imsss:objectives")?;
    empty(
        w,
        "imsss:deliveryControls",
        &[
            ("completionSetByContent", "true"),
            ("objectiveSetByContent", "true"),
        ],
    )?;
    end(w, "imsss:sequencing")?;
    end(w, "item")
}

fn write_resource(w: &mut XmlWriter, resource: &Resource) -> Result<(), PackError> {
    let mut attrs = vec![
        ("identifier", resource.identifier.as_str()),
        ("type", "webcontent"),
    ];
    if let Some(href) = resource.href() {
        attrs.push(("href", href));
    }
    attrs.push(("adlcp:scormType", resource.scorm_type()));

    start(w, "resource", &attrs)?;
    for file in &resource.files {
        empty(w, "file", &[("href", file.as_str())])?;
    }
    for dependency in &resource.dependencies {
        empty(w, "dependency", &[("identifierref", dependency.as_str())])?;
    }
    end(w, "resource")
}

fn emit(w: &mut XmlWriter, event: Event<'_>) -> Result<(), PackError> {
    w.write_event(event)
        .map_err(|e| PackError::Manifest(format!("XML write failed: {}", e)))
}

fn start(w: &mut XmlWriter, name: &str, attrs: &[(&str, &str)]) -> Result<(), PackError> {
    let tag = BytesStart::new(name).with_attributes(attrs.iter().copied());
    emit(w, Event::Start(tag))
}

fn empty(w: &mut XmlWriter, name: &str, attrs: &[(&str, &str)]) -> Result<(), PackError> {
    let tag = BytesStart::new(name).with_attributes(attrs.iter().copied());
    emit(w, Event::Empty(tag))
}

fn end(w: &mut XmlWriter, name: &str) -> Result<(), PackError> {
    emit(w, Event::End(BytesEnd::new(name)))
}

fn text_element(w: &mut XmlWriter, name: &str, text: &str) -> Result<(), PackError> {
    start(w, name, &[])?;
    emit(w, Event::Text(BytesText::new(text)))?;
    end(w, name)
}
