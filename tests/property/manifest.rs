//! Manifest cross-reference and rendering invariants over arbitrary inputs.

use proptest::prelude::*;
use scorm_pack::manifest::{
    render_manifest, IdentifierScheme, Item, ItemSequencing, ManifestDocument, Organization,
    Resource, ResourceKind, COMMON_RESOURCE_ID,
};

fn document(key: &str, index: usize, scheme: IdentifierScheme, title: &str) -> ManifestDocument {
    let ids = scheme.ids(key, index);
    ManifestDocument {
        identifier: "com.example.prop".to_string(),
        organization: Organization {
            identifier: "organisation".to_string(),
            title: "App Title".to_string(),
            items: vec![Item {
                identifier: ids.item,
                identifierref: ids.resource.clone(),
                title: title.to_string(),
                sequencing: ItemSequencing::mastery(0.8),
            }],
        },
        resources: vec![
            Resource {
                identifier: ids.resource,
                kind: ResourceKind::Sco {
                    href: format!("module-{}.html", key),
                },
                files: vec![format!("module-{}.html", key)],
                dependencies: vec![COMMON_RESOURCE_ID.to_string()],
            },
            Resource {
                identifier: COMMON_RESOURCE_ID.to_string(),
                kind: ResourceKind::Asset,
                files: Vec::new(),
                dependencies: Vec::new(),
            },
        ],
    }
}

fn scheme() -> impl Strategy<Value = IdentifierScheme> {
    prop_oneof![Just(IdentifierScheme::Key), Just(IdentifierScheme::Sequence)]
}

/// Identifiers never collide with the shared resource and always validate
#[test]
fn test_identifier_cross_references_property() {
    let mut runner = proptest::test_runner::TestRunner::default();

    runner
        .run(
            &("[A-Za-z0-9 _.&-]{1,12}", 0usize..1000, scheme()),
            |(key, index, scheme)| {
                let doc = document(&key, index, scheme, "Title");
                prop_assert!(doc.validate().is_ok());

                let item = &doc.organization.items[0];
                prop_assert_eq!(&item.identifierref, &doc.resources[0].identifier);
                prop_assert_ne!(doc.resources[0].identifier.as_str(), COMMON_RESOURCE_ID);
                prop_assert!(item.identifier.starts_with("item_"));
                prop_assert!(!item.identifier.contains(' '));
                Ok(())
            },
        )
        .unwrap();
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Any title renders as well-formed XML and rendering is deterministic
    #[test]
    fn rendered_manifest_is_well_formed(title in "[^\\x00-\\x08\\x0b\\x0c\\x0e-\\x1f]{0,40}") {
        let doc = document("0", 0, IdentifierScheme::Key, &title);
        let xml = render_manifest(&doc).unwrap();
        prop_assert_eq!(&xml, &render_manifest(&doc).unwrap());

        let mut reader = quick_xml::Reader::from_str(&xml);
        loop {
            match reader.read_event() {
                Ok(quick_xml::events::Event::Eof) => break,
                Ok(_) => {}
                Err(e) => return Err(TestCaseError::fail(format!("malformed: {}", e))),
            }
        }
    }
}
