//! Shared test utilities for integration tests
//!
//! Provides project fixtures on disk, serialized environment overrides, and small
//! readers for the produced manifests and archives.

use quick_xml::events::Event;
use quick_xml::Reader;
use scorm_pack::config::{PackagerConfig, DEFAULT_SCHEMA_FILES};
use scorm_pack::discovery::ModuleSpec;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tempfile::TempDir;

/// Global mutex to serialize environment variable access across all tests
static ENV_MUTEX: Mutex<()> = Mutex::new(());

/// A course project in a temp directory: schema files plus a build tree.
pub struct ProjectFixture {
    dir: TempDir,
}

impl ProjectFixture {
    /// Project with every default schema file present and an empty build directory.
    pub fn new() -> Self {
        let fixture = Self {
            dir: TempDir::new().unwrap(),
        };
        for name in DEFAULT_SCHEMA_FILES {
            fixture.touch(&format!("tools/scorm-files/{}", name), name);
        }
        fs::create_dir_all(fixture.root().join("build")).unwrap();
        fixture
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn touch(&self, rel: &str, body: &str) -> PathBuf {
        let path = self.root().join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, body).unwrap();
        path
    }

    /// Write a file under `build/`.
    pub fn build_file(&self, rel: &str) -> PathBuf {
        self.touch(&format!("build/{}", rel), rel)
    }

    pub fn write_config(&self, toml: &str) -> PathBuf {
        self.touch("config/config.toml", toml)
    }

    /// Default config with the given modules and a pinned app id.
    pub fn config(&self, modules: &[(&str, &str)]) -> PackagerConfig {
        let mut config = PackagerConfig::default();
        config.package.app_id = Some("com.example.course".to_string());
        config.modules = modules
            .iter()
            .map(|(key, title)| ModuleSpec::new(*key, *title))
            .collect();
        config
    }
}

/// Environment variable state to restore after test
struct EnvState {
    vars: Vec<(String, Option<String>)>,
}

impl EnvState {
    fn capture(keys: &[&str]) -> Self {
        Self {
            vars: keys
                .iter()
                .map(|k| (k.to_string(), std::env::var(k).ok()))
                .collect(),
        }
    }

    fn restore(self) {
        for (key, value) in self.vars {
            match value {
                Some(v) => std::env::set_var(&key, v),
                None => std::env::remove_var(&key),
            }
        }
    }
}

/// Run `f` with the global config directory pointed into `root` and the given
/// variables set. Serialized across tests; everything is restored afterwards.
pub fn with_isolated_env<F, R>(root: &Path, vars: &[(&str, &str)], f: F) -> R
where
    F: FnOnce() -> R,
{
    let _guard = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    let mut keys = vec!["HOME", "XDG_CONFIG_HOME", "SCORM_PACK_ENV"];
    keys.extend(vars.iter().map(|(k, _)| *k));
    let env_state = EnvState::capture(&keys);

    let xdg = root.join("xdg");
    fs::create_dir_all(&xdg).unwrap();
    std::env::set_var("HOME", root.join("home"));
    std::env::set_var("XDG_CONFIG_HOME", &xdg);
    std::env::remove_var("SCORM_PACK_ENV");
    for (key, value) in vars {
        std::env::set_var(key, value);
    }

    let result = f();

    env_state.restore();
    result
}

/// `<resource>` as read back from XML.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ParsedResource {
    pub identifier: String,
    pub href: Option<String>,
    pub scorm_type: String,
    pub files: Vec<String>,
    pub dependencies: Vec<String>,
}

/// The parts of a manifest the tests care about.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ParsedManifest {
    pub identifier: String,
    /// (identifier, identifierref)
    pub items: Vec<(String, String)>,
    pub titles: Vec<String>,
    pub resources: Vec<ParsedResource>,
}

fn attr(e: &quick_xml::events::BytesStart<'_>, name: &[u8]) -> Option<String> {
    e.attributes()
        .flatten()
        .find(|a| a.key.as_ref() == name)
        .map(|a| String::from_utf8(a.value.to_vec()).unwrap())
}

/// Parse a manifest; panics on malformed XML.
pub fn parse_manifest(xml: &str) -> ParsedManifest {
    let mut reader = Reader::from_str(xml);
    let mut parsed = ParsedManifest::default();
    let mut in_title = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) | Ok(Event::Empty(e)) => match e.name().as_ref() {
                b"manifest" => parsed.identifier = attr(&e, b"identifier").unwrap(),
                b"item" => parsed.items.push((
                    attr(&e, b"identifier").unwrap(),
                    attr(&e, b"identifierref").unwrap(),
                )),
                b"title" => in_title = true,
                b"resource" => parsed.resources.push(ParsedResource {
                    identifier: attr(&e, b"identifier").unwrap(),
                    href: attr(&e, b"href"),
                    scorm_type: attr(&e, b"adlcp:scormType").unwrap(),
                    ..Default::default()
                }),
                b"file" => parsed
                    .resources
                    .last_mut()
                    .unwrap()
                    .files
                    .push(attr(&e, b"href").unwrap()),
                b"dependency" => parsed
                    .resources
                    .last_mut()
                    .unwrap()
                    .dependencies
                    .push(attr(&e, b"identifierref").unwrap()),
                _ => {}
            },
            Ok(Event::Text(t)) if in_title => {
                parsed.titles.push(String::from_utf8(t.to_vec()).unwrap());
            }
            Ok(Event::End(e)) if e.name().as_ref() == b"title" => in_title = false,
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => panic!("malformed manifest: {}", e),
        }
    }
    parsed
}

/// Entry names of a zip archive, in archive order.
pub fn zip_entries(path: &Path) -> Vec<String> {
    let mut archive = zip::ZipArchive::new(fs::File::open(path).unwrap()).unwrap();
    (0..archive.len())
        .map(|i| archive.by_index(i).unwrap().name().to_string())
        .collect()
}
