//! Colorant catalog.
//!
//! Scans the color space resources of every page and records each
//! Separation color space held in a shared object. Resource keys such as
//! `/CS0` only mean something inside one page's resource scope, so besides
//! the deduplicated entry list the catalog keeps a per-page [`PageView`]
//! mapping keys to the shared objects they name.

use crate::document::DocumentModel;
use crate::object::{Object, ObjectRef};
use std::collections::{HashMap, HashSet};

/// A Separation color space found in the document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorantEntry {
    /// Decoded colorant name in its original casing, e.g. `PANTONE 123`
    pub name: String,
    /// Resource key under which the color space was first seen
    pub color_space_id: String,
    /// Object holding the `[/Separation /Name alternate tint]` array
    pub source: ObjectRef,
}

impl ColorantEntry {
    /// Whether this entry answers to `requested`.
    pub fn matches(&self, requested: &str) -> bool {
        names_match(&self.name, requested)
    }
}

/// Page-local mapping from color space resource key to its source object.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageView {
    sources: HashMap<String, ObjectRef>,
}

impl PageView {
    /// Source object of the color space named `key` on this page.
    pub fn source(&self, key: &str) -> Option<ObjectRef> {
        self.sources.get(key).copied()
    }

    /// Record that `key` names `source` on this page.
    pub fn insert(&mut self, key: impl Into<String>, source: ObjectRef) {
        self.sources.insert(key.into(), source);
    }

    /// Number of mapped keys.
    pub fn len(&self) -> usize {
        self.sources.len()
    }

    /// Whether the page uses no catalogued color space.
    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }
}

/// Catalog entries selected for one requested name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    /// The name as the user typed it
    pub requested: String,
    /// Every catalog entry whose decoded name matches; never empty
    pub entries: Vec<ColorantEntry>,
}

impl Selection {
    /// Display name used for output files: the first entry's decoded name.
    pub fn colorant_name(&self) -> &str {
        self.entries
            .first()
            .map(|e| e.name.as_str())
            .unwrap_or(self.requested.as_str())
    }
}

/// Outcome of matching requested names against the catalog.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Resolution {
    /// Requests that matched, in request order
    pub selected: Vec<Selection>,
    /// Requests that matched nothing, in request order
    pub unresolved: Vec<String>,
}

/// All Separation color spaces of a document. Read-only once built.
#[derive(Debug, Clone, Default)]
pub struct ColorantCatalog {
    entries: Vec<ColorantEntry>,
    page_views: HashMap<ObjectRef, PageView>,
}

impl ColorantCatalog {
    /// Build the catalog for every page of `doc`.
    ///
    /// Anomalies (unreadable resources, dangling references, arrays of the
    /// wrong shape) exclude the offending resource and are logged at debug
    /// level; they never fail the build.
    pub fn build<D: DocumentModel + ?Sized>(doc: &D) -> Self {
        let mut catalog = Self::default();
        let mut seen: HashSet<ObjectRef> = HashSet::new();

        for (index, page) in doc.page_ids().into_iter().enumerate() {
            let resources = match doc.color_space_resources(page) {
                Ok(resources) => resources,
                Err(e) => {
                    log::debug!("Page {}: color space resources unreadable: {}", index + 1, e);
                    continue;
                },
            };

            let mut view = PageView::default();
            for (key, value) in resources {
                let Some(reference) = value.as_reference() else {
                    log::debug!("Page {}: /{} is an inline color space, skipped", index + 1, key);
                    continue;
                };
                let Some(definition) = doc.resolve(reference) else {
                    log::debug!("Page {}: /{} points to missing object {}", index + 1, key, reference);
                    continue;
                };
                let Some(name) = separation_colorant(&definition) else {
                    log::debug!("Page {}: /{} ({}) is not a Separation", index + 1, key, reference);
                    continue;
                };

                if seen.insert(reference) {
                    log::debug!("Colorant '{}' as /{} in {}", name, key, reference);
                    catalog.entries.push(ColorantEntry {
                        name,
                        color_space_id: key.clone(),
                        source: reference,
                    });
                }
                view.insert(key, reference);
            }

            if !view.is_empty() {
                catalog.page_views.insert(page, view);
            }
        }

        catalog
    }

    /// Entries in discovery order.
    pub fn entries(&self) -> &[ColorantEntry] {
        &self.entries
    }

    /// Number of distinct Separation color spaces.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the document has no Separation color space.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The key-to-source mapping for one page, if it uses any colorant.
    pub fn page_view(&self, page: ObjectRef) -> Option<&PageView> {
        self.page_views.get(&page)
    }

    /// Entries whose decoded name equals `requested`, ignoring case.
    pub fn find(&self, requested: &str) -> Vec<&ColorantEntry> {
        self.entries.iter().filter(|e| e.matches(requested)).collect()
    }

    /// Match requested names against the catalog.
    ///
    /// Repeated requests for the same name collapse into the first one.
    pub fn resolve<S: AsRef<str>>(&self, requested: &[S]) -> Resolution {
        let mut resolution = Resolution::default();
        let mut handled: Vec<&str> = Vec::new();

        for name in requested {
            let name = name.as_ref();
            if handled.iter().any(|h| names_match(h, name)) {
                log::debug!("Colorant '{}' requested more than once", name);
                continue;
            }
            handled.push(name);

            let entries: Vec<ColorantEntry> = self.find(name).into_iter().cloned().collect();
            if entries.is_empty() {
                resolution.unresolved.push(name.to_string());
            } else {
                resolution.selected.push(Selection {
                    requested: name.to_string(),
                    entries,
                });
            }
        }

        resolution
    }
}

/// Colorant name of a `[/Separation /Name ...]` array.
///
/// Returns `None` for anything else: non-arrays, arrays shorter than two,
/// other color space families, or a colorant that is not a name.
pub fn separation_colorant(definition: &Object) -> Option<String> {
    let array = definition.as_array()?;
    if array.len() < 2 || array[0].as_name()? != "Separation" {
        return None;
    }
    array[1].as_name().map(colorant_display_name)
}

/// Text of a colorant name as loaded by the document model.
///
/// The document model has already resolved `#XX` escapes, so the bytes are
/// only read as UTF-8 here; a literal `#` stays as it is.
///
/// ```
/// # use pdf_spots::catalog::colorant_display_name;
/// assert_eq!(colorant_display_name("PANTONE 123"), "PANTONE 123");
/// assert_eq!(colorant_display_name("Spot#20A"), "Spot#20A");
/// assert_eq!(colorant_display_name("Gr\u{c3}\u{bc}n"), "Gr\u{fc}n");
/// ```
pub fn colorant_display_name(raw: &str) -> String {
    let bytes: Vec<u8> = raw.chars().map(|c| c as u32 as u8).collect();
    String::from_utf8_lossy(&bytes).into_owned()
}

/// Exact name comparison, ignoring case.
pub fn names_match(a: &str, b: &str) -> bool {
    a == b || a.to_lowercase() == b.to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{Error, Result};
    use std::path::Path;

    /// In-memory document: pages as lists of color space resources.
    struct FakeDocument {
        pages: Vec<(ObjectRef, Vec<(String, Object)>)>,
        objects: HashMap<ObjectRef, Object>,
    }

    impl DocumentModel for FakeDocument {
        fn page_ids(&self) -> Vec<ObjectRef> {
            self.pages.iter().map(|(id, _)| *id).collect()
        }

        fn color_space_resources(&self, page: ObjectRef) -> Result<Vec<(String, Object)>> {
            self.pages
                .iter()
                .find(|(id, _)| *id == page)
                .map(|(_, resources)| resources.clone())
                .ok_or(Error::PageNotFound(page))
        }

        fn resolve(&self, reference: ObjectRef) -> Option<Object> {
            self.objects.get(&reference).cloned()
        }

        fn page_content(&self, _page: ObjectRef) -> Result<Vec<u8>> {
            Ok(Vec::new())
        }

        fn set_page_content(&mut self, _page: ObjectRef, _content: Vec<u8>) -> Result<()> {
            Ok(())
        }

        fn rename_colorant(&mut self, _reference: ObjectRef, _colorant: &str) -> Result<()> {
            Ok(())
        }

        fn save(&mut self, _path: &Path) -> Result<()> {
            Ok(())
        }
    }

    fn separation(name: &str) -> Object {
        Object::Array(vec![
            Object::Name("Separation".into()),
            Object::Name(name.into()),
            Object::Name("DeviceCMYK".into()),
            Object::Null,
        ])
    }

    fn reference(id: u32) -> Object {
        Object::Reference(ObjectRef::new(id, 0))
    }

    fn sample_document() -> FakeDocument {
        let mut objects = HashMap::new();
        objects.insert(ObjectRef::new(10, 0), separation("PANTONE 123"));
        objects.insert(ObjectRef::new(11, 0), separation("Gold"));
        objects.insert(
            ObjectRef::new(12, 0),
            Object::Array(vec![Object::Name("ICCBased".into()), reference(99)]),
        );
        objects.insert(ObjectRef::new(13, 0), Object::Integer(5));

        FakeDocument {
            pages: vec![
                (
                    ObjectRef::new(1, 0),
                    vec![
                        ("CS0".into(), reference(10)),
                        ("CS1".into(), reference(12)),
                        ("CS2".into(), separation("Inline")),
                        ("CS3".into(), reference(404)),
                        ("CS4".into(), reference(13)),
                    ],
                ),
                (
                    ObjectRef::new(2, 0),
                    vec![("Cs7".into(), reference(10)), ("Cs8".into(), reference(11))],
                ),
            ],
            objects,
        }
    }

    #[test]
    fn test_build_collects_separations_once() {
        let catalog = ColorantCatalog::build(&sample_document());
        let names: Vec<&str> = catalog.entries().iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["PANTONE 123", "Gold"]);
        assert_eq!(catalog.entries()[0].color_space_id, "CS0");
        assert_eq!(catalog.entries()[0].source, ObjectRef::new(10, 0));
    }

    #[test]
    fn test_page_views_are_page_local() {
        let catalog = ColorantCatalog::build(&sample_document());
        let first = catalog.page_view(ObjectRef::new(1, 0)).unwrap();
        let second = catalog.page_view(ObjectRef::new(2, 0)).unwrap();

        assert_eq!(first.len(), 1);
        assert_eq!(first.source("CS0"), Some(ObjectRef::new(10, 0)));
        assert_eq!(second.source("CS0"), None);
        assert_eq!(second.source("Cs7"), Some(ObjectRef::new(10, 0)));
        assert_eq!(second.source("Cs8"), Some(ObjectRef::new(11, 0)));
    }

    #[test]
    fn test_page_without_colorants_has_no_view() {
        let mut doc = sample_document();
        doc.pages.push((ObjectRef::new(3, 0), Vec::new()));
        let catalog = ColorantCatalog::build(&doc);
        assert!(catalog.page_view(ObjectRef::new(3, 0)).is_none());
    }

    #[test]
    fn test_resolve_decoded_case_insensitive() {
        let catalog = ColorantCatalog::build(&sample_document());
        let resolution = catalog.resolve(&["pantone 123", "GOLD", "Silver"]);
        assert_eq!(resolution.selected.len(), 2);
        assert_eq!(resolution.selected[0].colorant_name(), "PANTONE 123");
        assert_eq!(resolution.selected[1].requested, "GOLD");
        assert_eq!(resolution.unresolved, vec!["Silver".to_string()]);
    }

    #[test]
    fn test_resolve_rejects_substrings() {
        let catalog = ColorantCatalog::build(&sample_document());
        let resolution = catalog.resolve(&["PANTONE", "123"]);
        assert!(resolution.selected.is_empty());
        assert_eq!(resolution.unresolved.len(), 2);
    }

    #[test]
    fn test_resolve_collapses_repeated_requests() {
        let catalog = ColorantCatalog::build(&sample_document());
        let resolution = catalog.resolve(&["Gold", "gold"]);
        assert_eq!(resolution.selected.len(), 1);
        assert!(resolution.unresolved.is_empty());
    }

    #[test]
    fn test_same_name_in_two_objects_selects_both() {
        let mut doc = sample_document();
        doc.objects.insert(ObjectRef::new(20, 0), separation("Gold"));
        doc.pages[0].1.push(("CS9".into(), reference(20)));

        let catalog = ColorantCatalog::build(&doc);
        let resolution = catalog.resolve(&["gold"]);
        assert_eq!(resolution.selected[0].entries.len(), 2);
    }

    #[test]
    fn test_separation_colorant_shapes() {
        assert_eq!(separation_colorant(&separation("Cyan")), Some("Cyan".to_string()));
        assert_eq!(separation_colorant(&Object::Integer(1)), None);
        assert_eq!(
            separation_colorant(&Object::Array(vec![Object::Name("Separation".into())])),
            None
        );
        assert_eq!(
            separation_colorant(&Object::Array(vec![
                Object::Name("Separation".into()),
                Object::String(b"Cyan".to_vec()),
            ])),
            None
        );
    }

    #[test]
    fn test_stored_names_are_not_decoded_twice() {
        assert_eq!(separation_colorant(&separation("Spot#20A")), Some("Spot#20A".to_string()));
    }

    #[test]
    fn test_names_match() {
        assert!(names_match("PANTONE 123", "pantone 123"));
        assert!(!names_match("PANTONE 123", "PANTONE 1234"));
    }
}
