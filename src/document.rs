//! Document model boundary.
//!
//! Loading, object resolution, page enumeration and saving are delegated to
//! `lopdf`. The rest of the crate only talks to the [`DocumentModel`] trait,
//! which exposes the handful of operations spot extraction needs.

use crate::error::{Error, Result};
use crate::object::{Object, ObjectRef};
use std::path::Path;

/// Maximum depth followed through `/Parent` links when looking up inherited
/// page attributes.
const MAX_INHERITANCE_DEPTH: usize = 64;

/// Operations on a loaded PDF used by cataloguing and rewriting.
pub trait DocumentModel {
    /// Page object references in document order.
    fn page_ids(&self) -> Vec<ObjectRef>;

    /// Entries of the page's effective `/ColorSpace` resource dictionary.
    ///
    /// Keys are resource names as loaded, `#XX` escapes resolved. Values
    /// are returned as stored, so a color space held in its own object
    /// shows up as [`Object::Reference`].
    /// A page without color space resources yields an empty list.
    fn color_space_resources(&self, page: ObjectRef) -> Result<Vec<(String, Object)>>;

    /// Look up an indirect object.
    fn resolve(&self, reference: ObjectRef) -> Option<Object>;

    /// Decoded content of a page, all content streams concatenated.
    fn page_content(&self, page: ObjectRef) -> Result<Vec<u8>>;

    /// Replace the content of a page with a single stream.
    fn set_page_content(&mut self, page: ObjectRef, content: Vec<u8>) -> Result<()>;

    /// Rename the colorant of the Separation array held by `reference`.
    fn rename_colorant(&mut self, reference: ObjectRef, colorant: &str) -> Result<()>;

    /// Write the whole document to `path`.
    fn save(&mut self, path: &Path) -> Result<()>;
}

/// [`DocumentModel`] backed by a `lopdf::Document`.
#[derive(Debug, Clone)]
pub struct LopdfDocument {
    inner: lopdf::Document,
    pages: Vec<ObjectRef>,
    compress: bool,
}

impl LopdfDocument {
    /// Load a document from disk.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        log::debug!("Loading {}", path.display());
        let inner = lopdf::Document::load(path)?;
        Ok(Self::from_document(inner))
    }

    /// Load a document from memory.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let inner = lopdf::Document::load_mem(data)?;
        Ok(Self::from_document(inner))
    }

    /// Wrap an already loaded document.
    pub fn from_document(inner: lopdf::Document) -> Self {
        let pages = inner.get_pages().values().map(|&id| ObjectRef::from(id)).collect();
        Self {
            inner,
            pages,
            compress: true,
        }
    }

    /// Whether streams are compressed when saving (default `true`).
    pub fn with_compression(mut self, compress: bool) -> Self {
        self.compress = compress;
        self
    }

    /// The wrapped document.
    pub fn inner(&self) -> &lopdf::Document {
        &self.inner
    }

    fn check_page(&self, page: ObjectRef) -> Result<lopdf::ObjectId> {
        if self.pages.contains(&page) {
            Ok(page.into())
        } else {
            Err(Error::PageNotFound(page))
        }
    }

    fn deref<'a>(&'a self, obj: &'a lopdf::Object) -> Result<&'a lopdf::Object> {
        match obj {
            lopdf::Object::Reference(id) => Ok(self.inner.get_object(*id)?),
            other => Ok(other),
        }
    }

    /// Find `key` on the page or the nearest ancestor that carries it.
    fn inherited(&self, page: lopdf::ObjectId, key: &[u8]) -> Result<Option<&lopdf::Object>> {
        let mut current = page;
        for _ in 0..MAX_INHERITANCE_DEPTH {
            let dict = self.inner.get_object(current)?.as_dict()?;
            if let Ok(value) = dict.get(key) {
                return Ok(Some(value));
            }
            match dict.get(b"Parent") {
                Ok(lopdf::Object::Reference(parent)) => current = *parent,
                _ => return Ok(None),
            }
        }
        log::debug!("Page tree deeper than {} levels above {:?}", MAX_INHERITANCE_DEPTH, page);
        Ok(None)
    }
}

impl DocumentModel for LopdfDocument {
    fn page_ids(&self) -> Vec<ObjectRef> {
        self.pages.clone()
    }

    fn color_space_resources(&self, page: ObjectRef) -> Result<Vec<(String, Object)>> {
        let page_id = self.check_page(page)?;
        let resources = match self.inherited(page_id, b"Resources")? {
            Some(obj) => self.deref(obj)?.as_dict()?,
            None => return Ok(Vec::new()),
        };
        let color_spaces = match resources.get(b"ColorSpace") {
            Ok(obj) => match self.deref(obj)?.as_dict() {
                Ok(dict) => dict,
                Err(_) => {
                    log::debug!("Page {}: /ColorSpace is not a dictionary", page);
                    return Ok(Vec::new());
                },
            },
            Err(_) => return Ok(Vec::new()),
        };

        Ok(color_spaces
            .iter()
            .map(|(key, value)| {
                let key: String = key.iter().map(|&b| char::from(b)).collect();
                (key, Object::from_lopdf(value))
            })
            .collect())
    }

    fn resolve(&self, reference: ObjectRef) -> Option<Object> {
        self.inner.get_object(reference.into()).ok().map(Object::from_lopdf)
    }

    fn page_content(&self, page: ObjectRef) -> Result<Vec<u8>> {
        let page_id = self.check_page(page)?;
        Ok(self.inner.get_page_content(page_id)?)
    }

    fn set_page_content(&mut self, page: ObjectRef, content: Vec<u8>) -> Result<()> {
        let page_id = self.check_page(page)?;
        self.inner.change_page_content(page_id, content)?;
        Ok(())
    }

    fn rename_colorant(&mut self, reference: ObjectRef, colorant: &str) -> Result<()> {
        let obj = self
            .inner
            .get_object_mut(reference.into())
            .map_err(|_| Error::ObjectNotFound(reference))?;
        let array = match obj {
            lopdf::Object::Array(array) if array.len() >= 2 => array,
            other => {
                return Err(Error::InvalidObjectType {
                    expected: "Separation array".to_string(),
                    found: Object::from_lopdf(other).type_name().to_string(),
                });
            },
        };
        array[1] = lopdf::Object::Name(colorant.chars().map(|c| c as u32 as u8).collect());
        Ok(())
    }

    fn save(&mut self, path: &Path) -> Result<()> {
        if self.compress {
            self.inner.compress();
        }
        self.inner.save(path)?;
        log::debug!("Wrote {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::{Stream, dictionary};

    /// One page under a Pages node that carries the resources.
    fn inherited_resources_doc() -> LopdfDocument {
        resources_doc_with_key("CS0")
    }

    fn resources_doc_with_key(key: &str) -> LopdfDocument {
        let mut doc = lopdf::Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let sep_id = doc.add_object(vec![
            lopdf::Object::Name(b"Separation".to_vec()),
            lopdf::Object::Name(b"PANTONE 123".to_vec()),
            lopdf::Object::Name(b"DeviceCMYK".to_vec()),
            lopdf::Object::Null,
        ]);
        let content_id = doc.add_object(Stream::new(dictionary! {}, b"/CS0 cs 1 scn".to_vec()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        doc.objects.insert(
            pages_id,
            lopdf::Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => vec![page_id.into()],
                "Count" => 1,
                "Resources" => dictionary! {
                    "ColorSpace" => dictionary! { key => sep_id },
                },
            }),
        );
        let catalog_id = doc.add_object(dictionary! { "Type" => "Catalog", "Pages" => pages_id });
        doc.trailer.set("Root", catalog_id);
        LopdfDocument::from_document(doc)
    }

    #[test]
    fn test_page_ids() {
        let doc = inherited_resources_doc();
        assert_eq!(doc.page_ids().len(), 1);
    }

    #[test]
    fn test_inherited_color_space_resources() {
        let doc = inherited_resources_doc();
        let page = doc.page_ids()[0];
        let resources = doc.color_space_resources(page).unwrap();
        assert_eq!(resources.len(), 1);
        assert_eq!(resources[0].0, "CS0");
        let reference = resources[0].1.as_reference().unwrap();

        let resolved = doc.resolve(reference).unwrap();
        let array = resolved.as_array().unwrap();
        assert_eq!(array[0].as_name(), Some("Separation"));
    }

    #[test]
    fn test_resource_keys_are_taken_as_loaded() {
        let doc = resources_doc_with_key("CS#41");
        let page = doc.page_ids()[0];
        let resources = doc.color_space_resources(page).unwrap();
        assert_eq!(resources[0].0, "CS#41");
    }

    #[test]
    fn test_unknown_page_is_rejected() {
        let doc = inherited_resources_doc();
        let bogus = ObjectRef::new(9999, 0);
        assert!(matches!(doc.color_space_resources(bogus), Err(Error::PageNotFound(_))));
        assert!(matches!(doc.page_content(bogus), Err(Error::PageNotFound(_))));
    }

    #[test]
    fn test_page_content_round_trip() {
        let mut doc = inherited_resources_doc();
        let page = doc.page_ids()[0];
        assert_eq!(doc.page_content(page).unwrap(), b"/CS0 cs 1 scn");

        doc.set_page_content(page, b"0 0 m\n".to_vec()).unwrap();
        assert_eq!(doc.page_content(page).unwrap(), b"0 0 m\n");
    }

    #[test]
    fn test_rename_colorant() {
        let mut doc = inherited_resources_doc();
        let page = doc.page_ids()[0];
        let reference = doc.color_space_resources(page).unwrap()[0].1.as_reference().unwrap();

        doc.rename_colorant(reference, "None").unwrap();
        let resolved = doc.resolve(reference).unwrap();
        assert_eq!(resolved.as_array().unwrap()[1].as_name(), Some("None"));
    }

    #[test]
    fn test_rename_colorant_rejects_non_array() {
        let mut doc = inherited_resources_doc();
        let page = doc.page_ids()[0];
        assert!(doc.rename_colorant(page, "None").is_err());
    }

    #[test]
    fn test_resolve_missing_object() {
        let doc = inherited_resources_doc();
        assert!(doc.resolve(ObjectRef::new(4242, 0)).is_none());
    }
}
