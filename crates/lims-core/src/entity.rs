use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use chrono::NaiveDate;
use lims_state::item::CacheItem;
use lims_xml::{Element, Name, Path};

use crate::{
    error::{LimsError, ParseError},
    Lims,
};

/// A type representing one kind of server record.
///
/// Implementations are declared by the entity macros, which pair each type
/// with its resource segment (`samples`, `projects`, ...) and its qualified
/// document root. Entity values are cheap clones of one shared instance per
/// URI; construct them only through [`Lims::resolve`].
pub trait Entity: CacheItem + Clone {
    /// Resource segment below the API root, e.g. `samples`.
    const URI_SEGMENT: &'static str;
    /// Schema prefix of the document root, e.g. `smp`.
    const ROOT_PREFIX: &'static str;
    /// Local name of the document root, e.g. `sample`.
    const ROOT_TAG: &'static str;

    #[allow(missing_docs)]
    fn from_handle(handle: EntityHandle) -> Self;
    #[allow(missing_docs)]
    fn handle(&self) -> &EntityHandle;

    /// The qualified name of this type's document root.
    fn root_name() -> Name {
        Name::qualified(Self::ROOT_PREFIX, Self::ROOT_TAG)
            .expect("entity root prefixes are part of the schema table")
    }
}

/// Load/save lifecycle operations shared by every entity type.
#[async_trait]
pub trait EntityExt: Entity {
    /// The canonical URI identifying this record. Immutable.
    fn uri(&self) -> &str {
        self.handle().uri()
    }

    /// The LIMS id, obtained from the URI.
    fn id(&self) -> &str {
        self.handle().id()
    }

    /// Whether the record's representation has been fetched.
    fn is_loaded(&self) -> bool {
        self.handle().is_loaded()
    }

    /// Whether the record has unsaved local edits.
    fn is_dirty(&self) -> bool {
        self.handle().is_dirty()
    }

    /// Whether two values are handles to the same in-memory instance.
    fn same_instance(&self, other: &Self) -> bool {
        self.handle().ptr_eq(other.handle())
    }

    /// Fetch the representation if it has not been fetched yet.
    async fn load(&self) -> Result<(), LimsError> {
        self.handle().load(false).await
    }

    /// Re-fetch the representation, discarding any unsaved local edits.
    /// Callers that care must check [`EntityExt::is_dirty`] first.
    async fn reload(&self) -> Result<(), LimsError> {
        self.handle().load(true).await
    }

    /// PUT the local representation back to the server.
    ///
    /// A no-op when there are no unsaved edits. On a conflict the local tree
    /// and the dirty flag are left untouched, so the caller can reload and
    /// retry or overwrite.
    async fn save(&self) -> Result<(), LimsError> {
        self.handle().save().await
    }
}

#[async_trait]
impl<T: Entity> EntityExt for T {}

#[derive(Debug, Default)]
struct DocumentState {
    tree: Option<Element>,
    dirty: bool,
}

struct HandleInner {
    lims: Lims,
    uri: String,
    root: Name,
    state: RwLock<DocumentState>,
}

/// The shared state behind one entity instance: its identity, its
/// lazily-populated XML tree and its dirty flag.
///
/// Attribute reads force a load of the owning record on first use, and so
/// does the first write: edits always start from the server's document,
/// never from an empty one. Once loaded, writes mutate the held tree in
/// place and mark it dirty; nothing is sent until [`EntityHandle::save`].
#[derive(Clone)]
pub struct EntityHandle {
    inner: Arc<HandleInner>,
}

impl std::fmt::Debug for EntityHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EntityHandle")
            .field("uri", &self.inner.uri)
            .field("loaded", &self.is_loaded())
            .field("dirty", &self.is_dirty())
            .finish()
    }
}

impl EntityHandle {
    pub(crate) fn new(lims: Lims, uri: &str, root: Name) -> Self {
        EntityHandle {
            inner: Arc::new(HandleInner {
                lims,
                uri: uri.to_owned(),
                root,
                state: RwLock::new(DocumentState::default()),
            }),
        }
    }

    #[allow(missing_docs)]
    pub fn uri(&self) -> &str {
        &self.inner.uri
    }

    #[allow(missing_docs)]
    pub fn lims(&self) -> &Lims {
        &self.inner.lims
    }

    /// The LIMS id: the last path segment of the URI, query excluded.
    pub fn id(&self) -> &str {
        let path = self
            .inner
            .uri
            .split_once('?')
            .map(|(path, _)| path)
            .unwrap_or(&self.inner.uri);
        path.rsplit('/').next().unwrap_or(path)
    }

    /// A query parameter carried by the URI, e.g. an artifact's `state`.
    pub fn query_param(&self, name: &str) -> Option<String> {
        let url = url::Url::parse(&self.inner.uri).ok()?;
        url.query_pairs()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.into_owned())
    }

    #[allow(missing_docs)]
    pub fn is_loaded(&self) -> bool {
        self.read_state().tree.is_some()
    }

    #[allow(missing_docs)]
    pub fn is_dirty(&self) -> bool {
        self.read_state().dirty
    }

    /// Whether two handles share the same underlying instance.
    pub fn ptr_eq(&self, other: &EntityHandle) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    fn read_state(&self) -> std::sync::RwLockReadGuard<'_, DocumentState> {
        self.inner.state.read().expect("RwLock is not poisoned")
    }

    fn write_state(&self) -> std::sync::RwLockWriteGuard<'_, DocumentState> {
        self.inner.state.write().expect("RwLock is not poisoned")
    }

    /// Fetch and parse the record's representation, requiring the expected
    /// document root.
    ///
    /// A no-op when already loaded, unless `force` is set. A forced load
    /// discards unsaved local edits.
    pub async fn load(&self, force: bool) -> Result<(), LimsError> {
        if !force && self.is_loaded() {
            return Ok(());
        }
        let api = self.inner.lims.internal.get_api_configuration();
        let tree = api.get_xml(&self.inner.uri, &[]).await?;
        if *tree.name() != self.inner.root {
            return Err(ParseError::UnexpectedRoot(tree.name().local.clone()).into());
        }
        let mut state = self.write_state();
        state.tree = Some(tree);
        state.dirty = false;
        Ok(())
    }

    /// Serialize the tree and PUT it back to the record's URI.
    ///
    /// A no-op when there are no unsaved edits. On any failure, including a
    /// conflict, the local tree and the dirty flag stay as they were.
    pub async fn save(&self) -> Result<(), LimsError> {
        let body = {
            let state = self.read_state();
            if !state.dirty {
                return Ok(());
            }
            state
                .tree
                .clone()
                .expect("a dirty entity always has a tree")
        };
        let api = self.inner.lims.internal.get_api_configuration();
        api.put_xml(&self.inner.uri, &body).await?;
        self.write_state().dirty = false;
        Ok(())
    }

    /// Install a representation obtained out of band (creation responses,
    /// batch retrieval), leaving the record loaded and clean.
    pub fn install_tree(&self, tree: Element) {
        let mut state = self.write_state();
        state.tree = Some(tree);
        state.dirty = false;
    }

    /// Run a read projection against the loaded tree, loading it first if
    /// this record has never been fetched.
    pub async fn with_tree<R>(&self, f: impl FnOnce(&Element) -> R) -> Result<R, LimsError> {
        self.load(false).await?;
        let state = self.read_state();
        let tree = state.tree.as_ref().expect("tree is present after load");
        Ok(f(tree))
    }

    /// Run a mutation against the tree and mark the record dirty on success.
    ///
    /// Loads the record first when it has never been fetched, so an edit
    /// can never start from an empty document and a later save can never
    /// drop fields the server holds. A failed mutation leaves the record
    /// loaded and clean.
    pub async fn mutate<R>(
        &self,
        f: impl FnOnce(&mut Element) -> Result<R, LimsError>,
    ) -> Result<R, LimsError> {
        self.load(false).await?;
        let mut state = self.write_state();
        let tree = state.tree.as_mut().expect("tree is present after load");
        let result = f(tree)?;
        state.dirty = true;
        Ok(result)
    }

    // ---- Typed projections used by the generated accessors ----

    /// Text content of the element at `path`, or `None` when absent.
    pub async fn text(&self, path: &str) -> Result<Option<String>, LimsError> {
        let path = parse_path(path)?;
        self.with_tree(|tree| {
            tree.find(&path)
                .and_then(|node| node.text())
                .map(str::to_owned)
        })
        .await
    }

    /// Set the text at `path`, creating missing intermediate elements.
    pub async fn set_text(&self, path: &str, value: &str) -> Result<(), LimsError> {
        let path = parse_path(path)?;
        self.mutate(|tree| {
            tree.find_or_create(&path).set_text(value);
            Ok(())
        })
        .await
    }

    /// Text content of the document root itself.
    pub async fn root_text(&self) -> Result<Option<String>, LimsError> {
        self.with_tree(|tree| tree.text().map(str::to_owned)).await
    }

    #[allow(missing_docs)]
    pub async fn set_root_text(&self, value: &str) -> Result<(), LimsError> {
        self.mutate(|tree| {
            tree.set_text(value);
            Ok(())
        })
        .await
    }

    #[allow(missing_docs)]
    pub async fn integer(&self, path: &str) -> Result<Option<i64>, LimsError> {
        match self.text(path).await? {
            Some(text) => Ok(Some(decode_integer(&text)?)),
            None => Ok(None),
        }
    }

    #[allow(missing_docs)]
    pub async fn set_integer(&self, path: &str, value: i64) -> Result<(), LimsError> {
        self.set_text(path, &value.to_string()).await
    }

    #[allow(missing_docs)]
    pub async fn boolean(&self, path: &str) -> Result<Option<bool>, LimsError> {
        match self.text(path).await? {
            Some(text) => Ok(Some(decode_boolean(&text)?)),
            None => Ok(None),
        }
    }

    #[allow(missing_docs)]
    pub async fn set_boolean(&self, path: &str, value: bool) -> Result<(), LimsError> {
        self.set_text(path, if value { "true" } else { "false" }).await
    }

    #[allow(missing_docs)]
    pub async fn date(&self, path: &str) -> Result<Option<NaiveDate>, LimsError> {
        match self.text(path).await? {
            Some(text) => Ok(Some(decode_date(&text)?)),
            None => Ok(None),
        }
    }

    #[allow(missing_docs)]
    pub async fn set_date(&self, path: &str, value: NaiveDate) -> Result<(), LimsError> {
        self.set_text(path, &value.format("%Y-%m-%d").to_string())
            .await
    }

    /// A required attribute of the document root.
    pub async fn root_attr(&self, attribute: &'static str) -> Result<String, LimsError> {
        let found = self
            .with_tree(|tree| {
                (
                    tree.attr(attribute).map(str::to_owned),
                    tree.name().local.clone(),
                )
            })
            .await?;
        match found {
            (Some(value), _) => Ok(value),
            (None, element) => Err(ParseError::MissingAttribute { element, attribute }.into()),
        }
    }

    /// Text of every element matching `path`, in document order.
    pub async fn text_list(&self, path: &str) -> Result<Vec<String>, LimsError> {
        let path = parse_path(path)?;
        self.with_tree(|tree| {
            tree.find_all(&path)
                .into_iter()
                .map(|node| node.text().unwrap_or_default().to_owned())
                .collect()
        })
        .await
    }

    /// The `uri` attribute of the element at `path`, or `None` when absent.
    pub async fn ref_uri(&self, path: &str) -> Result<Option<String>, LimsError> {
        let parsed = parse_path(path)?;
        let found = self
            .with_tree(|tree| tree.find(&parsed).map(|node| node.attr("uri").map(str::to_owned)))
            .await?;
        match found {
            None => Ok(None),
            Some(Some(uri)) => Ok(Some(uri)),
            Some(None) => Err(ParseError::MissingAttribute {
                element: path.to_owned(),
                attribute: "uri",
            }
            .into()),
        }
    }

    /// Point the reference at `path` to the record identified by `uri`.
    pub async fn set_ref_uri(&self, path: &str, uri: &str) -> Result<(), LimsError> {
        let path = parse_path(path)?;
        self.mutate(|tree| {
            tree.find_or_create(&path).set_attr("uri", uri);
            Ok(())
        })
        .await
    }

    /// The `uri` attributes of every element matching `path`, in document
    /// order. An element without a `uri` attribute is a schema violation.
    pub async fn ref_uris(&self, path: &str) -> Result<Vec<String>, LimsError> {
        let parsed = parse_path(path)?;
        let uris = self
            .with_tree(|tree| {
                tree.find_all(&parsed)
                    .into_iter()
                    .map(|node| node.attr("uri").map(str::to_owned))
                    .collect::<Vec<_>>()
            })
            .await?;
        uris.into_iter()
            .map(|uri| {
                uri.ok_or_else(|| {
                    ParseError::MissingAttribute {
                        element: path.to_owned(),
                        attribute: "uri",
                    }
                    .into()
                })
            })
            .collect()
    }
}

fn parse_path(path: &str) -> Result<Path, LimsError> {
    Ok(Path::parse(path).map_err(ParseError::from)?)
}

pub(crate) fn decode_integer(text: &str) -> Result<i64, ParseError> {
    text.trim().parse().map_err(|_| ParseError::Malformed {
        kind: "integer",
        value: text.to_owned(),
    })
}

pub(crate) fn decode_boolean(text: &str) -> Result<bool, ParseError> {
    match text.trim().to_ascii_lowercase().as_str() {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(ParseError::Malformed {
            kind: "boolean",
            value: text.to_owned(),
        }),
    }
}

pub(crate) fn decode_date(text: &str) -> Result<NaiveDate, ParseError> {
    NaiveDate::parse_from_str(text.trim(), "%Y-%m-%d").map_err(|_| ParseError::Malformed {
        kind: "date",
        value: text.to_owned(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codecs_reject_malformed_values() {
        assert_eq!(decode_integer(" 42 ").unwrap(), 42);
        assert!(decode_integer("4.2").is_err());
        assert!(decode_boolean("yes").is_err());
        assert!(decode_boolean("True").unwrap());
        assert_eq!(
            decode_date("2012-05-01").unwrap(),
            NaiveDate::from_ymd_opt(2012, 5, 1).unwrap()
        );
        assert!(decode_date("01/05/2012").is_err());
    }
}
