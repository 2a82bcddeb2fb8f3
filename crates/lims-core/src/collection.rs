//! Collection-level operations: querying, creation and batch retrieval.

use lims_xml::{Element, Name};
use log::debug;

use crate::{
    entity::{Entity, EntityExt},
    error::{LimsError, ParseError, ValidationError},
    query::QueryParams,
    Lims,
};

impl Lims {
    /// Query a collection, returning every matching entity.
    ///
    /// Results resolve through the registry, so records already seen keep
    /// their identity and are not re-parsed. The server pages its results;
    /// all pages are followed unless the query pins a `start-index`.
    pub async fn list<T: Entity>(&self, query: &QueryParams) -> Result<Vec<T>, LimsError> {
        let api = self.internal.get_api_configuration();
        let single_page = query.has_start_index();
        let mut result = Vec::new();

        let mut root = api
            .get_xml(&api.api_uri(&[T::URI_SEGMENT]), query.pairs())
            .await?;
        loop {
            for node in root.children().iter().filter(|c| c.name().local == T::ROOT_TAG) {
                let uri = require_uri_attr(node)?;
                result.push(self.resolve::<T>(uri));
            }
            if single_page {
                break;
            }
            let next = root
                .child(&Name::local("next-page"))
                .map(require_uri_attr)
                .transpose()?
                .map(str::to_owned);
            match next {
                Some(uri) => root = api.get_xml(&uri, &[]).await?,
                None => break,
            }
        }
        debug!("query matched {} {}", result.len(), T::URI_SEGMENT);
        Ok(result)
    }

    /// POST a new record's representation to its collection and register the
    /// created entity, returned loaded and clean.
    pub async fn create<T: Entity>(&self, representation: &Element) -> Result<T, LimsError> {
        let api = self.internal.get_api_configuration();
        let root = api
            .post_xml(&api.api_uri(&[T::URI_SEGMENT]), representation)
            .await?;
        let uri = require_uri_attr(&root)?.to_owned();
        let entity: T = self.resolve(&uri);
        entity.handle().install_tree(root);
        Ok(entity)
    }

    /// Fetch the representations of a set of instances in one request, using
    /// the server's batch retrieval resource.
    ///
    /// Each returned representation is installed on the already-registered
    /// instance, loaded and clean. Unsaved edits on those instances are
    /// overwritten; check [`EntityExt::is_dirty`] first when that matters.
    pub async fn load_batch<T: Entity>(&self, instances: &[T]) -> Result<(), LimsError> {
        if instances.is_empty() {
            return Ok(());
        }
        let mut links = Element::new(
            Name::qualified("ri", "links").expect("the ri prefix is part of the schema table"),
        );
        for instance in instances {
            let link = links.push_child(Element::new(Name::local("link")));
            link.set_attr("uri", instance.uri());
            link.set_attr("rel", T::URI_SEGMENT);
        }

        let api = self.internal.get_api_configuration();
        let uri = api.api_uri(&[T::URI_SEGMENT, "batch", "retrieve"]);
        let root = api.post_xml(&uri, &links).await?;
        for node in root.children() {
            let uri = require_uri_attr(node)?;
            let entity: T = self.resolve(uri);
            entity.handle().install_tree(node.clone());
        }
        Ok(())
    }

    /// Verify that the server offers the API version this interface speaks.
    pub async fn check_version(&self) -> Result<(), LimsError> {
        let api = self.internal.get_api_configuration();
        let uri = format!("{}/api", api.base_path);
        let root = api.get_xml(&uri, &[]).await?;
        if root.name().local != "versions" {
            return Err(ParseError::UnexpectedRoot(root.name().local.clone()).into());
        }
        let supported = root
            .children()
            .iter()
            .filter(|node| node.name().local == "version")
            .any(|node| node.attr("major") == Some(Self::VERSION));
        if supported {
            Ok(())
        } else {
            Err(ValidationError(format!(
                "server does not list API version {}",
                Self::VERSION
            ))
            .into())
        }
    }
}

fn require_uri_attr(node: &Element) -> Result<&str, LimsError> {
    node.attr("uri").ok_or_else(|| {
        ParseError::MissingAttribute {
            element: node.name().local.clone(),
            attribute: "uri",
        }
        .into()
    })
}
