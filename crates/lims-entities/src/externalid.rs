//! External identifiers linking records to outside systems.

use async_trait::async_trait;
use lims_core::{Entity, LimsError, ParseError};
use lims_xml::Name;

/// One `ri:externalid` entry: an identifier in another system and the URI
/// it can be resolved at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalId {
    #[allow(missing_docs)]
    pub id: String,
    #[allow(missing_docs)]
    pub uri: String,
}

/// Read access to a record's external identifiers.
#[async_trait]
pub trait HasExternalIds: Entity {
    #[allow(missing_docs)]
    async fn external_ids(&self) -> Result<Vec<ExternalId>, LimsError> {
        let name = Name::qualified("ri", "externalid")
            .expect("the ri prefix is part of the schema table");
        let entries = self
            .handle()
            .with_tree(|tree| {
                tree.children()
                    .iter()
                    .filter(|node| *node.name() == name)
                    .map(|node| {
                        let id = node.attr("id").ok_or(ParseError::MissingAttribute {
                            element: "ri:externalid".to_owned(),
                            attribute: "id",
                        })?;
                        let uri = node.attr("uri").ok_or(ParseError::MissingAttribute {
                            element: "ri:externalid".to_owned(),
                            attribute: "uri",
                        })?;
                        Ok(ExternalId {
                            id: id.to_owned(),
                            uri: uri.to_owned(),
                        })
                    })
                    .collect::<Result<Vec<_>, ParseError>>()
            })
            .await??;
        Ok(entries)
    }
}
