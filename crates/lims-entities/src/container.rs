//! Containers and container types.

use lims_core::{LimsError, ParseError};
use lims_xml::{Element, Name};

use crate::{
    artifact::Artifact,
    macros::{
        attr_fields, integer_fields, lims_entity, reference_fields, string_fields,
        string_list_fields,
    },
    udf::UdfContainer,
};

lims_entity! {
    /// A kind of container, e.g. a 96 well plate.
    ContainerType, "ContainerType", "containertypes", "ctp": "container-type"
}

/// One axis of a container's well grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dimension {
    /// Whether positions on this axis are letters rather than numbers.
    pub is_alpha: bool,
    /// Value of the first position.
    pub offset: i64,
    /// Number of positions.
    pub size: i64,
}

impl ContainerType {
    attr_fields! {
        /// The type's name, e.g. `96 well plate`.
        name => "name";
    }

    string_list_fields! {
        /// Wells reserved for calibrants.
        calibrant_wells => "calibrant-well";
        unavailable_wells => "unavailable-well";
    }

    #[allow(missing_docs)]
    pub async fn x_dimension(&self) -> Result<Option<Dimension>, LimsError> {
        self.dimension("x-dimension").await
    }

    #[allow(missing_docs)]
    pub async fn y_dimension(&self) -> Result<Option<Dimension>, LimsError> {
        self.dimension("y-dimension").await
    }

    async fn dimension(&self, axis: &str) -> Result<Option<Dimension>, LimsError> {
        let is_alpha = self.handle.boolean(&format!("{axis}/is-alpha")).await?;
        let offset = self.handle.integer(&format!("{axis}/offset")).await?;
        let size = self.handle.integer(&format!("{axis}/size")).await?;
        match (is_alpha, offset, size) {
            (Some(is_alpha), Some(offset), Some(size)) => Ok(Some(Dimension {
                is_alpha,
                offset,
                size,
            })),
            (None, None, None) => Ok(None),
            _ => Err(ParseError::MissingElement(format!("{axis} is incomplete")).into()),
        }
    }
}

lims_entity! {
    /// A container holding artifacts in wells.
    Container, "Container", "containers", "con": "container"
}

impl Container {
    string_fields! {
        name, set_name => "name";
        /// Lifecycle state, e.g. `Populated` or `Depleted`.
        state => "state";
    }

    integer_fields! {
        occupied_wells => "occupied-wells";
    }

    reference_fields! {
        /// The container's type.
        container_type => ("type", ContainerType);
    }

    /// The artifact placed in each occupied well, as `(well, artifact)`
    /// pairs in document order. The artifacts are not loaded.
    pub async fn placements(&self) -> Result<Vec<(String, Artifact)>, LimsError> {
        let pairs = self
            .handle
            .with_tree(|tree| {
                tree.children()
                    .iter()
                    .filter(|node| node.name().local == "placement")
                    .map(|node| {
                        let uri = node.attr("uri").ok_or(ParseError::MissingAttribute {
                            element: "placement".to_owned(),
                            attribute: "uri",
                        })?;
                        let well = node
                            .child(&Name::local("value"))
                            .and_then(Element::text)
                            .ok_or_else(|| {
                                ParseError::MissingElement("placement/value".to_owned())
                            })?;
                        Ok((well.to_owned(), uri.to_owned()))
                    })
                    .collect::<Result<Vec<_>, ParseError>>()
            })
            .await??;
        Ok(pairs
            .into_iter()
            .map(|(well, uri)| (well, self.handle.lims().resolve(&uri)))
            .collect())
    }

    /// Like [`Container::placements`], with every placed artifact loaded
    /// through one batch retrieval request.
    pub async fn placements_loaded(&self) -> Result<Vec<(String, Artifact)>, LimsError> {
        let placements = self.placements().await?;
        let artifacts: Vec<Artifact> = placements.iter().map(|(_, a)| a.clone()).collect();
        self.handle.lims().load_batch(&artifacts).await?;
        Ok(placements)
    }
}

impl UdfContainer for Container {}

/// Data for creating a container.
#[derive(Debug, Clone)]
pub struct NewContainer {
    /// An optional name; the server generates one when absent.
    pub name: Option<String>,
    /// URI of the container type.
    pub container_type_uri: String,
}

impl NewContainer {
    pub(crate) fn representation(&self) -> Element {
        let mut root = Element::new(
            Name::qualified("con", "container")
                .expect("the con prefix is part of the schema table"),
        );
        if let Some(name) = &self.name {
            root.push_child(Element::new(Name::local("name")))
                .set_text(name);
        }
        root.push_child(Element::new(Name::local("type")))
            .set_attr("uri", &self.container_type_uri);
        root
    }
}
