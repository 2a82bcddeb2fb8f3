//! Per-entity sub-clients on the [`Lims`] facade.

use std::marker::PhantomData;

use lims_core::{Entity, Lims, LimsError, QueryParams};

use crate::{
    artifact::Artifact,
    attachment::File,
    container::{Container, ContainerType, NewContainer},
    lab::Lab,
    process::{Process, ProcessType},
    project::{NewProject, Project},
    queries::{
        ArtifactQuery, ContainerQuery, ContainerTypeQuery, LabQuery, ProcessQuery,
        ProcessTypeQuery, ProjectQuery, ResearcherQuery, SampleQuery,
    },
    researcher::Researcher,
    sample::{NewSample, Sample},
};

/// Entity types with a typed collection filter.
pub trait Queryable: Entity {
    /// The query builder for this type's collection.
    type Query: Into<QueryParams> + Default;
}

impl Queryable for Lab {
    type Query = LabQuery;
}
impl Queryable for Researcher {
    type Query = ResearcherQuery;
}
impl Queryable for Project {
    type Query = ProjectQuery;
}
impl Queryable for Sample {
    type Query = SampleQuery;
}
impl Queryable for Container {
    type Query = ContainerQuery;
}
impl Queryable for ContainerType {
    type Query = ContainerTypeQuery;
}
impl Queryable for Process {
    type Query = ProcessQuery;
}
impl Queryable for ProcessType {
    type Query = ProcessTypeQuery;
}
impl Queryable for Artifact {
    type Query = ArtifactQuery;
}

/// Operations on one entity type's collection.
pub struct EntityClient<T: Entity> {
    lims: Lims,
    _entity: PhantomData<T>,
}

impl<T: Entity> EntityClient<T> {
    fn new(lims: Lims) -> Self {
        EntityClient {
            lims,
            _entity: PhantomData,
        }
    }

    /// The entity with the given LIMS id. No network call is made until a
    /// field is first read or written.
    pub fn get(&self, id: &str) -> T {
        self.lims.resolve_by_id(id)
    }

    /// The entity at the given URI.
    pub fn get_by_uri(&self, uri: &str) -> T {
        self.lims.resolve(uri)
    }

    /// Fetch the representations of several instances in one request.
    pub async fn load_batch(&self, instances: &[T]) -> Result<(), LimsError> {
        self.lims.load_batch(instances).await
    }
}

impl<T: Queryable> EntityClient<T> {
    /// All entities matching the query, across every result page.
    pub async fn search(&self, query: T::Query) -> Result<Vec<T>, LimsError> {
        self.lims.list(&query.into()).await
    }

    /// The whole collection, unfiltered.
    pub async fn all(&self) -> Result<Vec<T>, LimsError> {
        self.search(T::Query::default()).await
    }
}

impl EntityClient<Project> {
    /// Create a project. Returns the registered entity, loaded and clean.
    pub async fn create(&self, new: &NewProject) -> Result<Project, LimsError> {
        self.lims.create(&new.representation()).await
    }
}

impl EntityClient<Sample> {
    /// Create a sample. Returns the registered entity, loaded and clean.
    pub async fn create(&self, new: &NewSample) -> Result<Sample, LimsError> {
        self.lims.create(&new.representation()?).await
    }
}

impl EntityClient<Container> {
    /// Create a container. Returns the registered entity, loaded and clean.
    pub async fn create(&self, new: &NewContainer) -> Result<Container, LimsError> {
        self.lims.create(&new.representation()).await
    }
}

/// Extends [`Lims`] with the typed sub-clients.
pub trait LimsExt {
    #[allow(missing_docs)]
    fn labs(&self) -> EntityClient<Lab>;
    #[allow(missing_docs)]
    fn researchers(&self) -> EntityClient<Researcher>;
    #[allow(missing_docs)]
    fn projects(&self) -> EntityClient<Project>;
    #[allow(missing_docs)]
    fn samples(&self) -> EntityClient<Sample>;
    #[allow(missing_docs)]
    fn containers(&self) -> EntityClient<Container>;
    #[allow(missing_docs)]
    fn container_types(&self) -> EntityClient<ContainerType>;
    #[allow(missing_docs)]
    fn processes(&self) -> EntityClient<Process>;
    #[allow(missing_docs)]
    fn process_types(&self) -> EntityClient<ProcessType>;
    #[allow(missing_docs)]
    fn artifacts(&self) -> EntityClient<Artifact>;
    #[allow(missing_docs)]
    fn files(&self) -> EntityClient<File>;
}

impl LimsExt for Lims {
    fn labs(&self) -> EntityClient<Lab> {
        EntityClient::new(self.clone())
    }
    fn researchers(&self) -> EntityClient<Researcher> {
        EntityClient::new(self.clone())
    }
    fn projects(&self) -> EntityClient<Project> {
        EntityClient::new(self.clone())
    }
    fn samples(&self) -> EntityClient<Sample> {
        EntityClient::new(self.clone())
    }
    fn containers(&self) -> EntityClient<Container> {
        EntityClient::new(self.clone())
    }
    fn container_types(&self) -> EntityClient<ContainerType> {
        EntityClient::new(self.clone())
    }
    fn processes(&self) -> EntityClient<Process> {
        EntityClient::new(self.clone())
    }
    fn process_types(&self) -> EntityClient<ProcessType> {
        EntityClient::new(self.clone())
    }
    fn artifacts(&self) -> EntityClient<Artifact> {
        EntityClient::new(self.clone())
    }
    fn files(&self) -> EntityClient<File> {
        EntityClient::new(self.clone())
    }
}
