#![doc = include_str!("../README.md")]

mod macros;

pub mod artifact;
pub mod attachment;
pub mod client;
pub mod container;
pub mod externalid;
pub mod lab;
pub mod process;
pub mod project;
pub mod queries;
pub mod researcher;
pub mod sample;
pub mod udf;

pub use artifact::Artifact;
pub use attachment::{File, Note};
pub use client::{EntityClient, LimsExt, Queryable};
pub use container::{Container, ContainerType, Dimension, NewContainer};
pub use externalid::{ExternalId, HasExternalIds};
pub use lab::Lab;
pub use process::{IoEntry, Process, ProcessType};
pub use project::{NewProject, Project};
pub use queries::{
    ArtifactQuery, ContainerQuery, ContainerTypeQuery, LabQuery, ProcessQuery, ProcessTypeQuery,
    ProjectQuery, ResearcherQuery, SampleQuery,
};
pub use researcher::Researcher;
pub use sample::{NewSample, Sample};
pub use udf::{UdfContainer, UdfValue};
