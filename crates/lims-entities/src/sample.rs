//! Samples.

use lims_xml::{Element, Name};

use crate::{
    artifact::Artifact,
    attachment::{File, Note},
    externalid::HasExternalIds,
    macros::{date_fields, lims_entity, reference_fields, reference_list_fields, string_fields},
    project::Project,
    researcher::Researcher,
    udf::{UdfContainer, UdfValue},
};

lims_entity! {
    /// A submitted sample.
    Sample, "Sample", "samples", "smp": "sample"
}

impl Sample {
    string_fields! {
        /// The sample's name.
        name, set_name => "name";
    }

    date_fields! {
        date_received, set_date_received => "date-received";
        date_completed, set_date_completed => "date-completed";
    }

    reference_fields! {
        /// The project the sample was submitted under.
        project, set_project => ("project", Project);
        /// The researcher who submitted it.
        submitter, set_submitter => ("submitter", Researcher);
        /// The analyte artifact the sample entered the system as.
        artifact => ("artifact", Artifact);
    }

    reference_list_fields! {
        notes => ("note", Note);
        files => ("file:file", File);
    }
}

impl UdfContainer for Sample {}
impl HasExternalIds for Sample {}

/// Data for creating a sample. The server requires an initial container
/// placement for the sample's analyte.
#[derive(Debug, Clone)]
pub struct NewSample {
    #[allow(missing_docs)]
    pub name: String,
    /// URI of the project the sample is submitted under.
    pub project_uri: String,
    /// Initial placement: container URI and well, e.g. `A:1`.
    pub location: Option<(String, String)>,
    /// User-defined fields to set on creation.
    pub udfs: Vec<(String, UdfValue)>,
}

impl NewSample {
    pub(crate) fn representation(&self) -> Result<Element, lims_core::LimsError> {
        // Creation uses its own root tag, not the sample representation's.
        let mut root = Element::new(
            Name::qualified("smp", "samplecreation")
                .expect("the smp prefix is part of the schema table"),
        );
        root.push_child(Element::new(Name::local("name")))
            .set_text(&self.name);
        root.push_child(Element::new(Name::local("project")))
            .set_attr("uri", &self.project_uri);
        if let Some((container_uri, well)) = &self.location {
            let location = root.push_child(Element::new(Name::local("location")));
            location
                .push_child(Element::new(Name::local("container")))
                .set_attr("uri", container_uri);
            location
                .push_child(Element::new(Name::local("value")))
                .set_text(well);
        }
        for (name, value) in &self.udfs {
            crate::udf::set_field(&mut root, name, value)?;
        }
        Ok(root)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lims_core::{EntityExt, LimsError};
    use lims_test::{fixtures, start_lims_mock};
    use wiremock::{matchers, Mock, ResponseTemplate};

    #[tokio::test]
    async fn reading_and_editing_one_sample() {
        let (server, lims) = start_lims_mock(vec![]).await;
        server
            .register(
                Mock::given(matchers::method("GET"))
                    .and(matchers::path("/api/v1/samples/S1"))
                    .respond_with(ResponseTemplate::new(200).set_body_string(
                        fixtures::sample_body(&server.uri(), "S1", "Alpha", "P1"),
                    ))
                    .expect(1),
            )
            .await;
        server
            .register(
                Mock::given(matchers::method("PUT"))
                    .and(matchers::path("/api/v1/samples/S1"))
                    .and(matchers::body_string_contains("Beta"))
                    .respond_with(ResponseTemplate::new(200).set_body_string(
                        fixtures::sample_body(&server.uri(), "S1", "Beta", "P1"),
                    ))
                    .expect(1),
            )
            .await;

        let sample: Sample = lims.resolve_by_id("S1");
        assert_eq!(sample.name().await.unwrap().as_deref(), Some("Alpha"));

        sample.set_name("Beta").await.unwrap();
        assert!(sample.is_dirty());
        assert_eq!(sample.name().await.unwrap().as_deref(), Some("Beta"));

        sample.save().await.unwrap();
        assert!(!sample.is_dirty());
    }

    #[tokio::test]
    async fn project_reference_resolves_through_the_registry() {
        let (server, lims) = start_lims_mock(vec![]).await;
        server
            .register(
                Mock::given(matchers::method("GET"))
                    .and(matchers::path("/api/v1/samples/S1"))
                    .respond_with(ResponseTemplate::new(200).set_body_string(
                        fixtures::sample_body(&server.uri(), "S1", "Alpha", "P1"),
                    )),
            )
            .await;

        let sample: Sample = lims.resolve_by_id("S1");
        let via_sample = sample.project().await.unwrap().unwrap();
        let direct: Project = lims.resolve_by_id("P1");
        assert!(via_sample.same_instance(&direct));
        assert!(!direct.is_loaded());
    }

    #[tokio::test]
    async fn assigned_references_read_back_as_the_same_instance() {
        let (server, lims) = start_lims_mock(vec![]).await;
        server
            .register(
                Mock::given(matchers::method("GET"))
                    .and(matchers::path("/api/v1/samples/S1"))
                    .respond_with(ResponseTemplate::new(200).set_body_string(
                        fixtures::sample_body(&server.uri(), "S1", "Alpha", "P1"),
                    ))
                    .expect(1),
            )
            .await;

        let sample: Sample = lims.resolve_by_id("S1");
        let replacement: Project = lims.resolve_by_id("P2");

        // Setting the reference on the unloaded sample triggers its one
        // lazy GET; reading it back yields the exact assigned instance.
        sample.set_project(&replacement).await.unwrap();
        assert!(sample.is_dirty());
        let read_back = sample.project().await.unwrap().unwrap();
        assert!(read_back.same_instance(&replacement));
    }

    #[tokio::test]
    async fn udfs_are_typed_and_checked() {
        let (server, lims) = start_lims_mock(vec![]).await;
        server
            .register(
                Mock::given(matchers::method("GET"))
                    .and(matchers::path("/api/v1/samples/S1"))
                    .respond_with(ResponseTemplate::new(200).set_body_string(
                        fixtures::sample_body(&server.uri(), "S1", "Alpha", "P1"),
                    )),
            )
            .await;

        let sample: Sample = lims.resolve_by_id("S1");
        assert_eq!(
            sample.udf("Reads").await.unwrap(),
            Some(UdfValue::Numeric(12.0))
        );

        // Wrong type is rejected and leaves the record clean.
        let error = sample
            .set_udf("Reads", UdfValue::String("many".to_owned()))
            .await
            .unwrap_err();
        assert!(matches!(error, LimsError::Validation(_)));

        sample.set_udf("Reads", UdfValue::Numeric(99.0)).await.unwrap();
        assert!(sample.is_dirty());
        assert_eq!(
            sample.udf("Reads").await.unwrap(),
            Some(UdfValue::Numeric(99.0))
        );

        assert!(sample.remove_udf("Reads").await.unwrap());
        assert_eq!(sample.udf("Reads").await.unwrap(), None);
        assert!(!sample.remove_udf("Reads").await.unwrap());
    }

    #[test]
    fn creation_document_carries_name_project_and_location() {
        let new = NewSample {
            name: "Alpha".to_owned(),
            project_uri: "https://lims.example.com/api/v1/projects/P1".to_owned(),
            location: Some((
                "https://lims.example.com/api/v1/containers/C1".to_owned(),
                "A:1".to_owned(),
            )),
            udfs: vec![("Reads".to_owned(), UdfValue::Numeric(12.0))],
        };
        let body = lims_xml::to_string(&new.representation().unwrap()).unwrap();
        assert!(body.contains("samplecreation"));
        assert!(body.contains("<name>Alpha</name>"));
        assert!(body.contains("projects/P1"));
        assert!(body.contains("<value>A:1</value>"));
        assert!(body.contains("Reads"));
    }
}
