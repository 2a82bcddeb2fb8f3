//! Artifacts: the analytes and result files processes act on.

use lims_core::{LimsError, ParseError};
use lims_xml::Name;

use crate::{
    attachment::File,
    container::Container,
    macros::{
        boolean_fields, lims_entity, reference_fields, reference_list_fields, string_fields,
    },
    process::Process,
    sample::Sample,
    udf::UdfContainer,
};

lims_entity! {
    /// An analyte or result file flowing through processes.
    ///
    /// Artifact URIs may carry a `state` query parameter; two states of one
    /// artifact are two distinct instances, keyed by their full URI. Use
    /// [`Artifact::stateless`] for the unversioned record.
    Artifact, "Artifact", "artifacts", "art": "artifact"
}

impl Artifact {
    string_fields! {
        name, set_name => "name";
        /// Artifact type, e.g. `Analyte` or `ResultFile`.
        artifact_type => "type";
        output_type => "output-type";
        /// QC verdict: `PASSED`, `FAILED` or `UNKNOWN`.
        qc_flag, set_qc_flag => "qc-flag";
        volume => "volume";
        concentration => "concentration";
    }

    boolean_fields! {
        working_flag, set_working_flag => "working-flag";
    }

    reference_fields! {
        /// The process run that produced this artifact.
        parent_process => ("parent-process", Process);
    }

    reference_list_fields! {
        /// The submitted samples this artifact derives from.
        samples => ("sample", Sample);
        files => ("file:file", File);
    }

    /// The `state` component of this instance's URI, if it carries one.
    pub fn state(&self) -> Option<String> {
        self.handle.query_param("state")
    }

    /// The artifact's unversioned instance: the same record resolved
    /// without the URI's query part. Returns `self` when the URI has none.
    pub fn stateless(&self) -> Artifact {
        match lims_core::EntityExt::uri(self).split_once('?') {
            Some((path, _)) => self.handle.lims().resolve(path),
            None => self.clone(),
        }
    }

    /// Where the artifact currently sits: its container and well.
    pub async fn location(&self) -> Result<Option<(Container, String)>, LimsError> {
        let found = self
            .handle
            .with_tree(|tree| {
                tree.child(&Name::local("location")).map(|node| {
                    let container = node
                        .child(&Name::local("container"))
                        .and_then(|c| c.attr("uri"))
                        .map(str::to_owned);
                    let well = node
                        .child(&Name::local("value"))
                        .and_then(|v| v.text())
                        .map(str::to_owned);
                    (container, well)
                })
            })
            .await?;
        match found {
            None => Ok(None),
            Some((Some(uri), Some(well))) => Ok(Some((self.handle.lims().resolve(&uri), well))),
            Some(_) => {
                Err(ParseError::MissingElement("location/container or location/value".to_owned())
                    .into())
            }
        }
    }
}

impl UdfContainer for Artifact {}

#[cfg(test)]
mod tests {
    use super::*;
    use lims_core::EntityExt;
    use lims_test::{fixtures, start_lims_mock};
    use wiremock::{matchers, Mock, ResponseTemplate};

    #[tokio::test]
    async fn states_are_distinct_instances() {
        let (server, lims) = start_lims_mock(vec![]).await;
        let base = server.uri();
        server
            .register(
                Mock::given(matchers::method("GET"))
                    .and(matchers::path("/api/v1/artifacts/A1"))
                    .and(matchers::query_param("state", "7"))
                    .respond_with(ResponseTemplate::new(200).set_body_string(
                        fixtures::artifact_body(&base, "A1", "?state=7", "UNKNOWN"),
                    ))
                    .expect(1),
            )
            .await;
        server
            .register(
                Mock::given(matchers::method("GET"))
                    .and(matchers::path("/api/v1/artifacts/A1"))
                    .and(matchers::query_param("state", "9"))
                    .respond_with(ResponseTemplate::new(200).set_body_string(
                        fixtures::artifact_body(&base, "A1", "?state=9", "PASSED"),
                    ))
                    .expect(1),
            )
            .await;

        let older: Artifact = lims.resolve(&format!("{base}/api/v1/artifacts/A1?state=7"));
        let newer: Artifact = lims.resolve(&format!("{base}/api/v1/artifacts/A1?state=9"));
        assert!(!older.same_instance(&newer));
        assert_eq!(older.id(), newer.id());
        assert_eq!(older.state().as_deref(), Some("7"));

        // Each state fetches and holds its own representation.
        assert_eq!(older.qc_flag().await.unwrap().as_deref(), Some("UNKNOWN"));
        assert_eq!(newer.qc_flag().await.unwrap().as_deref(), Some("PASSED"));

        let plain = older.stateless();
        assert!(!plain.same_instance(&older));
        assert!(plain.same_instance(&newer.stateless()));
        assert_eq!(plain.state(), None);
    }

    #[tokio::test]
    async fn location_pairs_container_and_well() {
        let (server, lims) = start_lims_mock(vec![]).await;
        server
            .register(
                Mock::given(matchers::method("GET"))
                    .and(matchers::path("/api/v1/artifacts/A1"))
                    .respond_with(ResponseTemplate::new(200).set_body_string(
                        fixtures::artifact_body(&server.uri(), "A1", "", "PASSED"),
                    )),
            )
            .await;

        let artifact: Artifact = lims.resolve_by_id("A1");
        let (container, well) = artifact.location().await.unwrap().unwrap();
        assert_eq!(container.id(), "C1");
        assert_eq!(well, "A:1");
        assert_eq!(artifact.working_flag().await.unwrap(), Some(true));
        assert_eq!(
            artifact.samples().await.unwrap()[0].id(),
            "S1"
        );
    }
}
