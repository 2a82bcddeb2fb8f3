//! Processes (protocol step runs) and their types.

use lims_core::{LimsError, ParseError};
use lims_xml::Name;

use crate::{
    artifact::Artifact,
    attachment::File,
    macros::{
        attr_fields, date_fields, lims_entity, reference_fields, reference_list_fields,
        string_fields,
    },
    researcher::Researcher,
    udf::UdfContainer,
};

lims_entity! {
    /// A kind of process, e.g. a library prep protocol step.
    ProcessType, "ProcessType", "processtypes", "ptp": "process-type"
}

impl ProcessType {
    attr_fields! {
        /// The type's display name.
        name => "name";
    }
}

lims_entity! {
    /// One run of a process over a set of input artifacts.
    Process, "Process", "processes", "prc": "process"
}

/// One `input-output-map` entry: which input artifact produced which output,
/// if any. Per-entry fields are optional because shared outputs list no
/// input and some steps produce no output.
#[derive(Debug, Clone)]
pub struct IoEntry {
    #[allow(missing_docs)]
    pub input: Option<Artifact>,
    #[allow(missing_docs)]
    pub output: Option<Artifact>,
    /// The output's artifact type, e.g. `Analyte` or `ResultFile`.
    pub output_type: Option<String>,
    /// How the output was generated: `PerInput` or `PerAllInputs`.
    pub output_generation_type: Option<String>,
}

impl Process {
    date_fields! {
        date_run, set_date_run => "date-run";
    }

    string_fields! {
        protocol_name => "protocol-name";
    }

    reference_fields! {
        /// The type of process that was run.
        process_type => ("type", ProcessType);
        /// Who ran it.
        technician, set_technician => ("technician", Researcher);
    }

    reference_list_fields! {
        files => ("file:file", File);
    }

    /// The process's input/output pairings in document order.
    pub async fn input_output_maps(&self) -> Result<Vec<IoEntry>, LimsError> {
        let raw = self
            .handle
            .with_tree(|tree| {
                tree.children()
                    .iter()
                    .filter(|node| node.name().local == "input-output-map")
                    .map(|node| {
                        let input = match node.child(&Name::local("input")) {
                            Some(input) => Some(require_uri(input, "input")?.to_owned()),
                            None => None,
                        };
                        let (output, output_type, output_generation_type) =
                            match node.child(&Name::local("output")) {
                                Some(output) => (
                                    Some(require_uri(output, "output")?.to_owned()),
                                    output.attr("output-type").map(str::to_owned),
                                    output.attr("output-generation-type").map(str::to_owned),
                                ),
                                None => (None, None, None),
                            };
                        Ok((input, output, output_type, output_generation_type))
                    })
                    .collect::<Result<Vec<_>, ParseError>>()
            })
            .await??;
        Ok(raw
            .into_iter()
            .map(|(input, output, output_type, output_generation_type)| IoEntry {
                input: input.map(|uri| self.handle.lims().resolve(&uri)),
                output: output.map(|uri| self.handle.lims().resolve(&uri)),
                output_type,
                output_generation_type,
            })
            .collect())
    }

    /// The distinct input artifacts, in first-seen order.
    pub async fn inputs(&self) -> Result<Vec<Artifact>, LimsError> {
        let mut seen = Vec::new();
        let mut inputs: Vec<Artifact> = Vec::new();
        for entry in self.input_output_maps().await? {
            if let Some(input) = entry.input {
                let uri = lims_core::EntityExt::uri(&input).to_owned();
                if !seen.contains(&uri) {
                    seen.push(uri);
                    inputs.push(input);
                }
            }
        }
        Ok(inputs)
    }

    /// The distinct output artifacts, in first-seen order.
    pub async fn outputs(&self) -> Result<Vec<Artifact>, LimsError> {
        let mut seen = Vec::new();
        let mut outputs: Vec<Artifact> = Vec::new();
        for entry in self.input_output_maps().await? {
            if let Some(output) = entry.output {
                let uri = lims_core::EntityExt::uri(&output).to_owned();
                if !seen.contains(&uri) {
                    seen.push(uri);
                    outputs.push(output);
                }
            }
        }
        Ok(outputs)
    }
}

impl UdfContainer for Process {}

fn require_uri<'a>(node: &'a lims_xml::Element, element: &str) -> Result<&'a str, ParseError> {
    node.attr("uri").ok_or(ParseError::MissingAttribute {
        element: element.to_owned(),
        attribute: "uri",
    })
}
