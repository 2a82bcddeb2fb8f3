//! Projects.

use chrono::NaiveDate;
use lims_xml::{Element, Name};

use crate::{
    attachment::{File, Note},
    externalid::HasExternalIds,
    macros::{date_fields, lims_entity, reference_fields, reference_list_fields, string_fields},
    researcher::Researcher,
    udf::UdfContainer,
};

lims_entity! {
    /// A project grouping submitted samples.
    Project, "Project", "projects", "prj": "project"
}

impl Project {
    string_fields! {
        /// The project's name.
        name, set_name => "name";
    }

    date_fields! {
        open_date, set_open_date => "open-date";
        close_date, set_close_date => "close-date";
        invoice_date, set_invoice_date => "invoice-date";
    }

    reference_fields! {
        /// The researcher who owns the project.
        researcher, set_researcher => ("researcher", Researcher);
    }

    reference_list_fields! {
        files => ("file:file", File);
        notes => ("note", Note);
    }
}

impl UdfContainer for Project {}
impl HasExternalIds for Project {}

/// Data for creating a project. POSTed to the collection through
/// [`crate::EntityClient::create`].
#[derive(Debug, Clone)]
pub struct NewProject {
    #[allow(missing_docs)]
    pub name: String,
    #[allow(missing_docs)]
    pub open_date: Option<NaiveDate>,
    /// URI of the owning researcher.
    pub researcher_uri: Option<String>,
}

impl NewProject {
    pub(crate) fn representation(&self) -> Element {
        let mut root = Element::new(
            Name::qualified("prj", "project").expect("the prj prefix is part of the schema table"),
        );
        root.push_child(Element::new(Name::local("name")))
            .set_text(&self.name);
        if let Some(date) = self.open_date {
            root.push_child(Element::new(Name::local("open-date")))
                .set_text(date.format("%Y-%m-%d").to_string());
        }
        if let Some(uri) = &self.researcher_uri {
            root.push_child(Element::new(Name::local("researcher")))
                .set_attr("uri", uri);
        }
        root
    }
}
