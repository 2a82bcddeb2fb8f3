//! Typed collection filters.
//!
//! Each entity type has a query builder whose methods append the server's
//! filter parameters. A key may be given more than once to match any of
//! several values. Builders flatten into [`QueryParams`] and are consumed by
//! [`crate::EntityClient::search`].

use lims_core::QueryParams;

macro_rules! query_builder {
    (
        $(#[$meta:meta])*
        $name:ident {
            $($(#[$m2:meta])* $method:ident => $key:literal),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Default, Clone)]
        pub struct $name {
            params: QueryParams,
        }

        impl $name {
            #[allow(missing_docs)]
            pub fn new() -> Self {
                Self::default()
            }

            $(
                #[allow(missing_docs)]
                $(#[$m2])*
                pub fn $method(mut self, value: impl Into<String>) -> Self {
                    self.params.push($key, value);
                    self
                }
            )*

            /// Filter on a user-defined field. The name may carry a
            /// comparison suffix, e.g. `Reads[min]`.
            pub fn udf(mut self, name: &str, value: impl Into<String>) -> Self {
                self.params.push_udf(name, value);
                self
            }

            /// Filter on the name of the user-defined type.
            pub fn udt_name(mut self, name: impl Into<String>) -> Self {
                self.params.push_udt_name(name);
                self
            }

            /// Filter on a field of a user-defined type, keyed
            /// `UDTNAME.FIELDNAME`.
            pub fn udt_field(mut self, key: &str, value: impl Into<String>) -> Self {
                self.params.push_udt_field(key, value);
                self
            }

            /// Fetch one result page instead of following `next-page` links.
            pub fn start_index(mut self, index: u32) -> Self {
                self.params.push_start_index(index);
                self
            }
        }

        impl From<$name> for QueryParams {
            fn from(query: $name) -> QueryParams {
                query.params
            }
        }
    };
}

query_builder! {
    /// Filters for lab collections.
    LabQuery {
        name => "name",
        last_modified => "last-modified",
    }
}

query_builder! {
    /// Filters for researcher collections.
    ResearcherQuery {
        first_name => "firstname",
        last_name => "lastname",
        username => "username",
        last_modified => "last-modified",
    }
}

query_builder! {
    /// Filters for project collections.
    ProjectQuery {
        name => "name",
        open_date => "open-date",
        last_modified => "last-modified",
    }
}

query_builder! {
    /// Filters for sample collections.
    SampleQuery {
        name => "name",
        project_name => "projectname",
        project_id => "projectlimsid",
    }
}

query_builder! {
    /// Filters for container collections.
    ContainerQuery {
        name => "name",
        /// The container type's name, e.g. `96 well plate`.
        kind => "type",
        state => "state",
        last_modified => "last-modified",
    }
}

query_builder! {
    /// Filters for container type collections.
    ContainerTypeQuery {
        name => "name",
    }
}

query_builder! {
    /// Filters for process collections.
    ProcessQuery {
        /// The process type's name.
        kind => "type",
        last_modified => "last-modified",
        technician_first_name => "techfirstname",
        technician_last_name => "techlastname",
        project_name => "projectname",
        input_artifact_id => "inputartifactlimsid",
    }
}

query_builder! {
    /// Filters for process type collections.
    ProcessTypeQuery {
        display_name => "displayname",
    }
}

query_builder! {
    /// Filters for artifact collections.
    ArtifactQuery {
        name => "name",
        /// The artifact type, e.g. `Analyte`.
        kind => "type",
        process_type => "process-type",
        qc_flag => "qc-flag",
        working_flag => "working-flag",
        sample_name => "samplename",
        sample_id => "samplelimsid",
        container_name => "containername",
        container_id => "containerlimsid",
    }
}
