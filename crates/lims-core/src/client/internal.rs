use lims_state::registry::EntityRegistry;

use crate::transport::ApiConfiguration;

/// Shared state behind every clone of a [`Lims`](crate::Lims).
#[derive(Debug)]
pub struct InternalClient {
    pub(crate) api: ApiConfiguration,
    pub(crate) registry: EntityRegistry,
}

impl InternalClient {
    /// The transport configuration built from the settings at construction.
    pub fn get_api_configuration(&self) -> &ApiConfiguration {
        &self.api
    }

    #[allow(missing_docs)]
    pub fn registry(&self) -> &EntityRegistry {
        &self.registry
    }
}
