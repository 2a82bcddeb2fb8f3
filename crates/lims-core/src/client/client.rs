use std::sync::Arc;

use lims_state::registry::EntityRegistry;

use super::internal::InternalClient;
use crate::{
    client::client_settings::ClientSettings,
    entity::{Entity, EntityHandle},
    transport::ApiConfiguration,
};

/// The main struct to interact with the LIMS server.
///
/// All entity instances are retrieved through this interface, so the
/// one-instance-per-URI guarantee holds on every path into the object graph.
#[derive(Debug, Clone)]
pub struct Lims {
    // The `Clone` implementation must return an owned reference to the same
    // instance: entity handles keep a `Lims` for their lazy loads, and all of
    // them have to share one registry. Any mutable state lives behind the Arc
    // inside [`InternalClient`].
    #[doc(hidden)]
    pub internal: Arc<InternalClient>,
}

impl Lims {
    /// The API version this interface speaks.
    pub const VERSION: &'static str = crate::transport::API_VERSION;

    #[allow(missing_docs)]
    pub fn new(settings: ClientSettings) -> Self {
        let client = reqwest::Client::builder()
            .build()
            .expect("Build should not fail");

        let api = ApiConfiguration {
            base_path: settings.base_url.trim_end_matches('/').to_owned(),
            user_agent: Some(settings.user_agent),
            client,
            basic_auth: Some((settings.username, Some(settings.password))),
        };

        Self {
            internal: Arc::new(InternalClient {
                api,
                registry: EntityRegistry::new(),
            }),
        }
    }

    /// Returns the entity registered under `uri`, constructing and
    /// registering a new unloaded instance if this URI has not been seen.
    ///
    /// This is the only constructor for entity values; no network call is
    /// made until an attribute of the returned entity is first read or
    /// written.
    pub fn resolve<T: Entity>(&self, uri: &str) -> T {
        self.internal.registry.get_or_create(uri, || {
            T::from_handle(EntityHandle::new(self.clone(), uri, T::root_name()))
        })
    }

    /// Resolve an entity by its LIMS id, building the canonical URI from the
    /// base URI and the entity type's resource segment.
    pub fn resolve_by_id<T: Entity>(&self, id: &str) -> T {
        let uri = self.internal.api.api_uri(&[T::URI_SEGMENT, id]);
        self.resolve(&uri)
    }

    /// Drop the registration for `uri` so the next lookup constructs a fresh
    /// instance. See [`EntityRegistry::forget`] for when this is useful.
    pub fn forget<T: Entity>(&self, uri: &str) -> bool {
        self.internal.registry.forget::<T>(uri)
    }
}
