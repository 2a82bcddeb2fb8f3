//! Declarative field tables.
//!
//! Each entity module declares its type with [`lims_entity!`] and lists its
//! fields with the `*_fields!` macros, which expand to typed accessors over
//! the shared [`lims_core::EntityHandle`] projections. Readers are async and
//! force a lazy load of the record on first use; setters are synchronous,
//! edit the local document and mark it dirty.

/// Declare an entity struct, its cache registration and its [`lims_core::Entity`]
/// implementation.
///
/// Arguments: type name, registration name, resource segment and the
/// qualified document root as `prefix: tag`.
macro_rules! lims_entity {
    (
        $(#[$meta:meta])*
        $name:ident, $registered:literal, $segment:literal, $prefix:literal: $tag:literal
    ) => {
        $(#[$meta])*
        #[derive(Clone, Debug)]
        pub struct $name {
            handle: lims_core::EntityHandle,
        }

        lims_state::register_cache_item!($name, $registered);

        impl lims_core::Entity for $name {
            const URI_SEGMENT: &'static str = $segment;
            const ROOT_PREFIX: &'static str = $prefix;
            const ROOT_TAG: &'static str = $tag;

            fn from_handle(handle: lims_core::EntityHandle) -> Self {
                Self { handle }
            }

            fn handle(&self) -> &lims_core::EntityHandle {
                &self.handle
            }
        }
    };
}

/// Text fields: `getter[, setter] => "path"`.
macro_rules! string_fields {
    ($($(#[$meta:meta])* $get:ident $(, $set:ident)? => $path:literal);* $(;)?) => {
        $(
            #[allow(missing_docs)]
            $(#[$meta])*
            pub async fn $get(&self) -> Result<Option<String>, lims_core::LimsError> {
                self.handle.text($path).await
            }
            $(
                #[allow(missing_docs)]
                pub async fn $set(&self, value: &str) -> Result<(), lims_core::LimsError> {
                    self.handle.set_text($path, value).await
                }
            )?
        )*
    };
}

/// `yyyy-mm-dd` date fields: `getter[, setter] => "path"`.
macro_rules! date_fields {
    ($($(#[$meta:meta])* $get:ident $(, $set:ident)? => $path:literal);* $(;)?) => {
        $(
            #[allow(missing_docs)]
            $(#[$meta])*
            pub async fn $get(&self) -> Result<Option<chrono::NaiveDate>, lims_core::LimsError> {
                self.handle.date($path).await
            }
            $(
                #[allow(missing_docs)]
                pub async fn $set(&self, value: chrono::NaiveDate) -> Result<(), lims_core::LimsError> {
                    self.handle.set_date($path, value).await
                }
            )?
        )*
    };
}

/// Integer fields: `getter[, setter] => "path"`.
macro_rules! integer_fields {
    ($($(#[$meta:meta])* $get:ident $(, $set:ident)? => $path:literal);* $(;)?) => {
        $(
            #[allow(missing_docs)]
            $(#[$meta])*
            pub async fn $get(&self) -> Result<Option<i64>, lims_core::LimsError> {
                self.handle.integer($path).await
            }
            $(
                #[allow(missing_docs)]
                pub async fn $set(&self, value: i64) -> Result<(), lims_core::LimsError> {
                    self.handle.set_integer($path, value).await
                }
            )?
        )*
    };
}

/// Boolean fields: `getter[, setter] => "path"`.
macro_rules! boolean_fields {
    ($($(#[$meta:meta])* $get:ident $(, $set:ident)? => $path:literal);* $(;)?) => {
        $(
            #[allow(missing_docs)]
            $(#[$meta])*
            pub async fn $get(&self) -> Result<Option<bool>, lims_core::LimsError> {
                self.handle.boolean($path).await
            }
            $(
                #[allow(missing_docs)]
                pub async fn $set(&self, value: bool) -> Result<(), lims_core::LimsError> {
                    self.handle.set_boolean($path, value).await
                }
            )?
        )*
    };
}

/// Required attributes of the document root: `getter => "attribute"`.
macro_rules! attr_fields {
    ($($(#[$meta:meta])* $get:ident => $attribute:literal);* $(;)?) => {
        $(
            #[allow(missing_docs)]
            $(#[$meta])*
            pub async fn $get(&self) -> Result<String, lims_core::LimsError> {
                self.handle.root_attr($attribute).await
            }
        )*
    };
}

/// Repeated text elements: `getter => "path"`.
macro_rules! string_list_fields {
    ($($(#[$meta:meta])* $get:ident => $path:literal);* $(;)?) => {
        $(
            #[allow(missing_docs)]
            $(#[$meta])*
            pub async fn $get(&self) -> Result<Vec<String>, lims_core::LimsError> {
                self.handle.text_list($path).await
            }
        )*
    };
}

/// References to another record: `getter[, setter] => ("path", Target)`.
///
/// The getter resolves the referenced URI through the registry, so the same
/// record read through two objects is one instance.
macro_rules! reference_fields {
    ($($(#[$meta:meta])* $get:ident $(, $set:ident)? => ($path:literal, $target:ty));* $(;)?) => {
        $(
            #[allow(missing_docs)]
            $(#[$meta])*
            pub async fn $get(&self) -> Result<Option<$target>, lims_core::LimsError> {
                Ok(self
                    .handle
                    .ref_uri($path)
                    .await?
                    .map(|uri| self.handle.lims().resolve(&uri)))
            }
            $(
                #[allow(missing_docs)]
                pub async fn $set(&self, value: &$target) -> Result<(), lims_core::LimsError> {
                    self.handle
                        .set_ref_uri($path, lims_core::EntityExt::uri(value))
                        .await
                }
            )?
        )*
    };
}

/// Repeated references: `getter => ("path", Target)`.
macro_rules! reference_list_fields {
    ($($(#[$meta:meta])* $get:ident => ($path:literal, $target:ty));* $(;)?) => {
        $(
            #[allow(missing_docs)]
            $(#[$meta])*
            pub async fn $get(&self) -> Result<Vec<$target>, lims_core::LimsError> {
                Ok(self
                    .handle
                    .ref_uris($path)
                    .await?
                    .iter()
                    .map(|uri| self.handle.lims().resolve(uri))
                    .collect())
            }
        )*
    };
}

pub(crate) use {
    attr_fields, boolean_fields, date_fields, integer_fields, lims_entity, reference_fields,
    reference_list_fields, string_fields, string_list_fields,
};
