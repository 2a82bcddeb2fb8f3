use std::any::TypeId;

/// Marks an entity type as storable in the registry.
///
/// Implement it by invoking [`crate::register_cache_item`] next to the
/// type's definition; the macro seals the trait so a hand-written impl
/// cannot bypass the naming rules.
pub trait CacheItem: Internal + Send + Sync + 'static {
    /// A stable name identifying the type in logs and diagnostics.
    const NAME: &'static str;
    /// Returns the `TypeId` of the type implementing this trait.
    fn type_id() -> TypeId {
        TypeId::of::<Self>()
    }
}

/// Makes an entity type storable in the registry. Invoke exactly once, in
/// the crate that defines the type, with a name that never changes.
#[macro_export]
macro_rules! register_cache_item {
    ($ty:ty, $name:literal) => {
        const _: () = {
            impl $crate::item::___internal::Internal for $ty {}
            impl $crate::item::CacheItem for $ty {
                const NAME: &'static str = $name;
            }
        };
    };
}

/// Implementation detail of [`crate::register_cache_item`]; nothing in here
/// is part of the public surface.
#[doc(hidden)]
pub mod ___internal {

    // Sealing trait: keeps `CacheItem` impls confined to the macro.
    pub trait Internal {}
}
pub(crate) use ___internal::Internal;
