#![doc = include_str!("../README.md")]

/// This module defines the marker trait for types the registry can cache.
pub mod item;
/// This module provides the URI-keyed identity registry.
pub mod registry;
