#![doc = include_str!("../README.md")]

mod api;
pub mod fixtures;

pub use api::{start_lims_mock, TEST_PASSWORD, TEST_USERNAME};
