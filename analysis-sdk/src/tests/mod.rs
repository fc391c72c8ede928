//! Unit tests for the Analysis SDK
//!
//! This module contains tests for the components of the SDK.

mod common;

pub mod dispatch_tests;
pub mod monitor_tests;
