//! Integration tests for the harvester and the prober
//!
//! These tests use wiremock to stand in for the registry and for the probed
//! endpoints.

mod harvest_tests;
mod probe_tests;
