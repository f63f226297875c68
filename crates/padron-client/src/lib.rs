//! Padrón Client - HTTP adapter for the demographic data service
//!
//! Implements [`padron_core::DemographicsSource`] over
//! `GET <endpoint>?municipality=<name>`.

pub mod http;

pub use http::HttpDemographicsSource;
