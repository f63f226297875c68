//! Padrón Core - Domain models, controller, presenter and configuration
//!
//! This crate contains the query-to-report pipeline: the [`controller::QueryController`]
//! that turns a municipality name into a fetch and holds the resulting
//! [`models::RequestState`], and the [`presenter::ReportPresenter`] that maps that
//! state to exactly one render-ready [`presenter::View`].

pub mod config;
pub mod controller;
pub mod error;
pub mod format;
pub mod models;
pub mod ports;
pub mod presenter;

pub use controller::{Applied, Completion, PendingFetch, QueryController};
pub use error::{FetchError, PadronError, Result};
pub use models::{NationalityCount, Query, Report, RequestState};
pub use ports::DemographicsSource;
pub use presenter::{select_view, to_report_view, ReportPresenter, ReportView, View};
