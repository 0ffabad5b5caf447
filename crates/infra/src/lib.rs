//! Infrastructure layer: record store, configuration, portal services.

pub mod config;
pub mod record_store;
pub mod services;

mod integration_tests;

pub use config::{ConfigError, PortalConfig};
pub use record_store::{
    Filter, InMemoryRecordStore, PublishingRecordStore, Record, RecordStore, StoreError,
};
pub use services::{
    ContentService, DashboardService, DashboardView, MemberProfile, ProfileService, ServiceError,
};
