//! Data module - CSV loading, normalization and aggregation

mod cache;
mod loader;
mod model;
pub mod normalize;
mod processor;

pub use cache::DataCache;
pub use loader::{DashboardData, DataSources, LeadSource};
pub use model::{CampaignRow, Lead, Origin, VehicleModel};
pub use processor::{
    DailyLeads, DashboardView, DataProcessor, DateRange, Filters, ModelCount, RankedCampaign,
    SortColumn, TableRow, TableSort, ALL_CAMPAIGNS,
};

#[cfg(test)]
pub(crate) use loader::tests as fixtures;
