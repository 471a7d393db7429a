// Service exports
pub mod campaigns;
pub mod notify;
pub mod pocketbase;
pub mod tasks;
pub mod trending;

pub use campaigns::{BulkSummary, CampaignError, CampaignProcessor, CampaignSummary};
pub use notify::Notifier;
pub use pocketbase::{
    ListQuery, PocketBaseClient, RecordPage, StoreCollections, StoreError, UpsertOutcome,
};
pub use tasks::{spawn_periodic, RetryPolicy, TaskQueue, TaskResult};
pub use trending::TrendingService;
