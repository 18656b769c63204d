pub mod badge_cache;
pub mod badge_fetch;
pub mod dataset;
pub mod feed;
pub mod http_client;
pub mod markers;
pub mod state;
pub mod store;
pub mod timeline;
