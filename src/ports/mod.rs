//! Port traits: the seams between the ingestion domain and the outside world.

pub mod checkpoint_port;
pub mod classifier_port;
pub mod config_port;
pub mod news_port;
pub mod store_port;
