//! Concrete adapter implementations for ports.

pub mod checkpoint_file_adapter;
pub mod csv_adapter;
pub mod file_config_adapter;
pub mod http_classifier_adapter;
pub mod lexicon_classifier;
pub mod yahoo_rss_adapter;
