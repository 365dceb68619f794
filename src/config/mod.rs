//! Configuration module for Hark.
//!
//! Handles loading and managing application settings.

mod settings;

pub use settings::{
    BrowseSettings, GeneralSettings, IndexSettings, ProgressSettings, SearchSettings, Settings,
    SourceKind, SourceSettings,
};
