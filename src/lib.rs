pub mod cluster;
pub mod command;
pub mod config;
pub mod favourites;
pub mod flags;
pub mod history;
pub mod hotkeys;
pub mod kubectl;
pub mod saved_outputs;
pub mod selection;
pub mod storage;
pub mod tasks;
pub mod wizard;
