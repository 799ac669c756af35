pub mod ai;
pub mod pipeline;
pub mod store;
pub mod types;
pub mod ui;
pub mod views;
