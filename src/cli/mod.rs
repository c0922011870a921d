pub mod setup;
pub mod table;
pub mod ui;
