pub mod charts;
pub mod geo;
pub mod popup;
pub mod spinner;
pub mod tables;
