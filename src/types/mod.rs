pub mod dataset;
pub mod date_range;
pub mod observation_frame;
pub mod summary;
pub mod variable;
pub mod views;
