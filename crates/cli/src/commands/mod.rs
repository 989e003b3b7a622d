pub mod archive;
pub mod onboard;
pub mod status;
