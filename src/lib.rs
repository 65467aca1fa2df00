pub mod audio;
pub mod clock;
pub mod config;
pub mod constants;
