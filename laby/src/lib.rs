pub mod app;
pub mod cli;
pub mod constants;
pub mod input;
pub mod logging;
pub mod renderer;
pub mod settings;
