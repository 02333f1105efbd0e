pub mod app;
pub mod control;
pub mod fetch;
pub mod logger;
pub mod params;
