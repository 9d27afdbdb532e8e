pub mod api_config;
pub mod api_error;
pub mod chart;
pub mod chart_png;
pub mod conversion_controller;
pub mod currency;
pub mod file_saver;
pub mod focus_api;
pub mod simulation_api;
pub mod simulation_controller;
pub mod summary_cards;
pub mod workflow;
