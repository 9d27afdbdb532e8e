pub mod base_commands;
pub mod convert_cmd;
pub mod report_format;
pub mod simulate_cmd;
