//! Concrete adapter implementations for ports.

pub mod browser_adapter;
pub mod close_chart_svg;
pub mod echarts_report;
pub mod file_config_adapter;
pub mod http_client;
pub mod sina_adapter;
#[cfg(test)]
pub(crate) mod test_server;
pub mod yahoo_adapter;
