//! Charts module - interactive plots and PNG export

mod plotter;
mod renderer;

pub use plotter::{ChartPlotter, PALETTE};
pub use renderer::{chart_file_name, StaticChartRenderer, PNG_SIZE};
