//! Chart Rendering Adapter
//!
//! Projects a [`Series`](crate::series::Series) onto a dual-axis line chart:
//!
//! - **options**: Chart description (colours, axes, tooltip labels)
//! - **format**: Currency, date and tick label formatting
//! - **scale**: Yearly time axis and logarithmic value axis
//! - **tooltip**: Nearest-in-x point lookup and tooltip contents
//! - **render**: SVG output
//! - **view**: Keyed view state that resets on multiplier change
//!
//! ```text
//!   $ (log)
//!   100,000 ┤
//!    50,000 ┤            ╭──╮
//!    20,000 ┤  ╭─────────╯  ╰─
//!    10,000 ┼──┴──────┬──────┬─
//!               2021     2022
//! ```

pub mod format;
pub mod options;
pub mod render;
pub mod scale;
pub mod tooltip;
pub mod view;

pub use options::{ChartOptions, LogAxisOptions, TimeAxisOptions, TimeUnit, TooltipOptions};
pub use render::{PlotLayout, SvgRenderer};
pub use scale::{LogScale, TimeScale};
pub use tooltip::{nearest_index, tooltip_at, Tooltip};
pub use view::ChartView;
