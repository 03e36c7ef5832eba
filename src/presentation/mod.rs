pub mod view;

pub use view::{Controls, Indicator, render_report, render_state};
