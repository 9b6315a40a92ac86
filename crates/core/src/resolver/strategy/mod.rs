//! Built-in resolution strategies, in contract order.

mod closure;
mod controller;
mod defaults;
mod fortify;

pub use closure::ClosureSource;
pub use controller::{ControllerSource, parse_controller_file};
pub use defaults::RouteDefaults;
pub use fortify::{FORTIFY_PACKAGE, FORTIFY_VIEW_METHODS, FortifyViews, fortify_view_method};
