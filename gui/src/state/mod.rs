// Signal-backed implementations of the controller seams used by the desktop
// window.
pub mod app_state;

pub use app_state::{use_signal_view, AppController, ControllerHandle, SignalChart, SignalView, SvgChartFactory};
