//! Terminal runtime: a fixed-rate tick clock, throttled rendering and
//! crossterm input, driving an [`App`].

pub use self::{app::App, runtime::Runtime};

mod app;
mod event;
mod event_loop;
mod runtime;
