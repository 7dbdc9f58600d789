mod app;
mod commands;
mod keyboard;
mod message;
mod state;
mod style;
mod syntax;
mod view;
mod widgets;

pub use app::run;
