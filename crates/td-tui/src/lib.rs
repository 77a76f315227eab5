//! Interactive dashboard for multi-agent support investigations.
//!
//! State lives in [`app::App`] and changes only inside
//! [`reducer::update`]; everything that touches the outside world is
//! described as an [`effect::Effect`], run by [`executor::Collaborators`],
//! and fed back as a [`message::Message`] by the [`scheduler`].

pub mod api_client;
pub mod app;
pub mod checkpoint;
pub mod cli_client;
pub mod clipboard;
pub mod editor;
pub mod effect;
pub mod error;
pub mod executor;
pub mod input;
pub mod message;
pub mod modal;
pub mod reducer;
pub mod scheduler;
pub mod sync;
pub mod tabs;
pub mod ui;
pub mod widgets;
