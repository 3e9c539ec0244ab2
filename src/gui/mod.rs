//! GUI module for the MultiSig Interface
//!
//! Desktop front end built with egui/eframe.
//!
//! ## Module Structure
//!
//! - `app` - GuiApp state, page lifecycle and job polling
//! - `async_job` - background jobs polled once per frame, optionally generation-tagged
//! - `theme` - light/dark palettes and button/frame builders (AppTheme)
//! - `helpers` - address lines, copy buttons, native amount formatting
//! - `notifications` - toast/history entries
//! - `views` - home, multisig and settings pages
//! - `widgets` - TransactionRow and SubmitModal
//!
//! ## Usage
//!
//! ```no_run
//! use multisig_interface::config::Config;
//! use multisig_interface::gui;
//! use multisig_interface::route::Route;
//!
//! let config = Config::from_env();
//! gui::launch(config, Route::Home).expect("Failed to launch GUI");
//! ```

mod app;
pub mod async_job;
pub mod helpers;
pub mod notifications;
pub mod theme;
pub mod views;
pub mod widgets;

pub use app::{launch, GuiApp, GuiSection};

pub use async_job::{spawn_job, AsyncJob, TaggedJob};
pub use notifications::NotificationEntry;
pub use theme::{configure_style, AppTheme};
pub use widgets::{SubmitModal, SubmitModalAction, TransactionRow};
