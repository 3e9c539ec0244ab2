//! Desktop interface to an EVM multisig wallet contract.
//!
//! The library holds everything except window setup: contract bindings, the
//! chain connection and signer backends, the event synchronizer and the
//! view-state types the GUI renders.

pub mod config;
pub mod connection;
pub mod contract;
pub mod error;
pub mod generation;
pub mod gui;
pub mod operation_log;
pub mod route;
pub mod submit_form;
pub mod sync;
pub mod transaction_item;
pub mod types;
pub mod user_settings;
pub mod utils;
pub mod wallet;
