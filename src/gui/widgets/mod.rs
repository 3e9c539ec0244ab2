//! Reusable widgets embedded in the views.
//!
//! - `TransactionRow` - one transaction card with its confirm button
//! - `SubmitModal` - the "Create a Transaction" dialog

mod submit_modal;
mod transaction_row;

pub use submit_modal::{SubmitModal, SubmitModalAction};
pub use transaction_row::TransactionRow;
