//! View modules for the GUI
//!
//! Each submodule adds a `view_*` method to `GuiApp`, called from
//! `App::update` in `app.rs` for the current section.
//!
//! - `home` - open a multisig, recently opened multisigs, operation log
//! - `multisig` - contract information, submission modal, existing transactions
//! - `settings` - network, RPC endpoint, signer backend, polling

pub mod home;
pub mod multisig;
pub mod settings;

use super::app::GuiApp;
use eframe::egui::{self, RichText};

impl GuiApp {
    pub(crate) fn render_section_header(&self, ui: &mut egui::Ui, icon: &str, title: &str) {
        ui.horizontal(|ui| {
            ui.label(RichText::new(icon).size(22.0).color(self.theme.primary));
            ui.label(RichText::new(title).size(24.0).strong().color(self.theme.text_primary));
        });
        ui.separator();
    }
}
