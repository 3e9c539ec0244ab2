//! One card in the "Existing Transactions" list.

use eframe::egui::{self, RichText};
use ethers::types::U256;

use crate::gui::helpers::{address_line, format_native, stat};
use crate::gui::theme::AppTheme;
use crate::transaction_item::TransactionItem;
use crate::utils::{display_address, format_payload};

pub struct TransactionRow<'a> {
    item: &'a TransactionItem,
    required: U256,
    native_token: &'a str,
    chain_id: u64,
    theme: &'a AppTheme,
    can_sign: bool,
}

impl<'a> TransactionRow<'a> {
    pub fn new(item: &'a TransactionItem, required: U256, native_token: &'a str, chain_id: u64, theme: &'a AppTheme) -> Self {
        Self {
            item,
            required,
            native_token,
            chain_id,
            theme,
            can_sign: true,
        }
    }

    /// Disable the confirm button (no connection)
    pub fn can_sign(mut self, can_sign: bool) -> Self {
        self.can_sign = can_sign;
        self
    }

    /// Render the card; returns true when "Confirm Transaction" was clicked.
    pub fn show(self, ui: &mut egui::Ui) -> bool {
        let theme = self.theme;
        let item = self.item;
        let mut confirm_clicked = false;

        theme.frame_card().show(ui, |ui| {
            ui.set_min_width(ui.available_width());
            ui.horizontal(|ui| {
                ui.label(RichText::new(format!("Transaction ID: {}", item.id())).size(17.0).strong());
                if item.is_loading() {
                    ui.spinner();
                }
            });
            ui.add_space(theme.spacing_xs);

            let Some(record) = item.record() else {
                if !item.is_loading() {
                    ui.label(RichText::new("Could not load this transaction.").color(theme.error));
                }
                return;
            };

            ui.horizontal(|ui| {
                ui.label("Destination:");
                address_line(ui, theme, &record.destination, self.chain_id);
            });

            ui.horizontal(|ui| {
                stat(ui, theme, "Value", &format_native(record.value, self.native_token));
                ui.add_space(theme.spacing_lg * 2.0);
                stat(ui, theme, "Executed", item.status_label());
            });

            ui.horizontal_wrapped(|ui| {
                ui.label(RichText::new("Data:").color(theme.text_secondary));
                ui.monospace(format_payload(&record.data));
            });

            if let Some(heading) = item.confirmations_label(self.required) {
                ui.add_space(theme.spacing_xs);
                ui.label(heading);
                for owner in &record.confirmed_by {
                    ui.monospace(format!("  {}", display_address(owner)));
                }
            }

            if !item.is_executed() {
                ui.add_space(theme.spacing_sm);
                if item.is_confirming() {
                    ui.horizontal(|ui| {
                        ui.spinner();
                        ui.label(RichText::new("Waiting for the confirmation to be mined...").color(theme.text_secondary));
                    });
                } else if ui
                    .add_enabled(self.can_sign, theme.button_warning("Confirm Transaction"))
                    .clicked()
                {
                    confirm_clicked = true;
                }
            }
        });

        confirm_clicked
    }
}
