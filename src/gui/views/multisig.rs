//! Multisig page: contract information, owners, the submission modal and
//! one card per known transaction.

use crate::gui::app::{GuiApp, SubscriptionStatus};
use crate::gui::helpers::{address_line, format_native, stat};
use crate::gui::widgets::{SubmitModal, SubmitModalAction, TransactionRow};
use crate::utils::display_address;
use eframe::egui::{self, RichText};
use egui_extras::{Column, TableBuilder};
use ethers::types::U256;

impl GuiApp {
    pub(crate) fn view_multisig(&mut self, ui: &mut egui::Ui) {
        self.render_section_header(ui, "🔐", "MULTISIG");
        ui.add_space(self.theme.spacing_md);

        if self.page.is_none() {
            ui.label(
                RichText::new("No multisig open. Search by address or pick one from Home.")
                    .color(self.theme.text_secondary),
            );
            return;
        }

        self.render_contract_information(ui);
        ui.add_space(self.theme.spacing_lg);
        self.render_existing_transactions(ui);
        self.render_submit_modal(ui.ctx());
    }

    fn render_contract_information(&mut self, ui: &mut egui::Ui) {
        let theme = self.theme;
        let chain_id = self.config.chain_id;
        let native_token = self.config.native_token().to_string();
        let connected = self.connection.is_some();
        let Some(page) = self.page.as_mut() else {
            return;
        };

        theme.frame_panel().show(ui, |ui| {
            ui.set_min_width(ui.available_width());
            ui.heading(RichText::new("Contract Information").strong());
            ui.add_space(theme.spacing_sm);

            ui.horizontal(|ui| {
                ui.label("Address:");
                address_line(ui, &theme, &page.address, chain_id);
            });

            let (status, color) = match page.subscription {
                SubscriptionStatus::Connecting => ("Loading contract state...".to_string(), theme.text_secondary),
                SubscriptionStatus::Live { cutoff } => {
                    (format!("Live: following events after block {}", cutoff), theme.success)
                }
                SubscriptionStatus::NoContractCode => (
                    "No contract code at this address; showing its balance only.".to_string(),
                    theme.warning,
                ),
                SubscriptionStatus::Stopped => ("Not following contract events.".to_string(), theme.text_secondary),
            };
            ui.label(RichText::new(status).small().color(color));
            ui.add_space(theme.spacing_sm);

            match &page.summary {
                None => {
                    ui.spinner();
                }
                Some(summary) => {
                    ui.horizontal(|ui| {
                        stat(ui, &theme, "Balance", &format_native(summary.balance, &native_token));
                        ui.add_space(theme.spacing_lg * 2.0);
                        stat(ui, &theme, "Confirmations", &summary.required_confirmations.to_string());
                    });

                    if !summary.owners.is_empty() {
                        ui.add_space(theme.spacing_md);
                        ui.label(format!("Owners ({}):", summary.owners.len()));
                        ui.push_id("owners_table", |ui| {
                            TableBuilder::new(ui)
                                .striped(true)
                                .vscroll(false)
                                .column(Column::exact(36.0))
                                .column(Column::remainder())
                                .header(20.0, |mut header| {
                                    header.col(|ui| {
                                        ui.strong("#");
                                    });
                                    header.col(|ui| {
                                        ui.strong("Owner");
                                    });
                                })
                                .body(|mut body| {
                                    for (index, owner) in summary.owners.iter().enumerate() {
                                        body.row(20.0, |mut row| {
                                            row.col(|ui| {
                                                ui.label(format!("{}.", index + 1));
                                            });
                                            row.col(|ui| {
                                                ui.monospace(display_address(owner));
                                            });
                                        });
                                    }
                                });
                        });
                    }
                }
            }

            ui.add_space(theme.spacing_md);
            let button = ui
                .add_enabled(connected && !page.is_submitting(), theme.button_success("Create Transaction"));
            if button.clicked() {
                page.submit_form.reset();
                page.show_submit_modal = true;
            }
        });
    }

    fn render_existing_transactions(&mut self, ui: &mut egui::Ui) {
        let theme = self.theme;
        let chain_id = self.config.chain_id;
        let native_token = self.config.native_token().to_string();
        let connected = self.connection.is_some();
        let Some(page) = self.page.as_ref() else {
            return;
        };

        let mut filter = page.filter;
        let mut confirm: Option<U256> = None;

        ui.horizontal(|ui| {
            ui.heading(RichText::new("Existing Transactions").strong());
            ui.add_space(theme.spacing_md);
            ui.checkbox(&mut filter.pending, "Pending");
            ui.checkbox(&mut filter.executed, "Executed");
        });
        ui.add_space(theme.spacing_sm);

        if page.transactions.is_empty() {
            ui.label(RichText::new("No transactions match this filter.").color(theme.text_secondary));
        }

        let required = page.required_confirmations();
        for item in page.transactions.items() {
            let clicked = TransactionRow::new(item, required, &native_token, chain_id, &theme)
                .can_sign(connected)
                .show(ui);
            if clicked {
                confirm = Some(item.id());
            }
            ui.add_space(theme.spacing_sm);
        }

        if filter != page.filter {
            self.set_filter(filter);
        } else if let Some(id) = confirm {
            self.start_confirm(id);
        }
    }

    fn render_submit_modal(&mut self, ctx: &egui::Context) {
        let theme = self.theme;
        let native_token = self.config.native_token().to_string();
        let Some(page) = self.page.as_mut() else {
            return;
        };
        if !page.show_submit_modal {
            return;
        }

        let busy = page.is_submitting();
        match SubmitModal::new(&mut page.submit_form, &theme, &native_token, busy).show(ctx) {
            SubmitModalAction::Submit => self.start_submit(),
            SubmitModalAction::Cancel => {
                page.show_submit_modal = false;
                if !busy {
                    page.submit_form.reset();
                }
            }
            SubmitModalAction::None => {}
        }
    }
}

