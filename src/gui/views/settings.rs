//! Settings view
//!
//! Edits a draft of the persisted settings: network, RPC override, signer
//! backend and event polling. Saving rebuilds the chain connection and
//! remounts the open multisig page.

use crate::config::{self, NETWORKS};
use crate::gui::app::{GuiApp, SettingsDraft};
use crate::gui::notifications::NotificationEntry;
use crate::user_settings::UserSettings;
use crate::wallet::{ledger_path, WalletBackend, PRIVATE_KEY_ENV};
use eframe::egui::{self, RichText};

impl GuiApp {
    pub(crate) fn view_settings(&mut self, ui: &mut egui::Ui) {
        self.render_section_header(ui, "⚙", "SETTINGS");
        ui.add_space(self.theme.spacing_md);

        self.render_network_settings(ui);
        ui.add_space(self.theme.spacing_lg);

        self.render_signer_settings(ui);
        ui.add_space(self.theme.spacing_lg);

        self.render_sync_settings(ui);
        ui.add_space(self.theme.spacing_lg);

        self.render_settings_actions(ui);
    }

    fn render_network_settings(&mut self, ui: &mut egui::Ui) {
        let theme = self.theme;
        theme.frame_panel().show(ui, |ui| {
            ui.label(RichText::new("Network & RPC").size(18.0).strong());
            ui.add_space(theme.spacing_sm);

            let selected_text = match config::find_network_by_chain_id(self.settings_draft.chain_id) {
                Some(network) => format!("{} · {} · #{}", network.label, network.native_token, network.chain_id),
                None => format!("Custom · #{}", self.settings_draft.chain_id),
            };

            let mut picked: Option<u64> = None;
            egui::ComboBox::from_id_source("settings_network")
                .selected_text(selected_text)
                .width(280.0)
                .show_ui(ui, |ui| {
                    for network in NETWORKS.iter() {
                        let label = format!("{} · {} · #{}", network.label, network.native_token, network.chain_id);
                        let selected = network.chain_id == self.settings_draft.chain_id;
                        if ui.selectable_label(selected, label).clicked() {
                            picked = Some(network.chain_id);
                        }
                    }
                });
            if let Some(chain_id) = picked {
                self.settings_draft.select_chain(chain_id, &self.user_settings);
            }

            ui.add_space(theme.spacing_sm);
            let default_rpc = config::find_network_by_chain_id(self.settings_draft.chain_id)
                .map(|n| n.default_rpc)
                .unwrap_or("http://127.0.0.1:8545");
            ui.horizontal(|ui| {
                ui.label("RPC URL:");
                ui.add(
                    egui::TextEdit::singleline(&mut self.settings_draft.custom_rpc)
                        .hint_text(default_rpc)
                        .desired_width(420.0),
                );
            });
            ui.label(
                RichText::new("Leave empty to use the network's default endpoint.")
                    .small()
                    .color(theme.text_secondary),
            );
        });
    }

    fn render_signer_settings(&mut self, ui: &mut egui::Ui) {
        let theme = self.theme;
        theme.frame_panel().show(ui, |ui| {
            ui.label(RichText::new("Signer").size(18.0).strong());
            ui.add_space(theme.spacing_sm);

            for backend in WalletBackend::ALL {
                ui.horizontal(|ui| {
                    ui.radio_value(&mut self.settings_draft.wallet_backend, backend, "");
                    ui.vertical(|ui| {
                        ui.label(RichText::new(backend.display_name()).strong());
                        ui.label(RichText::new(backend.description()).small().color(theme.text_secondary));
                    });
                });
                ui.add_space(theme.spacing_xs);
            }

            match self.settings_draft.wallet_backend {
                WalletBackend::Ledger => {
                    ui.add_space(theme.spacing_sm);
                    ui.horizontal(|ui| {
                        ui.label("Account index:");
                        ui.add(
                            egui::DragValue::new(&mut self.settings_draft.ledger_account_index)
                                .speed(1)
                                .clamp_range(0..=1_000),
                        );
                        ui.monospace(
                            RichText::new(ledger_path(self.settings_draft.ledger_account_index))
                                .color(theme.text_secondary),
                        );
                    });
                }
                WalletBackend::PrivateKey => {
                    ui.add_space(theme.spacing_sm);
                    let present = std::env::var(PRIVATE_KEY_ENV).map(|v| !v.trim().is_empty()).unwrap_or(false);
                    if present {
                        ui.colored_label(theme.success, format!("{} is set.", PRIVATE_KEY_ENV));
                    } else {
                        ui.colored_label(theme.warning, format!("{} is not set; writes will fail.", PRIVATE_KEY_ENV));
                    }
                }
                WalletBackend::NodeAccount => {}
            }
        });
    }

    fn render_sync_settings(&mut self, ui: &mut egui::Ui) {
        let theme = self.theme;
        theme.frame_panel().show(ui, |ui| {
            ui.label(RichText::new("Event Polling").size(18.0).strong());
            ui.add_space(theme.spacing_sm);
            ui.horizontal(|ui| {
                ui.label("Poll interval:");
                ui.add(
                    egui::DragValue::new(&mut self.settings_draft.poll_interval_ms)
                        .speed(50)
                        .clamp_range(250..=60_000)
                        .suffix(" ms"),
                );
            });
            ui.label(
                RichText::new("How often the node is asked for new multisig events.")
                    .small()
                    .color(theme.text_secondary),
            );
        });
    }

    fn render_settings_actions(&mut self, ui: &mut egui::Ui) {
        let dirty = self.settings_draft.differs_from(&self.user_settings);
        let mut save = false;
        let mut revert = false;

        ui.horizontal(|ui| {
            if ui
                .add_enabled(dirty, self.theme.button_primary("Save & Reconnect"))
                .clicked()
            {
                save = true;
            }
            if ui.add_enabled(dirty, self.theme.button_secondary("Revert")).clicked() {
                revert = true;
            }
            if dirty {
                ui.label(RichText::new("(unsaved changes)").small().color(self.theme.warning));
            }
        });
        ui.add_space(self.theme.spacing_sm);
        ui.label(
            RichText::new(format!("Settings file: {}", UserSettings::settings_path_display()))
                .small()
                .color(self.theme.text_secondary),
        );

        if revert {
            self.settings_draft = SettingsDraft::from_settings(&self.user_settings);
        }
        if save {
            self.save_settings();
        }
    }

    fn save_settings(&mut self) {
        self.settings_draft.apply_to(&mut self.user_settings);
        if let Err(e) = self.user_settings.save() {
            self.notify(NotificationEntry::failure("Saving settings", &e));
            return;
        }
        self.reconnect();
        self.settings_draft = SettingsDraft::from_settings(&self.user_settings);
        self.notify(NotificationEntry::new(format!(
            "Settings saved. Connected to {} ({}).",
            self.config.network_label(),
            self.config.rpc_url
        )));
    }
}
