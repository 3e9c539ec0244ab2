//! Home view: open a multisig, recently opened ones, and the operation log.

use crate::gui::app::{GuiApp, GuiSection};
use crate::gui::helpers::address_line;
use crate::gui::theme::AppTheme;
use crate::route::Route;
use crate::user_settings::RecentMultiSig;
use eframe::egui::{self, RichText};

/// "2024-05-01 14:03" in local time, or the raw string if it does not parse
fn format_last_opened(recent: &RecentMultiSig) -> String {
    chrono::DateTime::parse_from_rfc3339(&recent.last_opened)
        .map(|t| t.with_timezone(&chrono::Local).format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|_| recent.last_opened.clone())
}

impl GuiApp {
    pub(crate) fn view_home(&mut self, ui: &mut egui::Ui) {
        self.render_section_header(ui, "🏠", "HOME");
        ui.add_space(self.theme.spacing_md);

        self.render_open_panel(ui);
        ui.add_space(self.theme.spacing_md);

        self.render_recent_panel(ui);
        ui.add_space(self.theme.spacing_md);

        self.render_network_panel(ui);
        ui.add_space(self.theme.spacing_lg);

        self.render_logs(ui);
    }

    fn render_open_panel(&mut self, ui: &mut egui::Ui) {
        let panel_width = AppTheme::responsive_width(ui, 320.0, 700.0, 900.0);
        let theme = self.theme;
        let mut open_requested = false;

        theme.frame_panel().show(ui, |ui| {
            ui.set_min_width(panel_width);
            ui.label(RichText::new("Open a Multisig").size(18.0).strong());
            ui.add_space(theme.spacing_xs);
            ui.label(
                RichText::new("Paste the address of a deployed multisig wallet contract.")
                    .color(theme.text_secondary),
            );
            ui.add_space(theme.spacing_sm);

            ui.horizontal(|ui| {
                let response = ui.add(
                    egui::TextEdit::singleline(&mut self.home_address_input)
                        .hint_text("0x...")
                        .font(egui::TextStyle::Monospace)
                        .desired_width(420.0),
                );
                if response.changed() {
                    self.home_address_error = None;
                }
                let enter = response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
                if ui.add(theme.button_primary("Open")).clicked() || enter {
                    open_requested = true;
                }
            });

            if let Some(err) = &self.home_address_error {
                ui.colored_label(theme.error, err);
            }
        });

        if open_requested {
            let input = self.home_address_input.trim().to_string();
            if input.is_empty() {
                self.home_address_error = Some("Enter a multisig address".to_string());
            } else {
                self.home_address_error = self.navigate_to_input(&input);
            }
        }
    }

    fn render_recent_panel(&mut self, ui: &mut egui::Ui) {
        let theme = self.theme;
        let chain_id = self.config.chain_id;
        let recent: Vec<RecentMultiSig> = self.user_settings.recent_for_chain(chain_id).cloned().collect();
        let mut open: Option<Route> = None;

        theme.frame_panel().show(ui, |ui| {
            ui.label(
                RichText::new(format!("Recent Multisigs on {}", self.config.network_label()))
                    .size(18.0)
                    .strong(),
            );
            ui.add_space(theme.spacing_sm);

            if recent.is_empty() {
                ui.label(RichText::new("Nothing opened on this network yet.").color(theme.text_secondary));
                return;
            }

            for entry in &recent {
                ui.horizontal(|ui| {
                    if ui.add(theme.button_small("Open")).clicked() {
                        open = Some(Route::MultiSig(entry.address));
                    }
                    address_line(ui, &theme, &entry.address, chain_id);
                    ui.label(
                        RichText::new(format_last_opened(entry))
                            .small()
                            .color(theme.text_secondary),
                    );
                });
            }
        });

        if let Some(route) = open {
            self.navigate(route);
        }
    }

    fn render_network_panel(&mut self, ui: &mut egui::Ui) {
        let theme = self.theme;
        theme.frame_panel().show(ui, |ui| {
            ui.label(RichText::new("Connection").size(18.0).strong());
            ui.add_space(theme.spacing_sm);

            egui::Grid::new("connection_grid")
                .num_columns(2)
                .spacing([theme.spacing_md, theme.spacing_xs])
                .show(ui, |ui| {
                    ui.label(RichText::new("Network:").color(theme.text_secondary));
                    ui.label(RichText::new(self.config.network_label()).strong());
                    ui.end_row();

                    ui.label(RichText::new("Chain ID:").color(theme.text_secondary));
                    ui.label(self.config.chain_id.to_string());
                    ui.end_row();

                    ui.label(RichText::new("RPC:").color(theme.text_secondary));
                    ui.horizontal(|ui| {
                        ui.monospace(&self.config.rpc_url);
                        crate::gui::helpers::copy_button(ui, &theme, &self.config.rpc_url, "Copy RPC URL");
                    });
                    ui.end_row();

                    ui.label(RichText::new("Signer:").color(theme.text_secondary));
                    ui.label(self.config.wallet_backend.display_name());
                    ui.end_row();
                });

            if let Some(err) = &self.connection_error {
                ui.add_space(theme.spacing_xs);
                ui.colored_label(theme.error, format!("Not connected: {}", err));
            }

            ui.add_space(theme.spacing_sm);
            if ui
                .link(RichText::new("Change network or signer in Settings").small().color(theme.accent_blue))
                .clicked()
            {
                self.section = GuiSection::Settings;
            }
        });
    }

    fn render_logs(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.heading(RichText::new("Operation Log").size(18.0));
            ui.add_space(self.theme.spacing_sm);
            let is_loading = self.log_view.job.as_ref().is_some_and(|job| job.is_running());
            if ui
                .add_enabled(!is_loading, self.theme.button_small(if is_loading { "..." } else { "Refresh" }))
                .clicked()
            {
                self.refresh_logs();
            }
        });
        ui.label(
            RichText::new(crate::operation_log::log_file_path())
                .small()
                .color(self.theme.text_secondary),
        );
        ui.add_space(self.theme.spacing_xs);

        if let Some(err) = &self.log_view.error {
            ui.colored_label(self.theme.error, err);
        }

        let scroll_to_bottom = self.log_view.scroll_to_bottom;
        self.theme.frame_surface().show(ui, |ui| {
            ui.set_min_height(200.0);
            egui::ScrollArea::vertical()
                .id_source("operation_log_scroll")
                .auto_shrink([false, false])
                .max_height(320.0)
                .show(ui, |ui| {
                    ui.set_min_width(ui.available_width());
                    ui.monospace(&self.log_view.content);
                    if scroll_to_bottom {
                        let bottom = ui.label("");
                        bottom.scroll_to_me(Some(egui::Align::BOTTOM));
                    }
                });
        });
        self.log_view.scroll_to_bottom = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ethers::types::Address;

    #[test]
    fn test_format_last_opened_falls_back_to_raw() {
        let recent = RecentMultiSig {
            address: Address::zero(),
            chain_id: 1,
            last_opened: "yesterday".to_string(),
        };
        assert_eq!(format_last_opened(&recent), "yesterday");
    }

    #[test]
    fn test_format_last_opened_parses_rfc3339() {
        let recent = RecentMultiSig {
            address: Address::zero(),
            chain_id: 1,
            last_opened: "2024-05-01T14:03:00+00:00".to_string(),
        };
        let formatted = format_last_opened(&recent);
        assert!(formatted.starts_with("2024-05-0"));
        assert_eq!(formatted.len(), "2024-05-01 14:03".len());
    }
}
