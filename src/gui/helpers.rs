//! Small rendering helpers shared by views and widgets.

use eframe::egui::{self, RichText};
use ethers::types::{Address, U256};

use super::theme::AppTheme;
use crate::config::get_address_explorer_url;
use crate::utils::{display_address, format_ether};

/// "1.5 ETH"
pub fn format_native(wei: U256, native_token: &str) -> String {
    format!("{} {}", format_ether(wei), native_token)
}

/// Open a URL in the system browser, logging failures
pub fn open_url(url: &str) {
    if let Err(e) = open::that(url) {
        tracing::warn!("Failed to open {}: {}", url, e);
    }
}

pub fn copy_button(ui: &mut egui::Ui, theme: &AppTheme, text: &str, hover: &str) {
    if ui
        .add(egui::Button::new(RichText::new("📋").color(theme.text_secondary)).small())
        .on_hover_text(hover)
        .clicked()
    {
        ui.output_mut(|o| o.copied_text = text.to_string());
    }
}

/// Checksummed address in monospace with copy and explorer buttons
pub fn address_line(ui: &mut egui::Ui, theme: &AppTheme, address: &Address, chain_id: u64) {
    let text = display_address(address);
    ui.horizontal(|ui| {
        ui.monospace(RichText::new(&text).color(theme.text_primary));
        copy_button(ui, theme, &text, "Copy address");
        if let Some(url) = get_address_explorer_url(chain_id, &text) {
            if ui
                .add(egui::Button::new(RichText::new("↗").color(theme.accent_blue)).small())
                .on_hover_text("View on block explorer")
                .clicked()
            {
                open_url(&url);
            }
        }
    });
}

/// Label/value pair in the style of a stat block
pub fn stat(ui: &mut egui::Ui, theme: &AppTheme, label: &str, value: &str) {
    ui.vertical(|ui| {
        ui.label(RichText::new(label).small().color(theme.text_secondary));
        ui.label(RichText::new(value).size(20.0).strong().color(theme.text_primary));
    });
}
