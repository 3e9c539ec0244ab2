//! "Create a Transaction" dialog.

use eframe::egui::{self, RichText};

use crate::gui::theme::AppTheme;
use crate::submit_form::SubmitForm;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitModalAction {
    None,
    Submit,
    Cancel,
}

pub struct SubmitModal<'a> {
    form: &'a mut SubmitForm,
    theme: &'a AppTheme,
    native_token: &'a str,
    busy: bool,
}

impl<'a> SubmitModal<'a> {
    pub fn new(form: &'a mut SubmitForm, theme: &'a AppTheme, native_token: &'a str, busy: bool) -> Self {
        Self {
            form,
            theme,
            native_token,
            busy,
        }
    }

    pub fn show(self, ctx: &egui::Context) -> SubmitModalAction {
        let theme = self.theme;
        let form = self.form;
        let busy = self.busy;
        let native_token = self.native_token;
        let mut action = SubmitModalAction::None;
        let mut open = true;

        egui::Window::new("Create a Transaction")
            .open(&mut open)
            .collapsible(false)
            .resizable(false)
            .default_width(420.0)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                ui.add_enabled_ui(!busy, |ui| {
                    ui.label(RichText::new("Destination").strong());
                    let destination = ui.add(
                        egui::TextEdit::singleline(&mut form.destination)
                            .hint_text("0x...")
                            .font(egui::TextStyle::Monospace)
                            .desired_width(f32::INFINITY),
                    );
                    if destination.lost_focus() {
                        form.touch_destination();
                    }
                    if let Some(err) = form.visible_destination_error() {
                        ui.colored_label(theme.error, err.to_string());
                    }

                    ui.add_space(theme.spacing_md);
                    ui.label(RichText::new(format!("Value ({})", native_token)).strong());
                    let value = ui.add(
                        egui::TextEdit::singleline(&mut form.value)
                            .hint_text("4.2069")
                            .desired_width(f32::INFINITY),
                    );
                    if value.lost_focus() {
                        form.touch_value();
                    }
                    if let Some(err) = form.visible_value_error() {
                        ui.colored_label(theme.error, err.to_string());
                    }
                });

                ui.add_space(theme.spacing_md);
                ui.horizontal(|ui| {
                    if ui
                        .add_enabled(form.can_submit() && !busy, theme.button_primary("Submit"))
                        .clicked()
                    {
                        action = SubmitModalAction::Submit;
                    }
                    if busy {
                        ui.spinner();
                        ui.label(RichText::new("Waiting for the wallet...").color(theme.text_secondary));
                    }
                    if ui.add(theme.button_secondary("Cancel")).clicked() {
                        action = SubmitModalAction::Cancel;
                    }
                });
            });

        if !open {
            action = SubmitModalAction::Cancel;
        }
        action
    }
}
