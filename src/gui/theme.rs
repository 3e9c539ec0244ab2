//! Colors, spacing and styled widget factories.

use eframe::egui;

#[derive(Clone, Copy)]
pub struct AppTheme {
    pub dark: bool,

    // Base colors
    pub background: egui::Color32,
    pub surface: egui::Color32,
    pub surface_hover: egui::Color32,
    pub surface_active: egui::Color32,
    pub panel_fill: egui::Color32,
    pub card_fill: egui::Color32,
    pub text_primary: egui::Color32,
    pub text_secondary: egui::Color32,

    // Semantic colors
    pub primary: egui::Color32,
    pub secondary: egui::Color32,
    pub success: egui::Color32,
    pub warning: egui::Color32,
    pub error: egui::Color32,

    // Accent colors
    pub accent_blue: egui::Color32,
    pub accent_green: egui::Color32,
    pub accent_orange: egui::Color32,

    // Spacing scale
    pub spacing_xs: f32,
    pub spacing_sm: f32,
    pub spacing_md: f32,
    pub spacing_lg: f32,

    pub button_small: egui::Vec2,
    pub button_medium: egui::Vec2,
}

impl Default for AppTheme {
    fn default() -> Self {
        Self::light()
    }
}

impl AppTheme {
    pub fn for_mode(dark: bool) -> Self {
        if dark {
            Self::dark()
        } else {
            Self::light()
        }
    }

    pub fn dark() -> Self {
        Self {
            dark: true,
            background: egui::Color32::from_rgb(26, 32, 44),
            surface: egui::Color32::from_rgb(45, 55, 72),
            surface_hover: egui::Color32::from_rgb(58, 70, 90),
            surface_active: egui::Color32::from_rgb(74, 85, 104),
            panel_fill: egui::Color32::from_rgb(26, 32, 44),
            card_fill: egui::Color32::from_rgb(45, 55, 72),
            text_primary: egui::Color32::from_rgb(237, 242, 247),
            text_secondary: egui::Color32::from_rgb(160, 174, 192),

            primary: egui::Color32::from_rgb(99, 179, 237),
            secondary: egui::Color32::from_rgb(74, 85, 104),
            success: egui::Color32::from_rgb(104, 211, 145),
            warning: egui::Color32::from_rgb(246, 173, 85),
            error: egui::Color32::from_rgb(252, 129, 129),

            accent_blue: egui::Color32::from_rgb(99, 179, 237),
            accent_green: egui::Color32::from_rgb(104, 211, 145),
            accent_orange: egui::Color32::from_rgb(246, 173, 85),

            spacing_xs: 4.0,
            spacing_sm: 8.0,
            spacing_md: 16.0,
            spacing_lg: 24.0,

            button_small: egui::vec2(80.0, 24.0),
            button_medium: egui::vec2(140.0, 32.0),
        }
    }

    pub fn light() -> Self {
        Self {
            dark: false,
            background: egui::Color32::from_rgb(255, 255, 255),
            surface: egui::Color32::from_rgb(237, 242, 247),
            surface_hover: egui::Color32::from_rgb(226, 232, 240),
            surface_active: egui::Color32::from_rgb(203, 213, 224),
            panel_fill: egui::Color32::from_rgb(255, 255, 255),
            card_fill: egui::Color32::from_rgb(247, 250, 252),
            text_primary: egui::Color32::from_rgb(26, 32, 44),
            text_secondary: egui::Color32::from_rgb(113, 128, 150),

            primary: egui::Color32::from_rgb(49, 130, 206),
            secondary: egui::Color32::from_rgb(226, 232, 240),
            success: egui::Color32::from_rgb(56, 161, 105),
            warning: egui::Color32::from_rgb(221, 107, 32),
            error: egui::Color32::from_rgb(229, 62, 62),

            accent_blue: egui::Color32::from_rgb(49, 130, 206),
            accent_green: egui::Color32::from_rgb(56, 161, 105),
            accent_orange: egui::Color32::from_rgb(221, 107, 32),

            spacing_xs: 4.0,
            spacing_sm: 8.0,
            spacing_md: 16.0,
            spacing_lg: 24.0,

            button_small: egui::vec2(80.0, 24.0),
            button_medium: egui::vec2(140.0, 32.0),
        }
    }

    /// Solid button in the given color, white label
    fn button_filled(&self, text: &str, fill: egui::Color32) -> egui::Button<'_> {
        egui::Button::new(egui::RichText::new(text).color(egui::Color32::WHITE).strong())
            .fill(fill)
            .rounding(6.0)
            .min_size(self.button_medium)
    }

    pub fn button_primary(&self, text: &str) -> egui::Button<'_> {
        self.button_filled(text, self.primary)
    }

    pub fn button_success(&self, text: &str) -> egui::Button<'_> {
        self.button_filled(text, self.success)
    }

    pub fn button_warning(&self, text: &str) -> egui::Button<'_> {
        self.button_filled(text, self.warning)
    }

    pub fn button_secondary(&self, text: &str) -> egui::Button<'_> {
        egui::Button::new(egui::RichText::new(text).color(self.text_primary))
            .fill(self.secondary)
            .rounding(6.0)
            .min_size(self.button_medium)
    }

    pub fn button_small(&self, text: &str) -> egui::Button<'_> {
        egui::Button::new(egui::RichText::new(text).color(self.text_primary))
            .fill(self.secondary)
            .stroke(egui::Stroke::new(1.0, self.surface_active))
            .min_size(self.button_small)
    }

    /// Outlined pill used for the network badge
    pub fn button_outline(&self, text: &str) -> egui::Button<'_> {
        egui::Button::new(egui::RichText::new(text).color(self.accent_blue))
            .fill(egui::Color32::TRANSPARENT)
            .stroke(egui::Stroke::new(1.0, self.accent_blue))
            .rounding(6.0)
    }

    /// Rounded card, used for each transaction row
    pub fn frame_card(&self) -> egui::Frame {
        egui::Frame::none()
            .fill(self.card_fill)
            .rounding(8.0)
            .inner_margin(self.spacing_md)
    }

    pub fn frame_panel(&self) -> egui::Frame {
        egui::Frame::none()
            .fill(self.panel_fill)
            .rounding(8.0)
            .inner_margin(self.spacing_md)
            .stroke(egui::Stroke::new(1.0, self.surface_active))
    }

    pub fn frame_surface(&self) -> egui::Frame {
        egui::Frame::none()
            .fill(self.surface)
            .rounding(4.0)
            .inner_margin(self.spacing_sm)
    }

    pub fn responsive_width(ui: &egui::Ui, min: f32, preferred: f32, max: f32) -> f32 {
        let available = ui.available_width();
        available.clamp(min, max.min(preferred))
    }
}

/// Apply the theme's palette to the egui context
pub fn configure_style(ctx: &egui::Context, theme: &AppTheme) {
    let mut visuals = if theme.dark {
        egui::Visuals::dark()
    } else {
        egui::Visuals::light()
    };
    visuals.window_fill = theme.background;
    visuals.panel_fill = theme.panel_fill;
    visuals.override_text_color = Some(theme.text_primary);
    visuals.hyperlink_color = theme.accent_blue;

    visuals.widgets.noninteractive.bg_fill = theme.surface;
    visuals.widgets.inactive.bg_fill = theme.surface;
    visuals.widgets.hovered.bg_fill = theme.surface_hover;
    visuals.widgets.active.bg_fill = theme.surface_active;
    visuals.widgets.open.bg_fill = theme.surface_active;

    // Text inputs need a visible outline on both palettes
    visuals.widgets.inactive.bg_stroke = egui::Stroke::new(1.0, theme.surface_active);
    visuals.widgets.hovered.bg_stroke = egui::Stroke::new(1.0, theme.primary);
    visuals.widgets.active.bg_stroke = egui::Stroke::new(2.0, theme.primary);

    ctx.set_visuals(visuals);

    let mut style = (*ctx.style()).clone();
    style.spacing.item_spacing = egui::vec2(8.0, 6.0);
    style.spacing.button_padding = egui::vec2(12.0, 6.0);
    style.spacing.menu_margin = egui::Margin::same(8.0);
    style.text_styles.insert(
        egui::TextStyle::Heading,
        egui::FontId::new(22.0, egui::FontFamily::Proportional),
    );
    style.text_styles.insert(
        egui::TextStyle::Body,
        egui::FontId::new(14.0, egui::FontFamily::Proportional),
    );
    style.text_styles.insert(
        egui::TextStyle::Monospace,
        egui::FontId::new(13.0, egui::FontFamily::Monospace),
    );

    ctx.set_style(style);
}
