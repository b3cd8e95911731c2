use egui::{
    style::{Selection, Visuals, WidgetVisuals, Widgets},
    Color32, FontFamily, FontId, Rounding, Stroke, Style, TextStyle,
};

pub fn dark_theme(ctx: &egui::Context) -> Style {
    let mut style = (*ctx.style()).clone();

    style.text_styles = [
        (TextStyle::Heading, FontId::new(22.0, FontFamily::Proportional)),
        (TextStyle::Body, FontId::new(16.0, FontFamily::Proportional)),
        (TextStyle::Monospace, FontId::new(14.0, FontFamily::Monospace)),
        (TextStyle::Button, FontId::new(16.0, FontFamily::Proportional)),
        (TextStyle::Small, FontId::new(13.0, FontFamily::Proportional)),
    ]
    .into();

    let primary_bg_color = Color32::from_rgb(30, 32, 36);
    let widget = |bg: Color32, stroke_gray: u8, expansion: f32| WidgetVisuals {
        bg_fill: bg,
        bg_stroke: Stroke::new(1.0, Color32::from_gray(stroke_gray)),
        fg_stroke: Stroke::new(1.0, Color32::LIGHT_GRAY),
        rounding: Rounding::same(4.0),
        weak_bg_fill: Color32::from_gray(32),
        expansion,
    };

    style.visuals = Visuals::dark();
    style.visuals.override_text_color = Some(Color32::LIGHT_GRAY);
    style.visuals.widgets = Widgets {
        noninteractive: widget(primary_bg_color, 60, 0.0),
        inactive: widget(primary_bg_color, 75, 0.0),
        hovered: widget(Color32::from_rgb(50, 50, 50), 200, 0.5),
        active: widget(Color32::from_rgb(60, 60, 60), 255, 1.0),
        open: widget(Color32::from_rgb(40, 40, 40), 200, 0.0),
    };
    style.visuals.selection = Selection {
        bg_fill: Color32::from_rgb(70, 90, 120),
        stroke: Stroke::new(1.0, Color32::WHITE),
    };
    style.visuals.window_rounding = Rounding::same(6.0);
    style.visuals.window_fill = primary_bg_color;
    style.visuals.window_stroke = Stroke::new(1.0, Color32::from_gray(60));
    style.visuals.panel_fill = primary_bg_color;

    style.spacing.window_margin = egui::Margin::same(6.0);
    style.spacing.button_padding = egui::vec2(6.0, 3.0);

    style
}
