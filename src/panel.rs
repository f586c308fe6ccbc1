//! Floating parameter panel.
//!
//! The panel never mutates [`ParticleParams`] directly: it reads the current
//! values, lets the user edit local copies, and returns one [`ParamEdit`] per
//! changed control for [`Scene::apply`](crate::scene::Scene::apply).

use crate::params::{ParamEdit, ParamKey, ParticleParams};
use crate::shape::BaseShape;

/// Panel state kept across frames.
#[derive(Debug, Default)]
pub struct ControlPanel {
    /// Sprite URL being typed. Committed on Enter or focus loss.
    url_draft: Option<String>,
}

impl ControlPanel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Draw the panel and collect this frame's edits.
    pub fn show(
        &mut self,
        ctx: &egui::Context,
        params: &ParticleParams,
        live_count: usize,
    ) -> Vec<ParamEdit> {
        let mut edits = Vec::new();

        egui::Window::new("Particles")
            .default_pos([12.0, 12.0])
            .resizable(false)
            .show(ctx, |ui| {
                egui::Grid::new("particle_params")
                    .num_columns(2)
                    .spacing([12.0, 6.0])
                    .show(ui, |ui| {
                        self.controls(ui, params, &mut edits);
                    });

                ui.separator();
                ui.weak(format!("{} particles live", live_count));
            });

        edits
    }

    fn controls(
        &mut self,
        ui: &mut egui::Ui,
        params: &ParticleParams,
        edits: &mut Vec<ParamEdit>,
    ) {
        let mut count = params.count;
        ui.label(ParamKey::Count.name());
        if ui
            .add(
                egui::Slider::new(&mut count, ParticleParams::COUNT_RANGE)
                    .step_by(f64::from(ParticleParams::COUNT_STEP)),
            )
            .changed()
        {
            edits.push(ParamEdit::Count(count));
        }
        ui.end_row();

        let mut size = params.size;
        ui.label(ParamKey::Size.name());
        if ui.add(egui::Slider::new(&mut size, ParticleParams::SIZE_RANGE)).changed() {
            edits.push(ParamEdit::Size(size));
        }
        ui.end_row();

        let mut speed = params.speed;
        ui.label(ParamKey::Speed.name());
        if ui.add(egui::Slider::new(&mut speed, ParticleParams::SPEED_RANGE)).changed() {
            edits.push(ParamEdit::Speed(speed));
        }
        ui.end_row();

        let mut ovoid_scale = params.ovoid_scale;
        ui.label(ParamKey::OvoidScale.name());
        if ui
            .add(egui::Slider::new(&mut ovoid_scale, ParticleParams::OVOID_SCALE_RANGE))
            .changed()
        {
            edits.push(ParamEdit::OvoidScale(ovoid_scale));
        }
        ui.end_row();

        let mut fade_speed = params.fade_speed;
        ui.label(ParamKey::FadeSpeed.name());
        if ui
            .add(
                egui::Slider::new(&mut fade_speed, ParticleParams::FADE_SPEED_RANGE)
                    .step_by(ParticleParams::FADE_SPEED_STEP)
                    .max_decimals(3),
            )
            .changed()
        {
            edits.push(ParamEdit::FadeSpeed(fade_speed));
        }
        ui.end_row();

        let mut shape = params.shape;
        ui.label(ParamKey::Shape.name());
        egui::ComboBox::from_id_salt("base_shape")
            .selected_text(shape.name())
            .show_ui(ui, |ui| {
                for option in BaseShape::ALL {
                    ui.selectable_value(&mut shape, option, option.name());
                }
            });
        if shape != params.shape {
            edits.push(ParamEdit::Shape(shape));
        }
        ui.end_row();

        let mut color = params.color;
        ui.label(ParamKey::Color.name());
        if ui.color_edit_button_rgb(&mut color).changed() {
            edits.push(ParamEdit::Color(color));
        }
        ui.end_row();

        ui.label(ParamKey::SpriteUrl.name());
        let draft = self
            .url_draft
            .get_or_insert_with(|| params.sprite_url.clone());
        let response = ui.add(
            egui::TextEdit::singleline(draft)
                .hint_text("built-in star")
                .desired_width(180.0),
        );
        if response.lost_focus() {
            if *draft != params.sprite_url {
                edits.push(ParamEdit::SpriteUrl(draft.clone()));
            }
            self.url_draft = None;
        } else if !response.has_focus() {
            self.url_draft = None;
        }
        ui.end_row();
    }
}
