/// The eframe application: one `update` per frame runs input handling, a
/// single simulation tick, and drawing, in that order.
use eframe::egui::{self, Color32, Rect, Stroke};
use eframe::epaint::Vec2;
use egui_plot::{Line, Plot, PlotPoints};

use crate::config::SimConfig;
use crate::sim::Simulation;

// ===================================================================================
// Application State
// ===================================================================================

pub struct SimApp {
    sim: Simulation,
    /// Slider values; copied into the simulation on Reset so dragging a
    /// slider never perturbs the live world mid-run.
    params: SimConfig,
}

impl SimApp {
    pub fn new(config: SimConfig) -> Self {
        Self {
            params: config.clone(),
            sim: Simulation::new(config),
        }
    }

    /// Keyboard bindings, matching the on-screen help text.
    fn handle_keys(&mut self, ctx: &egui::Context) {
        ctx.input(|input| {
            if input.key_pressed(egui::Key::Space) {
                self.sim.toggle_pause();
            }
            if input.key_pressed(egui::Key::R) {
                self.apply_reset();
            }
            if input.key_pressed(egui::Key::F) {
                self.sim.toggle_friction();
            }
            if input.key_pressed(egui::Key::G) {
                self.sim.toggle_gravity();
            }
            if input.key_pressed(egui::Key::I) {
                self.sim.toggle_inversion();
            }
            if input.key_pressed(egui::Key::ArrowUp) {
                self.sim.adjust_dt(true);
            }
            if input.key_pressed(egui::Key::ArrowDown) {
                self.sim.adjust_dt(false);
            }
            if input.key_pressed(egui::Key::A) {
                self.sim.add_particle();
            }
            if input.key_pressed(egui::Key::D) {
                self.sim.remove_particle();
            }
        });
    }

    fn apply_reset(&mut self) {
        // Keep the slider pair ordered; the config validator would reject an
        // inverted range.
        if self.params.radius_max < self.params.radius_min {
            self.params.radius_max = self.params.radius_min;
        }
        self.sim.reset(self.params.clone());
    }

    // -------------------------------------------------------------------------------
    // Panels
    // -------------------------------------------------------------------------------

    fn controls_panel(&mut self, ctx: &egui::Context) {
        egui::SidePanel::left("controls_panel").show(ctx, |ui| {
            ui.heading("Simulation Controls");

            ui.add(egui::Slider::new(&mut self.params.particle_count, 1..=500).text("Particles"));
            ui.add(egui::Slider::new(&mut self.params.radius_min, 1.0..=50.0).text("Min Radius"));
            ui.add(egui::Slider::new(&mut self.params.radius_max, 1.0..=60.0).text("Max Radius"));
            ui.add(egui::Slider::new(&mut self.params.friction, 0.0..=1.0).text("Friction"));
            ui.add(egui::Slider::new(&mut self.params.gravity, 0.0..=2000.0).text("Gravity"));
            ui.add(
                egui::Slider::new(&mut self.params.history_capacity, 1000..=20000)
                    .text("History Size"),
            );
            ui.label("Sliders apply on Reset.");

            ui.separator();

            if ui
                .button(if self.sim.paused { "Resume" } else { "Pause" })
                .clicked()
            {
                self.sim.toggle_pause();
            }
            if ui.button("Reset").clicked() {
                self.apply_reset();
            }

            ui.separator();

            ui.label("SPACE  pause/resume");
            ui.label("R      reset");
            ui.label("F      toggle friction");
            ui.label("G      toggle gravity");
            ui.label("I      toggle inversion");
            ui.label("UP/DN  timestep +/-10%");
            ui.label("A / D  add / remove disk");
            ui.label("Click  add disk (random spot)");
        });
    }

    fn status_panel(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("status_panel").show(ctx, |ui| {
            ui.heading("Elastic Disks");
            let status = if self.sim.paused {
                "Paused"
            } else if self.sim.inversion_enabled {
                "Inverting"
            } else {
                "Running"
            };
            ui.label(format!(
                "{} | Friction: {} | Gravity: {} | dt: {:.2} ms | Disks: {} | History: {}/{}",
                status,
                on_off(self.sim.friction_enabled),
                on_off(self.sim.gravity_enabled),
                self.sim.dt * 1000.0,
                self.sim.particles().len(),
                self.sim.history_len(),
                self.sim.history_capacity(),
            ));
        });
    }

    fn energy_panel(&mut self, ctx: &egui::Context) {
        egui::SidePanel::right("energy_panel")
            .resizable(true)
            .show(ctx, |ui| {
                ui.label("Total kinetic energy (rolling window)");
                let points: Vec<[f64; 2]> = self.sim.energy_series().collect();
                let plot = Plot::new("total_energy")
                    .width(220.0)
                    .height(400.0)
                    .allow_scroll(true)
                    .allow_drag(true);
                plot.show(ui, |plot_ui| {
                    if !points.is_empty() {
                        plot_ui.line(Line::new(PlotPoints::from(points)));
                    }
                });
            });
    }

    fn canvas(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default().show(ctx, |ui| {
            let (rect, response) =
                ui.allocate_exact_size(ui.available_size(), egui::Sense::click());
            // Pointer spawning preserves the original behavior: the new disk
            // appears at a random location, not under the cursor.
            if response.clicked() {
                self.sim.add_particle();
            }

            let painter = ui.painter_at(rect);
            painter.rect_filled(rect, 0.0, Color32::BLACK);

            // Uniform scale from the simulation box into the panel.
            let config = self.sim.config();
            let scale = (rect.width() / config.window_width)
                .min(rect.height() / config.window_height);
            let origin = rect.min;

            for wall in self.sim.walls() {
                let min = origin
                    + Vec2::new(
                        (wall.center.x - wall.half_extents.x) * scale,
                        (wall.center.y - wall.half_extents.y) * scale,
                    );
                let size = Vec2::new(
                    wall.half_extents.x * 2.0 * scale,
                    wall.half_extents.y * 2.0 * scale,
                );
                painter.rect_filled(Rect::from_min_size(min, size), 0.0, Color32::DARK_GRAY);
            }

            let stroke = Stroke::new((2.0 * scale).max(1.0), Color32::WHITE);
            for disk in self.sim.disk_views() {
                let center = origin + Vec2::new(disk.position.x * scale, disk.position.y * scale);
                let radius = disk.radius * scale;
                painter.circle_filled(center, radius, disk.color);
                // Radius line showing the disk's orientation.
                let tip = center + Vec2::new(disk.angle.cos(), disk.angle.sin()) * radius;
                painter.line_segment([center, tip], stroke);
            }
        });
    }
}

// ===================================================================================
// Frame Loop
// ===================================================================================

impl eframe::App for SimApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.handle_keys(ctx);
        self.sim.tick();

        self.controls_panel(ctx);
        self.status_panel(ctx);
        self.energy_panel(ctx);
        self.canvas(ctx);

        // Keep animating at the display rate.
        ctx.request_repaint();
    }
}

fn on_off(flag: bool) -> &'static str {
    if flag {
        "ON"
    } else {
        "OFF"
    }
}
