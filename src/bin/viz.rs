use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use eframe::egui;
use egui_plot::{Line, Plot, PlotPoints};
use log::{debug, info};
use nalgebra::Vector2;

use orbit_sim::dynamics::state::{SimConfig, State};
use orbit_sim::io::params;
use orbit_sim::scaling::{scale_parameters, PhysicalInputs, ScalingContext};
use orbit_sim::sim::{run, Termination};
use orbit_sim::view::{
    apply_pan, apply_zoom, compute_fitted_view, screen_vertices, world_to_screen, RevealCursor,
    ViewportState, ZoomDirection,
};

#[derive(Parser, Debug)]
#[command(about = "Interactive trajectory viewer")]
struct Args {
    /// Parameter file (key=value lines); the reference orbit is used if omitted
    #[arg(short, long)]
    params: Option<PathBuf>,

    /// Dimensionless time step
    #[arg(long, default_value_t = SimConfig::default().dt)]
    dt: f64,

    /// Dimensionless central body radius
    #[arg(long, default_value_t = SimConfig::default().central_body_radius)]
    radius: f64,
}

// Side plot decimation target
const PLOT_POINTS: usize = 2000;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let inputs = match &args.params {
        Some(path) => params::read_params_file(path)?,
        None => PhysicalInputs::reference(),
    };
    let config = SimConfig {
        dt: args.dt,
        central_body_radius: args.radius,
        ..SimConfig::default()
    };
    let scaled = scale_parameters(&inputs, &config)?;
    let sim_run = run(&scaled.params);
    info!(
        "{} points, {:?}; P pause, F show all, +/- speed, R refit, Esc quit",
        sim_run.trajectory.len(),
        sim_run.termination
    );

    let app = OrbitViz::new(
        sim_run.trajectory,
        sim_run.termination,
        scaled.params.central_body_radius,
        scaled.params.dt,
        scaled.context,
    );
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size([1200.0, 800.0]),
        ..Default::default()
    };
    eframe::run_native("Orbit Simulator", options, Box::new(|_| Ok(Box::new(app))))
        .map_err(|e| anyhow::anyhow!("viewer failed: {}", e))
}

struct OrbitViz {
    trajectory: Vec<State>,
    termination: Termination,
    body_radius: f64,
    dt: f64,
    context: ScalingContext,
    cursor: RevealCursor,
    viewport: Option<ViewportState>, // None until the canvas size is known
    canvas: Vector2<f64>,
}

impl OrbitViz {
    fn new(
        trajectory: Vec<State>,
        termination: Termination,
        body_radius: f64,
        dt: f64,
        context: ScalingContext,
    ) -> Self {
        let cursor = RevealCursor::new(trajectory.len());
        Self {
            trajectory,
            termination,
            body_radius,
            dt,
            context,
            cursor,
            viewport: None,
            canvas: Vector2::zeros(),
        }
    }

    /// Fitted view for the current canvas, or the default view if fitting fails.
    fn fit(&self) -> ViewportState {
        compute_fitted_view(&self.trajectory, self.canvas.x / self.canvas.y)
            .and_then(|v| v.to_viewport(self.canvas))
            .unwrap_or_else(|| ViewportState::new(self.canvas))
    }

    fn handle_keys(&mut self, ctx: &egui::Context) {
        use egui::Key;

        let (pause, all, faster, slower, reset, quit) = ctx.input(|i| {
            (
                i.key_pressed(Key::P),
                i.key_pressed(Key::F),
                i.key_pressed(Key::Plus) || i.key_pressed(Key::Equals),
                i.key_pressed(Key::Minus),
                i.key_pressed(Key::R),
                i.key_pressed(Key::Escape),
            )
        });

        if pause {
            self.cursor.toggle_pause();
        }
        if all {
            self.cursor.toggle_show_all();
        }
        if faster {
            self.cursor.faster();
        }
        if slower {
            self.cursor.slower();
        }
        if reset {
            self.cursor.reset();
            self.viewport = None;
        }
        if quit {
            ctx.send_viewport_cmd(egui::ViewportCommand::Close);
        }
    }

    fn canvas_ui(&mut self, ui: &mut egui::Ui) {
        let (response, painter) = ui.allocate_painter(ui.available_size(), egui::Sense::click_and_drag());
        let rect = response.rect;
        let size = Vector2::new(rect.width() as f64, rect.height() as f64);
        if size.x < 1.0 || size.y < 1.0 {
            return;
        }

        // Fit on first frame or after R; keep zoom and pan across resizes
        if size != self.canvas {
            self.canvas = size;
            self.viewport = self.viewport.map(|vp| vp.resize(size));
        }
        let mut vp = match self.viewport {
            Some(vp) => vp,
            None => {
                debug!("fitting view to {}x{} canvas", size.x, size.y);
                self.fit()
            }
        };

        let origin = rect.min.to_vec2();
        if let Some(hover) = response.hover_pos() {
            let scroll = ui.input(|i| i.raw_scroll_delta.y) as f64;
            if let Some(dir) = ZoomDirection::from_scroll(scroll) {
                let local = hover - origin;
                vp = apply_zoom(&vp, Vector2::new(local.x as f64, local.y as f64), dir);
            }
        }
        if response.dragged_by(egui::PointerButton::Secondary) {
            let d = response.drag_delta();
            vp = apply_pan(&vp, Vector2::new(d.x as f64, d.y as f64));
        }
        self.viewport = Some(vp);

        let to_pos = |p: Vector2<f64>| egui::pos2(p.x as f32, p.y as f32) + origin;

        painter.rect_filled(rect, 0.0, egui::Color32::from_rgb(10, 12, 24));

        // Central body, never smaller than a few pixels
        let body_px = (self.body_radius * vp.scale).max(3.0) as f32;
        painter.circle_filled(
            to_pos(world_to_screen(Vector2::zeros(), &vp)),
            body_px,
            egui::Color32::from_rgb(255, 200, 60),
        );

        let visible = &self.trajectory[..self.cursor.visible()];
        let points: Vec<egui::Pos2> = screen_vertices(visible, &vp)
            .into_iter()
            .filter(|p| p.x.is_finite() && p.y.is_finite())
            .map(to_pos)
            .collect();
        if points.len() > 1 {
            painter.add(egui::Shape::line(
                points.clone(),
                egui::Stroke::new(1.5, egui::Color32::from_rgb(120, 200, 255)),
            ));
        }
        if let Some(head) = points.last() {
            painter.circle_filled(*head, 3.0, egui::Color32::WHITE);
        }

        let shown = self.cursor.visible();
        let status = if self.cursor.is_paused() { "paused" } else { "running" };
        painter.text(
            rect.min + egui::vec2(8.0, 8.0),
            egui::Align2::LEFT_TOP,
            format!(
                "points {}/{}  t = {:.1} days  speed {}/frame  {}  zoom {:.1} px/unit",
                shown,
                self.cursor.len(),
                self.context.step_to_days(shown.saturating_sub(1), self.dt),
                self.cursor.points_per_frame(),
                status,
                vp.scale,
            ),
            egui::FontId::monospace(13.0),
            egui::Color32::LIGHT_GRAY,
        );
    }

    fn radius_plot(&self, ui: &mut egui::Ui) {
        ui.heading("Radius vs time");
        ui.label(format!("Termination: {:?}", self.termination));

        let shown = self.cursor.visible();
        let step = (shown / PLOT_POINTS).max(1);
        let points: PlotPoints = self.trajectory[..shown]
            .iter()
            .enumerate()
            .step_by(step)
            .map(|(i, s)| [self.context.step_to_days(i, self.dt), s.radius()])
            .collect();
        Plot::new("radius")
            .x_axis_label("Time (days)")
            .y_axis_label("r (dimensionless)")
            .show(ui, |plot_ui| {
                plot_ui.line(Line::new("Radius", points));
            });
    }
}

impl eframe::App for OrbitViz {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.handle_keys(ctx);

        egui::SidePanel::right("plot")
            .default_width(360.0)
            .show(ctx, |ui| self.radius_plot(ui));

        egui::CentralPanel::default()
            .frame(egui::Frame::NONE)
            .show(ctx, |ui| self.canvas_ui(ui));

        self.cursor.tick();
        if !self.cursor.is_finished() {
            ctx.request_repaint();
        }
    }
}
