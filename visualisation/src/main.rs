mod charts;
mod logging;
mod scenes;
mod world_renderer;

use std::path::PathBuf;

use anyhow::{ Context, Result };
use clap::Parser;
use collision_engine as ce;
use macroquad::{ miniquad::date, prelude::* };
use tracing::{ debug, error, info };

use charts::ChartSeries;
use scenes::Scene;
use world_renderer::{ render_world, RenderOptions, Trails };

/// Top left corner of the simulation area on screen
const SIM_ORIGIN: Vec2 = Vec2::new(20., 70.);
const CHART_WIDTH: f32 = 240.;
const CHART_HEIGHT: f32 = 120.;

const BG_COLOR: Color = Color::new(0.071, 0.071, 0.086, 1.);
const UI_TEXT: Color = Color::new(0.784, 0.784, 0.824, 1.);
const UI_TEXT_DIM: Color = Color::new(0.549, 0.549, 0.588, 1.);

const CONTROLS: &str =
    "[SPACE]Reset [TAB]Scene [P]Pause [T]Trails [V]Vectors [C]Charts [1-4]Elasticity [ESC]Quit";

/// Real-time 2D collision sandbox
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// RON file overriding the default simulation config
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Seed of the first population, following resets use the next seeds
    #[arg(short, long)]
    seed: Option<u64>,
}

fn window_conf() -> Conf {
    Conf {
        window_title: "2D Collision Sandbox (elastic/inelastic)".to_owned(),
        window_width: 1000,
        window_height: 650,
        ..Default::default()
    }
}

struct App {
    config: ce::SimConfig,
    scenes: Vec<Box<dyn Scene>>,
    scene_idx: usize,
    seed: u64,
    world: ce::World,
    trails: Trails,
    charts: [ChartSeries; 4],
    options: RenderOptions,
}

impl App {
    fn new(args: Args) -> Result<Self> {
        let config = match &args.config {
            Some(path) => ce::SimConfig::load_from_file(path)
                .with_context(|| format!("loading config {}", path.display()))?,
            None => ce::SimConfig::default(),
        };
        let seed = args.seed.unwrap_or_else(|| (date::now() * 1000.) as u64);
        let scenes = scenes::get_all_scenes();
        let world = scenes[0].create_world(&config, seed)
            .context("creating initial world")?;
        info!(seed, bodies = world.bodies().len(), "world ready");

        Ok(Self {
            config,
            scenes,
            scene_idx: 0,
            seed,
            world,
            trails: Trails::default(),
            charts: [
                ChartSeries::new("Total Momentum", Color::from_rgba(108, 163, 255, 255)),
                ChartSeries::new("Kinetic Energy", Color::from_rgba(235, 99, 132, 255)),
                ChartSeries::new("Avg Speed", Color::from_rgba(116, 222, 163, 255)),
                ChartSeries::new("Collisions/Frame", Color::from_rgba(255, 187, 99, 255)),
            ],
            options: RenderOptions::default(),
        })
    }

    /// Rebuilds the current scene with the next seed, keeping the run state
    /// and restitution of the old world
    fn reset(&mut self) {
        self.seed = self.seed.wrapping_add(1);
        let mut config = self.config.clone();
        config.world.restitution = self.world.restitution();

        let scene = &self.scenes[self.scene_idx];
        match scene.create_world(&config, self.seed) {
            Ok(mut world) => {
                if self.world.is_paused() {
                    world.pause();
                }
                debug!(scene = scene.name(), seed = self.seed, "reset");
                self.world = world;
                self.trails.clear();
                self.charts.iter_mut().for_each(ChartSeries::clear);
            }
            Err(err) => error!(%err, scene = scene.name(), "could not reset world"),
        }
    }

    /// Returns false when the user asked to quit
    fn handle_input(&mut self) -> bool {
        if is_key_pressed(KeyCode::Escape) || is_key_pressed(KeyCode::Q) {
            return false;
        }
        if is_key_pressed(KeyCode::Space) {
            self.reset();
        }
        if is_key_pressed(KeyCode::Tab) {
            self.scene_idx = (self.scene_idx + 1) % self.scenes.len();
            self.reset();
        }
        if is_key_pressed(KeyCode::P) {
            self.world.toggle_pause();
        }
        if is_key_pressed(KeyCode::T) {
            self.options.show_trails = !self.options.show_trails;
        }
        if is_key_pressed(KeyCode::V) {
            self.options.show_vectors = !self.options.show_vectors;
        }
        if is_key_pressed(KeyCode::C) {
            self.options.show_charts = !self.options.show_charts;
        }

        let preset_keys = [KeyCode::Key1, KeyCode::Key2, KeyCode::Key3, KeyCode::Key4];
        for (key, restitution) in preset_keys.into_iter().zip(ce::RESTITUTION_PRESETS) {
            if is_key_pressed(key) {
                if let Err(err) = self.world.set_restitution(restitution) {
                    error!(%err, "could not change restitution");
                }
            }
        }

        true
    }

    fn update(&mut self, dt: f32) {
        if self.world.is_paused() {
            return;
        }
        let stats = *self.world.step(dt);

        let [momentum, energy, speed, collisions] = &mut self.charts;
        momentum.push(stats.momentum_magnitude());
        energy.push(stats.total_kinetic_energy);
        speed.push(stats.average_speed);
        collisions.push((stats.collisions + stats.wall_bounces) as f32);

        if self.options.show_trails {
            self.trails.record(&self.world);
        } else {
            self.trails.clear();
        }
    }

    fn draw(&self) {
        clear_background(BG_COLOR);

        render_world(&self.world, &self.trails, &self.options, SIM_ORIGIN);

        let stats = self.world.stats();
        draw_text("2D Collision Physics", 20., 30., 24., UI_TEXT);
        let info = format!(
            "e={:.2} | Bodies={} | Momentum={:.0} | Energy={:.0} | FPS={}",
            self.world.restitution(),
            stats.body_count,
            stats.momentum_magnitude(),
            stats.total_kinetic_energy,
            get_fps(),
        );
        draw_text(&info, 20., 52., 18., UI_TEXT_DIM);
        draw_text(CONTROLS, 20., screen_height() - 12., 16., UI_TEXT_DIM);

        let mut status = self.scenes[self.scene_idx].name().to_owned();
        if self.world.is_paused() {
            status.push_str(" | PAUSED");
        }
        draw_text(&status, SIM_ORIGIN.x + self.world.bounds().width - 260., 30., 18., UI_TEXT_DIM);

        if self.options.show_charts {
            let chart_x = SIM_ORIGIN.x + self.world.bounds().width + 20.;
            draw_text("Physics Data", chart_x, SIM_ORIGIN.y - 8., 18., UI_TEXT);
            for (row, chart) in self.charts.iter().enumerate() {
                let y = SIM_ORIGIN.y + row as f32 * (CHART_HEIGHT + 10.);
                chart.draw(Rect::new(chart_x, y, CHART_WIDTH, CHART_HEIGHT));
            }
        }
    }
}

#[macroquad::main(window_conf)]
async fn main() {
    if let Err(err) = logging::init_logging() {
        eprintln!("unable to install log subscriber: {err:#}");
    }

    let mut app = match App::new(Args::parse()) {
        Ok(app) => app,
        Err(err) => {
            error!("{err:#}");
            return;
        }
    };

    while app.handle_input() {
        app.update(get_frame_time());
        app.draw();
        next_frame().await;
    }
}
