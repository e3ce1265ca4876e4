use std::collections::VecDeque;

use collision_engine as ce;
use itertools::Itertools;
use macroquad::prelude::*;

pub const TRAIL_LENGTH: usize = 140;
/// Arrow length per unit of speed
pub const VELOCITY_VECTOR_SCALE: f32 = 0.2;

const AREA_BACKGROUND: Color = Color::new(0.118, 0.118, 0.137, 1.);
const AREA_BORDER: Color = Color::new(0.275, 0.51, 0.784, 1.);
const BODY_OUTLINE: Color = Color::new(0.157, 0.157, 0.176, 1.);
const ARROW_COLOR: Color = Color::new(0.706, 0.706, 0.784, 1.);

#[derive(Debug, Clone, Copy)]
pub struct RenderOptions {
    pub show_vectors: bool,
    pub show_trails: bool,
    pub show_charts: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            show_vectors: true,
            show_trails: false,
            show_charts: true,
        }
    }
}

/// Recent positions of every body, in world coordinates
#[derive(Default)]
pub struct Trails {
    trails: Vec<VecDeque<Vec2>>,
}

impl Trails {
    pub fn record(&mut self, world: &ce::World) {
        self.trails.resize_with(world.bodies().len(), VecDeque::new);
        for (trail, body) in self.trails.iter_mut().zip(world.bodies()) {
            trail.push_back(vec2(body.position.x, body.position.y));
            while trail.len() > TRAIL_LENGTH {
                trail.pop_front();
            }
        }
    }

    pub fn clear(&mut self) {
        self.trails.clear();
    }

    pub fn trail(&self, id: ce::BodyId) -> Option<&VecDeque<Vec2>> {
        self.trails.get(id.index())
    }
}

fn body_color(color: ce::BodyColor) -> Color {
    let [r, g, b] = color.rgb();
    Color::from_rgba(r, g, b, 255)
}

fn draw_arrow(start: Vec2, vector: Vec2) {
    if vector.length_squared() < 1e-3 {
        return;
    }
    let end = start + vector;
    draw_line(start.x, start.y, end.x, end.y, 2., ARROW_COLOR);

    if vector.length() > 15. {
        let head = vector.normalize() * 10.;
        let side = vec2(-head.y, head.x) * 0.4;
        draw_triangle(end, end - head + side, end - head - side, ARROW_COLOR);
    }
}

/// Draws the simulation area with its top left corner at `origin`
pub fn render_world(world: &ce::World, trails: &Trails, options: &RenderOptions, origin: Vec2) {
    let bounds = world.bounds();
    draw_rectangle(origin.x, origin.y, bounds.width, bounds.height, AREA_BACKGROUND);
    draw_rectangle_lines(origin.x, origin.y, bounds.width, bounds.height, 2., AREA_BORDER);

    if options.show_trails {
        for body in world.bodies() {
            let Some(trail) = trails.trail(body.id())
            else { continue };
            let color = body_color(body.color);
            for (from, to) in trail.iter().tuple_windows() {
                draw_line(origin.x + from.x, origin.y + from.y, origin.x + to.x, origin.y + to.y, 2., color);
            }
        }
    }

    for body in world.bodies() {
        let center = origin + vec2(body.position.x, body.position.y);
        draw_circle(center.x, center.y, body.radius(), body_color(body.color));
        draw_circle_lines(center.x, center.y, body.radius(), 2., BODY_OUTLINE);

        if options.show_vectors {
            draw_arrow(center, vec2(body.velocity.x, body.velocity.y) * VELOCITY_VECTOR_SCALE);
        }
    }
}
