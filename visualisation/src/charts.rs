use std::collections::VecDeque;

use itertools::Itertools;
use macroquad::prelude::*;

pub const CHART_HISTORY: usize = 200;

const CHART_BACKGROUND: Color = Color::new(0.098, 0.098, 0.118, 1.);
const CHART_BORDER: Color = Color::new(0.235, 0.235, 0.275, 1.);
const CHART_TEXT: Color = Color::new(0.784, 0.784, 0.824, 1.);

/// Rolling time series of one statistic
pub struct ChartSeries {
    title: &'static str,
    color: Color,
    data: VecDeque<f32>,
    max_history: usize,
}

impl ChartSeries {
    pub fn new(title: &'static str, color: Color) -> Self {
        Self {
            title,
            color,
            data: VecDeque::with_capacity(CHART_HISTORY),
            max_history: CHART_HISTORY,
        }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn last(&self) -> Option<f32> {
        self.data.back().copied()
    }

    pub fn push(&mut self, value: f32) {
        self.data.push_back(value);
        while self.data.len() > self.max_history {
            self.data.pop_front();
        }
    }

    pub fn clear(&mut self) {
        self.data.clear();
    }

    /// Vertical range of the plot, never empty so scaling cannot divide by zero
    pub fn range(&self) -> (f32, f32) {
        let (min, max) = self.data.iter().copied()
            .minmax_by(f32::total_cmp)
            .into_option()
            .unwrap_or((0., 1.));
        if max > min { (min, max) } else { (min, min + 1.) }
    }

    /// Value mapped to [0, 1] within [ChartSeries::range]
    pub fn normalized(&self, value: f32) -> f32 {
        let (min, max) = self.range();
        (value - min) / (max - min)
    }

    pub fn draw(&self, rect: Rect) {
        draw_rectangle(rect.x, rect.y, rect.w, rect.h, CHART_BACKGROUND);
        draw_rectangle_lines(rect.x, rect.y, rect.w, rect.h, 1., CHART_BORDER);
        draw_text(self.title, rect.x + 5., rect.y + 15., 16., CHART_TEXT);

        let Some(current) = self.last()
        else { return };
        draw_text(&format!("{current:.0}"), rect.x + rect.w - 50., rect.y + 15., 16., self.color);

        if self.data.len() < 2 {
            return;
        }

        let graph = Rect::new(rect.x + 5., rect.y + 25., rect.w - 10., rect.h - 30.);
        let step = graph.w / (self.data.len() - 1) as f32;
        let points = self.data.iter().enumerate()
            .map(|(idx, &value)| vec2(
                graph.x + idx as f32 * step,
                graph.y + graph.h - self.normalized(value) * graph.h,
            ));
        for (from, to) in points.tuple_windows() {
            draw_line(from.x, from.y, to.x, to.y, 2., self.color);
        }
    }
}
