//! Radar chart geometry in page coordinates (y grows downward).
//!
//! Axis `i` of `n` sits at angle `2πi/n`, measured clockwise from the top.

use crate::{
    config::{Chart as ChartConfig, DegeneratePolicy},
    error::{ReportError, Result},
    scoring::CategoryScore,
};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Align {
    Left,
    Right,
    Center,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AxisLine {
    pub category: String,
    pub from: Point,
    pub to: Point,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelAnchor {
    pub category: String,
    pub at: Point,
    pub align: Align,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RadarGeometry {
    pub center: Point,
    pub radius: f64,
    pub vertices: Vec<Point>,
    pub axes: Vec<AxisLine>,
    pub labels: Vec<LabelAnchor>,
    /// Reference polygons, innermost first.
    pub grid: Vec<Vec<Point>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub category: String,
    pub origin: Point,
    pub length: f64,
    pub label: LabelAnchor,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BarGeometry {
    pub max_length: f64,
    pub bar_height: f64,
    pub bars: Vec<Bar>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ChartGeometry {
    Radar(RadarGeometry),
    Bars(BarGeometry),
}

pub struct ChartGeometryBuilder {
    cfg: ChartConfig,
}

impl ChartGeometryBuilder {
    pub fn new(cfg: &ChartConfig) -> Result<Self> {
        if cfg.radius.is_nan() || cfg.radius <= 0.0 {
            return Err(ReportError::InvalidConfiguration(format!(
                "chart radius must be positive, got {}",
                cfg.radius
            )));
        }
        if cfg.full_mark.is_nan() || cfg.full_mark <= 0.0 {
            return Err(ReportError::InvalidConfiguration(format!(
                "chart full_mark must be positive, got {}",
                cfg.full_mark
            )));
        }
        Ok(Self { cfg: cfg.clone() })
    }

    pub fn build(&self, scores: &[CategoryScore]) -> Result<ChartGeometry> {
        if scores.len() >= 3 {
            return Ok(ChartGeometry::Radar(self.radar(scores)));
        }
        match self.cfg.degenerate {
            DegeneratePolicy::Reject => Err(ReportError::DegenerateChart {
                categories: scores.len(),
            }),
            DegeneratePolicy::Bars => {
                warn!(
                    "only {} categor(ies); using bar layout instead of radar",
                    scores.len()
                );
                Ok(ChartGeometry::Bars(self.bars(scores)))
            }
        }
    }

    /// Radar geometry for any number of categories; callers wanting the
    /// degenerate-case policy should go through [`Self::build`].
    pub fn radar(&self, scores: &[CategoryScore]) -> RadarGeometry {
        let n = scores.len();
        let r = self.cfg.radius;
        let center = Point {
            x: self.cfg.center_x,
            y: self.cfg.center_y,
        };

        let mut vertices = Vec::with_capacity(n);
        let mut axes = Vec::with_capacity(n);
        let mut labels = Vec::with_capacity(n);

        for (i, s) in scores.iter().enumerate() {
            let angle = axis_angle(i, n);
            let normalized = (s.score / self.cfg.full_mark).clamp(0.0, 1.0);

            vertices.push(self.polar(angle, r * normalized));
            axes.push(AxisLine {
                category: s.category.clone(),
                from: center,
                to: self.polar(angle, r),
            });
            labels.push(LabelAnchor {
                category: s.category.clone(),
                at: self.polar(angle, r + self.cfg.label_offset),
                align: self.align_for(angle),
            });
        }

        let levels = self.cfg.grid_levels;
        let grid = (1..=levels)
            .map(|k| {
                let rk = r * f64::from(k) / f64::from(levels);
                (0..n).map(|i| self.polar(axis_angle(i, n), rk)).collect()
            })
            .collect();

        debug!(categories = n, "radar geometry built");

        RadarGeometry {
            center,
            radius: r,
            vertices,
            axes,
            labels,
            grid,
        }
    }

    /// Horizontal bars stacked downward from the top of the chart box.
    pub fn bars(&self, scores: &[CategoryScore]) -> BarGeometry {
        let max_length = self.cfg.radius * 2.0;
        let left = self.cfg.center_x - self.cfg.radius;
        let top = self.cfg.center_y - self.cfg.radius;
        let slot = if scores.is_empty() {
            0.0
        } else {
            max_length / scores.len() as f64
        };
        let bar_height = slot * 0.6;

        let bars = scores
            .iter()
            .enumerate()
            .map(|(i, s)| {
                let normalized = (s.score / self.cfg.full_mark).clamp(0.0, 1.0);
                let origin = Point {
                    x: left,
                    y: top + slot * i as f64 + (slot - bar_height) / 2.0,
                };
                Bar {
                    category: s.category.clone(),
                    origin,
                    length: max_length * normalized,
                    label: LabelAnchor {
                        category: s.category.clone(),
                        at: Point {
                            x: left - self.cfg.label_offset,
                            y: origin.y + bar_height / 2.0,
                        },
                        align: Align::Right,
                    },
                }
            })
            .collect();

        BarGeometry {
            max_length,
            bar_height,
            bars,
        }
    }

    fn polar(&self, angle: f64, dist: f64) -> Point {
        Point {
            x: self.cfg.center_x + dist * angle.sin(),
            y: self.cfg.center_y - dist * angle.cos(),
        }
    }

    fn align_for(&self, angle: f64) -> Align {
        let s = angle.sin();
        if s > self.cfg.center_band {
            Align::Left
        } else if s < -self.cfg.center_band {
            Align::Right
        } else {
            Align::Center
        }
    }
}

pub fn axis_angle(i: usize, n: usize) -> f64 {
    if n == 0 {
        return 0.0;
    }
    2.0 * PI * i as f64 / n as f64
}
