//! Table sizing, perimeter anchors and connector curve routing.
//!
//! Everything here is pure and independent of the SVG output.

use crate::model::{Schema, SchemaError, Side, TableSpec};

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Fixed layout constants, in canvas units.
#[derive(Debug, Clone, PartialEq)]
pub struct Metrics {
    pub table_width: f64,
    pub row_height: f64,
    pub header_height: f64,
    pub padding: f64,
    pub canvas_width: f64,
    pub canvas_height: f64,
}

impl Default for Metrics {
    fn default() -> Self {
        Self {
            table_width: 260.0,
            row_height: 24.0,
            header_height: 44.0,
            padding: 8.0,
            canvas_width: 930.0,
            canvas_height: 820.0,
        }
    }
}

impl Metrics {
    pub fn table_height(&self, table: &TableSpec) -> f64 {
        self.height_for_columns(table.columns.len())
    }

    pub fn height_for_columns(&self, columns: usize) -> f64 {
        self.header_height + self.row_height * columns as f64 + self.padding
    }

    pub fn anchor(&self, table: &TableSpec, side: Side) -> Point {
        let h = self.table_height(table);
        let cx = table.x + self.table_width / 2.0;
        let cy = table.y + h / 2.0;
        match side {
            Side::Top => Point::new(cx, table.y),
            Side::Bottom => Point::new(cx, table.y + h),
            Side::Left => Point::new(table.x, cy),
            Side::Right => Point::new(table.x + self.table_width, cy),
            Side::Center => Point::new(cx, cy),
        }
    }

    /// Anchor lookup by table id.
    pub fn anchor_by_id(
        &self,
        schema: &Schema,
        id: &str,
        side: Side,
    ) -> Result<Point, SchemaError> {
        let table = schema.require_table(id)?;
        Ok(self.anchor(table, side))
    }
}

/// Control-point strategy for a connector, chosen by its exit and entry sides.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CurveShape {
    /// bottom -> top
    VerticalS,
    /// left -> top
    SweepLeft,
    /// right -> top
    SweepRight,
    HorizontalS,
}

const SWEEP_OUT: f64 = 50.0;
const SWEEP_DROP: f64 = 80.0;
const LABEL_LIFT: f64 = 10.0;

impl CurveShape {
    pub fn select(from_side: Side, to_side: Side) -> Self {
        match (from_side, to_side) {
            (Side::Bottom, Side::Top) => CurveShape::VerticalS,
            (Side::Left, Side::Top) => CurveShape::SweepLeft,
            (Side::Right, Side::Top) => CurveShape::SweepRight,
            _ => CurveShape::HorizontalS,
        }
    }

    pub fn control_points(self, a: Point, b: Point) -> (Point, Point) {
        let dx = b.x - a.x;
        let dy = b.y - a.y;
        match self {
            CurveShape::VerticalS => (
                Point::new(a.x, a.y + dy * 0.5),
                Point::new(b.x, b.y - dy * 0.5),
            ),
            CurveShape::SweepLeft => (
                Point::new(a.x - SWEEP_OUT, a.y),
                Point::new(b.x, b.y - SWEEP_DROP),
            ),
            CurveShape::SweepRight => (
                Point::new(a.x + SWEEP_OUT, a.y),
                Point::new(b.x, b.y - SWEEP_DROP),
            ),
            CurveShape::HorizontalS => (
                Point::new(a.x + dx * 0.5, a.y),
                Point::new(b.x - dx * 0.5, b.y),
            ),
        }
    }
}

/// A cubic Bezier connector.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Curve {
    pub start: Point,
    pub c1: Point,
    pub c2: Point,
    pub end: Point,
}

pub fn route_curve(from: Point, from_side: Side, to: Point, to_side: Side) -> Curve {
    let (c1, c2) = CurveShape::select(from_side, to_side).control_points(from, to);
    Curve {
        start: from,
        c1,
        c2,
        end: to,
    }
}

impl Curve {
    /// Where the label chip sits: midpoint of the endpoints, lifted slightly.
    pub fn label_anchor(&self) -> Point {
        Point::new(
            (self.start.x + self.end.x) / 2.0,
            (self.start.y + self.end.y) / 2.0 - LABEL_LIFT,
        )
    }

    pub fn path_data(&self) -> String {
        format!(
            "M {} {} C {} {}, {} {}, {} {}",
            self.start.x,
            self.start.y,
            self.c1.x,
            self.c1.y,
            self.c2.x,
            self.c2.y,
            self.end.x,
            self.end.y
        )
    }
}
