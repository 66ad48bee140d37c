use crate::geometry::{Curve, Metrics, Point, route_curve};
use crate::model::Schema;

/// A positioned table box.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutTable {
    pub id: String,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl LayoutTable {
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.x && x <= self.x + self.width && y >= self.y && y <= self.y + self.height
    }
}

/// A routed relationship connector.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutConnector {
    pub from: String,
    pub to: String,
    pub curve: Curve,
    pub label_pos: Point,
    /// Index into `Schema::relationships()`
    pub relationship_index: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Layout {
    pub tables: Vec<LayoutTable>,
    pub connectors: Vec<LayoutConnector>,
    pub width: f64,
    pub height: f64,
}

impl Layout {
    /// Topmost table under the point. Later tables are drawn over earlier ones.
    pub fn table_at(&self, x: f64, y: f64) -> Option<&str> {
        self.tables
            .iter()
            .rev()
            .find(|t| t.contains(x, y))
            .map(|t| t.id.as_str())
    }
}

#[derive(Default)]
pub struct LayoutEngine {
    metrics: Metrics,
}

impl LayoutEngine {
    pub fn new(metrics: Metrics) -> Self {
        Self { metrics }
    }

    pub fn layout(&self, schema: &Schema) -> Layout {
        let tables: Vec<LayoutTable> = schema
            .tables()
            .iter()
            .map(|t| LayoutTable {
                id: t.id.clone(),
                x: t.x,
                y: t.y,
                width: self.metrics.table_width,
                height: self.metrics.table_height(t),
            })
            .collect();

        // Endpoints were resolved when the schema was built.
        let connectors: Vec<LayoutConnector> = schema
            .relationships()
            .iter()
            .enumerate()
            .filter_map(|(idx, rel)| {
                let from = schema.table(&rel.from)?;
                let to = schema.table(&rel.to)?;
                let a = self.metrics.anchor(from, rel.from_side);
                let b = self.metrics.anchor(to, rel.to_side);
                let curve = route_curve(a, rel.from_side, b, rel.to_side);
                Some(LayoutConnector {
                    from: rel.from.clone(),
                    to: rel.to.clone(),
                    label_pos: curve.label_anchor(),
                    curve,
                    relationship_index: idx,
                })
            })
            .collect();

        tracing::debug!(
            tables = tables.len(),
            connectors = connectors.len(),
            "layout computed"
        );

        Layout {
            tables,
            connectors,
            width: self.metrics.canvas_width,
            height: self.metrics.canvas_height,
        }
    }
}
