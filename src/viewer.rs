//! Interactive diagram state.
//!
//! The hovered table id is the only mutable state. It lives here and is
//! passed explicitly into every render call.

use crate::geometry::Metrics;
use crate::layout::{Layout, LayoutEngine};
use crate::model::{Schema, SchemaError};
use crate::panel::Panel;
use crate::svg::SvgRenderer;
use crate::theme::Theme;

pub struct Viewer {
    schema: Schema,
    layout: Layout,
    renderer: SvgRenderer,
    hovered: Option<String>,
}

impl Viewer {
    pub fn new(schema: Schema) -> Self {
        Self::with_theme(schema, Theme::default())
    }

    pub fn with_theme(schema: Schema, theme: Theme) -> Self {
        let metrics = Metrics::default();
        let layout = LayoutEngine::new(metrics.clone()).layout(&schema);
        Self {
            schema,
            layout,
            renderer: SvgRenderer::new(metrics, theme),
            hovered: None,
        }
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn hovered(&self) -> Option<&str> {
        self.hovered.as_deref()
    }

    /// Enter (`Some`) or leave (`None`) a table. Unknown ids are rejected and
    /// leave the current state untouched.
    pub fn set_hovered(&mut self, id: Option<&str>) -> Result<(), SchemaError> {
        if let Some(id) = id {
            self.schema.require_table(id)?;
        }
        tracing::trace!(from = ?self.hovered, to = ?id, "hover");
        self.hovered = id.map(str::to_string);
        Ok(())
    }

    /// Hover whatever table is under the pointer. Returns true if the hovered
    /// table changed.
    pub fn pointer_move(&mut self, x: f64, y: f64) -> bool {
        let target = self.layout.table_at(x, y).map(str::to_string);
        if target == self.hovered {
            return false;
        }
        tracing::trace!(from = ?self.hovered, to = ?target, "hover");
        self.hovered = target;
        true
    }

    pub fn render_svg(&self) -> String {
        self.renderer
            .render(&self.schema, &self.layout, self.hovered.as_deref())
    }

    pub fn panel(&self) -> Panel {
        Panel::project(&self.schema, self.hovered.as_deref())
    }

    pub fn panel_html(&self) -> String {
        self.panel().to_html(self.renderer.theme())
    }
}
