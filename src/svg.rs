use crate::geometry::Metrics;
use crate::layout::{Layout, LayoutConnector, LayoutTable};
use crate::measure::TextMetrics;
use crate::model::{RelationshipSpec, Schema, TableSpec};
use crate::theme::Theme;
use std::collections::HashMap;
use std::fmt::{self, Write};

const TITLE_SIZE: f64 = 12.0;
const SUBTITLE_SIZE: f64 = 9.0;
const BADGE_SIZE: f64 = 8.0;
const NAME_SIZE: f64 = 11.0;
const TYPE_SIZE: f64 = 10.0;
const CHIP_TEXT_SIZE: f64 = 9.0;
const CHIP_MIN_WIDTH: f64 = 56.0;
const CHIP_HEIGHT: f64 = 15.0;
const CORNER: f64 = 8.0;
const HEADER_STRIP: f64 = 10.0;
const SHADOW_OFFSET: f64 = 3.0;
const ROW_BASELINE: f64 = 16.0;
const BADGE_X: f64 = 7.0;
const NAME_X_BADGED: f64 = 26.0;
const NAME_X_PLAIN: f64 = 10.0;
const TYPE_INSET: f64 = 8.0;
const NAME_TYPE_GAP: f64 = 6.0;

pub struct SvgRenderer {
    metrics: Metrics,
    text: TextMetrics,
    theme: Theme,
}

impl Default for SvgRenderer {
    fn default() -> Self {
        Self::new(Metrics::default(), Theme::default())
    }
}

impl SvgRenderer {
    pub fn new(metrics: Metrics, theme: Theme) -> Self {
        Self {
            metrics,
            text: TextMetrics::default(),
            theme,
        }
    }

    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    /// Render the canvas. `hovered` is the id of the highlighted table, if any.
    pub fn render(&self, schema: &Schema, layout: &Layout, hovered: Option<&str>) -> String {
        let mut svg = String::new();
        // Writing into a String cannot fail.
        let _ = self.write_document(&mut svg, schema, layout, hovered);
        tracing::debug!(bytes = svg.len(), hovered = ?hovered, "svg rendered");
        svg
    }

    fn write_document(
        &self,
        svg: &mut String,
        schema: &Schema,
        layout: &Layout,
        hovered: Option<&str>,
    ) -> fmt::Result {
        let t = &self.theme;
        writeln!(
            svg,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}" font-family="{}">"#,
            escape_xml(&t.font_family),
            w = layout.width,
            h = layout.height,
        )?;
        writeln!(
            svg,
            r#"<defs><marker id="arrowhead" markerWidth="7" markerHeight="7" refX="5" refY="3.5" orient="auto"><path d="M0,0 L0,7 L7,3.5 z" fill="{}" /></marker></defs>"#,
            escape_xml(&t.connector_color)
        )?;
        writeln!(
            svg,
            r#"<rect class="canvas" width="{}" height="{}" rx="10" fill="{}" />"#,
            layout.width,
            layout.height,
            escape_xml(&t.background_color)
        )?;

        let table_map: HashMap<&str, &TableSpec> =
            schema.tables().iter().map(|t| (t.id.as_str(), t)).collect();

        // Connectors go first so tables cover their ends.
        for connector in &layout.connectors {
            if let Some(rel) = schema.relationships().get(connector.relationship_index) {
                self.render_connector(svg, connector, rel)?;
            }
        }

        for table in &layout.tables {
            if let Some(spec) = table_map.get(table.id.as_str()) {
                let active = hovered == Some(table.id.as_str());
                self.render_table(svg, table, spec, active)?;
            }
        }

        writeln!(svg, "</svg>")
    }

    fn render_connector(
        &self,
        svg: &mut String,
        connector: &LayoutConnector,
        rel: &RelationshipSpec,
    ) -> fmt::Result {
        let t = &self.theme;
        writeln!(
            svg,
            r#"<g class="connector" data-from="{}" data-to="{}">"#,
            escape_xml(&connector.from),
            escape_xml(&connector.to)
        )?;
        writeln!(
            svg,
            r#"<path d="{}" stroke="{}" stroke-width="1.5" fill="none" stroke-dasharray="6,3" marker-end="url(#arrowhead)" />"#,
            connector.curve.path_data(),
            escape_xml(&t.connector_color)
        )?;

        if !rel.label.is_empty() {
            let lx = connector.label_pos.x;
            let ly = connector.label_pos.y;
            let chip_w =
                CHIP_MIN_WIDTH.max(self.text.text_width(&rel.label, CHIP_TEXT_SIZE) + 12.0);
            writeln!(
                svg,
                r#"<rect x="{}" y="{}" width="{}" height="{}" rx="3" fill="{}" opacity="{}" />"#,
                lx - chip_w / 2.0,
                ly - 12.0,
                chip_w,
                CHIP_HEIGHT,
                escape_xml(&t.chip_color),
                t.chip_opacity
            )?;
            writeln!(
                svg,
                r#"<text x="{}" y="{}" fill="{}" font-size="{}" text-anchor="middle">{}</text>"#,
                lx,
                ly,
                escape_xml(&t.connector_label_color),
                CHIP_TEXT_SIZE,
                escape_xml(&rel.label)
            )?;
        }

        writeln!(svg, "</g>")
    }

    fn render_table(
        &self,
        svg: &mut String,
        layout: &LayoutTable,
        table: &TableSpec,
        active: bool,
    ) -> fmt::Result {
        let t = &self.theme;
        let w = layout.width;
        let h = layout.height;
        let header_h = self.metrics.header_height;
        let color = escape_xml(t.accent_for(table.color.as_deref()));
        let header_opacity = if active { 1.0 } else { 0.85 };
        let (stroke, stroke_w) = if active {
            (color.clone(), 2)
        } else {
            (escape_xml(&t.border_color), 1)
        };

        writeln!(
            svg,
            r#"<g class="{}" data-table-id="{}" transform="translate({}, {})">"#,
            if active { "table active" } else { "table" },
            escape_xml(&table.id),
            layout.x,
            layout.y
        )?;

        // 1. Shadow, body, header
        writeln!(
            svg,
            r#"<rect x="{o}" y="{o}" width="{w}" height="{h}" rx="{CORNER}" fill="black" opacity="0.2" />"#,
            o = SHADOW_OFFSET,
        )?;
        writeln!(
            svg,
            r#"<rect width="{w}" height="{h}" rx="{CORNER}" fill="{}" stroke="{}" stroke-width="{}" />"#,
            escape_xml(&t.table_color),
            stroke,
            stroke_w
        )?;
        writeln!(
            svg,
            r#"<rect width="{w}" height="{header_h}" rx="{CORNER}" fill="{color}" opacity="{header_opacity}" />"#,
        )?;
        // Square off the header's bottom corners
        writeln!(
            svg,
            r#"<rect y="{}" width="{w}" height="{HEADER_STRIP}" fill="{color}" opacity="{header_opacity}" />"#,
            header_h - HEADER_STRIP
        )?;

        // 2. Label and subtitle
        writeln!(
            svg,
            r#"<text x="{}" y="17" fill="{}" font-size="{TITLE_SIZE}" font-weight="bold" text-anchor="middle">{}</text>"#,
            w / 2.0,
            escape_xml(&t.header_text_color),
            escape_xml(&table.label)
        )?;
        if !table.subtitle.is_empty() {
            writeln!(
                svg,
                r#"<text x="{}" y="32" fill="{}" font-size="{SUBTITLE_SIZE}" text-anchor="middle">{}</text>"#,
                w / 2.0,
                escape_xml(&t.subtitle_text_color),
                escape_xml(&table.subtitle)
            )?;
        }

        // 3. Column rows
        for (i, col) in table.columns.iter().enumerate() {
            let row_y = header_h + i as f64 * self.metrics.row_height;
            let fill = if i % 2 == 0 {
                escape_xml(&t.table_color)
            } else {
                escape_xml(&t.row_alt_color)
            };
            writeln!(svg, r#"<g transform="translate(0, {})">"#, row_y)?;
            writeln!(
                svg,
                r#"<rect width="{w}" height="{}" fill="{}" />"#,
                self.metrics.row_height, fill
            )?;

            let badge = if col.pk {
                Some(("PK", &t.pk_color))
            } else if col.fk.is_some() {
                Some(("FK", &t.fk_color))
            } else {
                None
            };
            if let Some((text, badge_color)) = badge {
                writeln!(
                    svg,
                    r#"<text x="{BADGE_X}" y="{ROW_BASELINE}" font-size="{BADGE_SIZE}" fill="{}" font-weight="bold">{}</text>"#,
                    escape_xml(badge_color),
                    text
                )?;
            }

            let name_x = if col.is_badged() {
                NAME_X_BADGED
            } else {
                NAME_X_PLAIN
            };
            let type_w = self.text.text_width(&col.type_name, TYPE_SIZE);
            let name_room = w - TYPE_INSET - type_w - NAME_TYPE_GAP - name_x;
            let name = self.text.fit(&col.name, NAME_SIZE, name_room);
            writeln!(
                svg,
                r#"<text x="{name_x}" y="{ROW_BASELINE}" font-size="{NAME_SIZE}" fill="{}">{}</text>"#,
                escape_xml(&t.column_name_color),
                escape_xml(&name)
            )?;
            writeln!(
                svg,
                r#"<text x="{}" y="{ROW_BASELINE}" font-size="{TYPE_SIZE}" fill="{}" text-anchor="end">{}</text>"#,
                w - TYPE_INSET,
                escape_xml(&t.column_type_color),
                escape_xml(&col.type_name)
            )?;
            writeln!(svg, "</g>")?;
        }

        writeln!(svg, "</g>")
    }
}

pub fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builtin::go_game;
    use crate::layout::LayoutEngine;
    use crate::parser::parse_schema;

    fn render(schema: &Schema, hovered: Option<&str>) -> String {
        let layout = LayoutEngine::default().layout(schema);
        SvgRenderer::default().render(schema, &layout, hovered)
    }

    #[test]
    fn test_render_basic() {
        let schema = go_game().unwrap();
        let svg = render(&schema, None);

        assert!(svg.starts_with("<svg"));
        assert!(svg.contains(r#"width="930" height="820""#));
        assert!(svg.contains(r#"id="arrowhead""#));
        assert!(svg.contains(r#"data-table-id="achievement_progress""#));
        assert!(svg.trim_end().ends_with("</svg>"));
        assert_eq!(svg.matches(r#"class="connector""#).count(), 5);
        assert_eq!(svg.matches(r#"class="table""#).count(), 6);
        assert!(!svg.contains("table active"));
    }

    #[test]
    fn test_render_connector_path() {
        let schema = go_game().unwrap();
        let svg = render(&schema, None);
        assert!(svg.contains(r#"d="M 335 128 C 285 128, 160 290, 160 370""#));
        assert!(svg.contains(r#"stroke-dasharray="6,3""#));
        assert!(svg.contains("1 → many"));
    }

    #[test]
    fn test_render_hovered_highlight() {
        let schema = go_game().unwrap();
        let svg = render(&schema, Some("games"));
        assert_eq!(svg.matches("table active").count(), 1);
        assert!(svg.contains(r#"class="table active" data-table-id="games""#));
        assert!(svg.contains(r##"stroke="#6366f1" stroke-width="2""##));
    }

    #[test]
    fn test_render_badges_and_rows() {
        let schema = parse_schema(
            r#"
            table gp at 0, 0 {
                id UUID pk
                game_id BIGINT fk -> games
                name TEXT
            }
        "#,
        )
        .unwrap();
        let svg = render(&schema, None);
        assert_eq!(svg.matches(">PK</text>").count(), 1);
        assert_eq!(svg.matches(">FK</text>").count(), 1);
        assert!(svg.contains(r#"<text x="10" y="16" font-size="11""#));
        assert!(svg.contains(r#"translate(0, 92)"#));
        assert!(svg.contains("#1c2a3e"));
    }

    #[test]
    fn test_render_escapes_text() {
        let schema = parse_schema(r#"table t "a <b> & c" at 0, 0 { }"#).unwrap();
        let svg = render(&schema, None);
        assert!(svg.contains("a &lt;b&gt; &amp; c"));
    }

    #[test]
    fn test_render_truncates_long_names() {
        let schema = parse_schema(
            "table t at 0, 0 {
                an_extremely_long_column_name_that_cannot_possibly_fit TIMESTAMPTZ
            }",
        )
        .unwrap();
        let svg = render(&schema, None);
        assert!(svg.contains('…'));
        assert!(!svg.contains("possibly_fit"));
    }

    #[test]
    fn test_render_escapes_theme_values() {
        let schema = go_game().unwrap();
        let layout = LayoutEngine::default().layout(&schema);
        let theme = Theme {
            background_color: r#"red" onload="x"#.to_string(),
            pk_color: "<b>".to_string(),
            border_color: "a&b".to_string(),
            ..Theme::default()
        };
        let svg = SvgRenderer::new(Metrics::default(), theme).render(&schema, &layout, None);
        assert!(svg.contains(r#"fill="red&quot; onload=&quot;x""#));
        assert!(svg.contains(r#"fill="&lt;b&gt;""#));
        assert!(svg.contains(r#"stroke="a&amp;b""#));
        assert!(!svg.contains("<b>"));
    }

    #[test]
    fn test_escape_xml() {
        assert_eq!(
            escape_xml(r#"<a href="x">&</a>"#),
            "&lt;a href=&quot;x&quot;&gt;&amp;&lt;/a&gt;"
        );
    }
}
