//! Side panel: the column notes for whichever table is hovered.

use crate::model::Schema;
use crate::svg::escape_xml;
use crate::theme::Theme;
use std::fmt::Write;

pub const PANEL_TITLE: &str = "COLUMN NOTES";
pub const PLACEHOLDER: &str = "Hover a table to see details.";

#[derive(Debug, Clone, PartialEq)]
pub struct PanelRow {
    pub pk: bool,
    pub fk: bool,
    pub name: String,
    pub type_name: String,
    pub note: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Panel {
    Placeholder,
    Table {
        id: String,
        label: String,
        color: Option<String>,
        rows: Vec<PanelRow>,
    },
}

impl Panel {
    /// An id that is not in the schema projects to the placeholder.
    pub fn project(schema: &Schema, hovered: Option<&str>) -> Self {
        let Some(table) = hovered.and_then(|id| schema.table(id)) else {
            return Panel::Placeholder;
        };

        Panel::Table {
            id: table.id.clone(),
            label: table.label.clone(),
            color: table.color.clone(),
            rows: table
                .columns
                .iter()
                .map(|c| PanelRow {
                    pk: c.pk,
                    fk: c.fk.is_some(),
                    name: c.name.clone(),
                    type_name: c.type_name.clone(),
                    note: c.note.clone(),
                })
                .collect(),
        }
    }

    pub fn label(&self) -> Option<&str> {
        match self {
            Panel::Placeholder => None,
            Panel::Table { label, .. } => Some(label.as_str()),
        }
    }

    pub fn to_html(&self, theme: &Theme) -> String {
        let mut html = String::new();
        let _ = self.write_html(&mut html, theme);
        html
    }

    fn write_html(&self, html: &mut String, theme: &Theme) -> std::fmt::Result {
        writeln!(
            html,
            r#"<div class="panel" style="background: {}; border-radius: 8px; padding: 14px; min-height: 140px; font-family: {};">"#,
            escape_xml(&theme.panel_color),
            escape_xml(&theme.font_family)
        )?;
        writeln!(
            html,
            r#"<div class="panel-title" style="color: {}; font-size: 10px; font-weight: bold; letter-spacing: 1px; margin-bottom: 10px;">{}</div>"#,
            escape_xml(&theme.panel_heading_color),
            PANEL_TITLE
        )?;

        match self {
            Panel::Placeholder => {
                writeln!(
                    html,
                    r#"<div class="placeholder" style="color: {}; font-size: 11px;">{}</div>"#,
                    escape_xml(&theme.panel_muted_color),
                    PLACEHOLDER
                )?;
            }
            Panel::Table {
                id,
                label,
                color,
                rows,
            } => {
                writeln!(
                    html,
                    r#"<div class="panel-table" data-table-id="{}" style="color: {}; font-size: 12px; font-weight: bold; margin-bottom: 8px;">{}</div>"#,
                    escape_xml(id),
                    escape_xml(theme.accent_for(color.as_deref())),
                    escape_xml(label)
                )?;
                let pk = escape_xml(&theme.pk_color);
                let fk = escape_xml(&theme.fk_color);
                let name_color = escape_xml(&theme.column_name_color);
                let muted = escape_xml(&theme.panel_muted_color);
                let heading = escape_xml(&theme.panel_heading_color);
                for row in rows {
                    write!(
                        html,
                        r#"<div class="column" style="margin-bottom: 8px;"><div style="display: flex; gap: 5px; align-items: baseline;">"#
                    )?;
                    if row.pk {
                        write!(
                            html,
                            r#"<span style="color: {}; font-size: 8px;">PK</span>"#,
                            pk
                        )?;
                    }
                    if row.fk {
                        write!(
                            html,
                            r#"<span style="color: {}; font-size: 8px;">FK</span>"#,
                            fk
                        )?;
                    }
                    write!(
                        html,
                        r#"<span style="color: {}; font-size: 11px;">{}</span><span style="color: {}; font-size: 9px;">{}</span></div>"#,
                        name_color,
                        escape_xml(&row.name),
                        muted,
                        escape_xml(&row.type_name)
                    )?;
                    if let Some(note) = &row.note {
                        write!(
                            html,
                            r#"<div class="note" style="color: {}; font-size: 10px; padding-left: 4px; line-height: 1.4;">{}</div>"#,
                            heading,
                            escape_xml(note)
                        )?;
                    }
                    writeln!(html, "</div>")?;
                }
            }
        }

        writeln!(html, "</div>")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builtin::go_game;

    #[test]
    fn test_placeholder_when_nothing_hovered() {
        let schema = go_game().unwrap();
        let panel = Panel::project(&schema, None);
        assert_eq!(panel, Panel::Placeholder);
        assert_eq!(panel.label(), None);
        assert!(panel.to_html(&Theme::default()).contains(PLACEHOLDER));
    }

    #[test]
    fn test_table_rows_in_declaration_order() {
        let schema = go_game().unwrap();
        let panel = Panel::project(&schema, Some("game_genres"));
        let Panel::Table { label, rows, color, .. } = &panel else {
            panic!("expected a table panel");
        };
        assert_eq!(label, "game_genres");
        assert_eq!(color.as_deref(), Some("#f59e0b"));
        let names: Vec<&str> = rows.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["id", "game_id", "genre_id", "name"]);
        assert!(rows[0].pk && !rows[0].fk);
        assert!(rows[1].fk && !rows[1].pk);
        assert_eq!(rows[2].note.as_deref(), Some("→ genres.id"));
    }

    #[test]
    fn test_unknown_id_projects_placeholder() {
        let schema = go_game().unwrap();
        assert_eq!(Panel::project(&schema, Some("ghost")), Panel::Placeholder);
    }

    #[test]
    fn test_html_escapes_theme_values() {
        let schema = go_game().unwrap();
        let theme = Theme {
            panel_color: r#"x" onclick="y"#.to_string(),
            fk_color: "</span>".to_string(),
            ..Theme::default()
        };
        let html = Panel::project(&schema, Some("game_genres")).to_html(&theme);
        assert!(html.contains("x&quot; onclick=&quot;y"));
        assert!(html.contains("color: &lt;/span&gt;;"));
        assert!(!html.contains(r#"onclick="y""#));
    }

    #[test]
    fn test_html_for_table() {
        let schema = go_game().unwrap();
        let html = Panel::project(&schema, Some("platforms")).to_html(&Theme::default());
        assert!(html.contains(PANEL_TITLE));
        assert!(!html.contains(PLACEHOLDER));
        assert!(html.contains(r#"data-table-id="platforms""#));
        assert!(html.contains("'PlayStation 5' | 'Steam (PC)'"));
        assert_eq!(html.matches(">PK</span>").count(), 1);
        assert_eq!(html.matches(r#"class="note""#).count(), 2);
    }
}
