pub mod builtin;
pub mod geometry;
pub mod layout;
pub mod lexer;
pub mod measure;
pub mod model;
pub mod panel;
pub mod parser;
pub mod svg;
pub mod theme;
pub mod viewer;

use wasm_bindgen::prelude::*;

use layout::LayoutEngine;
use svg::SvgRenderer;
use viewer::Viewer;

/// Initialize panic hook for better error messages in WASM
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(target_arch = "wasm32")]
    console_error_panic_hook::set_once();
}

/// Render a schema to SVG. Without `source` the built-in go-game schema is used.
#[wasm_bindgen(js_name = "erdToSvg")]
pub fn render_erd(source: Option<String>, hovered: Option<String>) -> Result<String, String> {
    let schema = builtin::load(source.as_deref()).map_err(|e| e.to_string())?;
    if let Some(id) = hovered.as_deref() {
        schema.require_table(id).map_err(|e| e.to_string())?;
    }
    let layout = LayoutEngine::default().layout(&schema);
    Ok(SvgRenderer::default().render(&schema, &layout, hovered.as_deref()))
}

/// Hover-interactive diagram for JS hosts. Wire `pointerenter`/`pointerleave`
/// on the `data-table-id` groups to `setHovered`, or forward raw pointer
/// coordinates to `pointerMove`.
#[wasm_bindgen(js_name = "ErdViewer")]
pub struct ErdViewer {
    inner: Viewer,
}

#[wasm_bindgen(js_class = "ErdViewer")]
impl ErdViewer {
    #[wasm_bindgen(constructor)]
    pub fn new(source: Option<String>, theme_toml: Option<String>) -> Result<ErdViewer, String> {
        let schema = builtin::load(source.as_deref()).map_err(|e| e.to_string())?;
        let theme = match theme_toml.as_deref() {
            Some(t) => theme::Theme::from_toml(t).map_err(|e| e.to_string())?,
            None => theme::Theme::default(),
        };
        Ok(Self {
            inner: Viewer::with_theme(schema, theme),
        })
    }

    #[wasm_bindgen(js_name = "setHovered")]
    pub fn set_hovered(&mut self, id: Option<String>) -> Result<(), String> {
        self.inner
            .set_hovered(id.as_deref())
            .map_err(|e| e.to_string())
    }

    pub fn hovered(&self) -> Option<String> {
        self.inner.hovered().map(str::to_string)
    }

    #[wasm_bindgen(js_name = "pointerMove")]
    pub fn pointer_move(&mut self, x: f64, y: f64) -> bool {
        self.inner.pointer_move(x, y)
    }

    #[wasm_bindgen(js_name = "renderSvg")]
    pub fn render_svg(&self) -> String {
        self.inner.render_svg()
    }

    #[wasm_bindgen(js_name = "panelHtml")]
    pub fn panel_html(&self) -> String {
        self.inner.panel_html()
    }

    #[wasm_bindgen(js_name = "tableIds")]
    pub fn table_ids(&self) -> js_sys::Array {
        self.inner
            .schema()
            .tables()
            .iter()
            .map(|t| JsValue::from_str(&t.id))
            .collect()
    }
}
