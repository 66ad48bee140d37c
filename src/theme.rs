use serde::Deserialize;

const SLATE_950: &str = "#0f172a";
const SLATE_800: &str = "#1e293b";
const SLATE_800_ALT: &str = "#1c2a3e";
const SLATE_700: &str = "#334155";
const SLATE_600: &str = "#475569";
const SLATE_500: &str = "#64748b";
const SLATE_200: &str = "#e2e8f0";
const AMBER_400: &str = "#fbbf24";
const BLUE_400: &str = "#60a5fa";
const INDIGO_500: &str = "#6366f1";

#[derive(Debug, thiserror::Error)]
pub enum ThemeError {
    #[error("Failed to parse theme: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Colors and fonts for the canvas and side panel. Every key is optional in
/// a theme file; missing keys keep the dark slate palette.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Theme {
    pub background_color: String,
    pub table_color: String,
    pub row_alt_color: String,
    pub border_color: String,
    pub connector_color: String,
    pub chip_color: String,
    pub chip_opacity: f64,
    pub connector_label_color: String,
    pub header_text_color: String,
    pub subtitle_text_color: String,
    pub column_name_color: String,
    pub column_type_color: String,
    pub pk_color: String,
    pub fk_color: String,
    /// Header color for tables that do not set one.
    pub accent_color: String,
    pub panel_color: String,
    pub panel_heading_color: String,
    pub panel_muted_color: String,
    pub font_family: String,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            background_color: SLATE_950.to_string(),
            table_color: SLATE_800.to_string(),
            row_alt_color: SLATE_800_ALT.to_string(),
            border_color: SLATE_700.to_string(),
            connector_color: SLATE_700.to_string(),
            chip_color: SLATE_950.to_string(),
            chip_opacity: 0.85,
            connector_label_color: SLATE_500.to_string(),
            header_text_color: "white".to_string(),
            subtitle_text_color: "rgba(255,255,255,0.6)".to_string(),
            column_name_color: SLATE_200.to_string(),
            column_type_color: SLATE_600.to_string(),
            pk_color: AMBER_400.to_string(),
            fk_color: BLUE_400.to_string(),
            accent_color: INDIGO_500.to_string(),
            panel_color: SLATE_800.to_string(),
            panel_heading_color: SLATE_500.to_string(),
            panel_muted_color: SLATE_700.to_string(),
            font_family: "monospace".to_string(),
        }
    }
}

impl Theme {
    pub fn from_toml(content: &str) -> Result<Self, ThemeError> {
        Ok(toml::from_str(content)?)
    }

    pub fn accent_for<'a>(&'a self, color: Option<&'a str>) -> &'a str {
        color.unwrap_or(&self.accent_color)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_toml_is_default() {
        assert_eq!(Theme::from_toml("").unwrap(), Theme::default());
    }

    #[test]
    fn test_partial_override() {
        let theme = Theme::from_toml(
            r##"
            background_color = "#ffffff"
            chip_opacity = 1.0
            "##,
        )
        .unwrap();
        assert_eq!(theme.background_color, "#ffffff");
        assert_eq!(theme.chip_opacity, 1.0);
        assert_eq!(theme.pk_color, AMBER_400);
    }

    #[test]
    fn test_bad_toml() {
        assert!(Theme::from_toml("background_color = 3").is_err());
    }

    #[test]
    fn test_accent_fallback() {
        let theme = Theme::default();
        assert_eq!(theme.accent_for(None), INDIGO_500);
        assert_eq!(theme.accent_for(Some("#10b981")), "#10b981");
    }
}
