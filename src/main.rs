use clap::{Parser, ValueEnum};
use erdview::builtin;
use erdview::svg::escape_xml;
use erdview::theme::Theme;
use erdview::viewer::Viewer;
use std::fs;
use std::path::{Path, PathBuf};
use std::process;
use tracing_subscriber::EnvFilter;

const HOVER_HINT: &str = "Hover any table to inspect its columns";

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    /// The diagram canvas only
    Svg,
    /// A static page snapshot: the canvas and the column notes panel for
    /// `--hover`. Hovering in a browser needs the wasm build.
    Html,
}

/// Render an ER diagram schema to SVG
#[derive(Parser, Debug)]
#[command(name = "erdview", version)]
#[command(about = "Lay out an .erd schema and render it as a hoverable diagram", long_about = None)]
struct Args {
    /// Schema file in .erd notation (default: built-in go-game schema)
    #[arg(value_name = "INPUT")]
    input: Option<PathBuf>,

    /// Output file (default: stdout)
    #[arg(short, long, value_name = "OUTPUT")]
    output: Option<PathBuf>,

    /// Table id to render in the hovered state
    #[arg(long, value_name = "TABLE")]
    hover: Option<String>,

    /// Theme file (TOML)
    #[arg(short, long, value_name = "THEME")]
    theme: Option<PathBuf>,

    /// Output format. `html` captures a snapshot; it does not react to hovering
    #[arg(short, long, value_enum, default_value_t = Format::Svg)]
    format: Format,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(Args::parse()) {
        eprintln!("{}", e);
        process::exit(1);
    }
}

fn run(args: Args) -> Result<(), String> {
    let source = match &args.input {
        Some(path) => Some(
            fs::read_to_string(path)
                .map_err(|e| format!("Failed to read {}: {}", path.display(), e))?,
        ),
        None => None,
    };
    let schema = builtin::load(source.as_deref()).map_err(|e| format!("Parse error: {}", e))?;

    let theme = match &args.theme {
        Some(path) => {
            let content = fs::read_to_string(path)
                .map_err(|e| format!("Failed to read {}: {}", path.display(), e))?;
            Theme::from_toml(&content).map_err(|e| e.to_string())?
        }
        None => Theme::default(),
    };

    let mut viewer = Viewer::with_theme(schema, theme.clone());
    viewer
        .set_hovered(args.hover.as_deref())
        .map_err(|e| e.to_string())?;

    let rendered = match args.format {
        Format::Svg => viewer.render_svg(),
        Format::Html => html_page(&viewer, &theme, &schema_name(args.input.as_deref())),
    };

    match &args.output {
        Some(path) => {
            fs::write(path, &rendered)
                .map_err(|e| format!("Failed to write {}: {}", path.display(), e))?;
            tracing::info!(path = %path.display(), bytes = rendered.len(), "diagram written");
        }
        None => print!("{}", rendered),
    }
    Ok(())
}

/// Heading name: the input file stem, or `go-game` for the built-in schema.
fn schema_name(input: Option<&Path>) -> String {
    input
        .and_then(|p| p.file_stem())
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "go-game".to_string())
}

fn html_page(viewer: &Viewer, theme: &Theme, name: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<head><meta charset="utf-8"><title>{title}</title></head>
<body style="background: {bg}; margin: 0; padding: 20px; font-family: {font};">
<div style="color: {heading}; font-size: 17px; font-weight: bold;">{title}</div>
<div style="color: {muted}; font-size: 11px; margin: 3px 0 14px;">{HOVER_HINT}</div>
<div style="display: flex; gap: 18px; align-items: flex-start;">
<div style="flex-shrink: 0;">
{svg}</div>
<div style="width: 265px; flex-shrink: 0;">
{panel}</div>
</div>
</body>
</html>
"#,
        title = escape_xml(&format!("{} · Database Schema", name)),
        bg = escape_xml(&theme.background_color),
        font = escape_xml(&theme.font_family),
        heading = escape_xml(&theme.column_name_color),
        muted = escape_xml(&theme.panel_heading_color),
        svg = viewer.render_svg(),
        panel = viewer.panel_html(),
    )
}
