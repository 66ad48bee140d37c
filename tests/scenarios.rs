//! End-to-end checks against the built-in go-game schema.

use erdview::builtin::go_game;
use erdview::geometry::{Metrics, Point, route_curve};
use erdview::layout::LayoutEngine;
use erdview::model::{SchemaError, Side};
use erdview::panel::{PLACEHOLDER, Panel};
use erdview::parser::{ParseError, parse_schema};
use erdview::viewer::Viewer;

#[test]
fn platforms_height_and_bottom_anchor() {
    let schema = go_game().unwrap();
    let m = Metrics::default();
    let platforms = schema.table("platforms").unwrap();

    assert_eq!((platforms.x, platforms.y), (30.0, 30.0));
    assert_eq!(m.table_height(platforms), 100.0);
    assert_eq!(
        m.anchor_by_id(&schema, "platforms", Side::Bottom).unwrap(),
        Point::new(160.0, 130.0)
    );
}

#[test]
fn games_left_to_game_platforms_top() {
    let schema = go_game().unwrap();
    let m = Metrics::default();

    assert_eq!(m.table_height(schema.table("games").unwrap()), 196.0);
    assert_eq!(m.table_height(schema.table("game_platforms").unwrap()), 172.0);

    let a = m.anchor_by_id(&schema, "games", Side::Left).unwrap();
    let b = m.anchor_by_id(&schema, "game_platforms", Side::Top).unwrap();
    assert_eq!(a, Point::new(335.0, 128.0));
    assert_eq!(b, Point::new(160.0, 370.0));

    let curve = route_curve(a, Side::Left, b, Side::Top);
    assert_eq!(curve.c1, Point::new(285.0, 128.0));
    assert_eq!(curve.c2, Point::new(160.0, 290.0));
}

#[test]
fn games_right_to_game_genres_top() {
    let schema = go_game().unwrap();
    let m = Metrics::default();

    let a = m.anchor_by_id(&schema, "games", Side::Right).unwrap();
    let b = m.anchor_by_id(&schema, "game_genres", Side::Top).unwrap();
    assert_eq!(a, Point::new(595.0, 128.0));
    assert_eq!(b, Point::new(770.0, 370.0));

    let curve = route_curve(a, Side::Right, b, Side::Top);
    assert_eq!(curve.c1, Point::new(645.0, 128.0));
    assert_eq!(curve.c2, Point::new(770.0, 290.0));

    let layout = LayoutEngine::default().layout(&schema);
    let connector = layout
        .connectors
        .iter()
        .find(|c| c.from == "games" && c.to == "game_genres")
        .unwrap();
    assert_eq!(connector.curve, curve);
}

#[test]
fn every_anchor_is_on_its_table_edge() {
    let schema = go_game().unwrap();
    let m = Metrics::default();
    for t in schema.tables() {
        let h = m.table_height(t);
        let top = m.anchor(t, Side::Top);
        let bottom = m.anchor(t, Side::Bottom);
        let left = m.anchor(t, Side::Left);
        let right = m.anchor(t, Side::Right);
        let center = m.anchor(t, Side::Center);

        assert_eq!(top.y, t.y);
        assert_eq!(bottom.y, t.y + h);
        assert_eq!(left.x, t.x);
        assert_eq!(right.x, t.x + m.table_width);
        assert_eq!(top.x, center.x);
        assert_eq!(bottom.x, center.x);
        assert_eq!(left.y, center.y);
        assert_eq!(right.y, center.y);
        assert_eq!(m.anchor(t, Side::parse_lenient("middle")), center);
    }
}

#[test]
fn unknown_endpoint_rejected_at_load() {
    let source = r#"
        table games at 335, 30 { id BIGINT pk }
        rel { games.bottom -> achievements.top : "1 → many" }
    "#;
    match parse_schema(source) {
        Err(ParseError::Schema(SchemaError::UnknownTable { table, .. })) => {
            assert_eq!(table, "achievements")
        }
        other => panic!("expected unknown table error, got {:?}", other),
    }
}

#[test]
fn hover_drives_panel() {
    let mut viewer = Viewer::new(go_game().unwrap());
    let mut seen = Vec::new();

    for step in [Some("games"), Some("achievement_progress"), None] {
        viewer.set_hovered(step).unwrap();
        seen.push(viewer.hovered().map(str::to_string));

        let panel = viewer.panel();
        assert_eq!(panel.label(), viewer.hovered());
        assert_eq!(panel == Panel::Placeholder, viewer.hovered().is_none());
        assert_eq!(
            viewer.panel_html().contains(PLACEHOLDER),
            viewer.hovered().is_none()
        );
    }

    assert_eq!(
        seen,
        vec![
            Some("games".to_string()),
            Some("achievement_progress".to_string()),
            None
        ]
    );
}

#[test]
fn layout_is_deterministic() {
    let schema = go_game().unwrap();
    let engine = LayoutEngine::default();
    assert_eq!(engine.layout(&schema), engine.layout(&schema));
}
