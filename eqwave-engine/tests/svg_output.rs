//! Generated markup must parse as SVG.

use eqwave_core::rng::SeededSource;
use eqwave_engine::config::GenerationConfig;
use eqwave_engine::Engine;

fn parse(svg: &str) -> usvg::Tree {
    usvg::Tree::from_str(svg, &usvg::Options::default()).expect("valid svg")
}

#[test]
fn default_banner_parses() {
    let svg = Engine::new(GenerationConfig::default(), SeededSource::new(42)).unwrap().render_markup().unwrap();
    let tree = parse(&svg);
    assert_eq!(tree.size().width(), 960.0);
    assert_eq!(tree.size().height(), 280.0);
}

#[test]
fn seamless_banner_with_tracer_parses() {
    let mut cfg = GenerationConfig { seamless: true, ..GenerationConfig::default() };
    cfg.decoration.tracer = true;
    cfg.decoration.label = Some("<eq & wave>".to_string());
    let svg = Engine::new(cfg, SeededSource::new(3)).unwrap().render_markup().unwrap();
    assert!(svg.contains("&lt;eq &amp; wave&gt;"));
    assert!(svg.contains(r#"rotate="auto""#));
    parse(&svg);
}

#[test]
fn markup_carries_animation_directives() {
    let svg = Engine::new(GenerationConfig::default(), SeededSource::new(9)).unwrap().render_markup().unwrap();
    for needle in [
        "<linearGradient",
        "<filter",
        "<pattern",
        r#"calcMode="spline""#,
        "keySplines=",
        r#"repeatCount="indefinite""#,
        "<animateTransform",
        ".end+",
    ] {
        assert!(svg.contains(needle), "missing {needle}");
    }
    assert!(!svg.contains("-0 ") && !svg.contains("\"-0\""));
}

#[test]
fn series_banner_parses() {
    let svg = Engine::new(GenerationConfig::default(), SeededSource::new(5))
        .unwrap()
        .with_series(vec![0.0, 2.0, 7.0, 3.0, 11.0, 5.0, 1.0])
        .unwrap()
        .render_markup()
        .unwrap();
    parse(&svg);
}
