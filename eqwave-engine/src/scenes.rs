//! Scene assembly: resources, bars, parallax wave layers and decoration.
//!
//! Paint order, back to front:
//! 1. background fill (+ scanline tiling)
//! 2. equalizer bar group (optionally glowing)
//! 3. wave layers, farthest first, each in a horizontal translate loop; the
//!    optional tracer lives inside the front layer's group
//! 4. label text
//!
//! Nearer layers are more opaque, thicker and scroll faster. In seamless mode
//! each layer path is duplicated one canvas width to the right and the loop
//! travels exactly that width, so the wrap is invisible.

use eqwave_core::error::{ensure_positive, Result};
use eqwave_core::path::PathData;
use tracing::{info, warn};

use crate::config::{CanvasConfig, DecorationConfig, LayerSpec, Preset};
use crate::equalizer::Bar;
use crate::nodes::{
    Animation, Element, Group, Length, MotionPath, Paint, PathNode, Rect, Resource, TextNode, TranslateLoop,
};

pub const GRADIENT_ID: &str = "grad";
pub const GLOW_ID: &str = "glow";
pub const SCANLINE_ID: &str = "scanline";

/// One wave layer ready for composition.
#[derive(Clone, Debug, PartialEq)]
pub struct Layer {
    /// 0 = front.
    pub depth_index: usize,
    pub spec: LayerSpec,
    pub path: PathData,
}

/// Finished, immutable scene description.
#[derive(Clone, Debug, PartialEq)]
pub struct Scene {
    width: f64,
    height: f64,
    resources: Vec<Resource>,
    elements: Vec<Element>,
    layer_count: usize,
    bar_count: usize,
}

impl Scene {
    #[inline] pub fn width(&self) -> f64 { self.width }
    #[inline] pub fn height(&self) -> f64 { self.height }
    #[inline] pub fn resources(&self) -> &[Resource] { &self.resources }
    /// Top-level elements in paint order.
    #[inline] pub fn elements(&self) -> &[Element] { &self.elements }
    #[inline] pub fn layer_count(&self) -> usize { self.layer_count }
    #[inline] pub fn bar_count(&self) -> usize { self.bar_count }

    /// Markup for the whole scene.
    pub fn to_svg(&self) -> String {
        crate::svg::render(self)
    }
}

/// Lays out a [`Scene`] for one canvas, tempo and scroll mode.
#[derive(Copy, Clone, Debug)]
pub struct SceneComposer {
    canvas: CanvasConfig,
    preset: Preset,
    seamless: bool,
}

impl SceneComposer {
    pub fn new(canvas: CanvasConfig, preset: Preset, seamless: bool) -> Result<Self> {
        ensure_positive("canvas.width", canvas.width)?;
        ensure_positive("canvas.height", canvas.height)?;
        Ok(Self { canvas, preset, seamless })
    }

    pub fn compose(&self, layers: &[Layer], bars: &[Bar], decoration: &DecorationConfig, bar_glow: bool) -> Scene {
        if layers.is_empty() {
            warn!("composing scene without wave layers");
        }
        if bars.is_empty() {
            warn!("composing scene without equalizer bars");
        }

        let resources = self.resources(decoration);
        let mut elements = vec![Element::Rect(Rect::full(Paint::Color(decoration.background.clone())))];
        if decoration.scanlines {
            elements.push(Element::Rect(Rect::full(Paint::Url(SCANLINE_ID.to_string()))));
        }

        if !bars.is_empty() {
            elements.push(Element::Group(Group {
                id: Some("equalizer".to_string()),
                filter: bar_glow.then(|| GLOW_ID.to_string()),
                children: bars.iter().map(bar_element).collect(),
                animations: Vec::new(),
            }));
        }

        let mut ordered: Vec<&Layer> = layers.iter().collect();
        ordered.sort_by(|a, b| b.depth_index.cmp(&a.depth_index));
        let front = ordered.len().checked_sub(1);
        elements.extend(ordered.iter().enumerate().map(|(i, l)| {
            // the tracer shares the front group's scroll so it stays on the stroke
            let tracer = (decoration.tracer && Some(i) == front).then(|| self.tracer(l, decoration));
            self.layer_element(l, tracer)
        }));

        if let Some(label) = decoration.label.as_deref().filter(|s| !s.trim().is_empty()) {
            elements.push(Element::Text(TextNode {
                x: Length::Percent(50.0),
                y: Length::Percent(50.0),
                content: label.to_string(),
                font_size: decoration.font_size,
                letter_spacing: decoration.letter_spacing,
                font_family: "monospace".to_string(),
                fill: Paint::Color(decoration.label_color.clone()),
                opacity: Some(0.9),
                filter: Some(GLOW_ID.to_string()),
            }));
        }

        info!(layers = layers.len(), bars = bars.len(), seamless = self.seamless, "scene composed");
        Scene {
            width: self.canvas.width,
            height: self.canvas.height,
            resources,
            elements,
            layer_count: layers.len(),
            bar_count: bars.len(),
        }
    }

    fn resources(&self, decoration: &DecorationConfig) -> Vec<Resource> {
        let mut out = vec![
            Resource::LinearGradient {
                id: GRADIENT_ID.to_string(),
                stops: decoration.gradient.iter().map(|s| (s.offset, s.color.clone())).collect(),
            },
            Resource::Glow { id: GLOW_ID.to_string(), std_deviation: decoration.glow_deviation },
        ];
        if decoration.scanlines {
            out.push(Resource::Scanlines {
                id: SCANLINE_ID.to_string(),
                size: 4.0,
                line: 1.0,
                color: "rgba(255,255,255,0.05)".to_string(),
            });
        }
        out
    }

    /// Translate loop for a layer; seamless loops travel one canvas width.
    pub fn scroll_for(&self, spec: &LayerSpec) -> TranslateLoop {
        let tempo = self.preset.tempo_ratio();
        if self.seamless {
            TranslateLoop { from_x: 0.0, to_x: -self.canvas.width, dur: spec.seamless_secs * tempo }
        } else {
            TranslateLoop { from_x: 0.0, to_x: -spec.drift_px, dur: spec.drift_secs * tempo }
        }
    }

    fn layer_element(&self, layer: &Layer, rider: Option<Element>) -> Element {
        let stroke = |d: PathData| {
            Element::Path(PathNode {
                d,
                stroke: Paint::Url(GRADIENT_ID.to_string()),
                stroke_width: layer.spec.stroke_width,
                fill: Paint::None,
                opacity: (layer.spec.opacity < 1.0).then_some(layer.spec.opacity),
            })
        };
        let mut children = vec![stroke(layer.path.clone())];
        if self.seamless {
            children.push(stroke(layer.path.translated(self.canvas.width)));
        }
        children.extend(rider);
        let wave = Element::Group(Group {
            id: Some(format!("wave-{}", layer.spec.name)),
            filter: None,
            children,
            animations: vec![Animation::Translate(self.scroll_for(&layer.spec))],
        });
        if layer.spec.glow {
            Element::Group(Group { id: None, filter: Some(GLOW_ID.to_string()), children: vec![wave], animations: Vec::new() })
        } else {
            wave
        }
    }

    /// Mark riding `front` in the layer's own (scrolling) frame. Seamless
    /// tracers run over the path and its duplicate in one scroll period, so
    /// they cross the canvas once per loop.
    fn tracer(&self, front: &Layer, decoration: &DecorationConfig) -> Element {
        let scroll = self.scroll_for(&front.spec);
        let (path, dur) = if self.seamless {
            (front.path.extended(&front.path.translated(self.canvas.width)), scroll.dur)
        } else {
            (front.path.clone(), scroll.dur * 2.0)
        };
        Element::Rect(Rect {
            x: Length::Px(-3.0),
            y: Length::Px(-1.0),
            width: Length::Px(6.0),
            height: Length::Px(2.0),
            fill: Paint::Color(decoration.label_color.clone()),
            opacity: Some(0.8),
            animations: vec![Animation::Motion(MotionPath { path, dur, rotate_auto: true })],
        })
    }
}

/// Bar rectangle at rest (`min_h`) with its animation tracks.
fn bar_element(bar: &Bar) -> Element {
    Element::Rect(Rect {
        x: Length::Px(bar.x),
        y: Length::Px(bar.y_for(bar.min_h)),
        width: Length::Px(bar.width),
        height: Length::Px(bar.min_h),
        fill: Paint::Url(GRADIENT_ID.to_string()),
        opacity: Some(bar.opacity),
        animations: bar.tracks().into_iter().map(Animation::Attribute).collect(),
    })
}
