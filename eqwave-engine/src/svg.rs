//! SVG/SMIL markup for a finished [`Scene`].
//!
//! Output is deterministic: attribute order is fixed and every number goes
//! through [`eqwave_core::math::push_num`], so identical scenes produce
//! byte-identical documents.

use eqwave_core::math::{fmt_secs, join_nums, push_num};

use crate::nodes::{
    Animation, AnimationSegment, Begin, Element, Group, Length, MotionPath, Paint, PathNode, Rect, Resource,
    TextNode, TranslateLoop,
};
use crate::scenes::Scene;

const INDENT: &str = "  ";

/// Render `scene` as a standalone SVG document.
pub fn render(scene: &Scene) -> String {
    let mut w = SvgWriter::default();
    w.open_root(scene.width(), scene.height());
    w.defs(scene.resources());
    for e in scene.elements() {
        w.element(e);
    }
    w.line("</svg>");
    w.out
}

/// Escape text for element content and quoted attribute values.
pub fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

#[derive(Default)]
struct SvgWriter {
    out: String,
    depth: usize,
}

impl SvgWriter {
    fn line(&mut self, s: &str) {
        for _ in 0..self.depth {
            self.out.push_str(INDENT);
        }
        self.out.push_str(s);
        self.out.push('\n');
    }

    fn open(&mut self, s: &str) {
        self.line(s);
        self.depth += 1;
    }

    fn close(&mut self, s: &str) {
        self.depth = self.depth.saturating_sub(1);
        self.line(s);
    }

    fn open_root(&mut self, width: f64, height: f64) {
        let (w, h) = (num(width), num(height));
        self.open(&format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#
        ));
    }

    fn defs(&mut self, resources: &[Resource]) {
        if resources.is_empty() {
            return;
        }
        self.open("<defs>");
        for r in resources {
            match r {
                Resource::LinearGradient { id, stops } => {
                    self.open(&format!(r#"<linearGradient id="{}" x1="0" y1="0" x2="1" y2="0">"#, escape(id)));
                    for (offset, color) in stops {
                        self.line(&format!(r#"<stop offset="{}%" stop-color="{}"/>"#, num(*offset), escape(color)));
                    }
                    self.close("</linearGradient>");
                }
                Resource::Glow { id, std_deviation } => {
                    self.open(&format!(r#"<filter id="{}">"#, escape(id)));
                    self.line(&format!(r#"<feGaussianBlur stdDeviation="{}" result="b"/>"#, num(*std_deviation)));
                    self.open("<feMerge>");
                    self.line(r#"<feMergeNode in="b"/>"#);
                    self.line(r#"<feMergeNode in="SourceGraphic"/>"#);
                    self.close("</feMerge>");
                    self.close("</filter>");
                }
                Resource::Scanlines { id, size, line, color } => {
                    let s = num(*size);
                    self.open(&format!(
                        r#"<pattern id="{}" width="{s}" height="{s}" patternUnits="userSpaceOnUse">"#,
                        escape(id)
                    ));
                    self.line(&format!(r#"<rect width="{s}" height="{}" fill="{}"/>"#, num(*line), escape(color)));
                    self.close("</pattern>");
                }
            }
        }
        self.close("</defs>");
    }

    fn element(&mut self, e: &Element) {
        match e {
            Element::Rect(r) => self.rect(r),
            Element::Path(p) => self.path(p),
            Element::Text(t) => self.text(t),
            Element::Group(g) => self.group(g),
        }
    }

    fn rect(&mut self, r: &Rect) {
        let mut tag = String::from("<rect");
        attr(&mut tag, "x", &length(r.x));
        attr(&mut tag, "y", &length(r.y));
        attr(&mut tag, "width", &length(r.width));
        attr(&mut tag, "height", &length(r.height));
        attr(&mut tag, "fill", &paint(&r.fill));
        if let Some(o) = r.opacity {
            attr(&mut tag, "opacity", &num(o));
        }
        self.with_animations(tag, "</rect>", &r.animations);
    }

    fn path(&mut self, p: &PathNode) {
        let mut tag = String::from("<path");
        let mut d = String::with_capacity(p.d.segments().len() * 28);
        p.d.push_markup(&mut d);
        attr(&mut tag, "d", &d);
        attr(&mut tag, "stroke", &paint(&p.stroke));
        attr(&mut tag, "stroke-width", &num(p.stroke_width));
        attr(&mut tag, "fill", &paint(&p.fill));
        if let Some(o) = p.opacity {
            attr(&mut tag, "opacity", &num(o));
        }
        tag.push_str("/>");
        self.line(&tag);
    }

    fn text(&mut self, t: &TextNode) {
        let mut tag = String::from("<text");
        attr(&mut tag, "x", &length(t.x));
        attr(&mut tag, "y", &length(t.y));
        attr(&mut tag, "text-anchor", "middle");
        attr(&mut tag, "dominant-baseline", "middle");
        attr(&mut tag, "font-size", &num(t.font_size));
        attr(&mut tag, "letter-spacing", &num(t.letter_spacing));
        attr(&mut tag, "font-family", &escape(&t.font_family));
        attr(&mut tag, "fill", &paint(&t.fill));
        if let Some(o) = t.opacity {
            attr(&mut tag, "opacity", &num(o));
        }
        if let Some(f) = &t.filter {
            attr(&mut tag, "filter", &format!("url(#{})", escape(f)));
        }
        tag.push('>');
        tag.push_str(&escape(&t.content));
        tag.push_str("</text>");
        self.line(&tag);
    }

    fn group(&mut self, g: &Group) {
        let mut tag = String::from("<g");
        if let Some(id) = &g.id {
            attr(&mut tag, "id", &escape(id));
        }
        if let Some(f) = &g.filter {
            attr(&mut tag, "filter", &format!("url(#{})", escape(f)));
        }
        tag.push('>');
        self.open(&tag);
        for c in &g.children {
            self.element(c);
        }
        for a in &g.animations {
            self.animation(a);
        }
        self.close("</g>");
    }

    fn with_animations(&mut self, mut tag: String, closing: &str, animations: &[Animation]) {
        if animations.is_empty() {
            tag.push_str("/>");
            self.line(&tag);
            return;
        }
        tag.push('>');
        self.open(&tag);
        for a in animations {
            self.animation(a);
        }
        self.close(closing);
    }

    fn animation(&mut self, a: &Animation) {
        let tag = match a {
            Animation::Attribute(seg) => animate(seg),
            Animation::Translate(t) => animate_transform(t),
            Animation::Motion(m) => animate_motion(m),
        };
        self.line(&tag);
    }
}

fn animate(seg: &AnimationSegment) -> String {
    let mut tag = String::from("<animate");
    if let Some(id) = &seg.id {
        attr(&mut tag, "id", &escape(id));
    }
    attr(&mut tag, "attributeName", seg.attribute.as_str());
    if let Some(b) = &seg.begin {
        attr(&mut tag, "begin", &begin(b));
    }
    attr(&mut tag, "dur", &fmt_secs(seg.dur));
    attr(&mut tag, "values", &join_nums(&seg.values, ";"));
    if let Some(kt) = &seg.key_times {
        attr(&mut tag, "keyTimes", &join_nums(kt, ";"));
    }
    if let Some(splines) = &seg.key_splines {
        attr(&mut tag, "calcMode", "spline");
        let mut ks = String::with_capacity(splines.len() * 16);
        for (i, s) in splines.iter().enumerate() {
            if i > 0 {
                ks.push_str("; ");
            }
            s.push_markup(&mut ks);
        }
        attr(&mut tag, "keySplines", &ks);
    }
    if seg.repeat_forever {
        attr(&mut tag, "repeatCount", "indefinite");
    }
    tag.push_str("/>");
    tag
}

fn animate_transform(t: &TranslateLoop) -> String {
    let mut tag = String::from("<animateTransform");
    attr(&mut tag, "attributeName", "transform");
    attr(&mut tag, "type", "translate");
    attr(&mut tag, "from", &format!("{} 0", num(t.from_x)));
    attr(&mut tag, "to", &format!("{} 0", num(t.to_x)));
    attr(&mut tag, "dur", &fmt_secs(t.dur));
    attr(&mut tag, "repeatCount", "indefinite");
    tag.push_str("/>");
    tag
}

fn animate_motion(m: &MotionPath) -> String {
    let mut tag = String::from("<animateMotion");
    attr(&mut tag, "dur", &fmt_secs(m.dur));
    attr(&mut tag, "repeatCount", "indefinite");
    if m.rotate_auto {
        attr(&mut tag, "rotate", "auto");
    }
    let mut d = String::new();
    m.path.push_markup(&mut d);
    attr(&mut tag, "path", &d);
    tag.push_str("/>");
    tag
}

fn begin(b: &Begin) -> String {
    match b {
        Begin::At(d) => fmt_secs(*d),
        Begin::Chained { first, after, gap } => format!("{}; {}.end+{}", fmt_secs(*first), escape(after), fmt_secs(*gap)),
    }
}

/// `value` must already be escaped.
fn attr(tag: &mut String, name: &str, value: &str) {
    tag.push(' ');
    tag.push_str(name);
    tag.push_str("=\"");
    tag.push_str(value);
    tag.push('"');
}

fn num(x: f64) -> String {
    let mut s = String::new();
    push_num(&mut s, x);
    s
}

fn length(l: Length) -> String {
    match l {
        Length::Px(v) => num(v),
        Length::Percent(p) => format!("{}%", num(p)),
    }
}

fn paint(p: &Paint) -> String {
    match p {
        Paint::None => "none".to_string(),
        Paint::Color(c) => escape(c),
        Paint::Url(id) => format!("url(#{})", escape(id)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nodes::Attr;
    use eqwave_core::easing::EASE_IN_OUT;

    #[test]
    fn escapes_markup_characters() {
        assert_eq!(escape(r#"<a & "b">"#), "&lt;a &amp; &quot;b&quot;&gt;");
    }

    #[test]
    fn keyed_animation_markup() {
        let seg = AnimationSegment::new(Attr::Height, 3.25, vec![10.0, 20.5])
            .with_keys(vec![0.0, 1.0], vec![EASE_IN_OUT])
            .forever();
        assert_eq!(
            animate(&seg),
            r#"<animate attributeName="height" dur="3.25s" values="10;20.5" keyTimes="0;1" calcMode="spline" keySplines="0.4 0 0.2 1" repeatCount="indefinite"/>"#
        );
    }

    #[test]
    fn chained_begin_markup() {
        let b = Begin::Chained { first: 1.5, after: "eq4g".into(), gap: 2.0 };
        assert_eq!(begin(&b), "1.5s; eq4g.end+2s");
    }

    #[test]
    fn translate_markup() {
        let t = TranslateLoop { from_x: 0.0, to_x: -40.0, dur: 9.0 };
        assert_eq!(
            animate_transform(&t),
            r#"<animateTransform attributeName="transform" type="translate" from="0 0" to="-40 0" dur="9s" repeatCount="indefinite"/>"#
        );
    }
}
