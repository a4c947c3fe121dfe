//! Layout of colored segments and simple text renderers.

use std::fmt::Write as _;

use serde::Serialize;

use crate::color::Rgba;
use crate::colorize::ColoredSegment;

/// Glyph measurements supplied by the drawing collaborator.
pub trait GlyphMetrics {
    fn advance(&self, glyph: char) -> f32;
    fn line_height(&self) -> f32;
}

/// Monospaced metrics: every glyph has the same advance.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FixedMetrics {
    pub glyph_width: f32,
    pub line_height: f32,
}

impl Default for FixedMetrics {
    fn default() -> Self {
        Self {
            glyph_width: 8.0,
            line_height: 16.0,
        }
    }
}

impl GlyphMetrics for FixedMetrics {
    fn advance(&self, _glyph: char) -> f32 {
        self.glyph_width
    }

    fn line_height(&self) -> f32 {
        self.line_height
    }
}

/// A run of same-colored glyphs placed on one visual line.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PlacedRun {
    pub text: String,
    pub color: Option<Rgba>,
    pub x: f32,
    pub y: f32,
    pub line: usize,
}

/// Pen position after the last glyph.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct LayoutCursor {
    pub x: f32,
    pub y: f32,
    pub line: usize,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct TextLayout {
    pub runs: Vec<PlacedRun>,
    pub cursor: LayoutCursor,
}

impl TextLayout {
    pub fn line_count(&self) -> usize {
        self.cursor.line + 1
    }
}

struct LayoutPen<'m, M> {
    metrics: &'m M,
    max_width: Option<f32>,
    runs: Vec<PlacedRun>,
    current: Option<PlacedRun>,
    x: f32,
    line: usize,
}

impl<'m, M: GlyphMetrics> LayoutPen<'m, M> {
    fn flush(&mut self) {
        if let Some(run) = self.current.take() {
            if !run.text.is_empty() {
                self.runs.push(run);
            }
        }
    }

    fn break_line(&mut self) {
        self.flush();
        self.line += 1;
        self.x = 0.0;
    }

    fn place(&mut self, glyph: char, color: Option<Rgba>) {
        if glyph == '\n' {
            self.break_line();
            return;
        }
        let advance = self.metrics.advance(glyph);
        if let Some(max_width) = self.max_width {
            if self.x > 0.0 && self.x + advance > max_width {
                self.break_line();
            }
        }
        let (x, line, line_height) = (self.x, self.line, self.metrics.line_height());
        let run = self.current.get_or_insert_with(|| PlacedRun {
            text: String::new(),
            color,
            x,
            y: line as f32 * line_height,
            line,
        });
        run.text.push(glyph);
        self.x += advance;
    }
}

/// Places segments left to right, breaking at `\n` and, when `max_width` is
/// set, before any glyph that would overflow a non-empty line.
pub fn layout_segments<M: GlyphMetrics>(
    segments: &[ColoredSegment<'_>],
    metrics: &M,
    max_width: Option<f32>,
) -> TextLayout {
    let mut pen = LayoutPen {
        metrics,
        max_width,
        runs: Vec::new(),
        current: None,
        x: 0.0,
        line: 0,
    };
    for segment in segments {
        for glyph in segment.text.chars() {
            pen.place(glyph, segment.color);
        }
        pen.flush();
    }
    pen.flush();
    TextLayout {
        cursor: LayoutCursor {
            x: pen.x,
            y: pen.line as f32 * metrics.line_height(),
            line: pen.line,
        },
        runs: pen.runs,
    }
}

/// Renderer interface for laid-out dialogue text.
pub trait RenderBackend {
    fn render(&self, layout: &TextLayout) -> RenderOutput;
}

/// Rendered text output.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderOutput {
    pub text: String,
}

fn render_lines(layout: &TextLayout, mut paint: impl FnMut(&mut String, &PlacedRun)) -> String {
    let mut out = String::new();
    let mut line = 0usize;
    for run in &layout.runs {
        while line < run.line {
            out.push('\n');
            line += 1;
        }
        paint(&mut out, run);
    }
    while line < layout.cursor.line {
        out.push('\n');
        line += 1;
    }
    out
}

/// Writes 24-bit ANSI escapes around every run.
#[derive(Clone, Debug)]
pub struct AnsiRenderer {
    pub default_color: Rgba,
}

impl Default for AnsiRenderer {
    fn default() -> Self {
        Self {
            default_color: Rgba::WHITE,
        }
    }
}

impl RenderBackend for AnsiRenderer {
    fn render(&self, layout: &TextLayout) -> RenderOutput {
        let text = render_lines(layout, |out, run| {
            let color = run.color.unwrap_or(self.default_color);
            let _ = write!(
                out,
                "\x1b[38;2;{};{};{}m{}\x1b[0m",
                color.r, color.g, color.b, run.text
            );
        });
        RenderOutput { text }
    }
}

/// Uncolored output with highlighted runs wrapped in brackets.
#[derive(Clone, Debug, Default)]
pub struct PlainRenderer;

impl RenderBackend for PlainRenderer {
    fn render(&self, layout: &TextLayout) -> RenderOutput {
        let text = render_lines(layout, |out, run| {
            if run.color.is_some() {
                out.push('[');
                out.push_str(&run.text);
                out.push(']');
            } else {
                out.push_str(&run.text);
            }
        });
        RenderOutput { text }
    }
}
