//! ANSI escape code conversion
//!
//! Turns game output carrying SGR color/style sequences into HTML-styled
//! markup for the log. Other control sequences are dropped. The converter
//! keeps its style state between calls so a color opened on one line
//! carries into the next, the way a terminal would show it.

use once_cell::sync::Lazy;
use regex::Regex;

static ESCAPE_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\x1b\[[0-9;?]*[A-Za-z]").expect("escape pattern is valid"));

/// Converts raw terminal text into log markup
pub trait MarkupConverter: Send {
    fn convert(&mut self, text: &str) -> String;
}

/// SGR-to-HTML converter
#[derive(Debug, Clone, Default)]
pub struct AnsiHtmlConverter {
    state: StyleState,
}

#[derive(Debug, Clone, Default, PartialEq)]
struct StyleState {
    fg_color: Option<Color>,
    bg_color: Option<Color>,
    attributes: Vec<TextAttribute>,
}

impl StyleState {
    fn is_plain(&self) -> bool {
        self.fg_color.is_none() && self.bg_color.is_none() && self.attributes.is_empty()
    }

    fn css(&self) -> String {
        let mut rules = Vec::new();
        if let Some(fg) = &self.fg_color {
            rules.push(format!("color:rgb({},{},{})", fg.r, fg.g, fg.b));
        }
        if let Some(bg) = &self.bg_color {
            rules.push(format!("background-color:rgb({},{},{})", bg.r, bg.g, bg.b));
        }
        for attr in &self.attributes {
            rules.push(attr.css().to_string());
        }
        rules.join(";")
    }
}

impl AnsiHtmlConverter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop any style carried over from earlier input
    pub fn reset(&mut self) {
        self.state = StyleState::default();
    }

    fn push_text(&self, out: &mut String, text: &str) {
        if text.is_empty() {
            return;
        }
        let escaped = escape_html(text);
        if self.state.is_plain() {
            out.push_str(&escaped);
        } else {
            out.push_str("<span style=\"");
            out.push_str(&self.state.css());
            out.push_str("\">");
            out.push_str(&escaped);
            out.push_str("</span>");
        }
    }

    /// Apply one escape sequence; anything but SGR is ignored
    fn process_escape_sequence(&mut self, seq: &str) {
        if !seq.ends_with('m') {
            return;
        }
        let body = &seq[2..seq.len() - 1];
        if body.is_empty() {
            self.reset();
            return;
        }

        let codes: Vec<u32> = body
            .split(';')
            .map(|s| if s.is_empty() { 0 } else { s.parse().unwrap_or(u32::MAX) })
            .collect();

        let mut i = 0;
        while i < codes.len() {
            match codes[i] {
                0 => self.reset(),
                1 => self.add_attribute(TextAttribute::Bold),
                2 => self.add_attribute(TextAttribute::Dim),
                3 => self.add_attribute(TextAttribute::Italic),
                4 => self.add_attribute(TextAttribute::Underline),
                9 => self.add_attribute(TextAttribute::Strikethrough),
                22 => {
                    self.remove_attribute(&TextAttribute::Bold);
                    self.remove_attribute(&TextAttribute::Dim);
                }
                23 => self.remove_attribute(&TextAttribute::Italic),
                24 => self.remove_attribute(&TextAttribute::Underline),
                29 => self.remove_attribute(&TextAttribute::Strikethrough),
                code @ 30..=37 => self.state.fg_color = Some(ansi_color_to_rgb(code - 30)),
                38 => {
                    let (color, used) = extended_color(&codes[i + 1..]);
                    if color.is_some() {
                        self.state.fg_color = color;
                    }
                    i += used;
                }
                39 => self.state.fg_color = None,
                code @ 40..=47 => self.state.bg_color = Some(ansi_color_to_rgb(code - 40)),
                48 => {
                    let (color, used) = extended_color(&codes[i + 1..]);
                    if color.is_some() {
                        self.state.bg_color = color;
                    }
                    i += used;
                }
                49 => self.state.bg_color = None,
                code @ 90..=97 => {
                    self.state.fg_color = Some(ansi_bright_color_to_rgb(code - 90))
                }
                code @ 100..=107 => {
                    self.state.bg_color = Some(ansi_bright_color_to_rgb(code - 100))
                }
                _ => {
                    // Ignore unknown codes
                }
            }
            i += 1;
        }
    }

    fn add_attribute(&mut self, attr: TextAttribute) {
        if !self.state.attributes.contains(&attr) {
            self.state.attributes.push(attr);
        }
    }

    fn remove_attribute(&mut self, attr: &TextAttribute) {
        self.state.attributes.retain(|a| a != attr);
    }
}

impl MarkupConverter for AnsiHtmlConverter {
    fn convert(&mut self, text: &str) -> String {
        let mut out = String::with_capacity(text.len());
        let mut last_end = 0;

        for mat in ESCAPE_REGEX.find_iter(text) {
            self.push_text(&mut out, &text[last_end..mat.start()]);
            self.process_escape_sequence(mat.as_str());
            last_end = mat.end();
        }
        self.push_text(&mut out, &text[last_end..]);

        out
    }
}

/// Escapes text for placement inside an element
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            // Stray control bytes have no visual form
            c if c.is_control() && c != '\t' => {}
            c => out.push(c),
        }
    }
    out
}

/// Decodes `5;n` or `2;r;g;b` after a 38/48; returns the color and codes consumed
fn extended_color(rest: &[u32]) -> (Option<Color>, usize) {
    match rest {
        [5, n, ..] => (Some(xterm_256_to_rgb(*n)), 2),
        [2, r, g, b, ..] => (
            Some(Color {
                r: (*r).min(255) as u8,
                g: (*g).min(255) as u8,
                b: (*b).min(255) as u8,
            }),
            4,
        ),
        _ => (None, 0),
    }
}

/// Convert ANSI color code to RGB
fn ansi_color_to_rgb(code: u32) -> Color {
    match code {
        0 => Color::new(0, 0, 0),
        1 => Color::new(187, 0, 0),
        2 => Color::new(0, 187, 0),
        3 => Color::new(187, 187, 0),
        4 => Color::new(0, 0, 187),
        5 => Color::new(187, 0, 187),
        6 => Color::new(0, 187, 187),
        7 => Color::new(255, 255, 255),
        _ => Color::new(255, 255, 255),
    }
}

/// Convert ANSI bright color code to RGB
fn ansi_bright_color_to_rgb(code: u32) -> Color {
    match code {
        0 => Color::new(85, 85, 85),
        1 => Color::new(255, 85, 85),
        2 => Color::new(0, 255, 0),
        3 => Color::new(255, 255, 85),
        4 => Color::new(85, 85, 255),
        5 => Color::new(255, 85, 255),
        6 => Color::new(85, 255, 255),
        _ => Color::new(255, 255, 255),
    }
}

fn xterm_256_to_rgb(n: u32) -> Color {
    match n {
        0..=7 => ansi_color_to_rgb(n),
        8..=15 => ansi_bright_color_to_rgb(n - 8),
        16..=231 => {
            let idx = n - 16;
            let level = |v: u32| if v == 0 { 0 } else { (v * 40 + 55) as u8 };
            Color::new(level(idx / 36), level((idx / 6) % 6), level(idx % 6))
        }
        232..=255 => {
            let grey = ((n - 232) * 10 + 8) as u8;
            Color::new(grey, grey, grey)
        }
        _ => Color::new(255, 255, 255),
    }
}

/// ANSI color representation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// Text formatting attributes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAttribute {
    Bold,
    Italic,
    Underline,
    Strikethrough,
    Dim,
}

impl TextAttribute {
    fn css(self) -> &'static str {
        match self {
            TextAttribute::Bold => "font-weight:bold",
            TextAttribute::Italic => "font-style:italic",
            TextAttribute::Underline => "text-decoration:underline",
            TextAttribute::Strikethrough => "text-decoration:line-through",
            TextAttribute::Dim => "opacity:0.7",
        }
    }
}
