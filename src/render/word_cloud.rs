use std::{
    collections::HashMap,
    fmt::Write as _,
    sync::Arc,
    time::Instant,
};

use base64::Engine;
use regex::Regex;
use resvg::{
    tiny_skia,
    usvg,
};
use serde::Serialize;

use super::xml_escape;
use crate::core::{
    DashboardError,
    WordCloudSettings,
};

/// Same token shape a typical word cloud uses: two or more word characters, apostrophes allowed.
const TOKEN_PATTERN: &str = r"\w[\w']+";
const FONT_FAMILY: &str = "DejaVu Sans, Arial, Helvetica, sans-serif";
const GLYPH_WIDTH_RATIO: f32 = 0.6;
const SPIRAL_STEP: f32 = 0.1;
const MAX_SPIRAL_STEPS: usize = 4000;
const FONT_SHRINK_STEP: f32 = 2.0;
const MARGIN: f32 = 2.0;

// viridis, darkest first
const PALETTE: [&str; 6] = ["#440154", "#414487", "#2a788e", "#22a884", "#7ad151", "#fde725"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WordFrequency {
    pub word: String,
    pub count: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlacedWord {
    pub word: String,
    pub count: u32,
    pub font_size: f32,
    pub x: f32, // Box centre
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl PlacedWord {
    fn overlaps(&self, other: &PlacedWord) -> bool {
        (self.x - other.x).abs() * 2.0 < self.width + other.width + MARGIN
            && (self.y - other.y).abs() * 2.0 < self.height + other.height + MARGIN
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum WordImage {
    /// No tokens for this class; nothing was rendered.
    Empty,
    Rendered { src: String, words: usize },
    Failed { error: String },
}

impl WordImage {
    pub fn is_empty(&self) -> bool {
        matches!(self, WordImage::Empty)
    }
}

pub struct WordCloudRenderer {
    settings: WordCloudSettings,
    token_pattern: Regex,
    fontdb: Arc<usvg::fontdb::Database>,
}

impl WordCloudRenderer {
    pub fn new(settings: WordCloudSettings) -> Result<Self, DashboardError> {
        let start = Instant::now();
        let mut fontdb = usvg::fontdb::Database::new();
        fontdb.load_system_fonts();
        let face_count = fontdb.faces().count();
        log::info!(
            "[Render] Loaded {} font faces ({:.1}s)",
            face_count,
            start.elapsed().as_secs_f32()
        );
        if face_count == 0 {
            log::warn!("[Render] No system fonts found; word images will be blank");
        }

        Ok(Self { settings, token_pattern: Regex::new(TOKEN_PATTERN)?, fontdb: Arc::new(fontdb) })
    }

    /// Case-folded token counts, most frequent first (ties alphabetical), capped at `max_words`.
    pub fn word_frequencies(&self, text: &str) -> Vec<WordFrequency> {
        let mut counts: HashMap<String, u32> = HashMap::new();
        for token in self.token_pattern.find_iter(text) {
            let mut word = token.as_str().to_lowercase();
            if word.ends_with("'s") {
                word.truncate(word.len() - 2);
            }
            if word.chars().count() < 2 {
                continue;
            }
            *counts.entry(word).or_insert(0) += 1;
        }

        let mut frequencies: Vec<WordFrequency> =
            counts.into_iter().map(|(word, count)| WordFrequency { word, count }).collect();
        frequencies.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.word.cmp(&b.word)));
        frequencies.truncate(self.settings.max_words);
        frequencies
    }

    fn font_size_for(&self, count: u32, max_count: u32) -> f32 {
        let min = self.settings.min_font_size;
        let max = self.settings.max_font_size;
        min + (max - min) * (count as f32 / max_count.max(1) as f32)
    }

    /// Places words on an Archimedean spiral from the centre, shrinking a word that does not fit
    /// and dropping it once it would go below the minimum font size.
    pub fn layout(&self, frequencies: &[WordFrequency]) -> Vec<PlacedWord> {
        let width = self.settings.width as f32;
        let height = self.settings.height as f32;
        let aspect = width / height;
        let max_count = frequencies.first().map(|f| f.count).unwrap_or(1);

        let mut placed: Vec<PlacedWord> = Vec::with_capacity(frequencies.len());

        for frequency in frequencies {
            let mut font_size = self.font_size_for(frequency.count, max_count);
            let chars = frequency.word.chars().count() as f32;

            while font_size >= self.settings.min_font_size {
                let candidate_width = chars * font_size * GLYPH_WIDTH_RATIO;
                let candidate_height = font_size;

                if candidate_width <= width && candidate_height <= height {
                    let found = (0..MAX_SPIRAL_STEPS).find_map(|step| {
                        let t = step as f32 * SPIRAL_STEP;
                        let candidate = PlacedWord {
                            word: frequency.word.clone(),
                            count: frequency.count,
                            font_size,
                            x: width / 2.0 + t * t.cos() * aspect,
                            y: height / 2.0 + t * t.sin(),
                            width: candidate_width,
                            height: candidate_height,
                        };
                        let inside = candidate.x - candidate.width / 2.0 >= 0.0
                            && candidate.x + candidate.width / 2.0 <= width
                            && candidate.y - candidate.height / 2.0 >= 0.0
                            && candidate.y + candidate.height / 2.0 <= height;
                        (inside && !placed.iter().any(|p| p.overlaps(&candidate)))
                            .then_some(candidate)
                    });

                    if let Some(word) = found {
                        placed.push(word);
                        break;
                    }
                }

                font_size -= FONT_SHRINK_STEP;
            }
        }

        placed
    }

    pub fn to_svg(&self, words: &[PlacedWord]) -> String {
        let width = self.settings.width;
        let height = self.settings.height;

        let mut svg = String::new();
        let _ = writeln!(
            svg,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{width}" height="{height}" viewBox="0 0 {width} {height}">"#
        );
        let _ = writeln!(
            svg,
            r#"  <rect width="100%" height="100%" fill="{}"/>"#,
            xml_escape(&self.settings.background)
        );
        for (rank, word) in words.iter().enumerate() {
            let color = PALETTE[rank * PALETTE.len() / words.len().max(1)];
            // Approximate the baseline so the glyphs sit inside the reserved box.
            let baseline = word.y + word.font_size * 0.35;
            let _ = writeln!(
                svg,
                r#"  <text x="{:.1}" y="{:.1}" font-family="{}" font-size="{:.1}" text-anchor="middle" fill="{}">{}</text>"#,
                word.x,
                baseline,
                FONT_FAMILY,
                word.font_size,
                color,
                xml_escape(&word.word)
            );
        }
        let _ = writeln!(svg, "</svg>");
        svg
    }

    fn rasterize(&self, svg: &str) -> Result<Vec<u8>, DashboardError> {
        let mut options = usvg::Options::default();
        options.fontdb = self.fontdb.clone();

        let tree = usvg::Tree::from_data(svg.as_bytes(), &options)
            .map_err(|e| DashboardError::Render(format!("SVG parse failed: {e:?}")))?;

        let mut pixmap = tiny_skia::Pixmap::new(self.settings.width, self.settings.height)
            .ok_or_else(|| DashboardError::Render("Pixmap allocation failed".to_string()))?;
        resvg::render(&tree, tiny_skia::Transform::default(), &mut pixmap.as_mut());

        let mut out = Vec::new();
        {
            let mut encoder = png::Encoder::new(&mut out, self.settings.width, self.settings.height);
            encoder.set_color(png::ColorType::Rgba);
            encoder.set_depth(png::BitDepth::Eight);
            let mut writer = encoder
                .write_header()
                .map_err(|e| DashboardError::Render(format!("PNG header failed: {e}")))?;
            writer
                .write_image_data(pixmap.data())
                .map_err(|e| DashboardError::Render(format!("PNG encode failed: {e}")))?;
            writer
                .finish()
                .map_err(|e| DashboardError::Render(format!("PNG finish failed: {e}")))?;
        }

        Ok(out)
    }

    /// Renders a PNG data URI for the space-joined `text`. Empty input never reaches the
    /// frequency count.
    pub fn render(&self, text: &str) -> WordImage {
        if text.trim().is_empty() {
            return WordImage::Empty;
        }

        let frequencies = self.word_frequencies(text);
        if frequencies.is_empty() {
            return WordImage::Empty;
        }

        let placed = self.layout(&frequencies);
        let svg = self.to_svg(&placed);

        match self.rasterize(&svg) {
            Ok(png) => WordImage::Rendered {
                src: format!(
                    "data:image/png;base64,{}",
                    base64::engine::general_purpose::STANDARD.encode(png)
                ),
                words: placed.len(),
            },
            Err(e) => {
                log::error!("[Render] Word image failed: {}", e);
                WordImage::Failed { error: e.to_string() }
            }
        }
    }
}
