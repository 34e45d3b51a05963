use std::collections::HashMap;
use maplit::hashmap;
use crate::rendering::blittable::Rgba;
use crate::rendering::FrameBuffer;

pub const GLYPH_WIDTH: usize = 3;
pub const GLYPH_HEIGHT: usize = 5;
pub const GLYPH_SPACING: usize = 1;

/// Five rows, the three low bits of each row are pixels, most significant bit leftmost.
pub type Glyph = [u8; GLYPH_HEIGHT];

const UNKNOWN_GLYPH: Glyph = [0b110, 0b001, 0b010, 0b000, 0b010];

/// Tiny fixed-width font for panel labels and readouts. Lowercase letters render as uppercase.
pub struct BitmapFont {
    scale: usize,
    glyphs: HashMap<char, Glyph>
}

impl BitmapFont {
    pub fn new(scale: usize) -> Self {
        Self {
            scale: scale.max(1),
            glyphs: default_glyphs()
        }
    }

    pub fn line_height(&self) -> usize {
        GLYPH_HEIGHT * self.scale
    }

    pub fn has_glyph(&self, chr: char) -> bool {
        self.glyphs.contains_key(&chr.to_ascii_uppercase())
    }

    pub fn measure(&self, text: &str) -> usize {
        let count = text.chars().count();
        if count == 0 {
            return 0;
        }
        (count * (GLYPH_WIDTH + GLYPH_SPACING) - GLYPH_SPACING) * self.scale
    }

    pub fn draw_text(&self, frame: &mut FrameBuffer, x: i32, y: i32, text: &str, color: Rgba) {
        let step = ((GLYPH_WIDTH + GLYPH_SPACING) * self.scale) as i32;
        for (idx, chr) in text.chars().enumerate() {
            let glyph = self.glyphs
                .get(&chr.to_ascii_uppercase())
                .copied()
                .unwrap_or(UNKNOWN_GLYPH);
            self.draw_glyph(frame, x + idx as i32 * step, y, glyph, color);
        }
    }

    fn draw_glyph(&self, frame: &mut FrameBuffer, x: i32, y: i32, glyph: Glyph, color: Rgba) {
        let scale = self.scale as i32;
        for (row, bits) in glyph.iter().enumerate() {
            for column in 0..GLYPH_WIDTH {
                if bits & (0b100 >> column) == 0 {
                    continue;
                }
                for sy in 0..scale {
                    for sx in 0..scale {
                        frame.put_pixel(
                            x + column as i32 * scale + sx,
                            y + row as i32 * scale + sy,
                            color
                        );
                    }
                }
            }
        }
    }
}

fn default_glyphs() -> HashMap<char, Glyph> {
    hashmap! {
        ' ' => [0b000, 0b000, 0b000, 0b000, 0b000],
        'A' => [0b010, 0b101, 0b111, 0b101, 0b101],
        'B' => [0b110, 0b101, 0b110, 0b101, 0b110],
        'C' => [0b011, 0b100, 0b100, 0b100, 0b011],
        'D' => [0b110, 0b101, 0b101, 0b101, 0b110],
        'E' => [0b111, 0b100, 0b110, 0b100, 0b111],
        'F' => [0b111, 0b100, 0b110, 0b100, 0b100],
        'G' => [0b011, 0b100, 0b101, 0b101, 0b011],
        'H' => [0b101, 0b101, 0b111, 0b101, 0b101],
        'I' => [0b111, 0b010, 0b010, 0b010, 0b111],
        'J' => [0b001, 0b001, 0b001, 0b101, 0b010],
        'K' => [0b101, 0b101, 0b110, 0b101, 0b101],
        'L' => [0b100, 0b100, 0b100, 0b100, 0b111],
        'M' => [0b101, 0b111, 0b111, 0b101, 0b101],
        'N' => [0b110, 0b101, 0b101, 0b101, 0b101],
        'O' => [0b010, 0b101, 0b101, 0b101, 0b010],
        'P' => [0b110, 0b101, 0b110, 0b100, 0b100],
        'Q' => [0b010, 0b101, 0b101, 0b110, 0b011],
        'R' => [0b110, 0b101, 0b110, 0b101, 0b101],
        'S' => [0b011, 0b100, 0b010, 0b001, 0b110],
        'T' => [0b111, 0b010, 0b010, 0b010, 0b010],
        'U' => [0b101, 0b101, 0b101, 0b101, 0b111],
        'V' => [0b101, 0b101, 0b101, 0b101, 0b010],
        'W' => [0b101, 0b101, 0b111, 0b111, 0b101],
        'X' => [0b101, 0b101, 0b010, 0b101, 0b101],
        'Y' => [0b101, 0b101, 0b010, 0b010, 0b010],
        'Z' => [0b111, 0b001, 0b010, 0b100, 0b111],
        '0' => [0b111, 0b101, 0b101, 0b101, 0b111],
        '1' => [0b010, 0b110, 0b010, 0b010, 0b111],
        '2' => [0b110, 0b001, 0b010, 0b100, 0b111],
        '3' => [0b110, 0b001, 0b010, 0b001, 0b110],
        '4' => [0b101, 0b101, 0b111, 0b001, 0b001],
        '5' => [0b111, 0b100, 0b110, 0b001, 0b110],
        '6' => [0b011, 0b100, 0b111, 0b101, 0b111],
        '7' => [0b111, 0b001, 0b010, 0b010, 0b010],
        '8' => [0b111, 0b101, 0b111, 0b101, 0b111],
        '9' => [0b111, 0b101, 0b111, 0b001, 0b110],
        '.' => [0b000, 0b000, 0b000, 0b000, 0b010],
        ',' => [0b000, 0b000, 0b000, 0b010, 0b100],
        '-' => [0b000, 0b000, 0b111, 0b000, 0b000],
        '+' => [0b000, 0b010, 0b111, 0b010, 0b000],
        '_' => [0b000, 0b000, 0b000, 0b000, 0b111],
        ':' => [0b000, 0b010, 0b000, 0b010, 0b000],
        '%' => [0b101, 0b001, 0b010, 0b100, 0b101],
        '!' => [0b010, 0b010, 0b010, 0b000, 0b010],
        '?' => UNKNOWN_GLYPH,
        '(' => [0b001, 0b010, 0b010, 0b010, 0b001],
        ')' => [0b100, 0b010, 0b010, 0b010, 0b100],
        '\'' => [0b010, 0b010, 0b000, 0b000, 0b000],
        '\u{2191}' => [0b010, 0b111, 0b010, 0b010, 0b010]
    }
}
