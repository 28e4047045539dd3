/// ASCII rasterizer that consumes a draw list
///
/// Triangles arrive already sorted farthest first, so they are painted in
/// list order with no depth buffer.
use crossterm::{
    style::{Color, Print, ResetColor, SetForegroundColor},
    QueueableCommand,
};
use softpipe_core::{DrawList, DrawVertex, TextureSize};
use std::io::Write;

/// Character luminosity ramp (darkest to lightest)
const LUMINOSITY_RAMP: &[char] = &[' ', '.', ':', '-', '=', '+', '*', '#', '%', '@'];

/// Procedural two-tone checkerboard standing in for a bound texture
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CheckerTexture {
    pub size: TextureSize,
    /// Edge length of one checker square in texels
    pub cell: u32,
    /// Brightness of the dark squares
    pub dark: f32,
}

impl CheckerTexture {
    pub fn new(size: TextureSize, cell: u32) -> Self {
        Self {
            size,
            cell: cell.max(1),
            dark: 0.55,
        }
    }

    /// Brightness at texel `(x, y)`. Texel (0, 0) is a light square, so
    /// untextured draws sampling the origin stay at full brightness.
    pub fn sample(&self, x: f32, y: f32) -> f32 {
        let cx = (x.max(0.0) as u32 / self.cell) % 2;
        let cy = (y.max(0.0) as u32 / self.cell) % 2;
        if cx == cy {
            1.0
        } else {
            self.dark
        }
    }
}

impl Default for CheckerTexture {
    fn default() -> Self {
        Self::new(TextureSize::new(64, 64), 8)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Cell {
    character: char,
    color: Color,
}

impl Cell {
    const EMPTY: Cell = Cell {
        character: ' ',
        color: Color::Reset,
    };
}

/// Character grid the size of the terminal
pub struct AsciiRenderer {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl AsciiRenderer {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![Cell::EMPTY; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn resize(&mut self, width: usize, height: usize) {
        self.width = width;
        self.height = height;
        self.cells = vec![Cell::EMPTY; width * height];
    }

    pub fn clear(&mut self) {
        self.cells.fill(Cell::EMPTY);
    }

    /// Paint every triangle of the list in order
    pub fn fill(&mut self, list: &DrawList, texture: &CheckerTexture) {
        for triangle in list.indices.chunks_exact(3) {
            let corners = [0usize, 1, 2].map(|i| list.vertices.get(triangle[i] as usize));
            if let [Some(a), Some(b), Some(c)] = corners {
                self.fill_triangle([a, b, c], texture);
            }
        }
    }

    /// Character at cell `(x, y)`, for inspection
    pub fn char_at(&self, x: usize, y: usize) -> Option<char> {
        if x >= self.width {
            return None;
        }
        self.cells.get(y * self.width + x).map(|cell| cell.character)
    }

    fn fill_triangle(&mut self, v: [&DrawVertex; 3], texture: &CheckerTexture) {
        if self.width == 0 || self.height == 0 {
            return;
        }

        // Bounding box
        let min_x = v[0].dst_x.min(v[1].dst_x).min(v[2].dst_x).floor() as i32;
        let max_x = v[0].dst_x.max(v[1].dst_x).max(v[2].dst_x).ceil() as i32;
        let min_y = v[0].dst_y.min(v[1].dst_y).min(v[2].dst_y).floor() as i32;
        let max_y = v[0].dst_y.max(v[1].dst_y).max(v[2].dst_y).ceil() as i32;

        // Clip to screen bounds
        let min_x = min_x.max(0);
        let max_x = max_x.min(self.width as i32 - 1);
        let min_y = min_y.max(0);
        let max_y = max_y.min(self.height as i32 - 1);

        for y in min_y..=max_y {
            for x in min_x..=max_x {
                let px = x as f32 + 0.5;
                let py = y as f32 + 0.5;

                let Some((w0, w1, w2)) = barycentric(
                    (v[0].dst_x, v[0].dst_y),
                    (v[1].dst_x, v[1].dst_y),
                    (v[2].dst_x, v[2].dst_y),
                    (px, py),
                ) else {
                    return;
                };
                if w0 < 0.0 || w1 < 0.0 || w2 < 0.0 {
                    continue;
                }

                let mix = |f: fn(&DrawVertex) -> f32| w0 * f(v[0]) + w1 * f(v[1]) + w2 * f(v[2]);
                let texel = texture.sample(mix(|v| v.src_x), mix(|v| v.src_y));
                let rgb = [mix(|v| v.color_r), mix(|v| v.color_g), mix(|v| v.color_b)]
                    .map(|channel| (channel * texel).clamp(0.0, 1.0));
                let alpha = mix(|v| v.color_a).clamp(0.0, 1.0);

                let luminance = (0.2126 * rgb[0] + 0.7152 * rgb[1] + 0.0722 * rgb[2]) * alpha;
                let idx = y as usize * self.width + x as usize;
                self.cells[idx] = Cell {
                    character: ramp(luminance),
                    color: Color::Rgb {
                        r: (rgb[0] * 255.0) as u8,
                        g: (rgb[1] * 255.0) as u8,
                        b: (rgb[2] * 255.0) as u8,
                    },
                };
            }
        }
    }

    pub fn draw<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        let mut current = None;
        for row in self.cells.chunks(self.width.max(1)) {
            for cell in row {
                if current != Some(cell.color) {
                    writer.queue(SetForegroundColor(cell.color))?;
                    current = Some(cell.color);
                }
                writer.queue(Print(cell.character))?;
            }
            writer.queue(Print("\r\n"))?;
        }
        writer.queue(ResetColor)?;
        Ok(())
    }
}

fn ramp(luminance: f32) -> char {
    // Anything painted gets at least the first visible character
    let last = LUMINOSITY_RAMP.len() - 1;
    let index = 1 + (luminance.clamp(0.0, 1.0) * (last - 1) as f32).round() as usize;
    LUMINOSITY_RAMP[index.min(last)]
}

/// Calculate barycentric coordinates for a point in a triangle
fn barycentric(
    v0: (f32, f32),
    v1: (f32, f32),
    v2: (f32, f32),
    p: (f32, f32),
) -> Option<(f32, f32, f32)> {
    let denom = (v1.1 - v2.1) * (v0.0 - v2.0) + (v2.0 - v1.0) * (v0.1 - v2.1);

    if denom.abs() < 1e-6 {
        return None;
    }

    let w0 = ((v1.1 - v2.1) * (p.0 - v2.0) + (v2.0 - v1.0) * (p.1 - v2.1)) / denom;
    let w1 = ((v2.1 - v0.1) * (p.0 - v2.0) + (v0.0 - v2.0) * (p.1 - v2.1)) / denom;
    let w2 = 1.0 - w0 - w1;

    Some((w0, w1, w2))
}
