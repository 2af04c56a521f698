use crate::canvas::surface::Surface;
use crate::utils::color::Color;
use crate::utils::vector::Vec2;

/// Edge treatment of a stroke.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum BrushStyle {
    /// Feathered falloff towards the rim.
    Soft,
    /// Crisp threshold edge.
    Hard,
    /// Crisp edge, applied in dashes along the stroke.
    Textured,
}

impl BrushStyle {
    pub fn label(&self) -> &'static str {
        match self {
            BrushStyle::Soft => "Soft",
            BrushStyle::Hard => "Hard",
            BrushStyle::Textured => "Textured",
        }
    }
}

/// Cached coverage mask so the kernel is not rebuilt for every dab.
struct MaskCache {
    size: f32,
    hardness: f32,
    soft: bool,
    dim: usize,
    data: Vec<f32>,
}

/// Brush parameters shared by the brush and eraser tools, plus the stamping
/// engine itself. Out-of-range values are tolerated on the fields and
/// clamped at use.
pub struct Brush {
    /// Dab diameter in logical pixels, at least 1.
    pub size: f32,
    pub opacity: f32,
    pub flow: f32,
    pub hardness: f32,
    pub style: BrushStyle,
    mask_cache: Option<MaskCache>,
}

impl Brush {
    pub fn new(size: f32, hardness: f32) -> Self {
        Self {
            size,
            opacity: 1.0,
            flow: 1.0,
            hardness,
            style: BrushStyle::Soft,
            mask_cache: None,
        }
    }

    /// Fixed-width crisp pen used for committing shape outlines.
    pub fn shape_pen(size: f32) -> Self {
        Self {
            size,
            opacity: 1.0,
            flow: 1.0,
            hardness: 1.0,
            style: BrushStyle::Hard,
            mask_cache: None,
        }
    }

    pub fn clamped_size(&self) -> f32 {
        self.size.max(1.0)
    }

    /// Distance between interpolated dabs along a stroke.
    pub fn spacing(&self) -> f32 {
        (self.clamped_size() * 0.25).max(0.5)
    }

    /// Dash-on/dash-off period for the textured style.
    pub fn dash_period(&self) -> f32 {
        (self.clamped_size() * 1.5).max(4.0)
    }

    /// Ensure the coverage mask matches the current size/hardness/style.
    fn mask(&mut self) -> &MaskCache {
        let size = self.clamped_size();
        let hardness = self.hardness.clamp(0.0, 1.0);
        let soft = self.style == BrushStyle::Soft;
        let stale = match &self.mask_cache {
            Some(cache) => {
                (cache.size - size).abs() > f32::EPSILON
                    || (cache.hardness - hardness).abs() > f32::EPSILON
                    || cache.soft != soft
            }
            None => true,
        };

        if stale {
            let r = size / 2.0;
            let r_sq = r * r;
            let dim = r.ceil() as usize * 2 + 2; // padding for fractional centers
            let hard_edge = hardness.min(0.999);

            let mut data = Vec::with_capacity(dim * dim);
            for y in 0..dim {
                let dy = y as f32 + 0.5 - r;
                let dy2 = dy * dy;
                for x in 0..dim {
                    let dx = x as f32 + 0.5 - r;
                    let dist2 = dx * dx + dy2;
                    if dist2 > r_sq {
                        data.push(0.0);
                        continue;
                    }
                    if !soft {
                        data.push(1.0);
                        continue;
                    }
                    let t = dist2.sqrt() / r;
                    let coverage = if t < hard_edge {
                        1.0
                    } else {
                        let v = (t - hard_edge) / (1.0 - hard_edge);
                        (1.0 - v.clamp(0.0, 1.0)).powf(1.5)
                    };
                    data.push(coverage);
                }
            }

            self.mask_cache = Some(MaskCache {
                size,
                hardness,
                soft,
                dim,
                data,
            });
        }

        self.mask_cache.as_ref().unwrap()
    }

    /// Stamp one filled dab centered at `center`, painting with `color` or
    /// erasing coverage when `erase` is set.
    pub fn dab(&mut self, surface: &mut Surface, center: Vec2, color: Color, erase: bool) {
        let size = self.clamped_size();
        let strength = color.a * self.opacity.clamp(0.0, 1.0) * self.flow.clamp(0.0, 1.0);
        if strength <= 0.0 {
            return;
        }

        let r = size / 2.0;
        let r_ceil = r.ceil() as i32;
        let min_x = center.x.floor() as i32 - r_ceil;
        let min_y = center.y.floor() as i32 - r_ceil;
        let max_x = center.x.floor() as i32 + r_ceil;
        let max_y = center.y.floor() as i32 + r_ceil;

        if max_x < 0
            || max_y < 0
            || min_x >= surface.width() as i32
            || min_y >= surface.height() as i32
        {
            return;
        }

        let mask = self.mask();
        let dim = mask.dim as i32;
        for gy in min_y..=max_y {
            let my = ((gy as f32 + 0.5 - center.y + r).floor()) as i32;
            if my < 0 || my >= dim {
                continue;
            }
            let mask_row = my as usize * mask.dim;
            for gx in min_x..=max_x {
                let mx = ((gx as f32 + 0.5 - center.x + r).floor()) as i32;
                if mx < 0 || mx >= dim {
                    continue;
                }
                let coverage = mask.data[mask_row + mx as usize];
                if coverage <= 0.0 {
                    continue;
                }
                let src = color.with_alpha(strength * coverage);
                surface.composite_pixel(gx, gy, src, erase);
            }
        }
    }
}
