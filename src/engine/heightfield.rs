// Height samples for the terrain surface.
//
// Samples are normalized to [0, 1]. Decoding image files is the only I/O here
// and stays at the edge (`load`); the mesher only ever sees plain samples.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand::rngs::StdRng;
use std::path::Path;

use super::error::{ConfigError, WorldError};

/// Rectangular grid of normalized height samples, row-major (`z * width + x`).
#[derive(Clone, Debug, PartialEq)]
pub struct HeightField {
    samples: Vec<f32>,
    width: u32,
    height: u32,
}

impl HeightField {
    pub fn from_samples(width: u32, height: u32, samples: Vec<f32>) -> Result<Self, WorldError> {
        if width == 0 || height == 0 {
            return Err(WorldError::EmptyHeightField);
        }
        let expected = width as usize * height as usize;
        if samples.len() != expected {
            return Err(WorldError::SampleCountMismatch { expected, actual: samples.len() });
        }
        Ok(Self { samples, width, height })
    }

    /// 8-bit grayscale pixels, 255 mapping to 1.0.
    pub fn from_luma8(width: u32, height: u32, pixels: &[u8]) -> Result<Self, WorldError> {
        let samples = pixels.iter().map(|&p| p as f32 / 255.0).collect();
        Self::from_samples(width, height, samples)
    }

    /// Decode a heightmap image from disk. Color images are reduced to luma.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let image = image::open(path)
            .map_err(|source| ConfigError::Heightmap { path: path.to_path_buf(), source })?
            .into_luma8();
        let (width, height) = image.dimensions();
        log::info!("loaded heightmap {} ({width}x{height})", path.display());
        Ok(Self::from_luma8(width, height, image.as_raw())?)
    }

    /// Crater-pocked plain: a shallow basin in the middle rising toward the
    /// rim, with a handful of randomly placed impact craters.
    pub fn procedural(resolution: u32, seed: u64) -> Result<Self, WorldError> {
        if resolution == 0 {
            return Err(WorldError::EmptyHeightField);
        }
        let mut rng = StdRng::seed_from_u64(seed);
        let craters: Vec<(Vec2, f32)> = (0..12)
            .map(|_| {
                let center = Vec2::new(rng.gen_range(-1.0..1.0), rng.gen_range(-1.0..1.0));
                (center, rng.gen_range(0.08..0.25))
            })
            .collect();

        let n = resolution as f32;
        let mut samples = Vec::with_capacity(resolution as usize * resolution as usize);
        for z in 0..resolution {
            for x in 0..resolution {
                // [-1, 1] across the field
                let p = Vec2::new(x as f32 / n * 2.0 - 1.0, z as f32 / n * 2.0 - 1.0);
                let basin = (p.length() - 0.55).max(0.0) * 0.9;
                let mut h = 0.1 + basin;
                for &(center, radius) in &craters {
                    let d = p.distance(center) / radius;
                    if d < 1.0 {
                        // bowl with a raised lip
                        h -= (1.0 - d * d) * 0.08;
                    } else if d < 1.4 {
                        h += (1.4 - d) * 0.1;
                    }
                }
                samples.push(h.clamp(0.0, 1.0));
            }
        }
        Self::from_samples(resolution, resolution, samples)
    }

    pub fn width(&self) -> u32 { self.width }
    pub fn height(&self) -> u32 { self.height }

    /// Sample at `(x, z)`, clamped to the field.
    #[inline]
    pub fn sample(&self, x: u32, z: u32) -> f32 {
        let x = x.min(self.width - 1);
        let z = z.min(self.height - 1);
        self.samples[z as usize * self.width as usize + x as usize]
    }
}
