use crate::{AtariAction, Layer, LayerStep};
use anyhow::Result;
use image::{
    imageops::{resize, FilterType},
    ImageBuffer, Luma,
};
use ndarray::{Array2, Array3, ArrayView3, Axis};
use rem_core::error::RemError;
use serde::{Deserialize, Serialize};

/// Interpolation used to resize frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResizeFilter {
    /// Pixel area relation. Each output pixel is the mean of the input area it covers.
    Area,

    /// Linear filter of the `image` crate.
    Triangle,
}

impl Default for ResizeFilter {
    fn default() -> Self {
        Self::Area
    }
}

/// Converts frames to grayscale and resizes them.
///
/// Input frames are `(H, W, 3)`, output frames `(height, width, C)` with `C = 1`
/// for grayscale and `C = 3` otherwise.
pub struct WarpFrame {
    inner: Box<dyn Layer>,
    height: usize,
    width: usize,
    grayscale: bool,
    filter: ResizeFilter,
}

impl WarpFrame {
    /// Wraps a layer.
    pub fn new(
        inner: Box<dyn Layer>,
        height: usize,
        width: usize,
        grayscale: bool,
        filter: ResizeFilter,
    ) -> Result<Self> {
        if height == 0 || width == 0 {
            return Err(RemError::InvalidConfig(format!(
                "frame size must be positive, got {}x{}",
                height, width
            ))
            .into());
        }
        Ok(Self {
            inner,
            height,
            width,
            grayscale,
            filter,
        })
    }

    fn transform(&self, frame: Array3<u8>) -> Result<Array3<u8>> {
        let frame = match self.grayscale {
            true => to_grayscale(&frame)?,
            false => frame,
        };
        match self.filter {
            ResizeFilter::Area => Ok(area_resize(frame.view(), self.height, self.width)),
            ResizeFilter::Triangle => triangle_resize(&frame, self.height, self.width),
        }
    }
}

fn shape_error(frame: &Array3<u8>, expected: Vec<usize>) -> RemError {
    RemError::ShapeMismatch {
        expected,
        actual: frame.shape().to_vec(),
    }
}

/// ITU-R BT.601 luma weights of R, G and B.
const LUMA_WEIGHTS: [f32; 3] = [0.299, 0.587, 0.114];

fn to_grayscale(frame: &Array3<u8>) -> Result<Array3<u8>> {
    let (h, w, c) = frame.dim();
    if c != 3 {
        return Err(shape_error(frame, vec![h, w, 3]).into());
    }
    let gray = frame.map_axis(Axis(2), |px| {
        let y: f32 = px
            .iter()
            .zip(LUMA_WEIGHTS.iter())
            .map(|(v, k)| *v as f32 * k)
            .sum();
        y.round().min(255.0) as u8
    });
    Ok(gray.insert_axis(Axis(2)))
}

fn triangle_resize(frame: &Array3<u8>, height: usize, width: usize) -> Result<Array3<u8>> {
    let (h, w, c) = frame.dim();
    let mut out = Array3::zeros((height, width, c));
    for ch in 0..c {
        let plane = frame
            .index_axis(Axis(2), ch)
            .as_standard_layout()
            .into_owned()
            .into_raw_vec();
        let img = ImageBuffer::<Luma<u8>, Vec<u8>>::from_raw(w as u32, h as u32, plane)
            .ok_or_else(|| shape_error(frame, vec![h, w, c]))?;
        let img = resize(&img, width as u32, height as u32, FilterType::Triangle);
        let plane = Array2::from_shape_vec((height, width), img.into_raw())?;
        out.index_axis_mut(Axis(2), ch).assign(&plane);
    }
    Ok(out)
}

/// Weights of the source pixels covered by each destination pixel along one axis.
fn area_weights(src: usize, dst: usize) -> Vec<Vec<(usize, f64)>> {
    let scale = src as f64 / dst as f64;
    (0..dst)
        .map(|i| {
            let start = i as f64 * scale;
            let end = start + scale;
            let first = start.floor() as usize;
            let last = (end.ceil() as usize).min(src);
            (first..last)
                .filter_map(|j| {
                    let overlap = end.min(j as f64 + 1.0) - start.max(j as f64);
                    match overlap > 0.0 {
                        true => Some((j, overlap / scale)),
                        false => None,
                    }
                })
                .collect()
        })
        .collect()
}

/// Resizes an `(H, W, C)` frame with area interpolation.
pub fn area_resize(frame: ArrayView3<u8>, height: usize, width: usize) -> Array3<u8> {
    let (h, w, c) = frame.dim();
    let wy = area_weights(h, height);
    let wx = area_weights(w, width);

    Array3::from_shape_fn((height, width, c), |(y, x, ch)| {
        let mut acc = 0f64;
        for (i, a) in wy[y].iter() {
            for (j, b) in wx[x].iter() {
                acc += a * b * frame[[*i, *j, ch]] as f64;
            }
        }
        acc.round().min(255.0).max(0.0) as u8
    })
}

impl Layer for WarpFrame {
    fn reset(&mut self) -> Result<Array3<u8>> {
        let frame = self.inner.reset()?;
        self.transform(frame)
    }

    fn step(&mut self, action: usize) -> Result<LayerStep> {
        let mut step = self.inner.step(action)?;
        step.obs = self.transform(step.obs)?;
        Ok(step)
    }

    fn lives(&self) -> usize {
        self.inner.lives()
    }

    fn action_meanings(&self) -> Vec<AtariAction> {
        self.inner.action_meanings()
    }
}
