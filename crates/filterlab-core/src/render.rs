//! CPU rendering of filter descriptors onto pixels.
//!
//! This is the offscreen surface of the export path: the original image is
//! drawn once with a descriptor burned in. Each function follows the Filter
//! Effects Level 1 definition, in descriptor order, clamping to [0, 1] after
//! every primitive:
//!
//! - `brightness(a)`: `c * a`
//! - `contrast(a)`: `(c - 0.5) * a + 0.5`
//! - `sepia`, `grayscale`, `hue-rotate`: 3x3 colour matrices
//! - `invert(a)`: `c * (1 - a) + (1 - c) * a`
//! - `blur(r)`: Gaussian with standard deviation `r` pixels
//!
//! Colour functions leave alpha untouched. Blur runs on premultiplied
//! colour, so transparent pixels spread alpha without darkening their
//! neighbours. Unlike a canvas, which treats pixels beyond the edge as
//! transparent, blur samples clamp to the nearest edge pixel.

use thiserror::Error;

use crate::decode::SourceImage;
use crate::filter::{FilterDescriptor, FilterOp};

/// ITU-R BT.709 luminance weights used by `grayscale` and `hue-rotate`.
const LUMA_R: f32 = 0.2126;
const LUMA_G: f32 = 0.7152;
const LUMA_B: f32 = 0.0722;

type ColorMatrix = [[f32; 3]; 3];

/// Errors from drawing onto the offscreen surface.
#[derive(Debug, Error)]
pub enum RenderError {
    /// Width or height is zero.
    #[error("Cannot render an empty image ({width}x{height})")]
    EmptyImage { width: u32, height: u32 },

    /// Pixel buffer length does not match the dimensions.
    #[error("Invalid pixel data: expected {expected} bytes (width * height * 4), got {actual}")]
    InvalidPixelData { expected: usize, actual: usize },
}

/// Draw `source` with `descriptor` applied, returning a new image.
///
/// The source is never modified.
pub fn render(
    source: &SourceImage,
    descriptor: &FilterDescriptor,
) -> Result<SourceImage, RenderError> {
    let (width, height) = source.dimensions();
    if width == 0 || height == 0 {
        return Err(RenderError::EmptyImage { width, height });
    }
    let expected = (width as usize) * (height as usize) * 4;
    if source.pixels.len() != expected {
        return Err(RenderError::InvalidPixelData {
            expected,
            actual: source.pixels.len(),
        });
    }

    if descriptor.is_identity() {
        return Ok(source.clone());
    }

    let mut pixels = source.pixels.clone();
    for op in descriptor.ops() {
        if op.is_identity() {
            continue;
        }
        match *op {
            FilterOp::Blur(radius) => {
                pixels = blur(pixels, width, height, radius)?;
            }
            FilterOp::Brightness(amount) => map_channels(&mut pixels, |c| c * amount),
            FilterOp::Contrast(amount) => map_channels(&mut pixels, |c| (c - 0.5) * amount + 0.5),
            FilterOp::Invert(amount) => {
                let amount = amount.clamp(0.0, 1.0);
                map_channels(&mut pixels, |c| c * (1.0 - amount) + (1.0 - c) * amount)
            }
            FilterOp::Sepia(amount) => apply_matrix(&mut pixels, &sepia_matrix(amount)),
            FilterOp::Grayscale(amount) => apply_matrix(&mut pixels, &grayscale_matrix(amount)),
            FilterOp::HueRotate(degrees) => {
                apply_matrix(&mut pixels, &hue_rotate_matrix(degrees))
            }
        }
    }

    Ok(SourceImage::new(width, height, pixels))
}

#[inline]
fn to_unit(v: u8) -> f32 {
    v as f32 / 255.0
}

#[inline]
fn to_u8(v: f32) -> u8 {
    (v.clamp(0.0, 1.0) * 255.0).round() as u8
}

/// Apply the same transfer function to R, G and B.
fn map_channels(pixels: &mut [u8], f: impl Fn(f32) -> f32) {
    for chunk in pixels.chunks_exact_mut(4) {
        for channel in &mut chunk[..3] {
            *channel = to_u8(f(to_unit(*channel)));
        }
    }
}

fn apply_matrix(pixels: &mut [u8], m: &ColorMatrix) {
    for chunk in pixels.chunks_exact_mut(4) {
        let r = to_unit(chunk[0]);
        let g = to_unit(chunk[1]);
        let b = to_unit(chunk[2]);

        chunk[0] = to_u8(m[0][0] * r + m[0][1] * g + m[0][2] * b);
        chunk[1] = to_u8(m[1][0] * r + m[1][1] * g + m[1][2] * b);
        chunk[2] = to_u8(m[2][0] * r + m[2][1] * g + m[2][2] * b);
    }
}

fn sepia_matrix(amount: f32) -> ColorMatrix {
    let k = 1.0 - amount.clamp(0.0, 1.0);
    [
        [0.393 + 0.607 * k, 0.769 - 0.769 * k, 0.189 - 0.189 * k],
        [0.349 - 0.349 * k, 0.686 + 0.314 * k, 0.168 - 0.168 * k],
        [0.272 - 0.272 * k, 0.534 - 0.534 * k, 0.131 + 0.869 * k],
    ]
}

fn grayscale_matrix(amount: f32) -> ColorMatrix {
    let k = 1.0 - amount.clamp(0.0, 1.0);
    [
        [LUMA_R + (1.0 - LUMA_R) * k, LUMA_G - LUMA_G * k, LUMA_B - LUMA_B * k],
        [LUMA_R - LUMA_R * k, LUMA_G + (1.0 - LUMA_G) * k, LUMA_B - LUMA_B * k],
        [LUMA_R - LUMA_R * k, LUMA_G - LUMA_G * k, LUMA_B + (1.0 - LUMA_B) * k],
    ]
}

fn hue_rotate_matrix(degrees: f32) -> ColorMatrix {
    let (sin, cos) = degrees.to_radians().sin_cos();
    [
        [
            0.213 + cos * 0.787 - sin * 0.213,
            0.715 - cos * 0.715 - sin * 0.715,
            0.072 - cos * 0.072 + sin * 0.928,
        ],
        [
            0.213 - cos * 0.213 + sin * 0.143,
            0.715 + cos * 0.285 + sin * 0.140,
            0.072 - cos * 0.072 - sin * 0.283,
        ],
        [
            0.213 - cos * 0.213 - sin * 0.787,
            0.715 - cos * 0.715 + sin * 0.715,
            0.072 + cos * 0.928 + sin * 0.072,
        ],
    ]
}

fn blur(pixels: Vec<u8>, width: u32, height: u32, radius: f32) -> Result<Vec<u8>, RenderError> {
    let actual = pixels.len();
    let premultiplied: Vec<f32> = pixels
        .chunks_exact(4)
        .flat_map(|px| {
            let a = to_unit(px[3]);
            [to_unit(px[0]) * a, to_unit(px[1]) * a, to_unit(px[2]) * a, a]
        })
        .collect();

    let img = image::Rgba32FImage::from_raw(width, height, premultiplied).ok_or(
        RenderError::InvalidPixelData {
            expected: (width as usize) * (height as usize) * 4,
            actual,
        },
    )?;
    let blurred = image::imageops::blur(&img, radius);

    Ok(blurred
        .into_raw()
        .chunks_exact(4)
        .flat_map(|px| {
            let a = px[3];
            if a <= 0.0 {
                [0, 0, 0, 0]
            } else {
                [to_u8(px[0] / a), to_u8(px[1] / a), to_u8(px[2] / a), to_u8(a)]
            }
        })
        .collect())
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn image_strategy() -> impl Strategy<Value = SourceImage> {
        (1u32..=6, 1u32..=6).prop_flat_map(|(w, h)| {
            proptest::collection::vec(any::<u8>(), (w * h * 4) as usize)
                .prop_map(move |pixels| SourceImage::new(w, h, pixels))
        })
    }

    fn color_op_strategy() -> impl Strategy<Value = FilterOp> {
        prop_oneof![
            (0.0f32..=2.0).prop_map(FilterOp::Brightness),
            (0.0f32..=2.0).prop_map(FilterOp::Contrast),
            (0.0f32..=1.0).prop_map(FilterOp::Sepia),
            (0.0f32..=1.0).prop_map(FilterOp::Grayscale),
            (0.0f32..=1.0).prop_map(FilterOp::Invert),
            (0.0f32..=360.0).prop_map(FilterOp::HueRotate),
        ]
    }

    proptest! {
        /// Property: rendering keeps the natural size.
        #[test]
        fn prop_dimensions_preserved(
            img in image_strategy(),
            ops in proptest::collection::vec(color_op_strategy(), 0..4),
            blur in 0u32..=3,
        ) {
            let mut ops = ops;
            ops.push(FilterOp::Blur(blur as f32));
            let out = render(&img, &FilterDescriptor::from_ops(ops)).unwrap();
            prop_assert_eq!(out.dimensions(), img.dimensions());
            prop_assert_eq!(out.pixels.len(), img.pixels.len());
        }

        /// Property: colour functions never touch alpha.
        #[test]
        fn prop_color_ops_preserve_alpha(
            img in image_strategy(),
            op in color_op_strategy(),
        ) {
            let out = render(&img, &FilterDescriptor::from_ops(vec![op])).unwrap();
            for (a, b) in img.pixels.chunks_exact(4).zip(out.pixels.chunks_exact(4)) {
                prop_assert_eq!(a[3], b[3]);
            }
        }
    }
}
