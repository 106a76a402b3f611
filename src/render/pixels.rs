//! Per-pixel kernels on premultiplied RGBA8 byte buffers.

use crate::foundation::core::Rgba8Premul;
use crate::foundation::error::{TokenError, TokenResult};
use crate::foundation::math::{mul_div255_u8, unit_to_u8};

fn check_pair(dst: &[u8], src: &[u8], op: &str) -> TokenResult<()> {
    if dst.len() != src.len() || !dst.len().is_multiple_of(4) {
        return Err(TokenError::render(format!(
            "{op} expects equal-length rgba8 buffers"
        )));
    }
    Ok(())
}

/// Source-over of `src` onto `dst`, with `src` scaled by `opacity`.
pub(crate) fn over_in_place(dst: &mut [u8], src: &[u8], opacity: f32) -> TokenResult<()> {
    check_pair(dst, src, "over_in_place")?;
    let op = unit_to_u8(opacity);
    if op == 0 {
        return Ok(());
    }

    for (d, s) in dst.chunks_exact_mut(4).zip(src.chunks_exact(4)) {
        let sa = mul_div255_u8(u16::from(s[3]), op);
        if sa == 0 {
            continue;
        }
        let inv = 255u16 - u16::from(sa);

        d[3] = add_sat_u8(sa, mul_div255_u8(u16::from(d[3]), inv));
        for c in 0..3 {
            let sc = mul_div255_u8(u16::from(s[c]), op);
            let dc = mul_div255_u8(u16::from(d[c]), inv);
            d[c] = add_sat_u8(sc, dc);
        }
    }
    Ok(())
}

/// Destination-in: keep `dst` only where `stencil` is opaque, scaling every channel by the
/// stencil's alpha.
pub(crate) fn destination_in_place(dst: &mut [u8], stencil: &[u8]) -> TokenResult<()> {
    check_pair(dst, stencil, "destination_in_place")?;
    for (d, m) in dst.chunks_exact_mut(4).zip(stencil.chunks_exact(4)) {
        let w = u16::from(m[3]);
        if w == 255 {
            continue;
        }
        for c in d.iter_mut() {
            *c = mul_div255_u8(u16::from(*c), w);
        }
    }
    Ok(())
}

/// 4x5 row-major color matrix over straight-alpha components in `[0, 1]`.
pub(crate) fn color_matrix_in_place(buf: &mut [u8], m: [f32; 20]) {
    for d in buf.chunks_exact_mut(4) {
        let pa = f32::from(d[3]) / 255.0;
        if pa <= 0.0 {
            continue;
        }
        // Premul -> straight for matrix application.
        let r = f32::from(d[0]) / 255.0 / pa;
        let g = f32::from(d[1]) / 255.0 / pa;
        let b = f32::from(d[2]) / 255.0 / pa;
        let a = pa;

        let out_r = (m[0] * r + m[1] * g + m[2] * b + m[3] * a + m[4]).clamp(0.0, 1.0);
        let out_g = (m[5] * r + m[6] * g + m[7] * b + m[8] * a + m[9]).clamp(0.0, 1.0);
        let out_b = (m[10] * r + m[11] * g + m[12] * b + m[13] * a + m[14]).clamp(0.0, 1.0);
        let out_a = (m[15] * r + m[16] * g + m[17] * b + m[18] * a + m[19]).clamp(0.0, 1.0);

        d[0] = to_u8(out_r * out_a);
        d[1] = to_u8(out_g * out_a);
        d[2] = to_u8(out_b * out_a);
        d[3] = to_u8(out_a);
    }
}

/// CSS `brightness(percent)`: linear multiplier on color channels, alpha untouched.
pub(crate) fn brightness_in_place(buf: &mut [u8], percent: f32) {
    let f = (percent / 100.0).max(0.0);
    if (f - 1.0).abs() < f32::EPSILON {
        return;
    }
    #[rustfmt::skip]
    let m = [
        f, 0.0, 0.0, 0.0, 0.0,
        0.0, f, 0.0, 0.0, 0.0,
        0.0, 0.0, f, 0.0, 0.0,
        0.0, 0.0, 0.0, 1.0, 0.0,
    ];
    color_matrix_in_place(buf, m);
}

/// Paint `color` through the alpha channel of `coverage`.
pub(crate) fn tint_coverage(
    coverage: &[u8],
    color: Rgba8Premul,
    out: &mut [u8],
) -> TokenResult<()> {
    check_pair(out, coverage, "tint_coverage")?;
    let c = color.to_array();
    for (o, s) in out.chunks_exact_mut(4).zip(coverage.chunks_exact(4)) {
        let w = u16::from(s[3]);
        for i in 0..4 {
            o[i] = mul_div255_u8(u16::from(c[i]), w);
        }
    }
    Ok(())
}

/// Grow the alpha of `src` by a disc of `radius` pixels (max filter). Color channels of the
/// output are white, premultiplied.
pub(crate) fn dilate_alpha(src: &[u8], width: u32, height: u32, radius: f32) -> Vec<u8> {
    let w = width as i32;
    let h = height as i32;
    let mut out = vec![0u8; src.len()];
    let r = radius.max(0.0);
    let ri = r.ceil() as i32;
    let offsets: Vec<(i32, i32)> = (-ri..=ri)
        .flat_map(|dy| (-ri..=ri).map(move |dx| (dx, dy)))
        .filter(|&(dx, dy)| ((dx * dx + dy * dy) as f32) <= r * r + 0.5)
        .collect();

    for y in 0..h {
        for x in 0..w {
            let mut a = 0u8;
            for &(dx, dy) in &offsets {
                let sx = x + dx;
                let sy = y + dy;
                if sx < 0 || sy < 0 || sx >= w || sy >= h {
                    continue;
                }
                a = a.max(src[((sy * w + sx) as usize) * 4 + 3]);
                if a == 255 {
                    break;
                }
            }
            let i = ((y * w + x) as usize) * 4;
            out[i..i + 4].copy_from_slice(&[a, a, a, a]);
        }
    }
    out
}

/// Translate `src` by whole pixels, filling exposed area with transparency.
pub(crate) fn shift(src: &[u8], width: u32, height: u32, dx: i32, dy: i32) -> Vec<u8> {
    let w = width as i32;
    let h = height as i32;
    let mut out = vec![0u8; src.len()];
    for y in 0..h {
        let sy = y - dy;
        if sy < 0 || sy >= h {
            continue;
        }
        for x in 0..w {
            let sx = x - dx;
            if sx < 0 || sx >= w {
                continue;
            }
            let si = ((sy * w + sx) as usize) * 4;
            let di = ((y * w + x) as usize) * 4;
            out[di..di + 4].copy_from_slice(&src[si..si + 4]);
        }
    }
    out
}

/// Separable gaussian blur. `sigma <= 0` copies the input.
pub(crate) fn gaussian_blur(
    src: &[u8],
    width: u32,
    height: u32,
    sigma: f32,
) -> TokenResult<Vec<u8>> {
    if !sigma.is_finite() || sigma <= 0.0 {
        return Ok(src.to_vec());
    }
    let radius = (sigma * 3.0).ceil() as u32;
    let kernel = gaussian_kernel_q16(radius, sigma)?;
    let mut tmp = vec![0u8; src.len()];
    let mut dst = vec![0u8; src.len()];
    horizontal_blur_q16(src, &mut tmp, width, height, &kernel);
    vertical_blur_q16(&tmp, &mut dst, width, height, &kernel);
    Ok(dst)
}

pub(crate) fn gaussian_kernel_q16(radius: u32, sigma: f32) -> TokenResult<Vec<u32>> {
    if radius == 0 {
        return Ok(vec![1 << 16]);
    }
    if !sigma.is_finite() || sigma <= 0.0 {
        return Err(TokenError::validation("blur sigma must be finite and > 0"));
    }

    let r = radius as i32;
    let sigma = f64::from(sigma);
    let denom = 2.0 * sigma * sigma;
    let weights_f: Vec<f64> = (-r..=r)
        .map(|i| {
            let x = f64::from(i);
            (-x * x / denom).exp()
        })
        .collect();
    let sum: f64 = weights_f.iter().sum();
    if sum <= 0.0 {
        return Err(TokenError::render("gaussian kernel sum is zero"));
    }

    let mut weights: Vec<u32> = weights_f
        .iter()
        .map(|wf| ((wf / sum) * 65536.0).round().clamp(0.0, 65536.0) as u32)
        .collect();
    let acc: i64 = weights.iter().map(|&w| i64::from(w)).sum();
    let delta = 65536 - acc;
    if delta != 0 {
        let mid = weights.len() / 2;
        weights[mid] = (i64::from(weights[mid]) + delta).clamp(0, 65536) as u32;
    }
    Ok(weights)
}

fn horizontal_blur_q16(src: &[u8], dst: &mut [u8], width: u32, height: u32, k: &[u32]) {
    let radius = (k.len() / 2) as i32;
    let w = width as i32;
    for y in 0..height as i32 {
        for x in 0..w {
            let mut acc = [0u64; 4];
            for (ki, &kw) in k.iter().enumerate() {
                let sx = x + ki as i32 - radius;
                // Outside the surface is transparent.
                if sx < 0 || sx >= w {
                    continue;
                }
                let idx = ((y * w + sx) as usize) * 4;
                for c in 0..4 {
                    acc[c] += u64::from(kw) * u64::from(src[idx + c]);
                }
            }
            let out_idx = ((y * w + x) as usize) * 4;
            for c in 0..4 {
                dst[out_idx + c] = q16_to_u8(acc[c]);
            }
        }
    }
}

fn vertical_blur_q16(src: &[u8], dst: &mut [u8], width: u32, height: u32, k: &[u32]) {
    let radius = (k.len() / 2) as i32;
    let w = width as i32;
    let h = height as i32;
    for y in 0..h {
        for x in 0..w {
            let mut acc = [0u64; 4];
            for (ki, &kw) in k.iter().enumerate() {
                let sy = y + ki as i32 - radius;
                if sy < 0 || sy >= h {
                    continue;
                }
                let idx = ((sy * w + x) as usize) * 4;
                for c in 0..4 {
                    acc[c] += u64::from(kw) * u64::from(src[idx + c]);
                }
            }
            let out_idx = ((y * w + x) as usize) * 4;
            for c in 0..4 {
                dst[out_idx + c] = q16_to_u8(acc[c]);
            }
        }
    }
}

fn q16_to_u8(acc: u64) -> u8 {
    let v = (acc + 32768) >> 16;
    v.min(255) as u8
}

fn to_u8(x: f32) -> u8 {
    (x * 255.0).round().clamp(0.0, 255.0) as u8
}

fn add_sat_u8(a: u8, b: u8) -> u8 {
    a.saturating_add(b)
}

#[cfg(test)]
#[path = "../../tests/unit/render/pixels.rs"]
mod tests;
