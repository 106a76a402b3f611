pub(crate) fn mul_div255_u16(x: u16, y: u16) -> u16 {
    (((u32::from(x) * u32::from(y)) + 127) / 255) as u16
}

pub(crate) fn mul_div255_u8(x: u16, y: u16) -> u8 {
    mul_div255_u16(x, y) as u8
}

/// Straight channel value of a premultiplied component.
pub(crate) fn unpremul_u8(c: u8, a: u8) -> u8 {
    if a == 0 {
        return 0;
    }
    let v = (u32::from(c) * 255 + u32::from(a) / 2) / u32::from(a);
    v.min(255) as u8
}

/// Map a `[0, 1]` factor onto the `0..=255` fixed-point scale.
pub(crate) fn unit_to_u8(x: f32) -> u16 {
    ((x.clamp(0.0, 1.0) * 255.0).round() as i32).clamp(0, 255) as u16
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/math.rs"]
mod tests;
