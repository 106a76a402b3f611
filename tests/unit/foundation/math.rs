use super::*;

#[test]
fn mul_div255_identity_and_zero() {
    for x in [0u16, 1, 17, 128, 254, 255] {
        assert_eq!(mul_div255_u8(x, 255), x as u8);
        assert_eq!(mul_div255_u8(x, 0), 0);
    }
}

#[test]
fn unpremul_inverts_opaque_and_handles_zero_alpha() {
    assert_eq!(unpremul_u8(200, 255), 200);
    assert_eq!(unpremul_u8(0, 0), 0);
    assert_eq!(unpremul_u8(64, 128), 128);
    assert_eq!(unpremul_u8(255, 128), 255);
}

#[test]
fn unit_to_u8_clamps() {
    assert_eq!(unit_to_u8(-1.0), 0);
    assert_eq!(unit_to_u8(0.5), 128);
    assert_eq!(unit_to_u8(2.0), 255);
}
