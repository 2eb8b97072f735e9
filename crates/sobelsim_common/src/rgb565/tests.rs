use super::*;

#[test]
fn expand_replicates_high_bits() {
    assert_eq!(expand5(0x00), 0x00);
    assert_eq!(expand5(0x1F), 0xFF);
    // 1_0000 -> 1000_0100, not 1000_0000.
    assert_eq!(expand5(0x10), 0x84);
    assert_eq!(expand6(0x3F), 0xFF);
    assert_eq!(expand6(0x20), 0x82);
    assert_eq!(expand6(0x2B), 0xAE);
    // Bits above the field width are ignored.
    assert_eq!(expand5(0xFF), 0xFF);
    assert_eq!(expand6(0x40), 0x00);
}

#[test]
fn expand_differs_from_plain_shift() {
    let differs = (0u8..32).filter(|&v| expand5(v) != v << 3).count();
    // Only v < 4 have zero high bits to replicate.
    assert_eq!(differs, 28);
}

#[test]
fn luma_of_primaries() {
    assert_eq!(to_luma8(0x0000), 0);
    assert_eq!(to_luma8(0xFFFF), 255);
    assert_eq!(to_luma8(0xF800), 76);
    assert_eq!(to_luma8(0x07E0), 150);
    assert_eq!(to_luma8(0x001F), 27);
    assert_eq!(to_luma8(0x1234), 63);
    assert_eq!(to_luma8(0xABCD), 135);
}

#[test]
fn luma_never_exceeds_byte_range() {
    // Exhaustive over all 16-bit words; the clamp guard must never be needed.
    for word in 0..=u16::MAX {
        let c = Rgb565(word).to_rgb8();
        let raw = 77 * c.r as u32 + 151 * c.g as u32 + 28 * c.b as u32;
        assert!(raw >> 8 <= 255, "word {:04x}", word);
        assert_eq!(to_luma8(word) as u32, raw >> 8);
    }
}

#[test]
fn pack_edge_bit_slices() {
    assert_eq!(pack_edge(0x00), 0x0000);
    assert_eq!(pack_edge(0xFF), 0xFFFF);
    assert_eq!(pack_edge(0x80), 0x8410);
    assert_eq!(pack_edge(0x5A), 0x5ACB);
    // Bits [1:0] only reach green via bit 2; bits below that are dropped.
    assert_eq!(pack_edge(0x07), 0x0020);
    assert_eq!(pack_edge(0x03), 0x0000);

    for mag in 0..=u8::MAX {
        let (r5, g6, b5) = Rgb565(pack_edge(mag)).channels();
        assert_eq!(r5, mag >> 3);
        assert_eq!(g6, mag >> 2);
        assert_eq!(b5, r5, "blue must carry the same bits as red");
    }
}

#[test]
fn pack_edge_is_not_invertible_through_luma() {
    assert_eq!(to_luma8(pack_edge(0x07)), 2);
    assert_ne!(pack_edge(to_luma8(pack_edge(0x07))), pack_edge(0x07));
    assert_ne!(pack_edge(to_luma8(pack_edge(0xC8))), pack_edge(0xC8));
}

#[test]
fn rgb8_pack_truncates() {
    let c = Color::new_rgb(0xFF, 0x81, 0x07);
    let packed = Rgb565::from_rgb8(c);
    assert_eq!(packed.channels(), (0x1F, 0x20, 0x00));
    assert_eq!(Rgb565::from_rgb8(Color::WHITE), Rgb565(0xFFFF));
    assert_eq!(Rgb565(0xF800).to_rgb8(), Color::RED);
    assert_eq!(Rgb565(0x07E0).to_rgb8(), Color::GREEN);
    assert_eq!(Rgb565(0x001F).to_rgb8(), Color::BLUE);
}
