//! 16 bit 5-6-5 color packing, the only pixel format on the wire.

pub use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::pixelcolor::IntoStorage;

pub const BLACK: u16 = 0x0000;
pub const WHITE: u16 = 0xffff;

/// Channel order of the panel's subpixels, bit 3 of the memory access byte.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum ColorOrder {
    #[default]
    Rgb,
    Bgr,
}

/// Pack 8 bit channels by truncating to 5, 6 and 5 bits.
pub const fn color565(r: u8, g: u8, b: u8) -> u16 {
    ((r as u16 & 0xf8) << 8) | ((g as u16 & 0xfc) << 3) | (b as u16 >> 3)
}

/// Convert a 0x00RRGGBB word, top byte ignored.
///
/// Red and blue are divided by 8, green by 4. Existing image assets were
/// converted with exactly this rule, keep it bit for bit.
pub const fn color24_to_565(color: u32) -> u16 {
    let r = ((color >> 16) & 0xff) / 8;
    let g = ((color >> 8) & 0xff) / 4;
    let b = (color & 0xff) / 8;
    ((r << 11) | (g << 5) | b) as u16
}

pub fn raw_color(color: Rgb565) -> u16 {
    color.into_storage()
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_graphics::pixelcolor::RgbColor;

    #[test]
    fn orange_quantizes_to_full_red_half_green() {
        assert_eq!(color24_to_565(0xff8000), 0b11111_100000_00000);
    }

    #[test]
    fn padding_byte_is_ignored() {
        assert_eq!(color24_to_565(0xab12_3456), color24_to_565(0x0012_3456));
    }

    #[test]
    fn primaries() {
        assert_eq!(color24_to_565(0xffffff), WHITE);
        assert_eq!(color24_to_565(0x000000), BLACK);
        assert_eq!(color565(0xff, 0, 0), 0xf800);
        assert_eq!(color565(0, 0xff, 0), 0x07e0);
        assert_eq!(color565(0, 0, 0xff), 0x001f);
    }

    #[test]
    fn embedded_graphics_storage_matches() {
        assert_eq!(raw_color(Rgb565::RED), 0xf800);
        assert_eq!(raw_color(Rgb565::new(0, 0x3f, 0)), 0x07e0);
    }
}
