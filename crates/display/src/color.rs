use embedded_graphics::pixelcolor::raw::{RawData, RawU4};
use embedded_graphics::pixelcolor::{PixelColor, Rgb888, RgbColor, WebColors};

/// The palette of a 6-color-plus-white deep color e-paper panel.
/// No gradients; every frame is quantized to these values.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum PanelColor {
    Black,
    #[default]
    White,
    Red,
    Orange,
    Yellow,
    Green,
    Blue,
}

impl PixelColor for PanelColor {
    type Raw = RawU4;
}

impl From<PanelColor> for RawU4 {
    fn from(color: PanelColor) -> Self {
        RawU4::new(match color {
            PanelColor::Black => 0x0,
            PanelColor::White => 0x1,
            PanelColor::Green => 0x2,
            PanelColor::Blue => 0x3,
            PanelColor::Red => 0x4,
            PanelColor::Yellow => 0x5,
            PanelColor::Orange => 0x6,
        })
    }
}

impl From<RawU4> for PanelColor {
    fn from(raw: RawU4) -> Self {
        match raw.into_inner() {
            0x0 => PanelColor::Black,
            0x2 => PanelColor::Green,
            0x3 => PanelColor::Blue,
            0x4 => PanelColor::Red,
            0x5 => PanelColor::Yellow,
            0x6 => PanelColor::Orange,
            _ => PanelColor::White,
        }
    }
}

impl PanelColor {
    /// RGB rendition used by the file sink and the simulator preview.
    pub fn rgb(self) -> Rgb888 {
        match self {
            PanelColor::Black => <Rgb888 as RgbColor>::BLACK,
            PanelColor::White => <Rgb888 as RgbColor>::WHITE,
            PanelColor::Red => <Rgb888 as RgbColor>::RED,
            PanelColor::Orange => <Rgb888 as WebColors>::CSS_ORANGE,
            PanelColor::Yellow => <Rgb888 as RgbColor>::YELLOW,
            PanelColor::Green => <Rgb888 as RgbColor>::GREEN,
            PanelColor::Blue => <Rgb888 as RgbColor>::BLUE,
        }
    }
}

/// Named-color lookup shared by the mapper and the renderer.
///
/// Two implementations: [`PanelColor`] for the hardware panel and
/// [`Rgb888`] for offscreen / debug rendering. Generic drawing code
/// never branches on the target kind.
pub trait Palette: PixelColor {
    const BLACK: Self;
    const WHITE: Self;
    const RED: Self;
    const ORANGE: Self;
    const YELLOW: Self;
    const GREEN: Self;
    const BLUE: Self;
}

impl Palette for PanelColor {
    const BLACK: Self = PanelColor::Black;
    const WHITE: Self = PanelColor::White;
    const RED: Self = PanelColor::Red;
    const ORANGE: Self = PanelColor::Orange;
    const YELLOW: Self = PanelColor::Yellow;
    const GREEN: Self = PanelColor::Green;
    const BLUE: Self = PanelColor::Blue;
}

impl Palette for Rgb888 {
    const BLACK: Self = <Rgb888 as RgbColor>::BLACK;
    const WHITE: Self = <Rgb888 as RgbColor>::WHITE;
    const RED: Self = <Rgb888 as RgbColor>::RED;
    const ORANGE: Self = <Rgb888 as WebColors>::CSS_ORANGE;
    const YELLOW: Self = <Rgb888 as RgbColor>::YELLOW;
    const GREEN: Self = <Rgb888 as RgbColor>::GREEN;
    const BLUE: Self = <Rgb888 as RgbColor>::BLUE;
}
