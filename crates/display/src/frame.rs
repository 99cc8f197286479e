//! Owned framebuffer the orchestrator renders into and the sinks
//! consume. Doubles as the pixel-level assertion target in tests.

use embedded_graphics::prelude::*;
use embedded_graphics::Pixel;
use std::convert::Infallible;

use crate::color::Palette;

#[derive(Clone, Debug, PartialEq)]
pub struct Frame<C: Palette> {
    size: Size,
    pixels: Vec<C>,
}

impl<C: Palette> Frame<C> {
    /// A white (cleared) frame of the given dimensions.
    pub fn new(size: Size) -> Self {
        Frame {
            size,
            pixels: vec![C::WHITE; (size.width * size.height) as usize],
        }
    }

    pub fn get(&self, x: u32, y: u32) -> Option<C> {
        if x < self.size.width && y < self.size.height {
            Some(self.pixels[(y * self.size.width + x) as usize])
        } else {
            None
        }
    }

    /// Row-major pixel iterator.
    pub fn pixels(&self) -> impl Iterator<Item = &C> {
        self.pixels.iter()
    }

    /// Count of pixels of `color` inside `area` (clipped to the frame).
    pub fn count_in(&self, area: &embedded_graphics::primitives::Rectangle, color: C) -> usize {
        let mut n = 0;
        for point in area.points() {
            if point.x >= 0
                && point.y >= 0
                && self.get(point.x as u32, point.y as u32) == Some(color)
            {
                n += 1;
            }
        }
        n
    }
}

impl<C: Palette> OriginDimensions for Frame<C> {
    fn size(&self) -> Size {
        self.size
    }
}

impl<C: Palette> DrawTarget for Frame<C> {
    type Color = C;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            if point.x >= 0
                && point.y >= 0
                && (point.x as u32) < self.size.width
                && (point.y as u32) < self.size.height
            {
                self.pixels[(point.y as u32 * self.size.width + point.x as u32) as usize] = color;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::PanelColor;
    use embedded_graphics::primitives::{PrimitiveStyle, Rectangle};

    #[test]
    fn starts_white_and_clips_out_of_bounds_draws() {
        let mut frame: Frame<PanelColor> = Frame::new(Size::new(8, 8));
        assert!(frame.pixels().all(|c| *c == PanelColor::White));

        Rectangle::new(Point::new(6, 6), Size::new(10, 10))
            .into_styled(PrimitiveStyle::with_fill(PanelColor::Red))
            .draw(&mut frame)
            .expect("infallible");

        assert_eq!(frame.get(7, 7), Some(PanelColor::Red));
        assert_eq!(frame.get(8, 8), None);
        assert_eq!(
            frame.count_in(
                &Rectangle::new(Point::zero(), Size::new(8, 8)),
                PanelColor::Red
            ),
            4
        );
    }
}
