//! Vector glyphs for condition, allergen and auxiliary icons.
//!
//! Every glyph is drawn from primitives into a caller-supplied
//! rectangle and scales with it, so the renderer can reuse the same
//! glyph at 30, 45 and 100 px.

use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{
    Circle, Line, PrimitiveStyle, Rectangle, RoundedRectangle, Triangle,
};

use crate::color::Palette;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Icon {
    // Weather conditions
    Clear,
    ClearNight,
    PartlyCloudy,
    PartlyCloudyNight,
    MostlyCloudy,
    LightRain,
    Rain,
    Thunderstorm,
    Snow,
    Atmosphere,
    /// Fallback for condition codes outside the documented taxonomy.
    Unknown,
    // Thermometer variants
    ThermoHot,
    ThermoMild,
    ThermoCold,
    // Auxiliary
    Humidity,
    // Allergens
    Tree,
    Weed,
    Grass,
    Mold,
    // Title decoration
    Rocket,
}

/// Draw `icon` scaled into `bounds`.
pub fn draw<D, C>(icon: Icon, bounds: Rectangle, target: &mut D) -> Result<(), D::Error>
where
    D: DrawTarget<Color = C>,
    C: Palette,
{
    match icon {
        Icon::Clear => sun(bounds, C::YELLOW, target),
        Icon::ClearNight => moon(bounds, target),
        Icon::PartlyCloudy => {
            sun(upper_left_part(bounds), C::YELLOW, target)?;
            cloud(lower_right_part(bounds), target)
        }
        Icon::PartlyCloudyNight => {
            moon(upper_left_part(bounds), target)?;
            cloud(lower_right_part(bounds), target)
        }
        Icon::MostlyCloudy => {
            cloud(upper_left_part(bounds), target)?;
            cloud(lower_right_part(bounds), target)
        }
        Icon::LightRain => {
            cloud(top_half(bounds), target)?;
            rain_streaks(bounds, 2, target)
        }
        Icon::Rain => {
            cloud(top_half(bounds), target)?;
            rain_streaks(bounds, 4, target)
        }
        Icon::Thunderstorm => {
            cloud(top_half(bounds), target)?;
            bolt(bounds, target)
        }
        Icon::Snow => {
            cloud(top_half(bounds), target)?;
            snowflakes(bounds, target)
        }
        Icon::Atmosphere => haze(bounds, target),
        Icon::Unknown => unknown(bounds, target),
        Icon::ThermoHot => thermometer(bounds, C::RED, 25, target),
        Icon::ThermoMild => thermometer(bounds, C::ORANGE, 45, target),
        Icon::ThermoCold => thermometer(bounds, C::BLUE, 65, target),
        Icon::Humidity => droplet(bounds, target),
        Icon::Tree => tree(bounds, target),
        Icon::Weed => weed(bounds, target),
        Icon::Grass => grass(bounds, target),
        Icon::Mold => mold(bounds, target),
        Icon::Rocket => rocket(bounds, target),
    }
}

/// Point at (`px`%, `py`%) of the rectangle.
fn at(b: Rectangle, px: i32, py: i32) -> Point {
    Point::new(
        b.top_left.x + (b.size.width as i32 * px) / 100,
        b.top_left.y + (b.size.height as i32 * py) / 100,
    )
}

/// Length as a percentage of the smaller rectangle side.
fn dim(b: Rectangle, pct: u32) -> u32 {
    (b.size.width.min(b.size.height) * pct) / 100
}

fn stroke_width(b: Rectangle) -> u32 {
    dim(b, 6).max(1)
}

fn upper_left_part(b: Rectangle) -> Rectangle {
    Rectangle::new(b.top_left, b.size * 6 / 10)
}

fn lower_right_part(b: Rectangle) -> Rectangle {
    Rectangle::new(at(b, 30, 30), b.size * 7 / 10)
}

fn top_half(b: Rectangle) -> Rectangle {
    Rectangle::new(
        b.top_left,
        Size::new(b.size.width, (b.size.height * 6) / 10),
    )
}

fn sun<D, C>(b: Rectangle, color: C, target: &mut D) -> Result<(), D::Error>
where
    D: DrawTarget<Color = C>,
    C: Palette,
{
    let center = at(b, 50, 50);
    let disc = dim(b, 50);
    Circle::with_center(center, disc)
        .into_styled(PrimitiveStyle::with_fill(color))
        .draw(target)?;

    // Eight rays
    let inner = (disc / 2 + dim(b, 8)) as i32;
    let outer = (disc / 2 + dim(b, 22)) as i32;
    let style = PrimitiveStyle::with_stroke(color, stroke_width(b));
    for (dx, dy) in [
        (1, 0),
        (-1, 0),
        (0, 1),
        (0, -1),
        (1, 1),
        (1, -1),
        (-1, 1),
        (-1, -1),
    ] {
        // Diagonal rays shortened so all tips sit roughly on a circle.
        let (num, den) = if dx != 0 && dy != 0 { (7, 10) } else { (1, 1) };
        let from = center + Point::new(dx * inner * num / den, dy * inner * num / den);
        let to = center + Point::new(dx * outer * num / den, dy * outer * num / den);
        Line::new(from, to).into_styled(style).draw(target)?;
    }
    Ok(())
}

fn moon<D, C>(b: Rectangle, target: &mut D) -> Result<(), D::Error>
where
    D: DrawTarget<Color = C>,
    C: Palette,
{
    let disc = dim(b, 70);
    Circle::with_center(at(b, 50, 50), disc)
        .into_styled(PrimitiveStyle::with_fill(C::YELLOW))
        .draw(target)?;
    // Bite out of the upper right leaves a crescent.
    Circle::with_center(at(b, 68, 36), disc)
        .into_styled(PrimitiveStyle::with_fill(C::WHITE))
        .draw(target)
}

fn cloud<D, C>(b: Rectangle, target: &mut D) -> Result<(), D::Error>
where
    D: DrawTarget<Color = C>,
    C: Palette,
{
    let style = PrimitiveStyle::with_fill(C::BLACK);
    Circle::with_center(at(b, 35, 55), dim(b, 45))
        .into_styled(style)
        .draw(target)?;
    Circle::with_center(at(b, 60, 45), dim(b, 55))
        .into_styled(style)
        .draw(target)?;
    Rectangle::new(at(b, 25, 55), Size::new(dim(b, 55), dim(b, 25)))
        .into_styled(style)
        .draw(target)
}

fn rain_streaks<D, C>(b: Rectangle, count: i32, target: &mut D) -> Result<(), D::Error>
where
    D: DrawTarget<Color = C>,
    C: Palette,
{
    let style = PrimitiveStyle::with_stroke(C::BLUE, stroke_width(b));
    for i in 0..count {
        let x = 20 + (60 * i) / count.max(1);
        Line::new(at(b, x + 8, 65), at(b, x, 92))
            .into_styled(style)
            .draw(target)?;
    }
    Ok(())
}

fn bolt<D, C>(b: Rectangle, target: &mut D) -> Result<(), D::Error>
where
    D: DrawTarget<Color = C>,
    C: Palette,
{
    let style = PrimitiveStyle::with_fill(C::YELLOW);
    Triangle::new(at(b, 55, 55), at(b, 35, 80), at(b, 52, 78))
        .into_styled(style)
        .draw(target)?;
    Triangle::new(at(b, 52, 70), at(b, 62, 72), at(b, 40, 100))
        .into_styled(style)
        .draw(target)
}

fn snowflakes<D, C>(b: Rectangle, target: &mut D) -> Result<(), D::Error>
where
    D: DrawTarget<Color = C>,
    C: Palette,
{
    let style = PrimitiveStyle::with_fill(C::BLUE);
    for (x, y) in [(25, 75), (50, 88), (75, 75)] {
        Circle::with_center(at(b, x, y), dim(b, 12).max(2))
            .into_styled(style)
            .draw(target)?;
    }
    Ok(())
}

fn haze<D, C>(b: Rectangle, target: &mut D) -> Result<(), D::Error>
where
    D: DrawTarget<Color = C>,
    C: Palette,
{
    let style = PrimitiveStyle::with_stroke(C::BLACK, stroke_width(b));
    for (i, y) in [25, 45, 65, 85].into_iter().enumerate() {
        let inset = (i as i32 % 2) * 10;
        Line::new(at(b, 10 + inset, y), at(b, 90 - inset, y))
            .into_styled(style)
            .draw(target)?;
    }
    Ok(())
}

fn unknown<D, C>(b: Rectangle, target: &mut D) -> Result<(), D::Error>
where
    D: DrawTarget<Color = C>,
    C: Palette,
{
    let style = PrimitiveStyle::with_stroke(C::BLACK, stroke_width(b));
    let body = Rectangle::new(at(b, 15, 15), b.size * 7 / 10);
    body.into_styled(style).draw(target)?;
    Line::new(at(b, 15, 15), at(b, 85, 85))
        .into_styled(style)
        .draw(target)?;
    Line::new(at(b, 85, 15), at(b, 15, 85))
        .into_styled(style)
        .draw(target)
}

/// Mercury column filled from `level`% of the tube down to the bulb.
fn thermometer<D, C>(b: Rectangle, color: C, level: i32, target: &mut D) -> Result<(), D::Error>
where
    D: DrawTarget<Color = C>,
    C: Palette,
{
    let outline = PrimitiveStyle::with_stroke(C::BLACK, stroke_width(b).min(3));
    let tube_w = (b.size.width * 4) / 10;
    let tube = Rectangle::new(
        Point::new(at(b, 50, 0).x - (tube_w as i32) / 2, b.top_left.y),
        Size::new(tube_w, (b.size.height * 75) / 100),
    );
    RoundedRectangle::with_equal_corners(tube, Size::new(tube_w / 2, tube_w / 2))
        .into_styled(outline)
        .draw(target)?;

    let bulb = (b.size.width * 8) / 10;
    Circle::with_center(at(b, 50, 85), bulb)
        .into_styled(PrimitiveStyle::with_fill(color))
        .draw(target)?;
    Circle::with_center(at(b, 50, 85), bulb)
        .into_styled(outline)
        .draw(target)?;

    let top = at(b, 50, level).y;
    let bottom = at(b, 50, 78).y;
    Rectangle::new(
        Point::new(at(b, 50, 0).x - (tube_w as i32) / 4, top),
        Size::new(tube_w / 2, (bottom - top).max(0) as u32),
    )
    .into_styled(PrimitiveStyle::with_fill(color))
    .draw(target)
}

fn droplet<D, C>(b: Rectangle, target: &mut D) -> Result<(), D::Error>
where
    D: DrawTarget<Color = C>,
    C: Palette,
{
    let style = PrimitiveStyle::with_fill(C::BLUE);
    Triangle::new(at(b, 50, 5), at(b, 25, 55), at(b, 75, 55))
        .into_styled(style)
        .draw(target)?;
    Circle::with_center(at(b, 50, 62), dim(b, 52))
        .into_styled(style)
        .draw(target)
}

fn tree<D, C>(b: Rectangle, target: &mut D) -> Result<(), D::Error>
where
    D: DrawTarget<Color = C>,
    C: Palette,
{
    Rectangle::new(at(b, 44, 55), Size::new(dim(b, 12).max(2), dim(b, 42)))
        .into_styled(PrimitiveStyle::with_fill(C::BLACK))
        .draw(target)?;
    Circle::with_center(at(b, 50, 35), dim(b, 60))
        .into_styled(PrimitiveStyle::with_fill(C::GREEN))
        .draw(target)
}

fn weed<D, C>(b: Rectangle, target: &mut D) -> Result<(), D::Error>
where
    D: DrawTarget<Color = C>,
    C: Palette,
{
    let style = PrimitiveStyle::with_stroke(C::GREEN, stroke_width(b));
    Line::new(at(b, 50, 100), at(b, 50, 10))
        .into_styled(style)
        .draw(target)?;
    for (y, tip_x) in [(70, 15), (55, 25), (40, 35)] {
        Line::new(at(b, 50, y), at(b, tip_x, y - 20))
            .into_styled(style)
            .draw(target)?;
        Line::new(at(b, 50, y), at(b, 100 - tip_x, y - 20))
            .into_styled(style)
            .draw(target)?;
    }
    Ok(())
}

fn grass<D, C>(b: Rectangle, target: &mut D) -> Result<(), D::Error>
where
    D: DrawTarget<Color = C>,
    C: Palette,
{
    let style = PrimitiveStyle::with_stroke(C::GREEN, stroke_width(b));
    for (x, lean, top) in [(15, 5, 40), (35, -5, 25), (50, 0, 15), (65, 5, 25), (85, -5, 40)] {
        Line::new(at(b, x, 100), at(b, x + lean, top))
            .into_styled(style)
            .draw(target)?;
    }
    Ok(())
}

fn mold<D, C>(b: Rectangle, target: &mut D) -> Result<(), D::Error>
where
    D: DrawTarget<Color = C>,
    C: Palette,
{
    for (x, y, d) in [(35, 60, 45u32), (62, 52, 38), (50, 32, 30)] {
        Circle::with_center(at(b, x, y), dim(b, d))
            .into_styled(PrimitiveStyle::with_fill(C::GREEN))
            .draw(target)?;
    }
    Circle::with_center(at(b, 48, 55), dim(b, 14).max(2))
        .into_styled(PrimitiveStyle::with_fill(C::BLACK))
        .draw(target)
}

fn rocket<D, C>(b: Rectangle, target: &mut D) -> Result<(), D::Error>
where
    D: DrawTarget<Color = C>,
    C: Palette,
{
    // Fins
    let fin = PrimitiveStyle::with_fill(C::RED);
    Triangle::new(at(b, 38, 55), at(b, 20, 85), at(b, 38, 85))
        .into_styled(fin)
        .draw(target)?;
    Triangle::new(at(b, 62, 55), at(b, 80, 85), at(b, 62, 85))
        .into_styled(fin)
        .draw(target)?;

    // Body and nose
    let body_w = (b.size.width * 26) / 100;
    let body = Rectangle::new(
        Point::new(at(b, 50, 0).x - (body_w as i32) / 2, at(b, 0, 20).y),
        Size::new(body_w, (b.size.height * 65) / 100),
    );
    RoundedRectangle::with_equal_corners(body, Size::new(body_w / 3, body_w / 3))
        .into_styled(PrimitiveStyle::with_stroke(C::BLACK, stroke_width(b).min(3)))
        .draw(target)?;
    Triangle::new(at(b, 50, 2), at(b, 38, 22), at(b, 62, 22))
        .into_styled(fin)
        .draw(target)?;
    Circle::with_center(at(b, 50, 38), dim(b, 16).max(2))
        .into_styled(PrimitiveStyle::with_fill(C::BLUE))
        .draw(target)?;

    // Exhaust
    Triangle::new(at(b, 42, 86), at(b, 58, 86), at(b, 50, 100))
        .into_styled(PrimitiveStyle::with_fill(C::ORANGE))
        .draw(target)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::PanelColor;
    use crate::frame::Frame;

    fn non_white_pixels(icon: Icon) -> usize {
        let mut frame: Frame<PanelColor> = Frame::new(Size::new(48, 48));
        draw(icon, Rectangle::new(Point::new(4, 4), Size::new(40, 40)), &mut frame)
            .expect("infallible");
        frame.pixels().filter(|c| **c != PanelColor::White).count()
    }

    #[test]
    fn every_icon_draws_something() {
        for icon in [
            Icon::Clear,
            Icon::ClearNight,
            Icon::PartlyCloudy,
            Icon::PartlyCloudyNight,
            Icon::MostlyCloudy,
            Icon::LightRain,
            Icon::Rain,
            Icon::Thunderstorm,
            Icon::Snow,
            Icon::Atmosphere,
            Icon::Unknown,
            Icon::ThermoHot,
            Icon::ThermoMild,
            Icon::ThermoCold,
            Icon::Humidity,
            Icon::Tree,
            Icon::Weed,
            Icon::Grass,
            Icon::Mold,
            Icon::Rocket,
        ] {
            assert!(non_white_pixels(icon) > 10, "{icon:?} drew almost nothing");
        }
    }

    #[test]
    fn glyphs_stay_inside_their_bounds() {
        let mut frame: Frame<PanelColor> = Frame::new(Size::new(60, 60));
        draw(
            Icon::Rain,
            Rectangle::new(Point::new(10, 10), Size::new(40, 40)),
            &mut frame,
        )
        .expect("infallible");
        for x in 0..60 {
            for y in [0, 1, 58, 59] {
                assert_eq!(frame.get(x, y), Some(PanelColor::White));
                assert_eq!(frame.get(y, x), Some(PanelColor::White));
            }
        }
    }
}
