//! The layout renderer: composes a [`RenderModel`] onto a fixed-region
//! canvas. Pure with respect to the outside world, same model and
//! timestamp give the same pixels.
//!
//! A failure while populating one region is contained to that region:
//! the renderer logs it and stamps an `ERROR!` marker inside the
//! region bounds instead of aborting the frame.

use chrono::{DateTime, Datelike, FixedOffset, Timelike};
use eg_seven_segment::{SevenSegmentStyle, SevenSegmentStyleBuilder};
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{Line, PrimitiveStyle, Rectangle, RoundedRectangle};
use embedded_graphics::text::Text;
use embedded_layout::layout::linear::{FixedMargin, LinearLayout};
use embedded_layout::prelude::*;
use thiserror::Error;
use u8g2_fonts::types::{FontColor, HorizontalAlignment, VerticalPosition};
use u8g2_fonts::{fonts, FontRenderer, U8g2TextStyle};

use crate::color::Palette;
use crate::icons::{self, Icon};
use crate::mapper;
use crate::model::{AirQuality, CurrentConditions, PollenLevels, RenderModel};

#[derive(Error, Debug)]
pub enum Error<DisplayError: core::fmt::Debug> {
    #[error("draw target failure: {0:?}")]
    Display(DisplayError),
    #[error("font rendering failure: {0}")]
    Font(u8g2_fonts::Error<DisplayError>),
}

impl<E: core::fmt::Debug> From<u8g2_fonts::Error<E>> for Error<E> {
    fn from(err: u8g2_fonts::Error<E>) -> Self {
        Error::Font(err)
    }
}

/// The fixed zones of the canvas. Computed once from the target
/// bounding box so the same layout serves the panel's reported
/// dimensions and an offscreen debug size.
#[derive(Clone, Copy, Debug)]
pub struct Regions {
    pub title: Rectangle,
    pub current: Rectangle,
    pub air: Rectangle,
    pub forecast: Rectangle,
    pub badge: Rectangle,
}

const MARGIN: i32 = 5;
const TITLE_H: i32 = 35;
const GAP: i32 = 10;
const OUTLINE_W: u32 = 2;
const CORNER: u32 = 20;

impl Regions {
    pub fn compute(bb: &Rectangle) -> Regions {
        let tl = bb.top_left;
        let w = bb.size.width as i32;
        let h = bb.size.height as i32;
        let half_w = (w - 2 * MARGIN - GAP) / 2;
        let box_h = (h - TITLE_H - MARGIN - GAP) / 2;

        Regions {
            title: Rectangle::new(tl, Size::new(w as u32, TITLE_H as u32)),
            current: Rectangle::new(
                tl + Point::new(MARGIN, TITLE_H),
                Size::new(half_w as u32, box_h as u32),
            ),
            air: Rectangle::new(
                tl + Point::new(MARGIN + half_w + GAP, TITLE_H),
                Size::new(half_w as u32, box_h as u32),
            ),
            forecast: Rectangle::new(
                tl + Point::new(MARGIN, TITLE_H + box_h + GAP),
                Size::new((w - 2 * MARGIN) as u32, box_h as u32),
            ),
            badge: Rectangle::new(
                tl + Point::new(w / 2 - 45, TITLE_H + box_h - 40),
                Size::new(90, 90),
            ),
        }
    }
}

pub struct Renderer<C: Palette> {
    canvas: Rectangle,
    regions: Regions,
    title_font: FontRenderer,
    label_font: FontRenderer,
    small_font: FontRenderer,
    big_digits: SevenSegmentStyle<C>,
}

impl<C: Palette> Renderer<C> {
    pub fn new(bounding_box: &Rectangle) -> Renderer<C> {
        Renderer {
            canvas: *bounding_box,
            regions: Regions::compute(bounding_box),
            title_font: FontRenderer::new::<fonts::u8g2_font_spleen16x32_mf>()
                .with_ignore_unknown_chars(true),
            label_font: FontRenderer::new::<fonts::u8g2_font_spleen12x24_mf>()
                .with_ignore_unknown_chars(true),
            small_font: FontRenderer::new::<fonts::u8g2_font_spleen8x16_mf>()
                .with_ignore_unknown_chars(true),
            big_digits: SevenSegmentStyleBuilder::new()
                .digit_size(Size::new(26, 48))
                .digit_spacing(5)
                .segment_width(7)
                .segment_color(C::BLACK)
                .build(),
        }
    }

    pub fn regions(&self) -> &Regions {
        &self.regions
    }

    /// Compose one full frame. Region failures degrade to in-region
    /// markers; only canvas-level failures propagate.
    pub fn render<D>(
        &self,
        model: &RenderModel,
        updated_at: DateTime<FixedOffset>,
        target: &mut D,
    ) -> Result<(), Error<D::Error>>
    where
        D: DrawTarget<Color = C>,
        D::Error: core::fmt::Debug,
    {
        target.clear(C::WHITE).map_err(Error::Display)?;
        self.draw_title(updated_at, target)?;

        let outline = PrimitiveStyle::with_stroke(C::BLACK, OUTLINE_W);
        for region in [self.regions.current, self.regions.air, self.regions.forecast] {
            RoundedRectangle::with_equal_corners(region, Size::new(CORNER, CORNER))
                .into_styled(outline)
                .draw(target)
                .map_err(Error::Display)?;
        }

        if let Err(err) = self.draw_current(&model.current, target) {
            log::warn!("current-conditions region failed: {err:?}");
            self.draw_region_error(self.regions.current, target)?;
        }
        if let Err(err) = self.draw_air(model.air.as_ref(), model.pollen.as_ref(), target) {
            log::warn!("air-quality region failed: {err:?}");
            self.draw_region_error(self.regions.air, target)?;
        }
        if let Err(err) = self.draw_forecast(model, target) {
            log::warn!("forecast region failed: {err:?}");
            self.draw_region_error(self.regions.forecast, target)?;
        }

        // Drawn last so it overlays the box outlines.
        icons::draw(Icon::Rocket, self.regions.badge, target).map_err(Error::Display)?;
        Ok(())
    }

    /// Full-frame placeholder used for connectivity and
    /// initialization failures.
    pub fn render_notice<D>(
        &self,
        headline: &str,
        detail: &str,
        target: &mut D,
    ) -> Result<(), Error<D::Error>>
    where
        D: DrawTarget<Color = C>,
        D::Error: core::fmt::Debug,
    {
        target.clear(C::WHITE).map_err(Error::Display)?;

        LinearLayout::vertical(
            Chain::new(Text::new(
                headline,
                Point::zero(),
                U8g2TextStyle::new(fonts::u8g2_font_spleen16x32_mf, C::RED),
            ))
            .append(Text::new(
                detail,
                Point::zero(),
                U8g2TextStyle::new(fonts::u8g2_font_spleen16x32_mf, C::BLACK),
            )),
        )
        .with_alignment(horizontal::Center)
        .with_spacing(FixedMargin(12))
        .arrange()
        .align_to(&self.canvas, horizontal::Center, vertical::Center)
        .draw(target)
        .map_err(Error::Display)?;

        let inset = self.canvas.size.width.min(self.canvas.size.height) / 8;
        let border = Rectangle::new(
            self.canvas.top_left + Point::new(inset as i32, inset as i32),
            self.canvas.size - Size::new(2 * inset, 2 * inset),
        );
        RoundedRectangle::with_equal_corners(border, Size::new(CORNER, CORNER))
            .into_styled(PrimitiveStyle::with_stroke(C::RED, 3))
            .draw(target)
            .map_err(Error::Display)
    }

    fn draw_title<D>(
        &self,
        updated_at: DateTime<FixedOffset>,
        target: &mut D,
    ) -> Result<(), Error<D::Error>>
    where
        D: DrawTarget<Color = C>,
        D::Error: core::fmt::Debug,
    {
        let band = self.regions.title;
        self.title_font.render_aligned(
            "LAUNCHPAD STATUS",
            Point::new(
                band.top_left.x + band.size.width as i32 / 2,
                band.top_left.y + 1,
            ),
            VerticalPosition::Top,
            HorizontalAlignment::Center,
            FontColor::Transparent(C::RED),
            target,
        )?;
        self.small_font.render_aligned(
            format_stamp(updated_at).as_str(),
            band.top_left + Point::new(8, 10),
            VerticalPosition::Top,
            HorizontalAlignment::Left,
            FontColor::Transparent(C::BLACK),
            target,
        )?;
        Ok(())
    }

    fn draw_region_error<D>(
        &self,
        region: Rectangle,
        target: &mut D,
    ) -> Result<(), Error<D::Error>>
    where
        D: DrawTarget<Color = C>,
        D::Error: core::fmt::Debug,
    {
        self.title_font.render_aligned(
            "ERROR!",
            region.center(),
            VerticalPosition::Center,
            HorizontalAlignment::Center,
            FontColor::Transparent(C::RED),
            target,
        )?;
        Ok(())
    }

    fn draw_current<D>(
        &self,
        current: &CurrentConditions,
        target: &mut D,
    ) -> Result<(), Error<D::Error>>
    where
        D: DrawTarget<Color = C>,
        D::Error: core::fmt::Debug,
    {
        let tl = self.regions.current.top_left;

        icons::draw(
            mapper::thermo_icon(current.feels_like_f),
            Rectangle::new(tl + Point::new(20, 8), Size::new(50, 105)),
            target,
        )
        .map_err(Error::Display)?;

        for (line, y) in [("FEELS", 118), ("LIKE", 142)] {
            self.label_font.render_aligned(
                line,
                tl + Point::new(15, y),
                VerticalPosition::Top,
                HorizontalAlignment::Left,
                FontColor::Transparent(C::BLACK),
                target,
            )?;
        }

        let temp = fmt_opt(current.feels_like_f);
        let baseline = tl + Point::new(15, 212);
        Text::new(&temp, baseline, self.big_digits)
            .draw(target)
            .map_err(Error::Display)?;
        let digits_w = temp.len() as i32 * 26 + (temp.len() as i32 - 1).max(0) * 5;
        self.label_font.render_aligned(
            "°F",
            baseline + Point::new(digits_w + 8, 0),
            VerticalPosition::Baseline,
            HorizontalAlignment::Left,
            FontColor::Transparent(C::BLACK),
            target,
        )?;

        icons::draw(
            mapper::condition_icon(current.condition, current.is_daytime),
            Rectangle::new(tl + Point::new(120, 45), Size::new(100, 100)),
            target,
        )
        .map_err(Error::Display)?;

        // Humidity and UV column on the right of the box.
        let col_x = 245;
        self.label_font.render_aligned(
            "HUMIDITY",
            tl + Point::new(col_x, 8),
            VerticalPosition::Top,
            HorizontalAlignment::Left,
            FontColor::Transparent(C::BLACK),
            target,
        )?;
        icons::draw(
            Icon::Humidity,
            Rectangle::new(tl + Point::new(col_x, 42), Size::new(40, 40)),
            target,
        )
        .map_err(Error::Display)?;
        self.title_font.render_aligned(
            format!("{}%", fmt_opt(current.humidity)).as_str(),
            tl + Point::new(col_x + 60, 46),
            VerticalPosition::Top,
            HorizontalAlignment::Left,
            FontColor::Transparent(C::BLACK),
            target,
        )?;

        self.label_font.render_aligned(
            "UV INDEX",
            tl + Point::new(col_x, 108),
            VerticalPosition::Top,
            HorizontalAlignment::Left,
            FontColor::Transparent(C::BLACK),
            target,
        )?;
        let uv_text = match current.uv_index {
            Some(v) if v >= 0.0 => (v.round() as i32).to_string(),
            _ => "--".to_string(),
        };
        self.title_font.render_aligned(
            uv_text.as_str(),
            tl + Point::new(col_x + 60, 146),
            VerticalPosition::Top,
            HorizontalAlignment::Left,
            FontColor::Transparent(mapper::uv_color::<C>(current.uv_index)),
            target,
        )?;

        Ok(())
    }

    fn draw_air<D>(
        &self,
        air: Option<&AirQuality>,
        pollen: Option<&PollenLevels>,
        target: &mut D,
    ) -> Result<(), Error<D::Error>>
    where
        D: DrawTarget<Color = C>,
        D::Error: core::fmt::Debug,
    {
        let region = self.regions.air;
        let tl = region.top_left;
        let rw = region.size.width as i32;

        for (label, y) in [("TODAY", 5), ("TOMORROW", 140)] {
            self.label_font.render_aligned(
                label,
                tl + Point::new(10, y),
                VerticalPosition::Top,
                HorizontalAlignment::Left,
                FontColor::Transparent(C::BLUE),
                target,
            )?;
        }

        let box_w = (rw * 35 / 100) as u32;
        let neutral = AirQuality::default();
        let readings = air.unwrap_or(&neutral);
        let rows = [
            (rw * 26 / 100, 25, &readings.ozone, &readings.particulate),
            (
                rw * 13 / 100,
                185,
                &readings.ozone_forecast,
                &readings.particulate_forecast,
            ),
        ];
        for (x, y, ozone, particulate) in rows {
            for (dx, caption, reading) in [
                (0, "OZONE", ozone),
                (box_w as i32 + 20, "PARTICULATES", particulate),
            ] {
                let rect = Rectangle::new(tl + Point::new(x + dx, y), Size::new(box_w, 25));
                RoundedRectangle::with_equal_corners(rect, Size::new(12, 12))
                    .into_styled(PrimitiveStyle::with_fill(mapper::aq_color::<C>(
                        reading.code,
                    )))
                    .draw(target)
                    .map_err(Error::Display)?;
                RoundedRectangle::with_equal_corners(rect, Size::new(12, 12))
                    .into_styled(PrimitiveStyle::with_stroke(C::BLACK, OUTLINE_W))
                    .draw(target)
                    .map_err(Error::Display)?;
                self.small_font.render_aligned(
                    caption,
                    rect.top_left + Point::new(box_w as i32 / 2, -18),
                    VerticalPosition::Top,
                    HorizontalAlignment::Center,
                    FontColor::Transparent(C::BLACK),
                    target,
                )?;
                if let Some(aqi) = reading.aqi {
                    self.small_font.render_aligned(
                        aqi.to_string().as_str(),
                        rect.center(),
                        VerticalPosition::Center,
                        HorizontalAlignment::Center,
                        FontColor::Transparent(C::BLACK),
                        target,
                    )?;
                }
            }
        }
        if air.is_none() {
            // Source hard-failed: strike through both reading rows.
            for y in [37, 197] {
                Line::new(tl + Point::new(30, y), tl + Point::new(rw - 30, y))
                    .into_styled(PrimitiveStyle::with_stroke(C::RED, 4))
                    .draw(target)
                    .map_err(Error::Display)?;
            }
        }

        // Allergen strip in the middle of the box.
        let start_x = rw / 11;
        let step = (rw - 2 * start_x - 40) / 3;
        let icon_y = 62;
        let allergens = [
            (Icon::Tree, "TREE"),
            (Icon::Weed, "WEED"),
            (Icon::Grass, "GRASS"),
            (Icon::Mold, "MOLD"),
        ];
        for (i, (icon, name)) in allergens.into_iter().enumerate() {
            let x = start_x + step * i as i32;
            icons::draw(
                icon,
                Rectangle::new(tl + Point::new(x, icon_y), Size::new(40, 40)),
                target,
            )
            .map_err(Error::Display)?;
            self.small_font.render_aligned(
                name,
                tl + Point::new(x + 20, icon_y + 44),
                VerticalPosition::Top,
                HorizontalAlignment::Center,
                FontColor::Transparent(C::BLACK),
                target,
            )?;
            let level = pollen
                .map(|p| match i {
                    0 => p.tree,
                    1 => p.weed,
                    2 => p.grass,
                    _ => p.mold,
                })
                .unwrap_or_default();
            let swatch = Rectangle::new(tl + Point::new(x, icon_y + 62), Size::new(40, 12));
            swatch
                .into_styled(PrimitiveStyle::with_fill(mapper::pollen_color::<C>(level)))
                .draw(target)
                .map_err(Error::Display)?;
            swatch
                .into_styled(PrimitiveStyle::with_stroke(C::BLACK, 1))
                .draw(target)
                .map_err(Error::Display)?;
        }
        if pollen.is_none() {
            // Bulletin failed: strike under the allergen icons.
            let y = icon_y + 52;
            Line::new(tl + Point::new(25, y), tl + Point::new(rw - 25, y))
                .into_styled(PrimitiveStyle::with_stroke(C::RED, 4))
                .draw(target)
                .map_err(Error::Display)?;
        }

        Ok(())
    }

    fn draw_forecast<D>(
        &self,
        model: &RenderModel,
        target: &mut D,
    ) -> Result<(), Error<D::Error>>
    where
        D: DrawTarget<Color = C>,
        D::Error: core::fmt::Debug,
    {
        let region = self.regions.forecast;
        let tl = region.top_left;
        let rw = region.size.width as i32;
        let rh = region.size.height as i32;
        let center_x = tl.x + rw / 2;

        self.label_font.render_aligned(
            "HOURLY",
            tl + Point::new(10, 5),
            VerticalPosition::Top,
            HorizontalAlignment::Left,
            FontColor::Transparent(C::BLUE),
            target,
        )?;
        self.label_font.render_aligned(
            "DAILY",
            tl + Point::new(rw - 10, 5),
            VerticalPosition::Top,
            HorizontalAlignment::Right,
            FontColor::Transparent(C::BLUE),
            target,
        )?;

        // Tri-color divider between the hourly and daily halves.
        for (dx, color) in [(-6, C::ORANGE), (-2, C::YELLOW), (2, C::RED)] {
            Line::new(
                Point::new(center_x + dx, tl.y + 50),
                Point::new(center_x + dx, tl.y + rh - 10),
            )
            .into_styled(PrimitiveStyle::with_stroke(color, 4))
            .draw(target)
            .map_err(Error::Display)?;
        }

        let hourly_step = (rw / 2 - 40) / model.hourly.len().max(1) as i32;
        for (i, slot) in model.hourly.iter().enumerate() {
            let x = 10 + hourly_step * i as i32;
            self.label_font.render_aligned(
                fmt_opt(slot.hour.map(|h| h as i32)).as_str(),
                tl + Point::new(x, 55),
                VerticalPosition::Top,
                HorizontalAlignment::Left,
                FontColor::Transparent(C::BLACK),
                target,
            )?;
            self.small_font.render_aligned(
                fmt_deg(slot.feels_like_f).as_str(),
                tl + Point::new(x, 95),
                VerticalPosition::Top,
                HorizontalAlignment::Left,
                FontColor::Transparent(C::BLACK),
                target,
            )?;
            icons::draw(
                mapper::condition_icon(slot.condition, true),
                Rectangle::new(tl + Point::new(x, 130), Size::new(30, 30)),
                target,
            )
            .map_err(Error::Display)?;
        }

        let daily_step = (rw / 2 - 70) / model.daily.len().max(1) as i32;
        for (i, slot) in model.daily.iter().enumerate() {
            let x = rw / 2 + 35 + daily_step * i as i32;
            self.label_font.render_aligned(
                slot.weekday.unwrap_or("--"),
                tl + Point::new(x, 35),
                VerticalPosition::Top,
                HorizontalAlignment::Left,
                FontColor::Transparent(C::BLACK),
                target,
            )?;
            for (caption, value, y) in [("MAX", slot.max_f, 65), ("MIN", slot.min_f, 105)] {
                self.small_font.render_aligned(
                    caption,
                    tl + Point::new(x, y),
                    VerticalPosition::Top,
                    HorizontalAlignment::Left,
                    FontColor::Transparent(C::BLACK),
                    target,
                )?;
                self.small_font.render_aligned(
                    fmt_deg(value).as_str(),
                    tl + Point::new(x, y + 20),
                    VerticalPosition::Top,
                    HorizontalAlignment::Left,
                    FontColor::Transparent(C::BLACK),
                    target,
                )?;
            }
            icons::draw(
                mapper::condition_icon(slot.condition, true),
                Rectangle::new(tl + Point::new(x, 160), Size::new(45, 45)),
                target,
            )
            .map_err(Error::Display)?;
        }

        Ok(())
    }
}

fn fmt_opt(value: Option<i32>) -> String {
    value
        .map(|v| v.to_string())
        .unwrap_or_else(|| "--".to_string())
}

fn fmt_deg(value: Option<i32>) -> String {
    format!("{}°", fmt_opt(value))
}

/// Last-updated stamp: 12-hour clock, leading zero stripped.
pub fn format_stamp(t: DateTime<FixedOffset>) -> String {
    let hour = match t.hour() % 12 {
        0 => 12,
        h => h,
    };
    let meridiem = if t.hour() < 12 { "AM" } else { "PM" };
    format!(
        "{}/{} {}:{:02} {}",
        t.month(),
        t.day(),
        hour,
        t.minute(),
        meridiem
    )
}
