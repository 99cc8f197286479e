//! Categorical level to color/icon mapping.
//!
//! Pure lookups, total over their documented domains: every input,
//! including absent and out-of-taxonomy values, resolves to a defined
//! color or glyph. Nothing here performs I/O or returns an error.

use crate::color::Palette;
use crate::icons::Icon;
use crate::model::PollenLevel;

/// Pollen severity to box/label color.
pub fn pollen_color<P: Palette>(level: PollenLevel) -> P {
    match level {
        PollenLevel::Low => P::GREEN,
        PollenLevel::Medium => P::YELLOW,
        PollenLevel::Heavy | PollenLevel::ExtremelyHeavy => P::RED,
        PollenLevel::Unknown => P::WHITE,
    }
}

/// AQI category bucket to box color. Absent or out-of-range buckets
/// stay neutral.
pub fn aq_color<P: Palette>(code: Option<i32>) -> P {
    match code {
        None => P::WHITE,
        Some(1) => P::GREEN,
        Some(2) => P::YELLOW,
        Some(3) => P::ORANGE,
        Some(c) if c >= 4 => P::RED,
        Some(_) => P::WHITE,
    }
}

/// UV index to value color. Black is the sentinel for an absent or
/// negative reading, distinct from a valid low one. Thresholds apply
/// to the index rounded to the nearest integer.
pub fn uv_color<P: Palette>(uvi: Option<f32>) -> P {
    let uvi = match uvi {
        None => return P::BLACK,
        Some(v) if v < 0.0 => return P::BLACK,
        Some(v) => v.round() as i32,
    };
    match uvi {
        i32::MIN..=2 => P::GREEN,
        3..=5 => P::YELLOW,
        6..=7 => P::ORANGE,
        _ => P::RED,
    }
}

/// Thermometer glyph variant by apparent temperature.
pub fn thermo_icon(feels_like_f: Option<i32>) -> Icon {
    match feels_like_f {
        Some(t) if t > 85 => Icon::ThermoHot,
        Some(t) if t < 50 => Icon::ThermoCold,
        _ => Icon::ThermoMild,
    }
}

/// Provider condition code to glyph. Codes outside the documented
/// taxonomy fall back to an explicit placeholder glyph.
pub fn condition_icon(code: Option<u32>, is_daytime: bool) -> Icon {
    let code = match code {
        Some(c) => c,
        None => return Icon::Unknown,
    };
    match code {
        800 => {
            if is_daytime {
                Icon::Clear
            } else {
                Icon::ClearNight
            }
        }
        200..=299 => Icon::Thunderstorm,
        300..=399 => Icon::LightRain,
        500..=599 => Icon::Rain,
        600..=699 => Icon::Snow,
        700..=799 => Icon::Atmosphere,
        801 | 802 => {
            if is_daytime {
                Icon::PartlyCloudy
            } else {
                Icon::PartlyCloudyNight
            }
        }
        803 | 804 => Icon::MostlyCloudy,
        _ => Icon::Unknown,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::PanelColor;

    #[test]
    fn pollen_colors_cover_taxonomy() {
        for (text, expected) in [
            ("low", PanelColor::Green),
            ("LOW", PanelColor::Green),
            ("medium", PanelColor::Yellow),
            ("heavy", PanelColor::Red),
            ("Extremely Heavy", PanelColor::Red),
            ("", PanelColor::White),
            ("no-such-level", PanelColor::White),
        ] {
            assert_eq!(
                pollen_color::<PanelColor>(PollenLevel::parse(text)),
                expected,
                "input {text:?}"
            );
        }
    }

    #[test]
    fn aq_codes_of_four_and_above_are_red() {
        assert_eq!(aq_color::<PanelColor>(None), PanelColor::White);
        assert_eq!(aq_color::<PanelColor>(Some(1)), PanelColor::Green);
        assert_eq!(aq_color::<PanelColor>(Some(2)), PanelColor::Yellow);
        assert_eq!(aq_color::<PanelColor>(Some(3)), PanelColor::Orange);
        for code in [4, 5, 10] {
            assert_eq!(aq_color::<PanelColor>(Some(code)), PanelColor::Red);
        }
        assert_eq!(aq_color::<PanelColor>(Some(0)), PanelColor::White);
        assert_eq!(aq_color::<PanelColor>(Some(-1)), PanelColor::White);
    }

    #[test]
    fn uv_sentinels_and_rounding() {
        assert_eq!(uv_color::<PanelColor>(None), PanelColor::Black);
        assert_eq!(uv_color::<PanelColor>(Some(-5.0)), PanelColor::Black);
        assert_eq!(uv_color::<PanelColor>(Some(2.4)), PanelColor::Green);
        assert_eq!(uv_color::<PanelColor>(Some(2.6)), PanelColor::Yellow);
        assert_eq!(uv_color::<PanelColor>(Some(6.0)), PanelColor::Orange);
        assert_eq!(uv_color::<PanelColor>(Some(7.5)), PanelColor::Red);
        assert_eq!(uv_color::<PanelColor>(Some(8.0)), PanelColor::Red);
        assert_eq!(uv_color::<PanelColor>(Some(11.0)), PanelColor::Red);
    }

    #[test]
    fn condition_codes_follow_leading_digit() {
        assert_eq!(condition_icon(Some(800), true), Icon::Clear);
        assert_eq!(condition_icon(Some(800), false), Icon::ClearNight);
        assert_eq!(condition_icon(Some(212), true), Icon::Thunderstorm);
        assert_eq!(condition_icon(Some(321), false), Icon::LightRain);
        assert_eq!(condition_icon(Some(502), true), Icon::Rain);
        assert_eq!(condition_icon(Some(601), true), Icon::Snow);
        assert_eq!(condition_icon(Some(741), true), Icon::Atmosphere);
        assert_eq!(condition_icon(Some(801), true), Icon::PartlyCloudy);
        assert_eq!(condition_icon(Some(802), false), Icon::PartlyCloudyNight);
        assert_eq!(condition_icon(Some(803), false), Icon::MostlyCloudy);
        assert_eq!(condition_icon(Some(804), true), Icon::MostlyCloudy);
        assert_eq!(condition_icon(Some(999), true), Icon::Unknown);
        assert_eq!(condition_icon(None, true), Icon::Unknown);
    }

    #[test]
    fn thermometer_variants() {
        assert_eq!(thermo_icon(Some(90)), Icon::ThermoHot);
        assert_eq!(thermo_icon(Some(49)), Icon::ThermoCold);
        assert_eq!(thermo_icon(Some(70)), Icon::ThermoMild);
        assert_eq!(thermo_icon(None), Icon::ThermoMild);
    }
}
