use std::convert::Infallible;

use chrono::{FixedOffset, TimeZone};
use display::model::{
    AirQuality, AqReading, CurrentConditions, DailySlot, HourlySlot, PollenLevel, PollenLevels,
    RenderModel,
};
use display::renderer::{Error, Renderer};
use embedded_graphics::{pixelcolor::Rgb888, prelude::*};
use embedded_graphics_simulator::{OutputSettingsBuilder, SimulatorDisplay, Window};

fn main() -> Result<(), Error<Infallible>> {
    let mut display = SimulatorDisplay::<Rgb888>::new(Size::new(800, 480));

    let renderer = Renderer::new(&display.bounding_box());

    let model = RenderModel {
        current: CurrentConditions {
            feels_like_f: Some(97),
            humidity: Some(58),
            uv_index: Some(8.2),
            condition: Some(801),
            is_daytime: true,
        },
        hourly: [
            (3, 95, 801),
            (4, 96, 800),
            (5, 94, 802),
            (6, 91, 802),
            (7, 88, 500),
            (8, 85, 500),
            (9, 83, 803),
            (10, 82, 804),
        ]
        .into_iter()
        .map(|(hour, temp, id)| HourlySlot {
            hour: Some(hour),
            feels_like_f: Some(temp),
            condition: Some(id),
        })
        .collect(),
        daily: [
            ("SAT", 99, 78, 800),
            ("SUN", 97, 77, 801),
            ("MON", 94, 76, 500),
            ("TUE", 90, 74, 211),
            ("WED", 92, 75, 803),
        ]
        .into_iter()
        .map(|(day, max, min, id)| DailySlot {
            weekday: Some(day),
            max_f: Some(max),
            min_f: Some(min),
            condition: Some(id),
        })
        .collect(),
        pollen: Some(PollenLevels {
            tree: PollenLevel::Low,
            weed: PollenLevel::Medium,
            grass: PollenLevel::Heavy,
            mold: PollenLevel::ExtremelyHeavy,
        }),
        air: Some(AirQuality {
            ozone: AqReading {
                aqi: Some(72),
                category: Some("Moderate".to_string()),
                code: Some(2),
            },
            particulate: AqReading {
                aqi: Some(24),
                category: Some("Good".to_string()),
                code: Some(1),
            },
            ozone_forecast: AqReading {
                aqi: Some(105),
                category: Some("Unhealthy for Sensitive Groups".to_string()),
                code: Some(3),
            },
            particulate_forecast: AqReading::default(),
        }),
    };

    let updated_at = FixedOffset::west_opt(5 * 3600)
        .unwrap()
        .with_ymd_and_hms(2025, 8, 22, 15, 30, 0)
        .unwrap();

    renderer.render(&model, updated_at, &mut display)?;

    let output_settings = OutputSettingsBuilder::new()
        .pixel_spacing(0)
        .scale(1)
        .build();
    Window::new("Status frame preview", &output_settings).show_static(&display);

    Ok(())
}
