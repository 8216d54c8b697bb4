use clima_core::{Screen, Status};

/// Terminal stand-in for the bundled icon images.
fn icon_symbol(icon: &str) -> &'static str {
    match icon {
        "tstorm1" | "tstorm3" => "⛈",
        "light_rain" => "🌦",
        "shower3" => "🌧",
        "snow4" => "❄",
        "fog" => "🌫",
        "sunny" => "☀",
        "cloudy2" => "☁",
        _ => "?",
    }
}

pub fn format_screen(screen: &Screen) -> String {
    let display = &screen.display;
    let mut out = format!("{}  {}\n", icon_symbol(&display.icon), display.city);

    if !display.temperature.is_empty() {
        out.push_str(&format!("   {}\n", display.temperature));
    }

    let mut footer = format!("   [{}]", screen.button_label());
    match (screen.status, screen.updated_at) {
        (Status::Failed(_), _) => {}
        (_, Some(at)) => footer.push_str(&format!("  updated {}", at.format("%H:%M"))),
        (_, None) => {}
    }
    out.push_str(&footer);
    out.push('\n');
    out
}

pub fn print_screen(screen: &Screen) {
    println!();
    print!("{}", format_screen(screen));
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Local, TimeZone};
    use clima_core::{Display, DisplayUnit, FailureKind};

    fn tokyo_screen() -> Screen {
        Screen {
            display: Display {
                city: "Tokyo".into(),
                temperature: "91°".into(),
                icon: "sunny".into(),
            },
            unit: DisplayUnit::Fahrenheit,
            status: Status::Ready,
            updated_at: Local.with_ymd_and_hms(2026, 10, 16, 14, 2, 0).single(),
        }
    }

    #[test]
    fn ready_screen_shows_everything() {
        let text = format_screen(&tokyo_screen());

        assert_eq!(text, "☀  Tokyo\n   91°\n   [C]  updated 14:02\n");
    }

    #[test]
    fn unavailable_screen_has_no_temperature_line() {
        let screen = Screen {
            display: Display::weather_unavailable(),
            status: Status::Failed(FailureKind::DataUnavailable),
            ..Screen::default()
        };

        assert_eq!(format_screen(&screen), "?  Weather Unavailable\n   [C]\n");
    }

    #[test]
    fn failure_hides_update_time() {
        let mut screen = tokyo_screen();
        screen.display.city = "No Connection".into();
        screen.status = Status::Failed(FailureKind::ConnectionFailed);

        let text = format_screen(&screen);
        assert!(text.contains("No Connection"));
        assert!(text.contains("91°"));
        assert!(!text.contains("updated"));
    }

    #[test]
    fn every_icon_has_a_symbol() {
        for icon in [
            "tstorm1", "light_rain", "shower3", "snow4", "fog", "tstorm3", "sunny", "cloudy2",
        ] {
            assert_ne!(icon_symbol(icon), "?", "{icon}");
        }
        assert_eq!(icon_symbol("dunno"), "?");
    }
}
