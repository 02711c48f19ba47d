//! Pure Business Logic Functions
//!
//! Funktionen ohne Hardware-Dependencies (testbar!)

use rgb::RGB8;

/// Skaliert eine Farbe linear mit `level / 255`
///
/// # Beispiele
///
/// ```
/// # use rgb::RGB8;
/// # use ball_core::scale_color;
/// let green = RGB8 { r: 0, g: 255, b: 0 };
/// assert_eq!(scale_color(green, 51), RGB8 { r: 0, g: 51, b: 0 });
/// assert_eq!(scale_color(green, 0), RGB8 { r: 0, g: 0, b: 0 });
/// ```
pub fn scale_color(color: RGB8, level: u8) -> RGB8 {
    let scale = |c: u8| ((u16::from(c) * u16::from(level)) / 255) as u8;
    RGB8 {
        r: scale(color.r),
        g: scale(color.g),
        b: scale(color.b),
    }
}

/// Zählt die gedrückten Kanäle in einem Ausschnitt
pub fn count_pressed(pressed: &[bool]) -> usize {
    pressed.iter().filter(|p| **p).count()
}

/// Helligkeits-Obergrenze für `k` gedrückte Gruppen-Taster
///
/// ```
/// # use ball_core::brightness_ceiling;
/// assert_eq!(brightness_ceiling(3, 51), 153);
/// assert_eq!(brightness_ceiling(5, 51), 255);
/// ```
pub fn brightness_ceiling(pressed_count: usize, step: u8) -> u8 {
    let ceiling = pressed_count.saturating_mul(usize::from(step));
    u8::try_from(ceiling).unwrap_or(u8::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scale_color_full_level_is_identity() {
        let yellow = RGB8 {
            r: 255,
            g: 255,
            b: 0,
        };
        assert_eq!(scale_color(yellow, 255), yellow);
    }

    #[test]
    fn test_scale_color_half() {
        let red = RGB8 { r: 255, g: 0, b: 0 };
        assert_eq!(scale_color(red, 128), RGB8 { r: 128, g: 0, b: 0 });
    }

    #[test]
    fn test_count_pressed() {
        assert_eq!(count_pressed(&[true, false, true, true, false]), 3);
        assert_eq!(count_pressed(&[]), 0);
    }

    #[test]
    fn test_brightness_ceiling_scales_with_count() {
        let ceilings: [u8; 5] = core::array::from_fn(|i| brightness_ceiling(i + 1, 51));
        assert_eq!(ceilings, [51, 102, 153, 204, 255]);
        assert_eq!(brightness_ceiling(0, 51), 0);
    }

    #[test]
    fn test_brightness_ceiling_saturates() {
        assert_eq!(brightness_ceiling(6, 51), 255);
    }
}
