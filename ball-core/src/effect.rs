//! Licht-Effekte für den LED-Strip
//!
//! Genau ein `EffectMode` ist aktiv. Der `EffectRenderer` liefert nur dann
//! einen neuen Frame, wenn die Periode des Effekts abgelaufen ist - sonst
//! `None` und der Aufrufer schreibt nichts auf den Strip.

use rgb::RGB8;

use crate::logic::scale_color;
use crate::types::EffectKind;

/// Der aktive Licht-Effekt mit seinen Parametern
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EffectMode {
    /// Alle Pixel aus
    Off,
    /// Ganzer Strip wechselt alle `period_ms` zwischen zwei Farben
    FlashAlternate {
        color_a: RGB8,
        color_b: RGB8,
        period_ms: u64,
    },
    /// Ping-Pong Helligkeitsrampe zwischen `min_level` und `max_level`
    Breathe {
        base_color: RGB8,
        min_level: u8,
        max_level: u8,
        step: u8,
        tick_ms: u64,
    },
}

impl EffectMode {
    pub fn kind(&self) -> EffectKind {
        match self {
            EffectMode::Off => EffectKind::Off,
            EffectMode::FlashAlternate { .. } => EffectKind::FlashAlternate,
            EffectMode::Breathe { .. } => EffectKind::Breathe,
        }
    }

    /// Gleicher Effekt, unabhängig von `max_level`
    ///
    /// Nur ein Wechsel der Identität setzt die Phase zurück. Eine neue
    /// Obergrenze allein lässt die Rampe weiterlaufen.
    pub fn same_effect(&self, other: &EffectMode) -> bool {
        match (self, other) {
            (
                EffectMode::Breathe {
                    base_color,
                    min_level,
                    step,
                    tick_ms,
                    ..
                },
                EffectMode::Breathe {
                    base_color: other_color,
                    min_level: other_min,
                    step: other_step,
                    tick_ms: other_tick,
                    ..
                },
            ) => {
                base_color == other_color
                    && min_level == other_min
                    && step == other_step
                    && tick_ms == other_tick
            }
            (a, b) => a == b,
        }
    }
}

/// Richtung der Atem-Rampe
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RampDirection {
    Ascending,
    Descending,
}

/// Phase des aktiven Effekts
///
/// Gehört ausschließlich dem `EffectRenderer`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderState {
    active: Option<EffectMode>,
    level: u8,
    direction: RampDirection,
    alternate: bool,
    last_update_ms: u64,
}

impl RenderState {
    const fn new() -> Self {
        Self {
            active: None,
            level: 0,
            direction: RampDirection::Ascending,
            alternate: false,
            last_update_ms: 0,
        }
    }

    pub fn effect(&self) -> Option<EffectMode> {
        self.active
    }

    pub fn level(&self) -> u8 {
        self.level
    }

    pub fn direction(&self) -> RampDirection {
        self.direction
    }

    /// `true` wenn der Flash gerade `color_b` zeigt
    pub fn is_alternate(&self) -> bool {
        self.alternate
    }

    pub fn last_update_ms(&self) -> u64 {
        self.last_update_ms
    }

    fn advance_ramp(&mut self, min_level: u8, max_level: u8, step: u8) {
        let max_level = max_level.max(min_level);
        let level = i16::from(self.level.clamp(min_level, max_level));
        let (min, max, step) = (
            i16::from(min_level),
            i16::from(max_level),
            i16::from(step),
        );

        let next = match self.direction {
            RampDirection::Ascending => level + step,
            RampDirection::Descending => level - step,
        };

        let next = if next >= max {
            self.direction = RampDirection::Descending;
            max
        } else if next <= min {
            self.direction = RampDirection::Ascending;
            min
        } else {
            next
        };

        // next liegt in [min, max] ⊆ [0, 255]
        self.level = next as u8;
    }
}

impl Default for RenderState {
    fn default() -> Self {
        Self::new()
    }
}

/// Ein kompletter Frame: der ganze Strip in einer Farbe
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelFrame {
    color: RGB8,
}

impl PixelFrame {
    pub fn color(&self) -> RGB8 {
        self.color
    }

    /// Füllt den Pixel-Buffer vollständig mit der Frame-Farbe
    pub fn fill(&self, pixels: &mut [RGB8]) {
        pixels.fill(self.color);
    }
}

/// Rendert den aktiven `EffectMode`
#[derive(Debug, Clone, Default)]
pub struct EffectRenderer {
    state: RenderState,
}

impl EffectRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &RenderState {
        &self.state
    }

    /// Ein Render-Tick
    ///
    /// Beim Effektwechsel wird die Phase zurückgesetzt und sofort ein Frame
    /// der Anfangsphase geliefert. Danach gibt es genau einen Frame pro
    /// abgelaufener Periode.
    pub fn tick(&mut self, mode: &EffectMode, now_ms: u64) -> Option<PixelFrame> {
        let entered = match self.state.active {
            Some(active) => !active.same_effect(mode),
            None => true,
        };

        if entered {
            self.enter(mode, now_ms);
            return Some(self.frame(mode));
        }

        // max_level darf sich ohne Phasen-Reset ändern
        self.state.active = Some(*mode);
        let elapsed_ms = now_ms.saturating_sub(self.state.last_update_ms);

        match *mode {
            EffectMode::Off => None,
            EffectMode::FlashAlternate { period_ms, .. } => {
                if elapsed_ms < period_ms {
                    return None;
                }
                self.state.alternate = !self.state.alternate;
                self.state.last_update_ms = now_ms;
                Some(self.frame(mode))
            }
            EffectMode::Breathe {
                min_level,
                max_level,
                step,
                tick_ms,
                ..
            } => {
                if elapsed_ms < tick_ms {
                    return None;
                }
                self.state.advance_ramp(min_level, max_level, step);
                self.state.last_update_ms = now_ms;
                Some(self.frame(mode))
            }
        }
    }

    fn enter(&mut self, mode: &EffectMode, now_ms: u64) {
        let level = match *mode {
            EffectMode::Breathe { min_level, .. } => min_level,
            _ => 0,
        };
        self.state = RenderState {
            active: Some(*mode),
            level,
            direction: RampDirection::Ascending,
            alternate: false,
            last_update_ms: now_ms,
        };
    }

    fn frame(&self, mode: &EffectMode) -> PixelFrame {
        let color = match *mode {
            EffectMode::Off => RGB8::default(),
            EffectMode::FlashAlternate {
                color_a, color_b, ..
            } => {
                if self.state.alternate {
                    color_b
                } else {
                    color_a
                }
            }
            EffectMode::Breathe { base_color, .. } => scale_color(base_color, self.state.level),
        };
        PixelFrame { color }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: RGB8 = RGB8 { r: 255, g: 0, b: 0 };
    const GREEN: RGB8 = RGB8 { r: 0, g: 255, b: 0 };
    const YELLOW: RGB8 = RGB8 {
        r: 255,
        g: 255,
        b: 0,
    };

    fn flash() -> EffectMode {
        EffectMode::FlashAlternate {
            color_a: RED,
            color_b: YELLOW,
            period_ms: 500,
        }
    }

    fn breathe(color: RGB8, max_level: u8) -> EffectMode {
        EffectMode::Breathe {
            base_color: color,
            min_level: 0,
            max_level,
            step: 5,
            tick_ms: 30,
        }
    }

    #[test]
    fn test_off_renders_once() {
        let mut r = EffectRenderer::new();
        let frame = r.tick(&EffectMode::Off, 0).unwrap();
        assert_eq!(frame.color(), RGB8::default());
        assert_eq!(r.tick(&EffectMode::Off, 10), None);
        assert_eq!(r.tick(&EffectMode::Off, 10_000), None);
    }

    #[test]
    fn test_flash_toggles_every_period() {
        let mut r = EffectRenderer::new();
        assert_eq!(r.tick(&flash(), 0).unwrap().color(), RED);
        assert_eq!(r.tick(&flash(), 499), None);
        assert_eq!(r.tick(&flash(), 500).unwrap().color(), YELLOW);
        assert!(r.state().is_alternate());
        assert_eq!(r.tick(&flash(), 900), None);
        assert_eq!(r.tick(&flash(), 1000).unwrap().color(), RED);
    }

    #[test]
    fn test_breathe_ramps_up_in_steps() {
        let mut r = EffectRenderer::new();
        let mode = breathe(GREEN, 255);
        assert_eq!(r.tick(&mode, 0).unwrap().color(), RGB8::default());
        assert_eq!(r.tick(&mode, 29), None);

        let frame = r.tick(&mode, 30).unwrap();
        assert_eq!(r.state().level(), 5);
        assert_eq!(frame.color(), RGB8 { r: 0, g: 5, b: 0 });

        r.tick(&mode, 60);
        assert_eq!(r.state().level(), 10);
    }

    #[test]
    fn test_breathe_ping_pongs_at_bounds() {
        let mut r = EffectRenderer::new();
        let mode = breathe(RED, 20);
        r.tick(&mode, 0);

        let mut levels = [0u8; 10];
        for (i, level) in levels.iter_mut().enumerate() {
            r.tick(&mode, (i as u64 + 1) * 30);
            *level = r.state().level();
        }
        assert_eq!(levels, [5, 10, 15, 20, 15, 10, 5, 0, 5, 10]);
    }

    #[test]
    fn test_breathe_reaches_full_ceiling() {
        let mut r = EffectRenderer::new();
        let mode = breathe(RED, 255);
        r.tick(&mode, 0);
        for i in 1..=51 {
            r.tick(&mode, i * 30);
        }
        assert_eq!(r.state().level(), 255);
        assert_eq!(r.state().direction(), RampDirection::Descending);
    }

    #[test]
    fn test_mode_switch_resets_phase() {
        let mut r = EffectRenderer::new();
        let red = breathe(RED, 255);
        r.tick(&red, 0);
        for i in 1..=60 {
            r.tick(&red, i * 30);
        }
        assert_ne!(r.state().level(), 0);

        r.tick(&flash(), 2000);
        let green = breathe(GREEN, 255);
        let frame = r.tick(&green, 2010).unwrap();
        assert_eq!(frame.color(), RGB8::default());
        assert_eq!(r.state().level(), 0);
        assert_eq!(r.state().direction(), RampDirection::Ascending);
    }

    #[test]
    fn test_color_change_is_a_mode_switch() {
        let mut r = EffectRenderer::new();
        let red = breathe(RED, 255);
        r.tick(&red, 0);
        r.tick(&red, 30);
        r.tick(&red, 60);
        assert_eq!(r.state().level(), 10);

        assert!(r.tick(&breathe(GREEN, 255), 70).is_some());
        assert_eq!(r.state().level(), 0);
    }

    #[test]
    fn test_max_level_change_keeps_phase_and_clamps() {
        let mut r = EffectRenderer::new();
        r.tick(&breathe(GREEN, 255), 0);
        for i in 1..=12 {
            r.tick(&breathe(GREEN, 255), i * 30);
        }
        assert_eq!(r.state().level(), 60);

        // Weniger Taster gedrückt: Obergrenze 51, kein Frame vor Ablauf der Periode
        assert_eq!(r.tick(&breathe(GREEN, 51), 370), None);
        assert_eq!(r.state().level(), 60);

        r.tick(&breathe(GREEN, 51), 390);
        assert_eq!(r.state().level(), 51);
        assert_eq!(r.state().direction(), RampDirection::Descending);
    }

    #[test]
    fn test_pixel_frame_fills_every_pixel() {
        let mut r = EffectRenderer::new();
        let frame = r.tick(&flash(), 0).unwrap();
        let mut pixels = [RGB8::default(); 8];
        frame.fill(&mut pixels);
        assert!(pixels.iter().all(|p| *p == RED));
    }

    #[test]
    fn test_same_effect_ignores_max_level_only() {
        assert!(breathe(GREEN, 51).same_effect(&breathe(GREEN, 255)));
        assert!(!breathe(GREEN, 51).same_effect(&breathe(RED, 51)));
        assert!(!flash().same_effect(&EffectMode::Off));
        assert!(EffectMode::Off.same_effect(&EffectMode::Off));
    }
}
