//! Fixed personality traits.
//!
//! Every trait lies in `[0, 1]`.  The three social traits are centred on
//! [`Personality::NEUTRAL`]: at 0.5 they leave the drive they modulate
//! untouched, and they move it by up to ±50% at the extremes.

/// Per-agent temperament, fixed at creation.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Personality {
    /// Appetite for exploring.
    pub curiosity:      f32,
    /// Scales the pull of loneliness toward other agents.
    pub sociability:    f32,
    /// High values flee less readily.
    pub risk_tolerance: f32,
    /// Willingness to hand hunt food to hungry boundary members.
    pub empathy:        f32,
}

impl Personality {
    pub const NEUTRAL: f32 = 0.5;

    pub const PIONEER:    Self = Self::new(0.9, 0.4, 0.8, 0.5);
    pub const ADVENTURER: Self = Self::new(0.8, 0.6, 0.9, 0.4);
    pub const TRACKER:    Self = Self::new(0.6, 0.5, 0.6, 0.7);
    pub const SCHOLAR:    Self = Self::new(0.95, 0.3, 0.4, 0.8);
    pub const WARRIOR:    Self = Self::new(0.4, 0.6, 0.9, 0.5);
    pub const GUARDIAN:   Self = Self::new(0.3, 0.8, 0.7, 0.9);
    pub const HEALER:     Self = Self::new(0.5, 0.9, 0.3, 0.95);
    pub const DIPLOMAT:   Self = Self::new(0.6, 0.95, 0.4, 0.8);
    pub const FORAGER:    Self = Self::new(0.7, 0.7, 0.5, 0.6);
    pub const LEADER:     Self = Self::new(0.5, 0.9, 0.7, 0.7);
    pub const LONER:      Self = Self::new(0.8, 0.2, 0.6, 0.3);
    pub const NOMAD:      Self = Self::new(0.85, 0.4, 0.8, 0.4);

    /// The twelve village archetypes, in a fixed order.
    pub const PRESETS: [Self; 12] = [
        Self::PIONEER,
        Self::ADVENTURER,
        Self::TRACKER,
        Self::SCHOLAR,
        Self::WARRIOR,
        Self::GUARDIAN,
        Self::HEALER,
        Self::DIPLOMAT,
        Self::FORAGER,
        Self::LEADER,
        Self::LONER,
        Self::NOMAD,
    ];

    pub const fn new(curiosity: f32, sociability: f32, risk_tolerance: f32, empathy: f32) -> Self {
        Self { curiosity, sociability, risk_tolerance, empathy }
    }

    /// Neutral social traits with the given curiosity.
    pub const fn curious(curiosity: f32) -> Self {
        Self::new(curiosity, Self::NEUTRAL, Self::NEUTRAL, Self::NEUTRAL)
    }

    /// Every trait clamped into `[0, 1]`; NaN becomes neutral.
    pub fn clamped(self) -> Self {
        let unit = |v: f32, fallback: f32| if v.is_nan() { fallback } else { v.clamp(0.0, 1.0) };
        Self {
            curiosity:      unit(self.curiosity, 0.0),
            sociability:    unit(self.sociability, Self::NEUTRAL),
            risk_tolerance: unit(self.risk_tolerance, Self::NEUTRAL),
            empathy:        unit(self.empathy, Self::NEUTRAL),
        }
    }

    /// Multiplier on the loneliness bonus, in `[0.5, 1.5]`.
    #[inline]
    pub fn social_drive(&self) -> f32 {
        0.5 + self.sociability
    }

    /// Multiplier on the fear bonus, in `[0.5, 1.5]`.
    #[inline]
    pub fn caution(&self) -> f32 {
        1.5 - self.risk_tolerance
    }
}

impl Default for Personality {
    fn default() -> Self {
        Self::curious(0.0)
    }
}
