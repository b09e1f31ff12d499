//! Need dynamics.
//!
//! Every drive is a scalar in `[0, 1]` where higher means more pressing.
//! Drives rise on their own each tick and are relieved by outcomes (eating,
//! resting, company).  They feed the alignment selector as score bonuses.

use ssd_core::DriveConfig;

/// What the agent's body did this tick, as far as fatigue is concerned.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Activity {
    Moving,
    Resting,
    Still,
}

#[derive(Copy, Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Drives {
    pub hunger:     f32,
    pub fatigue:    f32,
    pub fear:       f32,
    pub loneliness: f32,
}

impl Drives {
    /// Advance one tick of natural drift.
    pub fn tick(&mut self, cfg: &DriveConfig, activity: Activity) {
        self.hunger += cfg.hunger_rate;
        match activity {
            Activity::Moving  => self.fatigue += cfg.fatigue_rate,
            Activity::Resting => self.fatigue -= cfg.rest_recovery,
            Activity::Still   => {}
        }
        self.fear *= cfg.fear_decay;
        self.loneliness += cfg.loneliness_rate;
        self.clamp();
    }

    /// Eat `amount` units of food.
    pub fn eat(&mut self, cfg: &DriveConfig, amount: f32) {
        self.hunger -= cfg.food_value * amount.max(0.0);
        self.clamp();
    }

    /// React to an attack of the given magnitude.
    pub fn startle(&mut self, cfg: &DriveConfig, magnitude: f32) {
        self.fear += cfg.fear_on_attack * magnitude.max(0.0);
        self.clamp();
    }

    /// Social contact clears loneliness.
    pub fn socialize(&mut self) {
        self.loneliness = 0.0;
    }

    #[inline]
    pub fn is_starving(&self) -> bool {
        self.hunger >= 1.0
    }

    fn clamp(&mut self) {
        for v in [&mut self.hunger, &mut self.fatigue, &mut self.fear, &mut self.loneliness] {
            let x = *v;
            *v = if x.is_finite() { x.clamp(0.0, 1.0) } else { 0.0 };
        }
    }
}
