//! The village: berry bushes that regrow, a wandering deer herd and a wolf
//! circling the camp.

use ssd_core::{Category, ObjectId, Position, RawDescriptor, SimRng, TargetId, Tick};
use ssd_sim::{Environment, OutcomeEvent};
use tracing::debug;

// ── Layout ────────────────────────────────────────────────────────────────────

/// One tick is one hour of village life.
pub const TICKS_PER_DAY:  u64 = 24;
/// Side of the square map.
pub const MAP_SIZE:       f32 = 40.0;
pub const CAMP:           Position = Position { x: 20.0, y: 20.0 };
const BUSH_FOOD:          f32 = 3.0;
const DEER_COUNT:         usize = 3;
const DEER_DEFENSE:       f32 = 1.0;
const DEER_STEP:          f32 = 0.6;
const DEER_RESPAWN_TICKS: u64 = 48;
const WOLF_RADIUS:        f32 = 14.0;
const WOLF_MAGNITUDE:     f32 = 1.5;
/// Radians per tick.
const WOLF_SPEED:         f32 = 0.05;

struct Bush {
    id:       ObjectId,
    position: Position,
    food:     f32,
}

struct Deer {
    id:       ObjectId,
    position: Position,
}

pub struct Village {
    rng:       SimRng,
    bushes:    Vec<Bush>,
    herd:      Vec<Deer>,
    /// Ticks at which a captured deer is replaced.
    respawns:  Vec<Tick>,
    wolf:      ObjectId,
    next_id:   u32,
    pub captures: usize,
    pub meals:    usize,
}

impl Village {
    pub fn new(seed: u64) -> Self {
        let mut v = Self {
            rng:      SimRng::new(seed ^ 0x7111_a9e5),
            bushes:   Vec::new(),
            herd:     Vec::new(),
            respawns: Vec::new(),
            wolf:     ObjectId(0),
            next_id:  1,
            captures: 0,
            meals:    0,
        };
        for (x, y) in [(8.0, 10.0), (12.0, 30.0), (30.0, 8.0), (32.0, 31.0), (22.0, 24.0)] {
            let id = v.fresh_id();
            v.bushes.push(Bush { id, position: Position::new(x, y), food: BUSH_FOOD });
        }
        for _ in 0..DEER_COUNT {
            v.spawn_deer();
        }
        v
    }

    pub fn deer_count(&self) -> usize {
        self.herd.len()
    }

    fn fresh_id(&mut self) -> ObjectId {
        let id = ObjectId(self.next_id);
        self.next_id += 1;
        id
    }

    fn random_position(&mut self) -> Position {
        Position::new(self.rng.gen_range(0.0..MAP_SIZE), self.rng.gen_range(0.0..MAP_SIZE))
    }

    fn spawn_deer(&mut self) {
        let id = self.fresh_id();
        let position = self.random_position();
        self.herd.push(Deer { id, position });
    }

    fn wolf_position(tick: Tick) -> Position {
        let angle = tick.0 as f32 * WOLF_SPEED;
        CAMP.offset(WOLF_RADIUS * angle.cos(), WOLF_RADIUS * angle.sin())
    }

    fn advance(&mut self, tick: Tick) {
        if tick.0 > 0 && tick.0.is_multiple_of(TICKS_PER_DAY) {
            for b in &mut self.bushes {
                b.food = BUSH_FOOD;
            }
        }

        let due = self.respawns.iter().filter(|t| **t <= tick).count();
        self.respawns.retain(|t| *t > tick);
        for _ in 0..due {
            self.spawn_deer();
        }

        for i in 0..self.herd.len() {
            let dx = self.rng.gen_range(-DEER_STEP..=DEER_STEP);
            let dy = self.rng.gen_range(-DEER_STEP..=DEER_STEP);
            let p = self.herd[i].position.offset(dx, dy);
            self.herd[i].position = Position::new(p.x.clamp(0.0, MAP_SIZE), p.y.clamp(0.0, MAP_SIZE));
        }
    }
}

impl Environment for Village {
    fn descriptors(&mut self, tick: Tick) -> Vec<RawDescriptor> {
        self.advance(tick);

        let mut out = Vec::with_capacity(self.bushes.len() + self.herd.len() + 1);
        out.extend(
            self.bushes
                .iter()
                .filter(|b| b.food > 0.0)
                .map(|b| RawDescriptor::new(b.id, Category::Resource, b.position).with_magnitude(b.food)),
        );
        out.extend(self.herd.iter().map(|d| {
            RawDescriptor::new(d.id, Category::Prey, d.position)
                .with_magnitude(1.0)
                .with_defense(DEER_DEFENSE)
        }));
        out.push(
            RawDescriptor::new(self.wolf, Category::Danger, Self::wolf_position(tick))
                .with_magnitude(WOLF_MAGNITUDE),
        );
        out
    }

    fn on_outcomes(&mut self, tick: Tick, events: &[OutcomeEvent]) {
        for e in events {
            match e {
                OutcomeEvent::Foraged { resource, amount, .. } => {
                    if let Some(b) = self.bushes.iter_mut().find(|b| *resource == TargetId::Object(b.id)) {
                        b.food = (b.food - amount).max(0.0);
                        self.meals += 1;
                    }
                }
                OutcomeEvent::PreyCaptured { prey, hunters, .. } => {
                    let before = self.herd.len();
                    self.herd.retain(|d| *prey != TargetId::Object(d.id));
                    if self.herd.len() < before {
                        self.captures += 1;
                        self.respawns.push(Tick(tick.0 + DEER_RESPAWN_TICKS));
                        debug!(%tick, %prey, hunters = hunters.len(), "deer taken");
                    }
                }
                _ => {}
            }
        }
    }
}
