//! What an agent perceives: categorized, positioned descriptors.
//!
//! The environment hands the simulation loosely-populated [`RawDescriptor`]
//! records every tick.  [`Descriptor::from_raw`] validates each one exactly
//! once; everything downstream works with the fixed-shape [`Descriptor`].

use crate::{AgentId, Position, TargetId};

/// What kind of thing a descriptor is, as far as decision-making cares.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Category {
    /// A threat: predator, fire, hostile agent.
    Danger,
    /// Something to gather: berries, water.
    Resource,
    /// A resource that defends itself and is taken by hunting.
    Prey,
    /// Perceived but behaviorally inert.
    #[default]
    Neutral,
    /// Another agent.
    Agent,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::Danger,
        Category::Resource,
        Category::Prey,
        Category::Neutral,
        Category::Agent,
    ];

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Category::Danger   => "danger",
            Category::Resource => "resource",
            Category::Prey     => "prey",
            Category::Neutral  => "neutral",
            Category::Agent    => "agent",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── RawDescriptor ─────────────────────────────────────────────────────────────

/// A descriptor as supplied by the environment.  Every field may be absent.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RawDescriptor {
    pub id:        Option<TargetId>,
    pub category:  Option<Category>,
    pub position:  Option<Position>,
    /// Danger / resource strength.
    pub magnitude: Option<f32>,
    /// How hard the target is to take by hunting.
    pub defense:   Option<f32>,
    /// The agent this descriptor is associated with (a hostile agent's
    /// weapon, an agent's own body), used for boundary bonuses.
    pub owner:     Option<AgentId>,
}

impl RawDescriptor {
    /// A raw record with identity, category and position set.
    pub fn new(id: impl Into<TargetId>, category: Category, position: Position) -> Self {
        Self {
            id:       Some(id.into()),
            category: Some(category),
            position: Some(position),
            ..Self::default()
        }
    }

    pub fn with_magnitude(mut self, magnitude: f32) -> Self {
        self.magnitude = Some(magnitude);
        self
    }

    pub fn with_defense(mut self, defense: f32) -> Self {
        self.defense = Some(defense);
        self
    }

    pub fn with_owner(mut self, owner: AgentId) -> Self {
        self.owner = Some(owner);
        self
    }
}

// ── Descriptor ────────────────────────────────────────────────────────────────

/// A validated descriptor.  Transient: rebuilt from the environment each tick.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Descriptor {
    pub id:        TargetId,
    pub category:  Category,
    pub position:  Position,
    /// Always finite and ≥ 0.
    pub magnitude: f32,
    /// Always finite and ≥ 0.
    pub defense:   f32,
    pub owner:     Option<AgentId>,
}

impl Descriptor {
    /// Validate a raw record.
    ///
    /// Returns `None` when identity or a finite position is missing; those
    /// records cannot be tracked or located.  Every other gap is filled with a
    /// neutral default.
    pub fn from_raw(raw: &RawDescriptor) -> Option<Descriptor> {
        let id = raw.id?;
        let position = raw.position.filter(|p| p.is_finite())?;
        let magnitude = raw
            .magnitude
            .filter(|m| m.is_finite() && *m >= 0.0)
            .unwrap_or(1.0);
        let defense = raw
            .defense
            .filter(|d| d.is_finite() && *d >= 0.0)
            .unwrap_or(0.0);
        Some(Descriptor {
            id,
            category: raw.category.unwrap_or_default(),
            position,
            magnitude,
            defense,
            owner: raw.owner,
        })
    }

    /// The descriptor every living agent projects onto the others.
    pub fn for_agent(agent: AgentId, position: Position) -> Descriptor {
        Descriptor {
            id:        TargetId::Agent(agent),
            category:  Category::Agent,
            position,
            magnitude: 1.0,
            defense:   0.0,
            owner:     Some(agent),
        }
    }
}
