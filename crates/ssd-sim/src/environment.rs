//! The world outside the agents: descriptor provider and outcome sink.

use ssd_core::{AgentId, Category, ObjectId, RawDescriptor, TargetId, Tick};

/// Something that happened during a tick's commit phase.
///
/// Emitted once per tick, after the commit, to [`Environment::on_outcomes`].
/// The environment decides what each event means for its objects (e.g. a
/// captured prey is removed); the simulation never waits on the answer.
#[derive(Clone, Debug, PartialEq)]
pub enum OutcomeEvent {
    /// `agent` ate from a resource.
    Foraged { agent: AgentId, resource: TargetId, amount: f32 },
    /// `agent` reached a resource another agent had already emptied this tick.
    ForageMissed { agent: AgentId, resource: TargetId },
    /// A danger reached `agent`.
    Attacked { agent: AgentId, by: TargetId, damage: f32 },
    /// `agent` fled from `from` and was not caught.
    Escaped { agent: AgentId, from: TargetId },
    /// Two agents met after one approached the other.
    Met { agent: AgentId, other: AgentId },
    PreyCaptured { prey: TargetId, hunters: Vec<AgentId>, food_each: f32 },
    PreyEscaped { prey: TargetId, hunters: Vec<AgentId> },
    /// A hunter handed part of its portion to a hungry boundary member.
    Shared { giver: AgentId, receiver: AgentId, amount: f32 },
    Died { agent: AgentId },
}

/// The descriptor provider and outcome sink a simulation runs against.
pub trait Environment {
    /// Everything that exists this tick, agents excluded (the simulation adds
    /// one descriptor per living agent itself).  Malformed records are
    /// dropped by the simulation, never by the environment.
    fn descriptors(&mut self, tick: Tick) -> Vec<RawDescriptor>;

    /// Outcomes of the tick that just committed.
    fn on_outcomes(&mut self, _tick: Tick, _events: &[OutcomeEvent]) {}
}

/// An environment with no objects at all.
pub struct EmptyWorld;

impl Environment for EmptyWorld {
    fn descriptors(&mut self, _tick: Tick) -> Vec<RawDescriptor> {
        Vec::new()
    }
}

/// A fixed set of objects.  Captured prey and fully eaten resources are
/// removed; nothing else ever changes.
#[derive(Clone, Debug, Default)]
pub struct StaticWorld {
    pub objects: Vec<RawDescriptor>,
}

impl StaticWorld {
    pub fn new(objects: Vec<RawDescriptor>) -> Self {
        Self { objects }
    }

    pub fn with(mut self, object: RawDescriptor) -> Self {
        self.objects.push(object);
        self
    }

    pub fn contains(&self, id: ObjectId) -> bool {
        self.objects.iter().any(|o| o.id == Some(TargetId::Object(id)))
    }

    fn remove(&mut self, id: TargetId) {
        self.objects.retain(|o| o.id != Some(id));
    }
}

impl Environment for StaticWorld {
    fn descriptors(&mut self, _tick: Tick) -> Vec<RawDescriptor> {
        self.objects.clone()
    }

    fn on_outcomes(&mut self, _tick: Tick, events: &[OutcomeEvent]) {
        for e in events {
            match e {
                OutcomeEvent::PreyCaptured { prey, .. } => self.remove(*prey),
                OutcomeEvent::Foraged { resource, amount, .. } => {
                    let Some(obj) = self.objects.iter_mut().find(|o| o.id == Some(*resource)) else {
                        continue;
                    };
                    if obj.category != Some(Category::Resource) {
                        continue;
                    }
                    let left = obj.magnitude.unwrap_or(1.0) - amount;
                    if left <= 0.0 {
                        self.remove(*resource);
                    } else {
                        obj.magnitude = Some(left);
                    }
                }
                _ => {}
            }
        }
    }
}
