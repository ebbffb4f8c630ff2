//! Per-node rendering context.

use recoll_model::Entity;
use recoll_types::Record;
use serde_json::Value;

/// Where an item sits in the list at render time.
///
/// Exactly one of `first`, `middle`, `last` is true, except for a one-item
/// list where `first` and `last` both are.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    pub index: usize,
    pub first: bool,
    pub last: bool,
    pub middle: bool,
    pub even: bool,
    pub odd: bool,
}

impl Position {
    /// Position of `index` in a list of `length` items.
    pub fn new(index: usize, length: usize) -> Self {
        let first = index == 0;
        let last = index + 1 == length;
        let even = index % 2 == 0;
        Self {
            index,
            first,
            last,
            middle: !(first || last),
            even,
            odd: !even,
        }
    }
}

/// The scope handed to the host for one rendered item.
#[derive(Debug, Clone)]
pub struct ItemContext {
    alias: String,
    entity: Entity,
    position: Position,
}

impl ItemContext {
    /// Scope for `entity` rendered at `position`, exposed as `alias`.
    pub fn new(alias: impl Into<String>, entity: Entity, position: Position) -> Self {
        Self {
            alias: alias.into(),
            entity,
            position,
        }
    }

    /// Name the item is exposed under.
    pub fn alias(&self) -> &str {
        &self.alias
    }

    /// The entity behind the node.
    pub fn entity(&self) -> &Entity {
        &self.entity
    }

    /// Current state of the item's record.
    pub fn record(&self) -> Record {
        self.entity.record()
    }

    /// Positional flags at render time.
    pub fn position(&self) -> Position {
        self.position
    }

    /// Zero-based render index.
    pub fn index(&self) -> usize {
        self.position.index
    }

    /// Resolves a name the way a template would.
    ///
    /// The alias yields the record as a JSON object; `$index`, `$first`,
    /// `$last`, `$middle`, `$even` and `$odd` yield the positional fields.
    pub fn lookup(&self, name: &str) -> Option<Value> {
        let p = &self.position;
        match name {
            _ if name == self.alias => Some(self.record().into_value()),
            "$index" => Some(Value::from(p.index)),
            "$first" => Some(Value::from(p.first)),
            "$last" => Some(Value::from(p.last)),
            "$middle" => Some(Value::from(p.middle)),
            "$even" => Some(Value::from(p.even)),
            "$odd" => Some(Value::from(p.odd)),
            _ => None,
        }
    }
}
