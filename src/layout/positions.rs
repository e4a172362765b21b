//! Final position resolution.
//!
//! Combines the computed layout with caller-supplied manual positions:
//!
//! - `Wholesale`: once any manual position exists for a laid-out person, the
//!   manual map is used for the whole tree. People without an entry get no
//!   position and are reported as unplaced.
//! - `Overlay`: `manual[id]` when present, otherwise `computed[id]`.
//!
//! Manual entries for people that are not in the current snapshot are stale
//! and ignored under both policies.

use serde::Serialize;

use crate::config::PositionMode;
use crate::model::{PersonId, PositionMap};

use super::layered::LayeredResult;

/// Where the final positions came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum PositionSource {
    /// Layout engine only.
    Computed,
    /// Manual map only.
    Manual,
    /// Per-person mix of manual and computed.
    Mixed,
}

/// Positions every downstream stage draws from.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedPositions {
    /// Person → top-left card corner.
    pub positions: PositionMap,
    /// Placed people in layout order.
    pub order: Vec<PersonId>,
    /// Laid-out people left without a position.
    pub unplaced: Vec<PersonId>,
    /// Which source won.
    pub source: PositionSource,
}

/// Resolve final positions under `mode`.
pub fn resolve_positions(
    computed: &LayeredResult,
    manual: &PositionMap,
    mode: PositionMode,
) -> ResolvedPositions {
    let any_manual = computed.order.iter().any(|id| manual.contains_key(id));

    if !any_manual {
        return ResolvedPositions {
            positions: computed.positions.clone(),
            order: computed.order.clone(),
            unplaced: Vec::new(),
            source: PositionSource::Computed,
        };
    }

    let mut positions = PositionMap::new();
    let mut order = Vec::with_capacity(computed.order.len());
    let mut unplaced = Vec::new();

    match mode {
        PositionMode::Wholesale => {
            for id in &computed.order {
                match manual.get(id) {
                    Some(&position) => {
                        positions.insert(id.clone(), position);
                        order.push(id.clone());
                    }
                    None => unplaced.push(id.clone()),
                }
            }
            if !unplaced.is_empty() {
                log::debug!(
                    "manual layout active; {} people have no manual position",
                    unplaced.len()
                );
            }
            ResolvedPositions {
                positions,
                order,
                unplaced,
                source: PositionSource::Manual,
            }
        }
        PositionMode::Overlay => {
            let mut all_manual = true;
            for id in &computed.order {
                let position = match manual.get(id) {
                    Some(&position) => Some(position),
                    None => {
                        all_manual = false;
                        computed.positions.get(id).copied()
                    }
                };
                match position {
                    Some(position) => {
                        positions.insert(id.clone(), position);
                        order.push(id.clone());
                    }
                    None => unplaced.push(id.clone()),
                }
            }
            ResolvedPositions {
                positions,
                order,
                unplaced,
                source: if all_manual {
                    PositionSource::Manual
                } else {
                    PositionSource::Mixed
                },
            }
        }
    }
}
