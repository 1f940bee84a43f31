use crate::error::SimError;
use crate::player::PlayerState;
use crate::vec3::{distance, Vec3};
use crate::wormhole::WormholeField;
use wormhole_shared::config::{Galaxy, TeleportTargetConfig};

/// A fixed point of interest the player can jump to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TeleportTarget {
    pub position: Vec3,
    /// Point to face after arrival
    pub look_at: Vec3,
    pub galaxy: Galaxy,
}

impl From<&TeleportTargetConfig> for TeleportTarget {
    fn from(config: &TeleportTargetConfig) -> Self {
        Self {
            position: config.position,
            look_at: config.look_at,
            galaxy: config.galaxy,
        }
    }
}

/// Cycles the player through points of interest, treating the wormhole as the only
/// path between the two galaxies.
#[derive(Debug, Clone, Default)]
pub struct Teleporter {
    targets: Vec<TeleportTarget>,
}

impl Teleporter {
    pub fn new(targets: Vec<TeleportTarget>) -> Self {
        Self { targets }
    }

    pub fn from_config(targets: &[TeleportTargetConfig]) -> Self {
        Self::new(targets.iter().map(TeleportTarget::from).collect())
    }

    pub fn targets(&self) -> &[TeleportTarget] {
        &self.targets
    }

    /// Travel distance from the player to `target`. Targets in the other galaxy are
    /// reached by flying to the wormhole and on from there.
    pub fn travel_distance(
        player: &PlayerState,
        target: &TeleportTarget,
        field: &WormholeField,
    ) -> f64 {
        if target.galaxy == player.galaxy {
            distance(player.position, target.position)
        } else {
            distance(player.position, field.center()) + distance(target.position, field.center())
        }
    }

    /// Index of the target nearest to the player. Ties go to the earlier target.
    pub fn closest_target_index(
        &self,
        player: &PlayerState,
        field: &WormholeField,
    ) -> Option<usize> {
        let mut best: Option<(usize, f64)> = None;
        for (i, target) in self.targets.iter().enumerate() {
            let d = Self::travel_distance(player, target, field);
            if best.map_or(true, |(_, best_d)| d < best_d) {
                best = Some((i, d));
            }
        }
        best.map(|(i, _)| i)
    }

    /// Index of the target after the nearest one, wrapping around.
    pub fn next_target_index(
        &self,
        player: &PlayerState,
        field: &WormholeField,
    ) -> Result<usize, SimError> {
        let closest = self
            .closest_target_index(player, field)
            .ok_or(SimError::NoTeleportTargets)?;
        Ok((closest + 1) % self.targets.len())
    }

    /// Jump to the target after the nearest one. Returns the index jumped to.
    pub fn teleport_next(
        &self,
        player: &mut PlayerState,
        field: &WormholeField,
    ) -> Result<usize, SimError> {
        let next = self.next_target_index(player, field)?;
        Self::teleport_to(player, &self.targets[next]);
        Ok(next)
    }

    /// Place the player at `target`, in its galaxy, facing its look-at point.
    pub fn teleport_to(player: &mut PlayerState, target: &TeleportTarget) {
        player.position = target.position;
        player.galaxy = target.galaxy;
        player.look_at(target.look_at);
    }
}
