pub use wormhole_shared::protocol::*;

use crate::wormhole::Crossing;

/// Wire form of a crossing, reported at the exit position.
pub fn crossing_msg(crossing: &Crossing) -> CrossingMsg {
    CrossingMsg {
        position: crossing.exit_position.to_array().map(round4),
        galaxy: crossing.galaxy,
    }
}
