use std::collections::BTreeMap;

use crate::amount::Amount;
use crate::ids::{ActorId, StakerId};
use crate::msg::OutboundMessage;

/// Wraps the treasury actor that receives and forwards one `Distribute-Rewards` batch per
/// emission tick.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Treasury(ActorId);

impl Treasury {
    pub fn new(id: ActorId) -> Self {
        Treasury(id)
    }

    pub fn distribute_msg(&self, allocations: BTreeMap<StakerId, Amount>) -> OutboundMessage {
        OutboundMessage::DistributeRewards {
            to: self.0.clone(),
            allocations,
        }
    }
}
