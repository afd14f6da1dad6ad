use crate::amount::Amount;
use crate::ids::{ActorId, OperationId, TokenId};
use crate::msg::OutboundMessage;

/// Wraps the mint-policy actor that mints the protocol's counterpart MINT token.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MintPolicy(ActorId);

impl MintPolicy {
    pub fn new(id: ActorId) -> Self {
        MintPolicy(id)
    }

    /// `Mint-Request` for `amount` of `token`'s MINT counterpart, tagged with the `OperationId`.
    pub fn mint_request_msg(&self, token: TokenId, amount: Amount, operation_id: OperationId) -> OutboundMessage {
        OutboundMessage::MintRequest {
            to: self.0.clone(),
            token,
            amount,
            operation_id,
        }
    }
}
