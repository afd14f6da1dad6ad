use crate::amount::Amount;
use crate::ids::{AmmId, OperationId, TokenId};
use crate::msg::OutboundMessage;

/// Wraps the AMM instance servicing one allowed token's pair with the MINT token.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Amm(AmmId);

impl Amm {
    pub fn new(id: AmmId) -> Self {
        Amm(id)
    }

    pub fn id(&self) -> &AmmId {
        &self.0
    }

    /// `Add-Liquidity` request carrying both token quantities and the `OperationId`.
    pub fn add_liquidity_msg(
        &self,
        token: TokenId,
        token_amount: Amount,
        mint_amount: Amount,
        operation_id: OperationId,
    ) -> OutboundMessage {
        OutboundMessage::AddLiquidity {
            to: self.0.clone(),
            token,
            token_amount,
            mint_amount,
            operation_id,
        }
    }

    /// `Burn` request for `lp_tokens`, tagged with the `OperationId`.
    pub fn burn_msg(&self, lp_tokens: Amount, operation_id: OperationId) -> OutboundMessage {
        OutboundMessage::Burn {
            to: self.0.clone(),
            lp_tokens,
            operation_id,
        }
    }
}
