use alloy::{hex, primitives::Bytes};
use serde::Serialize;
use tracing::warn;

use super::{
    universal_router_commands::{CommandType, UniversalRouterError, FLAG_ALLOW_REVERT},
    universal_router_execute::execute_decode,
};
use crate::v4_sdk::{v4_actions::ActionData, v4_planner::ActionPlan};

/// One decoded router command. Only `INFI_SWAP` carries decoded params.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommandRecord {
    pub name: String,
    pub opcode: u8,
    pub allow_revert: bool,
    pub input: Bytes,
    pub params: Option<Vec<ActionData>>,
}

/// Decodes router calldata given as hex, with or without `0x` and the `execute` selector.
///
/// Unknown commands and undecodable `INFI_SWAP` bodies do not fail the decode; they come
/// back with `params: None`.
pub fn decode_commands(payload_hex: &str) -> Result<Vec<CommandRecord>, UniversalRouterError> {
    let payload = hex::decode(payload_hex.trim())
        .map_err(|e| UniversalRouterError::InvalidPayload(e.to_string()))?;
    let execute = execute_decode(&payload)?;

    let records = execute
        .commands
        .iter()
        .zip(execute.inputs)
        .map(|(byte, input)| {
            let allow_revert = byte & FLAG_ALLOW_REVERT != 0;
            let command = CommandType::try_from(*byte);
            let name = match &command {
                Ok(command) => command.name().to_string(),
                Err(_) => format!("UNKNOWN_0x{byte:02x}"),
            };
            let params = match command {
                Ok(CommandType::InfiSwap) => match ActionPlan::decode_swap_input(&input) {
                    Ok(plan) => Some(plan.actions),
                    Err(e) => {
                        warn!(error = %e, "cannot decode INFI_SWAP input");
                        None
                    }
                },
                _ => None,
            };
            CommandRecord {
                name,
                opcode: *byte,
                allow_revert,
                input,
                params,
            }
        })
        .collect();
    Ok(records)
}
