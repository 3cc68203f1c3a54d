use alloy::{
    primitives::{Bytes, U256},
    sol,
    sol_types::SolCall,
};

use super::universal_router_commands::{UniversalRouterCommand, UniversalRouterError};

/// Ordered router commands for one `execute` call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouterPlan {
    pub commands: Vec<UniversalRouterCommand>,
}

impl RouterPlan {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(mut self, command: UniversalRouterCommand) -> Self {
        self.commands.push(command);
        self
    }

    pub fn command_bytes(&self) -> Vec<u8> {
        self.commands.iter().map(|c| c.command_byte()).collect()
    }

    /// `(commands, inputs)` with one input per command byte.
    pub fn encode(&self) -> Result<(Bytes, Vec<Bytes>), UniversalRouterError> {
        let inputs = self
            .commands
            .iter()
            .map(|c| c.encode_input())
            .collect::<Result<Vec<_>, _>>()?;
        Ok((self.command_bytes().into(), inputs))
    }
}

/// Decoded `execute` arguments. `deadline` is absent for the two-argument overload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodeExecuteResult {
    pub commands: Bytes,
    pub inputs: Vec<Bytes>,
    pub deadline: Option<U256>,
}

impl DecodeExecuteResult {
    pub fn plan(&self) -> Result<RouterPlan, UniversalRouterError> {
        let commands = self
            .commands
            .iter()
            .zip(&self.inputs)
            .map(|(command, input)| UniversalRouterCommand::decode(*command, input))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(RouterPlan { commands })
    }
}

/// `execute(bytes,bytes[],uint256)` calldata.
pub fn build_execute_calldata(plan: &RouterPlan, deadline: u64) -> Result<Bytes, UniversalRouterError> {
    sol! {
        #[allow(missing_docs)]
        function execute(bytes calldata commands, bytes[] calldata inputs, uint256 deadline) external payable;
    }
    let (commands, inputs) = plan.encode()?;
    let call = executeCall::new((commands, inputs, U256::from(deadline)));
    Ok(call.abi_encode().into())
}

/// Accepts calldata of either `execute` overload.
pub fn execute_decode(data: &[u8]) -> Result<DecodeExecuteResult, UniversalRouterError> {
    mod with_deadline {
        alloy::sol! {
            #[allow(missing_docs)]
            function execute(bytes calldata commands, bytes[] calldata inputs, uint256 deadline) external payable;
        }
    }
    mod without_deadline {
        alloy::sol! {
            #[allow(missing_docs)]
            function execute(bytes calldata commands, bytes[] calldata inputs) external payable;
        }
    }

    let decoded = if data.starts_with(&with_deadline::executeCall::SELECTOR) {
        let call = with_deadline::executeCall::abi_decode(data, true)
            .map_err(|e| UniversalRouterError::AbiDecode(e.to_string()))?;
        DecodeExecuteResult {
            commands: call.commands,
            inputs: call.inputs,
            deadline: Some(call.deadline),
        }
    } else if data.starts_with(&without_deadline::executeCall::SELECTOR) {
        let call = without_deadline::executeCall::abi_decode(data, true)
            .map_err(|e| UniversalRouterError::AbiDecode(e.to_string()))?;
        DecodeExecuteResult {
            commands: call.commands,
            inputs: call.inputs,
            deadline: None,
        }
    } else {
        // bare arguments without a selector
        match with_deadline::executeCall::abi_decode_raw(data, true) {
            Ok(call) => DecodeExecuteResult {
                commands: call.commands,
                inputs: call.inputs,
                deadline: Some(call.deadline),
            },
            Err(_) => {
                let call = without_deadline::executeCall::abi_decode_raw(data, true)
                    .map_err(|e| UniversalRouterError::InvalidPayload(e.to_string()))?;
                DecodeExecuteResult {
                    commands: call.commands,
                    inputs: call.inputs,
                    deadline: None,
                }
            }
        }
    };

    if decoded.commands.len() != decoded.inputs.len() {
        return Err(UniversalRouterError::InvalidPayload(format!(
            "{} commands with {} inputs",
            decoded.commands.len(),
            decoded.inputs.len()
        )));
    }
    Ok(decoded)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::universal_router_sdk::universal_router_commands::{
        UnwrapWethParams, V2SwapExactInParams, WrapEthParams, ADDRESS_THIS,
    };
    use alloy::{hex, primitives::Address};
    use std::str::FromStr;

    // https://etherscan.io/tx/0x77e26337061aee5cb227c69deb6121872fc38fbe7576428d8927c4ca890acf3d
    pub(crate) const TRUMP_EXECUTE: &str = "3593564c000000000000000000000000000000000000000000000000000000000000006000000000000000000000000000000000000000000000000000000000000000a000000000000000000000000000000000000000000000000000000000672ae97e00000000000000000000000000000000000000000000000000000000000000020b080000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000002000000000000000000000000000000000000000000000000000000000000004000000000000000000000000000000000000000000000000000000000000000a0000000000000000000000000000000000000000000000000000000000000004000000000000000000000000000000000000000000000000000000000000000020000000000000000000000000000000000000000000000004563918244f4000000000000000000000000000000000000000000000000000000000000000001000000000000000000000000008de3459add8281882cf7b05f474f6e6fcf5909f60000000000000000000000000000000000000000000000004563918244f40000000000000000000000000000000000000000000000000000000002c783af9a1a00000000000000000000000000000000000000000000000000000000000000a000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000002000000000000000000000000c02aaa39b223fe8d0a0e5c4f27ead9083c756cc2000000000000000000000000576e2bed8f7b46d34016198911cdf9886f78bea7";

    fn trump_plan() -> RouterPlan {
        RouterPlan::new()
            .add(UniversalRouterCommand::WrapEth(WrapEthParams {
                recipient: ADDRESS_THIS,
                amount: U256::from(5000000000000000000u128),
            }))
            .add(UniversalRouterCommand::V2SwapExactIn(V2SwapExactInParams {
                recipient: Address::from_str("0x8De3459add8281882cf7b05f474F6E6fCf5909f6")
                    .unwrap(),
                amount_in: U256::from(5000000000000000000u128),
                min_amount_out: U256::from(3055931071002u128),
                path: vec![
                    Address::from_str("0xC02aaA39b223FE8D0A0e5C4F27eAD9083C756Cc2").unwrap(),
                    Address::from_str("0x576e2BeD8F7b46D34016198911Cdf9886f78bea7").unwrap(),
                ],
                payer_is_user: false,
            }))
    }

    #[test]
    fn test_build_execute_calldata_trump() {
        let data = build_execute_calldata(&trump_plan(), 1730865534).unwrap();
        assert_eq!(TRUMP_EXECUTE, hex::encode(&data));
    }

    #[test]
    fn test_execute_decode_trump() {
        let decoded = execute_decode(&hex::decode(TRUMP_EXECUTE).unwrap()).unwrap();
        assert_eq!(decoded.commands.to_vec(), vec![0x0b, 0x08]);
        assert_eq!(decoded.deadline, Some(U256::from(1730865534u64)));
        assert_eq!(decoded.plan().unwrap(), trump_plan());
    }

    #[test]
    fn test_execute_decode_without_deadline() {
        sol! {
            #[allow(missing_docs)]
            function execute(bytes calldata commands, bytes[] calldata inputs) external payable;
        }
        let plan = RouterPlan::new().add(UniversalRouterCommand::UnwrapWeth(UnwrapWethParams {
            recipient: Address::repeat_byte(7),
            min_amount_out: U256::from(1u64),
        }));
        let (commands, inputs) = plan.encode().unwrap();
        let data = executeCall::new((commands, inputs)).abi_encode();
        let decoded = execute_decode(&data).unwrap();
        assert_eq!(decoded.deadline, None);
        assert_eq!(decoded.plan().unwrap(), plan);

        // bare arguments, selector stripped
        let decoded = execute_decode(&data[4..]).unwrap();
        assert_eq!(decoded.plan().unwrap(), plan);
    }

    #[test]
    fn test_execute_decode_rejects_length_mismatch() {
        sol! {
            #[allow(missing_docs)]
            function execute(bytes calldata commands, bytes[] calldata inputs, uint256 deadline) external payable;
        }
        let data = executeCall::new((
            Bytes::from(vec![0x0b, 0x08]),
            vec![Bytes::new()],
            U256::ZERO,
        ))
        .abi_encode();
        assert!(matches!(
            execute_decode(&data),
            Err(UniversalRouterError::InvalidPayload(_))
        ));
    }

    #[test]
    fn test_execute_decode_rejects_garbage() {
        assert!(execute_decode(&[0xde, 0xad, 0xbe, 0xef]).is_err());
    }
}
