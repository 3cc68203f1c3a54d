// https://uniswapv3book.com/milestone_4/path.html
// token0 (20) | fee (3) | token1 (20) | fee (3) | token2 (20) ...
use alloy::primitives::Address;

const ADDR_SIZE: usize = 20;
const FEE_SIZE: usize = 3;
const HOP_SIZE: usize = FEE_SIZE + ADDR_SIZE;
const MIN_PATH_SIZE: usize = ADDR_SIZE + HOP_SIZE;
const MAX_FEE: u32 = 0x00ff_ffff;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum V3PathError {
    #[error("malformed v3 path: {0} bytes")]
    MalformedPath(usize),

    #[error("fee {0} overflows uint24")]
    FeeOverflow(u32),

    #[error("v3 path needs one more token than fees, got {tokens} tokens and {fees} fees")]
    HopMismatch { tokens: usize, fees: usize },
}

/// A multi-hop route through V3 pools, `tokens[i] -(fees[i])-> tokens[i + 1]`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct V3Path {
    pub tokens: Vec<Address>,
    pub fees: Vec<u32>,
}

impl V3Path {
    pub fn single_hop(token_in: Address, fee: u32, token_out: Address) -> Self {
        Self {
            tokens: vec![token_in, token_out],
            fees: vec![fee],
        }
    }

    pub fn encode(&self) -> Result<Vec<u8>, V3PathError> {
        encode_path(&self.tokens, &self.fees)
    }

    pub fn decode(path: &[u8]) -> Result<Self, V3PathError> {
        if path.len() < MIN_PATH_SIZE || (path.len() - ADDR_SIZE) % HOP_SIZE != 0 {
            return Err(V3PathError::MalformedPath(path.len()));
        }
        let hops = (path.len() - ADDR_SIZE) / HOP_SIZE;
        let mut tokens = Vec::with_capacity(hops + 1);
        let mut fees = Vec::with_capacity(hops);

        tokens.push(Address::from_slice(&path[..ADDR_SIZE]));
        for hop in path[ADDR_SIZE..].chunks_exact(HOP_SIZE) {
            let fee = u32::from_be_bytes([0, hop[0], hop[1], hop[2]]);
            fees.push(fee);
            tokens.push(Address::from_slice(&hop[FEE_SIZE..]));
        }
        Ok(Self { tokens, fees })
    }
}

pub fn encode_path(path: &[Address], fees: &[u32]) -> Result<Vec<u8>, V3PathError> {
    if path.len() < 2 || path.len() != fees.len() + 1 {
        return Err(V3PathError::HopMismatch {
            tokens: path.len(),
            fees: fees.len(),
        });
    }
    let mut encoded = Vec::with_capacity(ADDR_SIZE + fees.len() * HOP_SIZE);
    encoded.extend_from_slice(path[0].as_slice());
    for (fee, token) in fees.iter().zip(&path[1..]) {
        if *fee > MAX_FEE {
            return Err(V3PathError::FeeOverflow(*fee));
        }
        encoded.extend_from_slice(&fee.to_be_bytes()[1..4]);
        encoded.extend_from_slice(token.as_slice());
    }
    Ok(encoded)
}
