use std::sync::Arc;

use anyhow::{anyhow, bail, Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing::info;
use tracing_subscriber::EnvFilter;
use uniswap_universal_router::{core_sdk::currency::from_readable_amount, prelude::*};

#[derive(Parser, Debug)]
#[command(name = "ur-cli")]
#[command(about = "Build, send and decode Universal Router swaps")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Decode `execute` calldata into JSON command records.
    Decode(DecodeArgs),
    /// Print the id of an Infinity CL pool key.
    PoolId(PoolIdArgs),
    /// Send an exact-input swap using `UR_RPC_URL` and `UR_PRIVATE_KEY`.
    Swap(SwapArgs),
}

#[derive(Args, Debug)]
struct DecodeArgs {
    /// hex payload, `0x` and selector optional
    payload: String,
}

#[derive(Args, Debug)]
struct PoolIdArgs {
    #[arg(long)]
    currency0: Address,

    #[arg(long)]
    currency1: Address,

    #[arg(long, default_value_t = Address::ZERO)]
    hooks: Address,

    #[arg(long)]
    pool_manager: Address,

    #[arg(long)]
    fee: u32,

    #[arg(long, default_value_t = B256::ZERO)]
    parameters: B256,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
enum Version {
    V2,
    V3,
    V4,
}

#[derive(Args, Debug)]
struct SwapArgs {
    #[arg(long, value_enum)]
    version: Version,

    #[arg(long)]
    token_in: Address,

    /// other side of the V2/V3 pool
    #[arg(long, required_unless_present = "pool_id")]
    token_out: Option<Address>,

    /// V3 fee tier
    #[arg(long, default_value_t = 2500)]
    fee: u32,

    /// V4 pool id, resolved on the CL pool manager
    #[arg(long)]
    pool_id: Option<B256>,

    /// human-readable input amount
    #[arg(long)]
    amount: Decimal,

    #[arg(long, default_value_t = 18)]
    decimals: u8,

    /// raw minimum output for V2/V4
    #[arg(long, default_value_t = U256::ZERO)]
    min_out: U256,

    /// V3 slippage tolerance, 0 disables the quote
    #[arg(long, default_value_t = 0)]
    slippage_bps: u32,

    #[arg(long)]
    gas_limit: Option<u64>,
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing()?;
    let cli = Cli::parse();

    match cli.command {
        Commands::Decode(args) => handle_decode(args),
        Commands::PoolId(args) => handle_pool_id(args),
        Commands::Swap(args) => handle_swap(args).await,
    }
}

fn init_tracing() -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("uniswap_universal_router=info,ur_cli=info"))
        .context("failed to initialize tracing filter")?;
    tracing_subscriber::fmt().with_env_filter(filter).init();
    Ok(())
}

fn handle_decode(args: DecodeArgs) -> Result<()> {
    let records = decode_commands(&args.payload)?;
    println!("{}", serde_json::to_string_pretty(&records)?);
    Ok(())
}

fn handle_pool_id(args: PoolIdArgs) -> Result<()> {
    let key = PoolKeyV4 {
        currency0: args.currency0,
        currency1: args.currency1,
        hooks: args.hooks,
        pool_manager: args.pool_manager,
        fee: args.fee,
        parameters: args.parameters,
    };
    println!("{}", key.pool_id()?);
    Ok(())
}

async fn handle_swap(args: SwapArgs) -> Result<()> {
    let config = RouterConfig::from_env()?;
    let rpc_url = std::env::var("UR_RPC_URL").context("UR_RPC_URL is required for swap")?;
    let private_key =
        std::env::var("UR_PRIVATE_KEY").context("UR_PRIVATE_KEY is required for swap")?;
    let transport = connect_http(&rpc_url, &private_key)?;
    info!(chain = ?config.chain_id, sender = %transport.sender(), "connected");

    let swapper = UniversalRouterSwapper::new(Arc::new(transport), config);
    let amount_in = from_readable_amount(args.amount, args.decimals)?;
    let mut options = SwapOptionsBuilder::default();
    if let Some(gas_limit) = args.gas_limit {
        options.gas_limit(gas_limit);
    }
    let options = options.build()?;

    let result = match (args.version, args.pool_id, args.token_out) {
        (Version::V4, Some(pool_id), _) => {
            swapper
                .swap_exact_input_v4_by_pool_id(pool_id, args.token_in, amount_in, args.min_out, &options)
                .await?
        }
        (Version::V4, None, _) => bail!("--pool-id is required for v4"),
        (_, _, None) => bail!("--token-out is required for v2 and v3"),
        (Version::V2, _, Some(token_out)) => {
            let key = PoolKeyV2::sorted(args.token_in, token_out);
            swapper
                .swap_exact_input_v2(&key, args.token_in, amount_in, args.min_out, &options)
                .await?
        }
        (Version::V3, _, Some(token_out)) => {
            let fee = UniswapPoolFee::try_from(args.fee)
                .map_err(|fee| anyhow!("unsupported v3 fee tier {fee}"))?;
            let key = PoolKeyV3::sorted(args.token_in, token_out, fee.as_u32());
            swapper
                .swap_exact_input_v3(&key, args.token_in, amount_in, args.slippage_bps, &options)
                .await?
        }
    };
    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}
