pub mod uniswapv3_path;
pub mod uniswapv3_pool;
pub mod uniswapv3_quoter;
