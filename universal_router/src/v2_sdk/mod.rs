pub mod uniswapv2_pool;
