pub mod v4_actions;
pub mod v4_planner;
pub mod v4_pool_key;
