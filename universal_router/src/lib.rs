pub mod config;
pub mod core_sdk;
pub mod permit2_sdk;
pub mod prelude;
pub mod universal_router_sdk;
pub mod v2_sdk;
pub mod v3_sdk;
pub mod v4_sdk;
