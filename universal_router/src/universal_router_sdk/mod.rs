pub mod swap_result;
pub mod universal_router_client;
pub mod universal_router_commands;
pub mod universal_router_decoder;
pub mod universal_router_execute;
pub mod universal_router_swap;
