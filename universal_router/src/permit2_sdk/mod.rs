pub mod allowance;
