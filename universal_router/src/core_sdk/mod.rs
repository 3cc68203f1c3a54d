pub mod address_book;
pub mod chain;
pub mod currency;
pub mod weth9;
