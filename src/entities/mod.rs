pub mod product;
pub mod stock_in;
pub mod stock_out;
pub mod wastage;
