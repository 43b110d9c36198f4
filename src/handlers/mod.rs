pub mod drafts;
pub mod health;
pub mod orders;
pub mod products;
pub mod reports;
pub mod stock_in;
pub mod wastage;
