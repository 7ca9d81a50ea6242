pub mod persistence;
pub mod price_csv;
pub mod synthetic_prices;
