pub mod bootstrap;
pub mod forest;
pub mod linear;
pub mod model;
