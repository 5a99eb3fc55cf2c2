pub mod category;
pub mod fund;
pub mod subscores;
pub mod subweights;
pub mod weights;
