pub mod amortization;
pub mod annuity;
pub mod fixed_income;
pub mod reserving;
pub mod simulation;
