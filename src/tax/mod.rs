// Tax module - Brazilian swing-trade tax engine (average cost, monthly
// resolution, loss carryforward, DARF due dates)

pub mod cost_basis;
pub mod darf;
pub mod engine;
pub mod loss_carryforward;
pub mod swing_trade;

pub use cost_basis::{Ledger, Position, SaleEvent};
pub use darf::{below_minimum, due_date, DARF_CODE};
pub use engine::{calculate, TaxReport};
pub use loss_carryforward::LossPools;
pub use swing_trade::{MonthlyBucket, MonthlyTaxResult};
