//! Government fixed-income pricing: treasury bills and par bonds.

pub mod bond;
pub mod tbill;

pub use bond::{price_bond, BondInput, BondOutput, CouponPayment};
pub use tbill::{price_treasury_bill, TreasuryBillInput, TreasuryBillOutput};

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::FinCalcError;
use crate::types::ComputationOutput;
use crate::FinCalcResult;

/// Auction lot size: investments must be positive multiples of this
pub const MIN_LOT: Decimal = dec!(5000);

/// Broker handling fee charged on the purchase cost
pub(crate) const HANDLING_FEE_PCT: Decimal = dec!(0.01);

/// Withholding tax applied to coupon income
pub(crate) const WITHHOLDING_TAX: Decimal = dec!(0.15);

/// Instrument kind resolved at construction, not by runtime sniffing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "instrument", rename_all = "snake_case")]
pub enum InstrumentSpec {
    TreasuryBill(TreasuryBillInput),
    Bond(BondInput),
}

#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum PricedInstrument {
    TreasuryBill(ComputationOutput<TreasuryBillOutput>),
    Bond(ComputationOutput<BondOutput>),
}

/// Price whichever instrument the spec carries.
pub fn price_instrument(spec: &InstrumentSpec) -> FinCalcResult<PricedInstrument> {
    match spec {
        InstrumentSpec::TreasuryBill(input) => {
            price_treasury_bill(input).map(PricedInstrument::TreasuryBill)
        }
        InstrumentSpec::Bond(input) => price_bond(input).map(PricedInstrument::Bond),
    }
}

/// Investments trade in 5000-unit lots.
pub(crate) fn validate_lot(investment: Decimal) -> FinCalcResult<()> {
    if investment <= Decimal::ZERO {
        return Err(FinCalcError::InvalidInput {
            field: "investment".to_string(),
            reason: "must be positive".to_string(),
        });
    }
    if !(investment % MIN_LOT).is_zero() {
        return Err(FinCalcError::InvalidInput {
            field: "investment".to_string(),
            reason: format!("must be a multiple of the {} minimum lot", MIN_LOT),
        });
    }
    Ok(())
}
