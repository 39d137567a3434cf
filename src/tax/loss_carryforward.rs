use rust_decimal::Decimal;
use serde::Serialize;

/// Outstanding carried-loss balances, one per category pool.
///
/// `general` covers stocks plus BDRs/ETFs, `fii` covers real estate funds
/// only. The pools are independent: a FII loss never offsets general-lane
/// tax, and vice versa. Balances never go negative and carry forward
/// indefinitely until exhausted.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LossPools {
    pub general: Decimal,
    pub fii: Decimal,
}

/// Offset one month's lane result against a carried-loss pool.
///
/// `loss_signal` decides whether the month *as a whole* was a loss for this
/// lane; `candidate` is the non-negative base the pool may consume. The two
/// differ in the general lane, where an exempt stock gain is excluded from
/// the candidate but still counts toward the loss test. Returns the taxable
/// base after offsetting.
pub fn offset_against_pool(
    loss_signal: Decimal,
    candidate: Decimal,
    pool: &mut Decimal,
) -> Decimal {
    if loss_signal < Decimal::ZERO {
        *pool += loss_signal.abs();
        return Decimal::ZERO;
    }

    let offset = candidate.min(*pool);
    *pool -= offset;
    candidate - offset
}
