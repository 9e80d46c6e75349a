//! Amount bounds and overflow-safe arithmetic
//!
//! Transaction amounts and rule limits are capped at [`MAX_AMOUNT`], far
//! below the range where `Decimal` operators overflow. Totals over a log
//! that already holds larger values saturate instead of panicking.

use rust_decimal::Decimal;

/// Largest accepted transaction amount or rule limit (one trillion)
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(3_567_587_328, 232, 0, false, 0);

/// Sum that saturates at `Decimal::MAX` / `Decimal::MIN`
pub fn saturating_sum<I>(amounts: I) -> Decimal
where
    I: IntoIterator<Item = Decimal>,
{
    amounts
        .into_iter()
        .fold(Decimal::ZERO, |acc, amount| acc.saturating_add(amount))
}

/// `part` as a percentage of `whole`; `None` when `whole` is zero or the
/// result is not representable
pub fn percent_of(part: Decimal, whole: Decimal) -> Option<Decimal> {
    if whole.is_zero() {
        return None;
    }
    part.checked_mul(Decimal::ONE_HUNDRED)
        .and_then(|scaled| scaled.checked_div(whole))
        .or_else(|| {
            part.checked_div(whole)
                .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
        })
}
