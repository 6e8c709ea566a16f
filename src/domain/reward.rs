//! Pure point computations. Nothing here touches ledger state.

use super::points::{Points, RedeemAmount};
use super::vehicle::Tier;
use crate::error::LedgerError;

/// Points earned for driving `miles` in a vehicle of the given tier.
pub fn points_for_mileage(miles: u64, tier: Tier) -> Result<Points, LedgerError> {
    miles
        .checked_mul(u64::from(tier.value()))
        .map(Points::new)
        .ok_or(LedgerError::Overflow)
}

/// Balance remaining after redeeming `amount` out of `balance`.
pub fn remaining_after_redemption(
    balance: Points,
    amount: RedeemAmount,
) -> Result<Points, LedgerError> {
    balance.debit(amount)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_electric_mileage() {
        let tier = Tier::new(8).unwrap();
        assert_eq!(points_for_mileage(1, tier).unwrap(), Points::new(8));
        assert_eq!(points_for_mileage(100, tier).unwrap(), Points::new(800));
        assert_eq!(points_for_mileage(200, tier).unwrap(), Points::new(1600));
    }

    #[test]
    fn test_zero_miles_earns_nothing() {
        let tier = Tier::new(8).unwrap();
        assert_eq!(points_for_mileage(0, tier).unwrap(), Points::ZERO);
    }

    #[test]
    fn test_mileage_overflow() {
        let tier = Tier::new(2).unwrap();
        assert!(matches!(
            points_for_mileage(u64::MAX, tier),
            Err(LedgerError::Overflow)
        ));
    }

    #[test]
    fn test_redemption_check() {
        let amount = RedeemAmount::new(1000).unwrap();
        assert_eq!(
            remaining_after_redemption(Points::new(1600), amount).unwrap(),
            Points::new(600)
        );
        assert!(matches!(
            remaining_after_redemption(Points::new(999), amount),
            Err(LedgerError::InsufficientPoints { .. })
        ));
    }
}
