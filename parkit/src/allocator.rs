//! Spot allocation by vehicle category.
//!
//! The allocator is stateless: every call asks the spot storage afresh, so
//! two allocators over the same database never disagree.
//!
//! Finding a free spot and taking it are separate storage calls. Between the
//! two another session may take the same spot, in which case the conditional
//! claim is refused and [`SpotAllocator::claim_next_spot`] looks again.

use crate::error::Result;
use crate::storage::SpotStorage;
use crate::{ParkingSpot, SpotNumber, VehicleCategory};

/// Result of trying to take a spot for an arriving vehicle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpotClaim {
    /// The spot is now persisted as taken.
    Claimed(ParkingSpot),
    /// Every spot of the category is taken.
    Full,
    /// The storage refused the same spot twice in a row.
    Contended(SpotNumber),
}

/// Finds free spots for arriving vehicles.
///
/// # Type Parameters
///
/// * `S` - The spot storage queried for availability
#[derive(Debug, Clone)]
pub struct SpotAllocator<S: SpotStorage> {
    storage: S,
}

impl<S: SpotStorage> SpotAllocator<S> {
    /// Creates an allocator over the given spot storage.
    #[must_use]
    pub const fn new(storage: S) -> Self {
        Self { storage }
    }

    /// The underlying spot storage.
    #[must_use]
    pub const fn storage(&self) -> &S {
        &self.storage
    }

    /// Returns the next free spot for the category, still marked available.
    ///
    /// A full lot is not an error: the result is `Ok(None)`.
    ///
    /// # Errors
    ///
    /// Returns an error if the spot storage cannot be queried.
    pub fn next_available_spot(&self, category: VehicleCategory) -> Result<Option<ParkingSpot>> {
        let Some(number) = self.storage.next_available_spot(category)? else {
            log::info!("no free {category} spot, the lot might be full");
            return Ok(None);
        };

        log::debug!("allocated spot {number} for {category}");
        Ok(Some(ParkingSpot::new(number, category, true)))
    }

    /// Finds the next free spot for the category and marks it taken.
    ///
    /// A refused claim means another session took the spot after it was
    /// looked up, so the lookup is repeated. Each refusal of that kind takes
    /// a spot out of the pool, which bounds the loop. If the storage offers
    /// the spot it has just refused, the refusal was not a race and
    /// [`SpotClaim::Contended`] is returned.
    ///
    /// # Errors
    ///
    /// Returns an error if the spot storage cannot be queried or written.
    pub fn claim_next_spot(&self, category: VehicleCategory) -> Result<SpotClaim> {
        let mut refused: Option<SpotNumber> = None;

        loop {
            let Some(spot) = self.next_available_spot(category)? else {
                return Ok(SpotClaim::Full);
            };
            if refused == Some(spot.number()) {
                log::warn!("{spot} was refused twice, giving up");
                return Ok(SpotClaim::Contended(spot.number()));
            }

            let taken = spot.with_availability(false);
            if self.storage.update_spot(&taken)? {
                return Ok(SpotClaim::Claimed(taken));
            }

            log::info!("{spot} was claimed by another session, looking again");
            refused = Some(spot.number());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MockSpotStorage;
    use crate::Error;
    use mockall::predicate::{eq, function};
    use mockall::Sequence;

    fn spot_number(n: u32) -> SpotNumber {
        SpotNumber::try_from(n).unwrap()
    }

    #[test]
    fn test_allocates_returned_spot() {
        let mut storage = MockSpotStorage::new();
        storage
            .expect_next_available_spot()
            .with(eq(VehicleCategory::Car))
            .times(1)
            .returning(|_| Ok(Some(SpotNumber::try_from(1).unwrap())));

        let allocator = SpotAllocator::new(storage);
        let spot = allocator.next_available_spot(VehicleCategory::Car).unwrap().unwrap();

        assert_eq!(spot.number().value(), 1);
        assert_eq!(spot.category(), VehicleCategory::Car);
        assert!(spot.is_available());
    }

    #[test]
    fn test_full_lot_is_not_an_error() {
        let mut storage = MockSpotStorage::new();
        storage
            .expect_next_available_spot()
            .with(eq(VehicleCategory::Bike))
            .times(1)
            .returning(|_| Ok(None));

        let allocator = SpotAllocator::new(storage);
        assert!(allocator.next_available_spot(VehicleCategory::Bike).unwrap().is_none());
    }

    #[test]
    fn test_storage_error_propagates() {
        let mut storage = MockSpotStorage::new();
        storage
            .expect_next_available_spot()
            .returning(|_| Err(Error::Database(rusqlite::Error::InvalidQuery)));

        let allocator = SpotAllocator::new(storage);
        assert!(matches!(
            allocator.next_available_spot(VehicleCategory::Car),
            Err(Error::Database(_))
        ));
    }

    #[test]
    fn test_claim_marks_spot_taken() {
        let mut storage = MockSpotStorage::new();
        storage
            .expect_next_available_spot()
            .times(1)
            .returning(|_| Ok(Some(spot_number(2))));
        storage
            .expect_update_spot()
            .with(function(|spot: &ParkingSpot| {
                spot.number().value() == 2 && !spot.is_available()
            }))
            .times(1)
            .returning(|_| Ok(true));

        let allocator = SpotAllocator::new(storage);
        let claim = allocator.claim_next_spot(VehicleCategory::Car).unwrap();

        assert_eq!(
            claim,
            SpotClaim::Claimed(ParkingSpot::new(spot_number(2), VehicleCategory::Car, false))
        );
    }

    #[test]
    fn test_claim_looks_again_after_losing_a_spot() {
        let mut seq = Sequence::new();
        let mut storage = MockSpotStorage::new();
        storage
            .expect_next_available_spot()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(Some(spot_number(1))));
        storage
            .expect_update_spot()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(false));
        storage
            .expect_next_available_spot()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(Some(spot_number(2))));
        storage
            .expect_update_spot()
            .with(function(|spot: &ParkingSpot| spot.number().value() == 2))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(true));

        let allocator = SpotAllocator::new(storage);
        let claim = allocator.claim_next_spot(VehicleCategory::Car).unwrap();

        assert!(matches!(claim, SpotClaim::Claimed(spot) if spot.number().value() == 2));
    }

    #[test]
    fn test_claim_on_full_lot() {
        let mut storage = MockSpotStorage::new();
        storage.expect_next_available_spot().returning(|_| Ok(None));
        storage.expect_update_spot().never();

        let allocator = SpotAllocator::new(storage);
        assert_eq!(
            allocator.claim_next_spot(VehicleCategory::Bike).unwrap(),
            SpotClaim::Full
        );
    }

    #[test]
    fn test_claim_gives_up_on_repeated_refusal() {
        let mut storage = MockSpotStorage::new();
        storage
            .expect_next_available_spot()
            .times(2)
            .returning(|_| Ok(Some(spot_number(3))));
        storage.expect_update_spot().times(1).returning(|_| Ok(false));

        let allocator = SpotAllocator::new(storage);
        assert_eq!(
            allocator.claim_next_spot(VehicleCategory::Car).unwrap(),
            SpotClaim::Contended(spot_number(3))
        );
    }
}
