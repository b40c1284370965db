//! The parking-session lifecycle.
//!
//! A registration is either out of the lot or parked. Entry moves it from
//! the first state to the second by claiming a spot and saving an open
//! ticket on it. Exit bills the open ticket, closes it and frees the spot.
//!
//! Expected rejections (full lot, unknown vehicle, refused writes) are
//! reported through [`EntryOutcome`] and [`ExitOutcome`]. The state machine
//! never advances past a step that did not persist.

use crate::allocator::{SpotAllocator, SpotClaim};
use crate::error::Result;
use crate::fare::{is_loyal, FareCalculator};
use crate::storage::{Clock, OperatorInput, SpotStorage, SystemClock, TicketStorage};
use crate::{ParkingSpot, RegistrationId, SpotNumber, Ticket, VehicleCategory};

/// What happened when a vehicle tried to enter.
#[derive(Debug, Clone, PartialEq)]
pub enum EntryOutcome {
    /// The vehicle holds a saved open ticket on a spot marked taken.
    Parked {
        /// The saved open ticket.
        ticket: Ticket,
        /// Whether the driver already qualifies for the loyalty discount.
        recurring: bool,
    },
    /// The registration already has an open ticket.
    AlreadyParked {
        /// The registration that was rejected.
        registration: RegistrationId,
    },
    /// Every spot of the category is taken.
    NoSpotAvailable {
        /// The requested category.
        category: VehicleCategory,
    },
    /// The free spot could not be marked taken.
    SpotNotClaimed {
        /// The requested category.
        category: VehicleCategory,
        /// The spot whose claim was refused.
        spot: SpotNumber,
    },
    /// The ticket could not be saved, so the claimed spot was handed back.
    TicketNotSaved {
        /// The registration that was rejected.
        registration: RegistrationId,
        /// The spot that had been claimed.
        spot: ParkingSpot,
        /// Whether the spot was persisted as free again.
        spot_released: bool,
    },
}

impl EntryOutcome {
    /// Whether the vehicle now holds an open ticket.
    #[must_use]
    pub const fn is_parked(&self) -> bool {
        matches!(self, Self::Parked { .. })
    }
}

/// What happened when a vehicle tried to leave.
#[derive(Debug, Clone, PartialEq)]
pub enum ExitOutcome {
    /// The ticket was billed and closed.
    Exited {
        /// The closed ticket, carrying the exit time and price.
        ticket: Ticket,
        /// Whether the loyalty discount was applied.
        loyal: bool,
        /// Whether the spot was persisted as free again.
        spot_released: bool,
    },
    /// The registration has no open ticket.
    NoOpenTicket {
        /// The registration that was looked up.
        registration: RegistrationId,
    },
    /// The closed ticket could not be persisted; the spot stays taken.
    TicketNotClosed {
        /// The billed ticket that failed to persist.
        ticket: Ticket,
    },
}

impl ExitOutcome {
    /// Whether the session was closed.
    #[must_use]
    pub const fn is_exited(&self) -> bool {
        matches!(self, Self::Exited { .. })
    }
}

/// Coordinates vehicle entry and exit.
///
/// All collaborators are injected. Wrap a single
/// [`Database`](crate::Database) by reference to use it as both spot and
/// ticket storage.
///
/// # Type Parameters
///
/// * `S` - Spot storage
/// * `T` - Ticket storage
/// * `I` - Operator input
/// * `C` - Clock (defaults to `SystemClock`)
///
/// # Examples
///
/// ```no_run
/// use parkit::database::{Database, DatabaseConfig};
/// use parkit::storage::OperatorInput;
/// use parkit::{FareCalculator, Result, SessionOrchestrator};
///
/// struct Scripted;
///
/// impl OperatorInput for Scripted {
///     fn read_category_selection(&mut self) -> Result<i64> {
///         Ok(1)
///     }
///     fn read_registration_id(&mut self) -> Result<String> {
///         Ok("ABCDEF".into())
///     }
/// }
///
/// let db = Database::open(DatabaseConfig::new("/tmp/parkit.db")).unwrap();
/// let mut sessions = SessionOrchestrator::new(&db, &db, Scripted, FareCalculator::default());
/// let outcome = sessions.process_incoming_vehicle().unwrap();
/// assert!(outcome.is_parked());
/// ```
#[derive(Debug)]
pub struct SessionOrchestrator<S, T, I, C = SystemClock>
where
    S: SpotStorage,
    T: TicketStorage,
    I: OperatorInput,
    C: Clock,
{
    allocator: SpotAllocator<S>,
    tickets: T,
    input: I,
    clock: C,
    fares: FareCalculator,
}

impl<S, T, I> SessionOrchestrator<S, T, I, SystemClock>
where
    S: SpotStorage,
    T: TicketStorage,
    I: OperatorInput,
{
    /// Creates an orchestrator that reads the system clock.
    #[must_use]
    pub fn new(spots: S, tickets: T, input: I, fares: FareCalculator) -> Self {
        Self::with_clock(spots, tickets, input, fares, SystemClock)
    }
}

impl<S, T, I, C> SessionOrchestrator<S, T, I, C>
where
    S: SpotStorage,
    T: TicketStorage,
    I: OperatorInput,
    C: Clock,
{
    /// Creates an orchestrator with an explicit clock.
    #[must_use]
    pub fn with_clock(spots: S, tickets: T, input: I, fares: FareCalculator, clock: C) -> Self {
        Self {
            allocator: SpotAllocator::new(spots),
            tickets,
            input,
            clock,
            fares,
        }
    }

    /// Admits a vehicle.
    ///
    /// Reads the category selection and the registration, claims the next
    /// free spot and saves an open ticket on it stamped with the current
    /// time. If the ticket is refused the spot is released again. An invalid
    /// selection fails before the registration is read or any storage is
    /// touched.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidSelection`](crate::Error::InvalidSelection)
    /// for a selection other than 1 or 2, a validation error for an unusable
    /// registration, and any input or storage error.
    pub fn process_incoming_vehicle(&mut self) -> Result<EntryOutcome> {
        let category = VehicleCategory::from_selection(self.input.read_category_selection()?)?;
        let registration = RegistrationId::new(self.input.read_registration_id()?)?;

        if self.tickets.get_open_ticket(&registration)?.is_some() {
            log::warn!("{registration} already has an open ticket");
            return Ok(EntryOutcome::AlreadyParked { registration });
        }

        let taken = match self.allocator.claim_next_spot(category)? {
            SpotClaim::Claimed(spot) => spot,
            SpotClaim::Full => return Ok(EntryOutcome::NoSpotAvailable { category }),
            SpotClaim::Contended(spot) => {
                log::error!("spot {spot} could not be claimed for {registration}");
                return Ok(EntryOutcome::SpotNotClaimed { category, spot });
            }
        };

        let ticket = Ticket::open(registration, taken, self.clock.now());

        let saved = match self.tickets.save_ticket(&ticket) {
            Ok(saved) => saved,
            Err(e) => {
                if let Err(release_err) = self.release(taken) {
                    log::error!("{taken} stays taken after a failed entry: {release_err}");
                }
                return Err(e);
            }
        };

        let Some(id) = saved else {
            log::error!("ticket for {} was not saved", ticket.registration());
            let spot_released = self.release(taken)?;
            return Ok(EntryOutcome::TicketNotSaved {
                registration: ticket.registration().clone(),
                spot: taken.with_availability(true),
                spot_released,
            });
        };
        let ticket = ticket.with_id(id);

        let recurring = is_loyal(self.tickets.count_tickets_for(ticket.registration())?);
        log::info!(
            "{} parked at {} with ticket {id}",
            ticket.registration(),
            ticket.spot()
        );

        Ok(EntryOutcome::Parked { ticket, recurring })
    }

    /// Releases a vehicle.
    ///
    /// Reads the registration, bills its open ticket at the current time
    /// (discounted for loyal drivers), persists the closed ticket and frees
    /// the spot. The spot is never freed if the ticket was not persisted.
    ///
    /// # Errors
    ///
    /// Returns a validation error for an unusable registration, an
    /// [`Error::InvalidExitTime`](crate::Error::InvalidExitTime) if the
    /// clock reads earlier than the entry time, and any input or storage
    /// error.
    pub fn process_exiting_vehicle(&mut self) -> Result<ExitOutcome> {
        let registration = RegistrationId::new(self.input.read_registration_id()?)?;

        let Some(ticket) = self.tickets.get_open_ticket(&registration)? else {
            log::warn!("no open ticket for {registration}");
            return Ok(ExitOutcome::NoOpenTicket { registration });
        };

        let exit = self.clock.now();
        let loyal = is_loyal(self.tickets.count_tickets_for(&registration)?);
        let closed = self.fares.close_ticket(ticket, exit, loyal)?;

        if !self.tickets.update_ticket(&closed)? {
            log::error!("ticket for {registration} could not be closed, spot stays taken");
            return Ok(ExitOutcome::TicketNotClosed { ticket: closed });
        }

        let spot_released = self.release(closed.spot())?;

        log::info!("{registration} left {}", closed.spot().number());
        Ok(ExitOutcome::Exited {
            ticket: closed,
            loyal,
            spot_released,
        })
    }

    /// Marks a spot free, logging a refusal.
    fn release(&self, spot: ParkingSpot) -> Result<bool> {
        let freed = spot.with_availability(true);
        let released = self.allocator.storage().update_spot(&freed)?;
        if !released {
            log::warn!("{freed} could not be released");
        }
        Ok(released)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fare::{CAR_RATE_PER_HOUR, LOYALTY_DISCOUNT_FACTOR};
    use crate::storage::{MockClock, MockOperatorInput, MockSpotStorage, MockTicketStorage};
    use crate::{Error, TicketId};
    use mockall::predicate::{eq, function};
    use mockall::Sequence;
    use std::time::{Duration, SystemTime};

    type MockOrchestrator =
        SessionOrchestrator<MockSpotStorage, MockTicketStorage, MockOperatorInput, MockClock>;

    fn now() -> SystemTime {
        SystemTime::UNIX_EPOCH + Duration::from_secs(1_700_000_000)
    }

    fn plate() -> RegistrationId {
        RegistrationId::new("ABCDEF").unwrap()
    }

    fn car_spot(available: bool) -> ParkingSpot {
        ParkingSpot::new(SpotNumber::try_from(1).unwrap(), VehicleCategory::Car, available)
    }

    fn parked_an_hour_ago() -> Ticket {
        Ticket::open(plate(), car_spot(false), now() - Duration::from_secs(3600))
            .with_id(TicketId(1))
    }

    fn input(selection: Option<i64>) -> MockOperatorInput {
        let mut input = MockOperatorInput::new();
        if let Some(selection) = selection {
            input
                .expect_read_category_selection()
                .times(1)
                .returning(move || Ok(selection));
        }
        input
            .expect_read_registration_id()
            .returning(|| Ok("ABCDEF".to_string()));
        input
    }

    fn clock() -> MockClock {
        let mut clock = MockClock::new();
        clock.expect_now().return_const(now());
        clock
    }

    fn orchestrator(
        spots: MockSpotStorage,
        tickets: MockTicketStorage,
        input: MockOperatorInput,
    ) -> MockOrchestrator {
        SessionOrchestrator::with_clock(spots, tickets, input, FareCalculator::default(), clock())
    }

    #[test]
    fn test_incoming_vehicle_parks() {
        let mut seq = Sequence::new();
        let mut spots = MockSpotStorage::new();
        let mut tickets = MockTicketStorage::new();

        tickets
            .expect_get_open_ticket()
            .with(eq(plate()))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(None));
        spots
            .expect_next_available_spot()
            .with(eq(VehicleCategory::Car))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(Some(SpotNumber::try_from(1).unwrap())));
        spots
            .expect_update_spot()
            .with(function(|spot: &ParkingSpot| {
                spot.number().value() == 1 && !spot.is_available()
            }))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(true));
        tickets
            .expect_save_ticket()
            .with(function(|ticket: &Ticket| {
                ticket.is_open()
                    && ticket.entered_at() == now()
                    && ticket.price().is_none()
                    && !ticket.spot().is_available()
            }))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(Some(TicketId(42))));
        tickets
            .expect_count_tickets_for()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(1));

        let mut sessions = orchestrator(spots, tickets, input(Some(1)));
        let outcome = sessions.process_incoming_vehicle().unwrap();

        match outcome {
            EntryOutcome::Parked { ticket, recurring } => {
                assert_eq!(ticket.id(), Some(TicketId(42)));
                assert_eq!(ticket.registration(), &plate());
                assert!(!recurring);
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[test]
    fn test_incoming_recurring_driver() {
        let mut spots = MockSpotStorage::new();
        spots
            .expect_next_available_spot()
            .returning(|_| Ok(Some(SpotNumber::try_from(4).unwrap())));
        spots.expect_update_spot().returning(|_| Ok(true));

        let mut tickets = MockTicketStorage::new();
        tickets.expect_get_open_ticket().returning(|_| Ok(None));
        tickets
            .expect_save_ticket()
            .returning(|_| Ok(Some(TicketId(3))));
        tickets.expect_count_tickets_for().returning(|_| Ok(2));

        let mut sessions = orchestrator(spots, tickets, input(Some(2)));
        let outcome = sessions.process_incoming_vehicle().unwrap();

        assert!(matches!(outcome, EntryOutcome::Parked { recurring: true, .. }));
    }

    #[test]
    fn test_invalid_selection_touches_nothing() {
        let mut spots = MockSpotStorage::new();
        spots.expect_next_available_spot().never();
        spots.expect_update_spot().never();

        let mut tickets = MockTicketStorage::new();
        tickets.expect_get_open_ticket().never();
        tickets.expect_save_ticket().never();

        let mut operator = MockOperatorInput::new();
        operator
            .expect_read_category_selection()
            .times(1)
            .returning(|| Ok(3));
        operator.expect_read_registration_id().never();

        let mut sessions = orchestrator(spots, tickets, operator);
        let err = sessions.process_incoming_vehicle().unwrap_err();

        assert!(matches!(err, Error::InvalidSelection { value: 3 }));
        assert!(err.to_string().contains('3'));
    }

    #[test]
    fn test_no_spot_saves_no_ticket() {
        let mut spots = MockSpotStorage::new();
        spots
            .expect_next_available_spot()
            .times(1)
            .returning(|_| Ok(None));
        spots.expect_update_spot().never();

        let mut tickets = MockTicketStorage::new();
        tickets.expect_get_open_ticket().returning(|_| Ok(None));
        tickets.expect_save_ticket().never();

        let mut sessions = orchestrator(spots, tickets, input(Some(1)));
        let outcome = sessions.process_incoming_vehicle().unwrap();

        assert_eq!(
            outcome,
            EntryOutcome::NoSpotAvailable {
                category: VehicleCategory::Car
            }
        );
    }

    #[test]
    fn test_double_entry_rejected() {
        let mut spots = MockSpotStorage::new();
        spots.expect_next_available_spot().never();
        spots.expect_update_spot().never();

        let mut tickets = MockTicketStorage::new();
        tickets
            .expect_get_open_ticket()
            .times(1)
            .returning(|_| Ok(Some(parked_an_hour_ago())));
        tickets.expect_save_ticket().never();

        let mut sessions = orchestrator(spots, tickets, input(Some(1)));
        let outcome = sessions.process_incoming_vehicle().unwrap();

        assert_eq!(
            outcome,
            EntryOutcome::AlreadyParked {
                registration: plate()
            }
        );
    }

    #[test]
    fn test_unsaved_ticket_releases_claimed_spot() {
        let mut seq = Sequence::new();
        let mut spots = MockSpotStorage::new();
        let mut tickets = MockTicketStorage::new();

        tickets.expect_get_open_ticket().returning(|_| Ok(None));
        spots
            .expect_next_available_spot()
            .returning(|_| Ok(Some(SpotNumber::try_from(1).unwrap())));
        spots
            .expect_update_spot()
            .with(function(|spot: &ParkingSpot| !spot.is_available()))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(true));
        tickets
            .expect_save_ticket()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(None));
        spots
            .expect_update_spot()
            .with(function(|spot: &ParkingSpot| spot.is_available()))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(true));
        tickets.expect_count_tickets_for().never();

        let mut sessions = orchestrator(spots, tickets, input(Some(1)));
        let outcome = sessions.process_incoming_vehicle().unwrap();

        assert_eq!(
            outcome,
            EntryOutcome::TicketNotSaved {
                registration: plate(),
                spot: car_spot(true),
                spot_released: true,
            }
        );
    }

    #[test]
    fn test_failed_save_releases_claimed_spot() {
        let mut spots = MockSpotStorage::new();
        spots
            .expect_next_available_spot()
            .returning(|_| Ok(Some(SpotNumber::try_from(1).unwrap())));
        spots
            .expect_update_spot()
            .with(function(|spot: &ParkingSpot| !spot.is_available()))
            .times(1)
            .returning(|_| Ok(true));
        spots
            .expect_update_spot()
            .with(function(|spot: &ParkingSpot| spot.is_available()))
            .times(1)
            .returning(|_| Ok(true));

        let mut tickets = MockTicketStorage::new();
        tickets.expect_get_open_ticket().returning(|_| Ok(None));
        tickets
            .expect_save_ticket()
            .returning(|_| Err(Error::Database(rusqlite::Error::InvalidQuery)));

        let mut sessions = orchestrator(spots, tickets, input(Some(1)));
        assert!(matches!(
            sessions.process_incoming_vehicle(),
            Err(Error::Database(_))
        ));
    }

    #[test]
    fn test_unclaimable_spot_saves_no_ticket() {
        let mut spots = MockSpotStorage::new();
        spots
            .expect_next_available_spot()
            .times(2)
            .returning(|_| Ok(Some(SpotNumber::try_from(1).unwrap())));
        spots.expect_update_spot().times(1).returning(|_| Ok(false));

        let mut tickets = MockTicketStorage::new();
        tickets.expect_get_open_ticket().returning(|_| Ok(None));
        tickets.expect_save_ticket().never();

        let mut sessions = orchestrator(spots, tickets, input(Some(1)));
        let outcome = sessions.process_incoming_vehicle().unwrap();

        assert_eq!(
            outcome,
            EntryOutcome::SpotNotClaimed {
                category: VehicleCategory::Car,
                spot: SpotNumber::try_from(1).unwrap(),
            }
        );
        assert!(!outcome.is_parked());
    }

    #[test]
    fn test_blank_registration_rejected() {
        let mut spots = MockSpotStorage::new();
        spots.expect_next_available_spot().never();

        let mut tickets = MockTicketStorage::new();
        tickets.expect_get_open_ticket().never();

        let mut operator = MockOperatorInput::new();
        operator
            .expect_read_category_selection()
            .returning(|| Ok(1));
        operator
            .expect_read_registration_id()
            .returning(|| Ok("   ".to_string()));

        let mut sessions = orchestrator(spots, tickets, operator);
        let err = sessions.process_incoming_vehicle().unwrap_err();
        assert!(matches!(err, Error::Validation { .. }));
    }

    #[test]
    fn test_exiting_vehicle_loyal_discount() {
        let mut spots = MockSpotStorage::new();
        spots
            .expect_update_spot()
            .with(function(|spot: &ParkingSpot| {
                spot.number().value() == 1 && spot.is_available()
            }))
            .times(1)
            .returning(|_| Ok(true));

        let mut tickets = MockTicketStorage::new();
        tickets
            .expect_get_open_ticket()
            .times(1)
            .returning(|_| Ok(Some(parked_an_hour_ago())));
        tickets
            .expect_count_tickets_for()
            .with(eq(plate()))
            .times(1)
            .returning(|_| Ok(2));
        tickets
            .expect_update_ticket()
            .with(function(|ticket: &Ticket| {
                ticket.exited_at() == Some(now()) && ticket.price().is_some()
            }))
            .times(1)
            .returning(|_| Ok(true));

        let mut sessions = orchestrator(spots, tickets, input(None));
        let outcome = sessions.process_exiting_vehicle().unwrap();

        match outcome {
            ExitOutcome::Exited {
                ticket,
                loyal,
                spot_released,
            } => {
                assert!(loyal);
                assert!(spot_released);
                let expected = CAR_RATE_PER_HOUR * LOYALTY_DISCOUNT_FACTOR;
                assert!((ticket.price().unwrap() - expected).abs() < 1e-9);
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[test]
    fn test_exiting_first_time_driver_pays_full_price() {
        let mut spots = MockSpotStorage::new();
        spots.expect_update_spot().returning(|_| Ok(true));

        let mut tickets = MockTicketStorage::new();
        tickets
            .expect_get_open_ticket()
            .returning(|_| Ok(Some(parked_an_hour_ago())));
        tickets.expect_count_tickets_for().returning(|_| Ok(1));
        tickets.expect_update_ticket().returning(|_| Ok(true));

        let mut sessions = orchestrator(spots, tickets, input(None));
        let outcome = sessions.process_exiting_vehicle().unwrap();

        let ExitOutcome::Exited { ticket, loyal, .. } = outcome else {
            panic!("vehicle did not exit");
        };
        assert!(!loyal);
        assert!((ticket.price().unwrap() - CAR_RATE_PER_HOUR).abs() < 1e-9);
    }

    #[test]
    fn test_unclosed_ticket_never_releases_spot() {
        let mut spots = MockSpotStorage::new();
        spots.expect_update_spot().never();

        let mut tickets = MockTicketStorage::new();
        tickets
            .expect_get_open_ticket()
            .returning(|_| Ok(Some(parked_an_hour_ago())));
        tickets.expect_count_tickets_for().returning(|_| Ok(0));
        tickets.expect_update_ticket().times(1).returning(|_| Ok(false));

        let mut sessions = orchestrator(spots, tickets, input(None));
        let outcome = sessions.process_exiting_vehicle().unwrap();

        assert!(matches!(outcome, ExitOutcome::TicketNotClosed { .. }));
        assert!(!outcome.is_exited());
    }

    #[test]
    fn test_exit_without_open_ticket() {
        let mut spots = MockSpotStorage::new();
        spots.expect_update_spot().never();

        let mut tickets = MockTicketStorage::new();
        tickets
            .expect_get_open_ticket()
            .times(1)
            .returning(|_| Ok(None));
        tickets.expect_update_ticket().never();
        tickets.expect_count_tickets_for().never();

        let mut sessions = orchestrator(spots, tickets, input(None));
        let outcome = sessions.process_exiting_vehicle().unwrap();

        assert_eq!(
            outcome,
            ExitOutcome::NoOpenTicket {
                registration: plate()
            }
        );
    }

    #[test]
    fn test_storage_error_stops_exit() {
        let mut spots = MockSpotStorage::new();
        spots.expect_update_spot().never();

        let mut tickets = MockTicketStorage::new();
        tickets
            .expect_get_open_ticket()
            .returning(|_| Ok(Some(parked_an_hour_ago())));
        tickets.expect_count_tickets_for().returning(|_| Ok(0));
        tickets
            .expect_update_ticket()
            .returning(|_| Err(Error::Database(rusqlite::Error::InvalidQuery)));

        let mut sessions = orchestrator(spots, tickets, input(None));
        assert!(matches!(
            sessions.process_exiting_vehicle(),
            Err(Error::Database(_))
        ));
    }
}
