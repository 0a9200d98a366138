//! In-memory booking store using a Tokio mutex for single-node deployments.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use tokio::sync::Mutex;
use tracing::{debug, info};

use resort_core::result::AppResult;
use resort_core::types::id::{BookingId, ReservationId, ServiceId, TimeSlotId, UserId};
use resort_core::types::pagination::{PageRequest, PageResponse};
use resort_entity::booking::{BookingStatus, PaymentStatus, ServiceBooking};
use resort_entity::reservation::RoomReservation;
use resort_entity::service::HotelService;
use resort_entity::slot::{NewTimeSlot, TimeSlot};

use super::{BookingCommit, BookingStore, CapacityGuard, CommitOutcome, SlotUpdate};

/// Tables held by the memory store.
#[derive(Debug, Default)]
struct InnerState {
    services: HashMap<ServiceId, HotelService>,
    slots: HashMap<TimeSlotId, TimeSlot>,
    bookings: HashMap<BookingId, ServiceBooking>,
    reservations: HashMap<ReservationId, RoomReservation>,
}

impl InnerState {
    fn slot_at(&self, service_id: ServiceId, date: NaiveDate, start: &str) -> Option<&TimeSlot> {
        self.slots
            .values()
            .find(|s| s.service_id == service_id && s.date == date && s.start_time == start)
    }

    fn participants_at(&self, service_id: ServiceId, date: NaiveDate, time: &str) -> i32 {
        self.bookings
            .values()
            .filter(|b| {
                b.service_id == service_id
                    && b.booking_date == date
                    && b.booking_time == time
                    && b.status.holds_capacity()
            })
            .map(|b| b.participants)
            .sum()
    }

    /// Attach active slot-less bookings at the slot's start to the slot and
    /// count them as booked.
    fn adopt_bookings(&mut self, slot: &mut TimeSlot) {
        for booking in self.bookings.values_mut().filter(|b| {
            b.time_slot_id.is_none()
                && b.service_id == slot.service_id
                && b.booking_date == slot.date
                && b.booking_time == slot.start_time
                && b.status.holds_capacity()
        }) {
            booking.time_slot_id = Some(slot.id);
            slot.booked += booking.participants;
        }
    }
}

/// [`BookingStore`] kept in process memory.
///
/// Every operation takes the same lock, so capacity checks and inserts are
/// trivially atomic. Suitable for single-node deployments and tests only.
#[derive(Debug, Clone, Default)]
pub struct MemoryBookingStore {
    state: Arc<Mutex<InnerState>>,
}

impl MemoryBookingStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a room reservation. Reservations are owned by the room-booking
    /// side; this is how demos and tests provide them.
    pub async fn insert_reservation(&self, reservation: RoomReservation) {
        let mut state = self.state.lock().await;
        state.reservations.insert(reservation.id, reservation);
    }

    /// Add a booking row as-is, bypassing capacity checks. Used to load
    /// bookings made before slot rows existed.
    pub async fn insert_booking(&self, booking: ServiceBooking) {
        let mut state = self.state.lock().await;
        state.bookings.insert(booking.id, booking);
    }
}

#[async_trait]
impl BookingStore for MemoryBookingStore {
    async fn create_service(&self, service: HotelService) -> AppResult<HotelService> {
        let mut state = self.state.lock().await;
        state.services.insert(service.id, service.clone());
        Ok(service)
    }

    async fn update_service(&self, service: HotelService) -> AppResult<Option<HotelService>> {
        let mut state = self.state.lock().await;
        match state.services.get_mut(&service.id) {
            Some(existing) => {
                *existing = service.clone();
                Ok(Some(service))
            }
            None => Ok(None),
        }
    }

    async fn set_service_active(
        &self,
        id: ServiceId,
        active: bool,
    ) -> AppResult<Option<HotelService>> {
        let mut state = self.state.lock().await;
        Ok(state.services.get_mut(&id).map(|service| {
            service.is_active = active;
            service.updated_at = Utc::now();
            service.clone()
        }))
    }

    async fn find_service(&self, id: ServiceId) -> AppResult<Option<HotelService>> {
        let state = self.state.lock().await;
        Ok(state.services.get(&id).cloned())
    }

    async fn list_services(
        &self,
        active_only: bool,
        page: &PageRequest,
    ) -> AppResult<PageResponse<HotelService>> {
        let state = self.state.lock().await;
        let mut services: Vec<HotelService> = state
            .services
            .values()
            .filter(|s| !active_only || s.is_active)
            .cloned()
            .collect();
        services.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        Ok(PageResponse::from_vec(services, page))
    }

    async fn insert_slots(&self, slots: &[NewTimeSlot]) -> AppResult<u64> {
        let mut state = self.state.lock().await;
        let now = Utc::now();
        let mut inserted = 0;
        for slot in slots {
            if state
                .slot_at(slot.service_id, slot.date, &slot.start_time)
                .is_some()
            {
                continue;
            }
            let mut row = slot.clone().into_slot(TimeSlotId::new(), now);
            state.adopt_bookings(&mut row);
            if row.booked > 0 {
                debug!(slot_id = %row.id, booked = row.booked, "Slot adopted existing bookings");
            }
            state.slots.insert(row.id, row);
            inserted += 1;
        }
        Ok(inserted)
    }

    async fn list_slots(
        &self,
        service_id: ServiceId,
        from: NaiveDate,
        to: NaiveDate,
    ) -> AppResult<Vec<TimeSlot>> {
        let state = self.state.lock().await;
        let mut slots: Vec<TimeSlot> = state
            .slots
            .values()
            .filter(|s| s.service_id == service_id && s.date >= from && s.date <= to)
            .cloned()
            .collect();
        slots.sort_by(|a, b| a.date.cmp(&b.date).then_with(|| a.start_time.cmp(&b.start_time)));
        Ok(slots)
    }

    async fn find_slot(&self, id: TimeSlotId) -> AppResult<Option<TimeSlot>> {
        let state = self.state.lock().await;
        Ok(state.slots.get(&id).cloned())
    }

    async fn find_slot_at(
        &self,
        service_id: ServiceId,
        date: NaiveDate,
        start_time: &str,
    ) -> AppResult<Option<TimeSlot>> {
        let state = self.state.lock().await;
        Ok(state.slot_at(service_id, date, start_time).cloned())
    }

    async fn update_slot(&self, id: TimeSlotId, update: SlotUpdate) -> AppResult<Option<TimeSlot>> {
        let mut state = self.state.lock().await;
        Ok(state.slots.get_mut(&id).map(|slot| {
            if let Some(capacity) = update.capacity {
                slot.capacity = capacity;
            }
            if let Some(open) = update.is_available {
                slot.is_available = open;
            }
            slot.updated_at = Utc::now();
            slot.clone()
        }))
    }

    async fn active_bookings_on(
        &self,
        service_id: ServiceId,
        date: NaiveDate,
    ) -> AppResult<Vec<ServiceBooking>> {
        let state = self.state.lock().await;
        let mut bookings: Vec<ServiceBooking> = state
            .bookings
            .values()
            .filter(|b| {
                b.service_id == service_id && b.booking_date == date && b.status.holds_capacity()
            })
            .cloned()
            .collect();
        bookings.sort_by(|a, b| {
            a.booking_time
                .cmp(&b.booking_time)
                .then(a.created_at.cmp(&b.created_at))
        });
        Ok(bookings)
    }

    async fn find_booking(&self, id: BookingId) -> AppResult<Option<ServiceBooking>> {
        let state = self.state.lock().await;
        Ok(state.bookings.get(&id).cloned())
    }

    async fn list_user_bookings(
        &self,
        user_id: UserId,
        page: &PageRequest,
    ) -> AppResult<PageResponse<ServiceBooking>> {
        let state = self.state.lock().await;
        let mut bookings: Vec<ServiceBooking> = state
            .bookings
            .values()
            .filter(|b| b.user_id == user_id)
            .cloned()
            .collect();
        bookings.sort_by(|a, b| {
            b.booking_date
                .cmp(&a.booking_date)
                .then_with(|| b.booking_time.cmp(&a.booking_time))
                .then(b.created_at.cmp(&a.created_at))
        });
        Ok(PageResponse::from_vec(bookings, page))
    }

    async fn commit_booking(
        &self,
        commit: BookingCommit,
        now: DateTime<Utc>,
    ) -> AppResult<CommitOutcome> {
        let mut state = self.state.lock().await;
        let participants = commit.booking.participants;

        let b = &commit.booking;
        let guard = match commit.guard {
            CapacityGuard::Aggregate { .. } => state
                .slot_at(b.service_id, b.booking_date, &b.booking_time)
                .map(|slot| CapacityGuard::Slot(slot.id))
                .unwrap_or(commit.guard),
            guard => guard,
        };

        let slot_id = match guard {
            CapacityGuard::Slot(slot_id) => {
                let Some(slot) = state
                    .slots
                    .get_mut(&slot_id)
                    .filter(|s| s.service_id == commit.booking.service_id)
                else {
                    return Ok(CommitOutcome::Unavailable { spots_left: 0 });
                };
                if !slot.can_hold(participants) {
                    let spots_left = if slot.is_available {
                        slot.available().max(0)
                    } else {
                        0
                    };
                    debug!(slot_id = %slot_id, spots_left, "Slot cannot hold booking");
                    return Ok(CommitOutcome::Unavailable { spots_left });
                }
                slot.booked += participants;
                slot.updated_at = now;
                Some(slot_id)
            }
            CapacityGuard::Aggregate { max_capacity } => {
                let taken = state.participants_at(b.service_id, b.booking_date, &b.booking_time);
                let spots_left = max_capacity - taken;
                if spots_left < participants {
                    return Ok(CommitOutcome::Unavailable {
                        spots_left: spots_left.max(0),
                    });
                }
                None
            }
        };

        let booking = commit.booking.into_booking(BookingId::new(), slot_id, now);
        state.bookings.insert(booking.id, booking.clone());
        info!(
            booking_id = %booking.id,
            service_id = %booking.service_id,
            participants = booking.participants,
            "Booking committed"
        );
        Ok(CommitOutcome::Committed(booking))
    }

    async fn transition_booking(
        &self,
        id: BookingId,
        from: BookingStatus,
        to: BookingStatus,
        at: DateTime<Utc>,
    ) -> AppResult<Option<ServiceBooking>> {
        let mut state = self.state.lock().await;

        let Some(booking) = state.bookings.get_mut(&id).filter(|b| b.status == from) else {
            return Ok(None);
        };
        booking.stamp(to, at);
        let updated = booking.clone();

        if from.holds_capacity() && !to.holds_capacity() {
            if let Some(slot) = updated
                .time_slot_id
                .and_then(|slot_id| state.slots.get_mut(&slot_id))
            {
                slot.booked = (slot.booked - updated.participants).max(0);
                slot.updated_at = at;
            }
        }

        Ok(Some(updated))
    }

    async fn record_payment(
        &self,
        id: BookingId,
        status: PaymentStatus,
        reference: Option<String>,
        at: DateTime<Utc>,
    ) -> AppResult<Option<ServiceBooking>> {
        let mut state = self.state.lock().await;
        Ok(state.bookings.get_mut(&id).map(|booking| {
            booking.payment_status = status;
            if reference.is_some() {
                booking.payment_reference = reference;
            }
            booking.updated_at = at;
            booking.clone()
        }))
    }

    async fn find_reservation(&self, id: ReservationId) -> AppResult<Option<RoomReservation>> {
        let state = self.state.lock().await;
        Ok(state.reservations.get(&id).cloned())
    }

    async fn health_check(&self) -> AppResult<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use resort_entity::booking::NewBooking;
    use resort_entity::service::{ServiceCategory, ServiceType, Weekday};
    use rust_decimal::Decimal;

    fn service(max_capacity: i32) -> HotelService {
        let now = Utc::now();
        HotelService {
            id: ServiceId::new(),
            name: "Hot Stone Massage".to_string(),
            description: String::new(),
            images: vec![],
            service_type: ServiceType::Spa,
            category: ServiceCategory::Wellness,
            price: Decimal::new(8000, 2),
            price_per_person: true,
            duration: 60,
            min_capacity: 1,
            max_capacity,
            is_active: true,
            available_days: Weekday::ALL.to_vec(),
            start_time: "09:00".to_string(),
            end_time: "12:00".to_string(),
            slot_interval: 60,
            advance_booking_hours: 0,
            requires_reservation: false,
            created_at: now,
            updated_at: now,
        }
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 7, 6).unwrap()
    }

    fn new_booking(service_id: ServiceId, participants: i32) -> NewBooking {
        NewBooking {
            service_id,
            user_id: UserId::new(),
            reservation_id: None,
            booking_date: date(),
            booking_time: "09:00".to_string(),
            participants,
            total_price: Decimal::ZERO,
            special_requests: None,
        }
    }

    async fn seeded(capacity: i32) -> (MemoryBookingStore, HotelService, TimeSlot) {
        let store = MemoryBookingStore::new();
        let svc = store.create_service(service(capacity)).await.unwrap();
        store
            .insert_slots(&[NewTimeSlot {
                service_id: svc.id,
                date: date(),
                start_time: "09:00".to_string(),
                end_time: "10:00".to_string(),
                capacity,
            }])
            .await
            .unwrap();
        let slot = store
            .find_slot_at(svc.id, date(), "09:00")
            .await
            .unwrap()
            .unwrap();
        (store, svc, slot)
    }

    #[tokio::test]
    async fn test_insert_slots_skips_existing() {
        let (store, svc, _) = seeded(4).await;
        let again = NewTimeSlot {
            service_id: svc.id,
            date: date(),
            start_time: "09:00".to_string(),
            end_time: "10:00".to_string(),
            capacity: 4,
        };
        let inserted = store.insert_slots(&[again]).await.unwrap();
        assert_eq!(inserted, 0);
        assert_eq!(store.list_slots(svc.id, date(), date()).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_insert_slots_adopts_slotless_bookings() {
        let store = MemoryBookingStore::new();
        let svc = store.create_service(service(6)).await.unwrap();

        let active = new_booking(svc.id, 2).into_booking(BookingId::new(), None, Utc::now());
        let mut cancelled = new_booking(svc.id, 3).into_booking(BookingId::new(), None, Utc::now());
        cancelled.stamp(BookingStatus::Cancelled, Utc::now());
        let mut later = new_booking(svc.id, 1).into_booking(BookingId::new(), None, Utc::now());
        later.booking_time = "10:00".to_string();
        for booking in [active.clone(), cancelled.clone(), later.clone()] {
            store.insert_booking(booking).await;
        }

        store
            .insert_slots(&[NewTimeSlot {
                service_id: svc.id,
                date: date(),
                start_time: "09:00".to_string(),
                end_time: "10:00".to_string(),
                capacity: 6,
            }])
            .await
            .unwrap();
        let slot = store
            .find_slot_at(svc.id, date(), "09:00")
            .await
            .unwrap()
            .unwrap();

        assert_eq!(slot.booked, 2);
        for (id, expected) in [
            (active.id, Some(slot.id)),
            (cancelled.id, None),
            (later.id, None),
        ] {
            let booking = store.find_booking(id).await.unwrap().unwrap();
            assert_eq!(booking.time_slot_id, expected);
        }
    }

    #[tokio::test]
    async fn test_aggregate_commit_switches_to_generated_slot() {
        let (store, svc, slot) = seeded(4).await;
        let outcome = store
            .commit_booking(
                BookingCommit {
                    booking: new_booking(svc.id, 3),
                    guard: CapacityGuard::Aggregate { max_capacity: 4 },
                },
                Utc::now(),
            )
            .await
            .unwrap();
        let CommitOutcome::Committed(booking) = outcome else {
            panic!("expected commit");
        };
        assert_eq!(booking.time_slot_id, Some(slot.id));
        assert_eq!(store.find_slot(slot.id).await.unwrap().unwrap().booked, 3);

        let outcome = store
            .commit_booking(
                BookingCommit {
                    booking: new_booking(svc.id, 2),
                    guard: CapacityGuard::Aggregate { max_capacity: 4 },
                },
                Utc::now(),
            )
            .await
            .unwrap();
        assert!(matches!(outcome, CommitOutcome::Unavailable { spots_left: 1 }));
    }

    #[tokio::test]
    async fn test_slot_commit_increments_booked() {
        let (store, svc, slot) = seeded(4).await;
        let outcome = store
            .commit_booking(
                BookingCommit {
                    booking: new_booking(svc.id, 3),
                    guard: CapacityGuard::Slot(slot.id),
                },
                Utc::now(),
            )
            .await
            .unwrap();
        let CommitOutcome::Committed(booking) = outcome else {
            panic!("expected commit");
        };
        assert_eq!(booking.status, BookingStatus::Pending);
        assert_eq!(booking.time_slot_id, Some(slot.id));
        assert_eq!(store.find_slot(slot.id).await.unwrap().unwrap().booked, 3);

        let outcome = store
            .commit_booking(
                BookingCommit {
                    booking: new_booking(svc.id, 2),
                    guard: CapacityGuard::Slot(slot.id),
                },
                Utc::now(),
            )
            .await
            .unwrap();
        assert!(matches!(outcome, CommitOutcome::Unavailable { spots_left: 1 }));
    }

    #[tokio::test]
    async fn test_closed_slot_rejects_commit() {
        let (store, svc, slot) = seeded(4).await;
        store
            .update_slot(
                slot.id,
                SlotUpdate {
                    is_available: Some(false),
                    ..SlotUpdate::default()
                },
            )
            .await
            .unwrap();
        let outcome = store
            .commit_booking(
                BookingCommit {
                    booking: new_booking(svc.id, 1),
                    guard: CapacityGuard::Slot(slot.id),
                },
                Utc::now(),
            )
            .await
            .unwrap();
        assert!(matches!(outcome, CommitOutcome::Unavailable { spots_left: 0 }));
    }

    #[tokio::test]
    async fn test_aggregate_commit_counts_active_bookings() {
        let store = MemoryBookingStore::new();
        let svc = store.create_service(service(5)).await.unwrap();
        let guard = CapacityGuard::Aggregate { max_capacity: 5 };

        for _ in 0..2 {
            let outcome = store
                .commit_booking(
                    BookingCommit {
                        booking: new_booking(svc.id, 2),
                        guard,
                    },
                    Utc::now(),
                )
                .await
                .unwrap();
            assert!(matches!(outcome, CommitOutcome::Committed(_)));
        }

        let outcome = store
            .commit_booking(
                BookingCommit {
                    booking: new_booking(svc.id, 2),
                    guard,
                },
                Utc::now(),
            )
            .await
            .unwrap();
        assert!(matches!(outcome, CommitOutcome::Unavailable { spots_left: 1 }));
    }

    #[tokio::test]
    async fn test_cancel_releases_slot_but_no_show_does_not() {
        let (store, svc, slot) = seeded(4).await;
        let mut ids = Vec::new();
        for _ in 0..2 {
            let outcome = store
                .commit_booking(
                    BookingCommit {
                        booking: new_booking(svc.id, 2),
                        guard: CapacityGuard::Slot(slot.id),
                    },
                    Utc::now(),
                )
                .await
                .unwrap();
            let CommitOutcome::Committed(b) = outcome else {
                panic!("expected commit");
            };
            ids.push(b.id);
        }

        let now = Utc::now();
        let cancelled = store
            .transition_booking(ids[0], BookingStatus::Pending, BookingStatus::Cancelled, now)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(cancelled.cancelled_at, Some(now));
        assert_eq!(store.find_slot(slot.id).await.unwrap().unwrap().booked, 2);

        store
            .transition_booking(ids[1], BookingStatus::Pending, BookingStatus::NoShow, now)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(store.find_slot(slot.id).await.unwrap().unwrap().booked, 2);
    }

    #[tokio::test]
    async fn test_transition_from_stale_status_is_none() {
        let (store, svc, slot) = seeded(4).await;
        let CommitOutcome::Committed(b) = store
            .commit_booking(
                BookingCommit {
                    booking: new_booking(svc.id, 1),
                    guard: CapacityGuard::Slot(slot.id),
                },
                Utc::now(),
            )
            .await
            .unwrap()
        else {
            panic!("expected commit");
        };

        let stale = store
            .transition_booking(
                b.id,
                BookingStatus::Confirmed,
                BookingStatus::Cancelled,
                Utc::now(),
            )
            .await
            .unwrap();
        assert!(stale.is_none());
        assert_eq!(store.find_slot(slot.id).await.unwrap().unwrap().booked, 1);
    }

    #[tokio::test]
    async fn test_concurrent_commits_never_overbook() {
        let (store, svc, slot) = seeded(5).await;

        let attempts = (0..20).map(|_| {
            let store = store.clone();
            let booking = new_booking(svc.id, 1);
            tokio::spawn(async move {
                store
                    .commit_booking(
                        BookingCommit {
                            booking,
                            guard: CapacityGuard::Slot(slot.id),
                        },
                        Utc::now(),
                    )
                    .await
                    .unwrap()
            })
        });
        let outcomes = futures::future::join_all(attempts).await;

        let committed = outcomes
            .into_iter()
            .filter(|o| matches!(o.as_ref().unwrap(), CommitOutcome::Committed(_)))
            .count();
        assert_eq!(committed, 5);
        assert_eq!(store.find_slot(slot.id).await.unwrap().unwrap().booked, 5);
    }
}
