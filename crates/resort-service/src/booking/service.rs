//! Booking admission, lifecycle and payment recording.

use std::sync::Arc;

use chrono::{FixedOffset, NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use resort_core::config::BookingConfig;
use resort_core::error::AppError;
use resort_core::traits::Clock;
use resort_core::types::id::{BookingId, ReservationId, ServiceId};
use resort_core::types::pagination::{PageRequest, PageResponse};
use resort_database::{BookingCommit, BookingStore, CapacityGuard, CommitOutcome};
use resort_entity::booking::{BookingStatus, NewBooking, PaymentStatus, ServiceBooking};
use resort_entity::service::HotelService;

use crate::availability::{
    Admission, ClockTime, Rejection, Schedule, calculate_service_price, check_availability,
    check_slot_admission,
};
use crate::context::RequestContext;
use crate::slot::service::schedule_fault;

/// A guest's request to book a session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingRequest {
    pub service_id: ServiceId,
    pub booking_date: NaiveDate,
    /// Session start, `HH:MM`.
    pub booking_time: String,
    pub participants: i32,
    #[serde(default)]
    pub reservation_id: Option<ReservationId>,
    #[serde(default)]
    pub special_requests: Option<String>,
}

/// Result of a dry-run admission check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AvailabilityQuote {
    /// Whether the request would be admitted right now.
    pub admission: Admission,
    /// Price the booking would be charged.
    pub total_price: Decimal,
}

/// Result of a booking attempt.
#[derive(Debug, Clone)]
pub enum BookingOutcome {
    /// The booking was created in `PENDING`.
    Booked(ServiceBooking),
    /// The request was refused.
    Rejected(Rejection),
}

/// Creates bookings and drives them through their lifecycle.
#[derive(Debug, Clone)]
pub struct BookingService {
    store: Arc<dyn BookingStore>,
    clock: Arc<dyn Clock>,
    offset: FixedOffset,
}

impl BookingService {
    /// Creates a new booking service.
    pub fn new(
        store: Arc<dyn BookingStore>,
        clock: Arc<dyn Clock>,
        config: &BookingConfig,
    ) -> Result<Self, AppError> {
        Ok(Self {
            store,
            clock,
            offset: config.local_offset()?,
        })
    }

    /// Check whether a booking would be admitted and what it would cost,
    /// without writing anything.
    pub async fn check(
        &self,
        service_id: ServiceId,
        date: NaiveDate,
        time: &str,
        participants: i32,
    ) -> Result<AvailabilityQuote, AppError> {
        let time = parse_time(time)?;
        let service = self.service(service_id).await?;
        let (admission, _) = self.evaluate(&service, date, time, participants).await?;
        Ok(AvailabilityQuote {
            admission,
            total_price: calculate_service_price(&service, participants.max(0)),
        })
    }

    /// Admit and record a booking.
    ///
    /// The admission check is repeated atomically inside the store; losing
    /// a race there yields a retryable [`Rejection::SlotNoLongerAvailable`].
    pub async fn book(
        &self,
        ctx: &RequestContext,
        request: BookingRequest,
    ) -> Result<BookingOutcome, AppError> {
        let time = parse_time(&request.booking_time)?;
        let service = self.service(request.service_id).await?;

        let (admission, guard) = self
            .evaluate(&service, request.booking_date, time, request.participants)
            .await?;
        if let Admission::Rejected(rejection) = admission {
            return Ok(self.rejected(&service, rejection));
        }

        if let Some(rejection) = self
            .check_reservation(ctx, &service, request.booking_date, request.reservation_id)
            .await?
        {
            return Ok(self.rejected(&service, rejection));
        }

        let booking = NewBooking {
            service_id: service.id,
            user_id: ctx.user_id,
            reservation_id: request.reservation_id,
            booking_date: request.booking_date,
            booking_time: time.to_string(),
            participants: request.participants,
            total_price: calculate_service_price(&service, request.participants),
            special_requests: request.special_requests.filter(|s| !s.trim().is_empty()),
        };

        let outcome = self
            .store
            .commit_booking(BookingCommit { booking, guard }, self.clock.now())
            .await?;

        match outcome {
            CommitOutcome::Committed(booking) => {
                info!(
                    booking_id = %booking.id,
                    service_id = %booking.service_id,
                    user_id = %booking.user_id,
                    date = %booking.booking_date,
                    time = %booking.booking_time,
                    participants = booking.participants,
                    "Booking created"
                );
                Ok(BookingOutcome::Booked(booking))
            }
            CommitOutcome::Unavailable { spots_left } => Ok(self.rejected(
                &service,
                Rejection::SlotNoLongerAvailable { spots_left },
            )),
        }
    }

    /// Fetch a booking visible to the caller.
    pub async fn get(&self, ctx: &RequestContext, id: BookingId) -> Result<ServiceBooking, AppError> {
        let booking = self.booking(id).await?;
        if !ctx.can_act_for(booking.user_id) {
            return Err(AppError::forbidden("Not allowed to view this booking"));
        }
        Ok(booking)
    }

    /// The caller's own bookings.
    pub async fn list_mine(
        &self,
        ctx: &RequestContext,
        page: PageRequest,
    ) -> Result<PageResponse<ServiceBooking>, AppError> {
        self.store.list_user_bookings(ctx.user_id, &page).await
    }

    /// Cancel a booking on behalf of its owner or an operator.
    pub async fn cancel(
        &self,
        ctx: &RequestContext,
        id: BookingId,
    ) -> Result<ServiceBooking, AppError> {
        let booking = self.booking(id).await?;
        if !ctx.can_act_for(booking.user_id) {
            return Err(AppError::forbidden("Not allowed to cancel this booking"));
        }
        self.apply_transition(ctx, booking, BookingStatus::Cancelled)
            .await
    }

    /// Operator-driven status change.
    pub async fn transition(
        &self,
        ctx: &RequestContext,
        id: BookingId,
        to: BookingStatus,
    ) -> Result<ServiceBooking, AppError> {
        ctx.require_staff()?;
        let booking = self.booking(id).await?;
        self.apply_transition(ctx, booking, to).await
    }

    /// Record the payment gateway's verdict.
    pub async fn record_payment(
        &self,
        ctx: &RequestContext,
        id: BookingId,
        status: PaymentStatus,
        reference: Option<String>,
    ) -> Result<ServiceBooking, AppError> {
        ctx.require_staff()?;
        let booking = self
            .store
            .record_payment(id, status, reference, self.clock.now())
            .await?
            .ok_or_else(|| AppError::not_found(format!("Booking {id} not found")))?;

        info!(
            booking_id = %id,
            payment_status = ?status,
            actor = %ctx.user_id,
            "Payment recorded"
        );
        Ok(booking)
    }

    async fn apply_transition(
        &self,
        ctx: &RequestContext,
        booking: ServiceBooking,
        to: BookingStatus,
    ) -> Result<ServiceBooking, AppError> {
        let from = booking.status;
        if !from.can_transition_to(to) {
            return Err(AppError::conflict(format!(
                "Cannot move booking from {from} to {to}"
            )));
        }

        let updated = self
            .store
            .transition_booking(booking.id, from, to, self.clock.now())
            .await?
            .ok_or_else(|| {
                AppError::conflict(format!("Booking {} changed status concurrently", booking.id))
            })?;

        info!(
            booking_id = %updated.id,
            from = %from,
            to = %to,
            actor = %ctx.user_id,
            "Booking status changed"
        );
        Ok(updated)
    }

    /// Run the admission gates and decide how the commit must guard capacity.
    async fn evaluate(
        &self,
        service: &HotelService,
        date: NaiveDate,
        time: ClockTime,
        participants: i32,
    ) -> Result<(Admission, CapacityGuard), AppError> {
        let now = self.local_now();

        if let Some(slot) = self
            .store
            .find_slot_at(service.id, date, &time.to_string())
            .await?
        {
            let admission = check_slot_admission(service, &slot, participants, now)
                .map_err(|e| schedule_fault(service, e))?;
            return Ok((admission, CapacityGuard::Slot(slot.id)));
        }

        let existing = self.store.active_bookings_on(service.id, date).await?;
        let mut admission = check_availability(service, date, time, participants, &existing, now);

        if admission.is_admitted() {
            let schedule = Schedule::of(service).map_err(|e| schedule_fault(service, e))?;
            if !schedule.starts_at(time) {
                admission = Admission::Rejected(Rejection::NotOnSchedule {
                    time: time.to_string(),
                });
            }
        }

        Ok((
            admission,
            CapacityGuard::Aggregate {
                max_capacity: service.max_capacity,
            },
        ))
    }

    async fn check_reservation(
        &self,
        ctx: &RequestContext,
        service: &HotelService,
        date: NaiveDate,
        reservation_id: Option<ReservationId>,
    ) -> Result<Option<Rejection>, AppError> {
        let Some(reservation_id) = reservation_id else {
            return Ok(service
                .requires_reservation
                .then_some(Rejection::ReservationRequired));
        };
        let covers = self
            .store
            .find_reservation(reservation_id)
            .await?
            .is_some_and(|r| r.covers(ctx.user_id, date));
        Ok((!covers).then_some(Rejection::ReservationNotValid))
    }

    fn rejected(&self, service: &HotelService, rejection: Rejection) -> BookingOutcome {
        debug!(
            service_id = %service.id,
            reason = rejection.code(),
            "Booking rejected"
        );
        BookingOutcome::Rejected(rejection)
    }

    fn local_now(&self) -> NaiveDateTime {
        self.clock.now().with_timezone(&self.offset).naive_local()
    }

    async fn service(&self, id: ServiceId) -> Result<HotelService, AppError> {
        self.store
            .find_service(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Service {id} not found")))
    }

    async fn booking(&self, id: BookingId) -> Result<ServiceBooking, AppError> {
        self.store
            .find_booking(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Booking {id} not found")))
    }
}

fn parse_time(time: &str) -> Result<ClockTime, AppError> {
    time.parse()
        .map_err(|_| AppError::validation(format!("Invalid booking time '{time}', expected HH:MM")))
}
