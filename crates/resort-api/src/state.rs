//! Application state shared across all handlers and middleware.

use std::sync::Arc;
use std::time::Instant;

use resort_core::config::AppConfig;
use resort_core::error::AppError;
use resort_core::traits::Clock;
use resort_database::BookingStore;
use resort_service::{BookingService, CatalogService, SlotService};

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
/// All fields are `Arc`-wrapped for cheap cloning across tasks.
#[derive(Debug, Clone)]
pub struct AppState {
    // ── Configuration ────────────────────────────────────────
    /// Application configuration
    pub config: Arc<AppConfig>,

    // ── Infrastructure ───────────────────────────────────────
    /// Booking store (PostgreSQL or in-memory)
    pub store: Arc<dyn BookingStore>,
    /// When the process started serving
    pub started_at: Instant,

    // ── Services ─────────────────────────────────────────────
    /// Service catalog
    pub catalog: Arc<CatalogService>,
    /// Time slot management and occupancy
    pub slots: Arc<SlotService>,
    /// Booking admission and lifecycle
    pub bookings: Arc<BookingService>,
}

impl AppState {
    /// Wire the services over `store` and `clock`.
    pub fn new(
        config: AppConfig,
        store: Arc<dyn BookingStore>,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, AppError> {
        let booking_config = config.booking.clone();

        let catalog = Arc::new(CatalogService::new(
            Arc::clone(&store),
            Arc::clone(&clock),
            booking_config.clone(),
        ));
        let slots = Arc::new(SlotService::new(Arc::clone(&store), booking_config.clone()));
        let bookings = Arc::new(BookingService::new(
            Arc::clone(&store),
            clock,
            &booking_config,
        )?);

        Ok(Self {
            config: Arc::new(config),
            store,
            started_at: Instant::now(),
            catalog,
            slots,
            bookings,
        })
    }
}
