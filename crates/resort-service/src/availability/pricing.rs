//! Price and duration helpers.

use rust_decimal::Decimal;

use resort_entity::service::HotelService;

/// Total price for a group: per-person services scale with `participants`,
/// others charge the flat price.
pub fn calculate_service_price(service: &HotelService, participants: i32) -> Decimal {
    if service.price_per_person {
        service.price * Decimal::from(participants)
    } else {
        service.price
    }
}

/// Human-readable session length: `45 min`, `1h`, `1h 30min`.
pub fn format_duration(minutes: i32) -> String {
    if minutes < 60 {
        return format!("{minutes} min");
    }
    let (h, m) = (minutes / 60, minutes % 60);
    if m == 0 {
        format!("{h}h")
    } else {
        format!("{h}h {m}min")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::availability::test_support::spa;

    #[test]
    fn test_flat_price_ignores_participants() {
        let mut service = spa("09:00", "12:00", 60, 60);
        service.price = Decimal::new(12050, 2);
        service.price_per_person = false;
        assert_eq!(calculate_service_price(&service, 1), Decimal::new(12050, 2));
        assert_eq!(calculate_service_price(&service, 4), Decimal::new(12050, 2));
    }

    #[test]
    fn test_per_person_price_is_linear() {
        let mut service = spa("09:00", "12:00", 60, 60);
        service.price = Decimal::new(4550, 2);
        service.price_per_person = true;
        assert_eq!(calculate_service_price(&service, 1), Decimal::new(4550, 2));
        assert_eq!(calculate_service_price(&service, 3), Decimal::new(13650, 2));
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(45), "45 min");
        assert_eq!(format_duration(60), "1h");
        assert_eq!(format_duration(90), "1h 30min");
        assert_eq!(format_duration(120), "2h");
        assert_eq!(format_duration(15), "15 min");
    }
}
