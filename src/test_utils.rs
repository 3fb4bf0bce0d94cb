use crate::parking::config::Billing;
use crate::parking::controller::Clock;
use crate::parking::lot::ParkingLot;
use crate::parking::vehicles::VehicleCategory;

pub fn default_billing() -> Billing {
    Billing { unit_seconds: 1 }
}

pub fn create_lot(capacity: usize) -> ParkingLot {
    ParkingLot::new(capacity, default_billing())
}

pub fn fill_lot(lot: &mut ParkingLot, count: usize, now: u32) {
    for i in 0..count {
        lot.park(&format!("FILL-{i}"), VehicleCategory::Car, now)
            .expect("Failed to park filler vehicle");
    }
}

/// A clock that returns the given instants one by one. Panics when asked for
/// more instants than were scripted.
pub fn scripted_clock(times: Vec<u32>) -> Clock {
    let mut iter = times.into_iter();
    Box::new(move || iter.next().expect("Clock was read more often than scripted"))
}
