use std::fmt::{Display, Formatter};

/// The closed set of vehicle categories the facility admits. Each category
/// carries a fixed fee rate per billable unit of parking time. Adding a
/// category means adding a variant and a rate arm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VehicleCategory {
    Car,
    Motorbike,
    Truck,
}

impl VehicleCategory {
    pub fn rate_per_unit(&self) -> f64 {
        match self {
            VehicleCategory::Car => 20.0,
            VehicleCategory::Motorbike => 10.0,
            VehicleCategory::Truck => 40.0,
        }
    }

    /// Fee for a stay of the given number of billable units.
    pub fn fee(&self, billed_units: u32) -> f64 {
        self.rate_per_unit() * billed_units as f64
    }
}

impl Display for VehicleCategory {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            VehicleCategory::Car => "Car",
            VehicleCategory::Motorbike => "Motorbike",
            VehicleCategory::Truck => "Truck",
        };
        write!(f, "{}", name)
    }
}

/// A vehicle currently inside the facility. Created when a vehicle is
/// admitted and dropped when it leaves. Plate, category and entry time are
/// fixed for the lifetime of the record.
#[derive(Debug, Clone, PartialEq)]
pub struct ParkedVehicle {
    plate: String,
    category: VehicleCategory,
    entry_time: u32,
}

impl ParkedVehicle {
    pub(crate) fn new(plate: &str, category: VehicleCategory, entry_time: u32) -> Self {
        ParkedVehicle {
            plate: String::from(plate),
            category,
            entry_time,
        }
    }

    pub fn plate(&self) -> &str {
        &self.plate
    }

    pub fn category(&self) -> VehicleCategory {
        self.category
    }

    pub fn entry_time(&self) -> u32 {
        self.entry_time
    }
}

#[cfg(test)]
mod tests {
    use crate::parking::vehicles::{ParkedVehicle, VehicleCategory};
    use assert_approx_eq::assert_approx_eq;

    #[test]
    fn rates_per_category() {
        assert_approx_eq!(20.0, VehicleCategory::Car.rate_per_unit());
        assert_approx_eq!(10.0, VehicleCategory::Motorbike.rate_per_unit());
        assert_approx_eq!(40.0, VehicleCategory::Truck.rate_per_unit());
    }

    #[test]
    fn fee_scales_with_units() {
        assert_approx_eq!(60.0, VehicleCategory::Car.fee(3));
        assert_approx_eq!(10.0, VehicleCategory::Motorbike.fee(1));
        assert_approx_eq!(0.0, VehicleCategory::Truck.fee(0));
    }

    #[test]
    fn display_names() {
        assert_eq!("Car", VehicleCategory::Car.to_string());
        assert_eq!("Motorbike", VehicleCategory::Motorbike.to_string());
        assert_eq!("Truck", VehicleCategory::Truck.to_string());
    }

    #[test]
    fn record_keeps_creation_values() {
        let vehicle = ParkedVehicle::new("34ABC", VehicleCategory::Car, 42);
        assert_eq!("34ABC", vehicle.plate());
        assert_eq!(VehicleCategory::Car, vehicle.category());
        assert_eq!(42, vehicle.entry_time());
    }
}
