use crate::parking::config::{Billing, Config};
use crate::parking::vehicles::{ParkedVehicle, VehicleCategory};
use derive_builder::Builder;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParkError {
    #[error("The parking lot is full, all {0} slots are taken.")]
    CapacityExceeded(usize),
    #[error("A vehicle with plate {0} is already parked.")]
    DuplicateVehicle(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LeaveError {
    #[error("No parked vehicle with plate {0}.")]
    NotFound(String),
}

/// Settlement record handed out when a vehicle leaves.
#[derive(Builder, Debug, Clone, PartialEq)]
pub struct Receipt {
    pub plate: String,
    pub category: VehicleCategory,
    pub entry_time: u32,
    pub exit_time: u32,
    pub billed_units: u32,
    pub fee: f64,
}

/// Point-in-time view of the facility. Holds copies, so mutations of the lot
/// after the call are not reflected.
#[derive(Debug, Clone, PartialEq)]
pub struct LotStatus {
    pub capacity: usize,
    pub occupied: usize,
    pub free: usize,
    pub vehicles: Vec<ParkedVehicle>,
}

/// The occupancy register of a single parking facility. The lot owns every
/// record of a currently parked vehicle; vehicles come in through
/// [`park`](Self::park) and leave with a settlement receipt through
/// [`leave`](Self::leave). The vehicle list keeps arrival order.
#[derive(Debug)]
pub struct ParkingLot {
    capacity: usize,
    billing: Billing,
    vehicles: Vec<ParkedVehicle>,
}

impl ParkingLot {
    pub fn new(capacity: usize, billing: Billing) -> Self {
        assert!(capacity > 0, "Parking lot capacity must be positive.");
        assert!(
            billing.unit_seconds > 0,
            "Billing unit must be a positive number of seconds."
        );

        ParkingLot {
            capacity,
            billing,
            vehicles: Vec::with_capacity(capacity),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        ParkingLot::new(config.facility.capacity, config.billing)
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn occupied(&self) -> usize {
        self.vehicles.len()
    }

    pub fn billing(&self) -> Billing {
        self.billing
    }

    pub fn is_full(&self) -> bool {
        self.vehicles.len() >= self.capacity
    }

    pub fn is_parked(&self, plate: &str) -> bool {
        self.vehicles.iter().any(|v| v.plate() == plate)
    }

    /// Admits a vehicle at time `now`. On success the created record is
    /// appended to the lot and a copy is returned to the caller; a rejected
    /// admission leaves the lot untouched.
    pub fn park(
        &mut self,
        plate: &str,
        category: VehicleCategory,
        now: u32,
    ) -> Result<ParkedVehicle, ParkError> {
        if self.is_full() {
            return Err(ParkError::CapacityExceeded(self.capacity));
        }
        if self.is_parked(plate) {
            return Err(ParkError::DuplicateVehicle(String::from(plate)));
        }

        let vehicle = ParkedVehicle::new(plate, category, now);
        self.vehicles.push(vehicle.clone());
        Ok(vehicle)
    }

    /// Settles and removes the vehicle with the given plate at time `now`.
    /// The elapsed stay is converted into billed units by the billing policy
    /// (truncated, at least one unit) before the record is dropped.
    pub fn leave(&mut self, plate: &str, now: u32) -> Result<Receipt, LeaveError> {
        let index = self
            .vehicles
            .iter()
            .position(|v| v.plate() == plate)
            .ok_or_else(|| LeaveError::NotFound(String::from(plate)))?;
        let vehicle = self.vehicles.remove(index);

        let elapsed = now.saturating_sub(vehicle.entry_time());
        let billed_units = self.billing.units_for(elapsed);
        let fee = vehicle.category().fee(billed_units);

        Ok(ReceiptBuilder::default()
            .plate(String::from(vehicle.plate()))
            .category(vehicle.category())
            .entry_time(vehicle.entry_time())
            .exit_time(now)
            .billed_units(billed_units)
            .fee(fee)
            .build()
            .unwrap())
    }

    pub fn status(&self) -> LotStatus {
        LotStatus {
            capacity: self.capacity,
            occupied: self.vehicles.len(),
            free: self.capacity - self.vehicles.len(),
            vehicles: self.vehicles.clone(),
        }
    }
}
