use crate::parking::lot::Receipt;
use crate::parking::vehicles::{ParkedVehicle, VehicleCategory};
use std::any::Any;
use tracing::info;

/// Domain events emitted while the register is running.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    VehicleParked {
        plate: String,
        category: VehicleCategory,
    },
    VehicleLeft {
        plate: String,
        category: VehicleCategory,
        billed_units: u32,
        fee: f64,
    },
}

impl Event {
    pub fn new_parked(vehicle: &ParkedVehicle) -> Event {
        Event::VehicleParked {
            plate: String::from(vehicle.plate()),
            category: vehicle.category(),
        }
    }

    pub fn new_left(receipt: &Receipt) -> Event {
        Event::VehicleLeft {
            plate: receipt.plate.clone(),
            category: receipt.category,
            billed_units: receipt.billed_units,
            fee: receipt.fee,
        }
    }
}

pub trait EventsSubscriber {
    fn receive_event(&mut self, time: u32, event: &Event);

    fn finish(&mut self) {}

    fn as_any(&mut self) -> &mut dyn Any;
}

pub struct EventsLogger {}

impl EventsSubscriber for EventsLogger {
    fn receive_event(&mut self, time: u32, event: &Event) {
        info!("{time}: {event:?}");
    }

    fn as_any(&mut self) -> &mut dyn Any {
        self
    }
}

/// EventsPublisher owns event subscribers. Subscribers are trait objects,
/// hence they have to be passed in a Box. On publish_event all subscribers'
/// receive_event methods are called.
#[derive(Default)]
pub struct EventsPublisher {
    handlers: Vec<Box<dyn EventsSubscriber + Send>>,
}

impl EventsPublisher {
    pub fn new() -> Self {
        EventsPublisher {
            handlers: Vec::new(),
        }
    }

    pub fn add_subscriber(&mut self, handler: Box<dyn EventsSubscriber + Send>) {
        self.handlers.push(handler);
    }

    pub fn publish_event(&mut self, time: u32, event: &Event) {
        for handler in self.handlers.iter_mut() {
            handler.receive_event(time, event);
        }
    }

    pub fn finish(&mut self) {
        for handler in self.handlers.iter_mut() {
            handler.finish();
        }
    }

    pub fn get_subscriber<T: EventsSubscriber + 'static>(&mut self) -> Option<&mut T> {
        let mut result = None;
        for handler in self.handlers.iter_mut() {
            if let Some(collector) = handler.as_any().downcast_mut::<T>() {
                result = Some(collector)
            };
        }
        result
    }
}
