use std::io;
use std::io::{BufRead, Write};

use itertools::Itertools;
use tracing::info;

use crate::parking::config::Config;
use crate::parking::events::{Event, EventsPublisher};
use crate::parking::lot::{ParkingLot, Receipt};
use crate::parking::vehicles::VehicleCategory;

pub type Clock = Box<dyn FnMut() -> u32>;

/// One interactive session at the facility gate. The session reads menu
/// commands from `input`, writes prompts, receipts and status blocks to
/// `output`, and asks the injected clock for the current time whenever a
/// vehicle enters or leaves. Invalid input is answered with a message and a
/// fresh prompt; it never reaches the lot.
pub struct Session {
    lot: ParkingLot,
    events: EventsPublisher,
    clock: Clock,
}

impl Session {
    pub fn new(lot: ParkingLot, events: EventsPublisher, clock: Clock) -> Self {
        Session { lot, events, clock }
    }

    pub fn from_config(config: &Config, events: EventsPublisher, clock: Clock) -> Self {
        Session::new(ParkingLot::from_config(config), events, clock)
    }

    pub fn lot(&self) -> &ParkingLot {
        &self.lot
    }

    pub fn events_mut(&mut self) -> &mut EventsPublisher {
        &mut self.events
    }

    /// Runs the menu loop until the user quits or `input` is exhausted.
    pub fn run<R: BufRead, W: Write>(&mut self, input: &mut R, output: &mut W) -> io::Result<()> {
        info!("Opening session at a lot with {} slots.", self.lot.capacity());

        loop {
            write!(
                output,
                "\n--- PARKING REGISTER ---\n1. Vehicle entry\n2. Vehicle exit\n3. Lot status\n0. Quit\nChoice: "
            )?;
            output.flush()?;

            let Some(line) = read_line(input)? else {
                break;
            };
            let choice: u32 = match line.trim().parse() {
                Ok(choice) => choice,
                Err(_) => {
                    writeln!(output, "Please enter a number between 0 and 3.")?;
                    continue;
                }
            };

            match choice {
                0 => break,
                1 => self.vehicle_entry(input, output)?,
                2 => self.vehicle_exit(input, output)?,
                3 => self.lot_status(output)?,
                _ => writeln!(output, "Unknown menu entry. Please choose between 0 and 3.")?,
            }
        }

        self.events.finish();
        info!("Session finished.");
        Ok(())
    }

    fn vehicle_entry<R: BufRead, W: Write>(
        &mut self,
        input: &mut R,
        output: &mut W,
    ) -> io::Result<()> {
        if self.lot.is_full() {
            writeln!(output, "The lot is completely full. No entry possible.")?;
            return Ok(());
        }

        write!(output, "Plate: ")?;
        output.flush()?;
        let Some(line) = read_line(input)? else {
            return Ok(());
        };
        let plate = line.trim().to_string();
        if plate.is_empty() {
            writeln!(output, "Plate must not be empty.")?;
            return Ok(());
        }
        if self.lot.is_parked(&plate) {
            writeln!(output, "A vehicle with plate {} is already parked.", plate)?;
            return Ok(());
        }

        write!(output, "Category (1-Car, 2-Motorbike, 3-Truck): ")?;
        output.flush()?;
        let Some(line) = read_line(input)? else {
            return Ok(());
        };
        let Ok(code) = line.trim().parse::<u32>() else {
            writeln!(output, "Category must be a number between 1 and 3.")?;
            return Ok(());
        };
        let Some(category) = category_for_code(code) else {
            writeln!(output, "Unknown category code {}.", code)?;
            return Ok(());
        };

        let now = (self.clock)();
        match self.lot.park(&plate, category, now) {
            Ok(vehicle) => {
                writeln!(
                    output,
                    "Vehicle {} entered at {}.",
                    vehicle.plate(),
                    format_time(vehicle.entry_time())
                )?;
                self.events.publish_event(now, &Event::new_parked(&vehicle));
            }
            Err(e) => writeln!(output, "{}", e)?,
        }
        Ok(())
    }

    fn vehicle_exit<R: BufRead, W: Write>(
        &mut self,
        input: &mut R,
        output: &mut W,
    ) -> io::Result<()> {
        write!(output, "Plate of the leaving vehicle: ")?;
        output.flush()?;
        let Some(line) = read_line(input)? else {
            return Ok(());
        };
        let plate = line.trim().to_string();
        if plate.is_empty() {
            writeln!(output, "Plate must not be empty.")?;
            return Ok(());
        }

        let now = (self.clock)();
        match self.lot.leave(&plate, now) {
            Ok(receipt) => {
                self.write_receipt(output, &receipt)?;
                self.events.publish_event(now, &Event::new_left(&receipt));
            }
            Err(e) => writeln!(output, "{}", e)?,
        }
        Ok(())
    }

    fn write_receipt<W: Write>(&self, output: &mut W, receipt: &Receipt) -> io::Result<()> {
        let unit_seconds = self.lot.billing().unit_seconds;
        writeln!(output, "----------------------------")?;
        writeln!(output, "         RECEIPT")?;
        writeln!(output, "----------------------------")?;
        writeln!(output, "Plate    : {}", receipt.plate)?;
        writeln!(output, "Category : {}", receipt.category)?;
        writeln!(output, "Entry    : {}", format_time(receipt.entry_time))?;
        writeln!(output, "Exit     : {}", format_time(receipt.exit_time))?;
        writeln!(
            output,
            "Billed   : {} units ({} s per unit, partial units are dropped, at least one unit is billed)",
            receipt.billed_units, unit_seconds
        )?;
        writeln!(output, "Total    : {:.2}", receipt.fee)?;
        writeln!(output, "----------------------------")?;
        Ok(())
    }

    fn lot_status<W: Write>(&self, output: &mut W) -> io::Result<()> {
        let status = self.lot.status();

        writeln!(output, "\n--- LOT STATUS ---")?;
        writeln!(output, "Capacity: {}", status.capacity)?;
        writeln!(output, "Occupied: {}", status.occupied)?;
        writeln!(output, "Free    : {}", status.free)?;
        if !status.vehicles.is_empty() {
            writeln!(output, "Parked vehicles:")?;
            let lines = status
                .vehicles
                .iter()
                .enumerate()
                .map(|(i, v)| {
                    format!(
                        "{}. {} [{}] - entered at {}",
                        i + 1,
                        v.plate(),
                        v.category(),
                        format_time(v.entry_time())
                    )
                })
                .join("\n");
            writeln!(output, "{}", lines)?;
        }
        writeln!(output, "------------------")?;
        Ok(())
    }
}

fn category_for_code(code: u32) -> Option<VehicleCategory> {
    match code {
        1 => Some(VehicleCategory::Car),
        2 => Some(VehicleCategory::Motorbike),
        3 => Some(VehicleCategory::Truck),
        _ => None,
    }
}

/// Formats a second counter as HH:MM:SS.
pub fn format_time(seconds: u32) -> String {
    format!(
        "{:02}:{:02}:{:02}",
        seconds / 3600,
        (seconds % 3600) / 60,
        seconds % 60
    )
}

fn read_line<R: BufRead>(input: &mut R) -> io::Result<Option<String>> {
    let mut line = String::new();
    let bytes = input.read_line(&mut line)?;
    if bytes == 0 {
        Ok(None)
    } else {
        Ok(Some(line))
    }
}
