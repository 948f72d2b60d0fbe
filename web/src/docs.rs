//! Document rendering seam: boarding passes and bag tags.
//!
//! Generators are external collaborators: they take a passenger (located by
//! id) and hand back an opaque byte payload plus a content type. The shell
//! never inspects the output, it only serves it. Swapping the plain-text
//! renderer for an image/PDF generator means implementing
//! [`DocumentRenderer`] and injecting it into the application state.

use dcs_core::{Flight, Passenger};

/// An opaque rendered document.
pub struct Document {
    /// The payload bytes.
    pub bytes: Vec<u8>,
    /// MIME content type of the payload.
    pub content_type: &'static str,
}

/// Renders passenger documents. Implementations must be cheap to call from
/// request handlers.
pub trait DocumentRenderer: Send + Sync {
    /// Render a boarding pass for a passenger on a flight.
    fn boarding_pass(&self, flight: &Flight, passenger: &Passenger) -> Document;

    /// Render a bag-tag label for a passenger on a flight.
    fn bag_tag(&self, flight: &Flight, passenger: &Passenger) -> Document;
}

/// Plain-text renderer used as the default implementation.
#[derive(Debug, Default, Clone, Copy)]
pub struct TextRenderer;

impl DocumentRenderer for TextRenderer {
    fn boarding_pass(&self, flight: &Flight, passenger: &Passenger) -> Document {
        let text = format!(
            "BOARDING PASS\n\
             {surname}/{given}\n\
             FLIGHT {flight_no}  DATE {flight_date}\n\
             FROM {origin}  TO {destination}\n\
             SEAT {seat}  SEQ {seq}  PNR {pnr}\n",
            surname = passenger.surname,
            given = passenger.given,
            flight_no = flight.flight_no,
            flight_date = flight.flight_date,
            origin = flight.origin,
            destination = flight.destination,
            seat = passenger.seat,
            seq = passenger.sequence_no,
            pnr = passenger.pnr,
        );
        Document {
            bytes: text.into_bytes(),
            content_type: "text/plain; charset=utf-8",
        }
    }

    fn bag_tag(&self, flight: &Flight, passenger: &Passenger) -> Document {
        let text = format!(
            "BAG TAG\n\
             {surname}/{given}\n\
             {flight_no} {flight_date} {destination}\n\
             SEQ {seq}  BAGS {bags}\n",
            surname = passenger.surname,
            given = passenger.given,
            flight_no = flight.flight_no,
            flight_date = flight.flight_date,
            destination = flight.destination,
            seq = passenger.sequence_no,
            bags = passenger.bag_count,
        );
        Document {
            bytes: text.into_bytes(),
            content_type: "text/plain; charset=utf-8",
        }
    }
}
