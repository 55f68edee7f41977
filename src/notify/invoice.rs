//! Plain-text booking invoices.

use rust_decimal::Decimal;
use rust_decimal::prelude::FromPrimitive;

use crate::models::{Booking, BookingStatus, NewOutboxMessage, Room};

/// Subject for a freshly created booking.
pub const CONFIRMATION_SUBJECT: &str = "Booking Confirmation - Invoice";

/// Invoice figures for one booking.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invoice {
    /// Nights charged.
    pub nights: i64,
    /// Price per night.
    pub nightly_price: Decimal,
    /// nights × nightly price.
    pub subtotal: Decimal,
    /// Tax on the subtotal at the room's rate.
    pub tax: Decimal,
    /// subtotal + tax.
    pub total: Decimal,
}

impl Invoice {
    /// Prices `booking` at `room`'s base price and tax rate (a percentage).
    pub fn for_booking(booking: &Booking, room: &Room) -> Self {
        let nights = booking.nights();
        let nightly_price = Decimal::from_f64(room.base_price).unwrap_or_default().round_dp(2);
        let tax_rate = Decimal::from_f64(room.tax_rate).unwrap_or_default();
        let subtotal = nightly_price * Decimal::from(nights);
        let tax = (subtotal * tax_rate / Decimal::ONE_HUNDRED).round_dp(2);
        Self {
            nights,
            nightly_price,
            subtotal,
            tax,
            total: subtotal + tax,
        }
    }
}

/// Subject for a status change.
pub fn status_subject(status: BookingStatus) -> String {
    format!("Booking {} - Updated Invoice", status.title())
}

/// Renders the invoice body.
pub fn render(booking: &Booking, room: &Room) -> String {
    let invoice = Invoice::for_booking(booking, room);
    format!(
        "Booking #{id}\n\
         Status: {status}\n\
         Room: {number} ({room_type})\n\
         Check-in: {check_in}\n\
         Check-out: {check_out}\n\
         Nights: {nights}\n\
         Nightly price: {nightly:.2}\n\
         Subtotal: {subtotal:.2}\n\
         Tax ({rate}%): {tax:.2}\n\
         Total: {total:.2}\n",
        id = booking.id,
        status = booking.status.title(),
        number = room.room_number,
        room_type = room.room_type,
        check_in = booking.check_in_date,
        check_out = booking.check_out_date,
        nights = invoice.nights,
        nightly = invoice.nightly_price,
        subtotal = invoice.subtotal,
        rate = room.tax_rate,
        tax = invoice.tax,
        total = invoice.total,
    )
}

/// Builds the outbox message for a new booking, if it has a contact email.
pub fn confirmation(booking: &Booking, room: &Room) -> Option<NewOutboxMessage> {
    message(booking, room, CONFIRMATION_SUBJECT.to_string())
}

/// Builds the outbox message for a changed booking, if it has a contact email.
pub fn status_update(booking: &Booking, room: &Room) -> Option<NewOutboxMessage> {
    message(booking, room, status_subject(booking.status))
}

fn message(booking: &Booking, room: &Room, subject: String) -> Option<NewOutboxMessage> {
    let recipient = booking.email.as_deref().map(str::trim).filter(|e| !e.is_empty())?;
    Some(NewOutboxMessage {
        booking_id: Some(booking.id),
        recipient: recipient.to_string(),
        subject,
        body: render(booking, room),
    })
}
