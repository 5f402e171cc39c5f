//! Plain-text rendering for the shell.

use colored::Colorize;
use ticketing_types::{
    Cashier, Company, Distributor, Notification, Ticket, TicketingError, Trip, TripRequest, User,
};

pub fn ok(msg: &str) {
    println!("{} {msg}", "ok".green().bold());
}

pub fn note(msg: &str) {
    println!("{msg}");
}

pub fn fail(err: &anyhow::Error) {
    match err.downcast_ref::<TicketingError>() {
        Some(domain) => println!("{} {domain}", "rejected".red().bold()),
        None => println!("{} {err}", "error".yellow().bold()),
    }
}

pub fn user_line(user: &User) -> String {
    let state = if user.active { "active" } else { "inactive" };
    format!(
        "{}  {}  <{}>  {}  {}",
        user.id.short(),
        user.display_name,
        user.email,
        user.role,
        state
    )
}

pub fn company_line(company: &Company) -> String {
    format!(
        "{}  {}  commission {:.1}%  rating {}  contact {}",
        company.id,
        company.name,
        company.commission,
        rating_text(company.rating),
        company.contact
    )
}

pub fn distributor_line(distributor: &Distributor) -> String {
    format!(
        "{}  {}  company {}  commission {:.1}%  rating {}",
        distributor.id,
        distributor.name,
        distributor.company_id.short(),
        distributor.commission,
        rating_text(distributor.rating)
    )
}

pub fn cashier_line(cashier: &Cashier) -> String {
    format!(
        "{}  {}  distributor {}  commission {:.1}%  rating {}",
        cashier.id,
        cashier.name,
        cashier.distributor_id.short(),
        cashier.commission,
        rating_text(cashier.rating)
    )
}

pub fn trip_line(trip: &Trip) -> String {
    format!(
        "{}  {}  to {}  departs {}  seats {}  limit {}  {:?}  approved {}",
        trip.id,
        trip.kind,
        trip.destination,
        trip.departure.format("%Y-%m-%d %H:%M"),
        trip.seats_total,
        trip.per_person_limit,
        trip.status,
        trip.approved_distributor_ids.len()
    )
}

pub fn request_line(request: &TripRequest) -> String {
    format!(
        "{}  trip {}  distributor {}  {:?}",
        request.id,
        request.trip_id.short(),
        request.distributor_id.short(),
        request.status
    )
}

pub fn ticket_line(ticket: &Ticket) -> String {
    format!(
        "{}  trip {}  seat {}  buyer {}  sold {}  {:?}",
        ticket.id,
        ticket.trip_id.short(),
        ticket.seat_number,
        ticket.buyer_name,
        ticket.sold_at.format("%Y-%m-%d %H:%M"),
        ticket.status
    )
}

pub fn notification_line(notification: &Notification) -> String {
    let read = if notification.is_read() { "read" } else { "new" };
    format!(
        "{}  [{}]  {}  ({})",
        notification.id,
        notification.kind,
        notification.payload,
        read
    )
}

fn rating_text(rating: f64) -> String {
    if rating <= 0.0 {
        "unset".to_string()
    } else {
        format!("{rating:.1}")
    }
}

pub fn list<T>(items: &[T], line: impl Fn(&T) -> String, empty: &str) {
    if items.is_empty() {
        println!("{}", empty.dimmed());
        return;
    }
    for item in items {
        println!("  {}", line(item));
    }
}
