//! The interactive command loop.
//!
//! Tokenizes each line, parses numerics and timestamps before any
//! engine is invoked, and renders the result. Engine failures print and
//! the loop continues; only `quit` or end of input end the session.

use crate::app::App;
use crate::render;
use crate::seed;
use anyhow::{anyhow, Context};
use chrono::{DateTime, NaiveDateTime, Utc};
use std::io::{self, BufRead, Write};
use ticketing_engine::directory::ProfileUpdate;
use ticketing_store::{
    CashierStore, CompanyStore, DistributorStore, NotificationStore, RequestStore, TicketStore,
    TripStore, UserStore,
};
use ticketing_types::{
    CashierId, CompanyId, DistributorId, NotificationId, RequestId, Role, TripId, TripSpec, User,
};

pub fn run(app: &App, mut session: Option<User>) -> anyhow::Result<()> {
    render::note("trip ticketing shell; type 'help' for commands");
    let stdin = io::stdin();
    let mut line = String::new();
    loop {
        prompt(&session);
        line.clear();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let tokens: Vec<&str> = line.split_whitespace().collect();
        let Some(&command) = tokens.first() else {
            continue;
        };
        if matches!(command, "quit" | "exit") {
            break;
        }
        if let Err(err) = dispatch(app, &mut session, &tokens) {
            render::fail(&err);
        }
    }
    Ok(())
}

fn prompt(session: &Option<User>) {
    let who = session
        .as_ref()
        .map(|u| u.email.clone())
        .unwrap_or_else(|| "guest".to_string());
    print!("{who}> ");
    let _ = io::stdout().flush();
}

fn dispatch(app: &App, session: &mut Option<User>, tokens: &[&str]) -> anyhow::Result<()> {
    let actor = session.as_ref();
    match tokens[0] {
        "help" | "?" => help(),
        "who" => match actor {
            Some(user) => render::note(&render::user_line(user)),
            None => render::note("not logged in"),
        },
        "login" => {
            let email = arg(tokens, 1, "email")?;
            let user = app
                .store
                .user_by_email(email)
                .ok_or_else(|| anyhow!("no user with email {email}"))?;
            render::ok(&format!("logged in as {}", render::user_line(&user)));
            *session = Some(user);
        }
        "logout" => {
            *session = None;
            render::ok("logged out");
        }
        "seed" => {
            let admin = seed::load(app)?;
            *session = Some(admin);
        }

        "register-user" => {
            let email = arg(tokens, 1, "email")?;
            let name = arg(tokens, 2, "display name")?;
            let role = parse_role(arg(tokens, 3, "role")?)?;
            let user = app.directory.register_user(email, name, role)?;
            render::ok(&render::user_line(&user));
        }
        "create-company" => {
            let owner = user_by_email(app, arg(tokens, 1, "owner email")?)?;
            let name = arg(tokens, 2, "name")?;
            let commission = parse_f64(arg(tokens, 3, "commission")?, "commission")?;
            let contact = arg(tokens, 4, "contact")?;
            let company = app
                .directory
                .create_company(actor, owner.id, name, commission, contact)?;
            render::ok(&render::company_line(&company));
        }
        "create-distributor" => {
            let company_id = CompanyId::new(arg(tokens, 1, "company id")?);
            let owner = user_by_email(app, arg(tokens, 2, "owner email")?)?;
            let name = arg(tokens, 3, "name")?;
            let commission = parse_f64(arg(tokens, 4, "commission")?, "commission")?;
            let contact = arg(tokens, 5, "contact")?;
            let distributor = app.directory.create_distributor(
                actor,
                &company_id,
                owner.id,
                name,
                commission,
                contact,
            )?;
            render::ok(&render::distributor_line(&distributor));
        }
        "create-cashier" => {
            let distributor_id = DistributorId::new(arg(tokens, 1, "distributor id")?);
            let user = user_by_email(app, arg(tokens, 2, "cashier email")?)?;
            let name = arg(tokens, 3, "name")?;
            let commission = parse_f64(arg(tokens, 4, "commission")?, "commission")?;
            let contact = arg(tokens, 5, "contact")?;
            let cashier = app.directory.create_cashier(
                actor,
                &distributor_id,
                user.id,
                name,
                commission,
                contact,
            )?;
            render::ok(&render::cashier_line(&cashier));
        }

        "add-trip" => {
            let company_id = CompanyId::new(arg(tokens, 1, "company id")?);
            let kind = arg(tokens, 2, "kind")?;
            let destination = arg(tokens, 3, "destination")?;
            let departure = parse_when(arg(tokens, 4, "departure")?)?;
            let arrival = parse_when(arg(tokens, 5, "arrival")?)?;
            let seats = parse_u32(arg(tokens, 6, "seats")?, "seats")?;
            let limit = parse_u32(arg(tokens, 7, "per-person limit")?, "per-person limit")?;
            let mut spec = TripSpec::new(kind, destination, departure, arrival, seats, limit);
            for transport in &tokens[8..] {
                spec = spec.with_transport(*transport);
            }
            let trip = app.trips.publish_trip(actor, &company_id, spec)?;
            render::ok(&render::trip_line(&trip));
        }
        "request-trip" => {
            let distributor_id = DistributorId::new(arg(tokens, 1, "distributor id")?);
            let trip_id = TripId::new(arg(tokens, 2, "trip id")?);
            let request = app.trips.request_trip(actor, &distributor_id, &trip_id)?;
            render::ok(&render::request_line(&request));
        }
        "approve-request" => {
            let request_id = RequestId::new(arg(tokens, 1, "request id")?);
            let approve = match arg(tokens, 2, "yes|no")? {
                "yes" | "approve" => true,
                "no" | "reject" => false,
                other => return Err(anyhow!("expected yes or no, got {other}")),
            };
            let trip = app.trips.decide_request(actor, &request_id, approve)?;
            render::ok(&render::trip_line(&trip));
        }
        "sell-ticket" => {
            let cashier_id = CashierId::new(arg(tokens, 1, "cashier id")?);
            let trip_id = TripId::new(arg(tokens, 2, "trip id")?);
            let seat = parse_u32(arg(tokens, 3, "seat")?, "seat")?;
            let buyer = arg(tokens, 4, "buyer name")?;
            let contact = arg(tokens, 5, "buyer contact")?;
            let ticket = app
                .sales
                .sell_ticket(actor, &cashier_id, &trip_id, seat, buyer, contact)?;
            render::ok(&render::ticket_line(&ticket));
        }
        "cancel-trip" => {
            let trip_id = TripId::new(arg(tokens, 1, "trip id")?);
            let trip = app.trips.cancel_trip(actor, &trip_id)?;
            render::ok(&render::trip_line(&trip));
        }

        "update-company" => {
            let company_id = CompanyId::new(arg(tokens, 1, "company id")?);
            let update = profile_update(&tokens[2..])?;
            let company = app.directory.update_company(actor, &company_id, update)?;
            render::ok(&render::company_line(&company));
        }
        "update-distributor" => {
            let distributor_id = DistributorId::new(arg(tokens, 1, "distributor id")?);
            let update = profile_update(&tokens[2..])?;
            let distributor = app
                .directory
                .update_distributor(actor, &distributor_id, update)?;
            render::ok(&render::distributor_line(&distributor));
        }
        "update-cashier" => {
            let cashier_id = CashierId::new(arg(tokens, 1, "cashier id")?);
            let update = profile_update(&tokens[2..])?;
            let cashier = app.directory.update_cashier(actor, &cashier_id, update)?;
            render::ok(&render::cashier_line(&cashier));
        }

        "rate-company" => {
            let company_id = CompanyId::new(arg(tokens, 1, "company id")?);
            let rating = parse_f64(arg(tokens, 2, "rating")?, "rating")?;
            let company = app.ratings.rate_company(actor, &company_id, rating)?;
            render::ok(&render::company_line(&company));
        }
        "rate-distributor" => {
            let distributor_id = DistributorId::new(arg(tokens, 1, "distributor id")?);
            let rating = parse_f64(arg(tokens, 2, "rating")?, "rating")?;
            let distributor = app.ratings.rate_distributor(actor, &distributor_id, rating)?;
            render::ok(&render::distributor_line(&distributor));
        }
        "rate-cashier" => {
            let cashier_id = CashierId::new(arg(tokens, 1, "cashier id")?);
            let rating = parse_f64(arg(tokens, 2, "rating")?, "rating")?;
            let cashier = app.ratings.rate_cashier(actor, &cashier_id, rating)?;
            render::ok(&render::cashier_line(&cashier));
        }

        "report-trips" => {
            let (from, to) = window(tokens, 1)?;
            let trips = app.reports.trips(actor, from, to)?;
            render::list(&trips, render::trip_line, "no trips");
        }
        "report-tickets" => {
            let trip_id = TripId::new(arg(tokens, 1, "trip id")?);
            let (from, to) = window(tokens, 2)?;
            let tickets = app.reports.tickets(actor, &trip_id, from, to)?;
            render::list(&tickets, render::ticket_line, "no tickets");
        }
        "report-companies" => {
            let (from, to) = window(tokens, 1)?;
            let companies = app.reports.companies_with_available_trips(actor, from, to)?;
            render::list(&companies, render::company_line, "no companies");
        }
        "report-distributors" => {
            let distributors = app.reports.distributors(actor)?;
            render::list(&distributors, render::distributor_line, "no distributors");
        }
        "report-cashiers" => {
            let distributor_id = DistributorId::new(arg(tokens, 1, "distributor id")?);
            let cashiers = app.reports.cashiers(actor, &distributor_id)?;
            render::list(&cashiers, render::cashier_line, "no cashiers");
        }
        "report-requests" => {
            let trip_id = TripId::new(arg(tokens, 1, "trip id")?);
            let requests = app.store.requests_by_trip(&trip_id);
            render::list(&requests, render::request_line, "no requests");
        }

        "notifications" => {
            let user = actor.ok_or_else(|| anyhow!("log in first"))?;
            let inbox = app.coordinator.inbox(&user.id);
            render::list(&inbox, render::notification_line, "inbox empty");
        }
        "mark-read" => {
            let id = NotificationId::new(arg(tokens, 1, "notification id")?);
            let notification = app.coordinator.mark_read(&id)?;
            render::ok(&render::notification_line(&notification));
        }
        "check-upcoming-trips" => {
            let hours = match tokens.get(1) {
                Some(tok) => parse_u32(tok, "hours")?.into(),
                None => 24,
            };
            if hours == 0 {
                return Err(anyhow!("hours must be positive"));
            }
            let flagged = app.coordinator.notify_upcoming_unsold(Utc::now(), hours);
            render::note(&format!(
                "{} trip(s) departing within {hours}h with unsold seats",
                flagged.len()
            ));
            render::list(&flagged, render::trip_line, "nothing to flag");
        }

        "dump" => dump(app, arg(tokens, 1, "what")?)?,

        other => return Err(anyhow!("unknown command '{other}'; try 'help'")),
    }
    Ok(())
}

fn dump(app: &App, what: &str) -> anyhow::Result<()> {
    let json = match what {
        "users" => serde_json::to_string_pretty(&app.store.list_users()),
        "companies" => serde_json::to_string_pretty(&app.store.list_companies()),
        "distributors" => serde_json::to_string_pretty(&app.store.list_distributors()),
        "cashiers" => serde_json::to_string_pretty(&app.store.list_cashiers()),
        "trips" => serde_json::to_string_pretty(&app.store.list_trips()),
        "requests" => serde_json::to_string_pretty(&app.store.list_requests()),
        "tickets" => serde_json::to_string_pretty(&app.store.list_tickets()),
        "notifications" => serde_json::to_string_pretty(&app.store.list_notifications()),
        other => return Err(anyhow!("nothing to dump for '{other}'")),
    }
    .context("serializing dump")?;
    println!("{json}");
    Ok(())
}

fn help() {
    render::note(
        "session:
  login <email> | logout | who | seed | quit
directory:
  register-user <email> <name> <admin|company|distributor|cashier>
  create-company <owner-email> <name> <commission> <contact>
  create-distributor <company-id> <owner-email> <name> <commission> <contact>
  create-cashier <distributor-id> <cashier-email> <name> <commission> <contact>
  update-company <id> [name=..] [commission=..] [contact=..]
  update-distributor <id> [..] | update-cashier <id> [..]
trips and sales:
  add-trip <company-id> <kind> <destination> <departure> <arrival> <seats> <limit> [transport..]
  request-trip <distributor-id> <trip-id>
  approve-request <request-id> <yes|no>
  sell-ticket <cashier-id> <trip-id> <seat> <buyer> <contact>
  cancel-trip <trip-id>
ratings:
  rate-company <id> <1.0-5.0> | rate-distributor <id> <1.0-5.0> | rate-cashier <id> <1.0-5.0>
reports:
  report-trips [from [to]] | report-tickets <trip-id> [from [to]]
  report-companies [from [to]] | report-distributors | report-cashiers <distributor-id>
  report-requests <trip-id>
notifications:
  notifications | mark-read <id> | check-upcoming-trips [hours]
misc:
  dump <users|companies|distributors|cashiers|trips|requests|tickets|notifications>
timestamps: 2026-09-01T08:00 or RFC 3339",
    );
}

// boundary parsing

fn arg<'a>(tokens: &[&'a str], index: usize, what: &str) -> anyhow::Result<&'a str> {
    tokens
        .get(index)
        .copied()
        .ok_or_else(|| anyhow!("missing argument: {what}"))
}

fn parse_u32(token: &str, what: &str) -> anyhow::Result<u32> {
    token
        .parse()
        .map_err(|_| anyhow!("{what} must be a whole number, got '{token}'"))
}

fn parse_f64(token: &str, what: &str) -> anyhow::Result<f64> {
    token
        .parse()
        .map_err(|_| anyhow!("{what} must be a number, got '{token}'"))
}

fn parse_role(token: &str) -> anyhow::Result<Role> {
    match token.to_ascii_lowercase().as_str() {
        "admin" => Ok(Role::Admin),
        "company" => Ok(Role::Company),
        "distributor" => Ok(Role::Distributor),
        "cashier" => Ok(Role::Cashier),
        other => Err(anyhow!("unknown role '{other}'")),
    }
}

fn parse_when(token: &str) -> anyhow::Result<DateTime<Utc>> {
    if let Ok(when) = DateTime::parse_from_rfc3339(token) {
        return Ok(when.with_timezone(&Utc));
    }
    let naive = NaiveDateTime::parse_from_str(token, "%Y-%m-%dT%H:%M")
        .map_err(|_| anyhow!("bad timestamp '{token}', expected 2026-09-01T08:00"))?;
    Ok(naive.and_utc())
}

fn window(
    tokens: &[&str],
    index: usize,
) -> anyhow::Result<(Option<DateTime<Utc>>, Option<DateTime<Utc>>)> {
    let from = tokens.get(index).map(|t| parse_when(t)).transpose()?;
    let to = tokens.get(index + 1).map(|t| parse_when(t)).transpose()?;
    Ok((from, to))
}

fn profile_update(tokens: &[&str]) -> anyhow::Result<ProfileUpdate> {
    let mut update = ProfileUpdate::default();
    for token in tokens {
        match token.split_once('=') {
            Some(("name", value)) => update.name = Some(value.replace('_', " ")),
            Some(("commission", value)) => {
                update.commission = Some(parse_f64(value, "commission")?);
            }
            Some(("contact", value)) => update.contact = Some(value.to_string()),
            _ => return Err(anyhow!("expected name=, commission= or contact=, got '{token}'")),
        }
    }
    Ok(update)
}

fn user_by_email(app: &App, email: &str) -> anyhow::Result<User> {
    app.store
        .user_by_email(email)
        .ok_or_else(|| anyhow!("no user with email {email}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_parsing_rejects_garbage() {
        assert!(parse_u32("7", "seat").is_ok());
        assert!(parse_u32("seven", "seat").is_err());
        assert!(parse_f64("4.5", "rating").is_ok());
        assert!(parse_f64("x", "rating").is_err());
    }

    #[test]
    fn timestamps_accept_both_formats() {
        assert!(parse_when("2026-09-01T08:00").is_ok());
        assert!(parse_when("2026-09-01T08:00:00Z").is_ok());
        assert!(parse_when("tomorrow").is_err());
    }

    #[test]
    fn profile_updates_parse_key_value_pairs() {
        let update = profile_update(&["name=South_Desk", "commission=3.5"]).unwrap();
        assert_eq!(update.name.as_deref(), Some("South Desk"));
        assert_eq!(update.commission, Some(3.5));
        assert!(update.contact.is_none());

        assert!(profile_update(&["rating=5"]).is_err());
    }
}
