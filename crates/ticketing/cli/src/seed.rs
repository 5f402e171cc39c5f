//! Demo dataset for poking at the system interactively.

use crate::app::App;
use crate::render;
use chrono::{Duration, Utc};
use ticketing_types::{Role, TripSpec, User};

/// Load the demo cast and one approved trip; returns the admin user so
/// the shell can start a logged-in session.
pub fn load(app: &App) -> anyhow::Result<User> {
    let admin = app
        .directory
        .register_user("admin@demo.example", "Admin", Role::Admin)?;
    let company_owner = app
        .directory
        .register_user("owner@balkan.example", "Balkan Owner", Role::Company)?;
    let company = app.directory.create_company(
        Some(&admin),
        company_owner.id.clone(),
        "Balkan Lines",
        5.0,
        "office@balkan.example",
    )?;
    let distributor_owner = app
        .directory
        .register_user("desk@south.example", "South Desk Owner", Role::Distributor)?;
    let distributor = app.directory.create_distributor(
        Some(&admin),
        &company.id,
        distributor_owner.id.clone(),
        "South Desk",
        2.5,
        "desk@south.example",
    )?;
    let cashier_user = app
        .directory
        .register_user("window@south.example", "Front Window", Role::Cashier)?;
    let cashier = app.directory.create_cashier(
        Some(&distributor_owner),
        &distributor.id,
        cashier_user.id.clone(),
        "Front Window",
        1.0,
        "n/a",
    )?;

    let departure = Utc::now() + Duration::hours(36);
    let spec = TripSpec::new(
        "excursion",
        "Rila Lakes",
        departure,
        departure + Duration::hours(6),
        20,
        4,
    )
    .with_transport("bus");
    let trip = app
        .trips
        .publish_trip(Some(&company_owner), &company.id, spec)?;
    let request = app
        .trips
        .request_trip(Some(&distributor_owner), &distributor.id, &trip.id)?;
    app.trips
        .decide_request(Some(&company_owner), &request.id, true)?;

    render::ok("demo data loaded; logged in as admin@demo.example");
    render::note(&format!("  company      {}", company.id));
    render::note(&format!("  distributor  {}", distributor.id));
    render::note(&format!("  cashier      {}", cashier.id));
    render::note(&format!("  trip         {}  (approved for the distributor)", trip.id));
    render::note("  users: owner@balkan.example desk@south.example window@south.example");
    Ok(admin)
}
