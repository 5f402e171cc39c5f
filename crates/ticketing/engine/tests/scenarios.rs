//! End-to-end scenarios across every engine, wired the way the front
//! end wires them: one shared in-memory store, one coordinator, engines
//! on top.

use chrono::{Duration, Utc};
use std::sync::Arc;
use ticketing_engine::{
    DirectoryManager, NotificationCoordinator, SalesEngine, TripManager,
};
use ticketing_store::{MemoryStore, TicketStore, TicketingStore};
use ticketing_types::{
    Cashier, Company, Distributor, NotificationKind, Role, TicketStatus, TicketingError, Trip,
    TripSpec, TripStatus, User,
};

struct App {
    store: Arc<dyn TicketingStore>,
    coordinator: Arc<NotificationCoordinator>,
    trips: TripManager,
    sales: Arc<SalesEngine>,
    admin: User,
    company_user: User,
    company: Company,
    distributor_user: User,
    distributor: Distributor,
    cashier_user: User,
    cashier: Cashier,
}

fn app() -> App {
    let store: Arc<dyn TicketingStore> = Arc::new(MemoryStore::new());
    let coordinator = Arc::new(NotificationCoordinator::new(store.clone()));
    let trips = TripManager::new(store.clone(), coordinator.clone());
    let sales = Arc::new(SalesEngine::new(store.clone(), coordinator.clone()));
    let directory = DirectoryManager::new(store.clone());

    let admin = directory
        .register_user("admin@example.com", "Admin", Role::Admin)
        .unwrap();
    let company_user = directory
        .register_user("company@example.com", "Company Owner", Role::Company)
        .unwrap();
    let company = directory
        .create_company(
            Some(&admin),
            company_user.id.clone(),
            "Balkan Lines",
            5.0,
            "office@balkan.example",
        )
        .unwrap();
    let distributor_user = directory
        .register_user("distributor@example.com", "Distributor Owner", Role::Distributor)
        .unwrap();
    let distributor = directory
        .create_distributor(
            Some(&admin),
            &company.id,
            distributor_user.id.clone(),
            "South Desk",
            2.5,
            "desk@south.example",
        )
        .unwrap();
    let cashier_user = directory
        .register_user("cashier@example.com", "Cashier", Role::Cashier)
        .unwrap();
    let cashier = directory
        .create_cashier(
            Some(&distributor_user),
            &distributor.id,
            cashier_user.id.clone(),
            "Front Window",
            1.0,
            "n/a",
        )
        .unwrap();

    App {
        store,
        coordinator,
        trips,
        sales,
        admin,
        company_user,
        company,
        distributor_user,
        distributor,
        cashier_user,
        cashier,
    }
}

fn approved_trip(app: &App, seats: u32, limit: u32) -> Trip {
    let departure = Utc::now() + Duration::hours(48);
    let spec = TripSpec::new(
        "excursion",
        "Rila",
        departure,
        departure + Duration::hours(5),
        seats,
        limit,
    )
    .with_transport("bus");
    let trip = app
        .trips
        .publish_trip(Some(&app.company_user), &app.company.id, spec)
        .unwrap();
    let request = app
        .trips
        .request_trip(Some(&app.distributor_user), &app.distributor.id, &trip.id)
        .unwrap();
    app.trips
        .decide_request(Some(&app.company_user), &request.id, true)
        .unwrap()
}

#[test]
fn full_sale_and_cancellation_workflow() {
    let app = app();

    // Two seats, one ticket per buyer.
    let trip = approved_trip(&app, 2, 1);
    assert_eq!(trip.status, TripStatus::Approved);
    assert!(trip.is_distributor_approved(&app.distributor.id));

    let ticket = app
        .sales
        .sell_ticket(
            Some(&app.cashier_user),
            &app.cashier.id,
            &trip.id,
            1,
            "Alice",
            "alice@example.com",
        )
        .unwrap();
    assert_eq!(ticket.status, TicketStatus::Confirmed);

    // The same seat again.
    let err = app
        .sales
        .sell_ticket(
            Some(&app.cashier_user),
            &app.cashier.id,
            &trip.id,
            1,
            "Bob",
            "n/a",
        )
        .unwrap_err();
    match err {
        TicketingError::Validation(msg) => assert!(msg.contains("already sold")),
        other => panic!("unexpected error: {other:?}"),
    }

    // Alice hits the per-person limit on seat 2.
    let err = app
        .sales
        .sell_ticket(
            Some(&app.cashier_user),
            &app.cashier.id,
            &trip.id,
            2,
            "Alice",
            "n/a",
        )
        .unwrap_err();
    match err {
        TicketingError::Validation(msg) => assert!(msg.contains("per-person limit")),
        other => panic!("unexpected error: {other:?}"),
    }

    // Admin cancels; the cashier hears about it.
    let cancelled = app.trips.cancel_trip(Some(&app.admin), &trip.id).unwrap();
    assert_eq!(cancelled.status, TripStatus::Cancelled);
    let cashier_inbox = app.coordinator.inbox(&app.cashier_user.id);
    assert!(cashier_inbox
        .iter()
        .any(|n| n.kind == NotificationKind::TripCancelled));

    // No further sales, but Alice's ticket survives untouched.
    let err = app
        .sales
        .sell_ticket(
            Some(&app.cashier_user),
            &app.cashier.id,
            &trip.id,
            2,
            "Carol",
            "n/a",
        )
        .unwrap_err();
    assert!(matches!(err, TicketingError::Validation(_)));
    let survivor = app.store.ticket_by_trip_and_seat(&trip.id, 1).unwrap();
    assert_eq!(survivor.status, TicketStatus::Confirmed);
    assert!(survivor.matches_buyer("Alice"));
}

#[test]
fn concurrent_callers_never_double_sell_a_seat() {
    let app = app();
    let trip = approved_trip(&app, 8, 8);

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let sales = Arc::clone(&app.sales);
            let actor = app.cashier_user.clone();
            let cashier_id = app.cashier.id.clone();
            let trip_id = trip.id.clone();
            std::thread::spawn(move || {
                sales
                    .sell_ticket(
                        Some(&actor),
                        &cashier_id,
                        &trip_id,
                        1,
                        &format!("Buyer {i}"),
                        "n/a",
                    )
                    .is_ok()
            })
        })
        .collect();

    let wins = handles.into_iter().map(|h| h.join().unwrap()).filter(|&b| b).count();
    assert_eq!(wins, 1);
}

#[test]
fn concurrent_buyers_respect_the_per_person_limit() {
    let app = app();
    let trip = approved_trip(&app, 8, 2);

    // Eight different seats, one buyer name in varying case.
    let handles: Vec<_> = (1..=8)
        .map(|seat| {
            let sales = Arc::clone(&app.sales);
            let actor = app.cashier_user.clone();
            let cashier_id = app.cashier.id.clone();
            let trip_id = trip.id.clone();
            let buyer = if seat % 2 == 0 { "ALICE" } else { "alice" };
            std::thread::spawn(move || {
                sales
                    .sell_ticket(Some(&actor), &cashier_id, &trip_id, seat, buyer, "n/a")
                    .is_ok()
            })
        })
        .collect();

    let wins = handles.into_iter().map(|h| h.join().unwrap()).filter(|&b| b).count();
    assert_eq!(wins, 2);
}
