//! # Seed Data Generator
//!
//! Populates the database with a demo register day and a set of
//! receivables for development.
//!
//! ## Usage
//! ```bash
//! # Seed into the default dev database
//! cargo run -p balcao-db --bin seed
//!
//! # Specify database path
//! cargo run -p balcao-db --bin seed -- --db ./data/balcao.db
//!
//! # Leave the register open (skip the closing step)
//! cargo run -p balcao-db --bin seed -- --keep-open
//! ```
//!
//! ## Generated Data
//! - One cash session: opening float, a handful of sales across payment
//!   methods, a sangria, a suprimento and (unless `--keep-open`) a
//!   closing count with a small shortage
//! - Pending receivables across customers and due dates, two of them
//!   settled with a per-item discount

use std::env;

use chrono::{Duration, Utc};
use tracing_subscriber::EnvFilter;

use balcao_core::{Money, MovementKind};
use balcao_db::{Database, DbConfig, NewReceivable, SettlementRequest};

/// Demo sales: (amount in centavos, payment method).
const SALES: &[(i64, &str)] = &[
    (4_590, "Dinheiro"),
    (12_900, "Pix"),
    (8_750, "Cartão"),
    (2_300, "Dinheiro"),
    (35_000, "Pix"),
];

/// Demo receivables: (description, customer, centavos, days until due).
const RECEIVABLES: &[(&str, &str, i64, i64)] = &[
    ("Venda #10050", "João Silva", 15_000, 12),
    ("Parcela 2/3 - Pedido #900", "Maria Oliveira", 30_000, -5),
    ("Serviço Prestado", "Empresa X", 120_000, 5),
    ("Venda #10051 - Cimento", "Construtora Alfa", 84_500, 30),
    ("Parcela 1/2 - Telhas", "Construtora Alfa", 42_000, -12),
    ("Venda #10057", "Pedro Santos", 6_990, 18),
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Parse command line arguments
    let args: Vec<String> = env::args().collect();

    let mut db_path = String::from("./balcao_dev.db");
    let mut keep_open = false;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--keep-open" => keep_open = true,
            "--help" | "-h" => {
                println!("Balcão POS Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>    Database file path (default: ./balcao_dev.db)");
                println!("      --keep-open    Leave the register open (skip closing)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("Balcão POS Seed Data Generator");
    println!("==============================");
    println!("Database: {db_path}");
    println!();

    let db = Database::new(DbConfig::new(&db_path)).await?;
    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    if db.sessions().current_open().await?.is_some() {
        println!("⚠ A cash session is already open.");
        println!("  Skipping seed to avoid a conflicting register day.");
        return Ok(());
    }

    // One register day
    let session = db
        .sessions()
        .open_register(Money::from_cents(10_000), "Operador", Some("Seed demo"))
        .await?;
    println!("✓ Register opened: {}", session.id);

    let sessions = db.sessions();
    for (amount, method) in SALES {
        sessions
            .record_movement(
                &session.id,
                MovementKind::Sale,
                Money::from_cents(*amount),
                None,
                Some(method),
            )
            .await?;
    }
    sessions
        .record_movement(
            &session.id,
            MovementKind::Withdrawal,
            Money::from_cents(20_000),
            Some("Depósito bancário"),
            None,
        )
        .await?;
    sessions
        .record_movement(
            &session.id,
            MovementKind::Supplement,
            Money::from_cents(5_000),
            Some("Troco adicional"),
            None,
        )
        .await?;

    let expected = sessions.expected_balance(&session.id).await?;
    println!("✓ Movements recorded, expected balance: {expected}");

    if keep_open {
        println!("  Register left open (--keep-open)");
    } else {
        // Count 2,00 short of expected for a realistic closing
        let counted = expected - Money::from_cents(200);
        let closed = sessions.close_register(&session.id, counted).await?;
        println!(
            "✓ Register closed, difference: {}",
            closed.difference().unwrap_or_default()
        );
    }

    // Receivables
    let today = Utc::now().date_naive();
    let batch: Vec<NewReceivable> = RECEIVABLES
        .iter()
        .map(|(description, customer, cents, due_in)| NewReceivable {
            description: description.to_string(),
            customer: customer.to_string(),
            value: Money::from_cents(*cents),
            due_date: today + Duration::days(*due_in),
        })
        .collect();
    let rows = db.receivables().insert_batch(&batch).await?;
    println!("✓ Seeded {} receivables", rows.len());

    // Settle the first two with a small per-item discount on one
    let outcome = db
        .receivables()
        .settle(
            &[
                SettlementRequest {
                    receivable_id: rows[0].id.clone(),
                    discount: Money::from_cents(1_000),
                },
                SettlementRequest {
                    receivable_id: rows[1].id.clone(),
                    discount: Money::zero(),
                },
            ],
            "Pix",
            today,
        )
        .await?;
    println!(
        "✓ Settled {} receivables ({} failed)",
        outcome.settled.len(),
        outcome.failed.len()
    );

    println!();
    println!("✓ Seed complete!");

    Ok(())
}
