//! Database seeder for QMS development and testing.
//!
//! Seeds the default business areas, an admin user with access to all of
//! them, and a few sample records for local development.
//!
//! Usage: cargo run --bin seeder

use qms_core::auth::hash_password;
use qms_core::record::{AccessScope, NewRecord};
use qms_db::{
    BusinessAreaRepository, ProcessRepository, QualityObjectiveRepository, RecordAdapter,
    UserRepository,
};
use sea_orm::DatabaseConnection;
use serde_json::json;

const BUSINESS_AREAS: [&str; 5] = ["Quality Management", "Finance", "HR", "Operations", "IT"];

const ADMIN_EMAIL: &str = "admin@qms.dev";
const ADMIN_PASSWORD: &str = "admin-dev-password";

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let database_url =
        std::env::var("DATABASE_URL").expect("DATABASE_URL must be set in environment");

    println!("Connecting to database...");
    let db = qms_db::connect(&database_url)
        .await
        .expect("Failed to connect to database");

    println!("Seeding business areas...");
    seed_business_areas(&db).await;

    println!("Seeding admin user...");
    let admin_id = seed_admin_user(&db).await;

    println!("Seeding sample records...");
    seed_sample_records(&db, admin_id).await;

    println!("Seeding complete!");
}

/// Seeds the default business areas, skipping ones that already exist.
async fn seed_business_areas(db: &DatabaseConnection) {
    let repo = BusinessAreaRepository::new(db.clone());

    for name in BUSINESS_AREAS {
        match repo.find_by_name(name).await {
            Ok(Some(_)) => println!("  Business area '{name}' already exists, skipping..."),
            Ok(None) => match repo.create(name).await {
                Ok(_) => println!("  Created business area: {name}"),
                Err(e) => eprintln!("Failed to create business area '{name}': {e}"),
            },
            Err(e) => eprintln!("Failed to look up business area '{name}': {e}"),
        }
    }
}

/// Seeds the admin user and grants it access to every business area.
async fn seed_admin_user(db: &DatabaseConnection) -> i64 {
    let user_repo = UserRepository::new(db.clone());
    let area_repo = BusinessAreaRepository::new(db.clone());

    if let Ok(Some(existing)) = user_repo.find_by_email(ADMIN_EMAIL).await {
        println!("  Admin user already exists, skipping...");
        return existing.id;
    }

    let password_hash = hash_password(ADMIN_PASSWORD).expect("Failed to hash admin password");
    let admin = user_repo
        .create(ADMIN_EMAIL, "admin", &password_hash, "Quality Management")
        .await
        .expect("Failed to create admin user");
    println!("  Created admin user: {ADMIN_EMAIL}");

    // Cross-area grants for everything beyond the primary area
    for name in BUSINESS_AREAS {
        if name == "Quality Management" {
            continue;
        }
        if let Ok(Some(area)) = area_repo.find_by_name(name).await {
            if let Err(e) = user_repo.grant_business_area(admin.id, area.id).await {
                eprintln!("Failed to grant '{name}' to admin: {e}");
            }
        }
    }

    admin.id
}

/// Seeds a couple of sample records through the regular adapters.
async fn seed_sample_records(db: &DatabaseConnection, admin_id: i64) {
    let scope = AccessScope::new(BUSINESS_AREAS.map(str::to_owned));

    let processes = ProcessRepository::new(db.clone());
    let existing = processes
        .list(&scope)
        .await
        .expect("Failed to list processes");
    if !existing.is_empty() {
        println!("  Sample records already exist, skipping...");
        return;
    }

    let process = NewRecord {
        business_area: "Quality Management".to_string(),
        title: "Document control process".to_string(),
        description: Some("How controlled documents are issued and retired".to_string()),
        status: "active".to_string(),
        details: json!({ "owner": "QA lead", "review_cycle_months": 12 }),
        file: None,
    };
    match processes.create(process, admin_id, &scope).await {
        Ok(record) => println!("  Created sample process #{}", record.id),
        Err(e) => eprintln!("Failed to create sample process: {e}"),
    }

    let objectives = QualityObjectiveRepository::new(db.clone());
    let objective = NewRecord {
        business_area: "Finance".to_string(),
        title: "Reduce invoice processing errors".to_string(),
        description: None,
        status: "active".to_string(),
        details: json!({ "target": "under 0.5% per quarter" }),
        file: None,
    };
    match objectives.create(objective, admin_id, &scope).await {
        Ok(record) => println!("  Created sample quality objective #{}", record.id),
        Err(e) => eprintln!("Failed to create sample quality objective: {e}"),
    }
}
