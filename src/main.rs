use dotenvy::dotenv;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use school_transit::cli;
use school_transit::router::init_router;
use school_transit::state::init_app_state;

#[tokio::main]
async fn main() {
    dotenv().ok();

    let args: Vec<String> = std::env::args().collect();

    // Admin commands run against the database and exit without serving.
    match args.get(1).map(String::as_str) {
        Some("create-school-admin") => {
            handle_create_school_admin(args).await;
            return;
        }
        Some("seed-number-plates") => {
            handle_seed_number_plates(args).await;
            return;
        }
        _ => {}
    }

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                // axum logs rejections from built-in extractors with the `axum::rejection`
                // target, at `TRACE` level. `axum::rejection=trace` enables showing those events
                format!(
                    "{}=debug,tower_http=debug,axum::rejection=trace",
                    env!("CARGO_CRATE_NAME")
                )
                .into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let state = init_app_state().await;

    sqlx::migrate!("./migrations")
        .run(&state.db)
        .await
        .expect("Failed to run database migrations");

    let bind_addr = state.server_config.bind_addr.clone();
    let app = init_router(state);

    let listener = tokio::net::TcpListener::bind(&bind_addr).await.unwrap();
    println!("🚀 Server running on http://{}", bind_addr);
    println!("📖 Scalar UI available at http://{}/scalar", bind_addr);
    axum::serve(listener, app).await.unwrap();
}

async fn connect_for_cli() -> sqlx::PgPool {
    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await
        .expect("Failed to connect to database");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to run database migrations");

    pool
}

async fn handle_create_school_admin(args: Vec<String>) {
    if args.len() != 7 {
        eprintln!(
            "Usage: {} create-school-admin <first_name> <last_name> <email> <phone_number> <password>",
            args[0]
        );
        std::process::exit(1);
    }

    let pool = connect_for_cli().await;

    match cli::create_school_admin(&pool, &args[2], &args[3], &args[4], &args[5], &args[6]).await {
        Ok(_) => {
            println!("✅ School admin created successfully!");
            println!("   Email: {}", args[4]);
            println!("   Name: {} {}", args[2], args[3]);
        }
        Err(e) => {
            eprintln!("❌ Error creating school admin: {}", e);
            std::process::exit(1);
        }
    }
}

async fn handle_seed_number_plates(args: Vec<String>) {
    if args.len() < 3 {
        eprintln!("Usage: {} seed-number-plates <PLATE> [<PLATE> ...]", args[0]);
        std::process::exit(1);
    }

    let pool = connect_for_cli().await;
    let plates = args[2..].to_vec();

    match cli::seed_number_plates(&pool, &plates).await {
        Ok(_) => println!("✅ Seeded {} number plate(s)", plates.len()),
        Err(e) => {
            eprintln!("❌ Error seeding number plates: {}", e);
            std::process::exit(1);
        }
    }
}
