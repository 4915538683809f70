use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde_json::{json, Map};
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use phuket_invest::analytics::{track, AnalyticsEvent};
use phuket_invest::auth::{AuthProvider, IdentityToolkitAuth};
use phuket_invest::calculator::{calculate, CalculatorInput};
use phuket_invest::demo::{demo_auth, demo_store};
use phuket_invest::format::{
    category_label, format_completion, format_currency, format_date, format_eur,
    format_eur_from_thb, format_percent, format_pln, ConversionMode, Currency,
};
use phuket_invest::forms::LeadForm;
use phuket_invest::models::{Property, StatusCategory};
use phuket_invest::service::{Audience, FeedState};
use phuket_invest::store::{DocumentStore, FirestoreStore};
use phuket_invest::{group_by_category, Config, DataService, PropertiesByCategory};

#[derive(Parser)]
#[command(name = "phuket-invest", about = "Phuket investment catalog and admin console")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Project rental income and resale value for a purchase
    Calc {
        /// Purchase price
        #[arg(long)]
        price: Option<f64>,
        /// Holding period in years
        #[arg(long)]
        years: Option<u32>,
        #[arg(long)]
        yield_low: Option<f64>,
        #[arg(long)]
        yield_high: Option<f64>,
        #[arg(long)]
        appreciation_low: Option<f64>,
        #[arg(long)]
        appreciation_high: Option<f64>,
    },
    /// Convert a THB amount to a EUR display value
    Convert {
        thb: f64,
        /// Format as a running cost instead of a listing price
        #[arg(long)]
        fee: bool,
    },
    /// Print the published catalog grouped by category
    Catalog {
        #[arg(long)]
        json: bool,
    },
    /// Follow the published catalog until interrupted
    Watch,
    /// Submit a contact request
    Lead {
        #[arg(long)]
        name: String,
        #[arg(long)]
        phone: String,
        #[arg(long, default_value = "")]
        email: String,
        #[arg(long, default_value = "")]
        budget: String,
        /// READY, 2026 or 2027
        #[arg(long)]
        category: Option<StatusCategory>,
        /// Consent to data processing
        #[arg(long)]
        consent: bool,
        #[arg(long)]
        marketing: bool,
    },
    /// Admin console operations
    Admin {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        #[command(subcommand)]
        action: AdminAction,
    },
}

#[derive(Subcommand)]
enum AdminAction {
    /// All listings, including unpublished ones
    List,
    Publish { id: String },
    Unpublish { id: String },
    Toggle { id: String },
    Delete { id: String },
    /// Set the order of a category to the given id sequence
    Reorder {
        category: StatusCategory,
        ids: Vec<String>,
    },
    Leads,
}

fn build_service(config: &Config) -> Result<DataService> {
    let (store, auth): (Arc<dyn DocumentStore>, Arc<dyn AuthProvider>) = match &config.firebase {
        Some(firebase) => (
            Arc::new(FirestoreStore::new(firebase)?),
            Arc::new(IdentityToolkitAuth::new(firebase)?),
        ),
        None => {
            warn!("Firebase is not configured, using the demo catalog");
            (
                Arc::new(demo_store().context("Failed to seed demo catalog")?),
                Arc::new(demo_auth()),
            )
        }
    };

    Ok(DataService::new(store, auth, config.poll_interval))
}

fn print_property(property: &Property) {
    let listing = &property.listing;
    println!(
        "  {}. {} ({}) od {} / {}",
        listing.order,
        listing.project_name,
        listing.area,
        format_eur(listing.price_from_eur, 0),
        format_currency(listing.price_from_thb, Currency::Thb),
    );
    println!(
        "     {} | {:?} | {}{}",
        format_completion(listing.completion.as_deref()),
        listing.ownership,
        property.id,
        if listing.is_published { "" } else { " [szkic]" },
    );
}

fn print_catalog(catalog: &PropertiesByCategory) {
    for (category, bucket) in catalog.iter() {
        println!("{} ({})", category_label(category), bucket.len());
        for property in bucket {
            print_property(property);
        }
        println!();
    }
}

fn run_calc(input: CalculatorInput) {
    let result = calculate(&input);

    let mut properties = Map::new();
    properties.insert("purchasePrice".to_string(), json!(input.purchase_price));
    properties.insert("holdingPeriod".to_string(), json!(input.holding_period));
    track(AnalyticsEvent::CalculatorUse, properties);

    println!(
        "Zakup {} na {} lat",
        format_pln(input.purchase_price),
        input.holding_period
    );
    println!(
        "  Przychód z najmu:  {} – {}",
        format_pln(result.rental_income_low),
        format_pln(result.rental_income_high)
    );
    println!(
        "  Wartość odsprzedaży: {} – {}",
        format_pln(result.resale_value_low),
        format_pln(result.resale_value_high)
    );
    println!(
        "  Całkowity zwrot:   {} – {}",
        format_pln(result.total_return_low),
        format_pln(result.total_return_high)
    );
    println!(
        "  Zwrot roczny:      {} – {}",
        format_percent(result.annualized_return_low, 1),
        format_percent(result.annualized_return_high, 1)
    );
}

async fn run_watch(service: &DataService) -> Result<()> {
    let mut feed = service.watch_properties(Audience::Public)?;
    info!("👀 Watching the catalog, Ctrl+C to stop");

    feed.ready().await;
    loop {
        match feed.current() {
            FeedState::Ready(decoded) => {
                info!(
                    "Catalog update: {} listings, {} rejected",
                    decoded.records.len(),
                    decoded.rejected.len()
                );
                print_catalog(&group_by_category(&decoded.records));
            }
            FeedState::Failed(message) => warn!("Catalog feed failed: {}", message),
            FeedState::Loading => {}
        }

        tokio::select! {
            more = feed.changed() => if !more { break },
            _ = tokio::signal::ctrl_c() => break,
        }
    }

    Ok(())
}

async fn run_admin(service: &DataService, action: AdminAction) -> Result<()> {
    match action {
        AdminAction::List => {
            let decoded = service.fetch_properties(Audience::Admin).await?;
            print_catalog(&group_by_category(&decoded.records));
            for rejected in &decoded.rejected {
                println!("⚠️  {}", rejected);
            }
        }
        AdminAction::Publish { id } => service.set_published(&id, true).await?,
        AdminAction::Unpublish { id } => service.set_published(&id, false).await?,
        AdminAction::Toggle { id } => {
            let published = service.toggle_publish(&id).await?;
            println!("{}: {}", id, if published { "opublikowany" } else { "szkic" });
        }
        AdminAction::Delete { id } => service.delete_property(&id).await?,
        AdminAction::Reorder { category, ids } => {
            service.reorder_properties(category, &ids).await?
        }
        AdminAction::Leads => {
            let leads = service.fetch_leads().await?;
            for lead in &leads.records {
                let submission = &lead.submission;
                println!(
                    "{} | {} | {} | {}",
                    format_date(lead.created_at.date_naive()),
                    submission.name,
                    submission.phone,
                    submission.email.as_deref().unwrap_or("-"),
                );
            }
            info!("{} leads", leads.records.len());
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Calc {
            price,
            years,
            yield_low,
            yield_high,
            appreciation_low,
            appreciation_high,
        } => {
            let defaults = CalculatorInput::default();
            run_calc(CalculatorInput {
                purchase_price: price.unwrap_or(defaults.purchase_price),
                holding_period: years.unwrap_or(defaults.holding_period),
                net_yield_low: yield_low.unwrap_or(defaults.net_yield_low),
                net_yield_high: yield_high.unwrap_or(defaults.net_yield_high),
                appreciation_low: appreciation_low.unwrap_or(defaults.appreciation_low),
                appreciation_high: appreciation_high.unwrap_or(defaults.appreciation_high),
            });
        }
        Command::Convert { thb, fee } => {
            let mode = if fee {
                ConversionMode::Fee
            } else {
                ConversionMode::Price
            };
            println!("{}", format_eur_from_thb(thb, mode));
        }
        command => {
            let config = Config::from_env().context("Failed to load configuration")?;
            let service = build_service(&config)?;
            run_with_service(&service, command).await?;
        }
    }

    Ok(())
}

async fn run_with_service(service: &DataService, command: Command) -> Result<()> {
    match command {
        Command::Catalog { json } => {
            let catalog = service.fetch_catalog().await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&catalog)?);
            } else {
                info!("🏝️  {} published listings", catalog.len());
                print_catalog(&catalog);
            }
        }
        Command::Watch => run_watch(service).await?,
        Command::Lead {
            name,
            phone,
            email,
            budget,
            category,
            consent,
            marketing,
        } => {
            let form = LeadForm {
                name,
                phone,
                email,
                budget,
                preferred_category: category,
                rodo_consent: consent,
                marketing_consent: marketing,
                ..LeadForm::default()
            };
            let id = service.submit_lead(&form).await?;
            println!("Dziękujemy! Zgłoszenie {} zapisane.", id);
        }
        Command::Admin {
            email,
            password,
            action,
        } => {
            let user = service.login(&email, &password).await?;
            info!("Admin console as {} ({:?})", user.email, user.role);
            let outcome = run_admin(service, action).await;
            service.logout().await?;
            outcome?;
        }
        Command::Calc { .. } | Command::Convert { .. } => {}
    }

    Ok(())
}
