use chrono::Utc;
use clap::{Args, ValueEnum};
use kwaground::catalog::{FareBoard, FareRoute, JobBoard, JobCatalog, JobListing, JobSearch};
use kwaground::config::AppConfig;
use kwaground::error::AppError;
use kwaground::geo::{Coordinate, LivenessFlag, ReportedPosition};
use kwaground::payments::{
    find_plan, Checkout, PaymentFlow, PaymentProcessor, SimulatedProvider,
};
use kwaground::session::User;
use std::path::PathBuf;

#[derive(Args, Debug, Default)]
pub(crate) struct JobArgs {
    /// Free-text query matched against title, description, and location
    #[arg(long)]
    pub(crate) query: Option<String>,
    /// Job type, e.g. "Cleaning" or "Construction"
    #[arg(long = "type")]
    pub(crate) job_type: Option<String>,
    /// County or town the listing must be in
    #[arg(long)]
    pub(crate) location: Option<String>,
    /// Latitude of the searcher
    #[arg(long, requires = "lng", allow_negative_numbers = true)]
    pub(crate) lat: Option<f64>,
    /// Longitude of the searcher
    #[arg(long, requires = "lat", allow_negative_numbers = true)]
    pub(crate) lng: Option<f64>,
    /// Replace the built-in listings with a CSV export
    #[arg(long)]
    pub(crate) csv: Option<PathBuf>,
    /// Only list urgent jobs
    #[arg(long)]
    pub(crate) urgent: bool,
}

#[derive(Args, Debug, Default)]
pub(crate) struct FareArgs {
    /// County whose table to show (defaults to Nairobi)
    #[arg(long)]
    pub(crate) county: Option<String>,
    /// Filter routes by origin or destination
    #[arg(long)]
    pub(crate) query: Option<String>,
    /// Only show trending routes
    #[arg(long)]
    pub(crate) trending: bool,
}

#[derive(Args, Debug, Default)]
pub(crate) struct OfficeArgs {
    #[arg(long, requires = "lng", allow_negative_numbers = true)]
    pub(crate) lat: Option<f64>,
    #[arg(long, requires = "lat", allow_negative_numbers = true)]
    pub(crate) lng: Option<f64>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub(crate) enum SimulatedOutcome {
    #[default]
    Approve,
    Decline,
}

impl From<SimulatedOutcome> for SimulatedProvider {
    fn from(value: SimulatedOutcome) -> Self {
        match value {
            SimulatedOutcome::Approve => SimulatedProvider::Approve,
            SimulatedOutcome::Decline => SimulatedProvider::Decline,
        }
    }
}

#[derive(Args, Debug)]
pub(crate) struct CheckoutArgs {
    /// Posting plan id: basic, premium, or enterprise
    #[arg(long)]
    pub(crate) plan: String,
    /// M-Pesa number to charge
    #[arg(long)]
    pub(crate) phone: Option<String>,
    /// How the simulated provider answers
    #[arg(long, value_enum, default_value_t = SimulatedOutcome::Approve)]
    pub(crate) outcome: SimulatedOutcome,
    /// Payer email (defaults to the anonymous checkout address)
    #[arg(long)]
    pub(crate) email: Option<String>,
}

fn position(lat: Option<f64>, lng: Option<f64>) -> Option<Coordinate> {
    lat.zip(lng).map(|(lat, lng)| Coordinate::new(lat, lng))
}

pub(crate) fn run_jobs(args: JobArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let imported = args.csv.as_ref().map(JobCatalog::from_path).transpose()?;
    let catalog = imported.as_ref().unwrap_or_else(|| JobCatalog::seeded());

    if args.urgent {
        println!("Urgent jobs");
        render_jobs(catalog.urgent());
        return Ok(());
    }

    let board = JobBoard::new(catalog, &config.search);
    let request = JobSearch {
        query: args.query,
        job_type: args.job_type,
        location: args.location,
        user_position: position(args.lat, args.lng),
    };
    let result = board.search(&request);

    match (result.user_county, result.radius_applied) {
        (Some(county), true) => println!(
            "Jobs within {} km of you in {county}",
            config.search.search_radius_km
        ),
        (Some(county), false) => println!("Jobs (you appear to be in {county})"),
        (None, _) => println!("Jobs"),
    }
    render_jobs(result.jobs.iter());
    Ok(())
}

fn render_jobs<'a>(jobs: impl IntoIterator<Item = &'a JobListing>) {
    let mut shown = 0usize;
    for job in jobs {
        let urgent = if job.urgent { " [urgent]" } else { "" };
        println!(
            "- {} | {} | {} | {} | posted {}{}",
            job.title, job.kind, job.location, job.pay, job.posted, urgent
        );
        shown += 1;
    }
    if shown == 0 {
        println!("No jobs match your search.");
    }
}

pub(crate) fn run_fares(args: FareArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let catalog = kwaground::catalog::FareCatalog::seeded();
    let board = FareBoard::new(catalog, &config.search);
    let county = args
        .county
        .as_deref()
        .map(str::trim)
        .filter(|county| !county.is_empty())
        .unwrap_or(kwaground::catalog::board::DEFAULT_COUNTY);

    if !catalog.has_county(county) {
        println!("No dedicated fare table for {county}; showing typical fares.");
    }

    let routes = if args.trending {
        println!("Trending routes in {county}");
        board.trending(county)
    } else {
        println!("Fares in {county}");
        board.search(Some(county), args.query.as_deref())
    };
    render_fares(&routes);
    Ok(())
}

fn render_fares(routes: &[&FareRoute]) {
    if routes.is_empty() {
        println!("No routes match your search.");
        return;
    }
    for route in routes {
        println!(
            "- {} -> {} | matatu KES {} | boda KES {} | {} | updated {}",
            route.from, route.to, route.matatu, route.boda, route.duration, route.last_updated
        );
    }
}

pub(crate) async fn run_office(args: OfficeArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let board = FareBoard::new(kwaground::catalog::FareCatalog::seeded(), &config.search);
    let lookup = board
        .report_office(&ReportedPosition(position(args.lat, args.lng)))
        .await;

    if lookup.origin.is_fallback() {
        println!("Location unavailable; searching from Nairobi.");
    }

    match (&lookup.office, lookup.distance_km) {
        (Some(office), Some(distance)) => println!(
            "Report fare issues to {} ({distance:.1} km away)",
            office.name
        ),
        _ => println!(
            "No county office within {} km. Contact your county government directly.",
            config.search.nearest_max_km
        ),
    }
    Ok(())
}

pub(crate) async fn run_checkout(args: CheckoutArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let plan = find_plan(&args.plan).ok_or_else(|| AppError::UnknownPlan(args.plan.clone()))?;
    let payer = args.email.map(|email| User {
        id: "cli".to_string(),
        email,
        password: String::new(),
        created_at: Utc::now(),
    });

    let request = match Checkout::begin(plan, payer.as_ref(), Utc::now()) {
        Checkout::PostDirectly { plan_id } => {
            println!("The {plan_id} plan is free. Continue to the job post form.");
            return Ok(());
        }
        Checkout::Payment(request) => request,
    };

    println!(
        "{}: {} {} ({} days listed), reference {}",
        plan.name,
        request.currency,
        request.amount_major(),
        plan.listed_days,
        request.reference
    );

    let mut flow = PaymentFlow::new(request);
    let phone = args.phone.unwrap_or_default();
    flow.submit_phone(&phone, &config.forms.phone_policy.policy())?;
    println!(
        "Confirm payment from {}",
        flow.phone().unwrap_or_default()
    );

    let processor = PaymentProcessor::new(
        SimulatedProvider::from(args.outcome),
        config.payments.close_delay,
    );
    let liveness = LivenessFlag::new();
    let close = processor.process(&mut flow, &liveness).await?;

    if let Some(message) = flow.message() {
        println!("{message}");
    }
    if let Some(signal) = close {
        signal.wait().await;
        liveness.close();
    }
    Ok(())
}
