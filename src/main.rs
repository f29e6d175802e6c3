use std::sync::Arc;

use clap::Parser;
use poem::{listener::TcpListener, middleware::Tracing, EndpointExt, Route, Server};
use poem_openapi::OpenApiService;

use academic_portal::api::{AdminApi, AuthApi, CourseApi, EnrollmentApi, FeedbackApi, HealthApi};
use academic_portal::cli::{self, Cli, Commands};
use academic_portal::config::{init_database, init_logging, migrate_database, BootstrapSettings};
use academic_portal::coordinators::{
    AdminCoordinator, AuthCoordinator, CourseCoordinator, EnrollmentCoordinator, FeedbackCoordinator,
};
use academic_portal::AppData;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();
    init_logging()?;

    let cli = Cli::parse();
    let settings = BootstrapSettings::from_env()?;
    tracing::debug!(?settings, "Loaded bootstrap settings");

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => serve(settings).await,
        command => cli::execute_command(command, &settings).await,
    }
}

async fn serve(settings: BootstrapSettings) -> Result<(), Box<dyn std::error::Error>> {
    let db = init_database(&settings).await?;
    migrate_database(&db).await?;
    tracing::info!("Database ready");

    let app_data = Arc::new(AppData::init(db.clone(), &settings)?);
    let token_provider = app_data.token_provider.clone();

    let auth_api = AuthApi::new(Arc::new(AuthCoordinator::new(app_data.clone())));
    let course_api = CourseApi::new(
        Arc::new(CourseCoordinator::new(app_data.clone())),
        token_provider.clone(),
    );
    let enrollment_api = EnrollmentApi::new(
        Arc::new(EnrollmentCoordinator::new(app_data.clone())),
        token_provider.clone(),
    );
    let feedback_api = FeedbackApi::new(
        Arc::new(FeedbackCoordinator::new(app_data.clone())),
        token_provider.clone(),
    );
    let admin_api = AdminApi::new(
        Arc::new(AdminCoordinator::new(app_data.clone())),
        token_provider,
    );

    let address = settings.server_address();
    let api_service = OpenApiService::new(
        (HealthApi::new(db), auth_api, course_api, enrollment_api, feedback_api, admin_api),
        "Academic Portal API",
        env!("CARGO_PKG_VERSION"),
    )
    .server(format!("http://localhost:{}/api", settings.server_port()));

    let ui = api_service.swagger_ui();

    let app = Route::new()
        .nest("/api", api_service)
        .nest("/swagger", ui)
        .with(Tracing);

    tracing::info!("Starting server on http://{}", address);
    tracing::info!("Swagger UI available at http://localhost:{}/swagger", settings.server_port());

    Server::new(TcpListener::bind(address)).run(app).await?;

    Ok(())
}
