use gtk4 as gtk;
use libadwaita as adw;

use adw::prelude::*;
use log::{error, info, warn};
use std::process::ExitCode;
use std::rc::Rc;

use snipcheck::analysis::AnalysisClient;
use snipcheck::app::Config;
use snipcheck::capture::DesktopSession;
use snipcheck::ui::{self, Services, Startup};

const APP_ID: &str = "org.example.Snipcheck";

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Config::load(None).unwrap_or_else(|e| {
        warn!("{}; using defaults", e);
        Config::default()
    });

    let runtime = match tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Failed to start async runtime: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let client = match AnalysisClient::from_config(&config.backend) {
        Ok(client) => client,
        Err(e) => {
            error!("Invalid backend configuration: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let session = DesktopSession::detect();
    info!("Running on {}, backend {}", session, client.endpoint());

    let startup = Rc::new(Startup {
        config,
        services: Rc::new(Services {
            runtime: runtime.handle().clone(),
            client,
        }),
        session,
    });

    let app = adw::Application::builder().application_id(APP_ID).build();

    app.connect_activate(move |app| {
        // A second launch just brings the panel back
        let panel = app
            .windows()
            .into_iter()
            .find(|w| w.is::<adw::ApplicationWindow>());
        if let Some(window) = panel {
            window.present();
            return;
        }
        ui::build_ui(app, &startup);
    });

    // GTK would otherwise try to parse our arguments
    let status = app.run_with_args::<&str>(&[]);

    drop(runtime);
    if status == gtk::glib::ExitCode::SUCCESS {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
