//! MovieScope widget — Dioxus-powered title search.

use dioxus::prelude::*;

mod app;
mod search;
mod state;

use app::App;

fn main() {
    #[cfg(not(target_arch = "wasm32"))]
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("moviescope=info".parse().unwrap()),
        )
        .with_target(false)
        .init();

    #[cfg(feature = "desktop")]
    {
        use dioxus::desktop::{Config, LogicalSize, WindowBuilder};

        // Desktop builds read .moviescope.toml from the working directory
        let config = std::env::current_dir()
            .map(|cwd| moviescope_core::load_moviescope_config(&cwd))
            .unwrap_or_default();

        LaunchBuilder::new()
            .with_cfg(
                Config::default()
                    .with_menu(None)
                    .with_background_color((10, 10, 10, 255))
                    .with_window(
                        WindowBuilder::new()
                            .with_title("MovieScope")
                            .with_inner_size(LogicalSize::new(720.0, 900.0))
                            .with_min_inner_size(LogicalSize::new(420.0, 400.0))
                            .with_resizable(true),
                    ),
            )
            .with_context(config)
            .launch(App);
    }

    #[cfg(not(feature = "desktop"))]
    {
        LaunchBuilder::new()
            .with_context(moviescope_core::WidgetConfig::default())
            .launch(App);
    }
}
