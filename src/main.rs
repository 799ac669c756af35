#[cfg(not(target_arch = "wasm32"))]
fn load_dotenv() {
    // A missing .env is fine; the key may come from the real environment.
    let _ = dotenvy::dotenv();
}

#[cfg(target_arch = "wasm32")]
fn load_dotenv() {}

fn init_tracing() {
    #[cfg(not(target_arch = "wasm32"))]
    {
        use tracing_subscriber::EnvFilter;
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
            )
            .init();
    }
}

fn main() {
    load_dotenv();
    init_tracing();
    dioxus::launch(finch::ui::App);
}
