//! Command-line text measurement example.
//!
//! Measures a string with the system fonts and prints the result both ways:
//! inline and on the background pool.
//!
//! Run with:
//! cargo run -p horizon-measure --example measure -- "Hello world" '{"fontSize":20,"maxWidth":200}'
//!
//! Set `RUST_LOG=horizon_measure=debug` to see typeface resolution.

use horizon_measure::{MeasureCall, MeasureConfig, TextMeasure};
use serde_json::{Map, Value};
use tracing_subscriber::EnvFilter;

fn main() {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let mut args = std::env::args().skip(1);
    let text = args.next().unwrap_or_else(|| "Hello world".to_string());
    let options: Map<String, Value> = match args.next() {
        Some(raw) => serde_json::from_str(&raw).expect("options must be a JSON object"),
        None => Map::new(),
    };
    let density: f32 = std::env::var("MEASURE_DENSITY")
        .ok()
        .and_then(|value| value.parse().ok())
        .unwrap_or(1.0);

    println!("Text measurement example");
    println!("========================");
    println!();

    let measure = TextMeasure::init_global(&MeasureConfig::new().density(density))
        .expect("global instance is initialized once");
    if let Some(err) = measure.setup_error() {
        println!("Measurement unavailable: {err}");
    }

    let call = MeasureCall::new(text, options);
    println!("Request:    {}", serde_json::to_string(&call).expect("serializable"));

    let sync = measure.measure_call_sync(&call);
    println!("Sync:       {}", serde_json::to_string(&sync).expect("serializable"));

    match measure
        .measure_text(call.text.as_deref(), call.options.as_ref())
        .wait()
    {
        Ok(result) => println!(
            "Background: {}",
            serde_json::to_string(&result).expect("serializable")
        ),
        Err(rejection) => println!("Background: rejected ({rejection})"),
    }
}
