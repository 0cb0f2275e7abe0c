//! Calling kernels by name: the catalogue, labelled input and batches.
//!
//! Run with: `cargo run --example dynamic_dispatch`

use std::sync::Arc;

use algo_ta::prelude::*;

fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    let close: Vec<f64> = (0..40).map(|i| 100.0 + (f64::from(i) * 0.4).sin() * 5.0).collect();
    let high: Vec<f64> = close.iter().map(|c| c + 1.0).collect();
    let low: Vec<f64> = close.iter().map(|c| c - 1.0).collect();

    let spec = lookup("bbands")?;
    println!("{} ({}) -> {:?}", spec.title, spec.category, spec.outputs);

    let inputs = Inputs::new().with(Role::Close, &close);
    let bands = compute("bbands", &inputs, &ParameterSet::new().with("period", 10))?;
    for name in bands.names() {
        let column = bands.column(name).unwrap_or_default();
        println!("  {name:<6} last = {:.4}", column[column.len() - 1]);
    }

    // Labelled input comes back labelled, one series per output column.
    let dates: Arc<[String]> = (1..=40).map(|d| format!("2024-02-{d:02}")).collect();
    let labelled = compute_formatted(
        "macd",
        &[(Role::Close, Series::labeled(close.clone(), dates))],
        &ParameterSet::new(),
    )?;
    for (name, series) in labelled.split() {
        let last = series.data().last().copied().unwrap_or(f64::NAN);
        let label = series.labels().and_then(|l| l.last().cloned()).unwrap_or_default();
        println!("  macd.{name:<9} {label} {last:.4}");
    }

    let hlc = Inputs::new()
        .with(Role::High, &high)
        .with(Role::Low, &low)
        .with(Role::Close, &close);
    let requests = vec![
        BatchRequest::new("atr", hlc, ParameterSet::new().with("period", 5)),
        BatchRequest::new("cci", hlc, ParameterSet::new()),
        BatchRequest::new("no_such_kernel", hlc, ParameterSet::new()),
    ];
    for (request, result) in requests.iter().zip(compute_batch(&requests)) {
        match result {
            Ok(out) => println!("  {:<15} {} rows", request.name, out.len()),
            Err(err) => println!("  {:<15} {err}", request.name),
        }
    }
    Ok(())
}
